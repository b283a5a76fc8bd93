//! Tournament aggregate, its settings, and the error taxonomy shared by every engine operation.

use crate::config::EngineConfig;
use crate::models::game::{Match, MatchId, RoundOneMethod, ScoreConfirmation};
use crate::models::player::{GroupPlayer, Player, PlayerId};
use crate::models::seeding::{GroupAssignment, GroupMethod, RankingList, SeedingRow};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Broad class of a [`TournamentError`], so callers can branch on it (HTTP status, UI behaviour).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input. Never retried.
    Validation,
    /// The target is already finalized or the workflow step is locked.
    Conflict,
    /// Pairing search gave up; needs a manual pairing.
    Exhaustion,
    NotFound,
    Forbidden,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("Player name must not be empty")]
    EmptyPlayerName,
    #[error("A player with this name already exists")]
    DuplicatePlayerName,
    #[error("Need at least {required} players (found {found})")]
    NotEnoughPlayers { required: usize, found: usize },
    #[error("Pairing needs an even number of players (found {0})")]
    OddPlayerCount(usize),
    #[error("Group count must be between 2 and 64 (got {0})")]
    InvalidGroupCount(usize),
    #[error("Table count must be at least 1")]
    InvalidTableCount,
    #[error("Seed {seed} is out of range 1..={max}")]
    InvalidSeed { seed: u32, max: usize },
    #[error("Board number {0} is out of range 1..=9")]
    InvalidBoardNumber(u8),
    #[error("Board {0} was submitted more than once")]
    DuplicateBoard(u8),
    #[error("Tiebreaker board 9 requires all 8 regulation boards")]
    PrematureTiebreaker,
    #[error("Tiebreaker board 9 is only played when the 8 regulation boards are tied")]
    TiebreakerWithoutTie,
    #[error("Board {board} is missing {field}")]
    MissingField { board: u8, field: &'static str },
    #[error("Board {board}: points {points} exceed the maximum of 13")]
    PointsOutOfRange { board: u8, points: u8 },
    #[error("Board {board}: pocket count {count} exceeds 9")]
    PocketCountOutOfRange { board: u8, count: u8 },
    #[error("Player {0} is not part of this match")]
    UnknownParticipant(PlayerId),
    #[error("Board {board}: winner {winner} has fewer points than the opponent")]
    WinnerContradictsPoints { board: u8, winner: PlayerId },
    #[error("Sudden death is only allowed when the board totals are tied")]
    SuddenDeathWithoutTie,
    #[error("Sudden death requires a winner")]
    SuddenDeathWithoutWinner,
    #[error("Sudden death attempts must be 1..=3 (got {0})")]
    InvalidSuddenDeathAttempts(u8),
    #[error("Score {0} is out of range 0..=999")]
    ScoreOutOfRange(u32),
    #[error("Reported score {reported1}-{reported2} does not match the boards ({computed1}-{computed2})")]
    ScoreMismatch {
        reported1: u32,
        reported2: u32,
        computed1: u32,
        computed2: u32,
    },
    #[error("A score is required when no boards are submitted")]
    MissingScore,
    #[error("Could not serialise match payload: {0}")]
    Serialization(String),
    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),
    #[error("{0} must be generated first")]
    StepNotReady(&'static str),
    #[error("Group {0} does not exist")]
    UnknownGroup(u32),
    #[error("Scores are already confirmed for match {0}")]
    MatchAlreadyConfirmed(MatchId),
    #[error("{0} is locked by a later workflow step")]
    StepLocked(&'static str),
    #[error("Round {round} of group {group} still has unconfirmed matches")]
    RoundInProgress { group: u32, round: u32 },
    #[error("Round {round} of group {group} cannot be deleted")]
    RoundLocked { group: u32, round: u32 },
    #[error("Pairing search gave up after {attempts} attempts; pair this round manually")]
    PairingSearchExhausted { attempts: usize },
    #[error("No pairing without repeat opponents exists; pair this round manually")]
    NoLegalPairing,
    #[error("Player not found")]
    PlayerNotFound(PlayerId),
    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("Round {round} of group {group} not found")]
    RoundNotFound { group: u32, round: u32 },
    #[error("Player {player_id} is not assigned to match {match_id}")]
    NotMatchParticipant { match_id: MatchId, player_id: PlayerId },
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            MatchAlreadyConfirmed(_) | StepLocked(_) | RoundInProgress { .. } | RoundLocked { .. } => {
                ErrorKind::Conflict
            }
            PairingSearchExhausted { .. } | NoLegalPairing => ErrorKind::Exhaustion,
            PlayerNotFound(_) | MatchNotFound(_) | RoundNotFound { .. } => ErrorKind::NotFound,
            NotMatchParticipant { .. } => ErrorKind::Forbidden,
            _ => ErrorKind::Validation,
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Per-tournament knobs, seeded from [`EngineConfig`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    pub group_count: usize,
    pub group_method: GroupMethod,
    pub round_one_method: RoundOneMethod,
    pub table_count: u32,
    pub swiss_attempt_cap: usize,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for TournamentSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            group_count: config.group_count,
            group_method: config.group_method,
            round_one_method: config.round_one_method,
            table_count: config.table_count,
            swiss_attempt_cap: config.swiss_attempt_cap,
        }
    }
}

/// Full tournament state: roster, ranking, seeding, groups, matches and confirmations.
///
/// Every workflow operation takes `&mut Tournament`, so id allocation, match creation and
/// the read-all-confirmations-then-finalize step are atomic with respect to each other.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub settings: TournamentSettings,
    pub players: Vec<Player>,
    pub ranking: Option<RankingList>,
    /// Empty until seeding is generated.
    pub seeding: Vec<SeedingRow>,
    pub national_country: Option<String>,
    /// Empty until groups are generated.
    pub groups: Vec<GroupAssignment>,
    pub matches: Vec<Match>,
    pub confirmations: Vec<ScoreConfirmation>,
    next_player_id: PlayerId,
    next_match_id: MatchId,
}

impl Tournament {
    /// Create an empty tournament.
    pub fn new(name: impl Into<String>, settings: TournamentSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            settings,
            players: Vec::new(),
            ranking: None,
            seeding: Vec::new(),
            national_country: None,
            groups: Vec::new(),
            matches: Vec::new(),
            confirmations: Vec::new(),
            next_player_id: 1,
            next_match_id: 1,
        }
    }

    pub fn has_seeding(&self) -> bool {
        !self.seeding.is_empty()
    }

    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn match_by_id(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn match_by_id_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Add a player (only before seeding). Names must be unique (case-insensitive).
    pub fn add_player(&mut self, player: Player) -> Result<PlayerId, TournamentError> {
        if self.has_seeding() {
            return Err(TournamentError::StepLocked("Player roster"));
        }
        let name = player.name.trim().to_string();
        if name.is_empty() {
            return Err(TournamentError::EmptyPlayerName);
        }
        if self.players.iter().any(|p| p.name.eq_ignore_ascii_case(&name)) {
            return Err(TournamentError::DuplicatePlayerName);
        }
        let id = self.next_player_id;
        self.next_player_id += 1;
        self.players.push(Player {
            id,
            name,
            ..player
        });
        Ok(id)
    }

    /// Remove a player by id (only before seeding).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        if self.has_seeding() {
            return Err(TournamentError::StepLocked("Player roster"));
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }

    /// Replace settings; locked once groups exist.
    pub fn set_settings(&mut self, settings: TournamentSettings) -> Result<(), TournamentError> {
        if self.has_groups() {
            return Err(TournamentError::StepLocked("Tournament settings"));
        }
        self.settings = settings;
        Ok(())
    }

    /// Reserve the next match id. Ids are never reused, even after a round is deleted.
    pub fn allocate_match_id(&mut self) -> MatchId {
        let id = self.next_match_id;
        self.next_match_id += 1;
        id
    }

    /// Distinct group numbers in ascending order.
    pub fn group_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.groups.iter().map(|g| g.group_number).collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    /// Players of one group with their seeds, in seed order.
    pub fn group_players(&self, group_number: u32) -> Result<Vec<GroupPlayer>, TournamentError> {
        let mut players: Vec<GroupPlayer> = self
            .groups
            .iter()
            .filter(|g| g.group_number == group_number)
            .map(|g| {
                let name = self
                    .player(g.player_id)
                    .map(|p| p.name.clone())
                    .ok_or(TournamentError::PlayerNotFound(g.player_id))?;
                Ok(GroupPlayer::new(g.player_id, name, g.seed))
            })
            .collect::<Result<_, TournamentError>>()?;
        if players.is_empty() {
            return Err(TournamentError::UnknownGroup(group_number));
        }
        players.sort_by_key(|p| p.seed);
        Ok(players)
    }

    pub fn group_matches(&self, group_number: u32) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|m| m.group_number == group_number)
            .collect()
    }

    /// Highest round number generated for a group (0 if none).
    pub fn latest_round(&self, group_number: u32) -> u32 {
        self.group_matches(group_number)
            .iter()
            .map(|m| m.round_number)
            .max()
            .unwrap_or(0)
    }

    pub fn confirmations_for(&self, match_id: MatchId) -> Vec<ScoreConfirmation> {
        self.confirmations
            .iter()
            .filter(|c| c.match_id == match_id)
            .cloned()
            .collect()
    }
}
