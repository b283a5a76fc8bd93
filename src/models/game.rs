//! Match, boards, sudden death, toss and score confirmations for 1v1 carrom games.

use crate::models::player::PlayerId;
use crate::models::tournament::{TournamentError, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a match, allocated by incrementing the tournament's counter.
pub type MatchId = u64;

/// Highest regular board number; board 9 is the tiebreaker.
pub const REGULATION_BOARDS: u8 = 8;
pub const TIEBREAKER_BOARD: u8 = 9;

/// Coin colour a player strikes for on a board.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinColor {
    White,
    Black,
}

/// What the toss winner elected.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossDecision {
    /// Break (strike first).
    Break,
    /// Pick the side of the board / coin colour instead.
    Side,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Toss {
    pub winner_id: PlayerId,
    pub decision: TossDecision,
}

/// One scored board. Points per side are in 0..=13.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub board_number: u8,
    pub striker_id: PlayerId,
    pub non_striker_id: PlayerId,
    pub striker_color: Option<CoinColor>,
    pub non_striker_color: Option<CoinColor>,
    pub striker_pocketed: Option<u8>,
    pub non_striker_pocketed: Option<u8>,
    pub queen_pocketed_by: Option<PlayerId>,
    pub striker_points: u8,
    pub non_striker_points: u8,
    /// None when the board is tied.
    pub winner_id: Option<PlayerId>,
    pub is_tiebreaker: bool,
}

impl Board {
    /// Points this board contributes to `player`'s match total (0 if not on the board).
    pub fn points_for(&self, player: PlayerId) -> u32 {
        if player == self.striker_id {
            u32::from(self.striker_points)
        } else if player == self.non_striker_id {
            u32::from(self.non_striker_points)
        } else {
            0
        }
    }
}

/// Sudden-death decider after tied boards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SuddenDeath {
    pub winner_id: PlayerId,
    pub player1_hits: u8,
    pub player2_hits: u8,
    /// 1..=3
    pub attempts: u8,
}

/// Raw board as submitted by a player: either explicit points or pocket statistics.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSubmission {
    pub board_number: u8,
    pub striker_id: Option<PlayerId>,
    pub non_striker_id: Option<PlayerId>,
    pub striker_color: Option<CoinColor>,
    pub non_striker_color: Option<CoinColor>,
    pub striker_pocketed: Option<u8>,
    pub non_striker_pocketed: Option<u8>,
    pub queen_pocketed_by: Option<PlayerId>,
    pub striker_points: Option<u8>,
    pub non_striker_points: Option<u8>,
    pub winner_id: Option<PlayerId>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuddenDeathSubmission {
    pub winner_id: Option<PlayerId>,
    pub player1_hits: u8,
    pub player2_hits: u8,
    pub attempts: u8,
}

/// Everything a player submits about how a match was played.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSubmission {
    pub toss: Option<Toss>,
    pub boards: Vec<BoardSubmission>,
    pub sudden_death: Option<SuddenDeathSubmission>,
}

/// A player's confirmation of a match: an explicit score, the boards it was played with, or both.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationRequest {
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    #[serde(flatten)]
    pub submission: MatchSubmission,
}

impl ConfirmationRequest {
    /// Score-only confirmation, as the simple result form sends it.
    pub fn scores(score1: u32, score2: u32) -> Self {
        Self {
            score1: Some(score1),
            score2: Some(score2),
            submission: MatchSubmission::default(),
        }
    }

    pub fn boards(submission: MatchSubmission) -> Self {
        Self {
            score1: None,
            score2: None,
            submission,
        }
    }
}

/// Validated toss/boards/sudden-death payload; the part of a match covered by the digest.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchPayload {
    pub toss: Option<Toss>,
    pub boards: Vec<Board>,
    pub sudden_death: Option<SuddenDeath>,
}

/// One player's report of a match result. At most one per (match, player).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfirmation {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub score1: u32,
    pub score2: u32,
    pub digest: String,
    pub payload: MatchPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScoreConfirmation {
    /// The (score pair, digest) tuple compared for consensus.
    pub fn signature(&self) -> (u32, u32, &str) {
        (self.score1, self.score2, self.digest.as_str())
    }
}

/// Confirmation state of a match as shown to players.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Disputed,
    Confirmed,
}

/// Round-one pairing policy.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOneMethod {
    /// 1v2, 3v4, ...
    #[default]
    Adjacent,
    /// Seed i against seed i + N/2.
    TopVsTop,
    /// Seed i against seed N-1-i.
    TopVsBottom,
}

impl std::str::FromStr for RoundOneMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjacent" => Ok(RoundOneMethod::Adjacent),
            "top_vs_top" => Ok(RoundOneMethod::TopVsTop),
            "top_vs_bottom" => Ok(RoundOneMethod::TopVsBottom),
            other => Err(format!("unknown round one method '{other}'")),
        }
    }
}

/// Two players drawn against each other. `player1_id` is the higher-placed player.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
}

impl Pairing {
    pub fn new(player1_id: PlayerId, player2_id: PlayerId) -> Self {
        Self {
            player1_id,
            player2_id,
        }
    }
}

/// A single 1v1 match in a group round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub group_number: u32,
    pub round_number: u32,
    pub table_number: u32,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    /// None until both players confirmed the same result.
    pub confirmed_score1: Option<u32>,
    pub confirmed_score2: Option<u32>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub toss: Option<Toss>,
    pub boards: Vec<Board>,
    pub sudden_death: Option<SuddenDeath>,
}

impl Match {
    pub fn new(
        id: MatchId,
        tournament_id: TournamentId,
        group_number: u32,
        round_number: u32,
        table_number: u32,
        pairing: Pairing,
    ) -> Self {
        Self {
            id,
            tournament_id,
            group_number,
            round_number,
            table_number,
            player1_id: pairing.player1_id,
            player2_id: pairing.player2_id,
            confirmed_score1: None,
            confirmed_score2: None,
            confirmed_at: None,
            toss: None,
            boards: Vec::new(),
            sudden_death: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_score1.is_some() && self.confirmed_score2.is_some()
    }

    /// Confirmed score pair, if finalized.
    pub fn confirmed_scores(&self) -> Option<(u32, u32)> {
        self.confirmed_score1.zip(self.confirmed_score2)
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.player1_id == player || self.player2_id == player
    }

    /// Write the agreed result. A confirmed match is immutable; finalizing twice is a conflict.
    pub fn finalize(
        &mut self,
        score1: u32,
        score2: u32,
        payload: MatchPayload,
        at: DateTime<Utc>,
    ) -> Result<(), TournamentError> {
        if self.is_confirmed() {
            return Err(TournamentError::MatchAlreadyConfirmed(self.id));
        }
        self.confirmed_score1 = Some(score1);
        self.confirmed_score2 = Some(score2);
        self.confirmed_at = Some(at);
        self.toss = payload.toss;
        self.boards = payload.boards;
        self.sudden_death = payload.sudden_death;
        Ok(())
    }
}
