//! Data structures for the carrom tournament: players, seeding, matches, tournament state.

mod game;
mod player;
mod seeding;
mod tournament;

pub use game::{
    Board, BoardSubmission, CoinColor, ConfirmationRequest, Match, MatchId, MatchPayload,
    MatchStatus, MatchSubmission, Pairing, RoundOneMethod, ScoreConfirmation, SuddenDeath,
    SuddenDeathSubmission, Toss, TossDecision, REGULATION_BOARDS, TIEBREAKER_BOARD,
};
pub use player::{GroupPlayer, Player, PlayerId};
pub use seeding::{
    GroupAssignment, GroupMethod, MatchMethod, RankingList, RankingRow, SeedSource, SeedingRow,
};
pub use tournament::{ErrorKind, Tournament, TournamentError, TournamentId, TournamentSettings};
