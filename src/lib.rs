//! Carrom tournament engine: library with models and business logic.

pub mod config;
pub mod logic;
pub mod models;

pub use config::{EngineConfig, ServerConfig};
pub use logic::{
    assign_groups, compute_seeding, generate_matchups, generate_round_robin, generate_seeding,
    pair_round_one, pair_swiss, score_match, submit_confirmation, ConsensusDecision,
};
pub use models::{
    ErrorKind, GroupMethod, Match, MatchId, Player, PlayerId, RoundOneMethod, Tournament,
    TournamentError, TournamentId, TournamentSettings,
};
