//! Tournament engine: seeding, grouping, pairing, scoring, confirmation and standings.

mod confirmation;
mod grouping;
mod import;
mod round_one;
mod round_robin;
mod scoring;
mod seeding;
mod standings;
mod swiss;
mod tables;
mod workflow;

pub use confirmation::{
    build_confirmation, confirm, evaluate_consensus, match_status, upsert_confirmation,
    ConsensusDecision, MAX_REPORTED_SCORE,
};
pub use grouping::{assign_groups, MAX_GROUPS, MIN_GROUPS};
pub use import::{parse_players_csv, parse_ranking_csv};
pub use round_one::pair_round_one;
pub use round_robin::generate_round_robin;
pub use scoring::{
    derive_board_points, payload_digest, score_match, QueenSide, ScoreSheet, COINS_PER_SIDE,
    MAX_BOARD_POINTS, MAX_SUDDEN_DEATH_ATTEMPTS, QUEEN_BONUS,
};
pub use seeding::{
    compute_seeding, infer_national_country, normalize_country, normalize_email, normalize_name,
    override_seed, SeedingOutcome,
};
pub use standings::{
    current_round, live_snapshot, round_points, rounds, standings, standings_by_round,
    LiveSnapshot, MatchView, PlayerRoundPoints, RoundPoints, RoundStandings, RoundView,
    StandingRow,
};
pub use swiss::{
    match_points, pair_swiss, perfect_matching, swiss_standings, PlayedPairs, SearchBudget,
    SwissStanding,
};
pub use tables::assign_tables;
pub use workflow::{
    delete_groups, delete_round, delete_seeding, generate_groups, generate_matchups,
    generate_seeding, override_player_seed, seed_demo_round_robin, submit_confirmation,
};
