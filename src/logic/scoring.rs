//! Carrom board scoring: validate submitted boards, derive points, aggregate match scores,
//! apply sudden death, and digest the payload for confirmation consensus.

use crate::models::{
    Board, BoardSubmission, MatchPayload, MatchSubmission, PlayerId, SuddenDeath,
    SuddenDeathSubmission, TournamentError, REGULATION_BOARDS, TIEBREAKER_BOARD,
};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Coins per side; a side scores one point per opposing coin left on the board.
pub const COINS_PER_SIDE: u8 = 9;
pub const QUEEN_BONUS: u8 = 3;
pub const MAX_BOARD_POINTS: u8 = 13;
pub const MAX_SUDDEN_DEATH_ATTEMPTS: u8 = 3;

/// Validated payload, aggregate score and digest for one submission.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScoreSheet {
    pub score1: u32,
    pub score2: u32,
    pub payload: MatchPayload,
    pub digest: String,
}

/// Which side of a board pocketed the queen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueenSide {
    Striker,
    NonStriker,
}

/// Points (striker, non-striker) from pocket counts.
///
/// Each side scores 9 minus the other side's pocketed count, plus 3 for the queen, capped at 13.
pub fn derive_board_points(
    striker_pocketed: u8,
    non_striker_pocketed: u8,
    queen: Option<QueenSide>,
) -> (u8, u8) {
    let mut striker = COINS_PER_SIDE.saturating_sub(non_striker_pocketed);
    let mut non_striker = COINS_PER_SIDE.saturating_sub(striker_pocketed);
    match queen {
        Some(QueenSide::Striker) => striker += QUEEN_BONUS,
        Some(QueenSide::NonStriker) => non_striker += QUEEN_BONUS,
        None => {}
    }
    (striker.min(MAX_BOARD_POINTS), non_striker.min(MAX_BOARD_POINTS))
}

fn participant(id: PlayerId, player1: PlayerId, player2: PlayerId) -> Result<PlayerId, TournamentError> {
    if id == player1 || id == player2 {
        Ok(id)
    } else {
        Err(TournamentError::UnknownParticipant(id))
    }
}

/// An explicit winner must not have fewer points than the opponent; on level points it decides
/// the board.
fn score_board(
    raw: &BoardSubmission,
    player1: PlayerId,
    player2: PlayerId,
) -> Result<Board, TournamentError> {
    let board = raw.board_number;
    let striker_id = participant(
        raw.striker_id.ok_or(TournamentError::MissingField {
            board,
            field: "striker_id",
        })?,
        player1,
        player2,
    )?;
    let non_striker_id = if striker_id == player1 { player2 } else { player1 };
    if let Some(given) = raw.non_striker_id {
        if given != non_striker_id {
            return Err(TournamentError::UnknownParticipant(given));
        }
    }
    for count in [raw.striker_pocketed, raw.non_striker_pocketed].into_iter().flatten() {
        if count > COINS_PER_SIDE {
            return Err(TournamentError::PocketCountOutOfRange { board, count });
        }
    }
    let queen = raw
        .queen_pocketed_by
        .map(|q| participant(q, player1, player2))
        .transpose()?;

    let (striker_points, non_striker_points) = match (raw.striker_points, raw.non_striker_points) {
        (Some(s), Some(n)) => {
            for points in [s, n] {
                if points > MAX_BOARD_POINTS {
                    return Err(TournamentError::PointsOutOfRange { board, points });
                }
            }
            (s, n)
        }
        (None, None) => {
            let striker_pocketed = raw.striker_pocketed.ok_or(TournamentError::MissingField {
                board,
                field: "striker_pocketed",
            })?;
            let non_striker_pocketed =
                raw.non_striker_pocketed.ok_or(TournamentError::MissingField {
                    board,
                    field: "non_striker_pocketed",
                })?;
            let side = queen.map(|q| {
                if q == striker_id {
                    QueenSide::Striker
                } else {
                    QueenSide::NonStriker
                }
            });
            derive_board_points(striker_pocketed, non_striker_pocketed, side)
        }
        (Some(_), None) => {
            return Err(TournamentError::MissingField {
                board,
                field: "non_striker_points",
            })
        }
        (None, Some(_)) => {
            return Err(TournamentError::MissingField {
                board,
                field: "striker_points",
            })
        }
    };

    let winner_id = match raw.winner_id {
        Some(w) => {
            let w = participant(w, player1, player2)?;
            let (own, other) = if w == striker_id {
                (striker_points, non_striker_points)
            } else {
                (non_striker_points, striker_points)
            };
            if own < other {
                return Err(TournamentError::WinnerContradictsPoints { board, winner: w });
            }
            Some(w)
        }
        None if striker_points > non_striker_points => Some(striker_id),
        None if non_striker_points > striker_points => Some(non_striker_id),
        None => None,
    };

    Ok(Board {
        board_number: board,
        striker_id,
        non_striker_id,
        striker_color: raw.striker_color,
        non_striker_color: raw.non_striker_color,
        striker_pocketed: raw.striker_pocketed,
        non_striker_pocketed: raw.non_striker_pocketed,
        queen_pocketed_by: queen,
        striker_points,
        non_striker_points,
        winner_id,
        is_tiebreaker: board == TIEBREAKER_BOARD,
    })
}

fn totals<'a>(boards: impl Iterator<Item = &'a Board>, player1: PlayerId, player2: PlayerId) -> (u32, u32) {
    boards.fold((0, 0), |(a, b), board| {
        (a + board.points_for(player1), b + board.points_for(player2))
    })
}

fn score_sudden_death(
    raw: &SuddenDeathSubmission,
    player1: PlayerId,
    player2: PlayerId,
) -> Result<SuddenDeath, TournamentError> {
    let winner_id = participant(
        raw.winner_id.ok_or(TournamentError::SuddenDeathWithoutWinner)?,
        player1,
        player2,
    )?;
    if !(1..=MAX_SUDDEN_DEATH_ATTEMPTS).contains(&raw.attempts) {
        return Err(TournamentError::InvalidSuddenDeathAttempts(raw.attempts));
    }
    Ok(SuddenDeath {
        winner_id,
        player1_hits: raw.player1_hits,
        player2_hits: raw.player2_hits,
        attempts: raw.attempts,
    })
}

/// Validate a submission for the match `player1` vs `player2` and compute its score.
///
/// Board numbers must be unique and in 1..=9. Board 9 needs all eight regulation boards and a
/// tied regulation total. Sudden death is only accepted when all regulation boards are present
/// and the total over every submitted board, board 9 included, is tied; its winner gets one
/// extra point. A tie without sudden death stays tied.
pub fn score_match(
    submission: &MatchSubmission,
    player1: PlayerId,
    player2: PlayerId,
) -> Result<ScoreSheet, TournamentError> {
    let mut seen = BTreeSet::new();
    for raw in &submission.boards {
        if !(1..=TIEBREAKER_BOARD).contains(&raw.board_number) {
            return Err(TournamentError::InvalidBoardNumber(raw.board_number));
        }
        if !seen.insert(raw.board_number) {
            return Err(TournamentError::DuplicateBoard(raw.board_number));
        }
    }
    let regulation_complete = (1..=REGULATION_BOARDS).all(|n| seen.contains(&n));

    let mut boards = submission
        .boards
        .iter()
        .map(|raw| score_board(raw, player1, player2))
        .collect::<Result<Vec<_>, _>>()?;
    boards.sort_by_key(|b| b.board_number);

    if seen.contains(&TIEBREAKER_BOARD) {
        if !regulation_complete {
            return Err(TournamentError::PrematureTiebreaker);
        }
        let (r1, r2) = totals(boards.iter().filter(|b| !b.is_tiebreaker), player1, player2);
        if r1 != r2 {
            return Err(TournamentError::TiebreakerWithoutTie);
        }
    }

    let toss = match &submission.toss {
        Some(t) => {
            participant(t.winner_id, player1, player2)?;
            Some(t.clone())
        }
        None => None,
    };

    let (mut score1, mut score2) = totals(boards.iter(), player1, player2);
    let sudden_death = match &submission.sudden_death {
        Some(raw) => {
            if !regulation_complete || score1 != score2 {
                return Err(TournamentError::SuddenDeathWithoutTie);
            }
            let sd = score_sudden_death(raw, player1, player2)?;
            if sd.winner_id == player1 {
                score1 += 1;
            } else {
                score2 += 1;
            }
            Some(sd)
        }
        None => None,
    };

    let payload = MatchPayload {
        toss,
        boards,
        sudden_death,
    };
    let digest = payload_digest(&payload)?;
    Ok(ScoreSheet {
        score1,
        score2,
        payload,
        digest,
    })
}

/// Hex SHA-256 of the payload serialised as JSON with object keys sorted.
pub fn payload_digest(payload: &MatchPayload) -> Result<String, TournamentError> {
    let value = serde_json::to_value(payload)
        .map_err(|e| TournamentError::Serialization(e.to_string()))?;
    let canonical = canonicalize(value).to_string();
    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, canonicalize(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
