//! Two-party score confirmation: a match is final once every confirmation agrees.

use crate::logic::scoring::score_match;
use crate::models::{
    ConfirmationRequest, Match, MatchStatus, PlayerId, ScoreConfirmation, TournamentError,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

pub const MAX_REPORTED_SCORE: u32 = 999;

/// Outcome of re-checking a match's confirmations.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsensusDecision {
    /// Fewer than two confirmations.
    Pending,
    /// Two or more confirmations that disagree.
    Disputed,
    /// All (at least two) confirmations carry the same score pair and digest.
    Finalized {
        score1: u32,
        score2: u32,
        digest: String,
    },
}

/// Apply the consensus rule to every confirmation of one match.
pub fn evaluate_consensus(confirmations: &[ScoreConfirmation]) -> ConsensusDecision {
    let [first, rest @ ..] = confirmations else {
        return ConsensusDecision::Pending;
    };
    if rest.is_empty() {
        return ConsensusDecision::Pending;
    }
    if rest.iter().all(|c| c.signature() == first.signature()) {
        ConsensusDecision::Finalized {
            score1: first.score1,
            score2: first.score2,
            digest: first.digest.clone(),
        }
    } else {
        ConsensusDecision::Disputed
    }
}

/// Status shown for a match given its confirmations.
pub fn match_status(m: &Match, confirmations: &[ScoreConfirmation]) -> MatchStatus {
    if m.is_confirmed() {
        return MatchStatus::Confirmed;
    }
    let distinct: HashSet<(u32, u32, &str)> = confirmations
        .iter()
        .filter(|c| c.match_id == m.id)
        .map(|c| c.signature())
        .collect();
    if distinct.len() > 1 {
        MatchStatus::Disputed
    } else {
        MatchStatus::Pending
    }
}

/// Validate `request` from `submitter` against `m` and turn it into a confirmation.
///
/// When boards are submitted their aggregate is the reported score; an explicit score that
/// disagrees with the boards is rejected. Without boards both scores are required.
pub fn build_confirmation(
    m: &Match,
    submitter: PlayerId,
    request: &ConfirmationRequest,
    now: DateTime<Utc>,
) -> Result<ScoreConfirmation, TournamentError> {
    if !m.involves(submitter) {
        return Err(TournamentError::NotMatchParticipant {
            match_id: m.id,
            player_id: submitter,
        });
    }
    if m.is_confirmed() {
        return Err(TournamentError::MatchAlreadyConfirmed(m.id));
    }
    for score in [request.score1, request.score2].into_iter().flatten() {
        if score > MAX_REPORTED_SCORE {
            return Err(TournamentError::ScoreOutOfRange(score));
        }
    }

    let sheet = score_match(&request.submission, m.player1_id, m.player2_id)?;
    let (score1, score2) = if request.submission.boards.is_empty() {
        match (request.score1, request.score2) {
            (Some(s1), Some(s2)) => (s1, s2),
            _ => return Err(TournamentError::MissingScore),
        }
    } else {
        match (request.score1, request.score2) {
            (Some(s1), Some(s2)) if (s1, s2) != (sheet.score1, sheet.score2) => {
                return Err(TournamentError::ScoreMismatch {
                    reported1: s1,
                    reported2: s2,
                    computed1: sheet.score1,
                    computed2: sheet.score2,
                })
            }
            (Some(_), None) | (None, Some(_)) => return Err(TournamentError::MissingScore),
            _ => (sheet.score1, sheet.score2),
        }
    };

    Ok(ScoreConfirmation {
        match_id: m.id,
        player_id: submitter,
        score1,
        score2,
        digest: sheet.digest,
        payload: sheet.payload,
        created_at: now,
        updated_at: now,
    })
}

/// Insert or replace the submitter's confirmation (last write wins, creation time kept).
pub fn upsert_confirmation(confirmations: &mut Vec<ScoreConfirmation>, new: ScoreConfirmation) {
    match confirmations
        .iter_mut()
        .find(|c| c.match_id == new.match_id && c.player_id == new.player_id)
    {
        Some(existing) => {
            let created_at = existing.created_at;
            *existing = ScoreConfirmation { created_at, ..new };
        }
        None => confirmations.push(new),
    }
}

/// Record `new` against `existing` confirmations of an open match and decide the match.
///
/// Returns the updated confirmation set and the decision. This is a pure function; the caller
/// finalizes the match when the decision is [`ConsensusDecision::Finalized`].
pub fn confirm(
    m: &Match,
    existing: &[ScoreConfirmation],
    new: ScoreConfirmation,
) -> Result<(Vec<ScoreConfirmation>, ConsensusDecision), TournamentError> {
    if m.is_confirmed() {
        return Err(TournamentError::MatchAlreadyConfirmed(m.id));
    }
    if !m.involves(new.player_id) {
        return Err(TournamentError::NotMatchParticipant {
            match_id: m.id,
            player_id: new.player_id,
        });
    }
    let mut updated: Vec<ScoreConfirmation> = existing
        .iter()
        .filter(|c| c.match_id == m.id)
        .cloned()
        .collect();
    upsert_confirmation(&mut updated, new);
    let decision = evaluate_consensus(&updated);
    Ok((updated, decision))
}
