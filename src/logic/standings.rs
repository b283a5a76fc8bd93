//! League table, per-round points and the live snapshot built from confirmed matches.

use crate::logic::confirmation::match_status;
use crate::logic::swiss::match_points;
use crate::models::{Match, MatchId, MatchStatus, Player, PlayerId, ScoreConfirmation};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StandingRow {
    pub position: u32,
    pub player_id: PlayerId,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub score_for: u32,
    pub score_against: u32,
    pub score_difference: i64,
    /// Points earned in `up_to_round` only (0 without a round filter).
    pub round_points: u32,
    pub points: u32,
}

/// Standings over confirmed matches, optionally only up to and including `up_to_round`.
///
/// Ordered by points, score difference and score for (all descending), then name.
pub fn standings(players: &[Player], matches: &[Match], up_to_round: Option<u32>) -> Vec<StandingRow> {
    let mut rows: HashMap<PlayerId, StandingRow> = players
        .iter()
        .map(|p| {
            (
                p.id,
                StandingRow {
                    player_id: p.id,
                    name: p.name.clone(),
                    ..StandingRow::default()
                },
            )
        })
        .collect();

    let mut counted: Vec<&Match> = matches
        .iter()
        .filter(|m| up_to_round.map_or(true, |r| m.round_number <= r))
        .collect();
    counted.sort_by_key(|m| (m.round_number, m.id));

    for m in counted {
        let Some((score1, score2)) = m.confirmed_scores() else {
            continue;
        };
        let (points1, points2) = match_points(score1, score2);
        let in_round = up_to_round == Some(m.round_number);
        for (player, scored, conceded, points) in [
            (m.player1_id, score1, score2, points1),
            (m.player2_id, score2, score1, points2),
        ] {
            let Some(row) = rows.get_mut(&player) else {
                continue;
            };
            row.played += 1;
            row.score_for += scored;
            row.score_against += conceded;
            row.points += points;
            if in_round {
                row.round_points += points;
            }
            match scored.cmp(&conceded) {
                std::cmp::Ordering::Greater => row.wins += 1,
                std::cmp::Ordering::Less => row.losses += 1,
                std::cmp::Ordering::Equal => row.draws += 1,
            }
        }
    }

    let mut ordered: Vec<StandingRow> = rows
        .into_values()
        .map(|mut r| {
            r.score_difference = i64::from(r.score_for) - i64::from(r.score_against);
            r
        })
        .collect();
    ordered.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.score_difference.cmp(&a.score_difference))
            .then(b.score_for.cmp(&a.score_for))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then(a.player_id.cmp(&b.player_id))
    });
    for (i, row) in ordered.iter_mut().enumerate() {
        row.position = i as u32 + 1;
    }
    ordered
}

fn round_numbers(matches: &[Match]) -> BTreeSet<u32> {
    matches.iter().map(|m| m.round_number).collect()
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundStandings {
    pub round_number: u32,
    pub is_complete: bool,
    pub standings: Vec<StandingRow>,
}

/// Standings after each round that has matches.
pub fn standings_by_round(players: &[Player], matches: &[Match]) -> Vec<RoundStandings> {
    round_numbers(matches)
        .into_iter()
        .map(|round_number| RoundStandings {
            round_number,
            is_complete: matches
                .iter()
                .filter(|m| m.round_number == round_number)
                .all(Match::is_confirmed),
            standings: standings(players, matches, Some(round_number)),
        })
        .collect()
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlayerRoundPoints {
    pub player_id: PlayerId,
    pub name: String,
    pub points: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundPoints {
    pub round_number: u32,
    pub points: Vec<PlayerRoundPoints>,
}

/// Match points each player earned in each round, best first.
pub fn round_points(players: &[Player], matches: &[Match]) -> Vec<RoundPoints> {
    round_numbers(matches)
        .into_iter()
        .map(|round_number| {
            let mut totals: BTreeMap<PlayerId, u32> = players.iter().map(|p| (p.id, 0)).collect();
            for m in matches.iter().filter(|m| m.round_number == round_number) {
                if let Some((s1, s2)) = m.confirmed_scores() {
                    let (p1, p2) = match_points(s1, s2);
                    *totals.entry(m.player1_id).or_default() += p1;
                    *totals.entry(m.player2_id).or_default() += p2;
                }
            }
            let mut points: Vec<PlayerRoundPoints> = players
                .iter()
                .map(|p| PlayerRoundPoints {
                    player_id: p.id,
                    name: p.name.clone(),
                    points: totals.get(&p.id).copied().unwrap_or(0),
                })
                .collect();
            points.sort_by(|a, b| {
                b.points
                    .cmp(&a.points)
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            });
            RoundPoints {
                round_number,
                points,
            }
        })
        .collect()
}

/// Lowest round with an unconfirmed match; otherwise the last round; None without matches.
pub fn current_round(matches: &[Match]) -> Option<u32> {
    matches
        .iter()
        .filter(|m| !m.is_confirmed())
        .map(|m| m.round_number)
        .min()
        .or_else(|| matches.iter().map(|m| m.round_number).max())
}

/// A match as listed to players, with its confirmation state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchView {
    pub id: MatchId,
    pub group_number: u32,
    pub round_number: u32,
    pub table_number: u32,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub status: MatchStatus,
    pub confirmed_score1: Option<u32>,
    pub confirmed_score2: Option<u32>,
    pub confirmations: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundView {
    pub round_number: u32,
    pub is_complete: bool,
    pub matches: Vec<MatchView>,
}

/// Matches grouped by round, ordered by round, table and id.
pub fn rounds(matches: &[Match], confirmations: &[ScoreConfirmation]) -> Vec<RoundView> {
    let mut by_round: BTreeMap<u32, Vec<MatchView>> = BTreeMap::new();
    let mut ordered: Vec<&Match> = matches.iter().collect();
    ordered.sort_by_key(|m| (m.round_number, m.table_number, m.id));
    for m in ordered {
        let own: Vec<ScoreConfirmation> = confirmations
            .iter()
            .filter(|c| c.match_id == m.id)
            .cloned()
            .collect();
        by_round.entry(m.round_number).or_default().push(MatchView {
            id: m.id,
            group_number: m.group_number,
            round_number: m.round_number,
            table_number: m.table_number,
            player1_id: m.player1_id,
            player2_id: m.player2_id,
            status: match_status(m, &own),
            confirmed_score1: m.confirmed_score1,
            confirmed_score2: m.confirmed_score2,
            confirmations: own.len(),
        });
    }
    by_round
        .into_iter()
        .map(|(round_number, matches)| RoundView {
            round_number,
            is_complete: matches.iter().all(|m| m.status == MatchStatus::Confirmed),
            matches,
        })
        .collect()
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LiveSnapshot {
    pub generated_at: DateTime<Utc>,
    pub current_round: Option<u32>,
    pub rounds: Vec<RoundView>,
    pub standings: Vec<StandingRow>,
}

pub fn live_snapshot(
    players: &[Player],
    matches: &[Match],
    confirmations: &[ScoreConfirmation],
    now: DateTime<Utc>,
) -> LiveSnapshot {
    LiveSnapshot {
        generated_at: now,
        current_round: current_round(matches),
        rounds: rounds(matches, confirmations),
        standings: standings(players, matches, None),
    }
}
