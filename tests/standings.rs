//! Integration tests for standings, per-round points and the live snapshot.

use carrom_tournament::logic::{
    current_round, live_snapshot, round_points, rounds, standings, standings_by_round,
};
use carrom_tournament::models::{
    Match, MatchPayload, MatchStatus, Pairing, Player, ScoreConfirmation,
};
use chrono::Utc;
use uuid::Uuid;

fn players() -> Vec<Player> {
    (1..=4).map(|id| Player::new(id, format!("P{id}"))).collect()
}

fn fixture(id: u64, round: u32, a: u64, b: u64, score: Option<(u32, u32)>) -> Match {
    let mut m = Match::new(id, Uuid::nil(), 1, round, id as u32, Pairing::new(a, b));
    if let Some((s1, s2)) = score {
        m.finalize(s1, s2, MatchPayload::default(), Utc::now()).unwrap();
    }
    m
}

/// Round 1 fully played; round 2 has one result still open.
fn season() -> Vec<Match> {
    vec![
        fixture(1, 1, 1, 2, Some((30, 10))),
        fixture(2, 1, 3, 4, Some((20, 20))),
        fixture(3, 2, 1, 3, Some((10, 25))),
        fixture(4, 2, 2, 4, None),
    ]
}

fn claim(match_id: u64, player_id: u64, score1: u32, score2: u32) -> ScoreConfirmation {
    let now = Utc::now();
    ScoreConfirmation {
        match_id,
        player_id,
        score1,
        score2,
        digest: "d".to_string(),
        payload: MatchPayload::default(),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn table_counts_confirmed_results_only() {
    let table = standings(&players(), &season(), None);
    let order: Vec<u64> = table.iter().map(|r| r.player_id).collect();
    assert_eq!(order, vec![3, 1, 4, 2]);
    assert_eq!(
        table.iter().map(|r| r.position).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    let three = &table[0];
    assert_eq!((three.played, three.wins, three.draws, three.losses), (2, 1, 1, 0));
    assert_eq!((three.score_for, three.score_against), (45, 30));
    assert_eq!(three.score_difference, 15);
    assert_eq!(three.points, 4);

    let two = &table[3];
    assert_eq!((two.played, two.losses, two.points), (1, 1, 0));
    assert_eq!(two.score_difference, -20);
}

#[test]
fn table_up_to_a_round() {
    let table = standings(&players(), &season(), Some(1));
    let order: Vec<u64> = table.iter().map(|r| r.player_id).collect();
    // 3 and 4 are level on everything; name decides.
    assert_eq!(order, vec![1, 3, 4, 2]);
    assert_eq!(table[0].round_points, 3);
    assert_eq!(table[1].round_points, 1);
}

#[test]
fn by_round_marks_incomplete_rounds() {
    let by_round = standings_by_round(&players(), &season());
    assert_eq!(by_round.len(), 2);
    assert!(by_round[0].is_complete);
    assert!(!by_round[1].is_complete);
    assert_eq!(by_round[1].standings[0].player_id, 3);
}

#[test]
fn round_points_per_round() {
    let points = round_points(&players(), &season());
    let first: Vec<(u64, u32)> = points[0].points.iter().map(|p| (p.player_id, p.points)).collect();
    assert_eq!(first, vec![(1, 3), (3, 1), (4, 1), (2, 0)]);
    let second: Vec<(u64, u32)> = points[1].points.iter().map(|p| (p.player_id, p.points)).collect();
    assert_eq!(second, vec![(3, 3), (1, 0), (2, 0), (4, 0)]);
}

#[test]
fn current_round_is_the_first_open_one() {
    assert_eq!(current_round(&[]), None);
    assert_eq!(current_round(&season()), Some(2));

    let mut done = season();
    done[3]
        .finalize(5, 5, MatchPayload::default(), Utc::now())
        .unwrap();
    assert_eq!(current_round(&done), Some(2));
    assert_eq!(current_round(&done[..2]), Some(1));
}

#[test]
fn rounds_show_match_status() {
    let confirmations = vec![claim(4, 2, 10, 5), claim(4, 4, 5, 10)];
    let views = rounds(&season(), &confirmations);
    assert_eq!(views.len(), 2);
    assert!(views[0].is_complete);
    assert!(!views[1].is_complete);

    let open = views[1].matches.iter().find(|m| m.id == 4).unwrap();
    assert_eq!(open.status, MatchStatus::Disputed);
    assert_eq!(open.confirmations, 2);
    assert_eq!(open.confirmed_score1, None);

    let settled = views[1].matches.iter().find(|m| m.id == 3).unwrap();
    assert_eq!(settled.status, MatchStatus::Confirmed);
    assert_eq!((settled.confirmed_score1, settled.confirmed_score2), (Some(10), Some(25)));
}

#[test]
fn single_claim_is_pending() {
    let views = rounds(&season(), &[claim(4, 2, 10, 5)]);
    let open = views[1].matches.iter().find(|m| m.id == 4).unwrap();
    assert_eq!(open.status, MatchStatus::Pending);
}

#[test]
fn live_snapshot_bundles_everything() {
    let now = Utc::now();
    let snapshot = live_snapshot(&players(), &season(), &[], now);
    assert_eq!(snapshot.generated_at, now);
    assert_eq!(snapshot.current_round, Some(2));
    assert_eq!(snapshot.rounds.len(), 2);
    assert_eq!(snapshot.standings.len(), 4);
    assert_eq!(snapshot.standings[0].player_id, 3);
}
