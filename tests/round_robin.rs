//! Integration tests for the circle-method round robin.

use carrom_tournament::logic::generate_round_robin;
use std::collections::HashSet;

fn unordered(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

#[test]
fn four_players_follow_the_circle() {
    let rounds = generate_round_robin(&[1u32, 2, 3, 4]);
    assert_eq!(
        rounds,
        vec![
            vec![(4, 1), (2, 3)],
            vec![(1, 3), (4, 2)],
            vec![(2, 1), (3, 4)],
        ]
    );
}

#[test]
fn fixed_player_alternates_sides() {
    let rounds = generate_round_robin(&[1u32, 2, 3, 4, 5, 6]);
    let sides: Vec<bool> = rounds
        .iter()
        .map(|r| r.iter().any(|&(left, _)| left == 1))
        .collect();
    assert_eq!(sides, vec![false, true, false, true, false]);
}

#[test]
fn every_pair_meets_exactly_once() {
    for n in 2..=10u32 {
        let players: Vec<u32> = (1..=n).collect();
        let rounds = generate_round_robin(&players);
        let expected_rounds = if n % 2 == 0 { n - 1 } else { n };
        assert_eq!(rounds.len() as u32, expected_rounds, "n = {n}");

        let mut seen = HashSet::new();
        for round in &rounds {
            let mut in_round = HashSet::new();
            for &(a, b) in round {
                assert_ne!(a, b);
                assert!(in_round.insert(a) && in_round.insert(b), "n = {n}: double booked");
                assert!(seen.insert(unordered(a, b)), "n = {n}: repeat {a}-{b}");
            }
        }
        assert_eq!(seen.len() as u32, n * (n - 1) / 2, "n = {n}");
    }
}

#[test]
fn odd_field_gives_one_bye_per_round() {
    let rounds = generate_round_robin(&[1u32, 2, 3, 4, 5]);
    assert_eq!(rounds.len(), 5);
    assert!(rounds.iter().all(|r| r.len() == 2));
}

#[test]
fn fewer_than_two_players_have_no_schedule() {
    assert!(generate_round_robin::<u32>(&[]).is_empty());
    assert!(generate_round_robin(&[1u32]).is_empty());
}
