//! Integration tests for seed-based round-one pairing.

use carrom_tournament::logic::pair_round_one;
use carrom_tournament::models::{GroupPlayer, Pairing, RoundOneMethod, TournamentError};

/// Players with seed s and id 10 * s, listed out of seed order.
fn group(n: u32) -> Vec<GroupPlayer> {
    (1..=n)
        .rev()
        .map(|seed| GroupPlayer::new(u64::from(seed) * 10, format!("P{seed}"), seed))
        .collect()
}

fn ids(pairings: &[Pairing]) -> Vec<(u64, u64)> {
    pairings.iter().map(|p| (p.player1_id, p.player2_id)).collect()
}

#[test]
fn adjacent_pairs_neighbouring_seeds() {
    let pairings = pair_round_one(&group(8), RoundOneMethod::Adjacent).unwrap();
    assert_eq!(ids(&pairings), vec![(10, 20), (30, 40), (50, 60), (70, 80)]);
}

#[test]
fn top_vs_top_pairs_halves() {
    let pairings = pair_round_one(&group(8), RoundOneMethod::TopVsTop).unwrap();
    assert_eq!(ids(&pairings), vec![(10, 50), (20, 60), (30, 70), (40, 80)]);
}

#[test]
fn top_vs_bottom_folds_the_field() {
    let pairings = pair_round_one(&group(8), RoundOneMethod::TopVsBottom).unwrap();
    assert_eq!(ids(&pairings), vec![(10, 80), (20, 70), (30, 60), (40, 50)]);
}

#[test]
fn two_players_meet_each_other_under_every_method() {
    for method in [
        RoundOneMethod::Adjacent,
        RoundOneMethod::TopVsTop,
        RoundOneMethod::TopVsBottom,
    ] {
        assert_eq!(ids(&pair_round_one(&group(2), method).unwrap()), vec![(10, 20)]);
    }
}

#[test]
fn odd_group_is_rejected() {
    assert_eq!(
        pair_round_one(&group(5), RoundOneMethod::Adjacent),
        Err(TournamentError::OddPlayerCount(5))
    );
}

#[test]
fn lone_player_is_rejected() {
    assert!(matches!(
        pair_round_one(&group(1), RoundOneMethod::TopVsBottom),
        Err(TournamentError::NotEnoughPlayers { required: 2, found: 1 })
    ));
}

#[test]
fn method_parses_from_config_strings() {
    assert_eq!("top_vs_bottom".parse::<RoundOneMethod>(), Ok(RoundOneMethod::TopVsBottom));
    assert_eq!(" Adjacent ".parse::<RoundOneMethod>(), Ok(RoundOneMethod::Adjacent));
    assert!("random".parse::<RoundOneMethod>().is_err());
}
