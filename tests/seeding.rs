//! Integration tests for seeding: ranking matching, source ordering and manual overrides.

use carrom_tournament::logic::{
    compute_seeding, infer_national_country, normalize_name, override_seed,
};
use carrom_tournament::models::{
    MatchMethod, Player, RankingList, RankingRow, SeedSource, TournamentError,
};

fn ranking() -> RankingList {
    RankingList {
        year: Some(2024),
        description: Some("National ranking".to_string()),
        rows: vec![
            RankingRow::new(1, "Anna Smith")
                .with_email("anna@example.com")
                .with_country("IN"),
            RankingRow::new(2, "Bob Lee").with_country("in"),
            RankingRow::new(3, "Chen Wu").with_country("LK"),
        ],
    }
}

fn roster() -> Vec<Player> {
    vec![
        Player::new(1, "A. Smith").with_email(" ANNA@example.com "),
        Player::new(2, "bob  lee"),
        Player::new(3, "Dina").with_country("lk"),
        Player::new(4, "Eve").with_state("Kerala"),
        Player::new(5, "Carl").with_country("IN"),
    ]
}

#[test]
fn national_then_international_then_new() {
    let outcome = compute_seeding(&roster(), &ranking()).unwrap();
    assert_eq!(outcome.national_country.as_deref(), Some("IN"));

    let order: Vec<(u64, u32, SeedSource)> = outcome
        .rows
        .iter()
        .map(|r| (r.player_id, r.seed, r.source))
        .collect();
    assert_eq!(
        order,
        vec![
            (1, 1, SeedSource::National),
            (2, 2, SeedSource::National),
            (3, 3, SeedSource::International),
            (5, 4, SeedSource::New),
            (4, 5, SeedSource::New),
        ]
    );
    assert_eq!(outcome.rows[0].match_method, MatchMethod::Email);
    assert_eq!(outcome.rows[1].match_method, MatchMethod::Name);
    assert_eq!(outcome.rows[0].ranking_rank, Some(1));
    assert_eq!(outcome.rows[0].ranking_year, Some(2024));
    assert_eq!(outcome.rows[2].ranking_rank, None);
}

#[test]
fn email_matches_take_rows_before_name_matches() {
    let ranking = RankingList {
        rows: vec![
            RankingRow::new(1, "Sam Paul").with_email("sam@example.com"),
            RankingRow::new(2, "Sam Paul"),
        ],
        ..RankingList::default()
    };
    let players = vec![
        Player::new(1, "Sam Paul"),
        Player::new(2, "Samuel").with_email("sam@example.com"),
    ];
    let outcome = compute_seeding(&players, &ranking).unwrap();

    assert_eq!(outcome.rows[0].player_id, 2);
    assert_eq!(outcome.rows[0].match_method, MatchMethod::Email);
    assert_eq!(outcome.rows[0].ranking_rank, Some(1));
    assert_eq!(outcome.rows[1].player_id, 1);
    assert_eq!(outcome.rows[1].match_method, MatchMethod::Name);
    assert_eq!(outcome.rows[1].ranking_rank, Some(2));
}

#[test]
fn each_ranking_row_is_used_once() {
    let ranking = RankingList {
        rows: vec![RankingRow::new(1, "Sam Paul")],
        ..RankingList::default()
    };
    let players = vec![Player::new(7, "sam paul"), Player::new(3, "Sam-Paul")];
    let outcome = compute_seeding(&players, &ranking).unwrap();

    let national: Vec<u64> = outcome
        .rows
        .iter()
        .filter(|r| r.source == SeedSource::National)
        .map(|r| r.player_id)
        .collect();
    assert_eq!(national, vec![3]);
}

#[test]
fn seeding_does_not_depend_on_input_order() {
    let first = compute_seeding(&roster(), &ranking()).unwrap();

    let mut players = roster();
    players.reverse();
    let mut reversed_ranking = ranking();
    reversed_ranking.rows.reverse();
    let second = compute_seeding(&players, &reversed_ranking).unwrap();

    assert_eq!(first, second);
}

#[test]
fn seeds_are_a_permutation() {
    let outcome = compute_seeding(&roster(), &ranking()).unwrap();
    let mut seeds: Vec<u32> = outcome.rows.iter().map(|r| r.seed).collect();
    seeds.sort_unstable();
    assert_eq!(seeds, vec![1, 2, 3, 4, 5]);
}

#[test]
fn without_ranking_everybody_is_new() {
    let outcome = compute_seeding(&roster(), &RankingList::default()).unwrap();
    assert_eq!(outcome.national_country, None);
    assert!(outcome.rows.iter().all(|r| r.source == SeedSource::New));
    let names: Vec<&str> = outcome.rows.iter().map(|r| r.player_name.as_str()).collect();
    assert_eq!(names, vec!["A. Smith", "bob  lee", "Carl", "Dina", "Eve"]);
}

#[test]
fn empty_roster_is_rejected() {
    assert!(matches!(
        compute_seeding(&[], &ranking()),
        Err(TournamentError::NotEnoughPlayers { .. })
    ));
}

#[test]
fn override_moves_one_player_and_keeps_seeds_contiguous() {
    let mut rows = compute_seeding(&roster(), &ranking()).unwrap().rows;
    override_seed(&mut rows, 4, 1).unwrap();

    let order: Vec<(u64, u32)> = rows.iter().map(|r| (r.player_id, r.seed)).collect();
    assert_eq!(order, vec![(4, 1), (1, 2), (2, 3), (3, 4), (5, 5)]);
    assert!(rows[0].manual_override);
    assert!(!rows[1].manual_override);
}

#[test]
fn override_rejects_out_of_range_seed_and_unknown_player() {
    let mut rows = compute_seeding(&roster(), &ranking()).unwrap().rows;
    assert!(matches!(
        override_seed(&mut rows, 1, 0),
        Err(TournamentError::InvalidSeed { seed: 0, max: 5 })
    ));
    assert!(matches!(
        override_seed(&mut rows, 1, 6),
        Err(TournamentError::InvalidSeed { seed: 6, max: 5 })
    ));
    assert_eq!(
        override_seed(&mut rows, 99, 2),
        Err(TournamentError::PlayerNotFound(99))
    );
}

#[test]
fn names_normalize_case_and_punctuation() {
    assert_eq!(normalize_name("  Mary-Jane  O'Neil "), "mary jane o neil");
    assert_eq!(normalize_name("A.  Smith"), "a smith");
}

#[test]
fn national_country_ties_go_to_first_alphabetically() {
    let rows = vec![
        RankingRow::new(1, "A").with_country("LK"),
        RankingRow::new(2, "B").with_country("IN"),
    ];
    assert_eq!(infer_national_country(&rows).as_deref(), Some("IN"));
    assert_eq!(infer_national_country(&[]), None);
}
