//! Integration tests for two-party score confirmation.

use carrom_tournament::logic::{
    build_confirmation, confirm, evaluate_consensus, match_status, ConsensusDecision,
};
use carrom_tournament::models::{
    BoardSubmission, ConfirmationRequest, ErrorKind, Match, MatchPayload, MatchStatus,
    MatchSubmission, Pairing, ScoreConfirmation, TournamentError,
};
use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

const A: u64 = 1;
const B: u64 = 2;

fn open_match() -> Match {
    Match::new(5, Uuid::nil(), 1, 1, 3, Pairing::new(A, B))
}

fn scores(m: &Match, player: u64, s1: u32, s2: u32) -> ScoreConfirmation {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    build_confirmation(m, player, &ConfirmationRequest::scores(s1, s2), at).unwrap()
}

fn one_board(points_for_a: u8) -> ConfirmationRequest {
    ConfirmationRequest::boards(MatchSubmission {
        boards: vec![BoardSubmission {
            board_number: 1,
            striker_id: Some(A),
            striker_points: Some(points_for_a),
            non_striker_points: Some(0),
            ..BoardSubmission::default()
        }],
        ..MatchSubmission::default()
    })
}

#[test]
fn single_confirmation_is_pending() {
    let m = open_match();
    let (all, decision) = confirm(&m, &[], scores(&m, A, 30, 20)).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(decision, ConsensusDecision::Pending);
}

#[test]
fn matching_confirmations_finalize() {
    let m = open_match();
    let (all, _) = confirm(&m, &[], scores(&m, A, 30, 20)).unwrap();
    let (all, decision) = confirm(&m, &all, scores(&m, B, 30, 20)).unwrap();
    assert_eq!(all.len(), 2);
    match decision {
        ConsensusDecision::Finalized {
            score1,
            score2,
            digest,
        } => {
            assert_eq!((score1, score2), (30, 20));
            assert_eq!(digest, all[0].digest);
        }
        other => panic!("expected finalized, got {other:?}"),
    }
}

#[test]
fn differing_scores_are_disputed() {
    let m = open_match();
    let (all, _) = confirm(&m, &[], scores(&m, A, 30, 20)).unwrap();
    let (all, decision) = confirm(&m, &all, scores(&m, B, 20, 30)).unwrap();
    assert_eq!(decision, ConsensusDecision::Disputed);
    assert_eq!(match_status(&m, &all), MatchStatus::Disputed);
}

#[test]
fn same_score_with_different_boards_is_disputed() {
    let m = open_match();
    let now = Utc::now();
    let boards = build_confirmation(&m, A, &one_board(7), now).unwrap();
    let plain = build_confirmation(&m, B, &ConfirmationRequest::scores(7, 0), now).unwrap();
    assert_eq!((boards.score1, boards.score2), (plain.score1, plain.score2));
    assert_ne!(boards.digest, plain.digest);
    assert_eq!(evaluate_consensus(&[boards, plain]), ConsensusDecision::Disputed);
}

#[test]
fn resubmission_replaces_the_players_earlier_confirmation() {
    let m = open_match();
    let first = scores(&m, A, 30, 20);
    let created = first.created_at;
    let (all, _) = confirm(&m, &[], first).unwrap();
    let (all, _) = confirm(&m, &all, scores(&m, B, 20, 30)).unwrap();

    let mut corrected = scores(&m, A, 20, 30);
    corrected.created_at = created + Duration::minutes(5);
    corrected.updated_at = created + Duration::minutes(5);
    let (all, decision) = confirm(&m, &all, corrected).unwrap();

    assert_eq!(all.len(), 2);
    let mine = all.iter().find(|c| c.player_id == A).unwrap();
    assert_eq!((mine.score1, mine.score2), (20, 30));
    assert_eq!(mine.created_at, created);
    assert_eq!(mine.updated_at, created + Duration::minutes(5));
    assert!(matches!(decision, ConsensusDecision::Finalized { .. }));
}

#[test]
fn outsiders_cannot_confirm() {
    let m = open_match();
    let err = build_confirmation(&m, 9, &ConfirmationRequest::scores(1, 0), Utc::now())
        .unwrap_err();
    assert_eq!(
        err,
        TournamentError::NotMatchParticipant {
            match_id: 5,
            player_id: 9
        }
    );
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test]
fn confirmed_match_is_immutable() {
    let mut m = open_match();
    let late = scores(&m, A, 1, 0);
    m.finalize(30, 20, MatchPayload::default(), Utc::now()).unwrap();

    let err = build_confirmation(&m, A, &ConfirmationRequest::scores(1, 0), Utc::now())
        .unwrap_err();
    assert_eq!(err, TournamentError::MatchAlreadyConfirmed(5));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(
        confirm(&m, &[], late),
        Err(TournamentError::MatchAlreadyConfirmed(5))
    );
    assert_eq!(
        m.finalize(1, 0, MatchPayload::default(), Utc::now()),
        Err(TournamentError::MatchAlreadyConfirmed(5))
    );
    assert_eq!(match_status(&m, &[]), MatchStatus::Confirmed);
}

#[test]
fn reported_scores_are_validated() {
    let m = open_match();
    let now = Utc::now();
    assert_eq!(
        build_confirmation(&m, A, &ConfirmationRequest::scores(1000, 0), now),
        Err(TournamentError::ScoreOutOfRange(1000))
    );
    assert_eq!(
        build_confirmation(&m, A, &ConfirmationRequest::default(), now),
        Err(TournamentError::MissingScore)
    );
}

#[test]
fn boards_decide_the_reported_score() {
    let m = open_match();
    let now = Utc::now();
    let derived = build_confirmation(&m, A, &one_board(7), now).unwrap();
    assert_eq!((derived.score1, derived.score2), (7, 0));
    assert_eq!(derived.payload.boards.len(), 1);

    let mut agreeing = one_board(7);
    agreeing.score1 = Some(7);
    agreeing.score2 = Some(0);
    assert!(build_confirmation(&m, A, &agreeing, now).is_ok());

    let mut wrong = one_board(7);
    wrong.score1 = Some(8);
    wrong.score2 = Some(0);
    assert_eq!(
        build_confirmation(&m, A, &wrong, now),
        Err(TournamentError::ScoreMismatch {
            reported1: 8,
            reported2: 0,
            computed1: 7,
            computed2: 0
        })
    );
}

#[test]
fn boards_with_half_a_reported_score_are_rejected() {
    let m = open_match();
    let mut only_first = one_board(7);
    only_first.score1 = Some(7);
    assert_eq!(
        build_confirmation(&m, A, &only_first, Utc::now()),
        Err(TournamentError::MissingScore)
    );

    let mut only_second = one_board(7);
    only_second.score2 = Some(0);
    assert_eq!(
        build_confirmation(&m, A, &only_second, Utc::now()),
        Err(TournamentError::MissingScore)
    );
}

#[test]
fn request_accepts_flattened_json() {
    let body = r#"{
        "score1": 7,
        "score2": 0,
        "boards": [{"board_number": 1, "striker_id": 1, "striker_points": 7, "non_striker_points": 0}]
    }"#;
    let request: ConfirmationRequest = serde_json::from_str(body).unwrap();
    assert_eq!(request, {
        let mut expected = one_board(7);
        expected.score1 = Some(7);
        expected.score2 = Some(0);
        expected
    });
}
