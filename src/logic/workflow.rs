//! Tournament workflow: seeding → groups → rounds → confirmations, with step locking.
//!
//! Each function takes the whole tournament mutably, so a persistence layer can run it inside
//! one transaction: match ids are allocated and matches created in the same step, and the
//! consensus check re-reads every confirmation of the match before finalizing it.

use crate::logic::confirmation::{
    build_confirmation, evaluate_consensus, upsert_confirmation, ConsensusDecision,
};
use crate::logic::grouping::assign_groups;
use crate::logic::round_one::pair_round_one;
use crate::logic::round_robin::generate_round_robin;
use crate::logic::seeding::{compute_seeding, override_seed};
use crate::logic::swiss::pair_swiss;
use crate::logic::tables::assign_tables;
use crate::models::{
    ConfirmationRequest, Match, MatchId, Pairing, PlayerId, RankingList, Tournament,
    TournamentError,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Generate (or regenerate) seeding from the roster and the given or stored ranking list.
/// Locked once groups exist.
pub fn generate_seeding(
    tournament: &mut Tournament,
    ranking: Option<RankingList>,
) -> Result<(), TournamentError> {
    if tournament.has_groups() {
        return Err(TournamentError::StepLocked("Seeding"));
    }
    if let Some(ranking) = ranking {
        tournament.ranking = Some(ranking);
    }
    let ranking = tournament.ranking.clone().unwrap_or_default();
    let outcome = compute_seeding(&tournament.players, &ranking)?;
    log::info!(
        "Seeded {} players for tournament {} (national country {:?})",
        outcome.rows.len(),
        tournament.id,
        outcome.national_country
    );
    tournament.seeding = outcome.rows;
    tournament.national_country = outcome.national_country;
    Ok(())
}

pub fn delete_seeding(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.has_groups() {
        return Err(TournamentError::StepLocked("Seeding"));
    }
    tournament.seeding.clear();
    tournament.national_country = None;
    Ok(())
}

/// Manually move one player's seed. Locked once groups exist.
pub fn override_player_seed(
    tournament: &mut Tournament,
    player_id: PlayerId,
    seed: u32,
) -> Result<(), TournamentError> {
    if tournament.has_groups() {
        return Err(TournamentError::StepLocked("Seeding"));
    }
    if !tournament.has_seeding() {
        return Err(TournamentError::StepNotReady("Seeding"));
    }
    override_seed(&mut tournament.seeding, player_id, seed)
}

/// Split the seeded players into groups using the tournament settings.
/// Requires seeding; locked once any match exists.
pub fn generate_groups(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if !tournament.has_seeding() {
        return Err(TournamentError::StepNotReady("Seeding"));
    }
    if !tournament.matches.is_empty() {
        return Err(TournamentError::StepLocked("Groups"));
    }
    let settings = &tournament.settings;
    let groups = assign_groups(&tournament.seeding, settings.group_count, settings.group_method)?;
    log::info!(
        "Assigned {} players to {} groups ({:?})",
        groups.len(),
        groups.iter().map(|g| g.group_number).max().unwrap_or(0),
        settings.group_method
    );
    tournament.groups = groups;
    Ok(())
}

pub fn delete_groups(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if !tournament.matches.is_empty() {
        return Err(TournamentError::StepLocked("Groups"));
    }
    tournament.groups.clear();
    Ok(())
}

/// Create matches for the next round of a group and return the round number.
///
/// Round one uses the configured seed-based policy; later rounds use Swiss pairing over the
/// group's history. A new round is refused while the previous one has unconfirmed matches.
pub fn generate_matchups<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    group_number: u32,
    rng: &mut R,
) -> Result<u32, TournamentError> {
    if !tournament.has_groups() {
        return Err(TournamentError::StepNotReady("Groups"));
    }
    let players = tournament.group_players(group_number)?;
    let latest = tournament.latest_round(group_number);
    if latest > 0
        && tournament
            .group_matches(group_number)
            .iter()
            .any(|m| m.round_number == latest && !m.is_confirmed())
    {
        return Err(TournamentError::RoundInProgress {
            group: group_number,
            round: latest,
        });
    }
    let round = latest + 1;

    let pairings = if round == 1 {
        pair_round_one(&players, tournament.settings.round_one_method)?
    } else {
        let history: Vec<Match> = tournament
            .group_matches(group_number)
            .into_iter()
            .cloned()
            .collect();
        pair_swiss(&players, &history, tournament.settings.swiss_attempt_cap).map_err(|e| {
            log::warn!("Swiss pairing failed for group {group_number} round {round}: {e}");
            e
        })?
    };
    let tables = assign_tables(pairings.len(), tournament.settings.table_count, rng)?;

    create_matches(tournament, group_number, round, &pairings, &tables);
    log::info!(
        "Paired group {} round {}: {} matches",
        group_number,
        round,
        pairings.len()
    );
    Ok(round)
}

fn create_matches(
    tournament: &mut Tournament,
    group_number: u32,
    round: u32,
    pairings: &[Pairing],
    tables: &[u32],
) {
    for (pairing, &table) in pairings.iter().zip(tables) {
        let id = tournament.allocate_match_id();
        let m = Match::new(id, tournament.id, group_number, round, table, *pairing);
        tournament.matches.push(m);
    }
}

/// Delete a group's latest round, as long as none of its matches is confirmed.
pub fn delete_round(
    tournament: &mut Tournament,
    group_number: u32,
    round: u32,
) -> Result<(), TournamentError> {
    let in_round: Vec<MatchId> = tournament
        .group_matches(group_number)
        .iter()
        .filter(|m| m.round_number == round)
        .map(|m| m.id)
        .collect();
    if in_round.is_empty() {
        return Err(TournamentError::RoundNotFound {
            group: group_number,
            round,
        });
    }
    let locked = round != tournament.latest_round(group_number)
        || tournament
            .matches
            .iter()
            .any(|m| in_round.contains(&m.id) && m.is_confirmed());
    if locked {
        return Err(TournamentError::RoundLocked {
            group: group_number,
            round,
        });
    }
    tournament.matches.retain(|m| !in_round.contains(&m.id));
    tournament
        .confirmations
        .retain(|c| !in_round.contains(&c.match_id));
    Ok(())
}

/// Record a player's confirmation and finalize the match if both sides now agree.
pub fn submit_confirmation(
    tournament: &mut Tournament,
    match_id: MatchId,
    submitter: PlayerId,
    request: &ConfirmationRequest,
    now: DateTime<Utc>,
) -> Result<ConsensusDecision, TournamentError> {
    let m = tournament
        .match_by_id(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let confirmation = build_confirmation(m, submitter, request, now)?;
    upsert_confirmation(&mut tournament.confirmations, confirmation);

    let all = tournament.confirmations_for(match_id);
    let decision = evaluate_consensus(&all);
    if let ConsensusDecision::Finalized { score1, score2, .. } = &decision {
        let payload = all
            .first()
            .map(|c| c.payload.clone())
            .unwrap_or_default();
        tournament
            .match_by_id_mut(match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?
            .finalize(*score1, *score2, payload, now)?;
        log::info!("Match {} confirmed {}-{}", match_id, score1, score2);
    } else {
        log::debug!("Match {} confirmation from {}: {:?}", match_id, submitter, decision);
    }
    Ok(decision)
}

/// Bootstrap demo data: a full round robin over the roster in group 1.
/// Table numbers follow the pairing position.
pub fn seed_demo_round_robin(tournament: &mut Tournament) -> Result<usize, TournamentError> {
    if !tournament.matches.is_empty() {
        return Err(TournamentError::StepLocked("Demo schedule"));
    }
    let mut ids: Vec<PlayerId> = tournament.players.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    if ids.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers {
            required: 2,
            found: ids.len(),
        });
    }
    let schedule = generate_round_robin(&ids);
    for (round_index, fixtures) in schedule.iter().enumerate() {
        let pairings: Vec<Pairing> = fixtures.iter().map(|&(a, b)| Pairing::new(a, b)).collect();
        let tables: Vec<u32> = (1..=pairings.len() as u32).collect();
        create_matches(tournament, 1, round_index as u32 + 1, &pairings, &tables);
    }
    log::info!(
        "Seeded demo round robin: {} rounds, {} matches",
        schedule.len(),
        tournament.matches.len()
    );
    Ok(tournament.matches.len())
}
