//! Seeding: match registered players to the national ranking and order them into seeds 1..=N.

use crate::models::{
    MatchMethod, Player, PlayerId, RankingList, RankingRow, SeedSource, SeedingRow,
    TournamentError,
};
use std::collections::{BTreeMap, HashMap};

/// Seed rows plus the country the ranking list was inferred to belong to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SeedingOutcome {
    pub rows: Vec<SeedingRow>,
    pub national_country: Option<String>,
}

/// Lowercase, turn every run of non-alphanumerics into one space, trim.
pub fn normalize_name(name: &str) -> String {
    let spaced: String = name
        .chars()
        .flat_map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![' ']
            }
        })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_email(email: &str) -> Option<String> {
    let e = email.trim().to_lowercase();
    (!e.is_empty()).then_some(e)
}

pub fn normalize_country(country: &str) -> Option<String> {
    let c = country.trim().to_uppercase();
    (!c.is_empty()).then_some(c)
}

/// Most common country among ranking rows; ties go to the alphabetically first.
pub fn infer_national_country(rows: &[RankingRow]) -> Option<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for country in rows.iter().filter_map(|r| r.country.as_deref().and_then(normalize_country)) {
        *counts.entry(country).or_default() += 1;
    }
    let mut best: Option<(String, usize)> = None;
    for (country, count) in counts {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((country, count));
        }
    }
    best.map(|(country, _)| country)
}

/// Lookup from a normalized key to ranking-row indices in rank order.
struct RankingIndex(HashMap<String, Vec<usize>>);

impl RankingIndex {
    fn build(keys: impl Iterator<Item = (usize, Option<String>)>) -> Self {
        let mut map: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, key) in keys {
            if let Some(key) = key {
                map.entry(key).or_default().push(idx);
            }
        }
        Self(map)
    }

    /// First row for `key` not yet taken by another player; marks it taken.
    fn claim(&self, key: &str, consumed: &mut [bool]) -> Option<usize> {
        let idx = self
            .0
            .get(key)?
            .iter()
            .copied()
            .find(|&i| !consumed[i])?;
        consumed[idx] = true;
        Some(idx)
    }
}

/// Compute seeds for `players` against `ranking`.
///
/// E-mail matches are resolved for every player before any name match, and each ranking row
/// is used at most once. National rows come first (by ranking rank, then name), then
/// international, then new players (each by name). The result depends only on the inputs'
/// contents, not their order.
pub fn compute_seeding(
    players: &[Player],
    ranking: &RankingList,
) -> Result<SeedingOutcome, TournamentError> {
    if players.is_empty() {
        return Err(TournamentError::NotEnoughPlayers {
            required: 1,
            found: 0,
        });
    }

    let mut ranked: Vec<&RankingRow> = ranking.rows.iter().collect();
    ranked.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| normalize_name(&a.name).cmp(&normalize_name(&b.name)))
    });
    let by_email = RankingIndex::build(
        ranked
            .iter()
            .enumerate()
            .map(|(i, r)| (i, r.email.as_deref().and_then(normalize_email))),
    );
    let by_name = RankingIndex::build(
        ranked
            .iter()
            .enumerate()
            .map(|(i, r)| (i, Some(normalize_name(&r.name)).filter(|n| !n.is_empty()))),
    );
    let national_country = infer_national_country(&ranking.rows);

    let mut ordered: Vec<&Player> = players.iter().collect();
    ordered.sort_by(|a, b| {
        normalize_name(&a.name)
            .cmp(&normalize_name(&b.name))
            .then(a.id.cmp(&b.id))
    });

    let mut consumed = vec![false; ranked.len()];
    let mut matched: HashMap<PlayerId, (usize, MatchMethod)> = HashMap::new();
    for p in &ordered {
        if let Some(email) = p.email.as_deref().and_then(normalize_email) {
            if let Some(idx) = by_email.claim(&email, &mut consumed) {
                matched.insert(p.id, (idx, MatchMethod::Email));
            }
        }
    }
    for p in &ordered {
        if matched.contains_key(&p.id) {
            continue;
        }
        if let Some(idx) = by_name.claim(&normalize_name(&p.name), &mut consumed) {
            matched.insert(p.id, (idx, MatchMethod::Name));
        }
    }

    let mut rows: Vec<SeedingRow> = ordered
        .iter()
        .map(|p| match matched.get(&p.id) {
            Some(&(idx, method)) => SeedingRow {
                player_id: p.id,
                player_name: p.name.clone(),
                seed: 0,
                source: SeedSource::National,
                match_method: method,
                ranking_rank: Some(ranked[idx].rank),
                ranking_year: ranking.year,
                ranking_description: ranking.description.clone(),
                manual_override: false,
            },
            None => {
                let country = p.country.as_deref().and_then(normalize_country);
                let international = matches!(
                    (&country, &national_country),
                    (Some(c), Some(n)) if c != n
                );
                SeedingRow {
                    player_id: p.id,
                    player_name: p.name.clone(),
                    seed: 0,
                    source: if international {
                        SeedSource::International
                    } else {
                        SeedSource::New
                    },
                    match_method: MatchMethod::None,
                    ranking_rank: None,
                    ranking_year: None,
                    ranking_description: None,
                    manual_override: false,
                }
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        source_order(a.source)
            .cmp(&source_order(b.source))
            .then(a.ranking_rank.unwrap_or(u32::MAX).cmp(&b.ranking_rank.unwrap_or(u32::MAX)))
            .then_with(|| normalize_name(&a.player_name).cmp(&normalize_name(&b.player_name)))
            .then(a.player_id.cmp(&b.player_id))
    });
    renumber(&mut rows);

    Ok(SeedingOutcome {
        rows,
        national_country,
    })
}

/// Move one player to `new_seed`, shifting the others and keeping seeds contiguous.
pub fn override_seed(
    rows: &mut Vec<SeedingRow>,
    player_id: PlayerId,
    new_seed: u32,
) -> Result<(), TournamentError> {
    if new_seed == 0 || new_seed as usize > rows.len() {
        return Err(TournamentError::InvalidSeed {
            seed: new_seed,
            max: rows.len(),
        });
    }
    rows.sort_by_key(|r| r.seed);
    let idx = rows
        .iter()
        .position(|r| r.player_id == player_id)
        .ok_or(TournamentError::PlayerNotFound(player_id))?;
    let mut row = rows.remove(idx);
    row.manual_override = true;
    rows.insert(new_seed as usize - 1, row);
    renumber(rows);
    Ok(())
}

fn source_order(source: SeedSource) -> u8 {
    match source {
        SeedSource::National => 0,
        SeedSource::International => 1,
        SeedSource::New => 2,
    }
}

fn renumber(rows: &mut [SeedingRow]) {
    for (i, row) in rows.iter_mut().enumerate() {
        row.seed = i as u32 + 1;
    }
}
