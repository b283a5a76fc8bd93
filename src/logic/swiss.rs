//! Swiss pairing: standings from match history, then score-bracket pairing that never repeats
//! an opponent, backed by a bounded perfect-matching search.

use crate::models::{GroupPlayer, Match, Pairing, PlayerId, TournamentError};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Match points for a result: 3 for a win, 1 each for a draw.
pub fn match_points(score1: u32, score2: u32) -> (u32, u32) {
    match score1.cmp(&score2) {
        Ordering::Greater => (3, 0),
        Ordering::Less => (0, 3),
        Ordering::Equal => (1, 1),
    }
}

/// Derived per-player state for one Swiss round. Rebuilt from history every round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SwissStanding {
    pub player_id: PlayerId,
    pub name: String,
    pub seed: u32,
    pub match_points: u32,
    pub score_for: u32,
    pub score_against: u32,
    /// Sum of the current match points of every opponent met.
    pub opponent_strength: u32,
    pub opponents: BTreeSet<PlayerId>,
}

impl SwissStanding {
    pub fn net_score(&self) -> i64 {
        i64::from(self.score_for) - i64::from(self.score_against)
    }

    /// Tie-break order: points, opponent strength, net score, total score (all desc), seed, name.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .match_points
            .cmp(&self.match_points)
            .then(other.opponent_strength.cmp(&self.opponent_strength))
            .then(other.net_score().cmp(&self.net_score()))
            .then(other.score_for.cmp(&self.score_for))
            .then(self.seed.cmp(&other.seed))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Standings of `players` from the confirmed matches in `history`, best first.
/// Matches involving players outside the group are ignored.
pub fn swiss_standings(players: &[GroupPlayer], history: &[Match]) -> Vec<SwissStanding> {
    let mut table: HashMap<PlayerId, SwissStanding> = players
        .iter()
        .map(|p| {
            (
                p.id,
                SwissStanding {
                    player_id: p.id,
                    name: p.name.clone(),
                    seed: p.seed,
                    match_points: 0,
                    score_for: 0,
                    score_against: 0,
                    opponent_strength: 0,
                    opponents: BTreeSet::new(),
                },
            )
        })
        .collect();

    for m in history {
        let Some((score1, score2)) = m.confirmed_scores() else {
            continue;
        };
        if !(table.contains_key(&m.player1_id) && table.contains_key(&m.player2_id)) {
            continue;
        }
        let (points1, points2) = match_points(score1, score2);
        for (player, opponent, points, scored, conceded) in [
            (m.player1_id, m.player2_id, points1, score1, score2),
            (m.player2_id, m.player1_id, points2, score2, score1),
        ] {
            if let Some(s) = table.get_mut(&player) {
                s.match_points += points;
                s.score_for += scored;
                s.score_against += conceded;
                s.opponents.insert(opponent);
            }
        }
    }

    let points: HashMap<PlayerId, u32> = table.iter().map(|(id, s)| (*id, s.match_points)).collect();
    let mut standings: Vec<SwissStanding> = table
        .into_values()
        .map(|mut s| {
            s.opponent_strength = s.opponents.iter().filter_map(|o| points.get(o)).sum();
            s
        })
        .collect();
    standings.sort_by(SwissStanding::rank_cmp);
    standings
}

/// Unordered "these two have already met" lookup.
#[derive(Clone, Debug, Default)]
pub struct PlayedPairs(HashSet<(PlayerId, PlayerId)>);

impl PlayedPairs {
    /// Every match in `history` counts, confirmed or not.
    pub fn from_matches(history: &[Match]) -> Self {
        let mut played = Self::default();
        for m in history {
            played.insert(m.player1_id, m.player2_id);
        }
        played
    }

    pub fn insert(&mut self, a: PlayerId, b: PlayerId) {
        self.0.insert(key(a, b));
    }

    pub fn contains(&self, a: PlayerId, b: PlayerId) -> bool {
        self.0.contains(&key(a, b))
    }
}

fn key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    (a.min(b), a.max(b))
}

/// Attempt counter shared by every search of one pairing request.
#[derive(Debug)]
pub struct SearchBudget {
    cap: usize,
    attempts: usize,
}

impl SearchBudget {
    pub fn new(cap: usize) -> Self {
        Self { cap, attempts: 0 }
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    fn spend(&mut self) -> Result<(), TournamentError> {
        self.attempts += 1;
        if self.attempts > self.cap {
            return Err(TournamentError::PairingSearchExhausted { attempts: self.cap });
        }
        Ok(())
    }
}

/// Pair all of `pool` (in rank order) so that nobody meets a previous opponent.
///
/// Returns `Ok(None)` when no such matching exists, and an exhaustion error when the budget
/// runs out first. Within each pairing the better-ranked player comes first, and pairings are
/// ordered by their better-ranked player.
pub fn perfect_matching(
    pool: &[PlayerId],
    played: &PlayedPairs,
    budget: &mut SearchBudget,
) -> Result<Option<Vec<Pairing>>, TournamentError> {
    if pool.len() % 2 == 1 {
        return Ok(None);
    }
    let mut active = vec![true; pool.len()];
    let mut chosen = Vec::with_capacity(pool.len() / 2);
    if !search(pool, &mut active, played, budget, &mut chosen)? {
        return Ok(None);
    }
    chosen.sort_unstable();
    Ok(Some(
        chosen
            .into_iter()
            .map(|(a, b)| Pairing::new(pool[a], pool[b]))
            .collect(),
    ))
}

/// Backtracking: take the player with the fewest legal partners left, try partners with the
/// fewest options first, recurse on the rest.
fn search(
    pool: &[PlayerId],
    active: &mut [bool],
    played: &PlayedPairs,
    budget: &mut SearchBudget,
    chosen: &mut Vec<(usize, usize)>,
) -> Result<bool, TournamentError> {
    let remaining: Vec<usize> = (0..pool.len()).filter(|&i| active[i]).collect();
    if remaining.is_empty() {
        return Ok(true);
    }
    let legal = |a: usize, b: usize| a != b && !played.contains(pool[a], pool[b]);
    let degrees: Vec<(usize, usize)> = remaining
        .iter()
        .map(|&i| (i, remaining.iter().filter(|&&j| legal(i, j)).count()))
        .collect();

    let Some(&(pivot, pivot_degree)) = degrees.iter().min_by_key(|&&(i, d)| (d, i)) else {
        return Ok(true);
    };
    if pivot_degree == 0 {
        return Ok(false);
    }

    let mut candidates: Vec<(usize, usize)> = degrees
        .iter()
        .filter(|&&(j, _)| legal(pivot, j))
        .map(|&(j, d)| (d, j))
        .collect();
    candidates.sort_unstable();

    active[pivot] = false;
    for (_, partner) in candidates {
        budget.spend()?;
        active[partner] = false;
        chosen.push((pivot.min(partner), pivot.max(partner)));
        if search(pool, active, played, budget, chosen)? {
            return Ok(true);
        }
        chosen.pop();
        active[partner] = true;
    }
    active[pivot] = true;
    Ok(false)
}

/// Pair one score bracket. Players that cannot be placed float down, in rank order.
fn pair_bracket(
    mut pool: Vec<PlayerId>,
    played: &PlayedPairs,
    budget: &mut SearchBudget,
) -> Result<(Vec<Pairing>, Vec<PlayerId>), TournamentError> {
    let mut floated = Vec::new();
    let mut pairings = Vec::new();
    while !pool.is_empty() {
        if pool.len() % 2 == 0 {
            if let Some(found) = perfect_matching(&pool, played, budget)? {
                pairings = found;
                break;
            }
        }
        if let Some(last) = pool.pop() {
            floated.push(last);
        }
    }
    floated.reverse();
    Ok((pairings, floated))
}

/// Next-round pairings for a group.
///
/// Players are bucketed by match points (best first) and ranked inside a bucket by the
/// tie-break order. Players a bucket cannot pair are carried into the next one. Whatever is
/// left after the last bucket must form a perfect matching on its own; if it does not, one
/// matching over the whole ranked field is tried before giving up with
/// [`TournamentError::NoLegalPairing`]. The whole request shares one search budget of
/// `attempt_cap` candidate tries.
pub fn pair_swiss(
    players: &[GroupPlayer],
    history: &[Match],
    attempt_cap: usize,
) -> Result<Vec<Pairing>, TournamentError> {
    let n = players.len();
    if n < 2 {
        return Err(TournamentError::NotEnoughPlayers {
            required: 2,
            found: n,
        });
    }
    if n % 2 == 1 {
        return Err(TournamentError::OddPlayerCount(n));
    }

    let standings = swiss_standings(players, history);
    let played = PlayedPairs::from_matches(history);
    let mut budget = SearchBudget::new(attempt_cap);

    let mut brackets: Vec<Vec<PlayerId>> = Vec::new();
    let mut last_points = None;
    for s in &standings {
        if last_points != Some(s.match_points) {
            brackets.push(Vec::new());
            last_points = Some(s.match_points);
        }
        if let Some(bracket) = brackets.last_mut() {
            bracket.push(s.player_id);
        }
    }

    let mut pairings = Vec::with_capacity(n / 2);
    let mut carry: Vec<PlayerId> = Vec::new();
    for bracket in brackets {
        let mut pool = std::mem::take(&mut carry);
        pool.extend(bracket);
        let (paired, floated) = pair_bracket(pool, &played, &mut budget)?;
        pairings.extend(paired);
        carry = floated;
    }

    if !carry.is_empty() {
        if carry.len() % 2 == 1 {
            return Err(TournamentError::OddPlayerCount(carry.len()));
        }
        match perfect_matching(&carry, &played, &mut budget)? {
            Some(rest) => pairings.extend(rest),
            None => {
                log::debug!(
                    "Bracket pairing left {} players unmatched; retrying over the whole field",
                    carry.len()
                );
                let field: Vec<PlayerId> = standings.iter().map(|s| s.player_id).collect();
                pairings = perfect_matching(&field, &played, &mut budget)?
                    .ok_or(TournamentError::NoLegalPairing)?;
            }
        }
    }

    log::debug!(
        "Swiss pairing for {} players took {} search attempts",
        n,
        budget.attempts()
    );
    Ok(pairings)
}
