//! First-round pairing inside a group, driven by seeds.

use crate::models::{GroupPlayer, Pairing, RoundOneMethod, TournamentError};

/// Pair a group's players for round one.
///
/// Players are ordered by seed first. `Adjacent` pairs 1v2, 3v4, ...; `TopVsTop` pairs seed i
/// with seed i + N/2; `TopVsBottom` pairs seed i with seed N-1-i. The group must have an even
/// number (at least two) of players.
pub fn pair_round_one(
    players: &[GroupPlayer],
    method: RoundOneMethod,
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

    let mut seeded: Vec<&GroupPlayer> = players.iter().collect();
    seeded.sort_by_key(|p| p.seed);
    let half = n / 2;

    let pairings = match method {
        RoundOneMethod::Adjacent => seeded
            .chunks_exact(2)
            .map(|pair| Pairing::new(pair[0].id, pair[1].id))
            .collect(),
        RoundOneMethod::TopVsTop => (0..half)
            .map(|i| Pairing::new(seeded[i].id, seeded[i + half].id))
            .collect(),
        RoundOneMethod::TopVsBottom => (0..half)
            .map(|i| Pairing::new(seeded[i].id, seeded[n - 1 - i].id))
            .collect(),
    };
    Ok(pairings)
}
