//! Group stage split: distribute seeded players over G groups.

use crate::models::{GroupAssignment, GroupMethod, SeedingRow, TournamentError};

pub const MIN_GROUPS: usize = 2;
pub const MAX_GROUPS: usize = 64;

/// Assign every seeded row to a group (1-based).
///
/// Seed index i goes to group i mod G. With [`GroupMethod::Snake`] every odd "row" of G seeds
/// runs backwards, so group 1 gets seeds 1, 2G, 2G+1, ... The group count must be in 2..=64
/// and is clamped to the number of players. Group sizes differ by at most one.
pub fn assign_groups(
    rows: &[SeedingRow],
    group_count: usize,
    method: GroupMethod,
) -> Result<Vec<GroupAssignment>, TournamentError> {
    if !(MIN_GROUPS..=MAX_GROUPS).contains(&group_count) {
        return Err(TournamentError::InvalidGroupCount(group_count));
    }
    if rows.len() < MIN_GROUPS {
        return Err(TournamentError::NotEnoughPlayers {
            required: MIN_GROUPS,
            found: rows.len(),
        });
    }
    let groups = group_count.min(rows.len());

    let mut ordered: Vec<&SeedingRow> = rows.iter().collect();
    ordered.sort_by_key(|r| r.seed);

    let mut sizes = vec![0u32; groups];
    let placed: Vec<(&SeedingRow, usize)> = ordered
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let raw = i % groups;
            let group = match method {
                GroupMethod::Snake if (i / groups) % 2 == 1 => groups - 1 - raw,
                _ => raw,
            };
            sizes[group] += 1;
            (row, group)
        })
        .collect();

    Ok(placed
        .into_iter()
        .map(|(row, group)| GroupAssignment {
            player_id: row.player_id,
            seed: row.seed,
            group_number: group as u32 + 1,
            group_size: sizes[group],
            method,
        })
        .collect())
}
