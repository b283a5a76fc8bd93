//! Random table numbers for a round's pairings.

use crate::models::TournamentError;
use rand::seq::SliceRandom;
use rand::Rng;

/// Draw one table number (1..=table_count) per pairing.
///
/// Tables come from a shuffled deck that is refilled when empty, so every table is used
/// before any is reused. A refilled deck never starts with the table drawn just before it,
/// unless there is only one table.
pub fn assign_tables<R: Rng + ?Sized>(
    pair_count: usize,
    table_count: u32,
    rng: &mut R,
) -> Result<Vec<u32>, TournamentError> {
    if table_count == 0 {
        return Err(TournamentError::InvalidTableCount);
    }
    let mut tables = Vec::with_capacity(pair_count);
    let mut deck: Vec<u32> = Vec::new();
    while tables.len() < pair_count {
        if deck.is_empty() {
            deck = (1..=table_count).collect();
            deck.shuffle(rng);
            // Drawing pops from the back.
            if deck.len() > 1 && deck.last() == tables.last() {
                let last = deck.len() - 1;
                deck.swap(0, last);
            }
        }
        if let Some(table) = deck.pop() {
            tables.push(table);
        }
    }
    Ok(tables)
}
