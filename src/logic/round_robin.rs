//! Full round-robin schedule by the circle method (demo and bootstrap data only).

/// Every unordered pair exactly once over N-1 rounds (N rounded up to even).
///
/// The first participant stays fixed while the others rotate one seat per round. Position i
/// meets position N-1-i; pairs involving the padding "bye" are dropped. In every even-indexed
/// round the first pairing is reversed, so the fixed participant alternates sides.
pub fn generate_round_robin<T: Copy>(participants: &[T]) -> Vec<Vec<(T, T)>> {
    if participants.len() < 2 {
        return Vec::new();
    }
    let mut seats: Vec<Option<T>> = participants.iter().copied().map(Some).collect();
    if seats.len() % 2 == 1 {
        seats.push(None);
    }
    let count = seats.len();
    let half = count / 2;

    let mut rounds = Vec::with_capacity(count - 1);
    for round_index in 0..count - 1 {
        let mut pairs = Vec::with_capacity(half);
        for i in 0..half {
            let (Some(left), Some(right)) = (seats[i], seats[count - 1 - i]) else {
                continue;
            };
            if round_index % 2 == 0 && i == 0 {
                pairs.push((right, left));
            } else {
                pairs.push((left, right));
            }
        }
        rounds.push(pairs);
        // Keep seat 0, move the last seat to position 1.
        seats[1..].rotate_right(1);
    }
    rounds
}
