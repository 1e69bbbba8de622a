// File: prizebot-core/src/giveaway/draw.rs

use rand::Rng;

/// Draws up to `count` distinct entries from `pool` uniformly at random,
/// without replacement: pick a random index from what is left, take it out,
/// repeat. Returns `min(count, pool.len())` entries in draw order.
pub fn draw_winners<T, R>(mut pool: Vec<T>, count: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let take = count.min(pool.len());
    let mut winners = Vec::with_capacity(take);
    for _ in 0..take {
        let idx = rng.random_range(0..pool.len());
        winners.push(pool.swap_remove(idx));
    }
    winners
}
