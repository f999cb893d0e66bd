use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::TriviaError;

/// Picks `k` elements of `pool` at random, without replacement.
pub fn sample<T, R>(pool: &[T], k: usize, rng: &mut R) -> Result<Vec<T>, TriviaError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if k > pool.len() {
        return Err(TriviaError::InvalidSampleSize {
            requested: k,
            available: pool.len(),
        });
    }
    Ok(pool.choose_multiple(rng, k).cloned().collect())
}
