use std::borrow::Borrow;

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    data::sample::Sample,
    error::{NetworkError, Result},
};

/// Shuffles `samples` with a generator freshly seeded from `seed` and splits
/// the result into contiguous chunks of `batch_size` (the last may be shorter).
///
/// The same seed and input order always yield the same batches.
pub fn shuffled_batches<S: Borrow<Sample>>(
    samples: &[S],
    seed: u64,
    batch_size: usize,
) -> Result<Vec<Vec<&Sample>>> {
    if samples.is_empty() {
        return Err(NetworkError::EmptyTrainingSet);
    }
    if batch_size == 0 {
        return Err(NetworkError::ZeroBatchSize);
    }

    let mut order: Vec<&Sample> = samples
        .iter()
        .map(|s| {
            let s: &Sample = s.borrow();
            s
        })
        .collect();
    order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

    Ok(order.chunks(batch_size).map(<[&Sample]>::to_vec).collect())
}
