use rand::{Rng, RngCore};

use crate::error::BucketError;

/// Population-weighted sampler over bucket ids.
///
/// Bucket stores are read-only for the lifetime of a run, so the
/// cumulative distribution is computed once here and reused for every
/// training step.
#[derive(Debug)]
pub struct BucketSchedule {
    cumulative: Vec<f64>,
}

impl BucketSchedule {
    /// Build cumulative proportions from per-bucket example counts.
    /// Rejects an all-empty corpus before any training step runs.
    pub fn new(sizes: &[usize]) -> Result<Self, BucketError> {
        let total: usize = sizes.iter().sum();
        if total == 0 {
            return Err(BucketError::EmptyCorpus {
                buckets: sizes.len(),
            });
        }

        let mut running = 0usize;
        let cumulative = sizes
            .iter()
            .map(|&size| {
                running += size;
                running as f64 / total as f64
            })
            .collect();

        Ok(Self { cumulative })
    }

    /// Smallest bucket id whose cumulative proportion exceeds a uniform
    /// draw from `[0, 1)`. Selection probability is proportional to
    /// bucket population; a bucket with zero examples is never selected.
    pub fn sample(&self, rng: &mut dyn RngCore) -> usize {
        let draw: f64 = rng.gen_range(0.0..1.0);
        self.cumulative
            .partition_point(|&proportion| proportion <= draw)
            .min(self.cumulative.len() - 1)
    }
}
