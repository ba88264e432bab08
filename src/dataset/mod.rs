pub mod schedule;
mod store;

pub use store::read_bucket_stores;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::BucketError;

/// Capacity envelope of one length bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bucket {
    pub input_len: usize,
    pub output_len: usize,
}

impl Bucket {
    pub const fn new(input_len: usize, output_len: usize) -> Self {
        Self {
            input_len,
            output_len,
        }
    }
}

/// Bucket table of the stock corpus layout, ordered by increasing
/// capacity.
pub fn default_buckets() -> Vec<Bucket> {
    vec![
        Bucket::new(5, 15),
        Bucket::new(10, 20),
        Bucket::new(15, 25),
        Bucket::new(20, 30),
    ]
}

/// Smallest-indexed bucket whose input capacity strictly exceeds
/// `tokens`.
///
/// The comparison is strict: an input that fills a bucket exactly is
/// rejected rather than routed to it.
pub fn bucket_for_input(buckets: &[Bucket], tokens: usize) -> Result<usize, BucketError> {
    buckets
        .iter()
        .position(|bucket| bucket.input_len > tokens)
        .ok_or(BucketError::InputTooLong {
            tokens,
            capacity: buckets.last().map(|bucket| bucket.input_len).unwrap_or(0),
        })
}

/// Unordered collection of `(input, output)` example pairs backing one
/// bucket.
///
/// Stores are loaded once at startup and read-only afterwards; sampling
/// draws from a caller-owned random source so runs stay reproducible
/// under a fixed seed.
pub trait ExampleStore {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draw one example uniformly at random, with replacement. Callers
    /// must not sample an empty store; the schedule never selects one.
    fn random_example(&self, rng: &mut dyn RngCore) -> (Vec<u32>, Vec<u32>);
}

/// In-memory store backing one bucket during training.
pub struct MemoryStore {
    examples: Vec<(Vec<u32>, Vec<u32>)>,
}

impl MemoryStore {
    pub fn new(examples: Vec<(Vec<u32>, Vec<u32>)>) -> Self {
        Self { examples }
    }
}

impl ExampleStore for MemoryStore {
    fn len(&self) -> usize {
        self.examples.len()
    }

    fn random_example(&self, rng: &mut dyn RngCore) -> (Vec<u32>, Vec<u32>) {
        let index = rng.gen_range(0..self.examples.len());
        self.examples[index].clone()
    }
}

/// Store holding exactly one query with an empty response. Interactive
/// inference builds its batch of one from this, reusing the training
/// assembler unchanged.
pub struct SingletonStore {
    input: Vec<u32>,
}

impl SingletonStore {
    pub fn new(input: Vec<u32>) -> Self {
        Self { input }
    }
}

impl ExampleStore for SingletonStore {
    fn len(&self) -> usize {
        1
    }

    fn random_example(&self, _rng: &mut dyn RngCore) -> (Vec<u32>, Vec<u32>) {
        (self.input.clone(), Vec::new())
    }
}

/// Deterministically seeded random source for reproducible runs. Seed it
/// once at process start and thread it through every sampling call.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
