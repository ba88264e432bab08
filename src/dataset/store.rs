use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::{Bucket, MemoryStore};

/// Load one store per bucket from `bucket_<input>_<output>.jsonl` files
/// under `dir`. Each line holds one example as a pair of token-id
/// arrays.
///
/// A missing directory is a configuration error. A missing bucket file
/// yields an empty store; the schedule rejects the corpus only when
/// every bucket comes back empty.
pub fn read_bucket_stores(dir: &Path, buckets: &[Bucket]) -> Result<Vec<MemoryStore>> {
    if !dir.is_dir() {
        bail!("bucket data directory {} does not exist", dir.display());
    }

    buckets
        .iter()
        .map(|&bucket| read_store(dir, bucket))
        .collect()
}

fn read_store(dir: &Path, bucket: Bucket) -> Result<MemoryStore> {
    let path = dir.join(format!(
        "bucket_{}_{}.jsonl",
        bucket.input_len, bucket.output_len
    ));
    if !path.is_file() {
        return Ok(MemoryStore::new(Vec::new()));
    }

    let file = File::open(&path)
        .with_context(|| format!("failed to open bucket data file {}", path.display()))?;

    let mut examples = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let pair: (Vec<u32>, Vec<u32>) = serde_json::from_str(&line).with_context(|| {
            format!(
                "malformed example on line {} of {}",
                number + 1,
                path.display()
            )
        })?;
        examples.push(pair);
    }

    Ok(MemoryStore::new(examples))
}
