use rand::RngCore;

use crate::dataset::{Bucket, ExampleStore};
use crate::vocab::{GO_ID, PAD_ID};

/// One model step's worth of aligned arrays, padded to the owning
/// bucket's capacities.
///
/// The outer index is the time step and the inner index the batch
/// member: the model consumes per-timestep slices, so the layout is a
/// required interface shape, not an implementation choice. Batches are
/// ephemeral; none outlives the step that consumes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    /// `[input_len][n]`, inputs reversed and left-padded.
    pub encoder_inputs: Vec<Vec<u32>>,
    /// `[output_len][n]`, outputs prefixed with `GO_ID` and right-padded.
    pub decoder_inputs: Vec<Vec<u32>>,
    /// `[output_len][n]`, 1.0 at real target positions, 0.0 at padding.
    pub target_weights: Vec<Vec<f32>>,
}

impl Batch {
    /// Number of batch members.
    pub fn size(&self) -> usize {
        self.encoder_inputs.first().map(Vec::len).unwrap_or(0)
    }
}

/// Draw `n` examples from `store`, with replacement, and pad them into
/// `bucket`'s envelope.
///
/// Inputs are reversed and left-padded to `input_len`; the reversal is
/// part of the contract toward the model, which aligns the decoder
/// against it. Outputs gain a leading `GO_ID`, are truncated to
/// `output_len - 1`, and right-padded with `PAD_ID`. A position's weight
/// is zero exactly when it has no real target to predict: the final time
/// step, and every step whose target token is `PAD_ID`.
pub fn assemble_batch(
    store: &dyn ExampleStore,
    bucket: Bucket,
    n: usize,
    rng: &mut dyn RngCore,
) -> Batch {
    let mut encoder_rows = Vec::with_capacity(n);
    let mut decoder_rows = Vec::with_capacity(n);

    for _ in 0..n {
        let (input, output) = store.random_example(rng);
        encoder_rows.push(encoder_row(&input, bucket.input_len));
        decoder_rows.push(decoder_row(&output, bucket.output_len));
    }

    let target_weights = (0..bucket.output_len)
        .map(|step| {
            decoder_rows
                .iter()
                .map(|row| {
                    let last = step + 1 == bucket.output_len;
                    if last || row[step + 1] == PAD_ID {
                        0.0
                    } else {
                        1.0
                    }
                })
                .collect()
        })
        .collect();

    Batch {
        encoder_inputs: transpose(&encoder_rows, bucket.input_len),
        decoder_inputs: transpose(&decoder_rows, bucket.output_len),
        target_weights,
    }
}

fn encoder_row(input: &[u32], capacity: usize) -> Vec<u32> {
    let take = input.len().min(capacity);
    let mut row = vec![PAD_ID; capacity - take];
    row.extend(input[..take].iter().rev());
    row
}

fn decoder_row(output: &[u32], capacity: usize) -> Vec<u32> {
    let take = output.len().min(capacity.saturating_sub(1));
    let mut row = Vec::with_capacity(capacity);
    row.push(GO_ID);
    row.extend_from_slice(&output[..take]);
    row.resize(capacity, PAD_ID);
    row
}

fn transpose(rows: &[Vec<u32>], width: usize) -> Vec<Vec<u32>> {
    (0..width)
        .map(|step| rows.iter().map(|row| row[step]).collect())
        .collect()
}
