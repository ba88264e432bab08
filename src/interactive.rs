use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use rand::RngCore;
use tracing::warn;

use crate::batch::assemble_batch;
use crate::dataset::{Bucket, SingletonStore, bucket_for_input};
use crate::model::SequenceModel;
use crate::vocab::{EOS_ID, Vocabulary};

/// Serve a line-at-a-time inference session until `input` is exhausted.
///
/// Each line is encoded, routed to the smallest bucket whose input
/// capacity strictly exceeds its token count, run through the model as a
/// batch of one, greedily decoded, and printed. A line too long for
/// every bucket is reported on the session writer and the loop keeps
/// accepting input; end of input terminates cleanly.
pub fn run_interactive<M>(
    model: &mut M,
    vocab: &dyn Vocabulary,
    buckets: &[Bucket],
    rng: &mut dyn RngCore,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<()>
where
    M: SequenceModel,
{
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line.context("failed to read interactive input")?;
        let tokens = vocab.encode(&line);

        match bucket_for_input(buckets, tokens.len()) {
            Ok(bucket_id) => {
                let store = SingletonStore::new(tokens);
                let batch = assemble_batch(&store, buckets[bucket_id], 1, rng);
                let step = model.step(&batch, bucket_id, true)?;
                let reply = greedy_decode(&step.logits, 0);
                writeln!(output, "{}", vocab.decode(&reply))?;
            }
            Err(err) => {
                warn!("rejected interactive input: {err}");
                writeln!(output, "{err}")?;
            }
        }

        write!(output, "> ")?;
        output.flush()?;
    }

    Ok(())
}

/// Highest-probability token per time step for one batch member, up to
/// (and excluding) the first end-of-sequence marker.
pub fn greedy_decode(logits: &[Vec<Vec<f32>>], member: usize) -> Vec<u32> {
    let mut ids = Vec::new();
    for step in logits {
        let id = argmax(&step[member]);
        if id == EOS_ID {
            break;
        }
        ids.push(id);
    }
    ids
}

/// First index holding the maximum score.
fn argmax(scores: &[f32]) -> u32 {
    let mut best = 0usize;
    for (index, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = index;
        }
    }
    best as u32
}
