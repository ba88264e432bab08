use std::fs;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use rand::RngCore;
use tracing::info;

use crate::batch::assemble_batch;
use crate::config::TrainingConfig;
use crate::dataset::schedule::BucketSchedule;
use crate::dataset::{Bucket, ExampleStore};
use crate::model::SequenceModel;
use crate::progress::{ProgressSink, StepReport};

/// Train `model` over the bucket `stores` for the configured number of
/// epochs, then write a single checkpoint.
///
/// An epoch ends once `examples_per_epoch` examples have been consumed;
/// the final batch may overshoot the threshold by up to
/// `batch_size - 1`, which is accepted rather than corrected. There are
/// no retries and no resumption: a failing step aborts the run, and a
/// crash before the checkpoint write loses the run's progress.
pub fn run_training<M, S>(
    model: &mut M,
    buckets: &[Bucket],
    stores: &[S],
    config: &TrainingConfig,
    rng: &mut dyn RngCore,
    progress: &mut dyn ProgressSink,
) -> Result<()>
where
    M: SequenceModel,
    S: ExampleStore,
{
    let training = &config.training;
    if training.batch_size == 0 {
        bail!("batch_size must be at least 1");
    }
    if training.examples_per_epoch == 0 {
        bail!("examples_per_epoch must be at least 1");
    }
    if buckets.len() != stores.len() {
        bail!(
            "{} buckets configured but {} stores provided",
            buckets.len(),
            stores.len()
        );
    }

    let sizes: Vec<usize> = stores.iter().map(ExampleStore::len).collect();
    for (id, size) in sizes.iter().enumerate() {
        info!("bucket {id} holds {size} examples");
    }
    info!(
        "corpus holds {} examples across {} buckets",
        sizes.iter().sum::<usize>(),
        sizes.len()
    );

    let schedule = BucketSchedule::new(&sizes)?;

    for epoch in 1..=training.num_epochs {
        progress.epoch_started(epoch, training.num_epochs);
        let started = Instant::now();
        let mut examples_trained = 0usize;
        let mut losses = Vec::new();

        while examples_trained < training.examples_per_epoch {
            let bucket_id = schedule.sample(rng);
            let batch = assemble_batch(
                &stores[bucket_id],
                buckets[bucket_id],
                training.batch_size,
                rng,
            );
            let output = model
                .step(&batch, bucket_id, false)
                .with_context(|| format!("model step failed in epoch {epoch}"))?;
            let loss = output.loss.context("training step reported no loss")?;

            examples_trained += training.batch_size;
            losses.push(loss);

            progress.step_completed(&StepReport {
                epoch,
                examples_trained,
                examples_per_epoch: training.examples_per_epoch,
                mean_loss: losses.iter().sum::<f32>() / losses.len() as f32,
                elapsed: started.elapsed(),
            });
        }

        progress.epoch_finished(epoch);
    }

    let checkpoint = &config.checkpoint;
    fs::create_dir_all(&checkpoint.model_dir).with_context(|| {
        format!(
            "failed to create checkpoint directory {}",
            checkpoint.model_dir.display()
        )
    })?;
    let path = checkpoint.file_path();
    model
        .save(&path)
        .with_context(|| format!("failed to write checkpoint {}", path.display()))?;
    info!("checkpoint written to {}", path.display());

    Ok(())
}
