use std::path::Path;

use anyhow::Result;

use crate::batch::Batch;

/// Result of a single model step.
#[derive(Clone, Debug)]
pub struct StepOutput {
    /// Clipped gradient norm; absent in inference mode.
    pub gradient_norm: Option<f32>,
    /// Scalar step loss; absent in inference mode.
    pub loss: Option<f32>,
    /// Per-timestep output distributions, `[output_len][batch][vocab]`.
    pub logits: Vec<Vec<Vec<f32>>>,
}

/// Capability interface for the trainable sequence model.
///
/// Any architecture implementing this plugs into the same scheduler and
/// batch assembler without change. The checkpoint format is owned by the
/// implementation.
pub trait SequenceModel {
    /// Run one step on a batch drawn from `bucket_id`. With
    /// `forward_only` set the model must not update parameters and
    /// returns logits for decoding; otherwise it trains on the batch and
    /// reports the step loss.
    fn step(&mut self, batch: &Batch, bucket_id: usize, forward_only: bool) -> Result<StepOutput>;

    fn save(&self, path: &Path) -> Result<()>;

    fn restore(&mut self, path: &Path) -> Result<()>;
}
