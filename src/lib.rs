pub mod batch;
pub mod config;
pub mod dataset;
pub mod error;
pub mod interactive;
pub mod model;
pub mod progress;
pub mod train;
pub mod vocab;

pub use batch::{Batch, assemble_batch};
pub use config::{
    CheckpointConfig, DataConfig, EvaluationConfig, ModelHyperparameters, TrainingConfig,
    TrainingHyperparameters, load_training_config,
};
pub use dataset::schedule::BucketSchedule;
pub use dataset::{
    Bucket, ExampleStore, MemoryStore, SingletonStore, bucket_for_input, default_buckets,
    read_bucket_stores, seeded_rng,
};
pub use error::BucketError;
pub use interactive::{greedy_decode, run_interactive};
pub use model::{SequenceModel, StepOutput};
pub use progress::{
    ConsoleProgressSink, NullProgressSink, ProgressSink, StepReport, format_duration,
};
pub use train::run_training;
pub use vocab::{EOS_ID, GO_ID, PAD_ID, UNK_ID, Vocabulary};
