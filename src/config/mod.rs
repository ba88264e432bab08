use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use toml::Value;

/// Hyperparameters owned by the model collaborator, carried on the
/// configuration surface so one file drives a whole run.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelHyperparameters {
    /// Width of each recurrent layer.
    #[serde(default = "default_hidden_size")]
    pub hidden_size: usize,
    #[serde(default = "default_num_layers")]
    pub num_layers: usize,
    /// Keep probability applied to each layer's output; 1.0 disables
    /// dropout.
    #[serde(default = "default_dropout_keep")]
    pub dropout_keep: f64,
    /// Candidate count for sampled-softmax loss.
    #[serde(default = "default_softmax_samples")]
    pub softmax_samples: usize,
    /// Run the model in reduced (16-bit) precision instead of full.
    #[serde(default)]
    pub reduced_precision: bool,
}

impl Default for ModelHyperparameters {
    fn default() -> Self {
        Self {
            hidden_size: default_hidden_size(),
            num_layers: default_num_layers(),
            dropout_keep: default_dropout_keep(),
            softmax_samples: default_softmax_samples(),
            reduced_precision: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrainingHyperparameters {
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Gradient clipping threshold handed to the model collaborator.
    #[serde(default = "default_max_gradient_norm")]
    pub max_gradient_norm: f64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_num_epochs")]
    pub num_epochs: usize,
    /// Soft epoch boundary: an epoch ends once this many examples have
    /// been consumed.
    #[serde(default = "default_examples_per_epoch")]
    pub examples_per_epoch: usize,
}

impl Default for TrainingHyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            max_gradient_norm: default_max_gradient_norm(),
            batch_size: default_batch_size(),
            num_epochs: default_num_epochs(),
            examples_per_epoch: default_examples_per_epoch(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Directory holding one data file per bucket.
    #[serde(default = "default_buckets_dir")]
    pub buckets_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            buckets_dir: default_buckets_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CheckpointConfig {
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

impl CheckpointConfig {
    /// Full path of the checkpoint written after training.
    pub fn file_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_name)
    }
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            model_name: default_model_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct EvaluationConfig {
    /// Number of BLEU evaluation rounds; evaluation is disabled when
    /// absent.
    #[serde(default)]
    pub bleu_rounds: Option<usize>,
    /// Serve the interactive loop against a restored checkpoint instead
    /// of training.
    #[serde(default)]
    pub interactive: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct TrainingConfig {
    #[serde(default)]
    pub model: ModelHyperparameters,
    #[serde(default)]
    pub training: TrainingHyperparameters,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Load a configuration from an ordered list of TOML files; later files
/// override earlier ones key by key. Every key has a default, so an
/// empty list yields the stock configuration.
pub fn load_training_config(paths: &[PathBuf]) -> Result<TrainingConfig> {
    let mut iter = paths.iter();
    let Some(first_path) = iter.next() else {
        return Ok(TrainingConfig::default());
    };
    let mut value = load_value(first_path)?;

    for path in iter {
        let overlay = load_value(path)?;
        merge_values(&mut value, overlay);
    }

    value
        .try_into::<TrainingConfig>()
        .map_err(|err| anyhow!(err))
}

fn load_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    let table: toml::value::Table = toml::from_str(&content)
        .with_context(|| format!("failed to parse {} as TOML", path.display()))?;
    Ok(Value::Table(table))
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, overlay_value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => {
                        base_table.insert(key, overlay_value);
                    }
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn default_hidden_size() -> usize {
    512
}

fn default_num_layers() -> usize {
    2
}

fn default_dropout_keep() -> f64 {
    1.0
}

fn default_softmax_samples() -> usize {
    512
}

fn default_learning_rate() -> f64 {
    3e-4
}

fn default_max_gradient_norm() -> f64 {
    5.0
}

fn default_batch_size() -> usize {
    64
}

fn default_num_epochs() -> usize {
    5
}

fn default_examples_per_epoch() -> usize {
    500_000
}

fn default_buckets_dir() -> PathBuf {
    PathBuf::from("./bucket_data")
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("./model")
}

fn default_model_name() -> String {
    "model".to_string()
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn no_files_yields_the_stock_configuration() {
        let config = load_training_config(&[]).expect("load config");

        assert_eq!(config, TrainingConfig::default());
        assert_eq!(config.training.batch_size, 64);
        assert_eq!(config.training.examples_per_epoch, 500_000);
        assert_eq!(config.model.hidden_size, 512);
        assert_eq!(config.evaluation.bleu_rounds, None);
        assert!(!config.evaluation.interactive);
    }

    #[test]
    fn load_merges_in_order() {
        let dir = tempdir().expect("tempdir");

        let base_contents = [
            "[training]",
            "batch_size = 16",
            "num_epochs = 3",
            "examples_per_epoch = 1000",
            "",
            "[model]",
            "hidden_size = 256",
            "",
            "[checkpoint]",
            "model_dir = \"./runs\"",
        ]
        .join("\n");
        let base = write_config(dir.path(), "base.toml", &base_contents);

        let override_contents = [
            "[training]",
            "batch_size = 32",
            "",
            "[evaluation]",
            "interactive = true",
        ]
        .join("\n");
        let override_cfg = write_config(dir.path(), "override.toml", &override_contents);

        let config = load_training_config(&[base, override_cfg]).expect("load config");

        assert_eq!(config.training.batch_size, 32);
        assert_eq!(config.training.num_epochs, 3);
        assert_eq!(config.training.examples_per_epoch, 1000);
        assert_eq!(config.model.hidden_size, 256);
        assert_eq!(config.model.num_layers, 2);
        assert!(config.evaluation.interactive);
        assert_eq!(
            config.checkpoint.file_path(),
            PathBuf::from("./runs").join("model")
        );
    }

    #[test]
    fn a_malformed_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = write_config(dir.path(), "bad.toml", "not toml at all [");

        assert!(load_training_config(&[path]).is_err());
    }
}
