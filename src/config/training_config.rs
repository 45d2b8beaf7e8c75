//! Training-side configuration: dataset location, split and model
//! hyper-parameters.

use super::{lookup_env, parse_or};
use anyhow::{Result, bail};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingEnvConfig {
    pub dataset_path: Option<PathBuf>,
    pub dataset_delimiter: u8,
    pub test_size: f64,
    pub split_seed: u64,

    // Random forest
    pub forest_trees: usize,
    pub forest_max_depth: u16,
    pub forest_min_samples_split: usize,
    pub forest_feature_fraction: f64,

    // Gradient boosting
    pub boosting_stages: usize,
    pub boosting_learning_rate: f64,
    pub boosting_max_depth: u16,

    pub model_seed: u64,
}

impl Default for TrainingEnvConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            dataset_delimiter: b',',
            test_size: 0.2,
            split_seed: 42,
            forest_trees: 100,
            forest_max_depth: 12,
            forest_min_samples_split: 2,
            forest_feature_fraction: 0.7,
            boosting_stages: 100,
            boosting_learning_rate: 0.1,
            boosting_max_depth: 3,
            model_seed: 42,
        }
    }
}

impl TrainingEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(lookup_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();

        let config = Self {
            dataset_path: lookup("DATASET_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            dataset_delimiter: match lookup("DATASET_DELIMITER") {
                Some(raw) => parse_delimiter(&raw)?,
                None => d.dataset_delimiter,
            },
            test_size: parse_or(&lookup, "TEST_SIZE", d.test_size)?,
            split_seed: parse_or(&lookup, "SPLIT_SEED", d.split_seed)?,
            forest_trees: parse_or(&lookup, "FOREST_TREES", d.forest_trees)?,
            forest_max_depth: parse_or(&lookup, "FOREST_MAX_DEPTH", d.forest_max_depth)?,
            forest_min_samples_split: parse_or(
                &lookup,
                "FOREST_MIN_SAMPLES_SPLIT",
                d.forest_min_samples_split,
            )?,
            forest_feature_fraction: parse_or(
                &lookup,
                "FOREST_FEATURE_FRACTION",
                d.forest_feature_fraction,
            )?,
            boosting_stages: parse_or(&lookup, "BOOSTING_STAGES", d.boosting_stages)?,
            boosting_learning_rate: parse_or(
                &lookup,
                "BOOSTING_LEARNING_RATE",
                d.boosting_learning_rate,
            )?,
            boosting_max_depth: parse_or(&lookup, "BOOSTING_MAX_DEPTH", d.boosting_max_depth)?,
            model_seed: parse_or(&lookup, "MODEL_SEED", d.model_seed)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            bail!("TEST_SIZE must be in (0, 1), got {}", self.test_size);
        }
        if self.forest_trees == 0 {
            bail!("FOREST_TREES must be at least 1");
        }
        if !(self.forest_feature_fraction > 0.0 && self.forest_feature_fraction <= 1.0) {
            bail!(
                "FOREST_FEATURE_FRACTION must be in (0, 1], got {}",
                self.forest_feature_fraction
            );
        }
        if !(self.boosting_learning_rate > 0.0 && self.boosting_learning_rate <= 1.0) {
            bail!(
                "BOOSTING_LEARNING_RATE must be in (0, 1], got {}",
                self.boosting_learning_rate
            );
        }
        Ok(())
    }
}

/// Accepts a single ASCII character, or `\t` / `tab` for tab-separated files.
pub fn parse_delimiter(raw: &str) -> Result<u8> {
    match raw {
        "\\t" | "tab" | "\t" => return Ok(b'\t'),
        _ => {}
    }
    let trimmed = raw.trim();
    match trimmed.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => bail!("DATASET_DELIMITER must be a single ASCII character, got {:?}", raw),
    }
}
