//! Inference-side configuration: where the model lives, where reports go,
//! and how logs look.

use super::{lookup_env, parse_or};
use anyhow::{Result, bail};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_MODEL_PATH: &str = "models/ensemble_model.json";

/// Console log rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => bail!("Invalid LOG_FORMAT: {}. Must be 'pretty' or 'compact'", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceEnvConfig {
    pub model_path: PathBuf,
    pub report_dir: Option<PathBuf>,
    /// Percent per year, used when an applicant supplies no rate
    pub default_interest_rate: f64,
    pub log_format: LogFormat,
}

impl Default for InferenceEnvConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            report_dir: None,
            default_interest_rate: 7.5,
            log_format: LogFormat::Pretty,
        }
    }
}

impl InferenceEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(lookup_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_interest_rate =
            parse_or(&lookup, "DEFAULT_INTEREST_RATE", defaults.default_interest_rate)?;
        if !default_interest_rate.is_finite() || default_interest_rate < 0.0 {
            bail!(
                "DEFAULT_INTEREST_RATE must be a non-negative percentage, got {}",
                default_interest_rate
            );
        }

        Ok(Self {
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            report_dir: lookup("REPORT_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            default_interest_rate,
            log_format: parse_or(&lookup, "LOG_FORMAT", defaults.log_format)?,
        })
    }
}
