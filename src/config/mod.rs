//! Configuration module for the underwriter.
//!
//! Values come from environment variables (a `.env` file is loaded by the
//! binaries first), grouped by stage: Inference and Training. Each group can
//! also be built from an arbitrary lookup function, which is what the tests
//! use instead of touching the process environment.

mod inference_config;
mod training_config;

pub use inference_config::{DEFAULT_MODEL_PATH, InferenceEnvConfig, LogFormat};
pub use training_config::{TrainingEnvConfig, parse_delimiter};

use anyhow::{Result, anyhow};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub inference: InferenceEnvConfig,
    pub training: TrainingEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(lookup_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            inference: InferenceEnvConfig::from_lookup(&lookup)?,
            training: TrainingEnvConfig::from_lookup(&lookup)?,
        })
    }
}

pub(crate) fn lookup_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Parses `key` when present; an absent key yields `default`, a malformed one
/// is an error naming the variable.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Failed to parse {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}
