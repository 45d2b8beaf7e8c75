use crate::domain::errors::EncodingError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Ordered feature-name to value mapping fed to the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodedFeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
}

/// What [`EncodedFeatureVector::reindex`] had to change to line a vector up
/// with a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReindexReport {
    /// Model features the vector lacked, inserted as 0.
    pub filled: Vec<String>,
    /// Vector features the model does not know, removed.
    pub dropped: Vec<String>,
}

impl EncodedFeatureVector {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.names.push(name.into());
        self.values.push(value);
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Aligns this vector to `feature_names`.
    ///
    /// Output keys equal `feature_names` exactly, in order. Missing features
    /// are filled with 0 and unknown ones dropped; both are listed in the
    /// returned report. Fails when either side has duplicate names, the
    /// model exposes no features, or the two share no feature at all.
    pub fn reindex(
        &self,
        feature_names: &[String],
    ) -> Result<(EncodedFeatureVector, ReindexReport), EncodingError> {
        if feature_names.is_empty() {
            return Err(EncodingError::FeatureMismatch {
                reason: "model exposes no feature names".to_string(),
            });
        }
        if let Some(dup) = first_duplicate(feature_names) {
            return Err(EncodingError::FeatureMismatch {
                reason: format!("model lists feature {:?} more than once", dup),
            });
        }
        if let Some(dup) = first_duplicate(&self.names) {
            return Err(EncodingError::FeatureMismatch {
                reason: format!("encoded vector holds feature {:?} more than once", dup),
            });
        }

        let lookup: HashMap<&str, f64> = self.iter().collect();
        let known: HashSet<&str> = feature_names.iter().map(String::as_str).collect();

        let mut aligned = EncodedFeatureVector::with_capacity(feature_names.len());
        let mut report = ReindexReport::default();

        for name in feature_names {
            match lookup.get(name.as_str()) {
                Some(value) => aligned.push(name.clone(), *value),
                None => {
                    report.filled.push(name.clone());
                    aligned.push(name.clone(), 0.0);
                }
            }
        }

        report.dropped = self
            .names
            .iter()
            .filter(|n| !known.contains(n.as_str()))
            .cloned()
            .collect();

        if !self.is_empty() && report.filled.len() == feature_names.len() {
            return Err(EncodingError::FeatureMismatch {
                reason: format!(
                    "none of the {} encoded features is known to the model",
                    self.len()
                ),
            });
        }

        Ok((aligned, report))
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .map(String::as_str)
        .find(|name| !seen.insert(*name))
}
