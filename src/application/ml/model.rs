use super::voting::SoftVotingEnsemble;
use crate::domain::errors::ModelError;
use crate::domain::evaluation::ClassificationReport;
use crate::domain::ml::{EncodingSchema, FeatureEncoder};
use crate::domain::ports::LoanClassifier;
use crate::domain::prediction::LoanDecision;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bumped whenever the persisted layout changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// The persisted output of training: the voting ensemble together with the
/// encoding it was fit on. Read-only once built.
#[derive(Serialize, Deserialize)]
pub struct TrainedModel {
    format_version: u32,
    trained_at: DateTime<Utc>,
    schema: EncodingSchema,
    feature_names: Vec<String>,
    ensemble: SoftVotingEnsemble,
    evaluation: Option<ClassificationReport>,
}

impl fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedModel")
            .field("format_version", &self.format_version)
            .field("trained_at", &self.trained_at)
            .field("features", &self.feature_names.len())
            .field("members", &self.ensemble.member_names())
            .finish()
    }
}

impl TrainedModel {
    pub fn new(
        schema: EncodingSchema,
        ensemble: SoftVotingEnsemble,
        evaluation: Option<ClassificationReport>,
    ) -> Self {
        let feature_names = schema.feature_names();
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            trained_at: Utc::now(),
            schema,
            feature_names,
            ensemble,
            evaluation,
        }
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn schema(&self) -> &EncodingSchema {
        &self.schema
    }

    pub fn evaluation(&self) -> Option<&ClassificationReport> {
        self.evaluation.as_ref()
    }

    pub fn ensemble(&self) -> &SoftVotingEnsemble {
        &self.ensemble
    }

    /// Encoder bound to this model's schema and feature order.
    pub fn encoder(&self) -> FeatureEncoder<'_> {
        FeatureEncoder::new(&self.schema, &self.feature_names)
    }
}

impl LoanClassifier for TrainedModel {
    fn predict(&self, features: &[f64]) -> Result<u8, ModelError> {
        let probabilities = self.predict_proba(features)?;
        Ok(LoanDecision::from_probabilities(probabilities).label())
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError> {
        if features.len() != self.feature_names.len() {
            return Err(ModelError::Prediction {
                message: format!(
                    "expected {} features, got {}",
                    self.feature_names.len(),
                    features.len()
                ),
            });
        }

        self.ensemble
            .predict_proba(&[features.to_vec()])?
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Prediction {
                message: "ensemble returned no probabilities".to_string(),
            })
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn name(&self) -> &str {
        "Soft-voting ensemble (Random Forest + Gradient Boosting)"
    }
}
