use super::encoding_schema::EncodingSchema;
use super::feature_vector::EncodedFeatureVector;
use crate::domain::applicant::ApplicantRecord;
use crate::domain::errors::EncodingError;
use tracing::{debug, warn};

/// Turns an [`ApplicantRecord`] into the vector a trained model expects.
pub struct FeatureEncoder<'a> {
    schema: &'a EncodingSchema,
    feature_names: &'a [String],
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(schema: &'a EncodingSchema, feature_names: &'a [String]) -> Self {
        Self {
            schema,
            feature_names,
        }
    }

    pub fn encode(&self, record: &ApplicantRecord) -> Result<EncodedFeatureVector, EncodingError> {
        let numeric = record.numeric_features()?;
        let computed = self
            .schema
            .expand(&numeric, &record.categorical_levels())?;

        let (aligned, report) = computed.reindex(self.feature_names)?;

        if !report.filled.is_empty() {
            debug!(
                "Zero-filled {} model features absent from the applicant: {:?}",
                report.filled.len(),
                report.filled
            );
        }
        if !report.dropped.is_empty() {
            warn!(
                "Dropped {} applicant features unknown to the model: {:?}",
                report.dropped.len(),
                report.dropped
            );
        }

        Ok(aligned)
    }
}
