use crate::domain::errors::ModelError;
use crate::domain::ml::EncodedFeatureVector;
use crate::domain::ports::LoanClassifier;
use crate::domain::prediction::{LoanDecision, PredictionResult};
use tracing::debug;

/// Turns an aligned feature vector into a verdict.
///
/// Every failure is reported as `ModelError::Prediction` so the caller can
/// surface it for the current request and move on.
pub struct DecisionEngine;

impl DecisionEngine {
    pub fn decide(
        model: &dyn LoanClassifier,
        features: &EncodedFeatureVector,
    ) -> Result<PredictionResult, ModelError> {
        if features.names() != model.feature_names() {
            return Err(ModelError::Prediction {
                message: format!(
                    "feature vector is not aligned with {} ({} vs {} columns)",
                    model.name(),
                    features.len(),
                    model.feature_names().len()
                ),
            });
        }

        let label = model.predict(features.values()).map_err(into_prediction)?;
        let probabilities = model
            .predict_proba(features.values())
            .map_err(into_prediction)?;

        let decision = LoanDecision::from_label(label).map_err(into_prediction)?;
        let result = PredictionResult::new(decision, probabilities)?;

        debug!(
            "{} -> {} (P(approve)={:.4}, P(reject)={:.4})",
            model.name(),
            result.decision,
            result.approve_probability,
            result.reject_probability
        );
        Ok(result)
    }
}

fn into_prediction(err: ModelError) -> ModelError {
    match err {
        ModelError::Prediction { .. } => err,
        other => ModelError::Prediction {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubClassifier {
        names: Vec<String>,
        label: u8,
        proba: [f64; 2],
        fail: bool,
    }

    impl StubClassifier {
        fn new(label: u8, proba: [f64; 2]) -> Self {
            Self {
                names: vec!["cibil_score".to_string(), "gender_Women".to_string()],
                label,
                proba,
                fail: false,
            }
        }
    }

    impl LoanClassifier for StubClassifier {
        fn predict(&self, _features: &[f64]) -> Result<u8, ModelError> {
            if self.fail {
                return Err(ModelError::Training {
                    reason: "matrix is singular".to_string(),
                });
            }
            Ok(self.label)
        }

        fn predict_proba(&self, _features: &[f64]) -> Result<[f64; 2], ModelError> {
            Ok(self.proba)
        }

        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn aligned() -> EncodedFeatureVector {
        let mut v = EncodedFeatureVector::with_capacity(2);
        v.push("cibil_score", 750.0);
        v.push("gender_Women", 0.0);
        v
    }

    #[test]
    fn test_label_zero_is_approved() {
        let model = StubClassifier::new(0, [0.8, 0.2]);
        let result = DecisionEngine::decide(&model, &aligned()).unwrap();
        assert_eq!(result.decision, LoanDecision::Approved);
        assert_eq!(result.label(), 0);
        assert_eq!(result.probabilities(), [0.8, 0.2]);
    }

    #[test]
    fn test_label_one_is_rejected() {
        let model = StubClassifier::new(1, [0.3, 0.7]);
        let result = DecisionEngine::decide(&model, &aligned()).unwrap();
        assert_eq!(result.decision, LoanDecision::Rejected);
        assert!((result.confidence() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_misaligned_vector_is_prediction_error() {
        let model = StubClassifier::new(0, [0.8, 0.2]);
        let mut v = EncodedFeatureVector::with_capacity(2);
        v.push("gender_Women", 0.0);
        v.push("cibil_score", 750.0);

        let err = DecisionEngine::decide(&model, &v).unwrap_err();
        assert!(matches!(err, ModelError::Prediction { .. }));
    }

    #[test]
    fn test_model_failure_keeps_message() {
        let mut model = StubClassifier::new(0, [0.8, 0.2]);
        model.fail = true;

        let err = DecisionEngine::decide(&model, &aligned()).unwrap_err();
        match err {
            ModelError::Prediction { message } => assert!(message.contains("singular")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_inconsistent_model_output_is_refused() {
        let model = StubClassifier::new(0, [0.3, 0.7]);
        assert!(DecisionEngine::decide(&model, &aligned()).is_err());

        let model = StubClassifier::new(0, [0.6, 0.6]);
        assert!(DecisionEngine::decide(&model, &aligned()).is_err());
    }

    #[test]
    fn test_unknown_label_is_refused() {
        let model = StubClassifier::new(2, [0.6, 0.4]);
        assert!(DecisionEngine::decide(&model, &aligned()).is_err());
    }
}
