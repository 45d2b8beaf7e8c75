use crate::domain::errors::ModelError;

/// What the decision engine needs from a loaded model.
pub trait LoanClassifier: Send + Sync {
    /// Class label for one aligned feature row: 0 approved, 1 rejected
    fn predict(&self, features: &[f64]) -> Result<u8, ModelError>;

    /// `[P(approved), P(rejected)]` for one aligned feature row
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError>;

    /// Feature names in the order the model was fit on
    fn feature_names(&self) -> &[String];

    /// Get model name/type
    fn name(&self) -> &str;
}
