use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning an applicant into a model-ready feature vector
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodingError {
    #[error("Invalid number for {field}: {value:?}")]
    Parse { field: String, value: String },

    #[error("Unknown level {level:?} for {field} (known: {known})")]
    UnknownLevel {
        field: String,
        level: String,
        known: String,
    },

    #[error("Feature mismatch: {reason}")]
    FeatureMismatch { reason: String },
}

/// Errors related to applicant form validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicantError {
    #[error("{field} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors related to the trained model artifact and its invocation
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("Model artifact {} is unreadable: {reason}", path.display())]
    ArtifactUnreadable { path: PathBuf, reason: String },

    #[error("Unsupported artifact version: found v{found}, expected v{expected}")]
    UnsupportedArtifactVersion { found: u32, expected: u32 },

    #[error("Prediction failed: {message}")]
    Prediction { message: String },

    #[error("Training failed: {reason}")]
    Training { reason: String },
}

/// Errors related to loading the training dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required column {column:?}")]
    MissingColumn { column: String },

    #[error("Row {row}: column {column:?} holds non-numeric value {value:?}")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: unrecognised loan status {value:?}")]
    InvalidLabel { row: usize, value: String },

    #[error("Dataset contains no rows")]
    Empty,

    #[error("Dataset contains only {class} applications; both classes are required")]
    SingleClass { class: String },
}

/// Everything that can abort a single assessment request
#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Applicant(#[from] ApplicantError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
