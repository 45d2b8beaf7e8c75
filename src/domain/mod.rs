// Applicant input and form validation
pub mod applicant;

// Equal monthly installment arithmetic
pub mod emi;

// Model evaluation metrics
pub mod evaluation;

// Feature encoding shared by training and inference
pub mod ml;

// Port interfaces
pub mod ports;

// Verdict and probability types
pub mod prediction;

// Domain-specific error types
pub mod errors;
