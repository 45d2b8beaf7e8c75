// Per-request decision over an encoded vector
pub mod decision_engine;

// Ensemble members, voting and the offline training pipeline
pub mod ml;

// Applicant-facing summary
pub mod report;

// Request orchestration: validate, encode, decide, EMI, report
pub mod underwriting;
