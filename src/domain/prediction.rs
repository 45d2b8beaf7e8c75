use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed drift of P(approve) + P(reject) away from 1.0.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Binary verdict. Numeric label 0 is approved, 1 is rejected; probability
/// index 0 is P(approved) and index 1 is P(rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanDecision {
    Approved,
    Rejected,
}

impl LoanDecision {
    pub const ALL: [LoanDecision; 2] = [LoanDecision::Approved, LoanDecision::Rejected];

    pub fn from_label(label: u8) -> Result<Self, ModelError> {
        match label {
            0 => Ok(LoanDecision::Approved),
            1 => Ok(LoanDecision::Rejected),
            other => Err(ModelError::Prediction {
                message: format!("model returned label {} outside {{0, 1}}", other),
            }),
        }
    }

    pub fn label(&self) -> u8 {
        match self {
            LoanDecision::Approved => 0,
            LoanDecision::Rejected => 1,
        }
    }

    /// Argmax over `[P(approved), P(rejected)]`; a tie resolves to approved.
    pub fn from_probabilities(probabilities: [f64; 2]) -> Self {
        if probabilities[1] > probabilities[0] {
            LoanDecision::Rejected
        } else {
            LoanDecision::Approved
        }
    }

    /// Parses a dataset status cell: `0`/`1` or `Approved`/`Rejected`.
    pub fn from_status(raw: &str) -> Option<Self> {
        let status = raw.trim().to_ascii_lowercase();
        match status.as_str() {
            "approved" => return Some(LoanDecision::Approved),
            "rejected" => return Some(LoanDecision::Rejected),
            _ => {}
        }
        match status.parse::<f64>() {
            Ok(v) if v == 0.0 => Some(LoanDecision::Approved),
            Ok(v) if v == 1.0 => Some(LoanDecision::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for LoanDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanDecision::Approved => write!(f, "Approved"),
            LoanDecision::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub decision: LoanDecision,
    pub approve_probability: f64,
    pub reject_probability: f64,
}

impl PredictionResult {
    /// Validates that the pair is a distribution and agrees with `decision`.
    pub fn new(decision: LoanDecision, probabilities: [f64; 2]) -> Result<Self, ModelError> {
        let [approve, reject] = probabilities;
        if !(0.0..=1.0).contains(&approve) || !(0.0..=1.0).contains(&reject) {
            return Err(ModelError::Prediction {
                message: format!("probabilities out of range: [{}, {}]", approve, reject),
            });
        }
        if ((approve + reject) - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ModelError::Prediction {
                message: format!(
                    "probabilities sum to {} instead of 1.0",
                    approve + reject
                ),
            });
        }
        if LoanDecision::from_probabilities(probabilities) != decision {
            return Err(ModelError::Prediction {
                message: format!(
                    "label {} disagrees with probabilities [{:.4}, {:.4}]",
                    decision.label(),
                    approve,
                    reject
                ),
            });
        }

        Ok(Self {
            decision,
            approve_probability: approve,
            reject_probability: reject,
        })
    }

    pub fn label(&self) -> u8 {
        self.decision.label()
    }

    pub fn probabilities(&self) -> [f64; 2] {
        [self.approve_probability, self.reject_probability]
    }

    /// Probability of the class that was chosen.
    pub fn confidence(&self) -> f64 {
        match self.decision {
            LoanDecision::Approved => self.approve_probability,
            LoanDecision::Rejected => self.reject_probability,
        }
    }
}
