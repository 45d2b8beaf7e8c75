use super::gradient_boosting::GradientBoosting;
use super::random_forest::RandomForest;
use crate::domain::errors::ModelError;
use crate::domain::prediction::LoanDecision;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VotingMember {
    RandomForest(RandomForest),
    GradientBoosting(GradientBoosting),
}

impl VotingMember {
    pub fn name(&self) -> &'static str {
        match self {
            VotingMember::RandomForest(_) => "Random Forest",
            VotingMember::GradientBoosting(_) => "Gradient Boosting",
        }
    }

    fn reject_probabilities(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        match self {
            VotingMember::RandomForest(m) => m.reject_probabilities(rows),
            VotingMember::GradientBoosting(m) => m.reject_probabilities(rows),
        }
    }
}

/// Soft-voting ensemble: class probabilities are the arithmetic mean of the
/// members' class probabilities, and the label is their argmax.
#[derive(Debug, Serialize, Deserialize)]
pub struct SoftVotingEnsemble {
    members: Vec<VotingMember>,
}

impl SoftVotingEnsemble {
    pub fn new(members: Vec<VotingMember>) -> Result<Self, ModelError> {
        if members.is_empty() {
            return Err(ModelError::Training {
                reason: "voting ensemble needs at least one member".to_string(),
            });
        }
        Ok(Self { members })
    }

    pub fn member_names(&self) -> Vec<&'static str> {
        self.members.iter().map(VotingMember::name).collect()
    }

    /// `[P(approved), P(rejected)]` per row.
    pub fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>, ModelError> {
        let per_member = self
            .members
            .iter()
            .map(|m| m.reject_probabilities(rows))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(average_reject_probabilities(&per_member, rows.len()))
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<LoanDecision>, ModelError> {
        Ok(self
            .predict_proba(rows)?
            .into_iter()
            .map(LoanDecision::from_probabilities)
            .collect())
    }
}

fn average_reject_probabilities(per_member: &[Vec<f64>], n_rows: usize) -> Vec<[f64; 2]> {
    let k = per_member.len() as f64;
    (0..n_rows)
        .map(|i| {
            let reject = per_member.iter().map(|probs| probs[i]).sum::<f64>() / k;
            [1.0 - reject, reject]
        })
        .collect()
}
