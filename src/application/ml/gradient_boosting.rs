use super::random_forest::{check_training_shape, check_width};
use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

type TreeRegressor = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingParams {
    pub n_stages: usize,
    pub learning_rate: f64,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for GradientBoostingParams {
    fn default() -> Self {
        Self {
            n_stages: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Denominator floor for the Newton leaf step.
const MIN_HESSIAN: f64 = 1e-6;

/// One boosting round: the tree fitted on the residuals plus the Newton
/// value of each of its leaves.
///
/// smartcore does not expose leaf ids, so a leaf is identified by the value
/// the tree predicts for it. Leaves that happen to share a mean residual
/// share one pooled Newton value.
#[derive(Serialize, Deserialize)]
struct BoostingStage {
    tree: TreeRegressor,
    leaf_values: BTreeMap<u64, f64>,
}

impl BoostingStage {
    fn fit(
        tree: TreeRegressor,
        leaf_outputs: &[f64],
        residuals: &[f64],
        hessians: &[f64],
    ) -> Self {
        let mut sums: BTreeMap<u64, (f64, f64)> = BTreeMap::new();
        for ((out, g), h) in leaf_outputs.iter().zip(residuals).zip(hessians) {
            let entry = sums.entry(out.to_bits()).or_insert((0.0, 0.0));
            entry.0 += g;
            entry.1 += h;
        }
        let leaf_values = sums
            .into_iter()
            .map(|(leaf, (g, h))| (leaf, g / h.max(MIN_HESSIAN)))
            .collect();
        Self { tree, leaf_values }
    }

    /// Newton step for each row's leaf.
    fn steps<'a>(&'a self, leaf_outputs: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
        leaf_outputs.iter().map(move |out| {
            self.leaf_values
                .get(&out.to_bits())
                .copied()
                .unwrap_or(*out)
        })
    }
}

/// Binary log-loss boosting.
///
/// Raw score starts at the prior log-odds of label 1. Each stage fits a
/// regression tree to the pseudo-residuals `y - p`, then sets every leaf to
/// `Σ(y - p) / Σ p(1 - p)` over the training rows it holds and adds that
/// scaled by the learning rate. P(rejected) = σ(F).
#[derive(Serialize, Deserialize)]
pub struct GradientBoosting {
    n_features: usize,
    base_score: f64,
    learning_rate: f64,
    stages: Vec<BoostingStage>,
}

impl fmt::Debug for GradientBoosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientBoosting")
            .field("n_features", &self.n_features)
            .field("base_score", &self.base_score)
            .field("learning_rate", &self.learning_rate)
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl GradientBoosting {
    pub fn fit(
        rows: &[Vec<f64>],
        labels: &[i32],
        params: &GradientBoostingParams,
    ) -> Result<Self, ModelError> {
        let (n, p) = check_training_shape(rows, labels)?;
        if !(params.learning_rate > 0.0 && params.learning_rate <= 1.0) {
            return Err(ModelError::Training {
                reason: format!("learning rate {} not in (0, 1]", params.learning_rate),
            });
        }

        let targets: Vec<f64> = labels.iter().map(|&l| l as f64).collect();
        let prior = (targets.iter().sum::<f64>() / n as f64).clamp(1e-7, 1.0 - 1e-7);
        let base_score = (prior / (1.0 - prior)).ln();

        let x = DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| ModelError::Training {
            reason: format!("matrix creation failed: {}", e),
        })?;
        let tree_params = DecisionTreeRegressorParameters::default()
            .with_max_depth(params.max_depth)
            .with_min_samples_split(params.min_samples_split)
            .with_min_samples_leaf(params.min_samples_leaf);

        info!(
            "Fitting gradient boosting: {} stages, learning rate {}, depth {}, {} rows",
            params.n_stages, params.learning_rate, params.max_depth, n
        );

        let mut raw = vec![base_score; n];
        let mut stages = Vec::with_capacity(params.n_stages);
        for stage in 0..params.n_stages {
            let probs: Vec<f64> = raw.iter().map(|f| sigmoid(*f)).collect();
            let residuals: Vec<f64> = targets.iter().zip(&probs).map(|(y, p)| y - p).collect();
            let hessians: Vec<f64> = probs.iter().map(|p| p * (1.0 - p)).collect();

            let tree = TreeRegressor::fit(&x, &residuals, tree_params.clone()).map_err(|e| {
                ModelError::Training {
                    reason: format!("stage {} failed to fit: {}", stage, e),
                }
            })?;
            let leaf_outputs = tree.predict(&x).map_err(|e| ModelError::Training {
                reason: format!("stage {} failed to predict: {}", stage, e),
            })?;

            let stage_model = BoostingStage::fit(tree, &leaf_outputs, &residuals, &hessians);
            for (f, step) in raw.iter_mut().zip(stage_model.steps(&leaf_outputs)) {
                *f += params.learning_rate * step;
            }
            stages.push(stage_model);

            if (stage + 1) % 25 == 0 {
                debug!(
                    "Stage {}: training log-loss {:.5}",
                    stage + 1,
                    log_loss(&targets, &raw)
                );
            }
        }

        Ok(Self {
            n_features: p,
            base_score,
            learning_rate: params.learning_rate,
            stages,
        })
    }

    pub fn n_stages(&self) -> usize {
        self.stages.len()
    }

    pub fn reject_probabilities(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        check_width(rows, self.n_features)?;

        let x = DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| ModelError::Prediction {
            message: format!("matrix creation failed: {}", e),
        })?;

        let mut raw = vec![self.base_score; rows.len()];
        for stage in &self.stages {
            let leaf_outputs = stage.tree.predict(&x).map_err(|e| ModelError::Prediction {
                message: format!("stage prediction failed: {}", e),
            })?;
            for (f, step) in raw.iter_mut().zip(stage.steps(&leaf_outputs)) {
                *f += self.learning_rate * step;
            }
        }

        Ok(raw.into_iter().map(sigmoid).collect())
    }
}

fn log_loss(targets: &[f64], raw: &[f64]) -> f64 {
    let eps = 1e-15;
    let total: f64 = targets
        .iter()
        .zip(raw.iter())
        .map(|(y, f)| {
            let p = sigmoid(*f).clamp(eps, 1.0 - eps);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    total / targets.len().max(1) as f64
}
