use crate::domain::errors::ModelError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};
use std::fmt;
use tracing::info;

type TreeClassifier = DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Share of columns each tree sees (random subspace per tree)
    pub feature_fraction: f64,
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 12,
            min_samples_split: 2,
            min_samples_leaf: 1,
            feature_fraction: 0.7,
            seed: 42,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ForestTree {
    columns: Vec<usize>,
    tree: TreeClassifier,
}

/// Bagged decision trees. P(rejected) is the share of trees voting label 1.
#[derive(Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<ForestTree>,
}

impl fmt::Debug for RandomForest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomForest")
            .field("n_features", &self.n_features)
            .field("trees", &self.trees.len())
            .finish()
    }
}

impl RandomForest {
    /// Fits `n_trees` trees in parallel. Tree `i` draws its bootstrap sample
    /// and column subset from `seed + i`, so a fit is reproducible regardless
    /// of thread scheduling.
    pub fn fit(
        rows: &[Vec<f64>],
        labels: &[i32],
        params: &RandomForestParams,
    ) -> Result<Self, ModelError> {
        let (n, p) = check_training_shape(rows, labels)?;
        if params.n_trees == 0 {
            return Err(ModelError::Training {
                reason: "random forest needs at least one tree".to_string(),
            });
        }

        let subspace = ((p as f64 * params.feature_fraction).round() as usize).clamp(1, p);
        let tree_params = DecisionTreeClassifierParameters::default()
            .with_max_depth(params.max_depth)
            .with_min_samples_split(params.min_samples_split)
            .with_min_samples_leaf(params.min_samples_leaf);

        info!(
            "Fitting random forest: {} trees, {}/{} columns per tree, {} rows",
            params.n_trees, subspace, p, n
        );

        let trees = (0..params.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(i as u64));

                let mut sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                ensure_both_classes(&mut sample, labels);

                let mut columns: Vec<usize> = (0..p).collect();
                columns.shuffle(&mut rng);
                columns.truncate(subspace);
                columns.sort_unstable();

                let x: Vec<Vec<f64>> = sample
                    .iter()
                    .map(|&r| project(&rows[r], &columns))
                    .collect();
                let y: Vec<i32> = sample.iter().map(|&r| labels[r]).collect();

                let x = DenseMatrix::from_2d_vec(&x).map_err(|e| ModelError::Training {
                    reason: format!("matrix creation failed: {}", e),
                })?;
                let tree = TreeClassifier::fit(&x, &y, tree_params.clone()).map_err(|e| {
                    ModelError::Training {
                        reason: format!("tree {} failed to fit: {}", i, e),
                    }
                })?;

                Ok(ForestTree { columns, tree })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(Self {
            n_features: p,
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn reject_probabilities(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        check_width(rows, self.n_features)?;

        let mut votes = vec![0.0; rows.len()];
        for member in &self.trees {
            let x: Vec<Vec<f64>> = rows.iter().map(|r| project(r, &member.columns)).collect();
            let x = DenseMatrix::from_2d_vec(&x).map_err(|e| ModelError::Prediction {
                message: format!("matrix creation failed: {}", e),
            })?;
            let predicted = member.tree.predict(&x).map_err(|e| ModelError::Prediction {
                message: format!("tree prediction failed: {}", e),
            })?;

            for (vote, label) in votes.iter_mut().zip(predicted.iter()) {
                if *label == 1 {
                    *vote += 1.0;
                }
            }
        }

        let n_trees = self.trees.len() as f64;
        Ok(votes.into_iter().map(|v| v / n_trees).collect())
    }
}

fn project(row: &[f64], columns: &[usize]) -> Vec<f64> {
    columns.iter().map(|&c| row[c]).collect()
}

/// A tree needs both classes in its sample; swap the first draw for a row
/// of the missing class when the bootstrap happened to miss one.
fn ensure_both_classes(sample: &mut [usize], labels: &[i32]) {
    let Some(&first) = sample.first() else {
        return;
    };
    let class = labels[first];
    if sample.iter().all(|&r| labels[r] == class) {
        if let Some(other) = labels.iter().position(|&l| l != class) {
            sample[0] = other;
        }
    }
}

pub(crate) fn check_training_shape(
    rows: &[Vec<f64>],
    labels: &[i32],
) -> Result<(usize, usize), ModelError> {
    let n = rows.len();
    if n == 0 {
        return Err(ModelError::Training {
            reason: "no training rows".to_string(),
        });
    }
    if labels.len() != n {
        return Err(ModelError::Training {
            reason: format!("{} rows but {} labels", n, labels.len()),
        });
    }
    let p = rows[0].len();
    if p == 0 || rows.iter().any(|r| r.len() != p) {
        return Err(ModelError::Training {
            reason: "training rows must share a non-zero width".to_string(),
        });
    }
    if !labels.contains(&0) || !labels.contains(&1) {
        return Err(ModelError::Training {
            reason: "training labels must contain both 0 and 1".to_string(),
        });
    }
    Ok((n, p))
}

pub(crate) fn check_width(rows: &[Vec<f64>], expected: usize) -> Result<(), ModelError> {
    match rows.iter().find(|r| r.len() != expected) {
        Some(bad) => Err(ModelError::Prediction {
            message: format!("expected {} features, got {}", expected, bad.len()),
        }),
        None => Ok(()),
    }
}
