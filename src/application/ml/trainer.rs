use super::gradient_boosting::{GradientBoosting, GradientBoostingParams};
use super::model::TrainedModel;
use super::random_forest::{RandomForest, RandomForestParams};
use super::split::train_test_split;
use super::voting::{SoftVotingEnsemble, VotingMember};
use crate::config::TrainingEnvConfig;
use crate::domain::errors::ModelError;
use crate::domain::evaluation::ClassificationReport;
use crate::domain::prediction::LoanDecision;
use crate::infrastructure::dataset::LoanDataset;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingParams {
    pub test_size: f64,
    pub split_seed: u64,
    pub forest: RandomForestParams,
    pub boosting: GradientBoostingParams,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            split_seed: 42,
            forest: RandomForestParams::default(),
            boosting: GradientBoostingParams::default(),
        }
    }
}

impl From<&TrainingEnvConfig> for TrainingParams {
    fn from(config: &TrainingEnvConfig) -> Self {
        Self {
            test_size: config.test_size,
            split_seed: config.split_seed,
            forest: RandomForestParams {
                n_trees: config.forest_trees,
                max_depth: config.forest_max_depth,
                min_samples_split: config.forest_min_samples_split,
                feature_fraction: config.forest_feature_fraction,
                seed: config.model_seed,
                ..Default::default()
            },
            boosting: GradientBoostingParams {
                n_stages: config.boosting_stages,
                learning_rate: config.boosting_learning_rate,
                max_depth: config.boosting_max_depth,
                ..Default::default()
            },
        }
    }
}

/// Offline stage: split, fit both members, combine by soft voting, score
/// the held-out rows.
pub struct TrainingPipeline {
    params: TrainingParams,
}

impl TrainingPipeline {
    pub fn new(params: TrainingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    pub fn run(&self, dataset: &LoanDataset) -> Result<TrainedModel, ModelError> {
        let started = Instant::now();
        let split = train_test_split(dataset.len(), self.params.test_size, self.params.split_seed)?;
        info!(
            "Split {} rows into {} train / {} test (seed {})",
            dataset.len(),
            split.train.len(),
            split.test.len(),
            self.params.split_seed
        );

        let (train_x, train_y) = dataset.select(&split.train);
        let (test_x, test_y) = dataset.select(&split.test);
        let train_labels: Vec<i32> = train_y.iter().map(|d| d.label() as i32).collect();

        let forest = RandomForest::fit(&train_x, &train_labels, &self.params.forest)?;
        info!("Random forest fitted with {} trees", forest.n_trees());

        let boosting = GradientBoosting::fit(&train_x, &train_labels, &self.params.boosting)?;
        info!("Gradient boosting fitted with {} stages", boosting.n_stages());

        let ensemble = SoftVotingEnsemble::new(vec![
            VotingMember::RandomForest(forest),
            VotingMember::GradientBoosting(boosting),
        ])?;

        let predicted: Vec<LoanDecision> = ensemble.predict(&test_x)?;
        let report = ClassificationReport::from_predictions(&test_y, &predicted);
        info!(
            "Held-out accuracy {:.4} on {} rows (training took {:.1?})",
            report.accuracy,
            report.samples,
            started.elapsed()
        );

        Ok(TrainedModel::new(
            dataset.schema().clone(),
            ensemble,
            Some(report),
        ))
    }
}
