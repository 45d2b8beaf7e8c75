pub mod gradient_boosting;
pub mod model;
pub mod random_forest;
pub mod split;
pub mod trainer;
pub mod voting;

pub use model::{ARTIFACT_FORMAT_VERSION, TrainedModel};
pub use trainer::{TrainingParams, TrainingPipeline};
