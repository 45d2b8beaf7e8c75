use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use underwriter::application::ml::{TrainingParams, TrainingPipeline};
use underwriter::config::{Config, parse_delimiter};
use underwriter::infrastructure::logging::init_tracing;
use underwriter::infrastructure::{LoanDataset, ModelStore};

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the loan approval ensemble", long_about = None)]
struct Args {
    /// Path to the training CSV (overrides DATASET_PATH)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Path of the model artifact to write (overrides MODEL_PATH)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Field delimiter, e.g. ";" or "\t" (overrides DATASET_DELIMITER)
    #[arg(long)]
    delimiter: Option<String>,

    /// Share of rows held out for evaluation
    #[arg(long)]
    test_size: Option<f64>,

    /// Number of trees in the random forest
    #[arg(long)]
    n_trees: Option<usize>,

    /// Maximum depth of forest trees
    #[arg(long)]
    max_depth: Option<u16>,

    /// Number of boosting stages
    #[arg(long)]
    n_stages: Option<usize>,

    /// Seed for the split and both models
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.inference.log_format);

    let mut training = config.training.clone();
    if let Some(raw) = &args.delimiter {
        training.dataset_delimiter = parse_delimiter(raw)?;
    }
    if let Some(test_size) = args.test_size {
        training.test_size = test_size;
    }
    if let Some(n_trees) = args.n_trees {
        training.forest_trees = n_trees;
    }
    if let Some(max_depth) = args.max_depth {
        training.forest_max_depth = max_depth;
    }
    if let Some(n_stages) = args.n_stages {
        training.boosting_stages = n_stages;
    }
    if let Some(seed) = args.seed {
        training.split_seed = seed;
        training.model_seed = seed;
    }
    training.validate()?;

    let Some(input) = args.input.or_else(|| training.dataset_path.clone()) else {
        bail!("No dataset given: pass --input or set DATASET_PATH");
    };
    let output = args
        .output
        .unwrap_or_else(|| config.inference.model_path.clone());

    let dataset = LoanDataset::from_csv_path(&input, training.dataset_delimiter)
        .with_context(|| format!("Failed to load dataset {:?}", input))?;

    let pipeline = TrainingPipeline::new(TrainingParams::from(&training));
    let model = pipeline.run(&dataset).context("Training failed")?;

    if let Some(report) = model.evaluation() {
        println!("Accuracy: {:.4}", report.accuracy);
        println!("Classification Report:\n{}", report);
    }

    ModelStore::new(&output).save(&model)?;
    info!("Model saved to {:?}", output);
    println!("Model saved to: {}", output.display());
    Ok(())
}
