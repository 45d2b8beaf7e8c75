mod common;

use std::fs;
use underwriter::application::ml::{ARTIFACT_FORMAT_VERSION, TrainingPipeline};
use underwriter::domain::errors::ModelError;
use underwriter::domain::ports::LoanClassifier;
use underwriter::infrastructure::{LoanDataset, ModelStore};

#[test]
fn test_training_reports_held_out_metrics() {
    common::init_logging();
    let (dir, path) = common::write_dataset(200, 11);

    let dataset = LoanDataset::from_csv_path(&path, b',').unwrap();
    assert_eq!(dataset.len(), 200);

    let model = TrainingPipeline::new(common::fast_params())
        .run(&dataset)
        .unwrap();

    let report = model.evaluation().expect("evaluation is stored with the model");
    assert_eq!(report.samples, 40);
    assert!(report.accuracy > 0.75, "accuracy too low:\n{}", report);
    assert_eq!(report.classes.len(), 2);
    assert_eq!(
        report.classes.iter().map(|c| c.support).sum::<usize>(),
        40
    );

    // Feature list is numeric columns then indicators, reference levels dropped.
    let names = model.feature_names();
    assert_eq!(names[0], "cibil_score");
    assert!(names.contains(&"employee_status_unemployed".to_string()));
    assert!(names.contains(&"loan_purpose_Home Renovation".to_string()));
    assert!(!names.contains(&"loan_purpose_Education".to_string()));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_training_is_reproducible() {
    let (dir, path) = common::write_dataset(120, 5);
    let dataset = LoanDataset::from_csv_path(&path, b',').unwrap();

    let a = TrainingPipeline::new(common::fast_params()).run(&dataset).unwrap();
    let b = TrainingPipeline::new(common::fast_params()).run(&dataset).unwrap();

    assert_eq!(a.evaluation(), b.evaluation());
    let row = &dataset.rows()[0];
    assert_eq!(a.predict_proba(row).unwrap(), b.predict_proba(row).unwrap());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_artifact_round_trip() {
    common::init_logging();
    let model = common::train_model(150, 21);
    let dir = common::scratch_dir();
    let store = ModelStore::new(dir.join("nested").join("ensemble_model.json"));

    store.save(&model).unwrap();
    assert!(store.path().exists());
    assert!(!store.path().with_extension("tmp").exists());

    let loaded = store.load().unwrap();
    assert_eq!(loaded.format_version(), ARTIFACT_FORMAT_VERSION);
    assert_eq!(loaded.feature_names(), model.feature_names());
    assert_eq!(loaded.schema(), model.schema());
    let (saved, restored) = (model.evaluation().unwrap(), loaded.evaluation().unwrap());
    assert_eq!(saved.samples, restored.samples);
    assert!((saved.accuracy - restored.accuracy).abs() < 1e-12);

    let row = vec![0.0; model.feature_names().len()];
    let before = model.predict_proba(&row).unwrap();
    let after = loaded.predict_proba(&row).unwrap();
    assert!((before[0] - after[0]).abs() < 1e-12);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_missing_artifact_is_reported() {
    let dir = common::scratch_dir();
    let store = ModelStore::new(dir.join("ensemble_model.json"));

    match store.load() {
        Err(ModelError::ArtifactNotFound { path }) => assert_eq!(path, store.path()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("loaded a model that was never saved"),
    }

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_semicolon_dataset() {
    let (dir, path) = common::write_dataset(60, 3);
    let text = fs::read_to_string(&path).unwrap();
    // Quoted comma decimals stay quoted, so only the separators change.
    let mut converted = String::new();
    let mut in_quotes = false;
    for ch in text.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                converted.push(ch);
            }
            ',' if !in_quotes => converted.push(';'),
            _ => converted.push(ch),
        }
    }
    let semi = dir.join("semicolon.csv");
    fs::write(&semi, converted).unwrap();

    let a = LoanDataset::from_csv_path(&path, b',').unwrap();
    let b = LoanDataset::from_csv_path(&semi, b';').unwrap();
    assert_eq!(a.rows(), b.rows());
    assert_eq!(a.labels(), b.labels());

    fs::remove_dir_all(dir).ok();
}
