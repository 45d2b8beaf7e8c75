use crate::config::{Config, DEFAULT_MODEL_PATH, LogFormat, TrainingEnvConfig, parse_delimiter};
use std::collections::HashMap;
use std::path::PathBuf;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_defaults_when_nothing_is_set() {
    let config = Config::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(config.inference.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    assert_eq!(config.inference.report_dir, None);
    assert!((config.inference.default_interest_rate - 7.5).abs() < 1e-12);
    assert_eq!(config.inference.log_format, LogFormat::Pretty);

    assert_eq!(config.training, TrainingEnvConfig::default());
    assert_eq!(config.training.forest_trees, 100);
    assert_eq!(config.training.boosting_max_depth, 3);
    assert_eq!(config.training.dataset_delimiter, b',');
}

#[test]
fn test_values_override_defaults() {
    let config = Config::from_lookup(lookup_from(&[
        ("MODEL_PATH", "/srv/models/v2.json"),
        ("REPORT_DIR", "out/reports"),
        ("DEFAULT_INTEREST_RATE", "9.25"),
        ("LOG_FORMAT", "Compact"),
        ("DATASET_PATH", "data/credit_underwriting.csv"),
        ("DATASET_DELIMITER", ";"),
        ("TEST_SIZE", "0.25"),
        ("FOREST_TREES", "250"),
        ("BOOSTING_LEARNING_RATE", "0.05"),
        ("MODEL_SEED", "7"),
    ]))
    .unwrap();

    assert_eq!(config.inference.model_path, PathBuf::from("/srv/models/v2.json"));
    assert_eq!(config.inference.report_dir, Some(PathBuf::from("out/reports")));
    assert!((config.inference.default_interest_rate - 9.25).abs() < 1e-12);
    assert_eq!(config.inference.log_format, LogFormat::Compact);

    assert_eq!(
        config.training.dataset_path,
        Some(PathBuf::from("data/credit_underwriting.csv"))
    );
    assert_eq!(config.training.dataset_delimiter, b';');
    assert!((config.training.test_size - 0.25).abs() < 1e-12);
    assert_eq!(config.training.forest_trees, 250);
    assert!((config.training.boosting_learning_rate - 0.05).abs() < 1e-12);
    assert_eq!(config.training.model_seed, 7);
    assert_eq!(config.training.split_seed, 42);
}

#[test]
fn test_malformed_value_names_the_variable() {
    let err = Config::from_lookup(lookup_from(&[("FOREST_TREES", "many")])).unwrap_err();
    assert!(format!("{:#}", err).contains("FOREST_TREES"));

    let err = Config::from_lookup(lookup_from(&[("LOG_FORMAT", "json")])).unwrap_err();
    assert!(format!("{:#}", err).contains("LOG_FORMAT"));
}

#[test]
fn test_out_of_range_values_are_rejected() {
    assert!(Config::from_lookup(lookup_from(&[("TEST_SIZE", "1.0")])).is_err());
    assert!(Config::from_lookup(lookup_from(&[("FOREST_FEATURE_FRACTION", "0")])).is_err());
    assert!(Config::from_lookup(lookup_from(&[("BOOSTING_LEARNING_RATE", "2")])).is_err());
    assert!(Config::from_lookup(lookup_from(&[("DEFAULT_INTEREST_RATE", "-1")])).is_err());
}

#[test]
fn test_blank_report_dir_means_none() {
    let config = Config::from_lookup(lookup_from(&[("REPORT_DIR", "  ")])).unwrap();
    assert_eq!(config.inference.report_dir, None);
}

#[test]
fn test_delimiter_parsing() {
    assert_eq!(parse_delimiter(",").unwrap(), b',');
    assert_eq!(parse_delimiter(";").unwrap(), b';');
    assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
    assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
    assert!(parse_delimiter(";;").is_err());
    assert!(parse_delimiter("").is_err());
}
