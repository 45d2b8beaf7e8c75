#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write;
use std::fs;
use std::path::PathBuf;
use underwriter::application::ml::{TrainingParams, TrainingPipeline, TrainedModel};
use underwriter::application::ml::gradient_boosting::GradientBoostingParams;
use underwriter::application::ml::random_forest::RandomForestParams;
use underwriter::domain::applicant::{ApplicantRecord, LocaleNumber};
use underwriter::infrastructure::LoanDataset;
use uuid::Uuid;

pub const GENDERS: &[&str] = &["Men", "Women"];
pub const MARITAL: &[&str] = &["Single", "Married"];
pub const EMPLOYMENT: &[&str] = &["employed", "self employed", "unemployed", "student"];
pub const RESIDENCE: &[&str] = &["MORTGAGE", "OWN", "RENT"];
pub const PURPOSES: &[&str] = &[
    "Vehicle",
    "Personal",
    "Home Renovation",
    "Education",
    "Medical",
    "Other",
];

pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Fresh directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("underwriter-test-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Applications where a low CIBIL score or a heavy loan burden means
/// rejection. Every categorical level appears; some rates use a comma
/// decimal separator.
pub fn synthetic_csv(rows: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::from(
        "loan_id, cibil_score ,income_annum,loan_amount,loan_term,loan_interest,loan_percent_income,active_loans,gender,marital_status,employee_status,residence_type,loan_purpose,loan_status\n",
    );

    for i in 0..rows {
        let cibil: u32 = rng.random_range(300..=900);
        let income: u32 = rng.random_range(20..=100) * 100_000;
        let pct: f64 = (rng.random_range(50..=700) as f64) / 10.0;
        let amount = (income as f64 * pct / 100.0).round();
        let term: u32 = [12, 24, 36, 48, 60][rng.random_range(0..5)];
        let rate = (rng.random_range(60..=180) as f64) / 10.0;
        let active: u32 = rng.random_range(0..=5);

        let rejected = cibil < 600 || pct > 45.0;
        let rate_cell = if i % 3 == 0 {
            format!("\"{}\"", format!("{:.1}", rate).replace('.', ","))
        } else {
            format!("{:.1}", rate)
        };

        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{:.1},{},{},{},{},{},{},{}",
            i + 1,
            cibil,
            income,
            amount,
            term,
            rate_cell,
            pct,
            active,
            GENDERS[i % GENDERS.len()],
            MARITAL[(i / 2) % MARITAL.len()],
            EMPLOYMENT[(i / 3) % EMPLOYMENT.len()],
            RESIDENCE[(i / 5) % RESIDENCE.len()],
            PURPOSES[(i / 7) % PURPOSES.len()],
            if rejected { "Rejected" } else { "Approved" },
        );
    }
    out
}

pub fn write_dataset(rows: usize, seed: u64) -> (PathBuf, PathBuf) {
    let dir = scratch_dir();
    let path = dir.join("credit_underwriting.csv");
    fs::write(&path, synthetic_csv(rows, seed)).unwrap();
    (dir, path)
}

/// Small enough to keep the suite quick.
pub fn fast_params() -> TrainingParams {
    TrainingParams {
        forest: RandomForestParams {
            n_trees: 25,
            ..Default::default()
        },
        boosting: GradientBoostingParams {
            n_stages: 30,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn train_model(rows: usize, seed: u64) -> TrainedModel {
    let (dir, path) = write_dataset(rows, seed);
    let dataset = LoanDataset::from_csv_path(&path, b',').unwrap();
    let model = TrainingPipeline::new(fast_params()).run(&dataset).unwrap();
    fs::remove_dir_all(dir).ok();
    model
}

/// The default application from the form.
pub fn form_default_record() -> ApplicantRecord {
    ApplicantRecord {
        cibil_score: 750.0,
        income_annum: 5_000_000.0,
        loan_amount: 2_000_000.0,
        loan_term: 24.0,
        loan_interest: LocaleNumber::Value(7.5),
        loan_percent_income: LocaleNumber::Value(20.0),
        active_loans: 1.0,
        gender: "Men".to_string(),
        marital_status: "Married".to_string(),
        employee_status: "employed".to_string(),
        residence_type: "OWN".to_string(),
        loan_purpose: "Vehicle".to_string(),
    }
}
