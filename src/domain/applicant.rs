use crate::domain::errors::{ApplicantError, EncodingError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CIBIL_SCORE: &str = "cibil_score";
pub const INCOME_ANNUM: &str = "income_annum";
pub const LOAN_AMOUNT: &str = "loan_amount";
pub const LOAN_TERM: &str = "loan_term";
pub const LOAN_INTEREST: &str = "loan_interest";
pub const LOAN_PERCENT_INCOME: &str = "loan_percent_income";
pub const ACTIVE_LOANS: &str = "active_loans";

pub const GENDER: &str = "gender";
pub const MARITAL_STATUS: &str = "marital_status";
pub const EMPLOYEE_STATUS: &str = "employee_status";
pub const RESIDENCE_TYPE: &str = "residence_type";
pub const LOAN_PURPOSE: &str = "loan_purpose";

/// Categorical columns, in the order their indicator groups are laid out.
pub const CATEGORICAL_FIELDS: &[&str] = &[
    GENDER,
    MARITAL_STATUS,
    EMPLOYEE_STATUS,
    RESIDENCE_TYPE,
    LOAN_PURPOSE,
];

/// Numeric columns that may arrive with a comma decimal separator.
pub const LEGACY_DECIMAL_FIELDS: &[&str] = &[LOAN_INTEREST, LOAN_PERCENT_INCOME];

/// Parses a decimal that may use a comma as its decimal separator ("7,5" == 7.5).
pub fn parse_locale_decimal(field: &str, raw: &str) -> Result<f64, EncodingError> {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(EncodingError::Parse {
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// A numeric value that is either already parsed or still locale-formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleNumber {
    Value(f64),
    Text(String),
}

impl LocaleNumber {
    pub fn resolve(&self, field: &str) -> Result<f64, EncodingError> {
        match self {
            LocaleNumber::Value(v) if v.is_finite() => Ok(*v),
            LocaleNumber::Value(v) => Err(EncodingError::Parse {
                field: field.to_string(),
                value: v.to_string(),
            }),
            LocaleNumber::Text(raw) => parse_locale_decimal(field, raw),
        }
    }
}

impl From<f64> for LocaleNumber {
    fn from(value: f64) -> Self {
        LocaleNumber::Value(value)
    }
}

impl From<&str> for LocaleNumber {
    fn from(raw: &str) -> Self {
        LocaleNumber::Text(raw.to_string())
    }
}

impl From<String> for LocaleNumber {
    fn from(raw: String) -> Self {
        LocaleNumber::Text(raw)
    }
}

impl fmt::Display for LocaleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleNumber::Value(v) => write!(f, "{}", v),
            LocaleNumber::Text(raw) => write!(f, "{}", raw),
        }
    }
}

/// One loan application as submitted through the form.
///
/// Built once per request and never mutated; contact details live in
/// [`ApplicantContact`] so they can never leak into the feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub cibil_score: f64,
    pub income_annum: f64,
    pub loan_amount: f64,
    /// Months
    pub loan_term: f64,
    /// Annual percentage rate
    pub loan_interest: LocaleNumber,
    pub loan_percent_income: LocaleNumber,
    pub active_loans: f64,

    pub gender: String,
    pub marital_status: String,
    pub employee_status: String,
    pub residence_type: String,
    pub loan_purpose: String,
}

impl ApplicantRecord {
    /// Numeric fields in form order, with legacy decimals normalized.
    pub fn numeric_features(&self) -> Result<Vec<(&'static str, f64)>, EncodingError> {
        Ok(vec![
            (CIBIL_SCORE, self.cibil_score),
            (INCOME_ANNUM, self.income_annum),
            (LOAN_AMOUNT, self.loan_amount),
            (LOAN_TERM, self.loan_term),
            (LOAN_INTEREST, self.loan_interest.resolve(LOAN_INTEREST)?),
            (
                LOAN_PERCENT_INCOME,
                self.loan_percent_income.resolve(LOAN_PERCENT_INCOME)?,
            ),
            (ACTIVE_LOANS, self.active_loans),
        ])
    }

    pub fn categorical_levels(&self) -> Vec<(&'static str, &str)> {
        vec![
            (GENDER, self.gender.as_str()),
            (MARITAL_STATUS, self.marital_status.as_str()),
            (EMPLOYEE_STATUS, self.employee_status.as_str()),
            (RESIDENCE_TYPE, self.residence_type.as_str()),
            (LOAN_PURPOSE, self.loan_purpose.as_str()),
        ]
    }

    /// Enforces the bounds the application form puts on each field.
    ///
    /// Legacy decimal fields are only range-checked when they parse; a parse
    /// failure is reported by the encoder as a `Parse` error.
    pub fn validate(&self) -> Result<(), ApplicantError> {
        check_range(CIBIL_SCORE, self.cibil_score, 300.0, 900.0)?;
        check_range(INCOME_ANNUM, self.income_annum, 0.0, f64::MAX)?;
        check_range(LOAN_AMOUNT, self.loan_amount, 0.0, f64::MAX)?;
        check_range(LOAN_TERM, self.loan_term, 1.0, f64::MAX)?;
        check_range(ACTIVE_LOANS, self.active_loans, 0.0, f64::MAX)?;
        if let Ok(pct) = self.loan_percent_income.resolve(LOAN_PERCENT_INCOME) {
            check_range(LOAN_PERCENT_INCOME, pct, 0.0, f64::MAX)?;
        }
        Ok(())
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ApplicantError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ApplicantError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

/// Who applied. Only ever rendered into the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantContact {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}
