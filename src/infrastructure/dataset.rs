use crate::domain::applicant::{
    self, CATEGORICAL_FIELDS, LEGACY_DECIMAL_FIELDS, parse_locale_decimal,
};
use crate::domain::errors::{DatasetError, EncodingError};
use crate::domain::ml::{CategoricalField, EncodingSchema};
use crate::domain::prediction::LoanDecision;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub const LOAN_ID: &str = "loan_id";
pub const LOAN_STATUS: &str = "loan_status";

/// Numeric form fields every dataset must provide.
pub const REQUIRED_NUMERIC: &[&str] = &[
    applicant::CIBIL_SCORE,
    applicant::INCOME_ANNUM,
    applicant::LOAN_AMOUNT,
    applicant::LOAN_TERM,
    applicant::LOAN_INTEREST,
    applicant::LOAN_PERCENT_INCOME,
    applicant::ACTIVE_LOANS,
];

/// Training data after cleaning and one-hot expansion.
///
/// `rows[i]` follows `schema().feature_names()` and `labels[i]` is its
/// recorded outcome.
#[derive(Debug, Clone)]
pub struct LoanDataset {
    schema: EncodingSchema,
    rows: Vec<Vec<f64>>,
    labels: Vec<LoanDecision>,
}

impl LoanDataset {
    pub fn from_csv_path(path: &Path, delimiter: u8) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file, delimiter)?;
        info!(
            "Loaded {} applications ({} features) from {:?}",
            dataset.len(),
            dataset.schema.feature_names().len(),
            path
        );
        Ok(dataset)
    }

    /// Reads a delimited table with a header row.
    ///
    /// Header names are trimmed before lookup. Every column other than the
    /// id, the status and the categorical fields is treated as numeric and
    /// kept in file order. An empty categorical cell encodes as an all-zero
    /// indicator group.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, DatasetError> {
        let mut csv = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let position = |column: &str| -> Result<usize, DatasetError> {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| DatasetError::MissingColumn {
                    column: column.to_string(),
                })
        };

        position(LOAN_ID)?;
        let status_idx = position(LOAN_STATUS)?;
        for column in REQUIRED_NUMERIC {
            position(*column)?;
        }
        let categorical_idx = CATEGORICAL_FIELDS
            .iter()
            .map(|c| position(*c))
            .collect::<Result<Vec<_>, _>>()?;

        let numeric_idx: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| {
                h.as_str() != LOAN_ID
                    && h.as_str() != LOAN_STATUS
                    && !CATEGORICAL_FIELDS.contains(&h.as_str())
            })
            .map(|(i, _)| i)
            .collect();

        let records = csv.records().collect::<Result<Vec<StringRecord>, _>>()?;
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut labels = Vec::with_capacity(records.len());
        let mut numeric_rows = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let row = i + 1;
            let status = record.get(status_idx).unwrap_or_default();
            labels.push(
                LoanDecision::from_status(status).ok_or_else(|| DatasetError::InvalidLabel {
                    row,
                    value: status.to_string(),
                })?,
            );

            let values = numeric_idx
                .iter()
                .map(|&c| parse_numeric_cell(&headers[c], record.get(c).unwrap_or_default(), row))
                .collect::<Result<Vec<f64>, _>>()?;
            numeric_rows.push(values);
        }

        ensure_both_classes(&labels)?;

        let categorical: Vec<CategoricalField> = CATEGORICAL_FIELDS
            .iter()
            .zip(categorical_idx.iter())
            .map(|(name, &c)| {
                let levels: BTreeSet<&str> =
                    records.iter().map(|r| r.get(c).unwrap_or_default()).collect();
                CategoricalField::from_levels(*name, levels)
            })
            .collect();
        let numeric_columns: Vec<String> = numeric_idx.iter().map(|&c| headers[c].clone()).collect();
        let schema = EncodingSchema::new(numeric_columns, categorical);

        for (name, &c) in CATEGORICAL_FIELDS.iter().zip(categorical_idx.iter()) {
            let empty = records
                .iter()
                .filter(|r| r.get(c).unwrap_or_default().is_empty())
                .count();
            if empty > 0 {
                warn!("{} rows have no {}; their indicators are all zero", empty, name);
            }
        }

        let feature_names = schema.feature_names();
        let mut rows = Vec::with_capacity(records.len());
        for (i, (record, values)) in records.iter().zip(numeric_rows.iter()).enumerate() {
            let numeric: Vec<(&str, f64)> = schema
                .numeric_columns()
                .iter()
                .map(String::as_str)
                .zip(values.iter().copied())
                .collect();
            let levels: Vec<(&str, &str)> = CATEGORICAL_FIELDS
                .iter()
                .zip(categorical_idx.iter())
                .map(|(name, &c)| (*name, record.get(c).unwrap_or_default()))
                .filter(|(_, level)| !level.is_empty())
                .collect();

            let (encoded, _) = schema
                .expand(&numeric, &levels)
                .and_then(|v| v.reindex(&feature_names))
                .map_err(|e| encoding_to_dataset(e, i + 1))?;
            rows.push(encoded.into_values());
        }

        Ok(Self {
            schema,
            rows,
            labels,
        })
    }

    pub fn schema(&self) -> &EncodingSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn labels(&self) -> &[LoanDecision] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copies out the rows and labels at `indices`.
    pub fn select(&self, indices: &[usize]) -> (Vec<Vec<f64>>, Vec<LoanDecision>) {
        indices
            .iter()
            .map(|&i| (self.rows[i].clone(), self.labels[i]))
            .unzip()
    }
}

fn parse_numeric_cell(column: &str, raw: &str, row: usize) -> Result<f64, DatasetError> {
    let parsed = if LEGACY_DECIMAL_FIELDS.contains(&column) {
        parse_locale_decimal(column, raw).ok()
    } else {
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    };
    parsed.ok_or_else(|| DatasetError::Parse {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

fn ensure_both_classes(labels: &[LoanDecision]) -> Result<(), DatasetError> {
    for class in LoanDecision::ALL {
        if !labels.contains(&class) {
            let present = labels.first().copied().unwrap_or(class);
            return Err(DatasetError::SingleClass {
                class: present.to_string().to_lowercase(),
            });
        }
    }
    Ok(())
}

fn encoding_to_dataset(err: EncodingError, row: usize) -> DatasetError {
    match err {
        EncodingError::Parse { field, value } | EncodingError::UnknownLevel {
            field,
            level: value,
            ..
        } => DatasetError::Parse {
            row,
            column: field,
            value,
        },
        EncodingError::FeatureMismatch { reason } => DatasetError::Parse {
            row,
            column: String::new(),
            value: reason,
        },
    }
}
