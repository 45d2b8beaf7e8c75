use super::feature_vector::EncodedFeatureVector;
use crate::domain::errors::EncodingError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A categorical column and the levels it was trained on.
///
/// Levels are kept sorted; the first one is the reference level and gets no
/// indicator column, so it is represented by every indicator in the group
/// being zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalField {
    name: String,
    levels: Vec<String>,
}

impl CategoricalField {
    pub fn from_levels<I, S>(name: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut levels: Vec<String> = levels
            .into_iter()
            .map(|l| l.into().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        levels.sort();
        levels.dedup();

        Self {
            name: name.into(),
            levels,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn reference_level(&self) -> Option<&str> {
        self.levels.first().map(String::as_str)
    }

    pub fn indicator_name(&self, level: &str) -> String {
        format!("{}_{}", self.name, level)
    }

    /// Indicator column names, reference level excluded.
    pub fn indicator_names(&self) -> impl Iterator<Item = String> + '_ {
        self.levels
            .iter()
            .skip(1)
            .map(move |level| self.indicator_name(level))
    }

    /// One-hot expansion of `level` over the non-reference levels.
    pub fn encode(&self, level: &str) -> Result<Vec<(String, f64)>, EncodingError> {
        let level = level.trim();
        if !self.levels.iter().any(|l| l == level) {
            return Err(EncodingError::UnknownLevel {
                field: self.name.clone(),
                level: level.to_string(),
                known: self.levels.join(", "),
            });
        }

        Ok(self
            .levels
            .iter()
            .skip(1)
            .map(|l| {
                let hot = if l == level { 1.0 } else { 0.0 };
                (self.indicator_name(l), hot)
            })
            .collect())
    }
}

/// The single encoding description shared by training and inference.
///
/// Feature order is the numeric columns followed by each categorical
/// field's indicator columns, fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingSchema {
    numeric_columns: Vec<String>,
    categorical: Vec<CategoricalField>,
}

impl EncodingSchema {
    pub fn new(numeric_columns: Vec<String>, categorical: Vec<CategoricalField>) -> Self {
        Self {
            numeric_columns,
            categorical,
        }
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn categorical(&self) -> &[CategoricalField] {
        &self.categorical
    }

    pub fn field(&self, name: &str) -> Option<&CategoricalField> {
        self.categorical.iter().find(|f| f.name() == name)
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.numeric_columns
            .iter()
            .cloned()
            .chain(self.categorical.iter().flat_map(|f| f.indicator_names()))
            .collect()
    }

    /// Builds the computed vector: numeric values as given, then indicator
    /// groups for every schema field the caller supplied a level for.
    ///
    /// The result is not aligned to any model yet; see
    /// [`EncodedFeatureVector::reindex`].
    pub fn expand(
        &self,
        numeric: &[(&str, f64)],
        levels: &[(&str, &str)],
    ) -> Result<EncodedFeatureVector, EncodingError> {
        let mut vector = EncodedFeatureVector::with_capacity(
            numeric.len() + self.categorical.iter().map(|f| f.levels.len()).sum::<usize>(),
        );

        for (name, value) in numeric {
            vector.push(*name, *value);
        }

        for field in &self.categorical {
            match levels.iter().find(|(name, _)| *name == field.name()) {
                Some((_, level)) => {
                    for (column, value) in field.encode(level)? {
                        vector.push(column, value);
                    }
                }
                None => debug!("No level supplied for categorical field {}", field.name()),
            }
        }

        Ok(vector)
    }
}
