//! One-hot кодирование многозначных категориальных признаков

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::pipeline::Transformer;
use crate::error::{PipelineError, Result};
use crate::types::{Frame, Value};

pub const DEFAULT_ONEHOT_FEATURES: [&str; 3] = ["CAEC", "CALC", "MTRANS"];

/// Разворачивает признаки в dummy-колонки `{feature}_{category}`.
///
/// Набор колонок фиксируется при `fit`. Неизвестная при инференсе категория
/// даёт нулевой блок, а не ошибку.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncodingTransformer {
    features: Vec<String>,
    categories: BTreeMap<String, Vec<String>>,
    feature_names: Vec<String>,
    is_fitted: bool,
}

impl OneHotEncodingTransformer {
    pub fn new(features: Vec<String>) -> Self {
        Self {
            features,
            categories: BTreeMap::new(),
            feature_names: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn categories(&self, feature: &str) -> Option<&[String]> {
        self.categories.get(feature).map(Vec::as_slice)
    }

    /// Имена dummy-колонок в порядке вывода
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// `{feature}_{category}` в порядке признаков и категорий
    fn dummy_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for feature in &self.features {
            let known = self.categories.get(feature).ok_or_else(|| {
                PipelineError::InvalidInput(format!("{}: no categories for {feature}", self.name()))
            })?;
            names.extend(known.iter().map(|c| format!("{feature}_{c}")));
        }
        Ok(names)
    }

    fn check_schema(&self, frame: &Frame) -> Result<()> {
        let missing = frame.missing_columns(&self.features);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::SchemaMismatch {
                transformer: self.name(),
                missing,
            })
        }
    }
}

impl Default for OneHotEncodingTransformer {
    fn default() -> Self {
        Self::new(DEFAULT_ONEHOT_FEATURES.iter().map(|f| f.to_string()).collect())
    }
}

impl Transformer for OneHotEncodingTransformer {
    fn name(&self) -> &'static str {
        "OneHotEncodingTransformer"
    }

    fn fit(&mut self, frame: &Frame) -> Result<()> {
        self.check_schema(frame)?;
        if frame.n_rows() == 0 {
            return Err(PipelineError::EmptyDataset);
        }

        let mut categories = BTreeMap::new();
        for feature in &self.features {
            let mut seen = BTreeSet::new();
            for value in frame.column(feature).unwrap_or_default() {
                let category = value.as_str().ok_or_else(|| PipelineError::TypeMismatch {
                    column: feature.clone(),
                    expected: "text",
                })?;
                seen.insert(category.to_string());
            }

            categories.insert(feature.clone(), seen.into_iter().collect());
        }

        self.categories = categories;
        self.feature_names = self.dummy_names()?;
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, frame: &Frame) -> Result<Frame> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted(self.name()));
        }
        self.check_schema(frame)?;

        let encoded: Vec<(usize, &String, &[String])> = self
            .features
            .iter()
            .filter_map(|f| {
                let idx = frame.column_index(f)?;
                Some((idx, f, self.categories.get(f).map(Vec::as_slice).unwrap_or_default()))
            })
            .collect();

        let kept: Vec<usize> = (0..frame.n_cols())
            .filter(|i| !encoded.iter().any(|(idx, _, _)| idx == i))
            .collect();

        let mut columns: Vec<String> = kept.iter().map(|&i| frame.columns()[i].clone()).collect();
        columns.extend(self.feature_names.iter().cloned());

        let mut rows = Vec::with_capacity(frame.n_rows());
        for row in frame.rows() {
            let mut out: Vec<Value> = kept.iter().map(|&i| row[i].clone()).collect();
            out.reserve(self.feature_names.len());

            for &(idx, feature, known) in &encoded {
                let category = row[idx].as_str().ok_or_else(|| PipelineError::TypeMismatch {
                    column: feature.clone(),
                    expected: "text",
                })?;
                let hot = known.iter().position(|c| c == category);
                if hot.is_none() {
                    tracing::debug!(feature = %feature, category, "unknown category, encoded as zeros");
                }
                out.extend((0..known.len()).map(|j| Value::Number(if Some(j) == hot { 1.0 } else { 0.0 })));
            }

            rows.push(out);
        }

        Ok(Frame::from_parts(columns, rows))
    }

    fn validate(&self) -> Result<()> {
        if !self.is_fitted {
            return Ok(());
        }
        if self.dummy_names()? != self.feature_names {
            return Err(PipelineError::InvalidInput(format!(
                "{}: dummy columns do not match learned categories",
                self.name()
            )));
        }
        Ok(())
    }
}
