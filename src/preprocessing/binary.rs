//! Бинарное кодирование признаков с двумя категориями

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::pipeline::Transformer;
use crate::error::{PipelineError, Result};
use crate::types::{Frame, Value};

pub const DEFAULT_BINARY_FEATURES: [&str; 5] = ["Gender", "family_history", "FAVC", "SMOKE", "SCC"];

/// Кодирует каждую категорию в 0/1. Коды назначаются в лексикографическом
/// порядке категорий, как при обучении.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryEncoder {
    features: Vec<String>,
    encoders: BTreeMap<String, BTreeMap<String, u8>>,
    is_fitted: bool,
}

impl BinaryEncoder {
    pub fn new(features: Vec<String>) -> Self {
        Self {
            features,
            encoders: BTreeMap::new(),
            is_fitted: false,
        }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Выученное отображение категория -> код
    pub fn mapping(&self, feature: &str) -> Option<&BTreeMap<String, u8>> {
        self.encoders.get(feature)
    }
}

impl Default for BinaryEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY_FEATURES.iter().map(|f| f.to_string()).collect())
    }
}

impl Transformer for BinaryEncoder {
    fn name(&self) -> &'static str {
        "BinaryEncoder"
    }

    fn fit(&mut self, frame: &Frame) -> Result<()> {
        if frame.n_rows() == 0 {
            return Err(PipelineError::EmptyDataset);
        }

        let mut encoders = BTreeMap::new();
        for feature in &self.features {
            let Some(values) = frame.column(feature) else {
                tracing::debug!(feature = %feature, "binary feature absent at fit, skipped");
                continue;
            };

            let mut categories = BTreeSet::new();
            for value in values {
                let category = value.as_str().ok_or_else(|| PipelineError::TypeMismatch {
                    column: feature.clone(),
                    expected: "text",
                })?;
                categories.insert(category.to_string());
            }

            if categories.len() > 2 {
                return Err(PipelineError::NotBinary {
                    feature: feature.clone(),
                    categories: categories.into_iter().collect(),
                });
            }

            let mapping = categories
                .into_iter()
                .enumerate()
                .map(|(code, category)| (category, code as u8))
                .collect();
            encoders.insert(feature.clone(), mapping);
        }

        self.encoders = encoders;
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, frame: &Frame) -> Result<Frame> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted(self.name()));
        }

        let mut targets = Vec::new();
        let mut missing = Vec::new();
        for feature in &self.features {
            let Some(mapping) = self.encoders.get(feature) else {
                continue;
            };
            match frame.column_index(feature) {
                Some(idx) => targets.push((feature, idx, mapping)),
                None => missing.push(feature.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(PipelineError::SchemaMismatch {
                transformer: self.name(),
                missing,
            });
        }

        let mut out = frame.clone();
        for row in out.rows_mut() {
            for &(feature, idx, mapping) in &targets {
                let cell = &mut row[idx];
                let category = cell.as_str().ok_or_else(|| PipelineError::TypeMismatch {
                    column: feature.clone(),
                    expected: "text",
                })?;
                let code = *mapping.get(category).ok_or_else(|| PipelineError::UnknownCategory {
                    feature: feature.clone(),
                    value: category.to_string(),
                })?;
                *cell = Value::Number(f64::from(code));
            }
        }

        Ok(out)
    }

    fn validate(&self) -> Result<()> {
        for (feature, mapping) in &self.encoders {
            let codes: BTreeSet<u8> = mapping.values().copied().collect();
            if mapping.len() > 2 || codes.len() != mapping.len() || codes.iter().any(|&c| c > 1) {
                return Err(PipelineError::InvalidInput(format!(
                    "{}: mapping for {feature} is not a 0/1 code",
                    self.name()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(rows: &[(&str, &str, f64)]) -> Frame {
        let mut frame = Frame::new(vec!["Gender".into(), "SMOKE".into(), "Age".into()]);
        for &(gender, smoke, age) in rows {
            frame
                .push_row(vec![gender.into(), smoke.into(), age.into()])
                .unwrap();
        }
        frame
    }

    fn encoder() -> BinaryEncoder {
        BinaryEncoder::new(vec!["Gender".into(), "SMOKE".into()])
    }

    #[test]
    fn codes_are_assigned_lexicographically() {
        let mut enc = encoder();
        enc.fit(&frame(&[("Male", "yes", 20.0), ("Female", "no", 30.0)])).unwrap();

        let gender = enc.mapping("Gender").unwrap();
        assert_eq!(gender["Female"], 0);
        assert_eq!(gender["Male"], 1);
        let smoke = enc.mapping("SMOKE").unwrap();
        assert_eq!(smoke["no"], 0);
        assert_eq!(smoke["yes"], 1);
    }

    #[test]
    fn transform_reproduces_fit_codes() {
        let train = frame(&[("Male", "yes", 20.0), ("Female", "no", 30.0), ("Male", "no", 40.0)]);
        let mut enc = encoder();
        let out = enc.fit_transform(&train).unwrap();

        let codes: Vec<f64> = out.column("Gender").unwrap().iter().filter_map(|v| v.as_f64()).collect();
        assert_eq!(codes, vec![1.0, 0.0, 1.0]);
        let codes: Vec<f64> = out.column("SMOKE").unwrap().iter().filter_map(|v| v.as_f64()).collect();
        assert_eq!(codes, vec![1.0, 0.0, 0.0]);
        // остальные колонки не трогаем
        assert_eq!(out.get(2, "Age"), Some(&Value::Number(40.0)));
        // вход не изменяется
        assert_eq!(train.get(0, "Gender"), Some(&Value::Text("Male".into())));
    }

    #[test]
    fn unseen_category_fails() {
        let mut enc = encoder();
        enc.fit(&frame(&[("Male", "yes", 20.0), ("Female", "no", 30.0)])).unwrap();

        let err = enc.transform(&frame(&[("Other", "no", 20.0)])).unwrap_err();
        match err {
            PipelineError::UnknownCategory { feature, value } => {
                assert_eq!(feature, "Gender");
                assert_eq!(value, "Other");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn more_than_two_categories_is_rejected() {
        let mut enc = encoder();
        let err = enc
            .fit(&frame(&[("Male", "yes", 1.0), ("Female", "no", 1.0), ("Other", "no", 1.0)]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::NotBinary { ref feature, .. } if feature == "Gender"));
    }

    #[test]
    fn feature_absent_at_fit_is_skipped() {
        let mut enc = BinaryEncoder::new(vec!["Gender".into(), "SCC".into()]);
        enc.fit(&frame(&[("Male", "yes", 20.0)])).unwrap();
        assert!(enc.mapping("SCC").is_none());
        assert!(enc.transform(&frame(&[("Male", "no", 20.0)])).is_ok());
    }

    #[test]
    fn learned_feature_missing_at_transform_is_schema_mismatch() {
        let mut enc = encoder();
        enc.fit(&frame(&[("Male", "yes", 20.0)])).unwrap();

        let mut narrow = Frame::new(vec!["Gender".into()]);
        narrow.push_row(vec!["Male".into()]).unwrap();
        let err = enc.transform(&narrow).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { ref missing, .. } if missing == &vec!["SMOKE".to_string()]));
    }

    #[test]
    fn encoded_input_is_type_mismatch() {
        let train = frame(&[("Male", "yes", 20.0), ("Female", "no", 30.0)]);
        let mut enc = encoder();
        let encoded = enc.fit_transform(&train).unwrap();
        assert!(matches!(
            enc.transform(&encoded),
            Err(PipelineError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn mapping_must_be_distinct_zero_one_codes() {
        let mut enc = encoder();
        enc.fit(&frame(&[("Male", "yes", 20.0), ("Female", "no", 30.0)])).unwrap();
        assert!(enc.validate().is_ok());

        let mut duplicated = enc.clone();
        duplicated.encoders.get_mut("Gender").unwrap().insert("Female".into(), 1);
        assert!(matches!(duplicated.validate(), Err(PipelineError::InvalidInput(_))));

        let mut out_of_range = enc.clone();
        out_of_range.encoders.get_mut("SMOKE").unwrap().insert("yes".into(), 2);
        assert!(out_of_range.validate().is_err());

        let mut three = enc;
        three.encoders.get_mut("SMOKE").unwrap().insert("sometimes".into(), 0);
        assert!(three.validate().is_err());
    }

    #[test]
    fn transform_before_fit_fails() {
        let enc = encoder();
        assert!(matches!(
            enc.transform(&frame(&[("Male", "yes", 1.0)])),
            Err(PipelineError::NotFitted(_))
        ));
    }
}
