//! Min-max масштабирование числовых признаков

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::pipeline::Transformer;
use crate::error::{PipelineError, Result};
use crate::types::{Frame, Value};

pub const DEFAULT_MINMAX_FEATURES: [&str; 4] = ["Age", "Height", "Weight", "BMI"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxTransformer {
    features: Vec<String>,
    min: Option<Array1<f64>>,
    max: Option<Array1<f64>>,
    is_fitted: bool,
}

impl MinMaxTransformer {
    pub fn new(features: Vec<String>) -> Self {
        Self {
            features,
            min: None,
            max: None,
            is_fitted: false,
        }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// (min, max), запомненные при обучении
    pub fn range(&self, feature: &str) -> Option<(f64, f64)> {
        let i = self.features.iter().position(|f| f == feature)?;
        let min = self.min.as_ref()?;
        let max = self.max.as_ref()?;
        Some((*min.get(i)?, *max.get(i)?))
    }

    fn check_schema(&self, frame: &Frame) -> Result<Vec<usize>> {
        let missing = frame.missing_columns(&self.features);
        if !missing.is_empty() {
            return Err(PipelineError::SchemaMismatch {
                transformer: self.name(),
                missing,
            });
        }
        Ok(self
            .features
            .iter()
            .filter_map(|f| frame.column_index(f))
            .collect())
    }

    fn numeric(&self, value: &Value, column: usize) -> Result<f64> {
        value.as_f64().ok_or_else(|| PipelineError::TypeMismatch {
            column: self.features[column].clone(),
            expected: "numeric",
        })
    }
}

impl Default for MinMaxTransformer {
    fn default() -> Self {
        Self::new(DEFAULT_MINMAX_FEATURES.iter().map(|f| f.to_string()).collect())
    }
}

impl Transformer for MinMaxTransformer {
    fn name(&self) -> &'static str {
        "MinMaxTransformer"
    }

    fn fit(&mut self, frame: &Frame) -> Result<()> {
        let indices = self.check_schema(frame)?;
        if frame.n_rows() == 0 {
            return Err(PipelineError::EmptyDataset);
        }

        let mut X = Array2::zeros((frame.n_rows(), indices.len()));
        for (i, row) in frame.rows().iter().enumerate() {
            for (j, &idx) in indices.iter().enumerate() {
                X[[i, j]] = self.numeric(&row[idx], j)?;
            }
        }

        self.min = Some(X.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v)));
        self.max = Some(X.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v)));
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, frame: &Frame) -> Result<Frame> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted(self.name()));
        }
        let min = self.min.as_ref().ok_or(PipelineError::NotFitted("MinMaxTransformer"))?;
        let max = self.max.as_ref().ok_or(PipelineError::NotFitted("MinMaxTransformer"))?;
        self.validate()?;
        let indices = self.check_schema(frame)?;

        // (v - min) / (max - min); при max == min результат 0
        let mut scaled = frame.clone();
        for row in scaled.rows_mut() {
            for (j, &idx) in indices.iter().enumerate() {
                let v = self.numeric(&row[idx], j)?;
                let range = max[j] - min[j];
                let out = if range > 0.0 { (v - min[j]) / range } else { 0.0 };
                row[idx] = Value::Number(out);
            }
        }

        Ok(scaled)
    }

    fn validate(&self) -> Result<()> {
        if !self.is_fitted {
            return Ok(());
        }
        let (Some(min), Some(max)) = (&self.min, &self.max) else {
            return Err(PipelineError::InvalidInput(format!("{}: fitted without min/max", self.name())));
        };
        if min.len() != self.features.len() || max.len() != self.features.len() {
            return Err(PipelineError::InvalidInput(format!(
                "{}: {} features, min has {}, max has {}",
                self.name(),
                self.features.len(),
                min.len(),
                max.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn frame(ages: &[f64], heights: &[f64]) -> Frame {
        let mut frame = Frame::new(vec!["Gender".into(), "Age".into(), "Height".into()]);
        for (&age, &height) in ages.iter().zip(heights) {
            frame.push_row(vec!["Male".into(), age.into(), height.into()]).unwrap();
        }
        frame
    }

    fn scaler() -> MinMaxTransformer {
        MinMaxTransformer::new(vec!["Age".into(), "Height".into()])
    }

    fn values(frame: &Frame, column: &str) -> Vec<f64> {
        frame.column(column).unwrap().iter().filter_map(|v| v.as_f64()).collect()
    }

    #[test]
    fn fit_bounds_map_to_zero_and_one() {
        let mut s = scaler();
        let out = s.fit_transform(&frame(&[14.0, 61.0, 30.0], &[1.45, 1.98, 1.70])).unwrap();

        assert_eq!(s.range("Age"), Some((14.0, 61.0)));
        let ages = values(&out, "Age");
        assert_eq!(ages[0], 0.0);
        assert_eq!(ages[1], 1.0);
        assert!((ages[2] - 16.0 / 47.0).abs() < 1e-12);
        assert_eq!(out.get(0, "Gender"), Some(&Value::Text("Male".into())));
    }

    #[test]
    fn out_of_range_values_are_not_clipped() {
        let mut s = scaler();
        s.fit(&frame(&[20.0, 40.0], &[1.5, 1.9])).unwrap();
        let out = s.transform(&frame(&[80.0, 10.0], &[1.7, 1.7])).unwrap();
        assert_eq!(values(&out, "Age"), vec![3.0, -0.5]);
    }

    #[test]
    fn constant_feature_scales_to_zero() {
        let mut s = scaler();
        s.fit(&frame(&[25.0, 25.0], &[1.6, 1.8])).unwrap();
        let out = s.transform(&frame(&[25.0, 99.0, -3.0], &[1.7, 1.7, 1.7])).unwrap();
        assert_eq!(values(&out, "Age"), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_feature_is_schema_mismatch() {
        let mut s = scaler();
        s.fit(&frame(&[20.0, 40.0], &[1.5, 1.9])).unwrap();

        let mut narrow = Frame::new(vec!["Age".into()]);
        narrow.push_row(vec![30.0.into()]).unwrap();
        assert!(matches!(
            s.transform(&narrow),
            Err(PipelineError::SchemaMismatch { ref missing, .. }) if missing == &vec!["Height".to_string()]
        ));
    }

    #[test]
    fn empty_fit_frame_is_rejected() {
        let mut s = scaler();
        assert!(matches!(s.fit(&frame(&[], &[])), Err(PipelineError::EmptyDataset)));
    }

    #[test]
    fn stats_of_wrong_length_fail_validation() {
        let mut s = scaler();
        s.fit(&frame(&[20.0, 40.0], &[1.5, 1.9])).unwrap();
        assert!(s.validate().is_ok());

        s.min = Some(ndarray::array![20.0]);
        assert!(matches!(s.validate(), Err(PipelineError::InvalidInput(_))));
        assert_eq!(s.range("Height"), None);
    }

    #[test]
    fn values_inside_fit_range_stay_in_unit_interval() {
        let mut rng = rand::thread_rng();
        let ages: Vec<f64> = (0..50).map(|_| rng.gen_range(14.0..61.0)).collect();
        let heights: Vec<f64> = (0..50).map(|_| rng.gen_range(1.45..1.98)).collect();

        let mut s = scaler();
        let out = s.fit_transform(&frame(&ages, &heights)).unwrap();
        for v in values(&out, "Age").into_iter().chain(values(&out, "Height")) {
            assert!((0.0..=1.0).contains(&v), "{v} outside [0, 1]");
        }
    }
}
