//! Логистическая регрессия (только инференс)

#![allow(non_snake_case)]

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{check_width, Classifier};
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    feature_names: Vec<String>,
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LogisticModel {
    pub fn new(feature_names: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            feature_names,
            coefficients: Array1::from(coefficients),
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        if self.coefficients.len() != self.feature_names.len() {
            return Err(PipelineError::FeatureCountMismatch {
                expected: self.feature_names.len(),
                actual: self.coefficients.len(),
            });
        }
        Ok(())
    }

    pub fn decision_function(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        check_width(self.feature_names.len(), X)?;
        Ok(X.dot(&self.coefficients) + self.intercept)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_proba(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        let z = self.decision_function(X)?;
        let mut proba = Array2::zeros((X.nrows(), 2));
        for (i, &zi) in z.iter().enumerate() {
            let p = sigmoid(zi);
            proba[[i, 0]] = 1.0 - p;
            proba[[i, 1]] = p;
        }
        Ok(proba)
    }
}
