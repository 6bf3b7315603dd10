//! ML модели (только инференс)

#![allow(non_snake_case)]

pub mod decision_tree;
pub mod logistic;
pub mod risk;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

pub use decision_tree::{DecisionTreeModel, RandomForestModel, TreeNode};
pub use logistic::LogisticModel;
pub use risk::{RiskPredictor, RiskTier};

/// Индекс положительного класса ("Obesity") в выходе `predict_proba`
pub const POSITIVE_CLASS: usize = 1;

/// Бинарный классификатор
pub trait Classifier {
    /// Признаки в том порядке, в котором модель их ожидает
    fn feature_names(&self) -> &[String];

    /// Матрица (n_samples, 2): вероятности классов 0 и 1
    fn predict_proba(&self, X: &Array2<f64>) -> Result<Array2<f64>>;

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<u8>> {
        let proba = self.predict_proba(X)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| u8::from(row[POSITIVE_CLASS] > row[0]))
            .collect())
    }
}

pub(crate) fn check_width(expected: usize, X: &Array2<f64>) -> Result<()> {
    if X.ncols() != expected {
        return Err(PipelineError::FeatureCountMismatch {
            expected,
            actual: X.ncols(),
        });
    }
    Ok(())
}

/// Сериализованная модель
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
    DecisionTree(DecisionTreeModel),
    RandomForest(RandomForestModel),
}

impl ModelArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Logistic(_) => "logistic",
            ModelArtifact::DecisionTree(_) => "decision_tree",
            ModelArtifact::RandomForest(_) => "random_forest",
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ModelArtifact::Logistic(m) => m,
            ModelArtifact::DecisionTree(m) => m,
            ModelArtifact::RandomForest(m) => m,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Logistic(m) => m.validate(),
            ModelArtifact::DecisionTree(m) => m.validate(),
            ModelArtifact::RandomForest(m) => m.validate(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl Classifier for ModelArtifact {
    fn feature_names(&self) -> &[String] {
        self.inner().feature_names()
    }

    fn predict_proba(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.inner().predict_proba(X)
    }
}
