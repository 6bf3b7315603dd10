//! Деревья решений и случайный лес (только инференс)

#![allow(non_snake_case)]

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::{check_width, Classifier};
use crate::error::{PipelineError, Result};

/// Узел дерева: `x[feature] <= threshold` идёт влево
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        probabilities: [f64; 2],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn leaf(p_positive: f64) -> Self {
        TreeNode::Leaf {
            probabilities: [1.0 - p_positive, p_positive],
        }
    }

    pub fn split(feature: usize, threshold: f64, left: TreeNode, right: TreeNode) -> Self {
        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn evaluate(&self, sample: ArrayView1<f64>) -> [f64; 2] {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { probabilities } => return *probabilities,
                TreeNode::Split { feature, threshold, left, right } => {
                    node = if sample[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }

    fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split { feature, left, right, .. } => [Some(*feature), left.max_feature(), right.max_feature()]
                .into_iter()
                .flatten()
                .max(),
        }
    }

    fn validate(&self, n_features: usize) -> Result<()> {
        match self.max_feature() {
            Some(f) if f >= n_features => Err(PipelineError::InvalidInput(format!(
                "tree splits on feature {f}, model has {n_features} features"
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeModel {
    feature_names: Vec<String>,
    root: TreeNode,
}

impl DecisionTreeModel {
    pub fn new(feature_names: Vec<String>, root: TreeNode) -> Result<Self> {
        let model = Self { feature_names, root };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        self.root.validate(self.feature_names.len())
    }
}

impl Classifier for DecisionTreeModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_proba(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        check_width(self.feature_names.len(), X)?;
        let mut proba = Array2::zeros((X.nrows(), 2));
        for (i, sample) in X.rows().into_iter().enumerate() {
            let [p0, p1] = self.root.evaluate(sample);
            proba[[i, 0]] = p0;
            proba[[i, 1]] = p1;
        }
        Ok(proba)
    }
}

/// Вероятности - среднее по деревьям
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestModel {
    feature_names: Vec<String>,
    trees: Vec<TreeNode>,
}

impl RandomForestModel {
    pub fn new(feature_names: Vec<String>, trees: Vec<TreeNode>) -> Result<Self> {
        let model = Self { feature_names, trees };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(PipelineError::InvalidInput("random forest has no trees".to_string()));
        }
        self.trees
            .iter()
            .try_for_each(|t| t.validate(self.feature_names.len()))
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForestModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_proba(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        check_width(self.feature_names.len(), X)?;
        let n_trees = self.trees.len() as f64;
        let mut proba = Array2::zeros((X.nrows(), 2));

        for (i, sample) in X.rows().into_iter().enumerate() {
            for tree in &self.trees {
                let [p0, p1] = tree.evaluate(sample);
                proba[[i, 0]] += p0;
                proba[[i, 1]] += p1;
            }
        }

        proba.mapv_inplace(|p| p / n_trees);
        Ok(proba)
    }
}
