//! Оценка риска ожирения: пайплайн + модель + пороги

use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::{Classifier, ModelArtifact, POSITIVE_CLASS};
use crate::config::ServiceConfig;
use crate::error::{PipelineError, Result};
use crate::preprocessing::{FeatureEngineer, Pipeline, SchemaPolicy, Transformer};
use crate::types::{Prediction, RiskAssessment, SurveyAnswers};

pub const HIGH_RISK_THRESHOLD: f64 = 0.70;
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Границы относятся к более высокому уровню: 0.70 -> High, 0.30 -> Medium
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if probability >= MEDIUM_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low risk",
            RiskTier::Medium => "Medium risk",
            RiskTier::High => "High risk",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

static SHARED: OnceLock<RiskPredictor> = OnceLock::new();

/// Обученный пайплайн и модель. После загрузки только читается.
#[derive(Debug)]
pub struct RiskPredictor {
    pipeline: Pipeline,
    model: ModelArtifact,
}

impl RiskPredictor {
    /// Проверяет, что колонки на выходе пайплайна совпадают с признаками модели
    pub fn new(pipeline: Pipeline, model: ModelArtifact) -> Result<Self> {
        let expected = model.feature_names();
        match pipeline.output_columns() {
            Some(produced) if produced == expected => {}
            Some(produced) => {
                return Err(PipelineError::FeatureOrderMismatch {
                    produced: produced.to_vec(),
                    expected: expected.to_vec(),
                })
            }
            None => return Err(PipelineError::NotFitted("Pipeline")),
        }
        Ok(Self { pipeline, model })
    }

    pub fn load(
        pipeline_path: impl AsRef<Path>,
        model_path: impl AsRef<Path>,
        policy: SchemaPolicy,
    ) -> Result<Self> {
        let pipeline_path = pipeline_path.as_ref();
        let model_path = model_path.as_ref();

        let pipeline = Pipeline::load(pipeline_path)?.with_policy(policy);
        let model = ModelArtifact::load(model_path)?;
        tracing::info!(
            pipeline = %pipeline_path.display(),
            model = %model_path.display(),
            kind = model.kind(),
            features = model.feature_names().len(),
            "artifacts loaded"
        );

        Self::new(pipeline, model)
    }

    /// Загружает артефакты один раз на процесс; повторные вызовы возвращают
    /// уже загруженный экземпляр.
    pub fn init_shared(config: &ServiceConfig) -> Result<&'static RiskPredictor> {
        if let Some(predictor) = SHARED.get() {
            return Ok(predictor);
        }
        let predictor = Self::load(&config.pipeline_path, &config.model_path, config.schema_policy)?;
        // при гонке остаётся первый загруженный экземпляр
        Ok(SHARED.get_or_init(|| predictor))
    }

    pub fn shared() -> Option<&'static RiskPredictor> {
        SHARED.get()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn model(&self) -> &ModelArtifact {
        &self.model
    }

    pub fn predict(&self, answers: &SurveyAnswers) -> Result<Prediction> {
        let raw = FeatureEngineer::build_frame(std::slice::from_ref(answers))?;
        let transformed = self.pipeline.transform(&raw)?;
        if transformed.columns() != self.model.feature_names() {
            return Err(PipelineError::FeatureOrderMismatch {
                produced: transformed.columns().to_vec(),
                expected: self.model.feature_names().to_vec(),
            });
        }

        let features = crate::preprocessing::to_matrix(&transformed)?;
        let proba = self.model.predict_proba(&features)?;
        let p1 = proba[[0, POSITIVE_CLASS]];
        let p0 = proba[[0, 0]];

        Ok(Prediction {
            label: u8::from(p1 > p0),
            probabilities: [p0, p1],
        })
    }

    pub fn assess(&self, answers: &SurveyAnswers) -> Result<RiskAssessment> {
        let bmi = FeatureEngineer::compute_bmi(answers.height, answers.weight)?;
        let prediction = self.predict(answers)?;
        let probability = prediction.positive_probability();
        let tier = RiskTier::from_probability(probability);

        tracing::debug!(bmi, probability, tier = %tier, "risk assessed");

        Ok(RiskAssessment {
            bmi,
            probability,
            tier,
            label: prediction.label,
            probabilities: prediction.probabilities,
            assessed_at: chrono::Utc::now(),
        })
    }
}
