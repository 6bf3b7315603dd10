//! Пайплайн предобработки: упорядоченная композиция трансформеров

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::binary::BinaryEncoder;
use super::min_max::MinMaxTransformer;
use super::one_hot::OneHotEncodingTransformer;
use crate::error::{PipelineError, Result};
use crate::types::Frame;

/// Общий контракт трансформеров: `fit` запоминает состояние, `transform`
/// только читает его и возвращает новый фрейм.
pub trait Transformer {
    fn name(&self) -> &'static str;

    fn fit(&mut self, frame: &Frame) -> Result<()>;

    fn transform(&self, frame: &Frame) -> Result<Frame>;

    /// Согласованность состояния, прочитанного из артефакта
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn fit_transform(&mut self, frame: &Frame) -> Result<Frame> {
        self.fit(frame)?;
        self.transform(frame)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineStep {
    Binary(BinaryEncoder),
    OneHot(OneHotEncodingTransformer),
    MinMax(MinMaxTransformer),
}

impl PipelineStep {
    fn inner(&self) -> &dyn Transformer {
        match self {
            PipelineStep::Binary(t) => t,
            PipelineStep::OneHot(t) => t,
            PipelineStep::MinMax(t) => t,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Transformer {
        match self {
            PipelineStep::Binary(t) => t,
            PipelineStep::OneHot(t) => t,
            PipelineStep::MinMax(t) => t,
        }
    }
}

impl Transformer for PipelineStep {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn fit(&mut self, frame: &Frame) -> Result<()> {
        self.inner_mut().fit(frame)
    }

    fn transform(&self, frame: &Frame) -> Result<Frame> {
        self.inner().transform(frame)
    }

    fn validate(&self) -> Result<()> {
        self.inner().validate()
    }
}

/// Что делать, если шагу не хватает колонок
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaPolicy {
    /// Вернуть `SchemaMismatch` вызывающему
    #[default]
    Strict,
    /// Пропустить шаг с предупреждением в лог
    PassThrough,
}

impl FromStr for SchemaPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SchemaPolicy::Strict),
            "pass-through" | "passthrough" => Ok(SchemaPolicy::PassThrough),
            other => Err(format!("unknown schema policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
    #[serde(default)]
    output_columns: Option<Vec<String>>,
    #[serde(skip)]
    policy: SchemaPolicy,
}

impl Pipeline {
    pub fn new(steps: Vec<PipelineStep>) -> Self {
        Self {
            steps,
            output_columns: None,
            policy: SchemaPolicy::default(),
        }
    }

    /// Порядок шагов, использованный при обучении модели:
    /// BinaryEncoder -> OneHotEncodingTransformer -> MinMaxTransformer
    pub fn obesity() -> Self {
        Self::new(vec![
            PipelineStep::Binary(BinaryEncoder::default()),
            PipelineStep::OneHot(OneHotEncodingTransformer::default()),
            PipelineStep::MinMax(MinMaxTransformer::default()),
        ])
    }

    pub fn with_policy(mut self, policy: SchemaPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> SchemaPolicy {
        self.policy
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    /// Колонки на выходе, запомненные при `fit`
    pub fn output_columns(&self) -> Option<&[String]> {
        self.output_columns.as_deref()
    }

    /// Преобразованный фрейм в матрицу признаков для модели
    pub fn transform_to_matrix(&self, frame: &Frame) -> Result<Array2<f64>> {
        let transformed = self.transform(frame)?;
        to_matrix(&transformed)
    }

    /// Читает артефакт и проверяет состояние каждого шага
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let pipeline: Self = serde_json::from_reader(reader)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl Transformer for Pipeline {
    fn name(&self) -> &'static str {
        "Pipeline"
    }

    /// Обучение всегда строгое: шаг без нужных колонок - ошибка
    fn fit(&mut self, frame: &Frame) -> Result<()> {
        let mut current = frame.clone();
        for step in &mut self.steps {
            current = step.fit_transform(&current)?;
            tracing::debug!(step = step.name(), columns = current.n_cols(), "step fitted");
        }
        self.output_columns = Some(current.columns().to_vec());
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.steps.iter().try_for_each(|step| step.validate())
    }

    fn transform(&self, frame: &Frame) -> Result<Frame> {
        let mut current = frame.clone();
        for step in &self.steps {
            current = match step.transform(&current) {
                Ok(next) => next,
                Err(PipelineError::SchemaMismatch { transformer, missing })
                    if self.policy == SchemaPolicy::PassThrough =>
                {
                    tracing::warn!(
                        transformer,
                        missing = ?missing,
                        "one or more features are not in the frame, step skipped"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };
        }
        Ok(current)
    }
}

/// Все значения должны быть числовыми
pub fn to_matrix(frame: &Frame) -> Result<Array2<f64>> {
    let mut matrix = Array2::zeros((frame.n_rows(), frame.n_cols()));
    for (i, row) in frame.rows().iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            matrix[[i, j]] = value.as_f64().ok_or_else(|| PipelineError::TypeMismatch {
                column: frame.columns()[j].clone(),
                expected: "numeric",
            })?;
        }
    }
    Ok(matrix)
}
