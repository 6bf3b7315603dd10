//! Ошибки пайплайна предобработки и инференса

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Один или несколько признаков отсутствуют во входном фрейме
    #[error("{transformer}: missing columns {missing:?}")]
    SchemaMismatch {
        transformer: &'static str,
        missing: Vec<String>,
    },

    #[error("unknown category {value:?} for feature {feature}")]
    UnknownCategory { feature: String, value: String },

    #[error("feature {feature} has {} categories, expected at most 2", .categories.len())]
    NotBinary {
        feature: String,
        categories: Vec<String>,
    },

    #[error("column {column}: expected {expected} value")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },

    #[error("{0} is not fitted")]
    NotFitted(&'static str),

    #[error("empty dataset")]
    EmptyDataset,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("model expects {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("pipeline produces columns {produced:?}, model expects {expected:?}")]
    FeatureOrderMismatch {
        produced: Vec<String>,
        expected: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Ошибка вызвана входными данными, а не артефактами или окружением.
    /// `SchemaMismatch` и `TypeMismatch` означают несовместимый с моделью
    /// пайплайн, ответ анкеты их вызвать не может.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::UnknownCategory { .. } | PipelineError::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
