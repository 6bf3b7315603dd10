//! Модуль предобработки данных

pub mod binary;
pub mod feature_engineering;
pub mod min_max;
pub mod one_hot;
pub mod pipeline;

pub use binary::BinaryEncoder;
pub use feature_engineering::{FeatureEngineer, RAW_COLUMNS};
pub use min_max::MinMaxTransformer;
pub use one_hot::OneHotEncodingTransformer;
pub use pipeline::{to_matrix, Pipeline, PipelineStep, SchemaPolicy, Transformer};
