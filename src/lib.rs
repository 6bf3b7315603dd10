//! Obesity risk - предобработка анкеты и инференс классификатора риска ожирения

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod preprocessing;
pub mod types;

pub use error::{PipelineError, Result};
pub use models::*;
pub use preprocessing::*;
pub use types::*;
