//! Конфигурация сервиса из переменных окружения

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::preprocessing::SchemaPolicy;

pub const PIPELINE_PATH_VAR: &str = "OBESITY_PIPELINE_PATH";
pub const MODEL_PATH_VAR: &str = "OBESITY_MODEL_PATH";
pub const BIND_ADDR_VAR: &str = "OBESITY_BIND_ADDR";
pub const SCHEMA_POLICY_VAR: &str = "OBESITY_SCHEMA_POLICY";

const DEFAULT_PIPELINE_PATH: &str = "modelo/pipeline.json";
const DEFAULT_MODEL_PATH: &str = "modelo/final_model.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}: invalid socket address {value:?}")]
    BindAddr { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    SchemaPolicy { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub pipeline_path: PathBuf,
    pub model_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub schema_policy: SchemaPolicy,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Пустые значения считаются отсутствующими
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let bind_addr = match get(BIND_ADDR_VAR) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::BindAddr {
                var: BIND_ADDR_VAR,
                value,
            })?,
            None => defaults.bind_addr,
        };

        let schema_policy = match get(SCHEMA_POLICY_VAR) {
            Some(value) => value.parse().map_err(|reason| ConfigError::SchemaPolicy {
                var: SCHEMA_POLICY_VAR,
                reason,
            })?,
            None => defaults.schema_policy,
        };

        Ok(Self {
            pipeline_path: get(PIPELINE_PATH_VAR).map(PathBuf::from).unwrap_or(defaults.pipeline_path),
            model_path: get(MODEL_PATH_VAR).map(PathBuf::from).unwrap_or(defaults.model_path),
            bind_addr,
            schema_policy,
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            pipeline_path: PathBuf::from(DEFAULT_PIPELINE_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            schema_policy: SchemaPolicy::Strict,
        }
    }
}
