//! Shared configuration for the autotrend pipeline.
//!
//! Exposes the immutable [`AppConfig`] passed into every component at
//! construction (no ambient option lookups), the env-var loader, and the
//! default filter-keyword set.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod keywords;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use keywords::{default_filter_keywords, effective_keywords};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
