//! Error types for Pipeweld Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid step descriptor '{step}': {message}")]
    InvalidStep { step: String, message: String },

    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },

    #[error("Schema lookup failed for service '{service}': {message}")]
    Schema { service: String, message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
