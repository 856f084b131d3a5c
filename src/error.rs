// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Provider failures never reach this type: the aggregator turns them into
//! the published alert. `AppError` covers the record store and the binary.

use crate::config::ConfigError;
use crate::provider::memory::LoadError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load health samples: {0}")]
    Samples(#[from] LoadError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Whether the error refers to a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

/// Result type alias for fallible application code
pub type Result<T> = std::result::Result<T, AppError>;
