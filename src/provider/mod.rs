// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health-data provider seam.
//!
//! The provider owns the raw samples and the read authorization. The
//! aggregator only ever issues the read-only queries defined here.

pub mod memory;

pub use memory::MemoryProvider;

use crate::models::{HealthSample, MetricKind, TimeInterval};
use async_trait::async_trait;

/// Errors a provider can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Health data is not available on this device")]
    Unavailable,

    #[error("{0}")]
    AuthorizationDenied(String),

    #[error("no data found")]
    NoDataFound,

    #[error("{0}")]
    Transport(String),
}

/// Result type alias for provider calls
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// External health-data service.
#[async_trait]
pub trait HealthProvider: Send + Sync {
    /// Whether health data exists at all on this device.
    fn is_available(&self) -> bool;

    /// Request read access for the given kinds.
    async fn request_authorization(&self, kinds: &[MetricKind]) -> ProviderResult<()>;

    /// Sum of all `kind` samples starting inside `interval`, in the kind's
    /// native unit. Returns [`ProviderError::NoDataFound`] when nothing matches.
    async fn cumulative_sum(&self, kind: MetricKind, interval: TimeInterval)
        -> ProviderResult<f64>;

    /// Up to `limit` most recent samples of `kind`, newest first.
    async fn most_recent(&self, kind: MetricKind, limit: usize)
        -> ProviderResult<Vec<HealthSample>>;
}
