// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory health-data provider.
//!
//! Holds samples loaded from a JSON file (or injected directly) and answers
//! the same queries a platform health store would. Used by the binary for
//! local runs and by the test suite.

use super::{HealthProvider, ProviderError, ProviderResult};
use crate::models::{HealthSample, MetricKind, TimeInterval};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

/// On-disk layout of a samples file.
#[derive(Debug, Deserialize)]
struct SamplesFile {
    #[serde(default = "default_true")]
    available: bool,
    /// Description reported when authorization is denied; `None` grants access.
    #[serde(default)]
    deny_authorization: Option<String>,
    #[serde(default)]
    samples: Vec<HealthSample>,
}

fn default_true() -> bool {
    true
}

/// Provider backed by a sample list.
pub struct MemoryProvider {
    available: bool,
    deny_authorization: RwLock<Option<String>>,
    samples: RwLock<Vec<HealthSample>>,
    failures: RwLock<HashMap<MetricKind, ProviderError>>,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::with_samples(Vec::new())
    }
}

impl MemoryProvider {
    /// Available provider that grants access and serves `samples`.
    pub fn with_samples(samples: Vec<HealthSample>) -> Self {
        Self {
            available: true,
            deny_authorization: RwLock::new(None),
            samples: RwLock::new(samples),
            failures: RwLock::new(HashMap::new()),
        }
    }

    /// Provider for a device without health data.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// Load samples from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| LoadError::Io(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load samples from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, LoadError> {
        let file: SamplesFile =
            serde_json::from_str(json_data).map_err(|e| LoadError::Parse(e.to_string()))?;

        if let Some(bad) = file.samples.iter().find(|s| s.value < 0.0 || s.end < s.start) {
            return Err(LoadError::InvalidSample(format!(
                "{} sample starting {}",
                bad.kind, bad.start
            )));
        }

        tracing::info!(
            count = file.samples.len(),
            available = file.available,
            "Loaded health samples"
        );

        Ok(Self {
            available: file.available,
            deny_authorization: RwLock::new(file.deny_authorization),
            samples: RwLock::new(file.samples),
            failures: RwLock::new(HashMap::new()),
        })
    }

    /// Append a sample.
    pub fn push_sample(&self, sample: HealthSample) {
        self.write_samples().push(sample);
    }

    /// Deny the next authorization requests with `description`.
    pub fn deny_authorization(&self, description: impl Into<String>) {
        *self
            .deny_authorization
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(description.into());
    }

    /// Make every query for `kind` fail with `error`.
    pub fn fail_queries(&self, kind: MetricKind, error: ProviderError) {
        self.failures
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(kind, error);
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.read_samples().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn injected_failure(&self, kind: MetricKind) -> ProviderResult<()> {
        let failures = self.failures.read().unwrap_or_else(|e| e.into_inner());
        match failures.get(&kind) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn read_samples(&self) -> std::sync::RwLockReadGuard<'_, Vec<HealthSample>> {
        self.samples.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_samples(&self) -> std::sync::RwLockWriteGuard<'_, Vec<HealthSample>> {
        self.samples.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl HealthProvider for MemoryProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_authorization(&self, kinds: &[MetricKind]) -> ProviderResult<()> {
        if !self.available {
            return Err(ProviderError::Unavailable);
        }
        let denied = self
            .deny_authorization
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match denied {
            Some(description) => Err(ProviderError::AuthorizationDenied(description)),
            None => {
                tracing::debug!(kinds = ?kinds, "Authorization granted");
                Ok(())
            }
        }
    }

    async fn cumulative_sum(
        &self,
        kind: MetricKind,
        interval: TimeInterval,
    ) -> ProviderResult<f64> {
        self.injected_failure(kind)?;

        let samples = self.read_samples();
        let mut matched = samples
            .iter()
            .filter(|s| s.kind == kind && interval.contains(s.start))
            .peekable();

        if matched.peek().is_none() {
            return Err(ProviderError::NoDataFound);
        }
        Ok(matched.map(|s| s.value).sum())
    }

    async fn most_recent(
        &self,
        kind: MetricKind,
        limit: usize,
    ) -> ProviderResult<Vec<HealthSample>> {
        self.injected_failure(kind)?;

        let mut matched: Vec<HealthSample> = self
            .read_samples()
            .iter()
            .filter(|s| s.kind == kind)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.start.cmp(&a.start));
        matched.truncate(limit);
        Ok(matched)
    }
}

/// Errors from loading a samples file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Io(String),

    #[error("Failed to parse samples: {0}")]
    Parse(String),

    #[error("Invalid sample: {0}")]
    InvalidSample(String),
}
