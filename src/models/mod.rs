// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod metrics;
pub mod record;
pub mod sample;

pub use metrics::{Alert, MetricsSnapshot, MetricsState, Reading};
pub use record::{NewRepetitionRecord, RepetitionRecord};
pub use sample::{HealthSample, MetricKind, TimeInterval};
