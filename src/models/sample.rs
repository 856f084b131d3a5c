// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Raw health samples as returned by a provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metric kinds the tracker reads from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Step count (unit: count)
    StepCount,
    /// Active energy burned (unit: kilocalorie)
    ActiveEnergy,
    /// Basal ("passive") energy burned (unit: kilocalorie)
    BasalEnergy,
    /// Body mass (unit: gram)
    BodyMass,
}

impl MetricKind {
    /// Every kind the tracker asks read access for.
    pub const ALL: [MetricKind; 4] = [
        MetricKind::StepCount,
        MetricKind::ActiveEnergy,
        MetricKind::BasalEnergy,
        MetricKind::BodyMass,
    ];
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricKind::StepCount => "step_count",
            MetricKind::ActiveEnergy => "active_energy",
            MetricKind::BasalEnergy => "basal_energy",
            MetricKind::BodyMass => "body_mass",
        };
        f.write_str(name)
    }
}

/// A single quantity sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    pub kind: MetricKind,
    /// Value in the kind's native unit: count, kilocalories or grams
    pub value: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Samples are matched on their start time only.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}
