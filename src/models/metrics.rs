// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Published metrics state observed by the presentation layer.
//!
//! The snapshot is transient: it is rebuilt from provider queries on every
//! refresh and never persisted.

use serde::Serialize;

/// Display text for a metric whose query has not resolved.
pub const NOT_AVAILABLE: &str = "Not Available";

/// A resolved metric: the raw value plus its display-ready form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub value: f64,
    pub display: String,
}

impl Reading {
    pub fn new(value: f64, display: impl Into<String>) -> Self {
        Self {
            value,
            display: display.into(),
        }
    }
}

/// Aggregated, display-ready metric values.
///
/// `None` means "not available". Fields are replaced independently as their
/// queries resolve and are never cleared back to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Steps over `[start of today, now)`
    pub steps_today: Option<Reading>,
    /// Steps over `[start of yesterday, start of today)`
    pub steps_yesterday: Option<Reading>,
    /// Active + basal energy today, rounded to whole kilocalories
    pub energy_burned_today: Option<Reading>,
    /// Most recent body-mass sample in kilograms
    pub latest_weight_kg: Option<Reading>,
    /// Second most recent body-mass sample in kilograms
    pub second_latest_weight_kg: Option<Reading>,
}

impl MetricsSnapshot {
    pub fn steps_today_display(&self) -> &str {
        display_or_na(&self.steps_today)
    }

    pub fn steps_yesterday_display(&self) -> &str {
        display_or_na(&self.steps_yesterday)
    }

    pub fn energy_burned_display(&self) -> &str {
        display_or_na(&self.energy_burned_today)
    }

    pub fn latest_weight_display(&self) -> &str {
        display_or_na(&self.latest_weight_kg)
    }

    pub fn second_latest_weight_display(&self) -> &str {
        display_or_na(&self.second_latest_weight_kg)
    }
}

fn display_or_na(reading: &Option<Reading>) -> &str {
    reading
        .as_ref()
        .map(|r| r.display.as_str())
        .unwrap_or(NOT_AVAILABLE)
}

/// Single shared alert slot. The last error raised wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub showing: bool,
    pub message: String,
}

impl Alert {
    pub fn raise(&mut self, message: impl Into<String>) {
        self.showing = true;
        self.message = message.into();
    }

    pub fn dismiss(&mut self) {
        self.showing = false;
    }
}

/// Everything a subscriber observes: the snapshot plus the alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsState {
    pub snapshot: MetricsSnapshot,
    pub alert: Alert,
}
