// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Repetition log entries (pull-ups / push-ups).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged exercise session, owned by the record store.
///
/// Identity is the storage-assigned `id`; duplicate timestamps are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitionRecord {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    /// Renamed from `pushups_number` in the second schema version.
    #[serde(rename = "pullups_number", alias = "pushups_number")]
    pub count: u32,
}

/// A record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepetitionRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "pullups_number", alias = "pushups_number")]
    pub count: u32,
}

impl NewRepetitionRecord {
    pub fn new(timestamp: DateTime<Utc>, count: u32) -> Self {
        Self { timestamp, count }
    }

    /// Blank entry as shown by the "add" sheet: now, zero repetitions.
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self::new(now, 0)
    }
}

/// Order records newest first, as the log list renders them.
pub fn sort_newest_first(records: &mut [RepetitionRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
