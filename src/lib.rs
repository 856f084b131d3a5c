// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fit-Tracker: daily steps, energy and body weight at a glance
//!
//! This crate aggregates read-only queries against a health-data provider
//! into a published, display-ready metrics snapshot, and models the
//! pull-up/push-up repetition log kept alongside it.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod provider;
pub mod services;
pub mod time_utils;

use config::Config;
use db::MemoryRecordStore;
use services::MetricsAggregator;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub aggregator: MetricsAggregator,
    pub records: MemoryRecordStore,
}
