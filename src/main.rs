// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fit-Tracker
//!
//! Loads health samples into the in-memory provider, runs the access and
//! refresh cycle, and prints the published metrics (plus the repetition log)
//! as JSON. With `FIT_FOREGROUND_INTERVAL_SECS` set it keeps simulating
//! app-foreground transitions until Ctrl-C.

use anyhow::Context;
use fit_tracker::{
    config::{Config, LogFormat},
    db::{MemoryRecordStore, RecordStore},
    provider::MemoryProvider,
    services::MetricsAggregator,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    init_logging(config.log_format);
    tracing::info!(
        samples = %config.samples_path.display(),
        locale = %config.locale,
        "Starting Fit-Tracker"
    );

    let provider = MemoryProvider::load_from_file(&config.samples_path)
        .with_context(|| format!("Failed to load {}", config.samples_path.display()))?;

    let records = match &config.records_path {
        Some(path) => MemoryRecordStore::load_from_file(path)?,
        None => MemoryRecordStore::new(),
    };

    let aggregator = MetricsAggregator::new(Arc::new(provider), config.locale);
    let state = AppState {
        config,
        aggregator,
        records,
    };

    // Initial mount: request access, which refreshes on success
    if let Some(refresh) = state.aggregator.request_access().await {
        refresh.finished().await;
    }
    print_report(&state).await?;

    let Some(period) = state.config.foreground_interval else {
        return Ok(());
    };

    tracing::info!(seconds = period.as_secs(), "Simulating foreground transitions");
    let mut ticker = tokio::time::interval(period);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(refresh) = state.aggregator.on_foreground().await {
                    refresh.finished().await;
                }
                print_report(&state).await?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Print the current metrics, alert and repetition log as one JSON document,
/// then acknowledge the alert.
async fn print_report(state: &AppState) -> anyhow::Result<()> {
    let metrics = state.aggregator.state();
    let snapshot = &metrics.snapshot;
    let records = state.records.list().await?;

    let report = serde_json::json!({
        "steps_today": snapshot.steps_today_display(),
        "steps_yesterday": snapshot.steps_yesterday_display(),
        "energy_burned_today": snapshot.energy_burned_display(),
        "latest_weight": snapshot.latest_weight_display(),
        "second_latest_weight": snapshot.second_latest_weight_display(),
        "alert": metrics.alert,
        "records": records,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if metrics.alert.showing {
        state.aggregator.dismiss_alert();
    }
    Ok(())
}

/// Initialize logging on stderr, JSON or human-readable.
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fit_tracker=debug,info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
