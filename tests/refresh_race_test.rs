// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Overlapping refreshes are last-write-wins per field.
//!
//! Nothing cancels an earlier refresh and nothing checks staleness, so a slow
//! query from an older refresh overwrites a newer result when it finally
//! lands. This test pins that behavior down.

use fit_tracker::models::MetricKind;
use std::sync::Arc;

mod common;
use common::{aggregator_for, test_windows, GatedProvider};

#[tokio::test]
async fn test_slow_earlier_refresh_overwrites_newer_steps() {
    let provider = Arc::new(GatedProvider::new());
    let today = test_windows().start_of_today;
    let aggregator = aggregator_for(provider.clone());
    let mut rx = aggregator.subscribe();

    let stale = provider.gate(MetricKind::StepCount, today, 4000.0);
    let fresh = provider.gate(MetricKind::StepCount, today, 5200.0);

    let first = aggregator.refresh();
    provider.wait_for_calls(MetricKind::StepCount, today, 1).await;
    let second = aggregator.refresh();
    provider.wait_for_calls(MetricKind::StepCount, today, 2).await;

    // The newer refresh resolves first...
    fresh.send(()).unwrap();
    rx.wait_for(|s| s.snapshot.steps_today_display() == "5,200")
        .await
        .unwrap();

    // ...then the older one lands and wins.
    stale.send(()).unwrap();
    first.finished().await;
    second.finished().await;

    assert_eq!(aggregator.snapshot().steps_today_display(), "4,000");
}

#[tokio::test]
async fn test_overlapping_refreshes_in_order_keep_latest() {
    let provider = Arc::new(GatedProvider::new());
    let today = test_windows().start_of_today;
    let aggregator = aggregator_for(provider.clone());

    let older = provider.gate(MetricKind::StepCount, today, 4000.0);
    let newer = provider.gate(MetricKind::StepCount, today, 5200.0);

    let first = aggregator.refresh();
    provider.wait_for_calls(MetricKind::StepCount, today, 1).await;
    let second = aggregator.refresh();
    provider.wait_for_calls(MetricKind::StepCount, today, 2).await;

    older.send(()).unwrap();
    provider
        .wait_for_returns(MetricKind::StepCount, today, 1)
        .await;
    newer.send(()).unwrap();
    first.finished().await;
    second.finished().await;

    assert_eq!(aggregator.snapshot().steps_today_display(), "5,200");
}
