// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The energy total depends on the order in which the two energy queries
//! resolve: it is only computed when basal energy arrives.

use fit_tracker::models::MetricKind;
use std::sync::Arc;

mod common;
use common::{aggregator_for, test_windows, GatedProvider};

#[tokio::test]
async fn test_active_then_passive_sets_rounded_total() {
    let provider = Arc::new(GatedProvider::new());
    let today = test_windows().start_of_today;
    let active = provider.gate(MetricKind::ActiveEnergy, today, 400.4);
    let passive = provider.gate(MetricKind::BasalEnergy, today, 1600.2);
    let aggregator = aggregator_for(provider.clone());

    let refresh = aggregator.refresh();

    active.send(()).unwrap();
    provider
        .wait_for_returns(MetricKind::ActiveEnergy, today, 1)
        .await;
    assert!(aggregator.snapshot().energy_burned_today.is_none());

    passive.send(()).unwrap();
    refresh.finished().await;

    let energy = aggregator.snapshot().energy_burned_today.unwrap();
    assert_eq!(energy.value, 2001.0);
    assert_eq!(energy.display, "2,001");
}

#[tokio::test]
async fn test_passive_before_active_leaves_total_unset() {
    let provider = Arc::new(GatedProvider::new());
    let today = test_windows().start_of_today;
    let active = provider.gate(MetricKind::ActiveEnergy, today, 400.4);
    let passive = provider.gate(MetricKind::BasalEnergy, today, 1600.2);
    let aggregator = aggregator_for(provider.clone());

    let refresh = aggregator.refresh();

    passive.send(()).unwrap();
    provider
        .wait_for_returns(MetricKind::BasalEnergy, today, 1)
        .await;
    assert!(aggregator.snapshot().energy_burned_today.is_none());

    active.send(()).unwrap();
    refresh.finished().await;

    // Active arriving later does not recompute the total.
    assert!(aggregator.snapshot().energy_burned_today.is_none());
}

#[tokio::test]
async fn test_next_refresh_uses_previously_held_active_energy() {
    let provider = Arc::new(GatedProvider::new());
    let today = test_windows().start_of_today;
    let aggregator = aggregator_for(provider.clone());

    // First cycle: passive wins the race, total stays unset.
    let active = provider.gate(MetricKind::ActiveEnergy, today, 300.0);
    let passive = provider.gate(MetricKind::BasalEnergy, today, 1500.0);
    let first = aggregator.refresh();
    passive.send(()).unwrap();
    provider
        .wait_for_returns(MetricKind::BasalEnergy, today, 1)
        .await;
    active.send(()).unwrap();
    first.finished().await;
    assert!(aggregator.snapshot().energy_burned_today.is_none());

    // Second cycle: passive resolves first again, but active from the first
    // cycle is still held, so a total appears.
    let active = provider.gate(MetricKind::ActiveEnergy, today, 350.0);
    let passive = provider.gate(MetricKind::BasalEnergy, today, 1510.0);
    let second = aggregator.refresh();
    passive.send(()).unwrap();
    provider
        .wait_for_returns(MetricKind::BasalEnergy, today, 2)
        .await;
    assert_eq!(aggregator.snapshot().energy_burned_display(), "1,810");

    active.send(()).unwrap();
    second.finished().await;
    assert_eq!(aggregator.snapshot().energy_burned_display(), "1,810");
}
