// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health-metrics aggregation service.
//!
//! Handles the fetch cycle:
//! 1. Check the provider exists and request read access
//! 2. Spawn one task per metric query (steps today/yesterday, active and
//!    basal energy, the two newest body-mass samples)
//! 3. Normalize each result as it arrives and publish it to subscribers
//!
//! Queries are independent. Each writes only its own snapshot field(s), so an
//! overlapping refresh simply overwrites fields in completion order.

use crate::models::{MetricKind, MetricsSnapshot, MetricsState, Reading};
use crate::provider::{HealthProvider, ProviderError, ProviderResult};
use crate::services::format::{self, NumberLocale};
use crate::time_utils::{format_utc_rfc3339, Clock, DayWindows, SystemClock};
use rust_decimal::prelude::ToPrimitive;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The fixed battery of queries issued by every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricQuery {
    StepsToday,
    StepsYesterday,
    ActiveEnergy,
    PassiveEnergy,
    LatestWeight,
    SecondLatestWeight,
}

impl MetricQuery {
    pub const ALL: [MetricQuery; 6] = [
        MetricQuery::StepsToday,
        MetricQuery::StepsYesterday,
        MetricQuery::ActiveEnergy,
        MetricQuery::PassiveEnergy,
        MetricQuery::LatestWeight,
        MetricQuery::SecondLatestWeight,
    ];

    /// Human-readable name, used as the alert prefix.
    pub fn label(self) -> &'static str {
        match self {
            MetricQuery::StepsToday => "steps today",
            MetricQuery::StepsYesterday => "steps yesterday",
            MetricQuery::ActiveEnergy => "active energy",
            MetricQuery::PassiveEnergy => "passive energy",
            MetricQuery::LatestWeight => "latest weight",
            MetricQuery::SecondLatestWeight => "second latest weight",
        }
    }

    /// Alert text for a failed query.
    ///
    /// Missing data gets a query-specific prefix; any other provider error is
    /// shown verbatim.
    pub fn alert_message(self, err: &ProviderError) -> String {
        match err {
            ProviderError::NoDataFound => format!("Failed to fetch {}: {}", self.label(), err),
            other => other.to_string(),
        }
    }
}

/// Energy components held between the two energy queries.
#[derive(Debug, Default)]
struct EnergyParts {
    active: Option<f64>,
    passive: Option<f64>,
}

struct Inner {
    provider: Arc<dyn HealthProvider>,
    clock: Arc<dyn Clock>,
    locale: NumberLocale,
    state: watch::Sender<MetricsState>,
    energy: Mutex<EnergyParts>,
}

/// Aggregates provider queries into a published [`MetricsState`].
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct MetricsAggregator {
    inner: Arc<Inner>,
}

impl MetricsAggregator {
    /// Aggregator using the device's local clock.
    pub fn new(provider: Arc<dyn HealthProvider>, locale: NumberLocale) -> Self {
        Self::with_clock(provider, Arc::new(SystemClock), locale)
    }

    pub fn with_clock(
        provider: Arc<dyn HealthProvider>,
        clock: Arc<dyn Clock>,
        locale: NumberLocale,
    ) -> Self {
        let (state, _) = watch::channel(MetricsState::default());
        Self {
            inner: Arc::new(Inner {
                provider,
                clock,
                locale,
                state,
                energy: Mutex::new(EnergyParts::default()),
            }),
        }
    }

    /// Current published state.
    pub fn state(&self) -> MetricsState {
        self.inner.state.borrow().clone()
    }

    /// Current snapshot without the alert.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.state.borrow().snapshot.clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<MetricsState> {
        self.inner.state.subscribe()
    }

    /// Hide the alert (the presentation layer acknowledged it).
    pub fn dismiss_alert(&self) {
        self.inner.state.send_modify(|state| state.alert.dismiss());
    }

    /// Request read access and refresh on success.
    ///
    /// Returns `None` when no refresh was started: the provider is not
    /// available (silently ignored) or access was refused (alert raised).
    pub async fn request_access(&self) -> Option<RefreshHandle> {
        let provider = &self.inner.provider;
        if !provider.is_available() {
            tracing::debug!("Health data unavailable, skipping authorization");
            return None;
        }

        match provider.request_authorization(&MetricKind::ALL).await {
            Ok(()) => Some(self.refresh()),
            Err(ProviderError::Unavailable) => {
                tracing::debug!("Health data unavailable, skipping authorization");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "Health data authorization failed");
                self.inner
                    .state
                    .send_modify(|state| state.alert.raise(err.to_string()));
                None
            }
        }
    }

    /// App returned to the foreground: re-validate access and refresh.
    pub async fn on_foreground(&self) -> Option<RefreshHandle> {
        tracing::debug!("App entered foreground");
        self.request_access().await
    }

    /// Spawn every metric query for the current day windows.
    ///
    /// In-flight queries from an earlier call are not cancelled.
    pub fn refresh(&self) -> RefreshHandle {
        let windows = self.inner.clock.windows();
        tracing::debug!(
            start_of_today = %format_utc_rfc3339(windows.start_of_today),
            start_of_yesterday = %format_utc_rfc3339(windows.start_of_yesterday),
            "Refreshing health metrics"
        );

        let tasks = MetricQuery::ALL
            .into_iter()
            .map(|query| {
                let inner = Arc::clone(&self.inner);
                tokio::spawn(async move { inner.run(query, windows).await })
            })
            .collect();

        RefreshHandle { tasks }
    }
}

impl Inner {
    async fn run(&self, query: MetricQuery, windows: DayWindows) {
        match query {
            MetricQuery::StepsToday => {
                let result = self
                    .provider
                    .cumulative_sum(MetricKind::StepCount, windows.today())
                    .await;
                self.apply_steps(query, result);
            }
            MetricQuery::StepsYesterday => {
                let result = self
                    .provider
                    .cumulative_sum(MetricKind::StepCount, windows.yesterday())
                    .await;
                self.apply_steps(query, result);
            }
            MetricQuery::ActiveEnergy => {
                let result = self
                    .provider
                    .cumulative_sum(MetricKind::ActiveEnergy, windows.today())
                    .await;
                match result {
                    Ok(kcal) => {
                        tracing::debug!(kcal, "Active energy resolved");
                        self.energy_parts().active = Some(kcal);
                    }
                    Err(err) => self.raise(query, &err),
                }
            }
            MetricQuery::PassiveEnergy => {
                let result = self
                    .provider
                    .cumulative_sum(MetricKind::BasalEnergy, windows.today())
                    .await;
                match result {
                    Ok(kcal) => self.apply_passive_energy(kcal),
                    Err(err) => self.raise(query, &err),
                }
            }
            MetricQuery::LatestWeight => {
                match self.provider.most_recent(MetricKind::BodyMass, 1).await {
                    Ok(samples) => match samples.first() {
                        Some(sample) => {
                            let reading = self.weight_reading(sample.value);
                            self.state.send_modify(|state| {
                                state.snapshot.latest_weight_kg = Some(reading);
                            });
                        }
                        None => self.raise(query, &ProviderError::NoDataFound),
                    },
                    Err(err) => self.raise(query, &err),
                }
            }
            MetricQuery::SecondLatestWeight => {
                match self.provider.most_recent(MetricKind::BodyMass, 2).await {
                    Ok(samples) => match samples.get(1) {
                        Some(sample) => {
                            let reading = self.weight_reading(sample.value);
                            self.state.send_modify(|state| {
                                state.snapshot.second_latest_weight_kg = Some(reading);
                            });
                        }
                        None => {
                            tracing::debug!(
                                count = samples.len(),
                                "Fewer than two body-mass samples"
                            );
                        }
                    },
                    Err(ProviderError::NoDataFound) => {
                        tracing::debug!("No body-mass samples");
                    }
                    Err(err) => self.raise(query, &err),
                }
            }
        }
    }

    /// Publish a step count. A failed query still shows `"0"` and also
    /// raises the alert.
    fn apply_steps(&self, query: MetricQuery, result: ProviderResult<f64>) {
        let steps = match result {
            Ok(steps) => steps,
            Err(err) => {
                self.raise(query, &err);
                0.0
            }
        };
        let reading = Reading::new(
            steps.max(0.0).round(),
            format::format_steps(steps, &self.locale),
        );

        tracing::debug!(query = query.label(), steps = reading.value, "Steps resolved");
        self.state.send_modify(|state| {
            let slot = match query {
                MetricQuery::StepsToday => &mut state.snapshot.steps_today,
                _ => &mut state.snapshot.steps_yesterday,
            };
            *slot = Some(reading);
        });
    }

    /// The total is only recomputed here, and only if active energy has
    /// already resolved.
    fn apply_passive_energy(&self, passive: f64) {
        let active = {
            let mut parts = self.energy_parts();
            parts.passive = Some(passive);
            parts.active
        };

        let Some(active) = active else {
            tracing::debug!(passive, "Passive energy resolved before active, total unset");
            return;
        };

        let reading = Reading::new(
            (active + passive).max(0.0).round(),
            format::format_energy(active, passive, &self.locale),
        );
        tracing::debug!(active, passive, total = reading.value, "Energy resolved");
        self.state.send_modify(|state| {
            state.snapshot.energy_burned_today = Some(reading);
        });
    }

    fn weight_reading(&self, grams: f64) -> Reading {
        let kg = format::grams_to_kg(grams).to_f64().unwrap_or(0.0);
        Reading::new(kg, format::format_mass_kg(grams, &self.locale))
    }

    fn raise(&self, query: MetricQuery, err: &ProviderError) {
        tracing::warn!(query = query.label(), error = %err, "Metric query failed");
        let message = query.alert_message(err);
        self.state.send_modify(|state| state.alert.raise(message));
    }

    fn energy_parts(&self) -> std::sync::MutexGuard<'_, EnergyParts> {
        self.energy.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Handle to the queries spawned by one refresh.
///
/// Dropping it does not cancel anything; awaiting [`RefreshHandle::finished`]
/// waits until every query has been applied.
#[must_use = "drop the handle explicitly if the refresh should run unobserved"]
pub struct RefreshHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Wait for every query of this refresh to be applied.
    pub async fn finished(self) {
        for result in futures_util::future::join_all(self.tasks).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Metric query task failed");
            }
        }
    }
}
