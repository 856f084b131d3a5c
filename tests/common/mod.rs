// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fit_tracker::models::{HealthSample, MetricKind, TimeInterval};
use fit_tracker::provider::{HealthProvider, MemoryProvider, ProviderError, ProviderResult};
use fit_tracker::services::{MetricsAggregator, NumberLocale};
use fit_tracker::time_utils::{DayWindows, FixedClock};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// "Now" for every test: 2024-03-10 15:00 UTC.
#[allow(dead_code)]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn test_windows() -> DayWindows {
    DayWindows::at(&test_now())
}

/// A sample starting `hours_ago` before [`test_now`].
#[allow(dead_code)]
pub fn sample(kind: MetricKind, value: f64, hours_ago: i64) -> HealthSample {
    let start = test_now() - Duration::hours(hours_ago);
    HealthSample {
        kind,
        value,
        start,
        end: start + Duration::minutes(30),
    }
}

/// A full day of data: 9,876 steps today, 12,345 yesterday, 412.4 + 1650.3
/// kcal today, weights of 72.45 kg (newest) and 73.10 kg.
#[allow(dead_code)]
pub fn typical_samples() -> Vec<HealthSample> {
    vec![
        sample(MetricKind::StepCount, 5000.0, 6),
        sample(MetricKind::StepCount, 4876.0, 2),
        sample(MetricKind::StepCount, 12345.0, 24),
        sample(MetricKind::ActiveEnergy, 412.4, 3),
        sample(MetricKind::BasalEnergy, 1650.3, 14),
        sample(MetricKind::BodyMass, 72450.0, 8),
        sample(MetricKind::BodyMass, 73100.0, 80),
    ]
}

/// Aggregator over `provider` with the clock pinned to [`test_now`].
#[allow(dead_code)]
pub fn aggregator_for(provider: Arc<dyn HealthProvider>) -> MetricsAggregator {
    let clock = Arc::new(FixedClock(test_now()));
    MetricsAggregator::with_clock(provider, clock, NumberLocale::EN_US)
}

#[allow(dead_code)]
pub fn memory_aggregator(samples: Vec<HealthSample>) -> (MetricsAggregator, Arc<MemoryProvider>) {
    let provider = Arc::new(MemoryProvider::with_samples(samples));
    (aggregator_for(provider.clone()), provider)
}

#[allow(dead_code)]
type GateKey = (MetricKind, DateTime<Utc>);

#[allow(dead_code)]
struct Gate {
    release: oneshot::Receiver<()>,
    value: f64,
}

#[allow(dead_code)]
#[derive(Default)]
struct GateState {
    pending: HashMap<GateKey, VecDeque<Gate>>,
    arrived: HashMap<GateKey, usize>,
    returned: HashMap<GateKey, usize>,
}

/// Provider whose cumulative queries block until the test releases them.
///
/// Gates are keyed by metric kind and interval start and handed out in call
/// order. Ungated cumulative queries report no data; sample queries return
/// nothing.
#[allow(dead_code)]
#[derive(Default)]
pub struct GatedProvider {
    state: Mutex<GateState>,
}

#[allow(dead_code)]
impl GatedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next query of `kind` starting at `start`.
    pub fn gate(
        &self,
        kind: MetricKind,
        start: DateTime<Utc>,
        value: f64,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state
            .lock()
            .unwrap()
            .pending
            .entry((kind, start))
            .or_default()
            .push_back(Gate { release: rx, value });
        tx
    }

    /// Yield until `n` queries for the key have been issued.
    pub async fn wait_for_calls(&self, kind: MetricKind, start: DateTime<Utc>, n: usize) {
        while self.arrived((kind, start)) < n {
            tokio::task::yield_now().await;
        }
    }

    /// Yield until `n` queries for the key have returned to the aggregator.
    ///
    /// On the current-thread runtime a returned query has also been applied,
    /// since applying it involves no further await.
    pub async fn wait_for_returns(&self, kind: MetricKind, start: DateTime<Utc>, n: usize) {
        while self.returned((kind, start)) < n {
            tokio::task::yield_now().await;
        }
    }

    fn arrived(&self, key: GateKey) -> usize {
        let state = self.state.lock().unwrap();
        state.arrived.get(&key).copied().unwrap_or(0)
    }

    fn returned(&self, key: GateKey) -> usize {
        let state = self.state.lock().unwrap();
        state.returned.get(&key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl HealthProvider for GatedProvider {
    fn is_available(&self) -> bool {
        true
    }

    async fn request_authorization(&self, _kinds: &[MetricKind]) -> ProviderResult<()> {
        Ok(())
    }

    async fn cumulative_sum(
        &self,
        kind: MetricKind,
        interval: TimeInterval,
    ) -> ProviderResult<f64> {
        let key = (kind, interval.start);
        let gate = {
            let mut state = self.state.lock().unwrap();
            *state.arrived.entry(key).or_default() += 1;
            state.pending.get_mut(&key).and_then(|q| q.pop_front())
        };

        let Some(gate) = gate else {
            return Err(ProviderError::NoDataFound);
        };
        let _ = gate.release.await;

        *self.state.lock().unwrap().returned.entry(key).or_default() += 1;
        Ok(gate.value)
    }

    async fn most_recent(
        &self,
        _kind: MetricKind,
        _limit: usize,
    ) -> ProviderResult<Vec<HealthSample>> {
        Ok(Vec::new())
    }
}
