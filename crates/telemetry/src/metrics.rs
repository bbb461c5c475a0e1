//! In-process metrics.
//!
//! Lock-free counters read by the health endpoint; nothing is exported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic event count.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Level that rises and falls, floored at zero.
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
    }

    /// Raises the gauge until the returned guard drops.
    pub fn track(&self) -> GaugeGuard<'_> {
        self.inc();
        GaugeGuard(self)
    }
}

/// Lowers its gauge on drop.
#[must_use]
#[derive(Debug)]
pub struct GaugeGuard<'a>(&'a Gauge);

impl Drop for GaugeGuard<'_> {
    fn drop(&mut self) {
        self.0.dec();
    }
}

/// Upper bounds (ms) of the latency buckets. Sheet calls are remote, so the
/// range runs to 30s; anything slower lands in the overflow bucket.
const LATENCY_BOUNDS_MS: [u64; 10] = [10, 25, 50, 100, 250, 500, 1000, 2500, 10000, 30000];

/// Latency distribution in milliseconds.
#[derive(Debug, Default)]
pub struct Histogram {
    /// One slot per bound plus overflow.
    buckets: [AtomicU64; LATENCY_BOUNDS_MS.len() + 1],
    sum: AtomicU64,
    count: AtomicU64,
    max: AtomicU64,
}

impl Histogram {
    pub fn observe(&self, ms: u64) {
        let slot = LATENCY_BOUNDS_MS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(LATENCY_BOUNDS_MS.len());
        self.buckets[slot].fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.max.fetch_max(ms, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn max(&self) -> u64 {
        self.max.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        match self.count() {
            0 => 0.0,
            n => self.sum.load(Ordering::Relaxed) as f64 / n as f64,
        }
    }

    /// Upper bound of the bucket holding quantile `q` (0.0..=1.0). Overflow
    /// reports the largest value seen.
    pub fn quantile(&self, q: f64) -> u64 {
        let total = self.count();
        if total == 0 {
            return 0;
        }
        let rank = ((total as f64) * q.clamp(0.0, 1.0)).ceil().max(1.0) as u64;
        let mut seen = 0;
        for (slot, bucket) in self.buckets.iter().enumerate() {
            seen += bucket.load(Ordering::Relaxed);
            if seen >= rank {
                return LATENCY_BOUNDS_MS.get(slot).copied().unwrap_or_else(|| self.max());
            }
        }
        self.max()
    }
}

/// Collected metrics for the gateway.
#[derive(Debug, Default)]
pub struct Metrics {
    // Action metrics
    pub actions_dispatched: Counter,
    pub actions_failed: Counter,
    pub unknown_actions: Counter,

    // Snapshot cache metrics
    pub cache_hits: Counter,
    pub cache_misses: Counter,

    // Store metrics
    pub store_reads: Counter,
    pub store_writes: Counter,
    pub store_errors: Counter,

    // Latency histograms
    pub action_latency_ms: Histogram,
    pub store_latency_ms: Histogram,

    // Gauges
    pub active_requests: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub actions_dispatched: u64,
    pub actions_failed: u64,
    pub unknown_actions: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub store_reads: u64,
    pub store_writes: u64,
    pub store_errors: u64,
    pub action_latency_mean_ms: f64,
    pub action_latency_p95_ms: u64,
    pub store_latency_mean_ms: f64,
    pub store_latency_p95_ms: u64,
    pub store_latency_max_ms: u64,
    pub active_requests: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let hits = self.cache_hits.get();
        let misses = self.cache_misses.get();
        let lookups = hits + misses;

        MetricsSnapshot {
            timestamp: Utc::now(),
            actions_dispatched: self.actions_dispatched.get(),
            actions_failed: self.actions_failed.get(),
            unknown_actions: self.unknown_actions.get(),
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
            store_reads: self.store_reads.get(),
            store_writes: self.store_writes.get(),
            store_errors: self.store_errors.get(),
            action_latency_mean_ms: self.action_latency_ms.mean(),
            action_latency_p95_ms: self.action_latency_ms.quantile(0.95),
            store_latency_mean_ms: self.store_latency_ms.mean(),
            store_latency_p95_ms: self.store_latency_ms.quantile(0.95),
            store_latency_max_ms: self.store_latency_ms.max(),
            active_requests: self.active_requests.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
