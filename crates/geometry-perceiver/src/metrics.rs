//! Telemetry helpers for the geometry engine.
//!
//! Lightweight counters + latency aggregates so the CLI can surface basic
//! metrics without an external metrics backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

static MEASURED_TOTAL: AtomicU64 = AtomicU64::new(0);
static MEASURE_LAT_NS: AtomicU64 = AtomicU64::new(0);
static MEASURE_LAT_SAMPLES: AtomicU64 = AtomicU64::new(0);

static SKIPPED_TOTAL: AtomicU64 = AtomicU64::new(0);
static FAILED_TOTAL: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricCounter {
    pub total: u64,
    pub avg_ms: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricSnapshot {
    pub measured: MetricCounter,
    pub skipped: u64,
    pub failed: u64,
}

pub fn record_measured(duration: Duration) {
    MEASURED_TOTAL.fetch_add(1, Ordering::Relaxed);
    record_latency(&MEASURE_LAT_NS, &MEASURE_LAT_SAMPLES, duration);
}

/// No element was supplied.
pub fn record_skipped() {
    SKIPPED_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub fn record_failed() {
    FAILED_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub fn snapshot() -> MetricSnapshot {
    MetricSnapshot {
        measured: make_counter(
            MEASURED_TOTAL.load(Ordering::Relaxed),
            MEASURE_LAT_NS.load(Ordering::Relaxed),
            MEASURE_LAT_SAMPLES.load(Ordering::Relaxed),
        ),
        skipped: SKIPPED_TOTAL.load(Ordering::Relaxed),
        failed: FAILED_TOTAL.load(Ordering::Relaxed),
    }
}

fn make_counter(total: u64, nanos: u64, samples: u64) -> MetricCounter {
    let avg_ms = if samples == 0 {
        0.0
    } else {
        (nanos as f64 / samples as f64) / 1_000_000.0
    };
    MetricCounter { total, avg_ms }
}

fn record_latency(total_ns: &AtomicU64, samples: &AtomicU64, duration: Duration) {
    let nanos = duration_to_nanos(duration);
    total_ns.fetch_add(nanos, Ordering::Relaxed);
    samples.fetch_add(1, Ordering::Relaxed);
}

fn duration_to_nanos(duration: Duration) -> u64 {
    let nanos = duration.as_nanos();
    if nanos > u64::MAX as u128 {
        u64::MAX
    } else {
        nanos as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_only_grow() {
        let before = snapshot();
        record_measured(Duration::from_micros(250));
        record_skipped();
        record_failed();
        let after = snapshot();
        assert!(after.measured.total > before.measured.total);
        assert!(after.skipped > before.skipped);
        assert!(after.failed > before.failed);
        assert!(after.measured.avg_ms >= 0.0);
    }

    #[test]
    fn average_of_no_samples_is_zero() {
        let counter = make_counter(0, 0, 0);
        assert_eq!(counter.avg_ms, 0.0);
        let counter = make_counter(2, 3_000_000, 2);
        assert!((counter.avg_ms - 1.5).abs() < f64::EPSILON);
    }
}
