//! Bounded, time-indexed operation metrics (C3).
//!
//! A single in-memory store, capped at [`defaults::METRICS_MAX_RECORDS`]
//! entries with oldest-first eviction, matching the bounded-capacity
//! pattern this workspace already uses for its event channels. There is
//! no external metrics backend wired in; degrading to in-memory-only is
//! logged once per process, not on every record.

use chrono::{DateTime, Utc};
use selscore_core::config::{defaults, env};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// One recorded operation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub operation: String,
    pub success: bool,
    pub latency_ms: f64,
    /// Present only when `success` is `false`.
    pub error_category: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Aggregate view over a window of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub avg_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub success_rate: f64,
}

/// Anything that can accept a finished operation's outcome. Implemented by
/// [`InMemoryMetrics`]; a future external backend (StatsD, OTLP) would
/// implement the same trait so callers never depend on storage details.
pub trait MetricsBackend: Send + Sync {
    fn record(&self, record: MetricRecord);
    fn recent(&self, limit: usize) -> Vec<MetricRecord>;
    fn summary(&self) -> MetricsSummary;
}

/// A bounded ring of the most recent records, evicting the oldest entry
/// once `max_records` is exceeded.
pub struct InMemoryMetrics {
    max_records: usize,
    records: Mutex<VecDeque<MetricRecord>>,
    warned_degraded: AtomicBool,
}

impl InMemoryMetrics {
    pub fn new(max_records: usize) -> Self {
        Self {
            max_records,
            records: Mutex::new(VecDeque::with_capacity(max_records.min(1024))),
            warned_degraded: AtomicBool::new(false),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(defaults::METRICS_MAX_RECORDS)
    }

    pub fn from_env() -> Self {
        Self::new(env::metrics_max_records())
    }

    /// Log, at most once, that this process has no external metrics
    /// backend and is degrading to the in-memory store.
    pub fn warn_degraded_once(&self) {
        if !self.warned_degraded.swap(true, Ordering::SeqCst) {
            tracing::warn!(
                max_records = self.max_records,
                "no external metrics backend configured, degrading to in-memory store"
            );
        }
    }
}

impl MetricsBackend for InMemoryMetrics {
    fn record(&self, record: MetricRecord) {
        let mut records = self.records.lock().unwrap();
        if records.len() >= self.max_records {
            records.pop_front();
        }
        records.push_back(record);
    }

    fn recent(&self, limit: usize) -> Vec<MetricRecord> {
        let records = self.records.lock().unwrap();
        records.iter().rev().take(limit).cloned().collect()
    }

    fn summary(&self) -> MetricsSummary {
        let records = self.records.lock().unwrap();
        let total = records.len();
        if total == 0 {
            return MetricsSummary {
                total: 0,
                successful: 0,
                failed: 0,
                avg_latency_ms: 0.0,
                p95_latency_ms: 0.0,
                success_rate: 0.0,
            };
        }

        let successful = records.iter().filter(|r| r.success).count();
        let failed = total - successful;
        let avg_latency_ms =
            records.iter().map(|r| r.latency_ms).sum::<f64>() / total as f64;

        let mut latencies: Vec<f64> = records.iter().map(|r| r.latency_ms).collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let p95_index = ((latencies.len() as f64) * 0.95).ceil() as usize;
        let p95_latency_ms = latencies[p95_index.saturating_sub(1).min(latencies.len() - 1)];

        MetricsSummary {
            total,
            successful,
            failed,
            avg_latency_ms,
            p95_latency_ms,
            success_rate: successful as f64 / total as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(success: bool, latency_ms: f64) -> MetricRecord {
        MetricRecord {
            operation: "predict".to_string(),
            success,
            latency_ms,
            error_category: if success { None } else { Some("internal".to_string()) },
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn evicts_oldest_once_capacity_exceeded() {
        let store = InMemoryMetrics::new(3);
        for i in 0..5 {
            store.record(record(true, i as f64));
        }
        let recent = store.recent(10);
        assert_eq!(recent.len(), 3);
        // most recent first
        assert_eq!(recent[0].latency_ms, 4.0);
    }

    #[test]
    fn summary_computes_rates_and_p95() {
        let store = InMemoryMetrics::new(100);
        for _ in 0..9 {
            store.record(record(true, 10.0));
        }
        store.record(record(false, 1000.0));
        let summary = store.summary();
        assert_eq!(summary.total, 10);
        assert_eq!(summary.successful, 9);
        assert_eq!(summary.failed, 1);
        assert!((summary.success_rate - 0.9).abs() < 1e-9);
        assert_eq!(summary.p95_latency_ms, 1000.0);
    }

    #[test]
    fn empty_store_summary_is_all_zero() {
        let store = InMemoryMetrics::new(10);
        let summary = store.summary();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn warns_degraded_exactly_once() {
        let store = InMemoryMetrics::new(10);
        assert!(!store.warned_degraded.load(Ordering::SeqCst));
        store.warn_degraded_once();
        assert!(store.warned_degraded.load(Ordering::SeqCst));
    }
}
