use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use serde::Serialize;

/// Container for tracking service statistics
#[derive(Debug)]
pub struct ServiceStats {
    /// Total number of rows predicted
    pub prediction_count: AtomicUsize,
    /// Number of failed prediction requests
    pub prediction_errors: AtomicUsize,
    /// Number of distance lookups proxied
    pub distance_count: AtomicUsize,
    /// Number of failed distance lookups
    pub distance_errors: AtomicUsize,
    /// Latest prediction latency in microseconds
    pub latest_prediction_latency_us: AtomicU64,
    /// Creation timestamp
    pub created_at: SystemTime,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub prediction_count: usize,
    pub prediction_errors: usize,
    pub distance_count: usize,
    pub distance_errors: usize,
    pub latest_prediction_latency_us: u64,
    pub uptime_secs: u64,
}

impl ServiceStats {
    pub fn new() -> Self {
        Self {
            prediction_count: AtomicUsize::new(0),
            prediction_errors: AtomicUsize::new(0),
            distance_count: AtomicUsize::new(0),
            distance_errors: AtomicUsize::new(0),
            latest_prediction_latency_us: AtomicU64::new(0),
            created_at: SystemTime::now(),
        }
    }

    /// Record a successful prediction request
    pub fn record_prediction(&self, rows: usize, elapsed: Duration) {
        self.prediction_count.fetch_add(rows, Ordering::SeqCst);
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.latest_prediction_latency_us.store(micros, Ordering::SeqCst);
    }

    pub fn record_prediction_error(&self) {
        self.prediction_errors.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_distance(&self, ok: bool) {
        self.distance_count.fetch_add(1, Ordering::SeqCst);
        if !ok {
            self.distance_errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.created_at)
            .unwrap_or_default()
            .as_secs()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            prediction_count: self.prediction_count.load(Ordering::Relaxed),
            prediction_errors: self.prediction_errors.load(Ordering::Relaxed),
            distance_count: self.distance_count.load(Ordering::Relaxed),
            distance_errors: self.distance_errors.load(Ordering::Relaxed),
            latest_prediction_latency_us: self.latest_prediction_latency_us.load(Ordering::Relaxed),
            uptime_secs: self.uptime_secs(),
        }
    }
}

impl Default for ServiceStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_stats_basics() {
        let stats = ServiceStats::new();
        assert_eq!(stats.snapshot().prediction_count, 0);

        stats.record_prediction(3, Duration::from_micros(250));
        stats.record_prediction_error();
        stats.record_distance(true);
        stats.record_distance(false);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.prediction_count, 3);
        assert_eq!(snapshot.prediction_errors, 1);
        assert_eq!(snapshot.latest_prediction_latency_us, 250);
        assert_eq!(snapshot.distance_count, 2);
        assert_eq!(snapshot.distance_errors, 1);
    }
}
