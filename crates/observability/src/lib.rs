use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Process-wide booking desk counters.
#[derive(Debug, Default)]
pub struct DeskMetrics {
    sessions_started: AtomicU64,
    transitions_total: AtomicU64,
    validation_failures_total: AtomicU64,
    selection_errors_total: AtomicU64,
    dispatches_total: AtomicU64,
    timed_bookings: AtomicU64,
    total_booking_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub sessions_started: u64,
    pub transitions_total: u64,
    pub validation_failures_total: u64,
    pub selection_errors_total: u64,
    pub dispatches_total: u64,
    pub avg_booking_millis: f64,
}

impl DeskMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_session(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_transition(&self) {
        self.transitions_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_validation_failures(&self, fields: usize) {
        self.validation_failures_total
            .fetch_add(fields as u64, Ordering::Relaxed);
    }

    pub fn inc_selection_error(&self) {
        self.selection_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_dispatch(&self) {
        self.dispatches_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Time from session start to dispatch.
    pub fn observe_booking_time(&self, elapsed: Duration) {
        self.timed_bookings.fetch_add(1, Ordering::Relaxed);
        self.total_booking_millis
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let timed = self.timed_bookings.load(Ordering::Relaxed);
        let millis = self.total_booking_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            transitions_total: self.transitions_total.load(Ordering::Relaxed),
            validation_failures_total: self.validation_failures_total.load(Ordering::Relaxed),
            selection_errors_total: self.selection_errors_total.load(Ordering::Relaxed),
            dispatches_total: self.dispatches_total.load(Ordering::Relaxed),
            avg_booking_millis: if timed == 0 {
                0.0
            } else {
                millis as f64 / timed as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,charter_desk=info,charter_catalog=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_averages_over_timed_bookings() {
        let metrics = DeskMetrics::default();
        assert_eq!(metrics.snapshot().avg_booking_millis, 0.0);

        metrics.inc_session();
        metrics.add_validation_failures(3);
        metrics.inc_dispatch();
        metrics.inc_dispatch();
        metrics.inc_dispatch();
        metrics.observe_booking_time(Duration::from_millis(100));
        metrics.observe_booking_time(Duration::from_millis(300));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.sessions_started, 1);
        assert_eq!(snapshot.validation_failures_total, 3);
        assert_eq!(snapshot.dispatches_total, 3);
        assert_eq!(snapshot.avg_booking_millis, 200.0);
        assert!(serde_json::to_value(&snapshot).is_ok());
    }
}
