use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::warn;

static REPORT_METRICS_LOCK_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_report_metrics_lock_poison_once(operation: &'static str) {
    if REPORT_METRICS_LOCK_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "report metrics lock poisoned; recovered inner value");
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportMetricsSnapshot {
    pub dispatched: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl ReportMetricsSnapshot {
    pub fn in_flight(&self) -> u64 {
        self.dispatched
            .saturating_sub(self.succeeded)
            .saturating_sub(self.failed)
    }
}

/// Shared counters written by reporting tasks and read by anyone.
#[derive(Clone, Debug)]
pub struct ReportMetricsHandle {
    snapshot: Arc<RwLock<ReportMetricsSnapshot>>,
}

impl Default for ReportMetricsHandle {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(ReportMetricsSnapshot::default())),
        }
    }
}

impl ReportMetricsHandle {
    pub fn snapshot(&self) -> ReportMetricsSnapshot {
        match self.snapshot.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                warn_report_metrics_lock_poison_once("read");
                *poisoned.into_inner()
            }
        }
    }

    pub(crate) fn record_dispatched(&self) {
        self.update(|snapshot| snapshot.dispatched = snapshot.dispatched.saturating_add(1));
    }

    pub(crate) fn record_succeeded(&self) {
        self.update(|snapshot| snapshot.succeeded = snapshot.succeeded.saturating_add(1));
    }

    pub(crate) fn record_failed(&self) {
        self.update(|snapshot| snapshot.failed = snapshot.failed.saturating_add(1));
    }

    fn update(&self, apply: impl FnOnce(&mut ReportMetricsSnapshot)) {
        match self.snapshot.write() {
            Ok(mut guard) => apply(&mut guard),
            Err(poisoned) => {
                warn_report_metrics_lock_poison_once("write");
                let mut guard = poisoned.into_inner();
                apply(&mut guard);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::RwLock;
    use std::thread;

    use super::*;

    fn poison_lock(lock: &RwLock<ReportMetricsSnapshot>) {
        thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = lock.write().expect("write guard");
                    panic!("poison report metrics lock");
                })
                .join();
        });
    }

    #[test]
    fn counters_accumulate_and_in_flight_is_derived() {
        let handle = ReportMetricsHandle::default();
        handle.record_dispatched();
        handle.record_dispatched();
        handle.record_dispatched();
        handle.record_succeeded();
        handle.record_failed();

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.dispatched, 3);
        assert_eq!(snapshot.succeeded, 1);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.in_flight(), 1);
    }

    #[test]
    fn clones_share_counters() {
        let handle = ReportMetricsHandle::default();
        let task_side = handle.clone();
        task_side.record_dispatched();
        assert_eq!(handle.snapshot().dispatched, 1);
    }

    #[test]
    fn snapshot_recovers_after_poison_without_panic() {
        let handle = ReportMetricsHandle::default();
        poison_lock(handle.snapshot.as_ref());

        assert_eq!(handle.snapshot(), ReportMetricsSnapshot::default());
    }

    #[test]
    fn record_recovers_after_poison_without_panic() {
        let handle = ReportMetricsHandle::default();
        poison_lock(handle.snapshot.as_ref());

        handle.record_dispatched();
        handle.record_failed();

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.dispatched, 1);
        assert_eq!(snapshot.failed, 1);
    }
}
