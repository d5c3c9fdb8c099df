mod http;
mod metrics;

use std::sync::{Arc, Mutex};

use crate::actor::ActorState;

pub use http::{parse_decision_response, DecisionResponse, HttpDecisionReporter, ReportError};
pub use metrics::{ReportMetricsHandle, ReportMetricsSnapshot};

/// Fire-and-forget sink for new actor states. Implementations must return
/// without waiting on the outcome and must never panic on failure.
pub trait DecisionReporter {
    fn report(&self, state: ActorState);
}

/// Keeps every reported state in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<ActorState>>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<ActorState> {
        match self.reports.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DecisionReporter for RecordingReporter {
    fn report(&self, state: ActorState) {
        match self.reports.lock() {
            Ok(mut guard) => guard.push(state),
            Err(poisoned) => poisoned.into_inner().push(state),
        }
    }
}
