//! Summary of a finished run.

use crate::core::StateStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

/// Final statistics of one [`Machine::run`](super::Machine::run).
///
/// Returned to the caller when the automaton reaches its terminal state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Identifier of the run, also recorded on its tracing span
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the terminal state was reached
    pub finished_at: DateTime<Utc>,
    /// Total number of state invocations
    pub invocations: u64,
    /// Final record for every state entered, by name
    pub states: BTreeMap<String, StateStats>,
}

impl RunReport {
    /// Final statistics for the state named `name`, if it was entered.
    pub fn state(&self, name: &str) -> Option<&StateStats> {
        self.states.get(name)
    }

    /// Number of times `name` was entered; zero if never.
    pub fn entry_count(&self, name: &str) -> u64 {
        self.state(name).map_or(0, |s| s.entry_count)
    }

    /// Wall-clock duration of the run.
    ///
    /// Returns `None` if the system clock went backwards during the run.
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at
            .signed_duration_since(self.started_at)
            .to_std()
            .ok()
    }

    /// Serialize the report as JSON, e.g. for a dashboard.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
