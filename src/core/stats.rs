//! Per-state statistics accumulated during a run.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// Statistics accumulated about one state, keyed by its name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateStats {
    /// Registered name of the state function
    pub name: String,
    /// Number of times the state was entered
    pub entry_count: u64,
    /// Time from the start of the run until the state was first entered
    pub time_to_first_entry: Duration,
    /// Cumulative time spent inside the state function
    pub total_time_spent: Duration,
}

/// Aggregates [`StateStats`] by state name over a single run.
#[derive(Debug)]
pub struct StatsAggregator {
    started: Instant,
    records: HashMap<String, StateStats>,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAggregator {
    /// Start aggregating; elapsed times are measured from now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Start aggregating with `started` as the beginning of the run.
    pub fn starting_at(started: Instant) -> Self {
        Self {
            started,
            records: HashMap::with_capacity(10),
        }
    }

    /// Record an entry into `name` and return the pre-invocation snapshot.
    ///
    /// The first entry also fixes `time_to_first_entry`.
    pub fn enter(&mut self, name: &str) -> StateStats {
        let started = self.started;
        let record = self.record_mut(name);

        record.entry_count += 1;
        if record.entry_count == 1 {
            record.time_to_first_entry = started.elapsed();
        }
        record.clone()
    }

    /// Add `elapsed` to the time spent in `name` and return the post-invocation snapshot.
    ///
    /// Returns `None`, recording nothing, if `name` was never entered.
    pub fn record_time(&mut self, name: &str, elapsed: Duration) -> Option<StateStats> {
        let record = self.records.get_mut(name)?;
        record.total_time_spent += elapsed;
        Some(record.clone())
    }

    fn record_mut(&mut self, name: &str) -> &mut StateStats {
        self.records
            .entry(name.to_owned())
            .or_insert_with(|| StateStats {
                name: name.to_owned(),
                ..StateStats::default()
            })
    }

    pub fn get(&self, name: &str) -> Option<&StateStats> {
        self.records.get(name)
    }

    /// Number of distinct states seen so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Final records ordered by state name.
    pub fn into_states(self) -> BTreeMap<String, StateStats> {
        self.records.into_iter().collect()
    }
}
