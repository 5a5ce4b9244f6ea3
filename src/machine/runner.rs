//! Execution engine driving state functions to completion.

use crate::channel::Sender;
use crate::core::{StateFn, StateStats, StatsAggregator};
use crate::machine::report::RunReport;
use crate::machine::transform::{self, Transformer};
use chrono::Utc;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Runs a deterministic automaton expressed as chained [`StateFn`]s.
///
/// `T` is the context handed to every state, `Out` the type of events the
/// states emit on the output channel. The machine itself holds only the
/// optional transformer, so one machine can drive many runs.
///
/// `run` is usually launched as its own task:
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use statefn::channel::{channel, Sender};
/// use statefn::core::{StateFn, StateFuture};
/// use statefn::machine::Machine;
///
/// type Greeter = Sender<&'static str>;
///
/// fn greet(out: &mut Greeter) -> StateFuture<'_, Greeter> {
///     Box::pin(async move {
///         out.send("hello").await.ok();
///         None
///     })
/// }
///
/// let (tx, mut rx) = channel();
/// let machine = Machine::new();
/// let mut context = tx.clone();
/// let run = tokio::spawn(async move {
///     machine.run(StateFn::new("greet", greet), &mut context, Some(tx), None).await
/// });
///
/// assert_eq!(rx.recv().await, Some("hello"));
/// assert_eq!(rx.recv().await, None);
/// assert_eq!(run.await.unwrap().entry_count("greet"), 1);
/// # }
/// ```
pub struct Machine<T, Out> {
    transformer: Transformer<T>,
    _phantom: PhantomData<fn() -> Out>,
}

impl<T: Send + 'static, Out> Machine<T, Out> {
    /// Create a machine that invokes states unchanged.
    pub fn new() -> Self {
        Self {
            transformer: transform::identity(),
            _phantom: PhantomData,
        }
    }

    /// Create a machine applying `transformer` to every state before invoking it.
    pub fn with_transformer<F>(transformer: F) -> Self
    where
        F: Fn(StateFn<T>) -> StateFn<T> + Send + Sync + 'static,
    {
        Self {
            transformer: Arc::new(transformer),
            _phantom: PhantomData,
        }
    }

    /// Replace the transformer. Takes `&mut self`, so it cannot race a run.
    pub fn set_transformer(&mut self, transformer: Transformer<T>) {
        self.transformer = transformer;
    }

    /// Run the automaton from `start` until a state returns `None`.
    ///
    /// When `stats_out` is given, two snapshots are sent per invocation: one on
    /// entry and one after the state returns. Once the terminal state is
    /// reached, `stats_out` and then `output` are closed. A panicking state
    /// leaves both channels open.
    pub async fn run(
        &self,
        start: StateFn<T>,
        context: &mut T,
        output: Option<Sender<Out>>,
        stats_out: Option<Sender<StateStats>>,
    ) -> RunReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("machine_run", %run_id);
        self.drive(run_id, start, context, output, stats_out)
            .instrument(span)
            .await
    }

    async fn drive(
        &self,
        run_id: Uuid,
        start: StateFn<T>,
        context: &mut T,
        output: Option<Sender<Out>>,
        stats_out: Option<Sender<StateStats>>,
    ) -> RunReport {
        let started_at = Utc::now();
        let mut stats = StatsAggregator::new();
        let mut emitter = StatsEmitter::new(stats_out);
        let mut invocations = 0u64;

        info!(start = start.name(), "run started");

        let mut current = Some(start);
        while let Some(state) = current {
            let name = state.name().to_owned();

            emitter.emit(stats.enter(&name)).await;

            let invoked = (self.transformer)(state);
            let entered = Instant::now();
            let next = invoked.call(context).await;
            if let Some(snapshot) = stats.record_time(&name, entered.elapsed()) {
                emitter.emit(snapshot).await;
            }

            invocations += 1;
            debug!(
                state = %name,
                next = ?next.as_ref().map(StateFn::name),
                "state finished"
            );
            current = next;
        }

        emitter.close();
        if let Some(output) = &output {
            output.close();
        }

        info!(invocations, states = stats.len(), "run finished");

        RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            invocations,
            states: stats.into_states(),
        }
    }
}

impl<T: Send + 'static, Out> Default for Machine<T, Out> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends statistics snapshots, going quiet if the receiver disappears.
struct StatsEmitter {
    tx: Option<Sender<StateStats>>,
    active: bool,
}

impl StatsEmitter {
    fn new(tx: Option<Sender<StateStats>>) -> Self {
        let active = tx.is_some();
        Self { tx, active }
    }

    async fn emit(&mut self, snapshot: StateStats) {
        if !self.active {
            return;
        }
        if let Some(tx) = &self.tx {
            if let Err(err) = tx.send(snapshot).await {
                warn!(error = %err, "stats channel unavailable, no further snapshots will be sent");
                self.active = false;
            }
        }
    }

    fn close(&self) {
        if let Some(tx) = &self.tx {
            tx.close();
        }
    }
}
