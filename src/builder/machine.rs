//! Builder for configuring machines.

use crate::core::StateFn;
use crate::machine::{transform, Machine, Transformer};
use std::marker::PhantomData;
use std::sync::Arc;

/// Builder for constructing machines with a fluent API.
///
/// Transformers stack: each one added wraps the states produced by those
/// added before it.
pub struct MachineBuilder<T: Send + 'static, Out> {
    transformer: Option<Transformer<T>>,
    traced: bool,
    _phantom: PhantomData<fn() -> Out>,
}

impl<T: Send + 'static, Out> MachineBuilder<T, Out> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            transformer: None,
            traced: false,
            _phantom: PhantomData,
        }
    }

    /// Add a transformer around the ones already registered.
    pub fn transformer<F>(mut self, transformer: F) -> Self
    where
        F: Fn(StateFn<T>) -> StateFn<T> + Send + Sync + 'static,
    {
        let added: Transformer<T> = Arc::new(transformer);
        self.transformer = Some(match self.transformer.take() {
            Some(existing) => transform::compose(added, existing),
            None => added,
        });
        self
    }

    /// Log every state entry and exit at `DEBUG` level.
    ///
    /// Tracing is applied outermost, after all other transformers.
    pub fn traced(mut self, enabled: bool) -> Self {
        self.traced = enabled;
        self
    }

    /// Build the machine.
    pub fn build(self) -> Machine<T, Out> {
        let base = self.transformer;
        let transformer = match (base, self.traced) {
            (Some(base), true) => transform::compose(transform::traced(), base),
            (Some(base), false) => base,
            (None, true) => transform::traced(),
            (None, false) => return Machine::new(),
        };

        let mut machine = Machine::new();
        machine.set_transformer(transformer);
        machine
    }
}

impl<T: Send + 'static, Out> Default for MachineBuilder<T, Out> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateFuture;

    #[derive(Default)]
    struct Ctx {
        log: Vec<String>,
    }

    fn finish(ctx: &mut Ctx) -> StateFuture<'_, Ctx> {
        Box::pin(async move {
            ctx.log.push("finish".to_string());
            None
        })
    }

    fn tag(label: &'static str) -> impl Fn(StateFn<Ctx>) -> StateFn<Ctx> + Send + Sync {
        move |state: StateFn<Ctx>| {
            let name = state.name().to_owned();
            state.wrap(name, move |inner, ctx| {
                Box::pin(async move {
                    ctx.log.push(label.to_string());
                    inner.call(ctx).await
                })
            })
        }
    }

    #[tokio::test]
    async fn empty_builder_runs_states_unchanged() {
        let machine = MachineBuilder::<Ctx, ()>::new().build();

        let mut ctx = Ctx::default();
        machine
            .run(StateFn::new("finish", finish), &mut ctx, None, None)
            .await;

        assert_eq!(ctx.log, vec!["finish"]);
    }

    #[tokio::test]
    async fn later_transformers_wrap_earlier_ones() {
        let machine = MachineBuilder::<Ctx, ()>::new()
            .transformer(tag("first"))
            .transformer(tag("second"))
            .traced(true)
            .build();

        let mut ctx = Ctx::default();
        let report = machine
            .run(StateFn::new("finish", finish), &mut ctx, None, None)
            .await;

        assert_eq!(ctx.log, vec!["second", "first", "finish"]);
        assert_eq!(report.entry_count("finish"), 1);
    }

    #[tokio::test]
    async fn traced_only_keeps_behavior() {
        let machine = MachineBuilder::<Ctx, ()>::default().traced(true).build();

        let mut ctx = Ctx::default();
        let report = machine
            .run(StateFn::new("finish", finish), &mut ctx, None, None)
            .await;

        assert_eq!(ctx.log, vec!["finish"]);
        assert_eq!(report.invocations, 1);
    }
}
