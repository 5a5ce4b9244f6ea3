//! Transformers: middleware applied to each state right before it runs.
//!
//! A transformer receives the state about to be invoked and returns the state
//! that is actually invoked. It is the place for cross-cutting concerns such
//! as logging, metrics or fault injection, without touching state bodies.
//! Statistics are always keyed by the state's name *before* transformation.

use crate::core::StateFn;
use std::sync::Arc;
use tracing::debug;

/// A state transformer.
pub type Transformer<T> = Arc<dyn Fn(StateFn<T>) -> StateFn<T> + Send + Sync>;

/// Transformer returning every state unchanged.
pub fn identity<T: 'static>() -> Transformer<T> {
    Arc::new(|state: StateFn<T>| state)
}

/// Chain two transformers: `inner` is applied first, then `outer`.
pub fn compose<T: 'static>(outer: Transformer<T>, inner: Transformer<T>) -> Transformer<T> {
    Arc::new(move |state: StateFn<T>| outer(inner(state)))
}

/// Transformer logging entry into and exit from every state at `DEBUG` level.
///
/// The wrapped state keeps its original name.
pub fn traced<T: Send + 'static>() -> Transformer<T> {
    Arc::new(|state: StateFn<T>| {
        let name = state.name().to_owned();
        state.wrap(name, |inner, context| {
            Box::pin(async move {
                debug!(state = inner.name(), "entering state");
                let next = inner.call(context).await;
                match &next {
                    Some(next_state) => {
                        debug!(state = inner.name(), next = next_state.name(), "leaving state")
                    }
                    None => debug!(state = inner.name(), "reached terminal state"),
                }
                next
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Ctx {
        log: Vec<String>,
    }

    fn stop(ctx: &mut Ctx) -> StateFuture<'_, Ctx> {
        Box::pin(async move {
            ctx.log.push("stop".to_string());
            None
        })
    }

    fn tagging(tag: &'static str) -> Transformer<Ctx> {
        Arc::new(move |state: StateFn<Ctx>| {
            let name = format!("{tag}({})", state.name());
            state.wrap(name, move |inner, ctx| {
                Box::pin(async move {
                    ctx.log.push(tag.to_string());
                    inner.call(ctx).await
                })
            })
        })
    }

    #[tokio::test]
    async fn identity_returns_same_state() {
        let state = identity::<Ctx>()(StateFn::new("stop", stop));
        assert_eq!(state.name(), "stop");

        let mut ctx = Ctx::default();
        assert!(state.call(&mut ctx).await.is_none());
        assert_eq!(ctx.log, vec!["stop"]);
    }

    #[tokio::test]
    async fn compose_applies_inner_first() {
        let transformer = compose(tagging("outer"), tagging("inner"));
        let state = transformer(StateFn::new("stop", stop));

        assert_eq!(state.name(), "outer(inner(stop))");

        let mut ctx = Ctx::default();
        state.call(&mut ctx).await;
        assert_eq!(ctx.log, vec!["outer", "inner", "stop"]);
    }

    #[tokio::test]
    async fn traced_keeps_name_and_behavior() {
        let state = traced::<Ctx>()(StateFn::new("stop", stop));
        assert_eq!(state.name(), "stop");

        let mut ctx = Ctx::default();
        assert!(state.call(&mut ctx).await.is_none());
        assert_eq!(ctx.log, vec!["stop"]);
    }

    #[test]
    fn transformer_runs_once_per_application() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let transformer: Transformer<Ctx> = Arc::new(move |state: StateFn<Ctx>| {
            counter.fetch_add(1, Ordering::SeqCst);
            state
        });

        transformer(StateFn::new("stop", stop));
        transformer(StateFn::new("stop", stop));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
