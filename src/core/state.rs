//! State functions and their identities.
//!
//! A state is an async function that performs the side effects of one state
//! of an automaton and resolves to the next state to run. Every state function
//! carries an explicit name, which is its identity for statistics purposes.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by a state function, borrowing the context for `'a`.
pub type StateFuture<'a, T> = Pin<Box<dyn Future<Output = NextState<T>> + Send + 'a>>;

/// Result of running a state: the next state, or `None` for the terminal marker.
pub type NextState<T> = Option<StateFn<T>>;

type Action<T> = Arc<dyn for<'a> Fn(&'a mut T) -> StateFuture<'a, T> + Send + Sync>;

/// A named state function over a context of type `T`.
///
/// Cloning is cheap; clones share the same underlying action.
///
/// # Example
///
/// ```rust
/// use statefn::core::{NextState, StateFn, StateFuture};
///
/// struct Counter {
///     hits: u32,
/// }
///
/// fn counting(c: &mut Counter) -> StateFuture<'_, Counter> {
///     Box::pin(async move {
///         c.hits += 1;
///         if c.hits < 3 {
///             Some(StateFn::new("counting", counting))
///         } else {
///             None
///         }
///     })
/// }
///
/// let state = StateFn::new("counting", counting);
/// assert_eq!(state.name(), "counting");
/// ```
pub struct StateFn<T> {
    name: Cow<'static, str>,
    action: Action<T>,
}

impl<T> StateFn<T> {
    /// Register `action` under `name`.
    ///
    /// The name is the state's identity: statistics for every visit to a state
    /// with this name are aggregated together.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, action: F) -> Self
    where
        F: for<'a> Fn(&'a mut T) -> StateFuture<'a, T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
        }
    }

    /// The registered identity of this state.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the state against `context`.
    pub fn call<'a>(&self, context: &'a mut T) -> StateFuture<'a, T> {
        (self.action)(context)
    }

    /// Wrap this state in middleware, producing a new state named `name`.
    ///
    /// `wrapper` receives the inner state and the context and is responsible
    /// for calling the inner state.
    ///
    /// ```rust
    /// use statefn::core::{StateFn, StateFuture};
    ///
    /// fn done(_: &mut ()) -> StateFuture<'_, ()> {
    ///     Box::pin(async { None })
    /// }
    ///
    /// let wrapped = StateFn::new("done", done).wrap("logged", |inner, ctx| {
    ///     Box::pin(async move {
    ///         let next = inner.call(ctx).await;
    ///         next
    ///     })
    /// });
    /// assert_eq!(wrapped.name(), "logged");
    /// ```
    pub fn wrap<F>(self, name: impl Into<Cow<'static, str>>, wrapper: F) -> Self
    where
        T: 'static,
        F: for<'a> Fn(StateFn<T>, &'a mut T) -> StateFuture<'a, T> + Send + Sync + 'static,
    {
        let inner = self;
        Self::new(name, move |context| wrapper(inner.clone(), context))
    }
}

impl<T> Clone for StateFn<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

impl<T> fmt::Debug for StateFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateFn").field("name", &self.name).finish()
    }
}
