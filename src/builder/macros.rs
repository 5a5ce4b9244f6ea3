//! Macros for ergonomic state registration.

/// Register a state function under its own identifier.
///
/// `state_fn!(locked)` expands to `StateFn::new("locked", locked)`, so the
/// state's identity always matches the function that implements it. A path
/// such as `states::locked` is registered under its last segment.
///
/// # Example
///
/// ```
/// use statefn::core::StateFuture;
/// use statefn::state_fn;
///
/// struct Door {
///     opened: bool,
/// }
///
/// fn closed(door: &mut Door) -> StateFuture<'_, Door> {
///     Box::pin(async move {
///         door.opened = true;
///         Some(state_fn!(open))
///     })
/// }
///
/// fn open(_door: &mut Door) -> StateFuture<'_, Door> {
///     Box::pin(async { None })
/// }
///
/// assert_eq!(state_fn!(closed).name(), "closed");
/// ```
#[macro_export]
macro_rules! state_fn {
    ($($segment:ident)::+) => {
        $crate::state_fn!(@last [$($segment)::+] $($segment)+)
    };
    (@last [$path:path] $last:ident) => {
        $crate::core::StateFn::new(::std::stringify!($last), $path)
    };
    (@last [$path:path] $head:ident $($rest:ident)+) => {
        $crate::state_fn!(@last [$path] $($rest)+)
    };
}

/// Like [`state_fn!`], wrapped in `Some` for returning from a state.
///
/// ```
/// use statefn::core::StateFuture;
/// use statefn::next_state;
///
/// fn spin(count: &mut u32) -> StateFuture<'_, u32> {
///     Box::pin(async move {
///         *count += 1;
///         if *count < 3 {
///             next_state!(spin)
///         } else {
///             None
///         }
///     })
/// }
/// ```
#[macro_export]
macro_rules! next_state {
    ($($segment:ident)::+) => {
        ::std::option::Option::Some($crate::state_fn!($($segment)::+))
    };
}
