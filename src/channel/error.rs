//! Channel error types.

use thiserror::Error;

/// Errors that can occur when sending on a [`Sender`](super::Sender)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The channel was closed before the send started
    #[error("Send on a closed channel")]
    Closed,

    /// The receiving side was dropped before taking the value
    #[error("Receiver dropped before the value was taken")]
    Disconnected,
}
