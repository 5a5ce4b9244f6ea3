//! Unbuffered handoff channels with explicit close.
//!
//! A send completes only once a receiver has taken the value, so a slow
//! consumer applies backpressure to the sender. The channel can be closed from
//! any clone of the [`Sender`]; pending offers are withdrawn and the receiver
//! observes the end of the stream.
//!
//! # Example
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use statefn::channel;
//!
//! let (tx, mut rx) = channel::channel::<&str>();
//!
//! let producer = tokio::spawn(async move {
//!     tx.send("coin").await.unwrap();
//!     tx.close();
//! });
//!
//! assert_eq!(rx.recv().await, Some("coin"));
//! assert_eq!(rx.recv().await, None);
//! producer.await.unwrap();
//! # }
//! ```

mod error;

pub use error::ChannelError;

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{oneshot, Notify};

/// A value offered by a pending send, acknowledged once a receiver takes it.
struct Offer<V> {
    id: u64,
    value: V,
    ack: oneshot::Sender<()>,
}

struct State<V> {
    offers: VecDeque<Offer<V>>,
    next_id: u64,
    senders: usize,
    closed: bool,
    receiver_alive: bool,
}

struct Shared<V> {
    state: Mutex<State<V>>,
    offered: Notify,
}

/// Create a new unbuffered channel.
pub fn channel<V>() -> (Sender<V>, Receiver<V>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            offers: VecDeque::new(),
            next_id: 0,
            senders: 1,
            closed: false,
            receiver_alive: true,
        }),
        offered: Notify::new(),
    });
    (
        Sender {
            shared: Arc::clone(&shared),
        },
        Receiver { shared },
    )
}

/// Sending half of a handoff channel.
///
/// Clones share the same open/closed flag: closing one closes all of them.
pub struct Sender<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Sender<V> {
    /// Send `value`, waiting until a receiver has taken it.
    ///
    /// Cancel safe: if the future is dropped before a receiver took the value,
    /// the offer is withdrawn and the value is never delivered. Closing the
    /// channel withdraws every pending offer, failing those sends with
    /// [`ChannelError::Closed`].
    pub async fn send(&self, value: V) -> Result<(), ChannelError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        let id = {
            let mut state = self.shared.state.lock();
            if state.closed {
                return Err(ChannelError::Closed);
            }
            if !state.receiver_alive {
                return Err(ChannelError::Disconnected);
            }
            let id = state.next_id;
            state.next_id += 1;
            state.offers.push_back(Offer {
                id,
                value,
                ack: ack_tx,
            });
            id
        };
        let _pending = PendingOffer {
            shared: &self.shared,
            id,
        };
        self.shared.offered.notify_one();

        match ack_rx.await {
            Ok(()) => Ok(()),
            Err(_) if self.shared.state.lock().closed => Err(ChannelError::Closed),
            Err(_) => Err(ChannelError::Disconnected),
        }
    }

    /// Close the channel for every clone of this sender.
    ///
    /// Offers not yet taken are discarded. Returns `true` if this call closed
    /// the channel and `false` if it was already closed.
    pub fn close(&self) -> bool {
        let withdrawn = {
            let mut state = self.shared.state.lock();
            if state.closed {
                return false;
            }
            state.closed = true;
            std::mem::take(&mut state.offers)
        };
        drop(withdrawn);
        self.shared.offered.notify_one();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }
}

impl<V> Clone for Sender<V> {
    fn clone(&self) -> Self {
        self.shared.state.lock().senders += 1;
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V> Drop for Sender<V> {
    fn drop(&mut self) {
        let last = {
            let mut state = self.shared.state.lock();
            state.senders -= 1;
            state.senders == 0
        };
        if last {
            self.shared.offered.notify_one();
        }
    }
}

impl<V> fmt::Debug for Sender<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Withdraws an offer that was not taken when its send is dropped.
struct PendingOffer<'a, V> {
    shared: &'a Shared<V>,
    id: u64,
}

impl<V> Drop for PendingOffer<'_, V> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        let position = state.offers.iter().position(|offer| offer.id == self.id);
        let withdrawn = position.and_then(|index| state.offers.remove(index));
        drop(state);
        drop(withdrawn);
    }
}

/// Receiving half of a handoff channel.
pub struct Receiver<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Receiver<V> {
    /// Take the next value, releasing the sender waiting on it.
    ///
    /// Returns `None` once the channel is closed (or every sender is dropped)
    /// and no offer is pending. Cancel safe: if the future is dropped before
    /// completing, no value is lost.
    pub async fn recv(&mut self) -> Option<V> {
        loop {
            let offered = self.shared.offered.notified();
            {
                let mut state = self.shared.state.lock();
                if let Some(offer) = state.offers.pop_front() {
                    drop(state);
                    // The sender may have been dropped since; the value was still taken.
                    let _ = offer.ack.send(());
                    return Some(offer.value);
                }
                if state.closed || state.senders == 0 {
                    return None;
                }
            }
            offered.await;
        }
    }
}

impl<V> Drop for Receiver<V> {
    fn drop(&mut self) {
        let withdrawn = {
            let mut state = self.shared.state.lock();
            state.receiver_alive = false;
            std::mem::take(&mut state.offers)
        };
        drop(withdrawn);
    }
}

impl<V> fmt::Debug for Receiver<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver").finish_non_exhaustive()
    }
}
