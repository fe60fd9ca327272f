//! Globals request state and the pending-request future.
//!
//! The console protocol has no request ids: a `globals` reply is recognized
//! purely by its `_G` prefix, so at most one *kind* of request can be
//! correlated, and it is tracked as a single-slot waiter on the connection's
//! internal globals signal. [`GlobalsRequest`] is that waiter made explicit:
//! a cancellable future whose `Drop` removes its subscription.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::protocol::LuaValue;
use crate::signal::{Signal, SubscriptionId};

// ============================================================================
// GlobalsState
// ============================================================================

/// Lifecycle of the connection's globals slot.
///
/// Replaces the reference sentinel scheme (one field holding "unset", the
/// string `"REFRESHING"`, or a decoded value) with a tagged state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GlobalsState {
    /// No globals request has been issued yet.
    #[default]
    Unset,
    /// A request is outstanding; no matching reply has arrived.
    ///
    /// With no timeout in the protocol, the state stays `Pending`
    /// indefinitely if no `_G`-prefixed payload ever arrives.
    Pending,
    /// The most recently decoded globals dump.
    Ready(LuaValue),
}

impl GlobalsState {
    /// Returns `true` before any request has been issued.
    #[inline]
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns `true` while a request is outstanding.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` once a dump has been decoded.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns the decoded value, if ready.
    #[must_use]
    pub fn value(&self) -> Option<&LuaValue> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

// ============================================================================
// GlobalsRequest
// ============================================================================

/// A pending `globals` request.
///
/// Resolves with the decoded dump when the next `_G`-prefixed payload
/// arrives, or with [`Error::ConnectionClosed`] if the connection shuts down
/// first. Dropping the request cancels it and removes its waiter from the
/// globals signal; the connection's [`GlobalsState`] then stays `Pending`.
#[derive(Debug)]
pub struct GlobalsRequest {
    rx: oneshot::Receiver<Result<LuaValue>>,
    signal: Arc<Mutex<Signal<String>>>,
    subscription: Option<SubscriptionId>,
}

impl GlobalsRequest {
    pub(crate) fn new(
        rx: oneshot::Receiver<Result<LuaValue>>,
        signal: Arc<Mutex<Signal<String>>>,
        subscription: Option<SubscriptionId>,
    ) -> Self {
        Self {
            rx,
            signal,
            subscription,
        }
    }
}

impl Future for GlobalsRequest {
    type Output = Result<LuaValue>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(result)) => {
                // The once-waiter removed itself when it fired.
                this.subscription = None;
                Poll::Ready(result)
            }
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::ConnectionClosed)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for GlobalsRequest {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.signal.lock().unsubscribe(id);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
