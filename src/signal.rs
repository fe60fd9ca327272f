//! Synchronous one-to-many notification primitive.
//!
//! [`Signal`] is the fan-out mechanism the [`Connection`](crate::Connection)
//! uses internally to multiplex "globals dump arrived" notifications, and to
//! hold the caller's `on_data`/`on_connect`/`on_close` registrations.
//!
//! # Design
//!
//! Subscribers live in an ordered sequence; each subscription gets a stable
//! [`SubscriptionId`] handle and removal is by handle, never by closure
//! identity. [`Signal::subscribe_once`] registers a subscriber that is
//! removed from the sequence *before* its single invocation, which is what
//! a pending globals request uses to guarantee it cannot fire twice.
//!
//! # Dispatch
//!
//! `emit` invokes every currently subscribed handler exactly once, in
//! subscription order, synchronously, before returning. There is no handler
//! isolation: a panicking handler propagates to the caller of `emit`.
//! Handlers must not call back into the same `Signal` (the console holds it
//! behind a non-reentrant mutex).

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// SubscriptionId
// ============================================================================

/// Stable handle for one subscription on a [`Signal`].
///
/// Handles are unique per signal for the lifetime of that signal and remain
/// valid until the subscription is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

// ============================================================================
// Signal
// ============================================================================

/// Handler callback type.
type Handler<T> = Box<dyn FnMut(&T) + Send>;

struct Entry<T> {
    id: SubscriptionId,
    once: bool,
    handler: Handler<T>,
}

/// Ordered synchronous pub/sub for a single payload type.
pub struct Signal<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.entries.len())
            .finish()
    }
}

impl<T> Signal<T> {
    /// Creates an empty signal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Appends `handler` to the subscriber sequence.
    ///
    /// Duplicate registrations are permitted; each gets its own handle.
    pub fn subscribe(&mut self, handler: impl FnMut(&T) + Send + 'static) -> SubscriptionId {
        self.push(Box::new(handler), false)
    }

    /// Appends a handler that fires at most once.
    ///
    /// The entry is removed from the sequence before the handler runs, so
    /// re-entrant emissions cannot invoke it a second time.
    pub fn subscribe_once(&mut self, handler: impl FnMut(&T) + Send + 'static) -> SubscriptionId {
        self.push(Box::new(handler), true)
    }

    /// Removes the subscription with handle `id`.
    ///
    /// Returns `false` if no such subscription exists (already fired,
    /// already removed, or never issued by this signal).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Invokes every currently subscribed handler with `data`.
    ///
    /// Handlers run in subscription order, synchronously, before `emit`
    /// returns. Once-handlers are consumed by this call.
    pub fn emit(&mut self, data: &T) {
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].once {
                let mut entry = self.entries.remove(i);
                (entry.handler)(data);
            } else {
                (self.entries[i].handler)(data);
                i += 1;
            }
        }
    }

    /// Removes every subscription.
    ///
    /// Previously issued handles become invalid; handle values are not
    /// reused afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of current subscriptions.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no subscriptions exist.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, handler: Handler<T>, once: bool) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, once, handler });
        id
    }
}

// ============================================================================
// Tests
// ============================================================================
