//! In-process event bus
//!
//! Delivers core notifications (`AccessDenied`, `LocationUpdated`,
//! `LocationFailed`) to subscribers without the producers knowing who listens.
//! Delivery is synchronous and follows registration order. Subscribers must
//! call [`EventBus::unsubscribe`] on teardown; a forgotten subscription keeps
//! its handler alive for the lifetime of the bus.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use domain::LocationFix;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Tag identifying a kind of [`CoreEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Location access was denied or restricted
    AccessDenied,
    /// A new fix was stored
    LocationUpdated,
    /// A positioning request failed
    LocationFailed,
}

impl EventKind {
    /// Stable event name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AccessDenied => "access-denied",
            Self::LocationUpdated => "location-updated",
            Self::LocationFailed => "location-failed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A notification published by the core
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// Location access reached a terminal refusal
    AccessDenied,
    /// The current fix was replaced
    LocationUpdated(LocationFix),
    /// A positioning request failed
    LocationFailed {
        /// Description of the positioning error
        description: String,
    },
}

impl CoreEvent {
    /// The tag of this event
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::AccessDenied => EventKind::AccessDenied,
            Self::LocationUpdated(_) => EventKind::LocationUpdated,
            Self::LocationFailed { .. } => EventKind::LocationFailed,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Handler = Arc<dyn Fn(&CoreEvent) + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

/// Typed publish/subscribe channel for core events
pub struct EventBus {
    next_id: AtomicU64,
    subscribers: RwLock<Vec<Subscriber>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.read().len())
            .finish_non_exhaustive()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create an empty bus
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Register `handler` for events of `kind`
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&CoreEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push(Subscriber {
            id,
            kind,
            handler: Arc::new(handler),
        });
        debug!(%id, %kind, "Subscribed");
        id
    }

    /// Register a channel that receives every event of `kind`
    ///
    /// Convenient for async consumers. Events published after the receiver is
    /// dropped are discarded; unsubscribe with the returned id.
    pub fn subscribe_channel(
        &self,
        kind: EventKind,
    ) -> (SubscriptionId, mpsc::UnboundedReceiver<CoreEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.subscribe(kind, move |event| {
            let _ = tx.send(event.clone());
        });
        (id, rx)
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        let removed = subscribers.len() != before;
        debug!(%id, removed, "Unsubscribed");
        removed
    }

    /// Deliver `event` to every handler registered for its kind
    ///
    /// Handlers run on the caller's task in registration order. Returns how
    /// many handlers were invoked. Handlers may subscribe or unsubscribe
    /// while being invoked; such changes apply to the next publish.
    pub fn publish(&self, event: &CoreEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<Handler> = self
            .subscribers
            .read()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| Arc::clone(&s.handler))
            .collect();

        trace!(%kind, count = handlers.len(), "Publishing event");
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Number of handlers registered for `kind`
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers
            .read()
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }
}
