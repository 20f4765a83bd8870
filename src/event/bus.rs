use log::debug;
use std::collections::VecDeque;

use crate::event::{EventHandler, SceneEvent};

/// Token proving ownership of the bus's only subscription.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    _private: (),
}

/// Queue of scene events with a single subscriber.
///
/// Events are queued while the scene is being mutated and handed to the
/// subscriber later through [`EventBus::dispatch`], so handlers never run
/// while the scene is borrowed. Nothing is queued without a subscriber and
/// nothing is delivered once the bus is closed.
pub struct EventBus {
    queue: VecDeque<SceneEvent>,
    subscribed: bool,
    closed: bool,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("queued", &self.queue.len())
            .field("subscribed", &self.subscribed)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            subscribed: false,
            closed: false,
        }
    }

    /// Creates a bus whose subscription is already taken by the caller
    pub fn with_subscriber() -> (Self, Subscription) {
        let bus = Self {
            subscribed: true,
            ..Self::new()
        };
        (bus, Subscription { _private: () })
    }

    /// Take the subscription. Returns `None` if it is already taken or the bus is closed.
    pub fn subscribe(&mut self) -> Option<Subscription> {
        if self.subscribed || self.closed {
            return None;
        }
        self.subscribed = true;
        Some(Subscription { _private: () })
    }

    /// Queue an event for the subscriber
    pub fn emit(&mut self, event: SceneEvent) {
        if self.closed || !self.subscribed {
            return;
        }
        self.queue.push_back(event);
    }

    /// Deliver every queued event, in emission order
    pub fn dispatch(&mut self, _subscription: &Subscription, handler: &mut dyn EventHandler) {
        while let Some(event) = self.queue.pop_front() {
            handler.handle_event(&event);
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop queued events and stop accepting new ones
    pub fn close(&mut self) {
        if !self.queue.is_empty() {
            debug!("Dropping {} undelivered scene events on close", self.queue.len());
        }
        self.queue.clear();
        self.closed = true;
        self.subscribed = false;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
