//! Event handler registry.
//!
//! Handlers are called in registration order. Delivery iterates over a
//! snapshot of the registry, so a handler may unsubscribe itself or any other
//! handler mid-delivery through a cloned [`SubscriberRegistry`] without
//! changing who receives the event currently being delivered.

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::Event;

/// Identifies a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<RefCell<dyn FnMut(&Event)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler)>,
}

/// Shared, cloneable handle to the handler list.
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        let handler: Handler = Rc::new(RefCell::new(handler));
        let mut registry = self.inner.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.handlers.push((id, handler));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.inner.borrow_mut();
        let before = registry.handlers.len();
        registry.handlers.retain(|(existing, _)| *existing != id);
        registry.handlers.len() != before
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every handler registered at the time of the call.
    pub fn dispatch(&self, event: &Event) {
        let snapshot: Vec<Handler> = self
            .inner
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in snapshot {
            // A handler that is already running (re-entrant dispatch) is skipped
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (&mut *handler)(event);
            }
        }
    }
}

impl std::fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("handlers", &self.len())
            .finish()
    }
}
