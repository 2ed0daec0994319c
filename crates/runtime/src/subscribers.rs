use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::renderer::{EventHandler, RendererEvent, SubscriptionId};

/// Registry of renderer event handlers.
///
/// Handlers may subscribe or unsubscribe (themselves included) while an
/// event is being dispatched; such changes take effect from the next event.
#[derive(Default)]
pub struct Subscribers {
    handlers: RefCell<Vec<(SubscriptionId, EventHandler)>>,
    /// Ids unsubscribed while a dispatch holds their handlers; emptied when
    /// the outermost dispatch returns.
    removed: RefCell<HashSet<SubscriptionId>>,
    dispatching: Cell<usize>,
    next: Cell<SubscriptionId>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: EventHandler) -> SubscriptionId {
        let id = self.next.get();
        self.next.set(id + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        if self.dispatching.get() > 0 {
            self.removed.borrow_mut().insert(id);
        }
        self.handlers.borrow_mut().retain(|(hid, _)| *hid != id);
    }

    pub fn dispatch(&self, event: &RendererEvent) {
        self.dispatching.set(self.dispatching.get() + 1);
        let mut running = std::mem::take(&mut *self.handlers.borrow_mut());
        for (id, handler) in running.iter_mut() {
            if self.removed.borrow().contains(id) {
                continue;
            }
            handler(event);
        }

        {
            let mut current = self.handlers.borrow_mut();
            let added = std::mem::take(&mut *current);
            let removed = self.removed.borrow();
            *current = running
                .into_iter()
                .chain(added)
                .filter(|(id, _)| !removed.contains(id))
                .collect();
        }

        let depth = self.dispatching.get() - 1;
        self.dispatching.set(depth);
        if depth == 0 {
            self.removed.borrow_mut().clear();
        }
    }

    /// Live subscriptions.
    pub fn len(&self) -> usize {
        let removed = self.removed.borrow();
        self.handlers
            .borrow()
            .iter()
            .filter(|(id, _)| !removed.contains(id))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers").field("live", &self.len()).finish()
    }
}
