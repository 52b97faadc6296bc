//! Listener registries
//!
//! Handlers are stored behind `Arc` so a dispatcher can snapshot the set
//! before invoking it. Handlers may then add or remove listeners while the
//! dispatch is running without invalidating the iteration.

use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned when a listener is registered
    pub struct ListenerId;
}

/// A keyed set of handlers of type `F` (usually a `dyn Fn(..)`).
pub struct Listeners<F: ?Sized> {
    handlers: SlotMap<ListenerId, Arc<F>>,
}

impl<F: ?Sized> Listeners<F> {
    pub fn new() -> Self {
        Self {
            handlers: SlotMap::with_key(),
        }
    }

    /// Register a handler
    pub fn add(&mut self, handler: Arc<F>) -> ListenerId {
        self.handlers.insert(handler)
    }

    /// Remove a handler; returns false if it was not registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.handlers.remove(id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.handlers.contains_key(id)
    }

    /// Clone out the current handlers for dispatch
    pub fn snapshot(&self) -> Vec<(ListenerId, Arc<F>)> {
        self.handlers
            .iter()
            .map(|(id, handler)| (id, Arc::clone(handler)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_survives_removal_during_dispatch() {
        let mut listeners: Listeners<dyn Fn() -> u32 + Send + Sync> = Listeners::new();
        let first = listeners.add(Arc::new(|| 1u32));
        listeners.add(Arc::new(|| 10u32));

        let snapshot = listeners.snapshot();
        assert!(listeners.remove(first));

        let total: u32 = snapshot.iter().map(|(_, handler)| handler()).sum();
        assert_eq!(total, 11);
        assert_eq!(listeners.len(), 1);
        assert!(!listeners.contains(first));
    }

    #[test]
    fn remove_unknown_is_false() {
        let mut listeners: Listeners<dyn Fn() + Send + Sync> = Listeners::new();
        let id = listeners.add(Arc::new(|| {}));
        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        assert!(listeners.is_empty());
    }
}
