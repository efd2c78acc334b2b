//! Scoped document-level listeners
//!
//! Key and pointer events that are not aimed at a particular widget are
//! dispatched through a `DocumentEvents` registry. A search box holds a
//! `Subscription` only while mounted; dropping it deregisters the listener,
//! so remounting never leaks handlers and several boxes can coexist.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKey {
    Escape,
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    Key(DocumentKey),
    /// Pointer pressed at a cell position
    PointerDown { x: u16, y: u16 },
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<u64, mpsc::UnboundedSender<DocumentEvent>>,
}

#[derive(Clone, Default)]
pub struct DocumentEvents {
    inner: Arc<Mutex<Registry>>,
}

impl DocumentEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(inner: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
        inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a listener; it stays registered until the subscription drops
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = Self::registry(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, tx);
        debug!(listener_id = id, "Document listener registered");

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
            rx,
        }
    }

    /// Deliver an event to every registered listener. Returns the number reached.
    pub fn dispatch(&self, event: DocumentEvent) -> usize {
        let mut registry = Self::registry(&self.inner);
        registry.listeners.retain(|_, tx| tx.send(event).is_ok());
        registry.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        Self::registry(&self.inner).listeners.len()
    }
}

pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
    rx: mpsc::UnboundedReceiver<DocumentEvent>,
}

impl Subscription {
    pub fn try_recv(&mut self) -> Option<DocumentEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            DocumentEvents::registry(&inner).listeners.remove(&self.id);
            debug!(listener_id = self.id, "Document listener released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_reaches_only_live_subscriptions() {
        let events = DocumentEvents::new();
        let mut first = events.subscribe();
        let second = events.subscribe();
        assert_eq!(events.listener_count(), 2);

        drop(second);
        assert_eq!(events.listener_count(), 1);

        let reached = events.dispatch(DocumentEvent::Key(DocumentKey::Escape));
        assert_eq!(reached, 1);
        assert_eq!(first.try_recv(), Some(DocumentEvent::Key(DocumentKey::Escape)));
        assert_eq!(first.try_recv(), None);
    }

    #[test]
    fn test_subscription_outliving_registry() {
        let events = DocumentEvents::new();
        let sub = events.subscribe();
        drop(events);
        drop(sub);
    }
}
