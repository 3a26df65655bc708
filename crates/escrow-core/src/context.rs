//! Per-call execution context

use escrow_store::KvStore;
use escrow_types::Event;

/// State handle and event log of one call
///
/// The store is whatever transaction the host opened for the call; nothing
/// written through it is visible outside until the host commits.
pub struct Context<'a> {
    store: &'a mut dyn KvStore,
    events: Vec<Event>,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a mut dyn KvStore) -> Self {
        Self {
            store,
            events: Vec::new(),
        }
    }

    pub fn store(&self) -> &dyn KvStore {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut dyn KvStore {
        &mut *self.store
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn extend_events(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
