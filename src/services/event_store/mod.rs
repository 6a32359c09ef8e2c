//! Ordered collection of committed timeline events.

use crate::models::event::{Event, EventId};

#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<Event>,
    next_id: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.get(id).is_some()
    }

    fn allocate_id(&mut self) -> EventId {
        let id = EventId::new(format!("evt-{}", self.next_id.max(1)));
        self.next_id = self.next_id.max(1) + 1;
        id
    }

    /// Commit `event` with its interval normalized.
    ///
    /// Temporary ids are replaced by a permanent one; the stored copy is
    /// returned.
    pub fn insert(&mut self, mut event: Event) -> Event {
        if event.is_temporary() {
            event.id = self.allocate_id();
        }
        event.normalize();

        let mut events = self.events.clone();
        match events.iter_mut().find(|existing| existing.id == event.id) {
            Some(existing) => *existing = event.clone(),
            None => events.push(event.clone()),
        }
        self.events = events;
        log::info!("Committed event {} ({})", event.id, event.title);
        event
    }

    /// Replace the stored event with the same id. Returns false when absent.
    pub fn update(&mut self, event: &Event) -> bool {
        let Some(index) = self.events.iter().position(|existing| existing.id == event.id) else {
            return false;
        };
        let mut updated = event.clone();
        updated.normalize();

        let mut events = self.events.clone();
        events[index] = updated;
        self.events = events;
        true
    }

    pub fn remove(&mut self, id: &EventId) -> Option<Event> {
        let index = self.events.iter().position(|event| &event.id == id)?;
        let mut events = self.events.clone();
        let removed = events.remove(index);
        self.events = events;
        log::info!("Deleted event {}", removed.id);
        Some(removed)
    }
}
