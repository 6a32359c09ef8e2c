//! Event interaction state machine.
//!
//! Turns raw pointer and key input into create/move drags on the day x hour
//! grid:
//!
//! ```text
//! Idle --press on empty grid--> Pending --moved > 5px--> Dragging(Create) --release--> Idle
//! Idle --press on event block-----------------------> Dragging(Move)   --release--> Idle
//! ```
//!
//! The machine also owns the Active Event: the single event being created,
//! dragged or edited, which is not necessarily in the [`EventStore`] yet.

use chrono::{Duration, NaiveDateTime};
use egui::Pos2;

use crate::models::event::{Event, EventId};
use crate::services::event_store::EventStore;
use crate::services::geometry::{block_at, EventBlock, GridGeometry};

/// Pointer travel needed before a press on empty grid becomes a create-drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Create,
    Move,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub mode: DragMode,
    pub event_id: EventId,
    /// Move mode: snapped pointer time minus the event start at grab time
    pub offset: Option<Duration>,
    /// Move mode: `end - start`, held for the whole drag
    pub duration: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InteractionState {
    Idle,
    Pending { press: Pos2 },
    Dragging(DragSession),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Where a pointer-down or key event landed, for the click-away rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    EventBlock,
    EditPanel,
    Elsewhere,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionKey {
    Delete,
    Backspace,
    Escape,
    Other,
}

/// What a pointer release did.
#[derive(Clone, Debug, PartialEq)]
pub enum ReleaseOutcome {
    /// No drag was in progress
    Idle,
    /// Zero-length create-drag, nothing kept
    Discarded,
    /// New event waiting in the edit panel under its temporary id
    Created(Event),
    Moved(Event),
}

#[derive(Debug)]
pub struct EventInteraction {
    state: InteractionState,
    active: Option<Event>,
    next_temp_id: u64,
}

impl Default for EventInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl EventInteraction {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
            active: None,
            next_temp_id: 1,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn active(&self) -> Option<&Event> {
        self.active.as_ref()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        match &self.state {
            InteractionState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    /// Press on the grid element. `blocks` are the event blocks as painted.
    pub fn pointer_down(
        &mut self,
        pos: Pos2,
        button: PointerButton,
        geometry: &GridGeometry<'_>,
        blocks: &[EventBlock],
        store: &EventStore,
    ) {
        let hit = block_at(blocks, geometry, pos).map(|block| block.event_id.clone());
        let target = if hit.is_some() {
            PointerTarget::EventBlock
        } else {
            PointerTarget::Elsewhere
        };
        self.on_global_pointer_down(target);

        if button != PointerButton::Primary || self.is_dragging() {
            return;
        }

        match hit {
            Some(event_id) => self.begin_move(&event_id, pos, geometry, store),
            None => {
                if geometry.column_at(pos).is_some() {
                    self.state = InteractionState::Pending { press: pos };
                }
            }
        }
    }

    fn begin_move(
        &mut self,
        event_id: &EventId,
        pos: Pos2,
        geometry: &GridGeometry<'_>,
        store: &EventStore,
    ) {
        let event = match self.active.as_ref().filter(|active| &active.id == event_id) {
            Some(active) => active.clone(),
            None => match store.get(event_id) {
                Some(stored) => stored.clone(),
                None => return,
            },
        };
        let Some(grabbed_at) = geometry.date_time_at(pos) else {
            return;
        };

        let (start, end) = event.normalized();
        self.state = InteractionState::Dragging(DragSession {
            mode: DragMode::Move,
            event_id: event.id.clone(),
            offset: Some(grabbed_at - start),
            duration: end - start,
        });
        log::debug!("Move drag started for {}", event.id);
        self.active = Some(event);
    }

    pub fn pointer_move(&mut self, pos: Pos2, geometry: &GridGeometry<'_>) {
        match &self.state {
            InteractionState::Idle => {}
            InteractionState::Pending { press } => {
                let press = *press;
                if press.distance(pos) <= DRAG_THRESHOLD {
                    return;
                }
                let Some(origin) = geometry.date_time_at(press) else {
                    return;
                };
                self.begin_create(origin);
            }
            InteractionState::Dragging(session) => {
                let Some(pointer_time) = geometry.date_time_at(pos) else {
                    return;
                };
                let session = session.clone();
                if let Some(active) = self.active.as_mut() {
                    match session.mode {
                        DragMode::Create => active.end = pointer_time,
                        DragMode::Move => {
                            let offset = session.offset.unwrap_or_else(Duration::zero);
                            active.start = pointer_time - offset;
                            active.end = active.start + session.duration;
                        }
                    }
                }
            }
        }
    }

    fn begin_create(&mut self, origin: NaiveDateTime) {
        let id = EventId::temporary(self.next_temp_id);
        self.next_temp_id += 1;

        self.state = InteractionState::Dragging(DragSession {
            mode: DragMode::Create,
            event_id: id.clone(),
            offset: None,
            duration: Duration::zero(),
        });
        self.active = Some(Event::new(id, origin, origin));
        log::debug!("Create drag started at {}", origin);
    }

    /// Pointer release anywhere.
    pub fn pointer_up(&mut self, store: &mut EventStore) -> ReleaseOutcome {
        let state = std::mem::replace(&mut self.state, InteractionState::Idle);
        let InteractionState::Dragging(session) = state else {
            return ReleaseOutcome::Idle;
        };

        match session.mode {
            DragMode::Create => {
                let Some(active) = self.active.as_mut() else {
                    return ReleaseOutcome::Idle;
                };
                if active.start == active.end {
                    self.active = None;
                    return ReleaseOutcome::Discarded;
                }
                active.normalize();
                ReleaseOutcome::Created(active.clone())
            }
            DragMode::Move => {
                let Some(active) = self.active.as_ref() else {
                    return ReleaseOutcome::Idle;
                };
                if store.update(active) {
                    log::info!("Moved event {} to {}", active.id, active.start);
                }
                ReleaseOutcome::Moved(active.clone())
            }
        }
    }

    /// Click-away rule: a blank, never-saved Active Event is dropped when the
    /// user presses somewhere other than an event block or the edit panel.
    pub fn on_global_pointer_down(&mut self, target: PointerTarget) {
        if target != PointerTarget::Elsewhere || self.is_dragging() {
            return;
        }
        if self
            .active
            .as_ref()
            .is_some_and(|active| active.is_temporary() && active.is_blank())
        {
            log::debug!("Discarding untitled pending event");
            self.active = None;
        }
    }

    /// Edit form input. The Active Event carries the typed fields so the
    /// click-away rule sees them before Save.
    pub fn edit_fields(&mut self, title: &str, description: &str) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.title != title {
            active.title = title.to_string();
        }
        if active.description != description {
            active.description = description.to_string();
        }
    }

    /// Key press. `target` is where keyboard focus was.
    pub fn on_key(&mut self, key: InteractionKey, target: PointerTarget, store: &mut EventStore) {
        self.on_global_pointer_down(target);
        if target == PointerTarget::EditPanel && key != InteractionKey::Escape {
            return;
        }

        match key {
            InteractionKey::Delete | InteractionKey::Backspace => {
                if self.active.as_ref().is_some_and(|active| !active.is_temporary()) {
                    self.delete_active(store);
                }
            }
            InteractionKey::Escape => self.cancel(store),
            InteractionKey::Other => {}
        }
    }

    /// Edit form Save: apply the form fields and commit. Returns the stored copy.
    pub fn save(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        store: &mut EventStore,
    ) -> Option<Event> {
        if self.is_dragging() {
            return None;
        }
        let mut event = self.active.take()?;
        event.title = title.into();
        event.description = description.into();
        Some(store.insert(event))
    }

    /// Edit form Cancel.
    ///
    /// A pending event is discarded. An edited existing event is reverted to
    /// its stored copy; cancelling an unmodified one closes the selection.
    pub fn cancel(&mut self, store: &EventStore) {
        if self.is_dragging() {
            return;
        }
        let Some(active) = self.active.as_ref() else {
            return;
        };
        if active.is_temporary() {
            self.active = None;
            return;
        }
        match store.get(&active.id) {
            Some(stored) if stored != active => self.active = Some(stored.clone()),
            _ => self.active = None,
        }
    }

    /// Delete the Active Event. A temporary event only clears the selection.
    pub fn delete_active(&mut self, store: &mut EventStore) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(active) = self.active.take() else {
            return false;
        };
        if active.is_temporary() {
            return false;
        }
        store.remove(&active.id).is_some()
    }
}
