//! Append-only character events
//!
//! Every attribute domain of a character is persisted as its own log of
//! events. An [`EventLog`] holds one domain's events in their total order:
//! creation time first, event id as the tie-break. Logs are sorted once on
//! construction, so reducers can walk them front to back without caring how
//! the caller fetched them.
//!
//! ## Payload Types
//!
//! The `character_events` submodule holds the typed payload of each domain.
//! Payloads are only ever built from validated values; raw storage rows are
//! converted at the fetch boundary.

pub mod character_events;

pub use character_events::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CharacterId, EventId};

/// Fields every event carries regardless of domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    pub id: EventId,
    pub character_id: CharacterId,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl EventMeta {
    pub fn new(id: EventId, character_id: CharacterId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            character_id,
            created_at,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// One recorded event: shared metadata plus the domain payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event<T> {
    #[serde(flatten)]
    pub meta: EventMeta,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Event<T> {
    pub fn new(meta: EventMeta, payload: T) -> Self {
        Self { meta, payload }
    }

    pub fn id(&self) -> EventId {
        self.meta.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.meta.created_at
    }

    /// Position of this event in its domain's total order.
    pub fn order_key(&self) -> (DateTime<Utc>, EventId) {
        (self.meta.created_at, self.meta.id)
    }
}

/// One domain's events in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Event<T>>", into = "Vec<Event<T>>")]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de>"
))]
pub struct EventLog<T> {
    events: Vec<Event<T>>,
}

impl<T> EventLog<T> {
    /// Build a log from events in any order.
    pub fn new(mut events: Vec<Event<T>>) -> Self {
        events.sort_by_key(Event::order_key);
        Self { events }
    }

    pub fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// The chronological event list, verbatim.
    pub fn history(&self) -> &[Event<T>] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event<T>> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<Event<T>> {
        self.events
    }
}

impl<T: Clone> EventLog<T> {
    /// The first `count` events: the log as it stood after them.
    pub fn prefix(&self, count: usize) -> Self {
        Self {
            events: self.events.iter().take(count).cloned().collect(),
        }
    }

    /// Every event created at or before `at`.
    pub fn as_of(&self, at: DateTime<Utc>) -> Self {
        Self {
            events: self
                .events
                .iter()
                .take_while(|event| event.created_at() <= at)
                .cloned()
                .collect(),
        }
    }
}

impl<T> Default for EventLog<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<Event<T>>> for EventLog<T> {
    fn from(events: Vec<Event<T>>) -> Self {
        Self::new(events)
    }
}

impl<T> From<EventLog<T>> for Vec<Event<T>> {
    fn from(log: EventLog<T>) -> Self {
        log.events
    }
}

impl<T> FromIterator<Event<T>> for EventLog<T> {
    fn from_iter<I: IntoIterator<Item = Event<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a EventLog<T> {
    type Item = &'a Event<T>;
    type IntoIter = std::slice::Iter<'a, Event<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
