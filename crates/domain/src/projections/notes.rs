use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Projection;
use crate::events::{EventLog, NoteWritten};
use crate::EventId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: EventId,
    pub written_at: DateTime<Utc>,
    pub title: Option<String>,
    pub body: String,
}

/// Journal notes, oldest first. Notes are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Notes(Vec<Note>);

impl Notes {
    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Projection<NoteWritten> for Notes {
    fn project(log: &EventLog<NoteWritten>) -> Self {
        Self(
            log.iter()
                .map(|e| Note {
                    id: e.id(),
                    written_at: e.created_at(),
                    title: e.payload.title.clone(),
                    body: e.payload.body.clone(),
                })
                .collect(),
        )
    }
}
