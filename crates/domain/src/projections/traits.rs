use serde::Serialize;
use std::collections::BTreeMap;

use super::Projection;
use crate::events::{Event, EventLog, TraitKind, TraitRecorded};
use crate::reduction::{LatestWins, Reduction};

/// Latest personality trait, ideal, bond and flaw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Traits(BTreeMap<TraitKind, String>);

impl Traits {
    pub fn get(&self, kind: TraitKind) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Projection<TraitRecorded> for Traits {
    fn project(log: &EventLog<TraitRecorded>) -> Self {
        let latest = LatestWins::new(
            |e: &Event<TraitRecorded>| e.payload.kind,
            |e: &Event<TraitRecorded>| e.payload.text.clone(),
        );
        Self(latest.reduce(log))
    }
}
