use serde::Serialize;
use std::collections::BTreeMap;

use super::Projection;
use crate::events::{AbilityScoreSet, Event, EventLog};
use crate::reduction::{LatestWins, Reduction};
use crate::value_objects::{Ability, AbilityScore};

/// Score this code base assumes for an ability with no recorded events.
pub const DEFAULT_ABILITY_SCORE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityState {
    pub score: AbilityScore,
    pub proficient: bool,
}

/// Latest recorded score and save proficiency per ability.
///
/// Only abilities with at least one event are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AbilityScores(BTreeMap<Ability, AbilityState>);

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> Option<&AbilityState> {
        self.0.get(&ability)
    }

    /// The recorded score, or the default of 10.
    pub fn score_or_default(&self, ability: Ability) -> i32 {
        self.get(ability)
            .map(|state| state.score.value())
            .unwrap_or(DEFAULT_ABILITY_SCORE)
    }

    pub fn is_proficient(&self, ability: Ability) -> bool {
        self.get(ability).is_some_and(|state| state.proficient)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ability, &AbilityState)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Projection<AbilityScoreSet> for AbilityScores {
    fn project(log: &EventLog<AbilityScoreSet>) -> Self {
        let latest = LatestWins::new(
            |e: &Event<AbilityScoreSet>| e.payload.ability,
            |e: &Event<AbilityScoreSet>| AbilityState {
                score: e.payload.score,
                proficient: e.payload.proficient,
            },
        );
        Self(latest.reduce(log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::{ev, ev_at, log};

    fn set(ability: Ability, score: i64, proficient: bool) -> AbilityScoreSet {
        AbilityScoreSet {
            ability,
            score: AbilityScore::new(score).unwrap(),
            proficient,
        }
    }

    #[test]
    fn empty_history_yields_empty_map() {
        let scores = AbilityScores::project(&log(vec![]));
        assert!(scores.is_empty());
        assert_eq!(scores.score_or_default(Ability::Strength), 10);
        assert!(!scores.is_proficient(Ability::Strength));
    }

    #[test]
    fn later_event_determines_score_and_proficiency() {
        let scores = AbilityScores::project(&log(vec![
            ev_at(2, 20, set(Ability::Wisdom, 16, true)),
            ev_at(1, 10, set(Ability::Wisdom, 12, false)),
            ev(3, set(Ability::Dexterity, 14, false)),
        ]));
        let wisdom = scores.get(Ability::Wisdom).unwrap();
        assert_eq!(wisdom.score.value(), 16);
        assert!(wisdom.proficient);
        assert_eq!(scores.score_or_default(Ability::Dexterity), 14);
        assert_eq!(scores.len(), 2);
    }

    #[test]
    fn same_timestamp_resolves_by_event_id() {
        let scores = AbilityScores::project(&log(vec![
            ev_at(7, 5, set(Ability::Strength, 18, false)),
            ev_at(6, 5, set(Ability::Strength, 8, false)),
        ]));
        assert_eq!(scores.score_or_default(Ability::Strength), 18);
    }
}
