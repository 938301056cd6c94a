use serde::Serialize;
use std::collections::BTreeMap;

use super::Projection;
use crate::events::{ClassLevelGained, Event, EventLog};
use crate::reduction::{LatestWins, Reduction};
use crate::ClassId;

/// Current progress in one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProgress {
    pub level: u8,
    pub subclass: Option<String>,
    /// Recorded hit die roll per class level, for levels up to `level`.
    pub rolls: BTreeMap<u8, u8>,
}

impl ClassProgress {
    /// Whether the current subclass matches `required`, ignoring case and
    /// treating `-`, `_` and spaces alike.
    pub fn has_subclass(&self, required: &str) -> bool {
        self.subclass
            .as_deref()
            .is_some_and(|subclass| normalize_subclass(subclass) == normalize_subclass(required))
    }
}

fn normalize_subclass(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['-', '_'], " ")
}

/// Class levels: the latest level-up per class wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLevels {
    classes: BTreeMap<ClassId, ClassProgress>,
    /// Class of the chronologically first level-up.
    starting_class: Option<ClassId>,
}

impl ClassLevels {
    pub fn get(&self, class: &ClassId) -> Option<&ClassProgress> {
        self.classes.get(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClassId, &ClassProgress)> {
        self.classes.iter()
    }

    pub fn starting_class(&self) -> Option<&ClassId> {
        self.starting_class.as_ref()
    }

    /// Sum of levels across classes.
    pub fn total_level(&self) -> u8 {
        let total: u32 = self.classes.values().map(|p| u32::from(p.level)).sum();
        total.min(u32::from(u8::MAX)) as u8
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Projection<ClassLevelGained> for ClassLevels {
    fn project(log: &EventLog<ClassLevelGained>) -> Self {
        let current = LatestWins::new(
            |e: &Event<ClassLevelGained>| e.payload.class.clone(),
            |e: &Event<ClassLevelGained>| (e.payload.level, e.payload.subclass.clone()),
        )
        .reduce(log);
        let rolls = LatestWins::new(
            |e: &Event<ClassLevelGained>| (e.payload.class.clone(), e.payload.level),
            |e: &Event<ClassLevelGained>| e.payload.hit_die_roll,
        )
        .reduce(log);

        let classes = current
            .into_iter()
            .map(|(class, (level, subclass))| {
                let class_rolls = rolls
                    .iter()
                    .filter(|((c, l), _)| *c == class && *l <= level)
                    .filter_map(|((_, l), roll)| roll.map(|r| (*l, r)))
                    .collect();
                let progress = ClassProgress {
                    level,
                    subclass,
                    rolls: class_rolls,
                };
                (class, progress)
            })
            .collect();

        Self {
            classes,
            starting_class: log.iter().next().map(|e| e.payload.class.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::{ev, log};

    fn gained(class: &str, level: u8, subclass: Option<&str>, roll: Option<u8>) -> ClassLevelGained {
        ClassLevelGained {
            class: ClassId::new(class).unwrap(),
            level,
            subclass: subclass.map(str::to_string),
            hit_die_roll: roll,
        }
    }

    #[test]
    fn latest_level_per_class_and_total() {
        let levels = ClassLevels::project(&log(vec![
            ev(1, gained("fighter", 1, None, None)),
            ev(2, gained("fighter", 2, None, Some(7))),
            ev(3, gained("wizard", 1, None, None)),
            ev(4, gained("fighter", 3, Some("Eldritch Knight"), Some(4))),
        ]));
        let fighter = levels.get(&ClassId::new("fighter").unwrap()).unwrap();
        assert_eq!(fighter.level, 3);
        assert!(fighter.has_subclass("eldritch knight"));
        assert_eq!(fighter.rolls.get(&2), Some(&7));
        assert_eq!(fighter.rolls.get(&3), Some(&4));
        assert_eq!(levels.total_level(), 4);
        assert_eq!(levels.starting_class().map(ClassId::as_str), Some("fighter"));
    }

    #[test]
    fn subclass_match_ignores_separators() {
        for recorded in ["Eldritch_Knight", "eldritch-knight", " Eldritch Knight "] {
            let levels = ClassLevels::project(&log(vec![ev(1, gained("fighter", 3, Some(recorded), None))]));
            let fighter = levels.get(&ClassId::new("fighter").unwrap()).unwrap();
            assert!(fighter.has_subclass("eldritch knight"), "{recorded}");
            assert!(fighter.has_subclass("Eldritch-Knight"), "{recorded}");
            assert!(!fighter.has_subclass("arcane trickster"), "{recorded}");
        }
    }

    #[test]
    fn latest_entry_is_taken_literally() {
        // No decrement mechanism: a later lower level simply becomes current.
        let levels = ClassLevels::project(&log(vec![
            ev(1, gained("cleric", 3, Some("life"), Some(5))),
            ev(2, gained("cleric", 2, None, None)),
        ]));
        let cleric = levels.get(&ClassId::new("cleric").unwrap()).unwrap();
        assert_eq!(cleric.level, 2);
        assert_eq!(cleric.subclass, None);
        assert!(cleric.rolls.is_empty());
    }

    #[test]
    fn no_levels_recorded() {
        let levels = ClassLevels::project(&log(vec![]));
        assert!(levels.is_empty());
        assert_eq!(levels.total_level(), 0);
        assert!(levels.starting_class().is_none());
    }
}
