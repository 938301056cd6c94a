use serde::Serialize;

use super::Projection;
use crate::events::{
    Event, EventLog, PreparationAction, SpellPreparationChanged, SpellbookAction, SpellbookChanged,
};
use crate::reduction::{MembershipCount, MembershipSet, MembershipVote, Reduction};
use crate::{ClassId, SpellId};

/// Spells currently recorded in the spellbook, in the order first learned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spellbook(MembershipSet<SpellId>);

impl Spellbook {
    pub fn contains(&self, spell: &SpellId) -> bool {
        self.0.contains(spell)
    }

    pub fn spells(&self) -> impl Iterator<Item = &SpellId> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Projection<SpellbookChanged> for Spellbook {
    fn project(log: &EventLog<SpellbookChanged>) -> Self {
        let counting = MembershipCount::new(
            |e: &Event<SpellbookChanged>| e.payload.spell_id.clone(),
            |e: &Event<SpellbookChanged>| match e.payload.action {
                SpellbookAction::Learn => MembershipVote::add(),
                SpellbookAction::Forget => MembershipVote::remove(),
            },
        );
        Self(counting.reduce(log))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedSpell {
    pub spell_id: SpellId,
    /// The latest event for this class and spell was always-prepared.
    pub always_prepared: bool,
}

/// Prepared spells keyed on class and spell together.
///
/// The same spell prepared for two classes is two independent entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedSpells(MembershipSet<(ClassId, SpellId)>);

impl PreparedSpells {
    /// Prepared entries for one class, in membership order.
    pub fn for_class(&self, class: &ClassId) -> Vec<PreparedSpell> {
        self.0
            .iter()
            .filter(|((c, _), _)| c == class)
            .map(|((_, spell), membership)| PreparedSpell {
                spell_id: spell.clone(),
                always_prepared: membership.sticky,
            })
            .collect()
    }

    pub fn is_prepared(&self, class: &ClassId, spell: &SpellId) -> bool {
        self.0.contains(&(class.clone(), spell.clone()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Projection<SpellPreparationChanged> for PreparedSpells {
    fn project(log: &EventLog<SpellPreparationChanged>) -> Self {
        let counting = MembershipCount::new(
            |e: &Event<SpellPreparationChanged>| {
                (e.payload.class.clone(), e.payload.spell_id.clone())
            },
            |e: &Event<SpellPreparationChanged>| {
                let vote = match e.payload.action {
                    PreparationAction::Prepare => MembershipVote::add(),
                    PreparationAction::Unprepare => MembershipVote::remove(),
                };
                vote.sticky(e.payload.always_prepared)
            },
        );
        Self(counting.reduce(log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::{ev, log};

    fn spell(id: &str) -> SpellId {
        SpellId::new(id).unwrap()
    }

    fn class(id: &str) -> ClassId {
        ClassId::new(id).unwrap()
    }

    fn book(id: &str, action: SpellbookAction) -> SpellbookChanged {
        SpellbookChanged {
            spell_id: spell(id),
            action,
        }
    }

    fn prep(class_id: &str, id: &str, action: PreparationAction, always: bool) -> SpellPreparationChanged {
        SpellPreparationChanged {
            class: class(class_id),
            spell_id: spell(id),
            action,
            always_prepared: always,
        }
    }

    #[test]
    fn learn_twice_forget_once_stays_known() {
        use SpellbookAction::*;
        let known = Spellbook::project(&log(vec![
            ev(1, book("mage-armor", Learn)),
            ev(2, book("mage-armor", Learn)),
            ev(3, book("mage-armor", Forget)),
        ]));
        assert!(known.contains(&spell("mage-armor")));

        let forgotten = Spellbook::project(&log(vec![
            ev(1, book("mage-armor", Learn)),
            ev(2, book("mage-armor", Forget)),
            ev(3, book("mage-armor", Forget)),
        ]));
        assert!(!forgotten.contains(&spell("mage-armor")));
        assert!(forgotten.is_empty());
    }

    #[test]
    fn preparation_is_isolated_per_class() {
        use PreparationAction::*;
        let prepared = PreparedSpells::project(&log(vec![
            ev(1, prep("wizard", "fireball", Prepare, false)),
            ev(2, prep("sorcerer", "fireball", Prepare, false)),
            ev(3, prep("sorcerer", "fireball", Unprepare, false)),
        ]));
        assert!(prepared.is_prepared(&class("wizard"), &spell("fireball")));
        assert!(!prepared.is_prepared(&class("sorcerer"), &spell("fireball")));
        assert!(prepared.for_class(&class("sorcerer")).is_empty());
    }

    #[test]
    fn always_prepared_survives_unprepare_count() {
        use PreparationAction::*;
        let prepared = PreparedSpells::project(&log(vec![
            ev(1, prep("cleric", "bless", Unprepare, false)),
            ev(2, prep("cleric", "bless", Unprepare, false)),
            ev(3, prep("cleric", "bless", Prepare, true)),
            ev(4, prep("cleric", "cure-wounds", Prepare, false)),
        ]));
        assert_eq!(
            prepared.for_class(&class("cleric")),
            vec![
                PreparedSpell {
                    spell_id: spell("bless"),
                    always_prepared: true
                },
                PreparedSpell {
                    spell_id: spell("cure-wounds"),
                    always_prepared: false
                },
            ]
        );
    }
}
