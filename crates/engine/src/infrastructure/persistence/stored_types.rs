//! Raw persisted row shapes and their conversion into typed events.
//!
//! Rows hold primitive values exactly as stored. Converting a row checks
//! every enum, range and id so reducers only ever see valid payloads.

use chrono::{DateTime, Utc};
use hearthsheet_domain::events::{
    AbilityScoreSet, ClassLevelGained, CoinsChanged, HitDieAction, HitDieChanged,
    HitPointsChanged, ItemChargesChanged, ItemPossessionRecorded, NoteWritten, PreparationAction,
    SkillProficiencySet, SpellPreparationChanged, SpellbookAction, SpellbookChanged, TraitKind,
    TraitRecorded,
};
use hearthsheet_domain::{
    AbilityScore, BackgroundId, CharacterId, CharacterProfile, ClassId, CoinPurse, DieSize,
    DomainError, Event, EventId, EventMeta, ItemId, SpeciesId, SpellId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::infrastructure::ports::RepoError;

/// Highest class level the tables cover.
const MAX_CLASS_LEVEL: i64 = 20;

/// Largest face of the largest hit die (d12).
const MAX_HIT_DIE_ROLL: i64 = 12;

/// A raw row that converts into one domain's payload.
pub trait StoredPayload {
    type Payload;

    /// Domain name used in error messages and logs.
    const DOMAIN: &'static str;

    fn into_payload(self) -> Result<Self::Payload, DomainError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMeta {
    pub id: Uuid,
    pub character_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

/// One persisted event row: metadata plus domain columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent<R> {
    #[serde(flatten)]
    pub meta: StoredMeta,
    #[serde(flatten)]
    pub row: R,
}

impl<R: StoredPayload> StoredEvent<R> {
    pub fn belongs_to(&self, character_id: CharacterId) -> bool {
        self.meta.character_id == character_id.to_uuid()
    }

    /// Validate the row into a typed event.
    pub fn into_event(self) -> Result<Event<R::Payload>, RepoError> {
        let StoredEvent { meta, row } = self;
        let payload = row
            .into_payload()
            .map_err(|e| RepoError::malformed(R::DOMAIN, meta.id, e))?;
        let mut event_meta = EventMeta::new(
            EventId::from_uuid(meta.id),
            CharacterId::from_uuid(meta.character_id),
            meta.created_at,
        );
        if let Some(note) = meta.note {
            event_meta = event_meta.with_note(note);
        }
        Ok(Event::new(event_meta, payload))
    }
}

fn narrow<T: TryFrom<i64>>(field: &str, value: i64) -> Result<T, DomainError> {
    T::try_from(value)
        .map_err(|_| DomainError::validation(format!("{} out of range: {}", field, value)))
}

// =============================================================================
// Rows per domain
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAbilityRow {
    pub ability: String,
    pub score: i64,
    #[serde(default)]
    pub proficient: bool,
}

impl StoredPayload for StoredAbilityRow {
    type Payload = AbilityScoreSet;
    const DOMAIN: &'static str = "ability";

    fn into_payload(self) -> Result<AbilityScoreSet, DomainError> {
        Ok(AbilityScoreSet {
            ability: self.ability.parse()?,
            score: AbilityScore::new(self.score)?,
            proficient: self.proficient,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSkillRow {
    pub skill: String,
    pub proficiency_level: String,
}

impl StoredPayload for StoredSkillRow {
    type Payload = SkillProficiencySet;
    const DOMAIN: &'static str = "skill";

    fn into_payload(self) -> Result<SkillProficiencySet, DomainError> {
        Ok(SkillProficiencySet {
            skill: self.skill.parse()?,
            proficiency: self.proficiency_level.parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCoinRow {
    #[serde(default)]
    pub pp: i64,
    #[serde(default)]
    pub gp: i64,
    #[serde(default)]
    pub ep: i64,
    #[serde(default)]
    pub sp: i64,
    #[serde(default)]
    pub cp: i64,
}

impl StoredPayload for StoredCoinRow {
    type Payload = CoinsChanged;
    const DOMAIN: &'static str = "coin";

    fn into_payload(self) -> Result<CoinsChanged, DomainError> {
        Ok(CoinsChanged {
            delta: CoinPurse {
                pp: self.pp,
                gp: self.gp,
                ep: self.ep,
                sp: self.sp,
                cp: self.cp,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredHitPointRow {
    pub delta: i64,
}

impl StoredPayload for StoredHitPointRow {
    type Payload = HitPointsChanged;
    const DOMAIN: &'static str = "hit point";

    fn into_payload(self) -> Result<HitPointsChanged, DomainError> {
        Ok(HitPointsChanged {
            delta: narrow("Hit point delta", self.delta)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredHitDieRow {
    pub die_size: i64,
    pub action: String,
}

impl StoredPayload for StoredHitDieRow {
    type Payload = HitDieChanged;
    const DOMAIN: &'static str = "hit die";

    fn into_payload(self) -> Result<HitDieChanged, DomainError> {
        Ok(HitDieChanged {
            die: DieSize::new(self.die_size)?,
            action: self.action.parse::<HitDieAction>()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPossessionRow {
    pub item_id: String,
    #[serde(default)]
    pub worn: bool,
    #[serde(default)]
    pub wielded: bool,
    #[serde(default)]
    pub dropped_at: Option<DateTime<Utc>>,
}

impl StoredPayload for StoredPossessionRow {
    type Payload = ItemPossessionRecorded;
    const DOMAIN: &'static str = "item possession";

    fn into_payload(self) -> Result<ItemPossessionRecorded, DomainError> {
        Ok(ItemPossessionRecorded {
            item_id: ItemId::new(self.item_id)?,
            worn: self.worn,
            wielded: self.wielded,
            dropped_at: self.dropped_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredChargeRow {
    pub item_id: String,
    pub delta: i64,
}

impl StoredPayload for StoredChargeRow {
    type Payload = ItemChargesChanged;
    const DOMAIN: &'static str = "item charge";

    fn into_payload(self) -> Result<ItemChargesChanged, DomainError> {
        Ok(ItemChargesChanged {
            item_id: ItemId::new(self.item_id)?,
            delta: narrow("Charge delta", self.delta)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSpellbookRow {
    pub spell_id: String,
    pub action: String,
}

impl StoredPayload for StoredSpellbookRow {
    type Payload = SpellbookChanged;
    const DOMAIN: &'static str = "spellbook";

    fn into_payload(self) -> Result<SpellbookChanged, DomainError> {
        Ok(SpellbookChanged {
            spell_id: SpellId::new(self.spell_id)?,
            action: self.action.parse::<SpellbookAction>()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPreparedSpellRow {
    pub class: String,
    pub spell_id: String,
    pub action: String,
    #[serde(default)]
    pub always_prepared: bool,
}

impl StoredPayload for StoredPreparedSpellRow {
    type Payload = SpellPreparationChanged;
    const DOMAIN: &'static str = "prepared spell";

    fn into_payload(self) -> Result<SpellPreparationChanged, DomainError> {
        Ok(SpellPreparationChanged {
            class: ClassId::new(self.class)?,
            spell_id: SpellId::new(self.spell_id)?,
            action: self.action.parse::<PreparationAction>()?,
            always_prepared: self.always_prepared,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredClassLevelRow {
    pub class: String,
    pub level: i64,
    #[serde(default)]
    pub subclass: Option<String>,
    #[serde(default)]
    pub hit_die_roll: Option<i64>,
}

impl StoredPayload for StoredClassLevelRow {
    type Payload = ClassLevelGained;
    const DOMAIN: &'static str = "class level";

    fn into_payload(self) -> Result<ClassLevelGained, DomainError> {
        if !(1..=MAX_CLASS_LEVEL).contains(&self.level) {
            return Err(DomainError::validation(format!(
                "Class level must be between 1 and {}, got {}",
                MAX_CLASS_LEVEL, self.level
            )));
        }
        let hit_die_roll = match self.hit_die_roll {
            Some(roll) if !(1..=MAX_HIT_DIE_ROLL).contains(&roll) => {
                return Err(DomainError::validation(format!(
                    "Hit die roll must be between 1 and {}, got {}",
                    MAX_HIT_DIE_ROLL, roll
                )))
            }
            Some(roll) => Some(narrow("Hit die roll", roll)?),
            None => None,
        };
        let subclass = self
            .subclass
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(ClassLevelGained {
            class: ClassId::new(self.class)?,
            level: narrow("Class level", self.level)?,
            subclass,
            hit_die_roll,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTraitRow {
    pub kind: String,
    pub text: String,
}

impl StoredPayload for StoredTraitRow {
    type Payload = TraitRecorded;
    const DOMAIN: &'static str = "trait";

    fn into_payload(self) -> Result<TraitRecorded, DomainError> {
        Ok(TraitRecorded {
            kind: self.kind.parse::<TraitKind>()?,
            text: self.text,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNoteRow {
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
}

impl StoredPayload for StoredNoteRow {
    type Payload = NoteWritten;
    const DOMAIN: &'static str = "note";

    fn into_payload(self) -> Result<NoteWritten, DomainError> {
        Ok(NoteWritten {
            title: self.title,
            body: self.body,
        })
    }
}

// =============================================================================
// Profiles
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfile {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub species_id: Option<String>,
    #[serde(default)]
    pub background_id: Option<String>,
}

impl StoredProfile {
    pub fn into_profile(self) -> Result<CharacterProfile, RepoError> {
        let id = self.id;
        let into_repo_error = |e: DomainError| {
            RepoError::serialization(format!("Invalid profile for character {}: {}", id, e))
        };

        let mut profile =
            CharacterProfile::new(CharacterId::from_uuid(id), self.name).map_err(into_repo_error)?;
        if let Some(species) = self.species_id {
            profile = profile.with_species(SpeciesId::new(species).map_err(into_repo_error)?);
        }
        if let Some(background) = self.background_id {
            profile =
                profile.with_background(BackgroundId::new(background).map_err(into_repo_error)?);
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearthsheet_domain::{Ability, ProficiencyLevel, Skill};

    fn stored<R>(row: R) -> StoredEvent<R> {
        StoredEvent {
            meta: StoredMeta {
                id: Uuid::now_v7(),
                character_id: Uuid::new_v4(),
                created_at: Utc::now(),
                note: Some("from the session log".into()),
            },
            row,
        }
    }

    #[test]
    fn valid_rows_convert_to_typed_events() {
        let event = stored(StoredAbilityRow {
            ability: "WIS".into(),
            score: 16,
            proficient: true,
        })
        .into_event()
        .unwrap();
        assert_eq!(event.payload.ability, Ability::Wisdom);
        assert_eq!(event.meta.note.as_deref(), Some("from the session log"));

        let skill = stored(StoredSkillRow {
            skill: "Sleight of Hand".into(),
            proficiency_level: "expertise".into(),
        })
        .into_payload_for_test();
        assert_eq!(skill.skill, Skill::SleightOfHand);
        assert_eq!(skill.proficiency, ProficiencyLevel::Expert);
    }

    impl<R: StoredPayload> StoredEvent<R> {
        fn into_payload_for_test(self) -> R::Payload {
            self.into_event().unwrap().payload
        }
    }

    #[test]
    fn out_of_range_score_is_malformed() {
        let result = stored(StoredAbilityRow {
            ability: "strength".into(),
            score: 31,
            proficient: false,
        })
        .into_event();
        assert!(matches!(
            result,
            Err(RepoError::MalformedEvent { domain: "ability", .. })
        ));
    }

    #[test]
    fn unknown_enum_values_are_malformed() {
        let die = stored(StoredHitDieRow {
            die_size: 8,
            action: "spend".into(),
        })
        .into_event();
        assert!(matches!(die, Err(RepoError::MalformedEvent { .. })));

        let odd_die = stored(StoredHitDieRow {
            die_size: 7,
            action: "use".into(),
        })
        .into_event();
        assert!(odd_die.is_err());

        let prep = stored(StoredPreparedSpellRow {
            class: "wizard".into(),
            spell_id: "shield".into(),
            action: "memorize".into(),
            always_prepared: false,
        })
        .into_event();
        assert!(prep.is_err());
    }

    #[test]
    fn class_level_bounds_are_checked() {
        let row = |level, roll| StoredClassLevelRow {
            class: "Fighter".into(),
            level,
            subclass: Some("  ".into()),
            hit_die_roll: roll,
        };
        let ok = stored(row(3, Some(7))).into_event().unwrap();
        assert_eq!(ok.payload.class.as_str(), "fighter");
        assert_eq!(ok.payload.subclass, None);
        assert_eq!(ok.payload.hit_die_roll, Some(7));

        assert!(stored(row(0, None)).into_event().is_err());
        assert!(stored(row(21, None)).into_event().is_err());
        assert!(stored(row(2, Some(0))).into_event().is_err());
        assert!(stored(row(2, Some(12))).into_event().is_ok());
        assert!(matches!(
            stored(row(2, Some(13))).into_event(),
            Err(RepoError::MalformedEvent { domain: "class level", .. })
        ));
    }

    #[test]
    fn rows_deserialize_with_flattened_meta() {
        let json = r#"{
            "id": "0190a0b4-0000-7000-8000-000000000001",
            "characterId": "6f9c1f7e-5a43-4a1e-9a57-3f3e7d2c1b10",
            "createdAt": "2024-03-01T12:00:00Z",
            "gp": -30,
            "sp": 10
        }"#;
        let row: StoredEvent<StoredCoinRow> = serde_json::from_str(json).unwrap();
        let event = row.into_event().unwrap();
        assert_eq!(event.payload.delta.gp, -30);
        assert_eq!(event.payload.delta.pp, 0);
        assert!(event.meta.note.is_none());
    }

    #[test]
    fn profile_with_blank_name_is_rejected() {
        let profile = StoredProfile {
            id: Uuid::new_v4(),
            name: " ".into(),
            species_id: None,
            background_id: None,
        };
        assert!(matches!(
            profile.into_profile(),
            Err(RepoError::Serialization(_))
        ));
    }
}
