use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! define_id {
    ($name:ident, $ctor:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::$ctor())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Stable string identifiers into the static reference dataset.
///
/// Keys are trimmed and lower-cased so that "Wizard" and "wizard" address
/// the same class table.
macro_rules! define_key {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(concat!($label, " cannot be empty")));
                }
                Ok(Self(trimmed.to_lowercase()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> String {
                key.0
            }
        }
    };
}

// Entity IDs
define_id!(CharacterId, new_v4);

// Event IDs are time-ordered so identity order follows arrival order
define_id!(EventId, now_v7);

// Reference dataset keys
define_key!(ClassId, "Class id");
define_key!(SpellId, "Spell id");
define_key!(ItemId, "Item id");
define_key!(SpeciesId, "Species id");
define_key!(BackgroundId, "Background id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_ids_minted_later_sort_later() {
        let first = EventId::new();
        let second = EventId::new();
        assert!(first < second);
    }

    #[test]
    fn keys_are_normalized() {
        let class = ClassId::new("  Wizard ").unwrap();
        assert_eq!(class.as_str(), "wizard");
        assert_eq!(class, ClassId::new("wizard").unwrap());
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(SpellId::new("   "), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn key_deserialization_validates() {
        let ok: ItemId = serde_json::from_str("\"Longsword\"").unwrap();
        assert_eq!(ok.as_str(), "longsword");
        assert!(serde_json::from_str::<ItemId>("\"\"").is_err());
    }
}
