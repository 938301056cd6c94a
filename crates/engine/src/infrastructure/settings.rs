//! Engine settings read from the environment.
//!
//! Supported environment variables:
//! - HEARTHSHEET_STORE_PATH: event store file (default `data/events.json`)
//! - HEARTHSHEET_COMPENDIUM_PATH: reference dataset file (default `data/compendium.json`)
//! - HEARTHSHEET_CHARACTER_ID: character to compose (required)
//! - HEARTHSHEET_AS_OF: optional RFC 3339 timestamp for a historical snapshot

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use hearthsheet_domain::CharacterId;
use uuid::Uuid;

pub const STORE_PATH_VAR: &str = "HEARTHSHEET_STORE_PATH";
pub const COMPENDIUM_PATH_VAR: &str = "HEARTHSHEET_COMPENDIUM_PATH";
pub const CHARACTER_ID_VAR: &str = "HEARTHSHEET_CHARACTER_ID";
pub const AS_OF_VAR: &str = "HEARTHSHEET_AS_OF";

const DEFAULT_STORE_PATH: &str = "data/events.json";
const DEFAULT_COMPENDIUM_PATH: &str = "data/compendium.json";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is not a valid {expected}: {value}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub store_path: PathBuf,
    pub compendium_path: PathBuf,
    pub character_id: CharacterId,
    pub as_of: Option<DateTime<Utc>>,
}

impl EngineSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let store_path = get(STORE_PATH_VAR).unwrap_or_else(|| DEFAULT_STORE_PATH.into());
        let compendium_path =
            get(COMPENDIUM_PATH_VAR).unwrap_or_else(|| DEFAULT_COMPENDIUM_PATH.into());

        let raw_id = get(CHARACTER_ID_VAR).ok_or(SettingsError::Missing(CHARACTER_ID_VAR))?;
        let character_id =
            Uuid::parse_str(&raw_id)
                .map(CharacterId::from_uuid)
                .map_err(|_| SettingsError::Invalid {
                    var: CHARACTER_ID_VAR,
                    expected: "UUID",
                    value: raw_id.clone(),
                })?;

        let as_of = get(AS_OF_VAR)
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|_| SettingsError::Invalid {
                        var: AS_OF_VAR,
                        expected: "RFC 3339 timestamp",
                        value: raw,
                    })
            })
            .transpose()?;

        Ok(Self {
            store_path: store_path.into(),
            compendium_path: compendium_path.into(),
            character_id,
            as_of,
        })
    }
}
