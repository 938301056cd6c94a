//! Loads the static reference dataset from disk.

use std::path::Path;

use hearthsheet_domain::{Compendium, CompendiumData};

use crate::infrastructure::ports::RepoError;

pub async fn load_compendium(path: impl AsRef<Path>) -> Result<Compendium, RepoError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        RepoError::database("load_compendium", format!("{}: {}", path.display(), e))
    })?;
    let data: CompendiumData = serde_json::from_str(&raw)
        .map_err(|e| RepoError::serialization(format!("{}: {}", path.display(), e)))?;

    let compendium = Compendium::new(data);
    tracing::debug!(
        path = %path.display(),
        spells = compendium.spell_count(),
        items = compendium.item_count(),
        "Loaded compendium"
    );
    Ok(compendium)
}
