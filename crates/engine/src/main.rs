//! Hearthsheet Engine - prints a composed character snapshot as JSON.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use hearthsheet_domain::GameSystemRegistry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hearthsheet_engine::infrastructure::persistence::{load_compendium, JsonEventStore};
use hearthsheet_engine::infrastructure::settings::EngineSettings;
use hearthsheet_engine::App;

const GAME_SYSTEM: &str = "dnd5e";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (cargo may run the engine from `crates/engine`).
    load_dotenv_from_repo_root();

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hearthsheet_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = EngineSettings::from_env().context("Invalid engine settings")?;
    tracing::info!(
        store = %settings.store_path.display(),
        compendium = %settings.compendium_path.display(),
        character_id = %settings.character_id,
        "Starting Hearthsheet Engine"
    );

    let store = JsonEventStore::load(&settings.store_path)
        .await
        .context("Failed to load event store")?;
    let compendium = load_compendium(&settings.compendium_path)
        .await
        .context("Failed to load compendium")?;
    let system = GameSystemRegistry::new()
        .get(GAME_SYSTEM)
        .with_context(|| format!("Game system not registered: {}", GAME_SYSTEM))?;

    let app = App::new(Arc::new(store), system, Arc::new(compendium));
    let snapshots = &app.use_cases.character_snapshot;
    let snapshot = match settings.as_of {
        Some(at) => snapshots.execute_as_of(settings.character_id, at).await?,
        None => snapshots.execute(settings.character_id).await?,
    };

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
