//! Nocturne Engine - Script runner entry point.
//!
//! Usage: `nocturne-engine <script.json>`

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nocturne_engine::infrastructure::config::{load_dotenv_from_repo_root, EngineConfig};
use nocturne_engine::script::{run_script, Script};
use nocturne_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nocturne_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let script_path = std::env::args()
        .nth(1)
        .context("usage: nocturne-engine <script.json>")?;

    tracing::info!("Starting Nocturne Engine");

    let config = EngineConfig::from_env();
    let app = App::from_config(&config).await?;

    let raw = tokio::fs::read_to_string(&script_path)
        .await
        .with_context(|| format!("reading {}", script_path))?;
    let script = Script::from_json(&raw)?;

    let report = run_script(&app.use_cases.trait_economy, &script).await?;

    for step in &report.steps {
        match &step.note {
            Some(note) if !step.accepted => {
                tracing::warn!(index = step.index, summary = %step.summary, reason = %note, "Rejected")
            }
            _ => tracing::info!(index = step.index, summary = %step.summary, "Applied"),
        }
    }
    tracing::info!(
        character_id = %report.character_id,
        freebie_remaining = report.balances.freebie.remaining,
        experience_remaining = report.balances.experience.remaining,
        "Script finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
