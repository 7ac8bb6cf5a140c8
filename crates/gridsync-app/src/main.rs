//! gridsync: replays a scripted inline-editing session against an in-memory
//! detail table. Pass a settings file path to override the stored settings.

mod demo;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use gridsync_settings::GridSettings;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = logging::init(logging::LoggingConfig::for_build())?;

    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => GridSettings::load_from(&path)
            .with_context(|| format!("Failed to load settings from {:?}", path))?,
        None => GridSettings::load()?,
    };
    tracing::debug!(?settings, "settings loaded");

    let report = demo::run(&settings).await?;
    for row in &report.rows {
        println!("{}", serde_json::to_string(row)?);
    }
    println!("selected: {:?} ({:?})", report.selected, report.header);
    println!("group by: {}", report.group_by);
    Ok(())
}
