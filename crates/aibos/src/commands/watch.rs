//! Rebuild on spec changes.

use anyhow::{Context, Result};

use aibos_build::{BuildConfig, Builder, SpecWatcher};

use super::generate::report;

/// Run the watch command.
pub async fn run(config: BuildConfig) -> Result<()> {
    let specs_dir = config.specs_dir.clone();
    let builder = Builder::new(config);

    // An initial failure is reported but does not stop watching.
    rebuild(&builder).await;

    let (_watcher, mut events) = SpecWatcher::new(&specs_dir)
        .with_context(|| format!("Failed to watch {}", specs_dir.display()))?;
    tracing::info!("Watching {} for changes (Ctrl+C to stop)", specs_dir.display());

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                tracing::info!("{} changed, regenerating...", event.path().display());
                rebuild(&builder).await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watcher");
                break;
            }
        }
    }

    Ok(())
}

async fn rebuild(builder: &Builder) {
    match builder.build().await {
        Ok(result) => report(&result),
        Err(e) => tracing::error!("Build failed: {}", e),
    }
}
