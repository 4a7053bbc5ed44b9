//! Component generation command.

use anyhow::Result;

use aibos_build::{BuildConfig, BuildResult, Builder};

/// Run the generate command.
pub async fn run(config: BuildConfig) -> Result<()> {
    tracing::info!(
        "Generating {} from {}...",
        framework_list(&config),
        config.specs_dir.display()
    );

    let result = Builder::new(config).build().await?;
    report(&result);

    if !result.is_success() {
        anyhow::bail!("{} failure(s) during generation", result.failures.len());
    }
    Ok(())
}

/// Log a build summary and every failure.
pub fn report(result: &BuildResult) {
    for failure in &result.failures {
        tracing::error!("{}", failure);
    }
    tracing::info!(
        "Generated {} component(s), {} file(s) in {}ms",
        result.components,
        result.files.len(),
        result.duration_ms
    );
    tracing::info!("Output: {}", result.output_dir.display());
}

fn framework_list(config: &BuildConfig) -> String {
    config
        .frameworks
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
