//! Spec validation command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use aibos_spec::{load_spec_file, SpecCatalog};

use crate::config::ConfigFile;

/// Run the validate command.
pub async fn run(config: &ConfigFile, paths: Vec<PathBuf>) -> Result<()> {
    let paths = if paths.is_empty() {
        vec![config.specs.dir.clone()]
    } else {
        paths
    };

    let mut valid = 0;
    let mut failed = 0;
    for path in &paths {
        let (ok, errors) = check(path)?;
        valid += ok;
        failed += errors;
    }

    if failed > 0 {
        anyhow::bail!("{} spec(s) failed validation ({} valid)", failed, valid);
    }
    tracing::info!("{} spec(s) valid", valid);
    Ok(())
}

/// Validate one file or every spec under a directory; returns (valid, failed).
fn check(path: &Path) -> Result<(usize, usize)> {
    if path.is_dir() {
        let mut catalog = SpecCatalog::new();
        catalog
            .scan(path)
            .with_context(|| format!("Failed to scan {}", path.display()))?;
        for entry in catalog.entries() {
            tracing::debug!("{}: ok", entry.path.display());
        }
        for failure in catalog.failures() {
            tracing::error!("{}", failure.error);
        }
        return Ok((catalog.len(), catalog.failures().len()));
    }

    match load_spec_file(path) {
        Ok(spec) => {
            tracing::debug!("{}: {} ok", path.display(), spec.name);
            Ok((1, 0))
        }
        Err(error) => {
            tracing::error!("{}", error);
            Ok((0, 1))
        }
    }
}
