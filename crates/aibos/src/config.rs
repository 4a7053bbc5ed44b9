//! Project configuration (aibos.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use aibos_adapters::Framework;
use aibos_build::BuildConfig;

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub specs: SpecsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpecsConfig {
    #[serde(default = "default_specs_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_frameworks")]
    pub frameworks: Vec<Framework>,
    /// Base path for imports of shared modules in generated code
    pub import_path: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildSettings {
    #[serde(default = "enabled")]
    pub docs: bool,
    #[serde(default = "enabled")]
    pub minify: bool,
    #[serde(default = "enabled")]
    pub verify: bool,
    #[serde(default)]
    pub fail_fast: bool,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for SpecsConfig {
    fn default() -> Self {
        Self {
            dir: default_specs_dir(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            frameworks: default_frameworks(),
            import_path: None,
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            docs: true,
            minify: true,
            verify: true,
            fail_fast: false,
            title: default_title(),
        }
    }
}

fn default_specs_dir() -> PathBuf {
    PathBuf::from("specs")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}
fn default_frameworks() -> Vec<Framework> {
    vec![Framework::React, Framework::WebComponents]
}
fn default_title() -> String {
    "Components".to_string()
}
fn enabled() -> bool {
    true
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub frameworks: Vec<Framework>,
    pub fail_fast: bool,
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn build_config(&self, overrides: Overrides) -> BuildConfig {
        BuildConfig {
            specs_dir: self.specs.dir.clone(),
            output_dir: overrides.output.unwrap_or_else(|| self.output.dir.clone()),
            frameworks: if overrides.frameworks.is_empty() {
                self.output.frameworks.clone()
            } else {
                overrides.frameworks
            },
            import_path: self.output.import_path.clone(),
            docs: self.build.docs,
            minify: self.build.minify,
            verify: self.build.verify,
            fail_fast: overrides.fail_fast || self.build.fail_fast,
            title: self.build.title.clone(),
        }
    }
}
