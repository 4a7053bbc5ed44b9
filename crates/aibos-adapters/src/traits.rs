//! Trait definitions for framework adapters.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use aibos_spec::ComponentSpec;

use crate::error::AdapterError;

/// Target frameworks a component can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    React,
    WebComponents,
    Vue,
    Svelte,
    Angular,
}

impl Framework {
    pub const ALL: &'static [Framework] = &[
        Self::React,
        Self::WebComponents,
        Self::Vue,
        Self::Svelte,
        Self::Angular,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::WebComponents => "web-components",
            Self::Vue => "vue",
            Self::Svelte => "svelte",
            Self::Angular => "angular",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    pub framework: Framework,
    pub output_dir: PathBuf,
    /// Base path generated imports of shared modules resolve against
    pub import_path: Option<String>,
}

impl AdapterConfig {
    pub fn new(framework: Framework) -> Self {
        Self {
            framework,
            output_dir: PathBuf::from("generated"),
            import_path: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_import_path(mut self, path: impl Into<String>) -> Self {
        self.import_path = Some(path.into());
        self
    }

    /// Import base with any trailing slash removed.
    pub fn import_base<'a>(&'a self, default: &'a str) -> &'a str {
        self.import_path
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
    }
}

/// Source produced for one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedComponent {
    /// Exported component name (e.g., `Dialog`, `DialogTrigger`)
    pub name: String,
    pub code: String,
    /// Module specifiers the code imports
    pub imports: Vec<String>,
    /// npm packages the code needs at runtime
    pub dependencies: Vec<String>,
}

/// A shared module an adapter ships alongside its components.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportFile {
    pub file_name: String,
    pub code: String,
}

/// A code generator for one target framework.
pub trait FrameworkAdapter: Send + Sync {
    fn framework(&self) -> Framework;

    /// Framework identifier (e.g., "react", "web-components")
    fn name(&self) -> &'static str {
        self.framework().as_str()
    }

    /// File extension of generated components
    fn extension(&self) -> &'static str;

    fn generate(
        &self,
        spec: &ComponentSpec,
        config: &AdapterConfig,
    ) -> Result<GeneratedComponent, AdapterError>;

    /// Generate one standalone module per exported part.
    fn generate_parts(
        &self,
        spec: &ComponentSpec,
        config: &AdapterConfig,
    ) -> Result<Vec<GeneratedComponent>, AdapterError> {
        Ok(vec![self.generate(spec, config)?])
    }

    fn dependencies(&self, spec: &ComponentSpec) -> Vec<String>;

    /// Modules written once per output directory.
    fn support_files(&self, _config: &AdapterConfig) -> Vec<SupportFile> {
        Vec::new()
    }
}
