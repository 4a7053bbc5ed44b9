//! Loading component specs from disk.
//!
//! Specs are authored as JSON (primary) or YAML. A [`SpecCatalog`] scans a
//! directory, validates each file and keeps going past failures so a batch
//! build can report every broken spec in one run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::types::ComponentSpec;
use crate::validate::{validate_spec, ValidationError};

/// Errors that can occur when loading a single spec file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Unsupported spec file extension: {0}")]
    UnsupportedExtension(String),

    #[error("{path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: ValidationError,
    },

    #[error("Duplicate component name '{name}' (already defined in {first})")]
    Duplicate { name: String, first: String },
}

/// Errors that abort a catalog scan entirely.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Specs directory not found: {0}")]
    DirectoryNotFound(String),
}

/// Spec file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parse spec source text into an untyped value.
pub fn parse_source(source: &str, format: SpecFormat) -> Result<Value, String> {
    match format {
        SpecFormat::Json => serde_json::from_str(source).map_err(|e| e.to_string()),
        SpecFormat::Yaml => serde_yaml::from_str(source).map_err(|e| e.to_string()),
    }
}

/// Read, parse and validate one spec file.
pub fn load_spec_file(path: &Path) -> Result<ComponentSpec, LoadError> {
    let display = path.display().to_string();
    let format = SpecFormat::from_path(path)
        .ok_or_else(|| LoadError::UnsupportedExtension(display.clone()))?;

    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;

    let value = parse_source(&source, format).map_err(|message| LoadError::Parse {
        path: display.clone(),
        message,
    })?;

    validate_spec(&value).map_err(|source| LoadError::Invalid {
        path: display,
        source,
    })
}

/// A loaded spec with the file it came from.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub spec: ComponentSpec,
}

/// A spec file that could not be loaded.
#[derive(Debug)]
pub struct CatalogFailure {
    pub path: PathBuf,
    pub error: LoadError,
}

/// Validated specs found under a directory, keyed by component name.
#[derive(Debug, Default)]
pub struct SpecCatalog {
    entries: BTreeMap<String, CatalogEntry>,
    failures: Vec<CatalogFailure>,
}

impl SpecCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a directory for spec files and populate the catalog.
    ///
    /// Returns the number of specs loaded; files that fail to load are kept
    /// in [`SpecCatalog::failures`].
    pub fn scan(&mut self, specs_dir: &Path) -> Result<usize, CatalogError> {
        if !specs_dir.exists() {
            return Err(CatalogError::DirectoryNotFound(specs_dir.display().to_string()));
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(specs_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|path| path.is_file() && is_spec_file(path))
            .collect();
        paths.sort();

        let mut count = 0;
        for path in paths {
            match load_spec_file(&path) {
                Ok(spec) => {
                    if self.insert(path, spec) {
                        count += 1;
                    }
                }
                Err(error) => {
                    tracing::warn!("Skipping {}: {}", path.display(), error);
                    self.failures.push(CatalogFailure { path, error });
                }
            }
        }

        Ok(count)
    }

    /// Add a spec; a name already present is recorded as a failure.
    pub fn insert(&mut self, path: PathBuf, spec: ComponentSpec) -> bool {
        if let Some(existing) = self.entries.get(&spec.name) {
            let error = LoadError::Duplicate {
                name: spec.name.clone(),
                first: existing.path.display().to_string(),
            };
            tracing::warn!("Skipping {}: {}", path.display(), error);
            self.failures.push(CatalogFailure { path, error });
            return false;
        }
        self.entries
            .insert(spec.name.clone(), CatalogEntry { path, spec });
        true
    }

    /// Look up a spec by component name.
    pub fn get(&self, name: &str) -> Option<&ComponentSpec> {
        self.entries.get(name).map(|e| &e.spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Loaded specs in name order.
    pub fn specs(&self) -> impl Iterator<Item = &ComponentSpec> {
        self.entries.values().map(|e| &e.spec)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn failures(&self) -> &[CatalogFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Spec sources are `.json`/`.yaml`/`.yml`, excluding schema documents.
fn is_spec_file(path: &Path) -> bool {
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    SpecFormat::from_path(path).is_some() && !filename.contains(".schema.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BUTTON_JSON: &str = r#"{
  "name": "Button",
  "radixPrimitive": null,
  "nativeElement": "button",
  "props": {},
  "variants": { "primary": { "aibosClasses": ["na-btn", "na-btn-primary"] } }
}"#;

    const SWITCH_YAML: &str = r#"
name: Switch
radixPrimitive: switch
props:
  checked:
    type: boolean
    default: false
variants:
  default:
    aibosClasses: [na-switch]
"#;

    #[test]
    fn loads_json_and_yaml() {
        let temp = tempdir().unwrap();
        let json_path = temp.path().join("button.json");
        let yaml_path = temp.path().join("switch.yaml");
        fs::write(&json_path, BUTTON_JSON).unwrap();
        fs::write(&yaml_path, SWITCH_YAML).unwrap();

        let button = load_spec_file(&json_path).unwrap();
        let switch = load_spec_file(&yaml_path).unwrap();

        assert_eq!(button.name, "Button");
        assert_eq!(switch.name, "Switch");
        assert_eq!(switch.props["checked"].default, Some(serde_json::json!(false)));
    }

    #[test]
    fn rejects_unknown_extension() {
        let result = load_spec_file(Path::new("button.toml"));
        assert!(matches!(result, Err(LoadError::UnsupportedExtension(_))));
    }

    #[test]
    fn scans_directory_and_collects_failures() {
        let temp = tempdir().unwrap();
        let specs = temp.path().join("specs");
        fs::create_dir_all(specs.join("overlay")).unwrap();

        fs::write(specs.join("button.json"), BUTTON_JSON).unwrap();
        fs::write(specs.join("overlay").join("switch.yml"), SWITCH_YAML).unwrap();
        fs::write(specs.join("broken.json"), r#"{ "name": "broken" }"#).unwrap();
        fs::write(specs.join("component.schema.json"), "{}").unwrap();
        fs::write(specs.join("README.md"), "# Specs").unwrap();

        let mut catalog = SpecCatalog::new();
        let count = catalog.scan(&specs).unwrap();

        assert_eq!(count, 2);
        assert!(catalog.contains("Button"));
        assert!(catalog.contains("Switch"));
        assert_eq!(catalog.failures().len(), 1);
        assert!(matches!(catalog.failures()[0].error, LoadError::Invalid { .. }));
    }

    #[test]
    fn reports_duplicate_names() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.json"), BUTTON_JSON).unwrap();
        fs::write(temp.path().join("b.json"), BUTTON_JSON).unwrap();

        let mut catalog = SpecCatalog::new();
        let count = catalog.scan(temp.path()).unwrap();

        assert_eq!(count, 1);
        assert!(matches!(
            catalog.failures()[0].error,
            LoadError::Duplicate { ref name, .. } if name == "Button"
        ));
    }

    #[test]
    fn errors_on_missing_directory() {
        let mut catalog = SpecCatalog::new();
        let result = catalog.scan(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(CatalogError::DirectoryNotFound(_))));
    }
}
