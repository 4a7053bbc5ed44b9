//! Batch builder: specs directory in, generated sources and artifacts out.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use aibos_adapters::{
    verify_component, AdapterConfig, AdapterError, AdapterRegistry, Framework, FrameworkAdapter,
    GeneratedComponent,
};
use aibos_spec::{CatalogError, ComponentSpec, SpecCatalog};

use crate::assets::{component_stylesheet, minify_css, ClassIndex};
use crate::templates::{navigation, ComponentDoc, DocsRenderer};

/// Stylesheet path as seen from the docs directory.
const DOCS_STYLESHEET: &str = "../components.css";

/// Configuration for a batch build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory scanned for spec files
    pub specs_dir: PathBuf,

    /// Output directory; each framework writes to a subdirectory
    pub output_dir: PathBuf,

    pub frameworks: Vec<Framework>,

    /// Override for the base path generated imports resolve against
    pub import_path: Option<String>,

    /// Write API docs, `css-classes.json` and `components.css`
    pub docs: bool,

    /// Minify `components.css`
    pub minify: bool,

    /// Parse generated sources before writing them
    pub verify: bool,

    /// Abort on the first failing spec or component
    pub fail_fast: bool,

    /// Title of the generated docs
    pub title: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            specs_dir: PathBuf::from("specs"),
            output_dir: PathBuf::from("generated"),
            frameworks: vec![Framework::React, Framework::WebComponents],
            import_path: None,
            docs: true,
            minify: true,
            verify: true,
            fail_fast: false,
            title: "Components".to_string(),
        }
    }
}

/// A spec file or component that did not make it into the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildFailure {
    /// Spec path for load failures, component name otherwise
    pub target: String,
    pub framework: Option<Framework>,
    pub message: String,
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.framework {
            Some(framework) => write!(f, "{} ({}): {}", self.target, framework, self.message),
            None => write!(f, "{}: {}", self.target, self.message),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of specs loaded
    pub components: usize,

    /// Every file written, in write order
    pub files: Vec<PathBuf>,

    pub failures: Vec<BuildFailure>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    pub output_dir: PathBuf,
}

impl BuildResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Errors that stop a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("Build aborted: {0}")]
    Aborted(BuildFailure),

    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Failed to serialize {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Index of everything a build wrote (`manifest.json`).
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub frameworks: Vec<Framework>,
    pub components: BTreeMap<String, ManifestEntry>,
    /// Shared modules per framework
    pub support_files: BTreeMap<Framework, Vec<String>>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub tag_name: String,
    /// Output-relative file per framework
    pub files: BTreeMap<Framework, String>,
    pub imports: BTreeSet<String>,
    pub dependencies: BTreeSet<String>,
}

impl Manifest {
    fn record(
        &mut self,
        spec: &ComponentSpec,
        framework: Framework,
        file: String,
        component: &GeneratedComponent,
    ) {
        let entry = self
            .components
            .entry(spec.name.clone())
            .or_insert_with(|| ManifestEntry {
                tag_name: spec.tag_name(),
                ..Default::default()
            });
        entry.files.insert(framework, file);
        entry.imports.extend(component.imports.iter().cloned());
        entry.dependencies.extend(component.dependencies.iter().cloned());
    }
}

/// Generates every spec in a directory for every configured framework.
pub struct Builder {
    config: BuildConfig,
    registry: AdapterRegistry,
}

impl Builder {
    pub fn new(config: BuildConfig) -> Self {
        Self::with_registry(config, AdapterRegistry::with_defaults())
    }

    pub fn with_registry(config: BuildConfig, registry: AdapterRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Run the build.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let mut catalog = SpecCatalog::new();
        catalog.scan(&self.config.specs_dir)?;

        let mut failures: Vec<BuildFailure> = catalog
            .failures()
            .iter()
            .map(|f| BuildFailure {
                target: f.path.display().to_string(),
                framework: None,
                message: f.error.to_string(),
            })
            .collect();
        if self.config.fail_fast {
            if let Some(first) = failures.first() {
                return Err(BuildError::Aborted(first.clone()));
            }
        }

        // Resolve every adapter before anything is written.
        let adapters = self
            .config
            .frameworks
            .iter()
            .map(|f| self.registry.get_adapter(f.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        let specs: Vec<&ComponentSpec> = catalog.specs().collect();
        let mut manifest = Manifest {
            frameworks: self.config.frameworks.clone(),
            ..Default::default()
        };
        let mut files = Vec::new();

        for adapter in adapters {
            let framework = adapter.framework();
            let config = self.adapter_config(framework);

            let generated: Vec<(&ComponentSpec, Result<GeneratedComponent, AdapterError>)> = specs
                .par_iter()
                .map(|spec| (*spec, self.generate(adapter, spec, &config)))
                .collect();

            let mut written = 0;
            for (spec, result) in generated {
                match result {
                    Ok(component) => {
                        let file_name = format!("{}.{}", component.name, adapter.extension());
                        let path = config.output_dir.join(&file_name);
                        write_file(&path, &component.code)?;
                        manifest.record(spec, framework, format!("{}/{}", framework, file_name), &component);
                        files.push(path);
                        written += 1;
                    }
                    Err(error) => {
                        tracing::warn!("{} ({}): {}", spec.name, framework, error);
                        if self.config.fail_fast {
                            return Err(error.into());
                        }
                        failures.push(BuildFailure {
                            target: spec.name.clone(),
                            framework: Some(framework),
                            message: error.to_string(),
                        });
                    }
                }
            }

            for support in adapter.support_files(&config) {
                let path = config.output_dir.join(&support.file_name);
                write_file(&path, &support.code)?;
                manifest
                    .support_files
                    .entry(framework)
                    .or_default()
                    .push(format!("{}/{}", framework, support.file_name));
                files.push(path);
            }

            tracing::info!(
                "Generated {} {} component(s) in {}",
                written,
                framework,
                config.output_dir.display()
            );
        }

        files.push(write_json(&self.config.output_dir.join("manifest.json"), &manifest)?);

        if self.config.docs {
            files.extend(self.write_docs(&specs)?);
        }

        Ok(BuildResult {
            components: catalog.len(),
            files,
            failures,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    fn adapter_config(&self, framework: Framework) -> AdapterConfig {
        let config = AdapterConfig::new(framework)
            .with_output_dir(self.config.output_dir.join(framework.as_str()));
        match &self.config.import_path {
            Some(path) => config.with_import_path(path.clone()),
            None => config,
        }
    }

    fn generate(
        &self,
        adapter: &dyn FrameworkAdapter,
        spec: &ComponentSpec,
        config: &AdapterConfig,
    ) -> Result<GeneratedComponent, AdapterError> {
        let component = adapter.generate(spec, config)?;
        if self.config.verify {
            verify_component(&component, adapter.framework())?;
        }
        Ok(component)
    }

    /// API docs, class metadata and the component stylesheet.
    fn write_docs(&self, specs: &[&ComponentSpec]) -> Result<Vec<PathBuf>, BuildError> {
        let out = &self.config.output_dir;
        let docs_dir = out.join("docs");
        let renderer = DocsRenderer::new(self.config.title.clone())?;
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        let docs: Vec<ComponentDoc> = specs.iter().map(|s| ComponentDoc::from_spec(s)).collect();
        let mut files = Vec::new();

        for doc in &docs {
            let markdown = renderer.render_markdown(doc)?;
            let nav = navigation(&names, Some(doc.name.as_str()));
            let html = renderer.render_page(&doc.name, &markdown, &nav, DOCS_STYLESHEET)?;

            let md_path = docs_dir.join(format!("{}.md", doc.name));
            write_file(&md_path, &markdown)?;
            files.push(md_path);

            let html_path = docs_dir.join(format!("{}.html", doc.name));
            write_file(&html_path, &html)?;
            files.push(html_path);
        }

        let index = renderer.render_index_markdown(&docs)?;
        let html = renderer.render_page(
            &self.config.title,
            &index,
            &navigation(&names, None),
            DOCS_STYLESHEET,
        )?;
        let index_path = docs_dir.join("index.html");
        write_file(&index_path, &html)?;
        files.push(index_path);

        let classes = ClassIndex::from_specs(specs.iter().copied());
        files.push(write_json(&out.join("css-classes.json"), &classes)?);

        let mut css = component_stylesheet(specs.iter().copied());
        if self.config.minify && !css.is_empty() {
            match minify_css(&css) {
                Ok(minified) => css = minified,
                Err(e) => tracing::warn!("Writing components.css unminified: {}", e),
            }
        }
        let css_path = out.join("components.css");
        write_file(&css_path, &css)?;
        files.push(css_path);

        tracing::info!("Wrote docs for {} component(s) to {}", docs.len(), docs_dir.display());
        Ok(files)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::Write {
            path: parent.display().to_string(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| BuildError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf, BuildError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| BuildError::Serialize {
        path: path.display().to_string(),
        source,
    })?;
    write_file(path, &json)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aibos_adapters::AdapterErrorKind;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const BUTTON: &str = r#"{
  "name": "Button",
  "description": "Clickable action.",
  "radixPrimitive": null,
  "nativeElement": "button",
  "props": {},
  "variants": {
    "primary": { "aibosClasses": ["na-btn", "na-btn-primary"] },
    "ghost": { "aibosClasses": ["na-btn", "na-btn-ghost"] }
  },
  "states": {
    "disabled": { "aibosClasses": ["opacity-50"], "css": "opacity: 0.5;" }
  }
}"#;

    const DIALOG: &str = r#"{
  "name": "Dialog",
  "radixPrimitive": "dialog",
  "props": {},
  "variants": { "default": { "aibosClasses": ["na-dialog"] } },
  "parts": {
    "Root": { "aibosClasses": [] },
    "Trigger": { "aibosClasses": ["na-dialog-trigger"] },
    "Content": { "aibosClasses": ["na-dialog-content"] }
  }
}"#;

    struct Workspace {
        _temp: tempfile::TempDir,
        specs: PathBuf,
        out: PathBuf,
    }

    fn workspace(files: &[(&str, &str)]) -> Workspace {
        let temp = tempdir().unwrap();
        let specs = temp.path().join("specs");
        let out = temp.path().join("generated");
        fs::create_dir_all(&specs).unwrap();
        for (name, source) in files {
            fs::write(specs.join(name), source).unwrap();
        }
        Workspace {
            specs,
            out,
            _temp: temp,
        }
    }

    fn config(ws: &Workspace) -> BuildConfig {
        BuildConfig {
            specs_dir: ws.specs.clone(),
            output_dir: ws.out.clone(),
            ..Default::default()
        }
    }

    /// Rejects every spec.
    struct RejectingAdapter;

    impl FrameworkAdapter for RejectingAdapter {
        fn framework(&self) -> Framework {
            Framework::Vue
        }

        fn extension(&self) -> &'static str {
            "vue"
        }

        fn generate(
            &self,
            spec: &ComponentSpec,
            _config: &AdapterConfig,
        ) -> Result<GeneratedComponent, AdapterError> {
            Err(AdapterError::invalid_spec(spec, "not supported yet"))
        }

        fn dependencies(&self, _spec: &ComponentSpec) -> Vec<String> {
            vec!["vue".to_string()]
        }
    }

    #[tokio::test]
    async fn builds_every_framework() {
        let ws = workspace(&[("button.json", BUTTON), ("dialog.json", DIALOG)]);

        let result = Builder::new(config(&ws)).build().await.unwrap();

        assert_eq!(result.components, 2);
        assert!(result.is_success(), "{:?}", result.failures);
        for file in [
            "react/Button.tsx",
            "react/Dialog.tsx",
            "web-components/Button.ts",
            "web-components/Dialog.ts",
            "web-components/aibos-runtime.ts",
            "manifest.json",
            "docs/Button.md",
            "docs/Dialog.html",
            "docs/index.html",
            "css-classes.json",
            "components.css",
        ] {
            assert!(ws.out.join(file).exists(), "missing {}", file);
        }
        assert!(result.files.contains(&ws.out.join("react/Button.tsx")));

        let dialog = fs::read_to_string(ws.out.join("react/Dialog.tsx")).unwrap();
        assert!(dialog.contains("export const DialogTrigger"));

        let css = fs::read_to_string(ws.out.join("components.css")).unwrap();
        assert!(css.contains("na-button[disabled]"));
        assert!(!css.contains('\n'));
    }

    #[tokio::test]
    async fn writes_manifest() {
        let ws = workspace(&[("button.json", BUTTON)]);

        Builder::new(config(&ws)).build().await.unwrap();

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(ws.out.join("manifest.json")).unwrap())
                .unwrap();
        let button = &manifest["components"]["Button"];

        assert_eq!(button["tagName"], "na-button");
        assert_eq!(button["files"]["react"], "react/Button.tsx");
        assert_eq!(button["files"]["web-components"], "web-components/Button.ts");
        assert!(button["dependencies"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("react")));
        assert_eq!(
            manifest["supportFiles"]["web-components"],
            serde_json::json!(["web-components/aibos-runtime.ts"])
        );
        assert_eq!(manifest["frameworks"], serde_json::json!(["react", "web-components"]));
    }

    #[tokio::test]
    async fn continues_past_invalid_specs() {
        let ws = workspace(&[
            ("button.json", BUTTON),
            ("broken.json", r#"{ "name": "broken", "props": {} }"#),
        ]);

        let result = Builder::new(config(&ws)).build().await.unwrap();

        assert_eq!(result.components, 1);
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].target.ends_with("broken.json"));
        assert_eq!(result.failures[0].framework, None);
        assert!(ws.out.join("react/Button.tsx").exists());
    }

    #[tokio::test]
    async fn fail_fast_aborts_on_invalid_spec() {
        let ws = workspace(&[
            ("button.json", BUTTON),
            ("broken.json", r#"{ "name": "broken", "props": {} }"#),
        ]);

        let err = Builder::new(BuildConfig {
            fail_fast: true,
            ..config(&ws)
        })
        .build()
        .await
        .unwrap_err();

        assert!(matches!(err, BuildError::Aborted(_)));
        assert!(!ws.out.join("react").exists());
    }

    #[tokio::test]
    async fn records_generator_failures() {
        let ws = workspace(&[("button.json", BUTTON)]);
        let mut registry = AdapterRegistry::with_defaults();
        registry.register(Box::new(RejectingAdapter));

        let result = Builder::with_registry(
            BuildConfig {
                frameworks: vec![Framework::Vue, Framework::React],
                docs: false,
                ..config(&ws)
            },
            registry,
        )
        .build()
        .await
        .unwrap();

        assert_eq!(
            result.failures,
            vec![BuildFailure {
                target: "Button".to_string(),
                framework: Some(Framework::Vue),
                message: "Invalid spec for Button: not supported yet".to_string(),
            }]
        );
        assert_eq!(
            result.failures[0].to_string(),
            "Button (vue): Invalid spec for Button: not supported yet"
        );
        assert!(ws.out.join("react/Button.tsx").exists());
        assert!(!ws.out.join("docs").exists());
    }

    #[tokio::test]
    async fn unknown_framework_is_fatal() {
        let ws = workspace(&[("button.json", BUTTON)]);

        let err = Builder::new(BuildConfig {
            frameworks: vec![Framework::React, Framework::Svelte],
            ..config(&ws)
        })
        .build()
        .await
        .unwrap_err();

        match err {
            BuildError::Adapter(e) => assert_eq!(e.kind(), AdapterErrorKind::UnsupportedFramework),
            other => panic!("unexpected error: {}", other),
        }
        assert!(!ws.out.join("react").exists());
    }

    #[tokio::test]
    async fn missing_specs_dir_is_fatal() {
        let temp = tempdir().unwrap();

        let err = Builder::new(BuildConfig {
            specs_dir: temp.path().join("nope"),
            output_dir: temp.path().join("out"),
            ..Default::default()
        })
        .build()
        .await
        .unwrap_err();

        assert!(matches!(err, BuildError::Catalog(_)));
    }
}
