//! Scaffold a new aibos project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing aibos...");

    let specs_dir = Path::new("specs");
    if specs_dir.exists() {
        if !yes {
            tracing::warn!("specs/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(specs_dir).context("Failed to create specs directory")?;
    }

    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    let button_path = specs_dir.join("button.json");
    if !button_path.exists() || yes {
        fs::write(&button_path, DEFAULT_BUTTON_SPEC).context("Failed to write button.json")?;
        tracing::info!("Created specs/button.json");
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'aibos generate' to generate components.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# aibos configuration

[specs]
# Directory containing component specs (.json, .yaml, .yml)
dir = "specs"

[output]
# Generated code is written to <dir>/<framework>/
dir = "generated"
frameworks = ["react", "web-components"]
# Base path generated imports of shared modules resolve against
# import_path = "@/lib"

[build]
# API docs, css-classes.json and components.css
docs = true
# Minify components.css
minify = true
# Syntax-check generated code before writing it
verify = true
# Abort on the first failing spec
fail_fast = false
"#;

const DEFAULT_BUTTON_SPEC: &str = r#"{
  "name": "Button",
  "description": "Triggers an action or event.",
  "radixPrimitive": null,
  "nativeElement": "button",
  "props": {
    "type": {
      "type": "'button' | 'submit' | 'reset'",
      "default": "button",
      "description": "Native button type"
    }
  },
  "variants": {
    "primary": { "aibosClasses": ["na-btn", "na-btn-primary"] },
    "secondary": { "aibosClasses": ["na-btn", "na-btn-secondary"] },
    "ghost": { "aibosClasses": ["na-btn", "na-btn-ghost"] }
  },
  "states": {
    "disabled": {
      "aibosClasses": ["opacity-50", "cursor-not-allowed"],
      "css": "pointer-events: none;"
    },
    "loading": { "aibosClasses": ["cursor-wait"] }
  },
  "accessibility": {
    "handledBy": "native",
    "keyboard": { "Enter": "Activates the button", "Space": "Activates the button" }
  },
  "metadata": { "category": "action", "tags": ["button", "action"], "complexity": "simple" }
}
"#;
