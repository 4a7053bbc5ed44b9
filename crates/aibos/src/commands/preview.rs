//! Headless element preview.

use std::path::Path;

use anyhow::{Context, Result};

use aibos_runtime::{ElementHost, ElementRegistry, HeadlessElement, PrimitiveCache, TaskQueue};
use aibos_spec::{load_spec_file, ComponentSpec};

/// Run the preview command.
pub async fn run(spec_path: &Path, attributes: &[(String, String)], open: bool) -> Result<()> {
    let spec = load_spec_file(spec_path)
        .with_context(|| format!("Failed to load {}", spec_path.display()))?;
    println!("{}", render(&spec, attributes, open).await?);
    Ok(())
}

/// Connect the element for `spec`, flush its first update and serialize it.
pub async fn render(
    spec: &ComponentSpec,
    attributes: &[(String, String)],
    open: bool,
) -> Result<String> {
    let queue = TaskQueue::new();
    let mut registry = ElementRegistry::new(queue.clone(), PrimitiveCache::builtin());
    registry.define(spec);

    let host = HeadlessElement::new(spec.tag_name());
    for (name, value) in attributes {
        host.set_attribute(name, value);
    }
    let element = registry
        .upgrade(host.clone())
        .with_context(|| format!("No element defined for <{}>", spec.tag_name()))?;

    element.connected_callback().await;
    if open {
        if spec.has_parts() {
            element.open();
        } else {
            tracing::warn!("{} is not composite, ignoring --open", spec.name);
        }
    }
    let tasks = queue.run_until_idle();
    tracing::debug!("Ran {} scheduled task(s)", tasks);

    let html = host.outer_html();
    element.disconnected_callback();
    Ok(html)
}
