//! Spec-derived data driving a custom element.

use std::collections::BTreeMap;

use aibos_spec::ComponentSpec;

/// Default value of the `size` attribute.
pub const DEFAULT_SIZE: &str = "md";

/// Everything an element needs from its spec, resolved once per component.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDefinition {
    /// Component class name (e.g., `Dialog`)
    pub class_name: String,
    /// Custom element tag (e.g., `na-dialog`)
    pub tag_name: String,
    pub variant_classes: BTreeMap<String, Vec<String>>,
    pub default_variant: String,
    pub disabled_classes: Vec<String>,
    pub loading_classes: Vec<String>,
    /// Composite components expose `open()`/`close()`.
    pub composite: bool,
    /// Primitive module loaded on connect.
    pub primitive: Option<String>,
    pub role: Option<String>,
}

impl ElementDefinition {
    pub fn from_spec(spec: &ComponentSpec) -> Self {
        let variant_classes = spec
            .variants
            .iter()
            .map(|(name, variant)| (name.clone(), variant.aibos_classes.clone()))
            .collect();

        Self {
            class_name: spec.name.clone(),
            tag_name: spec.tag_name(),
            variant_classes,
            default_variant: spec.lowest_variant().unwrap_or_default().to_string(),
            disabled_classes: spec.state_classes("disabled").to_vec(),
            loading_classes: spec.state_classes("loading").to_vec(),
            composite: spec.has_parts(),
            primitive: spec.radix_primitive.map(|p| p.as_str().to_string()),
            role: spec.aria_role().map(str::to_string),
        }
    }

    /// Attributes whose changes reach `attribute_changed_callback`.
    pub fn observed_attributes(&self) -> Vec<&'static str> {
        let mut attributes = vec!["variant", "size", "disabled", "loading"];
        if self.composite {
            attributes.push("open");
        }
        attributes
    }

    /// Class string for a state: variant classes, then disabled, then loading.
    ///
    /// An unknown variant contributes no classes.
    pub fn resolve_classes(&self, state: &ElementState) -> String {
        let mut classes: Vec<&str> = self
            .variant_classes
            .get(&state.variant)
            .map(|classes| classes.iter().map(String::as_str).collect())
            .unwrap_or_default();
        if state.disabled {
            classes.extend(self.disabled_classes.iter().map(String::as_str));
        }
        if state.loading {
            classes.extend(self.loading_classes.iter().map(String::as_str));
        }
        crate::support::merge_classes(classes)
    }

    /// State of a freshly constructed element.
    pub fn initial_state(&self) -> ElementState {
        ElementState {
            open: false,
            variant: self.default_variant.clone(),
            size: DEFAULT_SIZE.to_string(),
            disabled: false,
            loading: false,
        }
    }
}

/// Per-instance fields mirrored from observed attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementState {
    pub open: bool,
    pub variant: String,
    pub size: String,
    pub disabled: bool,
    pub loading: bool,
}

/// Category of a scheduled update. Flushes apply them in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpdateKind {
    Classes,
    Attributes,
    Component,
}

impl UpdateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Attributes => "attributes",
            Self::Component => "component",
        }
    }

    /// Updates scheduled by a change to an observed attribute.
    pub fn for_attribute(name: &str) -> &'static [UpdateKind] {
        match name {
            "variant" | "size" => &[Self::Classes],
            "disabled" | "loading" => &[Self::Classes, Self::Attributes],
            "open" => &[Self::Attributes, Self::Component],
            _ => &[],
        }
    }
}
