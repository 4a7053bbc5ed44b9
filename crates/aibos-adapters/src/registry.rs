//! Framework name → adapter lookup.
//!
//! Only frameworks with an implemented generator are registered. Asking for
//! anything else is an error naming the requested framework; there is no
//! fallback adapter.

use std::collections::BTreeMap;

use crate::error::AdapterError;
use crate::react::ReactAdapter;
use crate::traits::{Framework, FrameworkAdapter};
use crate::web_component::WebComponentAdapter;

/// Registered adapters keyed by framework.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<Framework, Box<dyn FrameworkAdapter>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the React and Web Component generators.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ReactAdapter::new()));
        registry.register(Box::new(WebComponentAdapter::new()));
        registry
    }

    /// Register an adapter, replacing any adapter for the same framework.
    pub fn register(&mut self, adapter: Box<dyn FrameworkAdapter>) {
        let framework = adapter.framework();
        if self.adapters.insert(framework, adapter).is_some() {
            tracing::debug!("Replaced {} adapter", framework);
        }
    }

    /// Look up the adapter for a framework name.
    pub fn get_adapter(&self, framework: &str) -> Result<&dyn FrameworkAdapter, AdapterError> {
        Framework::parse(framework)
            .and_then(|f| self.get(f))
            .ok_or_else(|| AdapterError::UnsupportedFramework {
                framework: framework.to_string(),
                available: self
                    .available_frameworks()
                    .iter()
                    .map(Framework::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn get(&self, framework: Framework) -> Option<&dyn FrameworkAdapter> {
        self.adapters.get(&framework).map(|a| a.as_ref())
    }

    pub fn is_framework_supported(&self, framework: &str) -> bool {
        Framework::parse(framework).is_some_and(|f| self.adapters.contains_key(&f))
    }

    pub fn available_frameworks(&self) -> Vec<Framework> {
        self.adapters.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterErrorKind;

    #[test]
    fn defaults_cover_react_and_web_components() {
        let registry = AdapterRegistry::with_defaults();
        assert_eq!(
            registry.available_frameworks(),
            vec![Framework::React, Framework::WebComponents]
        );
        assert_eq!(registry.get_adapter("react").unwrap().extension(), "tsx");
        assert_eq!(registry.get_adapter("web-components").unwrap().extension(), "ts");
    }

    #[test]
    fn unregistered_framework_is_named_in_error() {
        let registry = AdapterRegistry::with_defaults();

        for name in ["vue", "qwik"] {
            let error = registry.get_adapter(name).err().unwrap();
            assert_eq!(error.kind(), AdapterErrorKind::UnsupportedFramework);
            assert!(error.to_string().contains(&format!("'{}'", name)));
        }
    }

    #[test]
    fn membership_check() {
        let registry = AdapterRegistry::with_defaults();
        assert!(registry.is_framework_supported("react"));
        assert!(!registry.is_framework_supported("svelte"));
        assert!(!registry.is_framework_supported("React"));
        assert!(!AdapterRegistry::new().is_framework_supported("react"));
    }
}
