//! `customElements` for headless hosts.

use std::collections::BTreeMap;
use std::rc::Rc;

use aibos_spec::ComponentSpec;

use crate::definition::ElementDefinition;
use crate::element::CustomElement;
use crate::host::ElementHost;
use crate::primitive::PrimitiveCache;
use crate::scheduler::Scheduler;

/// Tag name → element definition, sharing one scheduler and primitive cache.
pub struct ElementRegistry {
    definitions: BTreeMap<String, Rc<ElementDefinition>>,
    scheduler: Rc<dyn Scheduler>,
    cache: PrimitiveCache,
}

impl ElementRegistry {
    pub fn new(scheduler: Rc<dyn Scheduler>, cache: PrimitiveCache) -> Self {
        Self {
            definitions: BTreeMap::new(),
            scheduler,
            cache,
        }
    }

    /// Define the element for a spec. A tag that is already defined is left
    /// untouched and `false` is returned.
    pub fn define(&mut self, spec: &ComponentSpec) -> bool {
        let definition = ElementDefinition::from_spec(spec);
        if self.definitions.contains_key(&definition.tag_name) {
            tracing::debug!("{} is already defined", definition.tag_name);
            return false;
        }
        self.definitions
            .insert(definition.tag_name.clone(), Rc::new(definition));
        true
    }

    pub fn get(&self, tag_name: &str) -> Option<Rc<ElementDefinition>> {
        self.definitions.get(tag_name).cloned()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Attach the element behaviour registered for the host's tag.
    pub fn upgrade(&self, host: Rc<dyn ElementHost>) -> Option<CustomElement> {
        let definition = self.get(host.tag_name())?;
        Some(CustomElement::new(
            definition,
            host,
            Rc::clone(&self.scheduler),
            self.cache.clone(),
        ))
    }
}
