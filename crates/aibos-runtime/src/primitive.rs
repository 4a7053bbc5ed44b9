//! Lazily loaded accessibility primitives.
//!
//! Elements backed by a primitive (focus trap, ARIA wiring, escape handling)
//! load it on connect. Loads go through a [`PrimitiveCache`] shared by every
//! element on the page, so concurrent connects of the same primitive share a
//! single in-flight load. The cache is created once when the page (or
//! process) starts, is append-only and lives until it is dropped with the
//! page.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use aibos_spec::RadixPrimitive;

use crate::host::{DomEvent, ElementHost};

/// Undo callback returned by primitive setup functions.
pub type Cleanup = Box<dyn FnOnce()>;

/// Behaviour module an element delegates accessibility wiring to.
pub trait Primitive {
    fn name(&self) -> &str;

    /// Apply the role and ARIA attributes for the host.
    fn setup_aria(&self, host: &Rc<dyn ElementHost>, role: Option<&str>);

    /// Keep focus within the host until the returned cleanup runs.
    fn trap_focus(&self, host: &Rc<dyn ElementHost>) -> Cleanup;

    /// Call `handler` when Escape is pressed inside the host.
    fn on_escape(&self, host: &Rc<dyn ElementHost>, handler: Rc<dyn Fn()>) -> Cleanup;

    /// Return focus to the element that had it before the host opened.
    fn restore_focus(&self, host: &Rc<dyn ElementHost>, target: &str);
}

/// A primitive module failed to load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitiveLoadError {
    #[error("Unknown primitive: {0}")]
    NotFound(String),

    #[error("Failed to load primitive {name}: {message}")]
    Failed { name: String, message: String },
}

pub type LoadResult = Result<Rc<dyn Primitive>, PrimitiveLoadError>;

/// Resolves a primitive name to its module.
pub trait PrimitiveLoader {
    fn load(&self, name: &str) -> LocalBoxFuture<'static, LoadResult>;
}

type SharedLoad = Shared<LocalBoxFuture<'static, LoadResult>>;

/// Page-wide cache of primitive loads keyed by primitive name.
#[derive(Clone)]
pub struct PrimitiveCache {
    loader: Rc<dyn PrimitiveLoader>,
    entries: Rc<RefCell<HashMap<String, SharedLoad>>>,
}

impl PrimitiveCache {
    pub fn new(loader: Rc<dyn PrimitiveLoader>) -> Self {
        Self {
            loader,
            entries: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Cache backed by [`BuiltinPrimitives`].
    pub fn builtin() -> Self {
        Self::new(Rc::new(BuiltinPrimitives))
    }

    /// Load a primitive, joining an in-flight load when there is one.
    ///
    /// Failed loads stay cached like successful ones.
    pub async fn load(&self, name: &str) -> LoadResult {
        let load = {
            let mut entries = self.entries.borrow_mut();
            entries
                .entry(name.to_string())
                .or_insert_with(|| {
                    tracing::debug!("Loading primitive {}", name);
                    self.loader.load(name).shared()
                })
                .clone()
        };
        load.await
    }

    /// Whether a load for `name` has been started.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Loader over the enumerated primitive set, all served by [`StandardPrimitive`].
pub struct BuiltinPrimitives;

impl PrimitiveLoader for BuiltinPrimitives {
    fn load(&self, name: &str) -> LocalBoxFuture<'static, LoadResult> {
        let result: LoadResult = match RadixPrimitive::parse(name) {
            Some(primitive) => Ok(Rc::new(StandardPrimitive::new(primitive))),
            None => Err(PrimitiveLoadError::NotFound(name.to_string())),
        };
        futures::future::ready(result).boxed_local()
    }
}

/// Default behaviour for a primitive on a headless host.
pub struct StandardPrimitive {
    primitive: RadixPrimitive,
}

impl StandardPrimitive {
    pub fn new(primitive: RadixPrimitive) -> Self {
        Self { primitive }
    }

    fn is_modal(&self) -> bool {
        matches!(self.primitive, RadixPrimitive::Dialog | RadixPrimitive::AlertDialog)
    }
}

impl Primitive for StandardPrimitive {
    fn name(&self) -> &str {
        self.primitive.as_str()
    }

    fn setup_aria(&self, host: &Rc<dyn ElementHost>, role: Option<&str>) {
        if let Some(role) = role {
            host.set_attribute("role", role);
        }
        if self.is_modal() {
            host.set_attribute("aria-modal", "true");
        }
    }

    fn trap_focus(&self, host: &Rc<dyn ElementHost>) -> Cleanup {
        host.set_attribute("data-focus-trapped", "");
        let host = Rc::clone(host);
        Box::new(move || host.remove_attribute("data-focus-trapped"))
    }

    fn on_escape(&self, host: &Rc<dyn ElementHost>, handler: Rc<dyn Fn()>) -> Cleanup {
        let id = host.add_event_listener(
            "keydown",
            Rc::new(move |event: &DomEvent| {
                if event.key.as_deref() == Some("Escape") {
                    handler();
                }
            }),
        );
        let host = Rc::clone(host);
        Box::new(move || host.remove_event_listener(id))
    }

    fn restore_focus(&self, host: &Rc<dyn ElementHost>, target: &str) {
        host.focus(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessElement;
    use std::cell::Cell;

    struct CountingLoader {
        calls: Rc<Cell<usize>>,
    }

    impl PrimitiveLoader for CountingLoader {
        fn load(&self, name: &str) -> LocalBoxFuture<'static, LoadResult> {
            self.calls.set(self.calls.get() + 1);
            BuiltinPrimitives.load(name)
        }
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_request() {
        let calls = Rc::new(Cell::new(0));
        let cache = PrimitiveCache::new(Rc::new(CountingLoader {
            calls: Rc::clone(&calls),
        }));

        let (a, b) = futures::join!(cache.load("dialog"), cache.load("dialog"));
        let c = cache.load("dialog").await;

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let calls = Rc::new(Cell::new(0));
        let cache = PrimitiveCache::new(Rc::new(CountingLoader {
            calls: Rc::clone(&calls),
        }));
        let other = cache.clone();

        cache.load("tooltip").await.unwrap();
        other.load("tooltip").await.unwrap();
        other.load("popover").await.unwrap();

        assert_eq!(calls.get(), 2);
        assert!(cache.contains("popover"));
    }

    #[tokio::test]
    async fn failures_are_cached() {
        let calls = Rc::new(Cell::new(0));
        let cache = PrimitiveCache::new(Rc::new(CountingLoader {
            calls: Rc::clone(&calls),
        }));

        let first = cache.load("teleport").await;
        let second = cache.load("teleport").await;

        assert!(matches!(first, Err(PrimitiveLoadError::NotFound(ref n)) if n == "teleport"));
        assert!(second.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn standard_primitive_wires_host() {
        let el = HeadlessElement::new("na-dialog");
        let host: Rc<dyn ElementHost> = el.clone();
        let primitive = StandardPrimitive::new(RadixPrimitive::Dialog);

        primitive.setup_aria(&host, Some("dialog"));
        assert_eq!(el.get_attribute("role").as_deref(), Some("dialog"));
        assert_eq!(el.get_attribute("aria-modal").as_deref(), Some("true"));

        let release = primitive.trap_focus(&host);
        assert!(el.has_attribute("data-focus-trapped"));
        release();
        assert!(!el.has_attribute("data-focus-trapped"));

        let escaped = Rc::new(Cell::new(0));
        let counter = Rc::clone(&escaped);
        let remove = primitive.on_escape(&host, Rc::new(move || counter.set(counter.get() + 1)));
        el.dispatch_event(&DomEvent::key_down("Escape"));
        el.dispatch_event(&DomEvent::key_down("Enter"));
        remove();
        el.dispatch_event(&DomEvent::key_down("Escape"));
        assert_eq!(escaped.get(), 1);

        primitive.restore_focus(&host, "open-button");
        assert_eq!(el.active_element().as_deref(), Some("open-button"));
    }
}
