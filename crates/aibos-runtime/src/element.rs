//! Custom element lifecycle.
//!
//! [`CustomElement`] is the behaviour the Web Component generator emits,
//! driven over an [`ElementHost`]. It renders into the light DOM only: the
//! class attribute is replaced wholesale on each flush so it always reflects
//! the current state, and every attribute change between two scheduler turns
//! lands in a single flush.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

use serde_json::{json, Value};

use crate::definition::{ElementDefinition, ElementState, UpdateKind, DEFAULT_SIZE};
use crate::host::{DomEvent, ElementHost, ListenerId};
use crate::primitive::{Cleanup, Primitive, PrimitiveCache};
use crate::scheduler::Scheduler;
use crate::support::{self, parse_boolean_attribute, set_attr, Debouncer};

struct ElementCore {
    definition: Rc<ElementDefinition>,
    host: Rc<dyn ElementHost>,
    cache: PrimitiveCache,
    debouncer: Debouncer,
    state: RefCell<ElementState>,
    pending: RefCell<BTreeSet<UpdateKind>>,
    listeners: RefCell<Vec<ListenerId>>,
    cleanups: RefCell<Vec<Cleanup>>,
    focus_trap: RefCell<Option<Cleanup>>,
    primitive: RefCell<Option<Rc<dyn Primitive>>>,
    previous_focus: RefCell<Option<String>>,
    connected: Cell<bool>,
    /// Bumped on every connect and disconnect so a stale primitive load is ignored.
    generation: Cell<u64>,
}

/// A live custom element instance. Clones share the same instance.
#[derive(Clone)]
pub struct CustomElement {
    core: Rc<ElementCore>,
}

impl CustomElement {
    pub fn new(
        definition: Rc<ElementDefinition>,
        host: Rc<dyn ElementHost>,
        scheduler: Rc<dyn Scheduler>,
        cache: PrimitiveCache,
    ) -> Self {
        let state = definition.initial_state();
        Self {
            core: Rc::new(ElementCore {
                definition,
                host,
                cache,
                debouncer: Debouncer::new(scheduler),
                state: RefCell::new(state),
                pending: RefCell::new(BTreeSet::new()),
                listeners: RefCell::new(Vec::new()),
                cleanups: RefCell::new(Vec::new()),
                focus_trap: RefCell::new(None),
                primitive: RefCell::new(None),
                previous_focus: RefCell::new(None),
                connected: Cell::new(false),
                generation: Cell::new(0),
            }),
        }
    }

    fn upgrade(weak: &Weak<ElementCore>) -> Option<Self> {
        weak.upgrade().map(|core| Self { core })
    }

    pub fn definition(&self) -> &ElementDefinition {
        &self.core.definition
    }

    pub fn host(&self) -> &Rc<dyn ElementHost> {
        &self.core.host
    }

    pub fn state(&self) -> ElementState {
        self.core.state.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.core.connected.get()
    }

    pub fn observed_attributes(&self) -> Vec<&'static str> {
        self.core.definition.observed_attributes()
    }

    /// Update kinds waiting for the next flush.
    pub fn pending_updates(&self) -> Vec<UpdateKind> {
        self.core.pending.borrow().iter().copied().collect()
    }

    /// Attach to the document: read attributes, load the primitive and render.
    ///
    /// Never fails. A primitive that cannot be loaded leaves the element
    /// rendered with a bare role and reported through an `na-error` event.
    pub async fn connected_callback(&self) {
        let core = &self.core;
        let generation = core.generation.get() + 1;
        core.generation.set(generation);
        core.connected.set(true);

        self.read_attributes();
        self.track_click_listener();

        let Some(name) = core.definition.primitive.clone() else {
            self.setup_component_fallback();
            return;
        };

        let result = core.cache.load(&name).await;
        if !core.connected.get() || core.generation.get() != generation {
            tracing::debug!("{} disconnected while loading {}", core.definition.tag_name, name);
            return;
        }

        match result {
            Ok(primitive) => self.setup_component(primitive),
            Err(error) => {
                tracing::warn!(
                    "{}: primitive {} unavailable, using fallback: {}",
                    core.definition.tag_name,
                    name,
                    error
                );
                self.setup_component_fallback();
                self.dispatch(
                    "error",
                    json!({ "error": error.to_string(), "source": format!("primitive:{}", name) }),
                );
            }
        }
    }

    /// Detach from the document and release everything the element holds.
    pub fn disconnected_callback(&self) {
        let core = &self.core;
        core.connected.set(false);
        core.generation.set(core.generation.get() + 1);

        core.debouncer.cancel();
        core.pending.borrow_mut().clear();

        let listeners = std::mem::take(&mut *core.listeners.borrow_mut());
        for id in listeners {
            core.host.remove_event_listener(id);
        }

        let cleanups = std::mem::take(&mut *core.cleanups.borrow_mut());
        for cleanup in cleanups {
            cleanup();
        }
        self.release_focus_trap();

        core.primitive.borrow_mut().take();
        core.previous_focus.borrow_mut().take();
    }

    pub fn attribute_changed_callback(&self, name: &str, old: Option<&str>, new: Option<&str>) {
        if old == new || !self.observed_attributes().contains(&name) {
            return;
        }

        {
            let definition = &self.core.definition;
            let mut state = self.core.state.borrow_mut();
            match name {
                "variant" => {
                    state.variant = new.unwrap_or(definition.default_variant.as_str()).to_string()
                }
                "size" => state.size = new.unwrap_or(DEFAULT_SIZE).to_string(),
                "disabled" => state.disabled = parse_boolean_attribute(new),
                "loading" => state.loading = parse_boolean_attribute(new),
                "open" => state.open = parse_boolean_attribute(new),
                _ => {}
            }
        }

        for kind in UpdateKind::for_attribute(name) {
            self.schedule_update(*kind);
        }
    }

    /// Set an attribute on the host and notify the element, as the browser does.
    pub fn set_attribute(&self, name: &str, value: &str) {
        let old = self.core.host.get_attribute(name);
        self.core.host.set_attribute(name, value);
        self.attribute_changed_callback(name, old.as_deref(), Some(value));
    }

    pub fn remove_attribute(&self, name: &str) {
        let old = self.core.host.get_attribute(name);
        self.core.host.remove_attribute(name);
        self.attribute_changed_callback(name, old.as_deref(), None);
    }

    fn schedule_update(&self, kind: UpdateKind) {
        let core = &self.core;
        if !core.connected.get() {
            return;
        }
        core.pending.borrow_mut().insert(kind);
        if core.debouncer.is_pending() {
            return;
        }
        let weak = Rc::downgrade(core);
        core.debouncer.call(move || {
            if let Some(element) = Self::upgrade(&weak) {
                element.flush();
            }
        });
    }

    /// Apply every pending update in order, then clear the set.
    pub fn flush(&self) {
        let updates = std::mem::take(&mut *self.core.pending.borrow_mut());
        if updates.is_empty() {
            return;
        }
        tracing::debug!(
            "{}: flushing {}",
            self.core.definition.tag_name,
            updates.iter().map(UpdateKind::as_str).collect::<Vec<_>>().join(", ")
        );
        for kind in updates {
            match kind {
                UpdateKind::Classes => self.render_classes(),
                UpdateKind::Attributes => self.render_attributes(),
                UpdateKind::Component => self.update_component(),
            }
        }
    }

    /// Open a composite element.
    pub fn open(&self) {
        let core = &self.core;
        if !core.definition.composite {
            return;
        }
        core.state.borrow_mut().open = true;
        self.set_attribute("open", "");
        self.dispatch(
            "open",
            json!({ "open": true, "timestamp": chrono::Utc::now().timestamp_millis() }),
        );
        *core.previous_focus.borrow_mut() = core.host.active_element();
        self.trap_focus();
    }

    /// Close a composite element, returning focus to where it was before opening.
    pub fn close(&self, reason: &str) {
        let core = &self.core;
        if !core.definition.composite {
            return;
        }
        core.state.borrow_mut().open = false;
        self.remove_attribute("open");
        self.dispatch("close", json!({ "reason": reason }));
        self.release_focus_trap();

        let primitive = core.primitive.borrow().clone();
        let previous = core.previous_focus.borrow_mut().take();
        if let (Some(primitive), Some(previous)) = (primitive, previous) {
            primitive.restore_focus(&core.host, &previous);
        }
    }

    /// Dispatch a prefixed, bubbling custom event from the host.
    pub fn dispatch(&self, name: &str, detail: Value) -> bool {
        support::dispatch(&*self.core.host, name, detail)
    }

    fn read_attributes(&self) {
        let core = &self.core;
        let host = &core.host;
        let mut state = core.state.borrow_mut();
        state.variant = host
            .get_attribute("variant")
            .unwrap_or_else(|| core.definition.default_variant.clone());
        state.size = host
            .get_attribute("size")
            .unwrap_or_else(|| DEFAULT_SIZE.to_string());
        state.disabled = parse_boolean_attribute(host.get_attribute("disabled").as_deref());
        state.loading = parse_boolean_attribute(host.get_attribute("loading").as_deref());
        if core.definition.composite {
            state.open = parse_boolean_attribute(host.get_attribute("open").as_deref());
        }
    }

    fn track_click_listener(&self) {
        let weak = Rc::downgrade(&self.core);
        let composite = self.core.definition.composite;
        let id = self.core.host.add_event_listener(
            "click",
            Rc::new(move |event: &DomEvent| {
                let Some(element) = Self::upgrade(&weak) else {
                    return;
                };
                if composite {
                    match event.part.as_deref() {
                        Some("trigger") if element.state().open => element.close("trigger"),
                        Some("trigger") => element.open(),
                        Some("close") => element.close("close-button"),
                        _ => {}
                    }
                } else {
                    let state = element.state();
                    if state.disabled || state.loading {
                        event.prevent_default();
                    }
                }
            }),
        );
        self.core.listeners.borrow_mut().push(id);
    }

    fn setup_component(&self, primitive: Rc<dyn Primitive>) {
        let core = &self.core;
        primitive.setup_aria(&core.host, core.definition.role.as_deref());
        *core.primitive.borrow_mut() = Some(Rc::clone(&primitive));

        if core.definition.composite {
            let weak = Rc::downgrade(core);
            let cleanup = primitive.on_escape(
                &core.host,
                Rc::new(move || {
                    if let Some(element) = Self::upgrade(&weak) {
                        if element.state().open {
                            element.close("escape");
                        }
                    }
                }),
            );
            core.cleanups.borrow_mut().push(cleanup);
        }

        if core.state.borrow().open {
            self.trap_focus();
        }
        self.render();
    }

    fn setup_component_fallback(&self) {
        if let Some(role) = &self.core.definition.role {
            self.core.host.set_attribute("role", role);
        }
        self.render();
    }

    fn render(&self) {
        self.render_classes();
        self.render_attributes();
    }

    fn render_classes(&self) {
        let classes = self.core.definition.resolve_classes(&self.core.state.borrow());
        self.core.host.set_class_name(&classes);
    }

    fn render_attributes(&self) {
        let state = self.state();
        let host = &*self.core.host;
        set_attr(host, "aria-disabled", (state.disabled || state.loading).then_some("true"));
        if self.core.definition.composite {
            set_attr(host, "aria-hidden", (!state.open).then_some("true"));
        }
    }

    fn update_component(&self) {
        if self.core.state.borrow().open {
            self.trap_focus();
        } else {
            self.release_focus_trap();
        }
    }

    fn trap_focus(&self) {
        let core = &self.core;
        if core.focus_trap.borrow().is_some() {
            return;
        }
        let primitive = core.primitive.borrow().clone();
        if let Some(primitive) = primitive {
            let cleanup = primitive.trap_focus(&core.host);
            *core.focus_trap.borrow_mut() = Some(cleanup);
        }
    }

    fn release_focus_trap(&self) {
        let cleanup = self.core.focus_trap.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessElement;
    use crate::primitive::{BuiltinPrimitives, LoadResult, PrimitiveLoadError, PrimitiveLoader};
    use crate::scheduler::TaskQueue;
    use aibos_spec::ComponentSpec;
    use futures::future::{FutureExt, LocalBoxFuture};
    use pretty_assertions::assert_eq;

    fn button() -> ComponentSpec {
        serde_json::from_value(json!({
            "name": "Button",
            "radixPrimitive": null,
            "nativeElement": "button",
            "props": {},
            "variants": {
                "primary": { "aibosClasses": ["na-btn", "na-btn-primary"] },
                "secondary": { "aibosClasses": ["na-btn", "na-btn-secondary"] }
            },
            "states": {
                "disabled": { "aibosClasses": ["opacity-50", "cursor-not-allowed"] }
            }
        }))
        .unwrap()
    }

    fn dialog() -> ComponentSpec {
        serde_json::from_value(json!({
            "name": "Dialog",
            "radixPrimitive": "dialog",
            "props": {},
            "variants": { "default": { "aibosClasses": ["na-dialog"] } },
            "parts": {
                "Root": { "aibosClasses": [] },
                "Trigger": { "aibosClasses": ["na-dialog-trigger"] },
                "Content": { "aibosClasses": ["na-dialog-content"] }
            }
        }))
        .unwrap()
    }

    struct Fixture {
        host: Rc<HeadlessElement>,
        queue: Rc<TaskQueue>,
        element: CustomElement,
    }

    fn mount(spec: &ComponentSpec, cache: PrimitiveCache) -> Fixture {
        let definition = Rc::new(ElementDefinition::from_spec(spec));
        let host = HeadlessElement::new(definition.tag_name.clone());
        let queue = TaskQueue::new();
        let element = CustomElement::new(definition, host.clone(), queue.clone(), cache);
        Fixture {
            host,
            queue,
            element,
        }
    }

    struct FailingLoader;

    impl PrimitiveLoader for FailingLoader {
        fn load(&self, name: &str) -> LocalBoxFuture<'static, LoadResult> {
            let error = PrimitiveLoadError::Failed {
                name: name.to_string(),
                message: "network error".to_string(),
            };
            futures::future::ready(Err(error)).boxed_local()
        }
    }

    struct CountingLoader {
        calls: Rc<Cell<usize>>,
    }

    impl PrimitiveLoader for CountingLoader {
        fn load(&self, name: &str) -> LocalBoxFuture<'static, LoadResult> {
            self.calls.set(self.calls.get() + 1);
            BuiltinPrimitives.load(name)
        }
    }

    struct GatedLoader {
        gate: RefCell<Option<futures::channel::oneshot::Receiver<()>>>,
    }

    impl PrimitiveLoader for GatedLoader {
        fn load(&self, name: &str) -> LocalBoxFuture<'static, LoadResult> {
            let gate = self.gate.borrow_mut().take();
            let name = name.to_string();
            async move {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                BuiltinPrimitives.load(&name).await
            }
            .boxed_local()
        }
    }

    #[tokio::test]
    async fn disabled_button_classes_follow_attribute() {
        let Fixture {
            host,
            queue,
            element,
        } = mount(&button(), PrimitiveCache::builtin());
        element.connected_callback().await;
        assert_eq!(host.class_name(), "na-btn na-btn-primary");
        assert_eq!(host.get_attribute("role").as_deref(), Some("button"));

        element.set_attribute("disabled", "");
        assert_eq!(host.class_name(), "na-btn na-btn-primary");

        queue.run_until_idle();
        assert_eq!(
            host.class_name(),
            "na-btn na-btn-primary opacity-50 cursor-not-allowed"
        );
        assert_eq!(host.get_attribute("aria-disabled").as_deref(), Some("true"));

        element.remove_attribute("disabled");
        queue.run_until_idle();
        assert_eq!(host.class_name(), "na-btn na-btn-primary");
        assert_eq!(host.get_attribute("aria-disabled"), None);
    }

    #[tokio::test]
    async fn coalesces_changes_into_one_flush() {
        let Fixture {
            host,
            queue,
            element,
        } = mount(&button(), PrimitiveCache::builtin());
        element.connected_callback().await;
        assert_eq!(host.class_writes(), 1);

        element.set_attribute("variant", "secondary");
        element.set_attribute("size", "lg");
        element.set_attribute("disabled", "");
        element.set_attribute("loading", "");
        element.remove_attribute("disabled");

        assert_eq!(
            element.pending_updates(),
            vec![UpdateKind::Classes, UpdateKind::Attributes]
        );
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_until_idle(), 1);
        assert_eq!(host.class_writes(), 2);
        assert_eq!(host.class_name(), "na-btn na-btn-secondary");
        assert_eq!(host.get_attribute("aria-disabled").as_deref(), Some("true"));
        assert_eq!(element.state().size, "lg");
        assert!(element.pending_updates().is_empty());
    }

    #[tokio::test]
    async fn unchanged_values_schedule_nothing() {
        let Fixture { queue, element, .. } = mount(&button(), PrimitiveCache::builtin());
        element.connected_callback().await;

        element.set_attribute("variant", "secondary");
        queue.run_until_idle();

        element.set_attribute("variant", "secondary");
        element.attribute_changed_callback("title", None, Some("x"));
        assert_eq!(queue.pending(), 0);
    }

    #[tokio::test]
    async fn reads_initial_attributes_on_connect() {
        let Fixture { host, element, .. } = mount(&button(), PrimitiveCache::builtin());
        element.set_attribute("variant", "secondary");
        element.set_attribute("disabled", "");
        element.connected_callback().await;

        assert_eq!(
            host.class_name(),
            "na-btn na-btn-secondary opacity-50 cursor-not-allowed"
        );
        assert!(!host.dispatch_event(&DomEvent::click(None)));
    }

    #[tokio::test]
    async fn dialog_open_and_close() {
        let Fixture {
            host,
            queue,
            element,
        } = mount(&dialog(), PrimitiveCache::builtin());
        element.connected_callback().await;
        assert_eq!(host.get_attribute("role").as_deref(), Some("dialog"));
        assert_eq!(host.get_attribute("aria-modal").as_deref(), Some("true"));
        assert_eq!(host.get_attribute("aria-hidden").as_deref(), Some("true"));

        host.set_active_element(Some("open-button"));
        element.open();
        assert!(host.has_attribute("open"));
        assert!(host.has_attribute("data-focus-trapped"));
        let opened = host.events_of("na-open");
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].detail["open"], true);
        assert!(opened[0].detail["timestamp"].is_i64());

        queue.run_until_idle();
        assert_eq!(host.get_attribute("aria-hidden"), None);

        host.set_active_element(Some("dialog-input"));
        element.close("api");
        assert!(!host.has_attribute("open"));
        assert!(!host.has_attribute("data-focus-trapped"));
        assert_eq!(host.events_of("na-close")[0].detail["reason"], "api");
        assert_eq!(host.active_element().as_deref(), Some("open-button"));

        queue.run_until_idle();
        assert_eq!(host.get_attribute("aria-hidden").as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn trigger_click_and_escape_toggle_dialog() {
        let Fixture { host, element, .. } = mount(&dialog(), PrimitiveCache::builtin());
        element.connected_callback().await;

        host.dispatch_event(&DomEvent::click(Some("trigger")));
        assert!(element.state().open);

        host.dispatch_event(&DomEvent::key_down("Escape"));
        assert!(!element.state().open);
        assert_eq!(host.events_of("na-close")[0].detail["reason"], "escape");

        host.dispatch_event(&DomEvent::click(Some("trigger")));
        host.dispatch_event(&DomEvent::click(Some("close")));
        assert_eq!(host.events_of("na-close")[1].detail["reason"], "close-button");
    }

    #[tokio::test]
    async fn disconnect_tears_everything_down() {
        let Fixture {
            host,
            queue,
            element,
        } = mount(&dialog(), PrimitiveCache::builtin());
        element.connected_callback().await;
        element.open();
        assert!(host.listener_count() > 0);
        assert!(!element.pending_updates().is_empty());

        element.disconnected_callback();
        assert_eq!(host.listener_count(), 0);
        assert!(!host.has_attribute("data-focus-trapped"));
        assert_eq!(queue.run_until_idle(), 0);

        let writes = host.class_writes();
        element.flush();
        element.set_attribute("variant", "default");
        assert_eq!(queue.pending(), 0);
        assert_eq!(host.class_writes(), writes);
    }

    #[tokio::test]
    async fn failed_primitive_falls_back() {
        let Fixture { host, element, .. } =
            mount(&dialog(), PrimitiveCache::new(Rc::new(FailingLoader)));
        element.connected_callback().await;

        assert_eq!(host.get_attribute("role").as_deref(), Some("dialog"));
        assert_eq!(host.get_attribute("aria-modal"), None);
        assert_eq!(host.class_name(), "na-dialog");

        let errors = host.events_of("na-error");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].detail["source"], "primitive:dialog");
        assert_eq!(
            errors[0].detail["error"],
            "Failed to load primitive dialog: network error"
        );

        element.open();
        assert!(host.has_attribute("open"));
        assert!(!host.has_attribute("data-focus-trapped"));
    }

    #[tokio::test]
    async fn elements_share_primitive_loads() {
        let calls = Rc::new(Cell::new(0));
        let cache = PrimitiveCache::new(Rc::new(CountingLoader {
            calls: Rc::clone(&calls),
        }));
        let first = mount(&dialog(), cache.clone());
        let second = mount(&dialog(), cache);

        futures::join!(
            first.element.connected_callback(),
            second.element.connected_callback()
        );

        assert_eq!(calls.get(), 1);
        assert_eq!(first.host.get_attribute("aria-modal").as_deref(), Some("true"));
        assert_eq!(second.host.get_attribute("aria-modal").as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn disconnect_during_load_skips_setup() {
        let (release, gate) = futures::channel::oneshot::channel();
        let cache = PrimitiveCache::new(Rc::new(GatedLoader {
            gate: RefCell::new(Some(gate)),
        }));
        let Fixture { host, element, .. } = mount(&dialog(), cache);

        futures::join!(element.connected_callback(), async {
            element.disconnected_callback();
            release.send(()).unwrap();
        });

        assert_eq!(host.get_attribute("role"), None);
        assert_eq!(host.class_writes(), 0);
        assert_eq!(host.listener_count(), 0);
    }
}
