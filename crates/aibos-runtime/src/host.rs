//! The DOM element a custom element is attached to.
//!
//! [`ElementHost`] is the slice of the `HTMLElement` API the runtime needs.
//! [`HeadlessElement`] implements it in memory, which is enough to drive the
//! full lifecycle in tests and to snapshot an element's markup.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

/// Handle returned when registering an event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Event listener callback.
pub type Listener = Rc<dyn Fn(&DomEvent)>;

/// A dispatched event.
#[derive(Debug, Clone)]
pub struct DomEvent {
    /// Event type (e.g., `na-open`, `click`)
    pub event_type: String,
    pub detail: Value,
    pub bubbles: bool,
    pub cancelable: bool,
    /// `data-na-part` of the innermost element the event came from
    pub part: Option<String>,
    /// `KeyboardEvent.key` for keyboard events
    pub key: Option<String>,
    default_prevented: Cell<bool>,
}

impl DomEvent {
    /// A bubbling, cancelable custom event.
    pub fn custom(event_type: impl Into<String>, detail: Value) -> Self {
        Self {
            event_type: event_type.into(),
            detail,
            bubbles: true,
            cancelable: true,
            part: None,
            key: None,
            default_prevented: Cell::new(false),
        }
    }

    /// A click originating from a child marked with `data-na-part`.
    pub fn click(part: Option<&str>) -> Self {
        Self {
            part: part.map(str::to_string),
            ..Self::custom("click", Value::Null)
        }
    }

    pub fn key_down(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::custom("keydown", Value::Null)
        }
    }

    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// The element API used by the runtime.
pub trait ElementHost {
    fn tag_name(&self) -> &str;

    fn get_attribute(&self, name: &str) -> Option<String>;

    fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    fn set_attribute(&self, name: &str, value: &str);

    fn remove_attribute(&self, name: &str);

    /// Replace the `class` attribute.
    fn set_class_name(&self, value: &str);

    fn add_event_listener(&self, event_type: &str, listener: Listener) -> ListenerId;

    fn remove_event_listener(&self, id: ListenerId);

    /// Dispatch an event; returns `false` if a listener prevented its default.
    fn dispatch_event(&self, event: &DomEvent) -> bool;

    /// `document.activeElement`, identified by element id.
    fn active_element(&self) -> Option<String>;

    /// Move focus to the element with the given id.
    fn focus(&self, target: &str);
}

/// In-memory [`ElementHost`].
pub struct HeadlessElement {
    tag_name: String,
    attributes: RefCell<BTreeMap<String, String>>,
    listeners: RefCell<Vec<(ListenerId, String, Listener)>>,
    next_listener: Cell<u64>,
    dispatched: RefCell<Vec<DomEvent>>,
    class_writes: Cell<usize>,
    active_element: RefCell<Option<String>>,
}

impl HeadlessElement {
    pub fn new(tag_name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            tag_name: tag_name.into(),
            attributes: RefCell::new(BTreeMap::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            dispatched: RefCell::new(Vec::new()),
            class_writes: Cell::new(0),
            active_element: RefCell::new(None),
        })
    }

    /// Current `class` attribute, empty when unset.
    pub fn class_name(&self) -> String {
        self.get_attribute("class").unwrap_or_default()
    }

    /// Number of times the `class` attribute has been written.
    pub fn class_writes(&self) -> usize {
        self.class_writes.get()
    }

    /// Every event dispatched on this element, in order.
    pub fn dispatched(&self) -> Vec<DomEvent> {
        self.dispatched.borrow().clone()
    }

    /// Dispatched events of one type.
    pub fn events_of(&self, event_type: &str) -> Vec<DomEvent> {
        self.dispatched
            .borrow()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Set `document.activeElement` without going through a primitive.
    pub fn set_active_element(&self, id: Option<&str>) {
        *self.active_element.borrow_mut() = id.map(str::to_string);
    }

    /// Serialize the element as an empty tag with its attributes.
    pub fn outer_html(&self) -> String {
        let attributes = self.attributes.borrow();
        let mut html = format!("<{}", self.tag_name);
        for (name, value) in attributes.iter() {
            if value.is_empty() {
                html.push_str(&format!(" {}", name));
            } else {
                html.push_str(&format!(r#" {}="{}""#, name, escape_attribute(value)));
            }
        }
        html.push_str(&format!("></{}>", self.tag_name));
        html
    }
}

impl ElementHost for HeadlessElement {
    fn tag_name(&self) -> &str {
        &self.tag_name
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.attributes.borrow_mut().remove(name);
    }

    fn set_class_name(&self, value: &str) {
        self.class_writes.set(self.class_writes.get() + 1);
        self.set_attribute("class", value);
    }

    fn add_event_listener(&self, event_type: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push((id, event_type.to_string(), listener));
        id
    }

    fn remove_event_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(existing, _, _)| *existing != id);
    }

    fn dispatch_event(&self, event: &DomEvent) -> bool {
        self.dispatched.borrow_mut().push(event.clone());

        // Listeners may add or remove listeners, so call a snapshot.
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, event_type, _)| *event_type == event.event_type)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();

        for listener in matching {
            listener(event);
        }

        !event.default_prevented()
    }

    fn active_element(&self) -> Option<String> {
        self.active_element.borrow().clone()
    }

    fn focus(&self, target: &str) {
        *self.active_element.borrow_mut() = Some(target.to_string());
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn tracks_attributes_and_classes() {
        let el = HeadlessElement::new("na-button");
        el.set_attribute("variant", "primary");
        el.set_class_name("na-btn");

        assert_eq!(el.get_attribute("variant").as_deref(), Some("primary"));
        assert_eq!(el.class_name(), "na-btn");
        assert_eq!(el.class_writes(), 1);

        el.remove_attribute("variant");
        assert!(!el.has_attribute("variant"));
    }

    #[test]
    fn dispatches_to_matching_listeners_until_removed() {
        let el = HeadlessElement::new("na-button");
        let calls = Rc::new(Cell::new(0));

        let counter = Rc::clone(&calls);
        let id = el.add_event_listener("click", Rc::new(move |_: &DomEvent| counter.set(counter.get() + 1)));

        el.dispatch_event(&DomEvent::click(None));
        el.dispatch_event(&DomEvent::key_down("Enter"));
        assert_eq!(calls.get(), 1);

        el.remove_event_listener(id);
        el.dispatch_event(&DomEvent::click(None));
        assert_eq!(calls.get(), 1);
        assert_eq!(el.listener_count(), 0);
    }

    #[test]
    fn reports_prevented_default() {
        let el = HeadlessElement::new("na-button");
        el.add_event_listener("click", Rc::new(|event: &DomEvent| event.prevent_default()));

        assert!(!el.dispatch_event(&DomEvent::click(None)));
    }

    #[test]
    fn renders_outer_html() {
        let el = HeadlessElement::new("na-button");
        el.set_class_name("na-btn na-btn-primary");
        el.set_attribute("disabled", "");
        el.set_attribute("title", r#"Say "hi""#);

        assert_eq!(
            el.outer_html(),
            r#"<na-button class="na-btn na-btn-primary" disabled title="Say &quot;hi&quot;"></na-button>"#
        );
    }
}
