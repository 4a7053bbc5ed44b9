//! Stateless helpers shared by every element.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::Value;

use crate::host::{DomEvent, ElementHost};
use crate::scheduler::{Scheduler, TaskId};

pub use aibos_spec::naming::{to_camel_case, to_kebab_case};

/// Prefix carried by every component-originated event.
pub const EVENT_PREFIX: &str = "na-";

/// Join class lists, skipping empty entries.
pub fn merge_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    classes
        .into_iter()
        .filter(|class| !class.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `null` and the literal `"false"` are false; any other value is true.
pub fn parse_boolean_attribute(value: Option<&str>) -> bool {
    !matches!(value, None | Some("false"))
}

/// Read an attribute, falling back when absent.
pub fn get_attr(host: &dyn ElementHost, name: &str, fallback: &str) -> String {
    host.get_attribute(name)
        .unwrap_or_else(|| fallback.to_string())
}

/// Set an attribute, or remove it when the value is `None` or empty.
pub fn set_attr(host: &dyn ElementHost, name: &str, value: Option<&str>) {
    match value {
        Some(value) if !value.is_empty() => host.set_attribute(name, value),
        _ => host.remove_attribute(name),
    }
}

/// kebab-case the name and guarantee the `na-` prefix exactly once.
pub fn normalize_event_name(name: &str) -> String {
    let kebab = to_kebab_case(name);
    if kebab.starts_with(EVENT_PREFIX) {
        kebab
    } else {
        format!("{}{}", EVENT_PREFIX, kebab)
    }
}

/// Dispatch a bubbling, cancelable custom event under the prefixed name.
pub fn dispatch(host: &dyn ElementHost, name: &str, detail: Value) -> bool {
    host.dispatch_event(&DomEvent::custom(normalize_event_name(name), detail))
}

/// Trailing-edge debounce over a [`Scheduler`].
///
/// Each call cancels the pending invocation and schedules the new one, so at
/// most one task is outstanding.
pub struct Debouncer {
    scheduler: Rc<dyn Scheduler>,
    pending: Rc<Cell<Option<TaskId>>>,
}

impl Debouncer {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            pending: Rc::new(Cell::new(None)),
        }
    }

    pub fn call(&self, task: impl FnOnce() + 'static) {
        self.cancel();
        let pending = Rc::clone(&self.pending);
        let id = self.scheduler.set_timeout(Box::new(move || {
            pending.set(None);
            task();
        }));
        self.pending.set(Some(id));
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.clear_timeout(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessElement;
    use crate::scheduler::TaskQueue;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;

    #[test]
    fn merges_classes_skipping_empty() {
        assert_eq!(merge_classes(["a", "", "b", "c"]), "a b c");
        assert_eq!(merge_classes(Vec::<&str>::new()), "");
    }

    #[test]
    fn parses_boolean_attributes() {
        assert!(!parse_boolean_attribute(None));
        assert!(!parse_boolean_attribute(Some("false")));
        assert!(parse_boolean_attribute(Some("")));
        assert!(parse_boolean_attribute(Some("true")));
        assert!(parse_boolean_attribute(Some("disabled")));
    }

    #[test]
    fn normalizes_event_names() {
        assert_eq!(normalize_event_name("open"), "na-open");
        assert_eq!(normalize_event_name("valueChange"), "na-value-change");
        assert_eq!(normalize_event_name("na-close"), "na-close");
        assert_eq!(
            normalize_event_name(&normalize_event_name("openChange")),
            "na-open-change"
        );
    }

    #[test]
    fn dispatch_prefixes_and_bubbles() {
        let el = HeadlessElement::new("na-dialog");
        dispatch(&*el, "valueChange", json!({ "value": 1 }));

        let events = el.dispatched();
        assert_eq!(events[0].event_type, "na-value-change");
        assert!(events[0].bubbles);
        assert!(events[0].cancelable);
        assert_eq!(events[0].detail["value"], 1);
    }

    #[test]
    fn set_attr_removes_on_empty() {
        let el = HeadlessElement::new("na-button");
        set_attr(&*el, "aria-disabled", Some("true"));
        assert_eq!(get_attr(&*el, "aria-disabled", "false"), "true");

        set_attr(&*el, "aria-disabled", None);
        assert_eq!(get_attr(&*el, "aria-disabled", "false"), "false");

        set_attr(&*el, "title", Some("x"));
        set_attr(&*el, "title", Some(""));
        assert!(el.get_attribute("title").is_none());
    }

    #[test]
    fn debounce_keeps_only_the_last_call() {
        let queue = TaskQueue::new();
        let debouncer = Debouncer::new(queue.clone());
        let calls = Rc::new(RefCell::new(Vec::new()));

        for n in 0..5 {
            let calls = Rc::clone(&calls);
            debouncer.call(move || calls.borrow_mut().push(n));
        }

        assert!(debouncer.is_pending());
        assert_eq!(queue.run_until_idle(), 1);
        assert_eq!(*calls.borrow(), vec![4]);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancelled_debounce_never_fires() {
        let queue = TaskQueue::new();
        let debouncer = Debouncer::new(queue.clone());
        let fired = Rc::new(Cell::new(false));

        let flag = Rc::clone(&fired);
        debouncer.call(move || flag.set(true));
        debouncer.cancel();

        queue.run_until_idle();
        assert!(!fired.get());
    }
}
