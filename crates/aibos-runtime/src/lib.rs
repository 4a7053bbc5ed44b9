//! Headless runtime for aibos custom elements.
//!
//! Models the behaviour of the generated Web Components (attribute
//! observation, batched updates, lazily loaded accessibility primitives and
//! teardown) against an abstract element host and scheduler, so it can run
//! outside a browser.

pub mod definition;
pub mod element;
pub mod host;
pub mod primitive;
pub mod registry;
pub mod scheduler;
pub mod support;

pub use definition::{ElementDefinition, ElementState, UpdateKind, DEFAULT_SIZE};
pub use element::CustomElement;
pub use host::{DomEvent, ElementHost, HeadlessElement, Listener, ListenerId};
pub use primitive::{
    BuiltinPrimitives, Cleanup, LoadResult, Primitive, PrimitiveCache, PrimitiveLoadError,
    PrimitiveLoader, StandardPrimitive,
};
pub use registry::ElementRegistry;
pub use scheduler::{Scheduler, Task, TaskId, TaskQueue};
pub use support::{
    dispatch, get_attr, merge_classes, normalize_event_name, parse_boolean_attribute, set_attr,
    to_camel_case, to_kebab_case, Debouncer, EVENT_PREFIX,
};
