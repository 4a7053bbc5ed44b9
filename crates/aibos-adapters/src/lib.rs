//! Framework code generators for aibos component specs.
//!
//! A validated [`aibos_spec::ComponentSpec`] is turned into source for a
//! target framework by the adapter registered for it in an
//! [`AdapterRegistry`].

pub mod error;
pub mod react;
pub mod registry;
pub mod runtime_module;
pub mod traits;
pub mod ts;
pub mod verify;
pub mod web_component;

pub use error::{AdapterError, AdapterErrorKind};
pub use react::ReactAdapter;
pub use registry::AdapterRegistry;
pub use runtime_module::{runtime_module_source, RUNTIME_EXPORTS, RUNTIME_MODULE};
pub use traits::{AdapterConfig, Framework, FrameworkAdapter, GeneratedComponent, SupportFile};
pub use verify::{verify_component, verify_syntax, SourceKind};
pub use web_component::WebComponentAdapter;
