//! Component specification model for the aibos design system.
//!
//! A [`ComponentSpec`] declares a component's variants, states, parts, props
//! and accessibility contract independently of any target framework. This
//! crate defines the model, validates untyped input against it and loads
//! specs from disk.

pub mod loader;
pub mod naming;
pub mod types;
pub mod validate;

pub use loader::{
    load_spec_file, parse_source, CatalogEntry, CatalogError, CatalogFailure, LoadError,
    SpecCatalog, SpecFormat,
};
pub use types::{
    AccessibilitySpec, Category, Complexity, ComponentSpec, HandledBy, MetadataSpec,
    NativeElement, PartSpec, PropSpec, RadixPrimitive, StateSpec, VariantSpec, ELEMENT_PREFIX,
    ROOT_PART,
};
pub use validate::{
    revalidate, validate_spec, validate_spec_str, Rule, ValidationError, ValidationIssue,
};
