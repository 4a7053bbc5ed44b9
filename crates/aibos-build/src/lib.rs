//! Batch pipeline for aibos component specs.
//!
//! Loads every spec under a directory, generates code for each requested
//! framework and writes it together with a manifest, API docs and the
//! component stylesheet.

pub mod assets;
pub mod builder;
pub mod templates;
pub mod watcher;

pub use assets::{component_stylesheet, minify_css, ClassIndex};
pub use builder::{BuildConfig, BuildError, BuildFailure, BuildResult, Builder, Manifest};
pub use templates::{ComponentDoc, DocsRenderer, NavItem};
pub use watcher::{SpecEvent, SpecWatcher};
