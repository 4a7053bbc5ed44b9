//! Generation errors.

use std::fmt;

use aibos_spec::ComponentSpec;

/// Errors produced while generating framework code from a spec.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Invalid spec for {component}: {reason}")]
    InvalidSpec {
        component: String,
        reason: String,
        /// The offending spec, kept for diagnostics
        spec: Option<Box<ComponentSpec>>,
    },

    #[error("{component} requires {dependency}")]
    MissingDependency { component: String, dependency: String },

    #[error("No adapter registered for framework '{framework}' (available: {available})")]
    UnsupportedFramework { framework: String, available: String },

    #[error("Generated {framework} code for {component} failed to parse: {message}")]
    Syntax {
        component: String,
        framework: String,
        message: String,
    },
}

/// Discriminant of an [`AdapterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterErrorKind {
    InvalidSpec,
    MissingDependency,
    UnsupportedFramework,
    Syntax,
}

impl AdapterErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSpec => "invalid-spec",
            Self::MissingDependency => "missing-dependency",
            Self::UnsupportedFramework => "unsupported-framework",
            Self::Syntax => "syntax",
        }
    }
}

impl fmt::Display for AdapterErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AdapterError {
    pub fn invalid_spec(spec: &ComponentSpec, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            component: spec.name.clone(),
            reason: reason.into(),
            spec: Some(Box::new(spec.clone())),
        }
    }

    pub fn kind(&self) -> AdapterErrorKind {
        match self {
            Self::InvalidSpec { .. } => AdapterErrorKind::InvalidSpec,
            Self::MissingDependency { .. } => AdapterErrorKind::MissingDependency,
            Self::UnsupportedFramework { .. } => AdapterErrorKind::UnsupportedFramework,
            Self::Syntax { .. } => AdapterErrorKind::Syntax,
        }
    }

    /// Component the error is tied to, if any.
    pub fn component(&self) -> Option<&str> {
        match self {
            Self::InvalidSpec { component, .. }
            | Self::MissingDependency { component, .. }
            | Self::Syntax { component, .. } => Some(component),
            Self::UnsupportedFramework { .. } => None,
        }
    }
}
