//! Syntax checks for generated sources.

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::AdapterError;
use crate::traits::{Framework, GeneratedComponent};

/// Dialect a generated file is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// TypeScript with JSX
    Tsx,
    /// Plain TypeScript
    Ts,
}

impl SourceKind {
    pub fn for_framework(framework: Framework) -> Self {
        match framework {
            Framework::React => Self::Tsx,
            _ => Self::Ts,
        }
    }

    fn source_type(self) -> SourceType {
        match self {
            Self::Tsx => SourceType::tsx(),
            Self::Ts => SourceType::ts(),
        }
    }
}

/// Parse `source` and return every diagnostic the parser reports.
pub fn verify_syntax(source: &str, kind: SourceKind) -> Result<(), Vec<String>> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, kind.source_type()).parse();

    let mut errors: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
    if ret.panicked && errors.is_empty() {
        errors.push("parser aborted".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a generated component for the framework it was generated for.
pub fn verify_component(
    component: &GeneratedComponent,
    framework: Framework,
) -> Result<(), AdapterError> {
    verify_syntax(&component.code, SourceKind::for_framework(framework)).map_err(|errors| {
        AdapterError::Syntax {
            component: component.name.clone(),
            framework: framework.to_string(),
            message: errors.join("; "),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterErrorKind;

    #[test]
    fn accepts_valid_sources() {
        verify_syntax("const a: number = 1;\nexport default a;\n", SourceKind::Ts).unwrap();
        verify_syntax(
            "export const A = () => <div className=\"x\">{1}</div>;\n",
            SourceKind::Tsx,
        )
        .unwrap();
    }

    #[test]
    fn jsx_is_rejected_in_plain_typescript() {
        assert!(verify_syntax("const a = <div />;\n", SourceKind::Ts).is_err());
    }

    #[test]
    fn reports_syntax_errors_as_adapter_errors() {
        let component = GeneratedComponent {
            name: "Broken".to_string(),
            code: "export function Broken( {\n".to_string(),
            imports: Vec::new(),
            dependencies: Vec::new(),
        };

        let error = verify_component(&component, Framework::WebComponents).unwrap_err();
        assert_eq!(error.kind(), AdapterErrorKind::Syntax);
        assert!(error.to_string().starts_with("Generated web-components code for Broken"));
    }
}
