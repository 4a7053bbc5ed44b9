//! Identifier conventions shared by the validator, generators and runtime.

use regex::Regex;
use std::sync::LazyLock;

static PASCAL_CASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").expect("Invalid PascalCase regex"));

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*$").expect("Invalid identifier regex")
});

static CAMEL_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("Invalid camel boundary regex"));

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("Invalid separator regex"));

static KEBAB_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-([a-z0-9])").expect("Invalid kebab segment regex"));

/// Language keywords and common built-in identifiers a component may not be named after.
pub const RESERVED_NAMES: &[&str] = &[
    // Keywords
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
    // Built-ins
    "Array", "Boolean", "Component", "CustomEvent", "Date", "Document", "Element", "Error",
    "Event", "Fragment", "Function", "HTMLElement", "JSON", "Map", "Math", "Node", "Number",
    "Object", "Promise", "Proxy", "React", "Reflect", "RegExp", "Set", "String", "Symbol",
    "Window",
    // Types imported by generated custom elements
    "Cleanup", "Primitive",
];

/// `^[A-Z][a-zA-Z0-9]*$`
pub fn is_pascal_case(value: &str) -> bool {
    PASCAL_CASE_RE.is_match(value)
}

/// Valid JavaScript identifier (ASCII subset).
pub fn is_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

pub fn is_reserved(value: &str) -> bool {
    RESERVED_NAMES.contains(&value)
}

/// Convert camelCase / PascalCase / snake_case to kebab-case.
///
/// Mirrors the emitted runtime's `toKebabCase` so tag and event names agree
/// between the generators and the browser.
pub fn to_kebab_case(value: &str) -> String {
    let split = CAMEL_BOUNDARY_RE.replace_all(value, "$1-$2");
    SEPARATOR_RE.replace_all(&split, "-").to_lowercase()
}

/// Convert kebab-case to camelCase.
pub fn to_camel_case(value: &str) -> String {
    KEBAB_SEGMENT_RE
        .replace_all(value, |caps: &regex::Captures<'_>| caps[1].to_uppercase())
        .into_owned()
}

/// Convert kebab-case to PascalCase.
pub fn to_pascal_case(value: &str) -> String {
    value
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
