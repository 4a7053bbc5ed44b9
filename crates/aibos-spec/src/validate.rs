//! Component specification validation.
//!
//! Validation walks the untyped JSON value and records every violated rule
//! before attempting to build a [`ComponentSpec`], so a single call reports
//! all problems in a spec at once.

use serde_json::{Map, Value};

use crate::naming::{is_identifier, is_pascal_case, is_reserved};
use crate::types::{
    Category, Complexity, ComponentSpec, HandledBy, NativeElement, RadixPrimitive, ROOT_PART,
};

/// The rule a validation issue violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value has the wrong JSON type
    Type,
    /// A required field is absent
    Required,
    /// Field is not part of the schema
    UnknownField,
    /// Component, part or primitive member is not PascalCase
    PascalCase,
    /// Component name collides with a keyword or built-in
    ReservedName,
    /// Prop name is not a valid identifier
    Identifier,
    /// Variant key contains characters unusable as a class map key
    VariantName,
    /// Value is not a member of a closed enumeration
    Enum,
    /// Empty string where text is required
    EmptyString,
    /// No variants declared
    EmptyVariants,
    /// Variant or part declares no classes
    EmptyClasses,
    /// Composite component without a `Root` part
    MissingRootPart,
    /// Composite component without a primitive
    CompositeWithoutPrimitive,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Type => "type",
            Rule::Required => "required",
            Rule::UnknownField => "unknown-field",
            Rule::PascalCase => "pascal-case",
            Rule::ReservedName => "reserved-name",
            Rule::Identifier => "identifier",
            Rule::VariantName => "variant-name",
            Rule::Enum => "enum",
            Rule::EmptyString => "empty-string",
            Rule::EmptyVariants => "empty-variants",
            Rule::EmptyClasses => "empty-classes",
            Rule::MissingRootPart => "missing-root-part",
            Rule::CompositeWithoutPrimitive => "composite-without-primitive",
        }
    }
}

/// One violated rule, qualified by the path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path (e.g., `variants.primary.aibosClasses`)
    pub path: String,
    pub rule: Rule,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        write!(f, "{}: {} [{}]", path, self.message, self.rule.as_str())
    }
}

/// Aggregated validation failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", render_error(.component.as_deref(), .issues))]
pub struct ValidationError {
    /// Component name, when one could be read
    pub component: Option<String>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    /// Whether any issue violates `rule`.
    pub fn has_rule(&self, rule: Rule) -> bool {
        self.issues.iter().any(|issue| issue.rule == rule)
    }

    /// Issues reported for an exact path.
    pub fn issues_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.path == path)
    }
}

fn render_error(component: Option<&str>, issues: &[ValidationIssue]) -> String {
    let subject = component
        .map(|name| format!("Component spec '{}'", name))
        .unwrap_or_else(|| "Component spec".to_string());
    let lines = issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{} failed validation with {} issue(s):\n{}", subject, issues.len(), lines)
}

/// Validate an untyped value and build the typed spec.
pub fn validate_spec(value: &Value) -> Result<ComponentSpec, ValidationError> {
    let mut checker = Checker::default();
    checker.check_root(value);

    let component = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string);

    if !checker.issues.is_empty() {
        return Err(ValidationError {
            component,
            issues: checker.issues,
        });
    }

    serde_json::from_value(value.clone()).map_err(|e| ValidationError {
        component,
        issues: vec![ValidationIssue {
            path: String::new(),
            rule: Rule::Type,
            message: e.to_string(),
        }],
    })
}

/// Validate a JSON document.
pub fn validate_spec_str(source: &str) -> Result<ComponentSpec, ValidationError> {
    let value: Value = serde_json::from_str(source).map_err(|e| ValidationError {
        component: None,
        issues: vec![ValidationIssue {
            path: String::new(),
            rule: Rule::Type,
            message: format!("invalid JSON: {}", e),
        }],
    })?;
    validate_spec(&value)
}

/// Re-check a typed spec, e.g. one assembled in code rather than parsed.
pub fn revalidate(spec: &ComponentSpec) -> Result<(), ValidationError> {
    let value = serde_json::to_value(spec).map_err(|e| ValidationError {
        component: Some(spec.name.clone()),
        issues: vec![ValidationIssue {
            path: String::new(),
            rule: Rule::Type,
            message: e.to_string(),
        }],
    })?;
    validate_spec(&value).map(|_| ())
}

const ROOT_FIELDS: &[&str] = &[
    "$schema",
    "name",
    "description",
    "radixPrimitive",
    "nativeElement",
    "props",
    "variants",
    "states",
    "parts",
    "accessibility",
    "metadata",
];
const PROP_FIELDS: &[&str] = &["type", "default", "required", "description"];
const VARIANT_FIELDS: &[&str] = &["aibosClasses", "description"];
const STATE_FIELDS: &[&str] = &["aibosClasses", "css", "description"];
const PART_FIELDS: &[&str] = &["radixComponent", "aibosClasses", "description"];
const ACCESSIBILITY_FIELDS: &[&str] = &["handledBy", "aria", "keyboard", "features"];
const METADATA_FIELDS: &[&str] = &["category", "tags", "related", "complexity"];

#[derive(Default)]
struct Checker {
    issues: Vec<ValidationIssue>,
}

impl Checker {
    fn report(&mut self, path: &str, rule: Rule, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.to_string(),
            rule,
            message: message.into(),
        });
    }

    fn check_root(&mut self, value: &Value) {
        let Some(root) = value.as_object() else {
            self.report("", Rule::Type, "spec must be a JSON object");
            return;
        };

        self.check_fields(root, "", ROOT_FIELDS);

        if let Some(schema) = root.get("$schema") {
            self.expect_string("$schema", schema);
        }

        self.check_name(root.get("name"));
        self.optional_string(root, "", "description");

        let has_primitive = self.check_primitive(root.get("radixPrimitive"));
        self.check_native_element(root.get("nativeElement"));

        match root.get("props") {
            None => self.report("props", Rule::Required, "props is required (use {} for none)"),
            Some(props) => self.check_props(props),
        }

        self.check_variants(root.get("variants"));

        if let Some(states) = root.get("states") {
            self.check_states(states);
        }

        if let Some(parts) = root.get("parts") {
            self.check_parts(parts, has_primitive);
        }

        if let Some(accessibility) = root.get("accessibility") {
            self.check_accessibility(accessibility);
        }

        if let Some(metadata) = root.get("metadata") {
            self.check_metadata(metadata);
        }
    }

    fn check_fields(&mut self, object: &Map<String, Value>, path: &str, allowed: &[&str]) {
        for key in object.keys() {
            if !allowed.contains(&key.as_str()) {
                self.report(
                    &join(path, key),
                    Rule::UnknownField,
                    format!("unknown field '{}' (expected one of: {})", key, allowed.join(", ")),
                );
            }
        }
    }

    fn check_name(&mut self, name: Option<&Value>) {
        let Some(name) = name else {
            self.report("name", Rule::Required, "name is required");
            return;
        };
        let Some(name) = self.expect_string("name", name) else {
            return;
        };
        if !is_pascal_case(name) {
            self.report(
                "name",
                Rule::PascalCase,
                format!("'{}' must be PascalCase (^[A-Z][a-zA-Z0-9]*$)", name),
            );
        }
        if is_reserved(name) {
            self.report(
                "name",
                Rule::ReservedName,
                format!("'{}' is a reserved keyword or built-in identifier", name),
            );
        }
    }

    /// Returns whether a non-null primitive is declared.
    fn check_primitive(&mut self, value: Option<&Value>) -> bool {
        match value {
            None => {
                self.report(
                    "radixPrimitive",
                    Rule::Required,
                    "radixPrimitive is required (use null for native-element components)",
                );
                false
            }
            Some(Value::Null) => false,
            Some(Value::String(s)) => {
                if RadixPrimitive::parse(s).is_none() {
                    self.report(
                        "radixPrimitive",
                        Rule::Enum,
                        format!("unknown primitive '{}' (expected one of: {})", s, RadixPrimitive::expected()),
                    );
                }
                true
            }
            Some(_) => {
                self.report("radixPrimitive", Rule::Type, "radixPrimitive must be a string or null");
                false
            }
        }
    }

    fn check_native_element(&mut self, value: Option<&Value>) {
        match value {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => {
                if NativeElement::parse(s).is_none() {
                    self.report(
                        "nativeElement",
                        Rule::Enum,
                        format!("unsupported element '{}' (expected one of: {})", s, NativeElement::expected()),
                    );
                }
            }
            Some(_) => self.report("nativeElement", Rule::Type, "nativeElement must be a string or null"),
        }
    }

    fn check_props(&mut self, props: &Value) {
        let Some(props) = self.expect_object("props", props) else {
            return;
        };
        for (name, prop) in props {
            let path = join("props", name);
            if !is_identifier(name) {
                self.report(
                    &path,
                    Rule::Identifier,
                    format!("prop name '{}' is not a valid identifier", name),
                );
            }
            let Some(prop) = self.expect_object(&path, prop) else {
                continue;
            };
            self.check_fields(prop, &path, PROP_FIELDS);

            let type_path = join(&path, "type");
            match prop.get("type") {
                None => self.report(&type_path, Rule::Required, "prop type is required"),
                Some(ty) => {
                    if let Some(ty) = self.expect_string(&type_path, ty) {
                        if ty.trim().is_empty() {
                            self.report(&type_path, Rule::EmptyString, "prop type must not be empty");
                        }
                    }
                }
            }

            if let Some(required) = prop.get("required") {
                if !required.is_boolean() {
                    self.report(&join(&path, "required"), Rule::Type, "required must be a boolean");
                }
            }
            self.optional_string(prop, &path, "description");
        }
    }

    fn check_variants(&mut self, variants: Option<&Value>) {
        let Some(variants) = variants else {
            self.report("variants", Rule::Required, "variants is required");
            return;
        };
        let Some(variants) = self.expect_object("variants", variants) else {
            return;
        };
        if variants.is_empty() {
            self.report("variants", Rule::EmptyVariants, "at least one variant must be declared");
        }
        for (name, variant) in variants {
            let path = join("variants", name);
            if !is_variant_name(name) {
                self.report(
                    &path,
                    Rule::VariantName,
                    format!("variant name '{}' must match ^[a-zA-Z][a-zA-Z0-9_-]*$", name),
                );
            }
            let Some(variant) = self.expect_object(&path, variant) else {
                continue;
            };
            self.check_fields(variant, &path, VARIANT_FIELDS);
            self.check_classes(variant, &path, false);
            self.optional_string(variant, &path, "description");
        }
    }

    fn check_states(&mut self, states: &Value) {
        let Some(states) = self.expect_object("states", states) else {
            return;
        };
        for (name, state) in states {
            let path = join("states", name);
            let Some(state) = self.expect_object(&path, state) else {
                continue;
            };
            self.check_fields(state, &path, STATE_FIELDS);
            self.check_classes(state, &path, true);
            self.optional_string(state, &path, "css");
            self.optional_string(state, &path, "description");
        }
    }

    fn check_parts(&mut self, parts: &Value, has_primitive: bool) {
        let Some(parts) = self.expect_object("parts", parts) else {
            return;
        };
        if !parts.is_empty() {
            if !parts.contains_key(ROOT_PART) {
                self.report(
                    "parts",
                    Rule::MissingRootPart,
                    "composite components must declare a 'Root' part",
                );
            }
            if !has_primitive {
                self.report(
                    "radixPrimitive",
                    Rule::CompositeWithoutPrimitive,
                    "composite components (with parts) must declare a radixPrimitive",
                );
            }
        }
        for (name, part) in parts {
            let path = join("parts", name);
            if !is_pascal_case(name) {
                self.report(&path, Rule::PascalCase, format!("part name '{}' must be PascalCase", name));
            }
            let Some(part) = self.expect_object(&path, part) else {
                continue;
            };
            self.check_fields(part, &path, PART_FIELDS);
            if let Some(component) = part.get("radixComponent") {
                let component_path = join(&path, "radixComponent");
                if let Some(component) = self.expect_string(&component_path, component) {
                    if !is_pascal_case(component) {
                        self.report(
                            &component_path,
                            Rule::PascalCase,
                            format!("radixComponent '{}' must be PascalCase", component),
                        );
                    }
                }
            }
            self.check_classes(part, &path, false);
            self.optional_string(part, &path, "description");
        }
    }

    fn check_accessibility(&mut self, accessibility: &Value) {
        let Some(accessibility) = self.expect_object("accessibility", accessibility) else {
            return;
        };
        self.check_fields(accessibility, "accessibility", ACCESSIBILITY_FIELDS);

        match accessibility.get("handledBy") {
            None => self.report("accessibility.handledBy", Rule::Required, "handledBy is required"),
            Some(value) => {
                if let Some(handled_by) = self.expect_string("accessibility.handledBy", value) {
                    if HandledBy::parse(handled_by).is_none() {
                        self.report(
                            "accessibility.handledBy",
                            Rule::Enum,
                            format!("unknown handler '{}' (expected one of: {})", handled_by, HandledBy::expected()),
                        );
                    }
                }
            }
        }

        for map in ["aria", "keyboard"] {
            if let Some(value) = accessibility.get(map) {
                self.check_string_map(&join("accessibility", map), value);
            }
        }
        if let Some(features) = accessibility.get("features") {
            self.check_string_list("accessibility.features", features);
        }
    }

    fn check_metadata(&mut self, metadata: &Value) {
        let Some(metadata) = self.expect_object("metadata", metadata) else {
            return;
        };
        self.check_fields(metadata, "metadata", METADATA_FIELDS);

        if let Some(value) = metadata.get("category") {
            if let Some(category) = self.expect_string("metadata.category", value) {
                if Category::parse(category).is_none() {
                    self.report(
                        "metadata.category",
                        Rule::Enum,
                        format!("unknown category '{}' (expected one of: {})", category, Category::expected()),
                    );
                }
            }
        }
        if let Some(value) = metadata.get("complexity") {
            if let Some(complexity) = self.expect_string("metadata.complexity", value) {
                if Complexity::parse(complexity).is_none() {
                    self.report(
                        "metadata.complexity",
                        Rule::Enum,
                        format!("unknown complexity '{}' (expected one of: {})", complexity, Complexity::expected()),
                    );
                }
            }
        }
        for list in ["tags", "related"] {
            if let Some(value) = metadata.get(list) {
                self.check_string_list(&join("metadata", list), value);
            }
        }
    }

    fn check_classes(&mut self, object: &Map<String, Value>, path: &str, allow_empty: bool) {
        let path = join(path, "aibosClasses");
        let Some(classes) = object.get("aibosClasses") else {
            self.report(&path, Rule::Required, "aibosClasses is required");
            return;
        };
        let Some(classes) = self.check_string_list(&path, classes) else {
            return;
        };
        if classes == 0 && !allow_empty {
            self.report(&path, Rule::EmptyClasses, "aibosClasses must list at least one class");
        }
    }

    /// Returns the list length when every element is a non-empty string.
    fn check_string_list(&mut self, path: &str, value: &Value) -> Option<usize> {
        let Some(items) = value.as_array() else {
            self.report(path, Rule::Type, "expected an array of strings");
            return None;
        };
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, index);
            match item.as_str() {
                Some(s) if s.trim().is_empty() => {
                    self.report(&item_path, Rule::EmptyString, "entries must not be empty");
                    valid = false;
                }
                Some(_) => {}
                None => {
                    self.report(&item_path, Rule::Type, "expected a string");
                    valid = false;
                }
            }
        }
        valid.then_some(items.len())
    }

    fn check_string_map(&mut self, path: &str, value: &Value) {
        let Some(map) = self.expect_object(path, value) else {
            return;
        };
        for (key, entry) in map {
            if !entry.is_string() {
                self.report(&join(path, key), Rule::Type, "expected a string");
            }
        }
    }

    fn optional_string(&mut self, object: &Map<String, Value>, path: &str, field: &str) {
        if let Some(value) = object.get(field) {
            self.expect_string(&join(path, field), value);
        }
    }

    fn expect_string<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v str> {
        let s = value.as_str();
        if s.is_none() {
            self.report(path, Rule::Type, "expected a string");
        }
        s
    }

    fn expect_object<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.report(path, Rule::Type, "expected an object");
        }
        object
    }
}

fn is_variant_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}
