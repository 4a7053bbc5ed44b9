//! Stylesheet and class metadata artifacts.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use aibos_spec::naming::to_kebab_case;
use aibos_spec::ComponentSpec;

/// Class usage data consumed by editor IntelliSense (`css-classes.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassIndex {
    /// Class name to the components referencing it
    pub classes: BTreeMap<String, BTreeSet<String>>,
    pub components: BTreeMap<String, ComponentClasses>,
}

/// Classes declared by one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentClasses {
    pub tag_name: String,
    pub classes: Vec<String>,
}

impl ClassIndex {
    pub fn from_specs<'a>(specs: impl IntoIterator<Item = &'a ComponentSpec>) -> Self {
        let mut index = Self::default();
        for spec in specs {
            let classes = spec.all_classes();
            for class in &classes {
                index
                    .classes
                    .entry(class.to_string())
                    .or_default()
                    .insert(spec.name.clone());
            }
            index.components.insert(
                spec.name.clone(),
                ComponentClasses {
                    tag_name: spec.tag_name(),
                    classes: classes.into_iter().map(str::to_string).collect(),
                },
            );
        }
        index
    }

    /// Components that use `class`.
    pub fn users(&self, class: &str) -> Option<&BTreeSet<String>> {
        self.classes.get(class)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Concatenate the raw `css` of every state into one stylesheet.
///
/// Text without a rule block is treated as declarations and scoped to the
/// element carrying the state attribute (e.g., `na-button[disabled]`).
pub fn component_stylesheet<'a>(specs: impl IntoIterator<Item = &'a ComponentSpec>) -> String {
    let mut css = String::new();
    for spec in specs {
        let Some(states) = &spec.states else {
            continue;
        };
        let tag = spec.tag_name();
        for (state, def) in states {
            let Some(text) = def.css.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
                continue;
            };
            css.push_str(&format!("/* {} {} */\n", spec.name, state));
            if text.contains('{') {
                css.push_str(text);
            } else {
                css.push_str(&format!("{}[{}] {{\n  {}\n}}", tag, to_kebab_case(state), text));
            }
            css.push_str("\n\n");
        }
    }
    css
}

/// Minify CSS using lightningcss.
pub fn minify_css(css: &str) -> Result<String, String> {
    use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| format!("CSS parse error: {}", e))?;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| format!("CSS minify error: {}", e))?;

    Ok(minified.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aibos_spec::validate_spec;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn button() -> ComponentSpec {
        validate_spec(&json!({
            "name": "Button",
            "radixPrimitive": null,
            "nativeElement": "button",
            "props": {},
            "variants": {
                "primary": { "aibosClasses": ["na-btn", "na-btn-primary"] },
                "ghost": { "aibosClasses": ["na-btn"] }
            },
            "states": {
                "disabled": { "aibosClasses": ["opacity-50"], "css": "opacity: 0.5;" },
                "loading": { "aibosClasses": [] }
            }
        }))
        .unwrap()
    }

    fn badge() -> ComponentSpec {
        validate_spec(&json!({
            "name": "Badge",
            "radixPrimitive": null,
            "props": {},
            "variants": { "default": { "aibosClasses": ["na-badge opacity-50"] } },
            "states": {
                "highlighted": {
                    "aibosClasses": [],
                    "css": "na-badge[highlighted] { outline: 1px solid red; }"
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn indexes_class_users() {
        let specs = [button(), badge()];
        let index = ClassIndex::from_specs(&specs);

        let users: Vec<&str> = index
            .users("opacity-50")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(users, vec!["Badge", "Button"]);
        assert!(index.users("na-missing").is_none());

        let button = &index.components["Button"];
        assert_eq!(button.tag_name, "na-button");
        assert_eq!(button.classes, vec!["na-btn", "na-btn-primary", "opacity-50"]);

        let json = index.to_json().unwrap();
        assert!(json.contains("\"tagName\": \"na-button\""));
    }

    #[test]
    fn scopes_state_declarations() {
        let css = component_stylesheet(&[button(), badge()]);

        assert!(css.contains("/* Button disabled */\nna-button[disabled] {\n  opacity: 0.5;\n}"));
        assert!(css.contains("/* Badge highlighted */\nna-badge[highlighted] { outline: 1px solid red; }"));
        assert!(!css.contains("loading"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
na-button[disabled] {
    opacity: 0.5;
    cursor: not-allowed;
}
        "#;

        let minified = minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains("na-button[disabled]"));
    }
}
