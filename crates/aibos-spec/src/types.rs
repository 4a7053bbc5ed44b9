//! Component specification data model.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::naming::to_kebab_case;

/// Prefix shared by custom element tags and runtime event names.
pub const ELEMENT_PREFIX: &str = "na";

/// Name of the part every composite component must declare.
pub const ROOT_PART: &str = "Root";

/// Declarative description of one UI component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComponentSpec {
    /// Optional JSON Schema reference kept for editor tooling
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// PascalCase component name (e.g., "Button")
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Underlying primitive package, `None` for native-element components
    pub radix_primitive: Option<RadixPrimitive>,

    /// HTML tag used when no primitive backs the component; an explicit
    /// `null` is kept as `Some(None)` so it survives a round trip
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub native_element: Option<Option<NativeElement>>,

    pub props: IndexMap<String, PropSpec>,

    pub variants: IndexMap<String, VariantSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<IndexMap<String, StateSpec>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<IndexMap<String, PartSpec>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<AccessibilitySpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataSpec>,
}

/// A component prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropSpec {
    /// Free-form type expression (e.g., "boolean", "'sm' | 'md'")
    #[serde(rename = "type")]
    pub ty: String,

    /// Default value; an explicit `null` is kept as `Some(Value::Null)`
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropSpec {
    /// Whether callers must supply this prop.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// A named visual style alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VariantSpec {
    pub aibos_classes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named runtime condition contributing classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StateSpec {
    pub aibos_classes: Vec<String>,

    /// Raw CSS emitted into the component stylesheet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A sub-element of a composite component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartSpec {
    /// Primitive member to wrap when it differs from the part name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radix_component: Option<String>,

    pub aibos_classes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccessibilitySpec {
    pub handled_by: HandledBy,

    /// ARIA attribute -> how the component manages it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria: Option<IndexMap<String, String>>,

    /// Key -> behaviour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<IndexMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetadataSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
}

/// Keep an explicit JSON `null` distinguishable from an absent field.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Declares a closed string enumeration with lookup helpers.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $value)] $variant),+
        }

        impl $name {
            /// Every accepted value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The serialized identifier.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            /// Look up a value by its serialized identifier.
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Comma-separated list of accepted identifiers.
            pub fn expected() -> String {
                Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// External primitive packages a component may wrap.
    pub enum RadixPrimitive {
        Accordion => "accordion",
        AlertDialog => "alert-dialog",
        AspectRatio => "aspect-ratio",
        Avatar => "avatar",
        Checkbox => "checkbox",
        Collapsible => "collapsible",
        ContextMenu => "context-menu",
        Dialog => "dialog",
        DropdownMenu => "dropdown-menu",
        HoverCard => "hover-card",
        Label => "label",
        Menubar => "menubar",
        NavigationMenu => "navigation-menu",
        Popover => "popover",
        Progress => "progress",
        RadioGroup => "radio-group",
        ScrollArea => "scroll-area",
        Select => "select",
        Separator => "separator",
        Slider => "slider",
        Switch => "switch",
        Tabs => "tabs",
        Toast => "toast",
        Toggle => "toggle",
        ToggleGroup => "toggle-group",
        Toolbar => "toolbar",
        Tooltip => "tooltip",
    }
}

impl RadixPrimitive {
    /// npm package providing the primitive.
    pub fn package(&self) -> String {
        format!("@radix-ui/react-{}", self.as_str())
    }

    /// Namespace identifier used when importing the package (e.g., `DialogPrimitive`).
    pub fn namespace(&self) -> String {
        format!("{}Primitive", crate::naming::to_pascal_case(self.as_str()))
    }

    /// ARIA role the primitive's root element takes.
    pub fn role(&self) -> &'static str {
        match self {
            Self::Dialog | Self::Popover => "dialog",
            Self::AlertDialog => "alertdialog",
            Self::Tooltip => "tooltip",
            Self::Tabs => "tablist",
            Self::DropdownMenu | Self::ContextMenu => "menu",
            Self::Menubar => "menubar",
            Self::NavigationMenu => "navigation",
            Self::RadioGroup => "radiogroup",
            Self::Checkbox => "checkbox",
            Self::Switch => "switch",
            Self::Slider => "slider",
            Self::Progress => "progressbar",
            Self::Separator => "separator",
            Self::Toolbar => "toolbar",
            Self::Toast => "status",
            Self::Accordion | Self::Collapsible => "region",
            _ => "group",
        }
    }
}

string_enum! {
    /// HTML tags a native-element component may render.
    pub enum NativeElement {
        A => "a",
        Article => "article",
        Aside => "aside",
        Button => "button",
        Div => "div",
        Fieldset => "fieldset",
        Footer => "footer",
        Form => "form",
        H1 => "h1",
        H2 => "h2",
        H3 => "h3",
        H4 => "h4",
        H5 => "h5",
        H6 => "h6",
        Header => "header",
        Hr => "hr",
        Img => "img",
        Input => "input",
        Label => "label",
        Li => "li",
        Nav => "nav",
        Ol => "ol",
        P => "p",
        Section => "section",
        Select => "select",
        Span => "span",
        Table => "table",
        Textarea => "textarea",
        Ul => "ul",
    }
}

impl NativeElement {
    /// DOM interface name for the tag (used in generated TypeScript).
    pub fn dom_interface(&self) -> &'static str {
        match self {
            Self::A => "HTMLAnchorElement",
            Self::Button => "HTMLButtonElement",
            Self::Fieldset => "HTMLFieldSetElement",
            Self::Form => "HTMLFormElement",
            Self::H1 | Self::H2 | Self::H3 | Self::H4 | Self::H5 | Self::H6 => {
                "HTMLHeadingElement"
            }
            Self::Hr => "HTMLHRElement",
            Self::Img => "HTMLImageElement",
            Self::Input => "HTMLInputElement",
            Self::Label => "HTMLLabelElement",
            Self::Li => "HTMLLIElement",
            Self::Ol => "HTMLOListElement",
            Self::P => "HTMLParagraphElement",
            Self::Select => "HTMLSelectElement",
            Self::Span => "HTMLSpanElement",
            Self::Table => "HTMLTableElement",
            Self::Textarea => "HTMLTextAreaElement",
            Self::Ul => "HTMLUListElement",
            Self::Div => "HTMLDivElement",
            Self::Article | Self::Aside | Self::Footer | Self::Header | Self::Nav | Self::Section => {
                "HTMLElement"
            }
        }
    }

    /// Void elements cannot carry children.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Hr | Self::Img | Self::Input)
    }
}

string_enum! {
    /// Who implements the component's accessibility behaviour.
    pub enum HandledBy {
        PrimitiveLibrary => "primitive-library",
        Native => "native",
        Custom => "custom",
    }
}

string_enum! {
    pub enum Category {
        Action => "action",
        DataDisplay => "data-display",
        Disclosure => "disclosure",
        Feedback => "feedback",
        Form => "form",
        Layout => "layout",
        Media => "media",
        Navigation => "navigation",
        Overlay => "overlay",
        Typography => "typography",
        Utility => "utility",
    }
}

string_enum! {
    pub enum Complexity {
        Simple => "simple",
        Moderate => "moderate",
        Complex => "complex",
    }
}

impl ComponentSpec {
    /// A component with a non-empty `parts` map is composite.
    pub fn has_parts(&self) -> bool {
        self.parts.as_ref().is_some_and(|parts| !parts.is_empty())
    }

    /// Custom element tag (e.g., `na-alert-dialog`).
    pub fn tag_name(&self) -> String {
        format!("{}-{}", ELEMENT_PREFIX, to_kebab_case(&self.name))
    }

    /// First declared variant (React default).
    pub fn first_variant(&self) -> Option<&str> {
        self.variants.keys().next().map(String::as_str)
    }

    /// Lexicographically lowest variant key (custom element default).
    pub fn lowest_variant(&self) -> Option<&str> {
        self.variants.keys().map(String::as_str).min()
    }

    /// Classes contributed by a state, empty when the state is not declared.
    pub fn state_classes(&self, state: &str) -> &[String] {
        self.states
            .as_ref()
            .and_then(|states| states.get(state))
            .map(|s| s.aibos_classes.as_slice())
            .unwrap_or(&[])
    }

    /// HTML tag to render, `None` when absent or explicitly null.
    pub fn element(&self) -> Option<NativeElement> {
        self.native_element.flatten()
    }

    /// ARIA role for the host element, if any.
    pub fn aria_role(&self) -> Option<&'static str> {
        if let Some(primitive) = self.radix_primitive {
            return Some(primitive.role());
        }
        match self.element() {
            Some(NativeElement::Button) => Some("button"),
            Some(NativeElement::A) => Some("link"),
            Some(NativeElement::Nav) => Some("navigation"),
            _ => None,
        }
    }

    /// Every class name referenced by variants, states and parts, in first-seen order.
    pub fn all_classes(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let variant_classes = self.variants.values().flat_map(|v| &v.aibos_classes);
        let state_classes = self.states.iter().flat_map(|s| s.values()).flat_map(|s| &s.aibos_classes);
        let part_classes = self.parts.iter().flat_map(|p| p.values()).flat_map(|p| &p.aibos_classes);

        for class in variant_classes.chain(state_classes).chain(part_classes) {
            for token in class.split_whitespace() {
                if !seen.contains(&token) {
                    seen.push(token);
                }
            }
        }
        seen
    }
}
