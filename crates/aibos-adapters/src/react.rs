//! React component generator.
//!
//! Simple components become a single `forwardRef` component whose class
//! string is composed from variant, state and caller classes. Composite
//! components (those with parts) become a set of thin wrappers around the
//! primitive package's parts.

use aibos_spec::{ComponentSpec, NativeElement, PartSpec, PropSpec, RadixPrimitive, ROOT_PART};

use crate::error::AdapterError;
use crate::traits::{AdapterConfig, Framework, FrameworkAdapter, GeneratedComponent};
use crate::ts::{doc_comment, escape_string, property_key, string_array, string_literal, string_union};

/// Import base for `utils` and the global stylesheet.
pub const DEFAULT_IMPORT_BASE: &str = "../lib";

/// Packages every generated React component needs.
pub const BASE_DEPENDENCIES: &[&str] = &["react", "react-dom", "clsx", "tailwind-merge"];

/// Props the generated component handles itself.
const RESERVED_PROPS: &[&str] = &["className", "children"];

/// React adapter.
#[derive(Debug, Default)]
pub struct ReactAdapter;

impl ReactAdapter {
    /// Create a new React adapter.
    pub fn new() -> Self {
        Self
    }

    /// Emit the wrappers of a composite component.
    ///
    /// Fails when the spec has no parts, no `Root` part or no primitive.
    pub fn generate_composite(
        &self,
        spec: &ComponentSpec,
        config: &AdapterConfig,
    ) -> Result<GeneratedComponent, AdapterError> {
        let sections = composite_sections(spec)?;
        let header = Header::new(spec, config);
        let body = sections
            .iter()
            .map(|(_, code)| code.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(self.component(spec, &header, spec.name.clone(), &body))
    }

    fn component(
        &self,
        spec: &ComponentSpec,
        header: &Header,
        name: String,
        body: &str,
    ) -> GeneratedComponent {
        let code = format!(
            "{banner}{imports}\n{body}\nexport default {name};\n",
            banner = banner(&name, spec.description.as_deref()),
            imports = header.code,
            body = body,
            name = name,
        );
        GeneratedComponent {
            name,
            code,
            imports: header.specifiers.clone(),
            dependencies: self.dependencies(spec),
        }
    }
}

impl FrameworkAdapter for ReactAdapter {
    fn framework(&self) -> Framework {
        Framework::React
    }

    fn extension(&self) -> &'static str {
        "tsx"
    }

    fn generate(
        &self,
        spec: &ComponentSpec,
        config: &AdapterConfig,
    ) -> Result<GeneratedComponent, AdapterError> {
        if spec.has_parts() {
            return self.generate_composite(spec, config);
        }
        let header = Header::new(spec, config);
        let body = simple_component(spec);
        Ok(self.component(spec, &header, spec.name.clone(), &body))
    }

    fn generate_parts(
        &self,
        spec: &ComponentSpec,
        config: &AdapterConfig,
    ) -> Result<Vec<GeneratedComponent>, AdapterError> {
        if !spec.has_parts() {
            return Ok(vec![self.generate(spec, config)?]);
        }
        let header = Header::new(spec, config);
        Ok(composite_sections(spec)?
            .into_iter()
            .map(|(name, code)| self.component(spec, &header, name, &code))
            .collect())
    }

    fn dependencies(&self, spec: &ComponentSpec) -> Vec<String> {
        let mut dependencies: Vec<String> =
            BASE_DEPENDENCIES.iter().map(|d| d.to_string()).collect();
        if let Some(primitive) = spec.radix_primitive {
            dependencies.push(primitive.package());
        }
        dependencies
    }
}

/// Import block plus the module specifiers it references.
struct Header {
    code: String,
    specifiers: Vec<String>,
}

impl Header {
    fn new(spec: &ComponentSpec, config: &AdapterConfig) -> Self {
        let base = config.import_base(DEFAULT_IMPORT_BASE);
        let mut code = String::from("import * as React from 'react';\n");
        let mut specifiers = vec!["react".to_string()];

        if let Some(primitive) = spec.radix_primitive {
            code.push_str(&format!(
                "import * as {} from '{}';\n",
                primitive.namespace(),
                primitive.package()
            ));
            specifiers.push(primitive.package());
        }

        let utils = format!("{}/utils", base);
        let stylesheet = format!("{}/aibos.css", base);
        code.push_str(&format!("import {{ cn }} from {};\n", string_literal(&utils)));
        code.push_str(&format!("import {};\n", string_literal(&stylesheet)));
        specifiers.push(utils);
        specifiers.push(stylesheet);

        Self { code, specifiers }
    }
}

fn banner(name: &str, description: Option<&str>) -> String {
    let mut lines = vec![name.to_string()];
    if let Some(description) = description {
        lines.push(String::new());
        lines.push(description.to_string());
    }
    lines.push(String::new());
    lines.push("Generated by aibos. Do not edit.".to_string());
    doc_comment(&lines, "").replace(" * \n", " *\n")
}

/// JSDoc lines for a prop: its description and default.
fn prop_doc(prop: Option<&PropSpec>, default: Option<String>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(description) = prop.and_then(|p| p.description.as_deref()) {
        lines.push(description.to_string());
    }
    let default = default.or_else(|| {
        prop.and_then(|p| p.default.as_ref())
            .map(|value| value.to_string())
    });
    if let Some(default) = default {
        lines.push(format!("@default {}", default));
    }
    lines
}

fn default_literal(spec: &ComponentSpec, prop: &str, fallback: &str) -> String {
    spec.props
        .get(prop)
        .and_then(|p| p.default.as_ref())
        .map(|value| value.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Interface members for the declared props, skipping `skip`.
fn prop_members(spec: &ComponentSpec, skip: &[&str]) -> (Vec<String>, String) {
    let mut keys = Vec::new();
    let mut members = String::new();
    for (name, prop) in &spec.props {
        if skip.contains(&name.as_str()) || RESERVED_PROPS.contains(&name.as_str()) {
            continue;
        }
        members.push_str(&doc_comment(&prop_doc(Some(prop), None), "  "));
        members.push_str(&format!(
            "  {}{}: {};\n",
            property_key(name),
            if prop.is_required() { "" } else { "?" },
            prop.ty
        ));
        keys.push(name.clone());
    }
    (keys, members)
}

fn omit(base: &str, keys: &[String]) -> String {
    if keys.is_empty() {
        base.to_string()
    } else {
        format!(
            "Omit<{}, {}>",
            base,
            string_union(keys.iter().map(String::as_str))
        )
    }
}

/// React attribute interface for a native tag.
fn attributes_type(element: NativeElement) -> String {
    let interface = element.dom_interface();
    let attributes = match element {
        NativeElement::A => "AnchorHTMLAttributes",
        NativeElement::Button => "ButtonHTMLAttributes",
        NativeElement::Fieldset => "FieldsetHTMLAttributes",
        NativeElement::Form => "FormHTMLAttributes",
        NativeElement::Img => "ImgHTMLAttributes",
        NativeElement::Input => "InputHTMLAttributes",
        NativeElement::Label => "LabelHTMLAttributes",
        NativeElement::Li => "LiHTMLAttributes",
        NativeElement::Ol => "OlHTMLAttributes",
        NativeElement::Select => "SelectHTMLAttributes",
        NativeElement::Table => "TableHTMLAttributes",
        NativeElement::Textarea => "TextareaHTMLAttributes",
        _ => "HTMLAttributes",
    };
    format!("React.{}<{}>", attributes, interface)
}

/// Native tags that accept a `disabled` attribute.
fn accepts_disabled(element: NativeElement) -> bool {
    matches!(
        element,
        NativeElement::Button
            | NativeElement::Fieldset
            | NativeElement::Input
            | NativeElement::Select
            | NativeElement::Textarea
    )
}

/// Primitive roots that take a `disabled` prop.
fn primitive_accepts_disabled(primitive: RadixPrimitive) -> bool {
    matches!(
        primitive,
        RadixPrimitive::Checkbox
            | RadixPrimitive::RadioGroup
            | RadixPrimitive::Select
            | RadixPrimitive::Slider
            | RadixPrimitive::Switch
            | RadixPrimitive::Toggle
            | RadixPrimitive::ToggleGroup
    )
}

fn simple_component(spec: &ComponentSpec) -> String {
    let name = &spec.name;
    let variant_type = format!("{}Variant", name);
    let default_variant = spec.first_variant().unwrap_or_default();

    // Rendered tag, ref type, base props and whether `disabled` is forwarded.
    let (tag, ref_type, base_props, forwards_disabled) = match spec.radix_primitive {
        Some(primitive) => {
            let root = format!("{}.Root", primitive.namespace());
            (
                root.clone(),
                format!("React.ElementRef<typeof {}>", root),
                format!("React.ComponentPropsWithoutRef<typeof {}>", root),
                primitive_accepts_disabled(primitive),
            )
        }
        None => {
            let element = spec.element().unwrap_or(NativeElement::Div);
            (
                element.as_str().to_string(),
                element.dom_interface().to_string(),
                attributes_type(element),
                accepts_disabled(element),
            )
        }
    };

    let mut members = String::new();
    members.push_str(&doc_comment(
        &prop_doc(
            spec.props.get("variant"),
            Some(string_literal(default_variant)),
        ),
        "  ",
    ));
    members.push_str(&format!("  variant?: {};\n", variant_type));

    let (mut keys, declared) = prop_members(spec, &["variant"]);
    members.push_str(&declared);
    for state in ["disabled", "loading"] {
        if !spec.props.contains_key(state) {
            members.push_str(&format!("  {}?: boolean;\n", state));
            keys.push(state.to_string());
        }
    }
    keys.insert(0, "variant".to_string());

    let variant_entries: String = spec
        .variants
        .iter()
        .map(|(key, variant)| {
            format!(
                "  {}: {},\n",
                property_key(key),
                string_array(&variant.aibos_classes)
            )
        })
        .collect();

    let disabled_attribute = if forwards_disabled {
        "      disabled={disabled || loading}\n"
    } else {
        ""
    };

    format!(
        r#"export type {variant_type} = {variant_union};

export interface {name}Props extends {base} {{
{members}}}

const variantClasses: Record<{variant_type}, string[]> = {{
{variant_entries}}};

const disabledClasses: string[] = {disabled_classes};
const loadingClasses: string[] = {loading_classes};

export const {name} = React.forwardRef<{ref_type}, {name}Props>(
  (
    {{ variant = '{default_variant}', disabled = {disabled_default}, loading = {loading_default}, className, ...props }},
    ref
  ) => (
    <{tag}
      ref={{ref}}
      className={{cn(
        variantClasses[variant],
        disabled && disabledClasses,
        loading && loadingClasses,
        className
      )}}
{disabled_attribute}      aria-disabled={{disabled || loading || undefined}}
      aria-busy={{loading || undefined}}
      {{...props}}
    />
  )
);
{name}.displayName = '{name}';
"#,
        variant_type = variant_type,
        variant_union = string_union(spec.variants.keys().map(String::as_str)),
        name = name,
        base = omit(&base_props, &keys),
        members = members,
        variant_entries = variant_entries,
        disabled_classes = string_array(spec.state_classes("disabled")),
        loading_classes = string_array(spec.state_classes("loading")),
        ref_type = ref_type,
        default_variant = escape_string(default_variant),
        disabled_default = default_literal(spec, "disabled", "false"),
        loading_default = default_literal(spec, "loading", "false"),
        tag = tag,
        disabled_attribute = disabled_attribute,
    )
}

/// `(exported name, code)` for the Root wrapper and each part wrapper.
fn composite_sections(spec: &ComponentSpec) -> Result<Vec<(String, String)>, AdapterError> {
    let parts = match &spec.parts {
        Some(parts) if !parts.is_empty() => parts,
        _ => {
            return Err(AdapterError::invalid_spec(
                spec,
                "composite generation requires parts",
            ))
        }
    };
    let primitive = spec
        .radix_primitive
        .ok_or_else(|| AdapterError::MissingDependency {
            component: spec.name.clone(),
            dependency: "radixPrimitive".to_string(),
        })?;
    let root = parts
        .get(ROOT_PART)
        .ok_or_else(|| AdapterError::invalid_spec(spec, "composite components need a Root part"))?;

    let namespace = primitive.namespace();
    let mut sections = vec![(spec.name.clone(), root_wrapper(spec, &namespace, root))];
    for (part_name, part) in parts.iter().filter(|(name, _)| name.as_str() != ROOT_PART) {
        let export = format!("{}{}", spec.name, part_name);
        let code = part_wrapper(&export, &namespace, part_name, part);
        sections.push((export, code));
    }
    Ok(sections)
}

fn root_wrapper(spec: &ComponentSpec, namespace: &str, root: &PartSpec) -> String {
    let name = &spec.name;
    let member = format!(
        "{}.{}",
        namespace,
        root.radix_component.as_deref().unwrap_or(ROOT_PART)
    );
    let (mut keys, members) = prop_members(spec, &["open", "onOpenChange"]);
    keys.extend(["open", "onOpenChange", "children"].map(String::from));

    format!(
        r#"{doc}export interface {name}Props
  extends {base} {{
  open?: boolean;
  onOpenChange?: (open: boolean) => void;
  children?: React.ReactNode;
{members}}}

export function {name}({{ open, onOpenChange, children, ...props }}: {name}Props) {{
  return (
    <{member} open={{open}} onOpenChange={{onOpenChange}} {{...props}}>
      {{children}}
    </{member}>
  );
}}
"#,
        doc = doc_comment(&root.description.iter().cloned().collect::<Vec<_>>(), ""),
        name = name,
        base = omit(&format!("React.ComponentPropsWithoutRef<typeof {}>", member), &keys),
        members = members,
        member = member,
    )
}

fn part_wrapper(export: &str, namespace: &str, part_name: &str, part: &PartSpec) -> String {
    let member = format!(
        "{}.{}",
        namespace,
        part.radix_component.as_deref().unwrap_or(part_name)
    );
    format!(
        r#"{doc}export const {export} = React.forwardRef<
  React.ElementRef<typeof {member}>,
  React.ComponentPropsWithoutRef<typeof {member}>
>(({{ className, ...props }}, ref) => (
  <{member} ref={{ref}} className={{cn({classes}, className)}} {{...props}} />
));
{export}.displayName = '{export}';
"#,
        doc = doc_comment(&part.description.iter().cloned().collect::<Vec<_>>(), ""),
        export = export,
        member = member,
        classes = string_array(&part.aibos_classes),
    )
}
