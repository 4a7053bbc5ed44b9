//! Web Component generator.
//!
//! Emits a light-DOM custom element class per spec. The element mirrors
//! observed attributes into private fields, batches re-renders behind a
//! zero-delay debounce and, when the spec names a primitive, loads it through
//! the shared runtime cache on connect.

use aibos_runtime::{ElementDefinition, UpdateKind, DEFAULT_SIZE};
use aibos_spec::ComponentSpec;

use crate::error::AdapterError;
use crate::runtime_module::{runtime_module_source, RUNTIME_MODULE};
use crate::traits::{AdapterConfig, Framework, FrameworkAdapter, GeneratedComponent, SupportFile};
use crate::ts::{comment_text, property_key, string_array, string_literal};

/// Import base for the runtime module: generated elements sit next to it.
pub const DEFAULT_IMPORT_BASE: &str = ".";

/// Web Component adapter.
#[derive(Debug, Default)]
pub struct WebComponentAdapter;

impl WebComponentAdapter {
    /// Create a new Web Component adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FrameworkAdapter for WebComponentAdapter {
    fn framework(&self) -> Framework {
        Framework::WebComponents
    }

    fn extension(&self) -> &'static str {
        "ts"
    }

    fn generate(
        &self,
        spec: &ComponentSpec,
        config: &AdapterConfig,
    ) -> Result<GeneratedComponent, AdapterError> {
        if spec.variants.is_empty() {
            return Err(AdapterError::invalid_spec(spec, "at least one variant is required"));
        }
        let definition = ElementDefinition::from_spec(spec);
        let runtime = format!(
            "{}/{}",
            config.import_base(DEFAULT_IMPORT_BASE),
            RUNTIME_MODULE
        );
        let code = generate_element(spec, &definition, &runtime);

        Ok(GeneratedComponent {
            name: spec.name.clone(),
            code,
            imports: vec![runtime],
            dependencies: self.dependencies(spec),
        })
    }

    /// Generated elements only need the runtime module shipped beside them.
    fn dependencies(&self, _spec: &ComponentSpec) -> Vec<String> {
        Vec::new()
    }

    fn support_files(&self, _config: &AdapterConfig) -> Vec<SupportFile> {
        vec![SupportFile {
            file_name: format!("{}.ts", RUNTIME_MODULE),
            code: runtime_module_source(),
        }]
    }
}

fn optional_literal(value: Option<&str>) -> String {
    value.map(string_literal).unwrap_or_else(|| "null".to_string())
}

fn generate_element(spec: &ComponentSpec, definition: &ElementDefinition, runtime: &str) -> String {
    let class_name = &definition.class_name;
    let tag_name = &definition.tag_name;
    let composite = definition.composite;

    let variant_entries: String = definition
        .variant_classes
        .iter()
        .map(|(key, classes)| format!("  {}: {},\n", property_key(key), string_array(classes)))
        .collect();

    let observed = definition
        .observed_attributes()
        .iter()
        .map(|a| string_literal(a))
        .collect::<Vec<_>>()
        .join(", ");

    let update_order = [UpdateKind::Classes, UpdateKind::Attributes, UpdateKind::Component]
        .iter()
        .map(|kind| string_literal(kind.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut imports = vec!["cn", "debounce", "dispatch as emit", "parseBooleanAttribute", "setAttr"];
    if definition.primitive.is_some() {
        imports.push("loadPrimitive");
    }
    imports.extend(["type Cleanup", "type Primitive"]);

    let description = spec
        .description
        .as_deref()
        .map(|d| format!(" *\n * {}\n", comment_text(d)))
        .unwrap_or_default();

    let mut events = String::new();
    if composite {
        events.push_str("  'na-open': CustomEvent<{ open: boolean; timestamp: number }>;\n");
        events.push_str("  'na-close': CustomEvent<{ reason: string }>;\n");
    }
    events.push_str("  'na-error': CustomEvent<{ error: string; source: string }>;\n");

    format!(
        r#"/**
 * {class_name}
{description} *
 * Generated by aibos. Do not edit.
 * Tag: <{tag_name}>
 */
import {{ {imports} }} from {runtime};

const VARIANT_CLASSES: Record<string, readonly string[]> = {{
{variant_entries}}};
const DISABLED_CLASSES: readonly string[] = {disabled_classes};
const LOADING_CLASSES: readonly string[] = {loading_classes};
const DEFAULT_VARIANT = {default_variant};
const DEFAULT_SIZE = {default_size};
const ROLE: string | null = {role};
const UPDATE_ORDER = [{update_order}] as const;

type UpdateKind = (typeof UPDATE_ORDER)[number];

export interface {class_name}Events {{
{events}}}

export class {class_name} extends HTMLElement {{
{open_field}  #variant: string = DEFAULT_VARIANT;
  #size: string = DEFAULT_SIZE;
  #disabled = false;
  #loading = false;
  #pending = new Set<UpdateKind>();
  #scheduleFlush = debounce(() => this.#flush(), 0);
  #listeners: Array<[string, EventListener]> = [];
  #cleanups: Cleanup[] = [];
  #focusTrap: Cleanup | null = null;
  #primitive: Primitive | null = null;
  #previousFocus: HTMLElement | null = null;
  #generation = 0;

  static get observedAttributes(): string[] {{
    return [{observed}];
  }}

{connected}
  disconnectedCallback(): void {{
    this.#generation++;
    this.#scheduleFlush.cancel();
    this.#pending.clear();
    for (const [type, listener] of this.#listeners) {{
      this.removeEventListener(type, listener);
    }}
    this.#listeners = [];
    for (const cleanup of this.#cleanups) {{
      cleanup();
    }}
    this.#cleanups = [];
    this.#releaseFocusTrap();
    this.#primitive = null;
    this.#previousFocus = null;
  }}

  attributeChangedCallback(name: string, oldValue: string | null, newValue: string | null): void {{
    if (oldValue === newValue) return;
    switch (name) {{
      case 'variant':
        this.#variant = newValue ?? DEFAULT_VARIANT;
        this.#scheduleUpdate('classes');
        break;
      case 'size':
        this.#size = newValue ?? DEFAULT_SIZE;
        this.#scheduleUpdate('classes');
        break;
      case 'disabled':
        this.#disabled = parseBooleanAttribute(newValue);
        this.#scheduleUpdate('classes');
        this.#scheduleUpdate('attributes');
        break;
      case 'loading':
        this.#loading = parseBooleanAttribute(newValue);
        this.#scheduleUpdate('classes');
        this.#scheduleUpdate('attributes');
        break;
{open_case}    }}
  }}
{open_close}
  dispatch<T>(name: string, detail: T): boolean {{
    return emit(this, name, detail);
  }}

  #readAttributes(): void {{
    this.#variant = this.getAttribute('variant') ?? DEFAULT_VARIANT;
    this.#size = this.getAttribute('size') ?? DEFAULT_SIZE;
    this.#disabled = parseBooleanAttribute(this.getAttribute('disabled'));
    this.#loading = parseBooleanAttribute(this.getAttribute('loading'));
{open_read}  }}

  #trackListener(type: string, listener: EventListener): void {{
    this.addEventListener(type, listener);
    this.#listeners.push([type, listener]);
  }}

{handle_click}
{setup_component}  #setupComponentFallback(): void {{
    if (ROLE !== null) this.setAttribute('role', ROLE);
    this.#render();
  }}

  #scheduleUpdate(kind: UpdateKind): void {{
    if (!this.isConnected) return;
    this.#pending.add(kind);
    if (!this.#scheduleFlush.pending()) this.#scheduleFlush();
  }}

  #flush(): void {{
    if (this.#pending.size === 0) return;
    const pending = this.#pending;
    this.#pending = new Set();
    for (const kind of UPDATE_ORDER) {{
      if (!pending.has(kind)) continue;
      if (kind === 'classes') this.#renderClasses();
      else if (kind === 'attributes') this.#renderAttributes();
      else this.#updateComponent();
    }}
  }}

  #render(): void {{
    this.#renderClasses();
    this.#renderAttributes();
  }}

  #renderClasses(): void {{
    this.className = cn(
      ...(VARIANT_CLASSES[this.#variant] ?? []),
      ...(this.#disabled ? DISABLED_CLASSES : []),
      ...(this.#loading ? LOADING_CLASSES : [])
    );
  }}

  #renderAttributes(): void {{
    setAttr(this, 'aria-disabled', this.#disabled || this.#loading ? 'true' : null);
{hidden_attribute}  }}

  #updateComponent(): void {{
{update_component}  }}

  #trapFocus(): void {{
    if (this.#focusTrap !== null || this.#primitive === null) return;
    this.#focusTrap = this.#primitive.trapFocus(this);
  }}

  #releaseFocusTrap(): void {{
    this.#focusTrap?.();
    this.#focusTrap = null;
  }}
}}

declare global {{
  interface HTMLElementTagNameMap {{
    '{tag_name}': {class_name};
  }}
  interface HTMLElementEventMap extends {class_name}Events {{}}
}}

if (typeof customElements !== 'undefined' && !customElements.get('{tag_name}')) {{
  customElements.define('{tag_name}', {class_name});
}}

export default {class_name};
"#,
        class_name = class_name,
        description = description,
        tag_name = tag_name,
        imports = imports.join(", "),
        runtime = string_literal(runtime),
        variant_entries = variant_entries,
        disabled_classes = string_array(&definition.disabled_classes),
        loading_classes = string_array(&definition.loading_classes),
        default_variant = string_literal(&definition.default_variant),
        default_size = string_literal(DEFAULT_SIZE),
        role = optional_literal(definition.role.as_deref()),
        update_order = update_order,
        events = events,
        open_field = if composite { "  #open = false;\n" } else { "" },
        observed = observed,
        connected = connected_callback(definition.primitive.as_deref()),
        open_case = if composite { OPEN_CASE } else { "" },
        open_close = if composite { OPEN_CLOSE } else { "" },
        open_read = if composite { OPEN_READ } else { "" },
        handle_click = if composite { COMPOSITE_CLICK } else { SIMPLE_CLICK },
        setup_component = match definition.primitive {
            Some(_) => setup_component(composite),
            None => String::new(),
        },
        hidden_attribute = if composite { HIDDEN_ATTRIBUTE } else { "" },
        update_component = if composite { COMPOSITE_UPDATE } else { SIMPLE_UPDATE },
    )
}

fn connected_callback(primitive: Option<&str>) -> String {
    match primitive {
        None => r#"  connectedCallback(): void {
    this.#generation++;
    this.#readAttributes();
    this.#trackListener('click', (event) => this.#handleClick(event));
    this.#setupComponentFallback();
  }
"#
        .to_string(),
        Some(name) => format!(
            r#"  async connectedCallback(): Promise<void> {{
    const generation = ++this.#generation;
    this.#readAttributes();
    this.#trackListener('click', (event) => this.#handleClick(event));
    try {{
      const primitive = await loadPrimitive({name});
      if (!this.isConnected || generation !== this.#generation) return;
      this.#primitive = primitive;
      this.#setupComponent();
    }} catch (error) {{
      if (!this.isConnected || generation !== this.#generation) return;
      this.#setupComponentFallback();
      this.dispatch('error', {{
        error: error instanceof Error ? error.message : String(error),
        source: {source},
      }});
    }}
  }}
"#,
            name = string_literal(name),
            source = string_literal(&format!("primitive:{}", name)),
        ),
    }
}

fn setup_component(composite: bool) -> String {
    let escape = if composite {
        r#"    this.#cleanups.push(
      primitive.onEscape(this, () => {
        if (this.#open) this.close('escape');
      })
    );
    if (this.#open) this.#trapFocus();
"#
    } else {
        ""
    };
    format!(
        r#"  #setupComponent(): void {{
    const primitive = this.#primitive;
    if (primitive === null) return;
    primitive.setupAria(this, ROLE);
{escape}    this.#render();
  }}

"#,
        escape = escape,
    )
}

const OPEN_CASE: &str = r#"      case 'open':
        this.#open = parseBooleanAttribute(newValue);
        this.#scheduleUpdate('attributes');
        this.#scheduleUpdate('component');
        break;
"#;

const OPEN_READ: &str = "    this.#open = parseBooleanAttribute(this.getAttribute('open'));\n";

const OPEN_CLOSE: &str = r#"
  open(): void {
    this.#open = true;
    this.setAttribute('open', '');
    this.dispatch('open', { open: true, timestamp: Date.now() });
    this.#previousFocus =
      document.activeElement instanceof HTMLElement ? document.activeElement : null;
    this.#trapFocus();
  }

  close(reason = 'api'): void {
    this.#open = false;
    this.removeAttribute('open');
    this.dispatch('close', { reason });
    this.#releaseFocusTrap();
    if (this.#primitive !== null && this.#previousFocus !== null) {
      this.#primitive.restoreFocus(this, this.#previousFocus);
    }
    this.#previousFocus = null;
  }
"#;

const SIMPLE_CLICK: &str = r#"  #handleClick(event: Event): void {
    if (this.#disabled || this.#loading) {
      event.preventDefault();
      event.stopImmediatePropagation();
    }
  }
"#;

const COMPOSITE_CLICK: &str = r#"  #handleClick(event: Event): void {
    const target = event.target instanceof Element ? event.target : null;
    const part = target?.closest('[data-na-part]')?.getAttribute('data-na-part');
    if (part === 'trigger') {
      if (this.#open) this.close('trigger');
      else this.open();
    } else if (part === 'close') {
      this.close('close-button');
    }
  }
"#;

const HIDDEN_ATTRIBUTE: &str =
    "    setAttr(this, 'aria-hidden', this.#open ? null : 'true');\n";

const COMPOSITE_UPDATE: &str = r#"    if (this.#open) this.#trapFocus();
    else this.#releaseFocusTrap();
"#;

const SIMPLE_UPDATE: &str = "    this.#releaseFocusTrap();\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterErrorKind;
    use crate::verify::{verify_syntax, SourceKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> ComponentSpec {
        serde_json::from_value(value).unwrap()
    }

    fn button() -> ComponentSpec {
        spec(json!({
            "name": "Button",
            "radixPrimitive": null,
            "nativeElement": "button",
            "props": {},
            "variants": {
                "secondary": { "aibosClasses": ["na-btn", "na-btn-secondary"] },
                "primary": { "aibosClasses": ["na-btn", "na-btn-primary"] }
            },
            "states": {
                "disabled": { "aibosClasses": ["opacity-50", "cursor-not-allowed"] }
            }
        }))
    }

    fn dialog() -> ComponentSpec {
        spec(json!({
            "name": "AlertDialog",
            "description": "Interrupts the user with a required decision.",
            "radixPrimitive": "alert-dialog",
            "props": {},
            "variants": { "default": { "aibosClasses": ["na-alert-dialog"] } },
            "parts": {
                "Root": { "aibosClasses": [] },
                "Trigger": { "aibosClasses": ["na-alert-dialog-trigger"] },
                "Content": { "aibosClasses": ["na-alert-dialog-content"] }
            }
        }))
    }

    fn generate(spec: &ComponentSpec) -> GeneratedComponent {
        WebComponentAdapter::new()
            .generate(spec, &AdapterConfig::new(Framework::WebComponents))
            .unwrap()
    }

    #[test]
    fn simple_element_shape() {
        let output = generate(&button());
        let code = &output.code;

        assert_eq!(output.imports, vec!["./aibos-runtime"]);
        assert!(output.dependencies.is_empty());
        assert!(code.contains(
            "import { cn, debounce, dispatch as emit, parseBooleanAttribute, setAttr, type Cleanup, type Primitive } from './aibos-runtime';"
        ));
        assert!(code.contains("export class Button extends HTMLElement {"));
        assert!(code.contains("return ['variant', 'size', 'disabled', 'loading'];"));
        assert!(code.contains("const DEFAULT_VARIANT = 'primary';"));
        assert!(code.contains("const DEFAULT_SIZE = 'md';"));
        assert!(code.contains("const ROLE: string | null = 'button';"));
        assert!(code.contains("  primary: ['na-btn', 'na-btn-primary'],\n  secondary: ['na-btn', 'na-btn-secondary'],\n"));
        assert!(code.contains("const DISABLED_CLASSES: readonly string[] = ['opacity-50', 'cursor-not-allowed'];"));
        assert!(code.contains("const LOADING_CLASSES: readonly string[] = [];"));
        assert!(code.contains("const UPDATE_ORDER = ['classes', 'attributes', 'component'] as const;"));
        assert!(code.contains("  connectedCallback(): void {"));
        assert!(!code.contains("loadPrimitive"));
        assert!(!code.contains("open(): void"));
        assert!(!code.contains("attachShadow"));
        assert!(code.contains("  'na-error': CustomEvent<{ error: string; source: string }>;\n"));
        assert!(code.contains("customElements.define('na-button', Button);"));
        assert!(code.ends_with("export default Button;\n"));
    }

    #[test]
    fn composite_element_shape() {
        let code = generate(&dialog()).code;

        assert!(code.contains(" * AlertDialog\n *\n * Interrupts the user with a required decision.\n *\n"));
        assert!(code.contains("return ['variant', 'size', 'disabled', 'loading', 'open'];"));
        assert!(code.contains("const primitive = await loadPrimitive('alert-dialog');"));
        assert!(code.contains("source: 'primitive:alert-dialog',"));
        assert!(code.contains("this.dispatch('open', { open: true, timestamp: Date.now() });"));
        assert!(code.contains("this.dispatch('close', { reason });"));
        assert!(code.contains("setAttr(this, 'aria-hidden', this.#open ? null : 'true');"));
        assert!(code.contains("if (this.#open) this.close('escape');"));
        assert!(code.contains("const ROLE: string | null = 'alertdialog';"));
        assert!(code.contains("  'na-open': CustomEvent<{ open: boolean; timestamp: number }>;\n"));
        assert!(code.contains("'na-alert-dialog': AlertDialog;"));
        assert!(code.contains("interface HTMLElementEventMap extends AlertDialogEvents {}"));
    }

    #[test]
    fn flush_runs_in_fixed_order_and_replaces_classes() {
        let code = generate(&button()).code;

        assert!(code.contains("for (const kind of UPDATE_ORDER) {"));
        assert!(code.contains("this.className = cn("));
        assert!(code.contains("if (!this.#scheduleFlush.pending()) this.#scheduleFlush();"));
        assert!(code.contains("this.#scheduleFlush.cancel();\n    this.#pending.clear();"));
    }

    #[test]
    fn runtime_import_follows_config() {
        let config = AdapterConfig::new(Framework::WebComponents).with_import_path("/assets/aibos/");
        let output = WebComponentAdapter::new().generate(&button(), &config).unwrap();
        assert!(output.code.contains("from '/assets/aibos/aibos-runtime';"));
    }

    #[test]
    fn rejects_specs_without_variants() {
        let mut empty = button();
        empty.variants.clear();
        let error = WebComponentAdapter::new()
            .generate(&empty, &AdapterConfig::new(Framework::WebComponents))
            .unwrap_err();
        assert_eq!(error.kind(), AdapterErrorKind::InvalidSpec);
    }

    #[test]
    fn ships_runtime_module() {
        let files = WebComponentAdapter::new()
            .support_files(&AdapterConfig::new(Framework::WebComponents));
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "aibos-runtime.ts");
    }

    #[test]
    fn output_parses_as_typescript() {
        for spec in [button(), dialog()] {
            verify_syntax(&generate(&spec).code, SourceKind::Ts).unwrap();
        }
    }

    #[test]
    fn description_cannot_close_the_banner() {
        let mut spec = button();
        spec.description = Some("Renders <button>; see docs/*/button.md".to_string());
        let code = generate(&spec).code;

        assert!(code.contains(" * Renders <button>; see docs/*\\/button.md\n"));
        verify_syntax(&code, SourceKind::Ts).unwrap();
    }
}
