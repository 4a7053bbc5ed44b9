//! Browser runtime shipped next to generated Web Components.

use aibos_runtime::EVENT_PREFIX;

/// File name generated elements import the runtime from (without extension).
pub const RUNTIME_MODULE: &str = "aibos-runtime";

/// Exported helpers, in declaration order.
pub const RUNTIME_EXPORTS: &[&str] = &[
    "cn",
    "getAttr",
    "setAttr",
    "toKebabCase",
    "toCamelCase",
    "normalizeEventName",
    "dispatch",
    "parseBooleanAttribute",
    "debounce",
    "setPrimitiveLoader",
    "loadPrimitive",
];

/// Source of `aibos-runtime.ts`.
pub fn runtime_module_source() -> String {
    format!(
        r#"/**
 * aibos runtime support for generated custom elements.
 *
 * Generated by aibos. Do not edit.
 */

export type ClassValue = string | false | null | undefined;

export type Cleanup = () => void;

export interface Primitive {{
  setupAria(host: HTMLElement, role: string | null): void;
  trapFocus(host: HTMLElement): Cleanup;
  onEscape(host: HTMLElement, handler: () => void): Cleanup;
  restoreFocus(host: HTMLElement, target: HTMLElement): void;
}}

export type PrimitiveLoader = (name: string) => Promise<Primitive>;

export const EVENT_PREFIX = '{prefix}';

export function cn(...classes: ClassValue[]): string {{
  return classes.filter(Boolean).join(' ');
}}

export function getAttr(el: Element, name: string, fallback = ''): string {{
  return el.getAttribute(name) ?? fallback;
}}

export function setAttr(el: Element, name: string, value: string | null | undefined | false): void {{
  if (value) {{
    el.setAttribute(name, value);
  }} else {{
    el.removeAttribute(name);
  }}
}}

export function toKebabCase(value: string): string {{
  return value
    .replace(/([a-z0-9])([A-Z])/g, '$1-$2')
    .replace(/[\s_]+/g, '-')
    .toLowerCase();
}}

export function toCamelCase(value: string): string {{
  return value.replace(/-([a-z0-9])/g, (_, c: string) => c.toUpperCase());
}}

export function normalizeEventName(name: string): string {{
  const kebab = toKebabCase(name);
  return kebab.startsWith(EVENT_PREFIX) ? kebab : `${{EVENT_PREFIX}}${{kebab}}`;
}}

export function dispatch<T>(el: EventTarget, name: string, detail: T): boolean {{
  return el.dispatchEvent(
    new CustomEvent<T>(normalizeEventName(name), {{ detail, bubbles: true, cancelable: true }})
  );
}}

export function parseBooleanAttribute(value: string | null): boolean {{
  return value !== null && value !== 'false';
}}

export interface Debounced<A extends unknown[]> {{
  (...args: A): void;
  cancel(): void;
  pending(): boolean;
}}

export function debounce<A extends unknown[]>(fn: (...args: A) => void, wait = 0): Debounced<A> {{
  let timer: ReturnType<typeof setTimeout> | null = null;
  const debounced = ((...args: A) => {{
    if (timer !== null) clearTimeout(timer);
    timer = setTimeout(() => {{
      timer = null;
      fn(...args);
    }}, wait);
  }}) as Debounced<A>;
  debounced.cancel = () => {{
    if (timer !== null) clearTimeout(timer);
    timer = null;
  }};
  debounced.pending = () => timer !== null;
  return debounced;
}}

// Shared by every element on the page; entries are never evicted.
const primitiveCache = new Map<string, Promise<Primitive>>();

let primitiveLoader: PrimitiveLoader = (name) =>
  import(`./primitives/${{name}}.js`).then((module) => module.default as Primitive);

export function setPrimitiveLoader(loader: PrimitiveLoader): void {{
  primitiveLoader = loader;
}}

export function loadPrimitive(name: string): Promise<Primitive> {{
  let load = primitiveCache.get(name);
  if (!load) {{
    load = primitiveLoader(name);
    primitiveCache.set(name, load);
  }}
  return load;
}}
"#,
        prefix = EVENT_PREFIX,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::{verify_syntax, SourceKind};

    #[test]
    fn exports_every_helper() {
        let source = runtime_module_source();
        for name in RUNTIME_EXPORTS {
            assert!(
                source.contains(&format!("export function {}", name)),
                "missing export {}",
                name
            );
        }
        assert!(source.contains("export const EVENT_PREFIX = 'na-';"));
    }

    #[test]
    fn parses_as_typescript() {
        verify_syntax(&runtime_module_source(), SourceKind::Ts).unwrap();
    }
}
