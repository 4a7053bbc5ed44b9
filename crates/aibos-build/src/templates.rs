//! API documentation rendering.
//!
//! Each component gets a Markdown reference page (rendered with minijinja)
//! and an HTML version of the same page wrapped in a layout with navigation.

use indexmap::IndexMap;
use minijinja::{context, Environment};
use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;

use aibos_spec::ComponentSpec;

/// A navigation item.
#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// URL path
    pub path: String,
    /// Whether this is the active page
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropDoc {
    pub name: String,
    pub ty: String,
    pub default: Option<String>,
    pub required: bool,
    pub description: Option<String>,
}

/// A named class list (variant, state or part).
#[derive(Debug, Clone, Serialize)]
pub struct ClassesDoc {
    pub name: String,
    pub classes: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// Template view of a component spec.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentDoc {
    pub name: String,
    pub description: Option<String>,
    pub tag_name: String,
    pub composite: bool,
    pub primitive: Option<String>,
    pub element: Option<String>,
    pub props: Vec<PropDoc>,
    pub variants: Vec<ClassesDoc>,
    pub states: Vec<ClassesDoc>,
    pub parts: Vec<ClassesDoc>,
    pub handled_by: Option<String>,
    pub aria: Vec<KeyValue>,
    pub keyboard: Vec<KeyValue>,
    pub features: Vec<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub related: Vec<String>,
}

impl ComponentDoc {
    pub fn from_spec(spec: &ComponentSpec) -> Self {
        let accessibility = spec.accessibility.as_ref();
        let metadata = spec.metadata.as_ref();
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            tag_name: spec.tag_name(),
            composite: spec.has_parts(),
            primitive: spec.radix_primitive.map(|p| p.package()),
            element: spec.element().map(|e| e.as_str().to_string()),
            props: spec
                .props
                .iter()
                .map(|(name, prop)| PropDoc {
                    name: name.clone(),
                    ty: prop.ty.clone(),
                    default: prop.default.as_ref().map(|v| v.to_string()),
                    required: prop.is_required(),
                    description: prop.description.clone(),
                })
                .collect(),
            variants: spec
                .variants
                .iter()
                .map(|(name, v)| ClassesDoc {
                    name: name.clone(),
                    classes: v.aibos_classes.clone(),
                    description: v.description.clone(),
                })
                .collect(),
            states: spec
                .states
                .iter()
                .flatten()
                .map(|(name, s)| ClassesDoc {
                    name: name.clone(),
                    classes: s.aibos_classes.clone(),
                    description: s.description.clone(),
                })
                .collect(),
            parts: spec
                .parts
                .iter()
                .flatten()
                .map(|(name, p)| ClassesDoc {
                    name: name.clone(),
                    classes: p.aibos_classes.clone(),
                    description: p.description.clone(),
                })
                .collect(),
            handled_by: accessibility.map(|a| a.handled_by.as_str().to_string()),
            aria: key_values(accessibility.and_then(|a| a.aria.as_ref())),
            keyboard: key_values(accessibility.and_then(|a| a.keyboard.as_ref())),
            features: accessibility
                .and_then(|a| a.features.clone())
                .unwrap_or_default(),
            category: metadata
                .and_then(|m| m.category)
                .map(|c| c.as_str().to_string()),
            tags: metadata.and_then(|m| m.tags.clone()).unwrap_or_default(),
            related: metadata.and_then(|m| m.related.clone()).unwrap_or_default(),
        }
    }
}

fn key_values(map: Option<&IndexMap<String, String>>) -> Vec<KeyValue> {
    map.into_iter()
        .flatten()
        .map(|(key, value)| KeyValue {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Renders component reference pages.
pub struct DocsRenderer {
    env: Environment<'static>,
    site_title: String,
}

impl DocsRenderer {
    pub fn new(site_title: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_filter("cell", |value: String| value.replace('|', "\\|"));

        env.add_template("component.md", COMPONENT_TEMPLATE)?;
        env.add_template("index.md", INDEX_TEMPLATE)?;
        env.add_template("page.html", PAGE_TEMPLATE)?;
        env.add_template("nav.html", NAV_TEMPLATE)?;

        Ok(Self {
            env,
            site_title: site_title.into(),
        })
    }

    /// Markdown reference for one component.
    pub fn render_markdown(&self, doc: &ComponentDoc) -> Result<String, minijinja::Error> {
        self.env.get_template("component.md")?.render(doc)
    }

    /// Markdown listing of every component.
    pub fn render_index_markdown(&self, docs: &[ComponentDoc]) -> Result<String, minijinja::Error> {
        self.env
            .get_template("index.md")?
            .render(context! { site_title => &self.site_title, components => docs })
    }

    /// Wrap rendered Markdown in the HTML layout.
    pub fn render_page(
        &self,
        title: &str,
        markdown: &str,
        nav: &[NavItem],
        stylesheet: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("page.html")?.render(context! {
            title => title,
            site_title => &self.site_title,
            content => markdown_to_html(markdown),
            nav => nav,
            stylesheet => stylesheet,
        })
    }
}

/// Navigation with the page for `active` highlighted.
pub fn navigation(names: &[&str], active: Option<&str>) -> Vec<NavItem> {
    names
        .iter()
        .map(|name| NavItem {
            title: name.to_string(),
            path: format!("{}.html", name),
            active: active == Some(*name),
        })
        .collect()
}

pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

const COMPONENT_TEMPLATE: &str = r##"# {{ name }}

{% if description %}
{{ description }}

{% endif %}
- Tag: `<{{ tag_name }}>`
- Kind: {% if composite %}composite{% else %}simple{% endif %}

{% if primitive %}
- Primitive: `{{ primitive }}`
{% endif %}
{% if element %}
- Element: `<{{ element }}>`
{% endif %}

## Props

{% if props %}
| Name | Type | Default | Required | Description |
| --- | --- | --- | --- | --- |
{% for prop in props %}
| `{{ prop.name }}` | `{{ prop.ty | cell }}` | {% if prop.default %}`{{ prop.default | cell }}`{% else %}-{% endif %} | {% if prop.required %}yes{% else %}no{% endif %} | {{ (prop.description or "") | cell }} |
{% endfor %}
{% else %}
No props.
{% endif %}

## Variants

| Variant | Classes |
| --- | --- |
{% for variant in variants %}
| `{{ variant.name }}` | {{ variant.classes | join(" ") }} |
{% endfor %}
{% if states %}

## States

| State | Classes | Description |
| --- | --- | --- |
{% for state in states %}
| `{{ state.name }}` | {{ state.classes | join(" ") }} | {{ (state.description or "") | cell }} |
{% endfor %}
{% endif %}
{% if parts %}

## Parts

| Part | Classes | Description |
| --- | --- | --- |
{% for part in parts %}
| `{{ part.name }}` | {{ part.classes | join(" ") }} | {{ (part.description or "") | cell }} |
{% endfor %}
{% endif %}
{% if handled_by %}

## Accessibility

Handled by: {{ handled_by }}

{% for attr in aria %}
- `{{ attr.key }}`: {{ attr.value }}
{% endfor %}
{% if keyboard %}

| Key | Action |
| --- | --- |
{% for binding in keyboard %}
| `{{ binding.key | cell }}` | {{ binding.value | cell }} |
{% endfor %}
{% endif %}
{% for feature in features %}
- {{ feature }}
{% endfor %}
{% endif %}
{% if category or tags or related %}

## Metadata

{% if category %}
- Category: {{ category }}
{% endif %}
{% if tags %}
- Tags: {{ tags | join(", ") }}
{% endif %}
{% if related %}
- Related: {{ related | join(", ") }}
{% endif %}
{% endif %}
"##;

const INDEX_TEMPLATE: &str = r##"# {{ site_title }}

| Component | Tag | Description |
| --- | --- | --- |
{% for component in components %}
| [{{ component.name }}]({{ component.name }}.html) | `<{{ component.tag_name }}>` | {{ (component.description or "") | cell }} |
{% endfor %}
"##;

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  <link rel="stylesheet" href="{{ stylesheet }}">
</head>
<body>
  <div class="layout">
    <nav class="sidebar">
      {% include "nav.html" %}
    </nav>
    <main class="main">
      <article class="doc">
        {{ content | safe }}
      </article>
    </main>
  </div>
</body>
</html>"##;

const NAV_TEMPLATE: &str = r##"<div class="nav-header">
  <a href="index.html" class="nav-logo">{{ site_title }}</a>
</div>
<ul class="nav-list">
{% for item in nav %}
  <li class="nav-item{% if item.active %} active{% endif %}">
    <a href="{{ item.path }}">{{ item.title }}</a>
  </li>
{% endfor %}
</ul>"##;
