//! Serialization of the logical resources into output formats.
//!
//! Two resources are rendered per requested format: the styles collection and
//! each style's metadata record.
//!
//! - **json**: compact JSON followed by a newline. Field names and omission
//!   rules come from the serde attributes in [`crate::types`].
//! - **html**: a small self-contained page built with
//!   [maud](https://maud.lambda.xyz/). Style descriptions are markdown.
//!
//! Other formats have no renderer; the generator filters them out before
//! rendering, so asking for one here is an error.

use crate::format::{Format, HTML_MEDIA_TYPE, JSON_MEDIA_TYPE};
use crate::links::Link;
use crate::types::{Document, StyleMetadata, Styles};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("could not render {path} as JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("format {0} has no resource renderer")]
    Unsupported(String),
}

/// A logical resource that can be rendered in several formats.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Styles(&'a Styles),
    Metadata(&'a StyleMetadata),
}

/// Whether [`render`] can produce `format`.
pub fn has_renderer(format: &Format) -> bool {
    format.media_type == JSON_MEDIA_TYPE || format.media_type == HTML_MEDIA_TYPE
}

/// Render `resource` as `format` into a document at `path.<extension>`.
pub fn render(resource: Resource<'_>, path: &str, format: &Format) -> Result<Document, RenderError> {
    let path = format!("{path}.{}", format.extension);
    let content = match format.media_type.as_str() {
        JSON_MEDIA_TYPE => render_json(resource, &path)?,
        HTML_MEDIA_TYPE => render_html(resource).into_string().into_bytes(),
        _ => return Err(RenderError::Unsupported(format.name.clone())),
    };
    Ok(Document::new(path, &format.media_type, content))
}

fn render_json(resource: Resource<'_>, path: &str) -> Result<Vec<u8>, RenderError> {
    let result = match resource {
        Resource::Styles(styles) => serde_json::to_vec(styles),
        Resource::Metadata(metadata) => serde_json::to_vec(metadata),
    };
    let mut content = result.map_err(|source| RenderError::Json {
        path: path.to_string(),
        source,
    })?;
    content.push(b'\n');
    Ok(content)
}

fn render_html(resource: Resource<'_>) -> Markup {
    match resource {
        Resource::Styles(styles) => render_styles_page(styles),
        Resource::Metadata(metadata) => render_metadata_page(metadata),
    }
}

// ============================================================================
// HTML Components
// ============================================================================

const CSS: &str = "body{font-family:sans-serif;max-width:60rem;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:.25rem .5rem;text-align:left}";

fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

fn link_list(links: &[Link]) -> Markup {
    html! {
        ul.links {
            @for link in links {
                li {
                    @let label = link.title.as_deref().unwrap_or(link.rel.as_str());
                    @if let Some(href) = &link.href {
                        a href=(href) rel=(link.rel.as_str()) { (label) }
                    } @else {
                        (label)
                    }
                    @if let Some(media_type) = &link.media_type {
                        " (" code { (media_type) } ")"
                    }
                }
            }
        }
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(markdown));
    out
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_styles_page(styles: &Styles) -> Markup {
    let content = html! {
        h1 { "Styles" }
        @if let Some(default) = &styles.default {
            p.default { "Default style: " strong { (default) } }
        }
        @for style in &styles.styles {
            section.style id=(style.id) {
                h2 { (style.title.as_deref().unwrap_or(&style.id)) }
                (link_list(&style.links))
            }
        }
    };
    base_document("Styles", content)
}

fn render_metadata_page(metadata: &StyleMetadata) -> Markup {
    let title = metadata.display_title();
    let content = html! {
        h1 { (title) }
        @if let Some(description) = &metadata.description {
            div.description { (PreEscaped(markdown_to_html(description))) }
        }
        @if !metadata.keywords.is_empty() {
            p.keywords { "Keywords: " (metadata.keywords.join(", ")) }
        }
        dl.properties {
            @for (label, value) in [
                ("Point of contact", &metadata.point_of_contact),
                ("License", &metadata.license),
                ("Created", &metadata.created),
                ("Updated", &metadata.updated),
                ("Scope", &metadata.scope),
                ("Version", &metadata.version),
            ] {
                @if let Some(value) = value {
                    dt { (label) }
                    dd { (value) }
                }
            }
        }
        @if !metadata.stylesheets.is_empty() {
            h2 { "Stylesheets" }
            table.stylesheets {
                tr { th { "Title" } th { "Version" } th { "Native" } th { "Link" } }
                @for sheet in &metadata.stylesheets {
                    tr {
                        td { (sheet.title.as_deref().unwrap_or("")) }
                        td { (sheet.version.as_deref().unwrap_or("")) }
                        td { @if sheet.native == Some(true) { "yes" } @else { "no" } }
                        td { (link_list(std::slice::from_ref(&sheet.link))) }
                    }
                }
            }
        }
        @if !metadata.layers.is_empty() {
            h2 { "Layers" }
            ul.layers {
                @for layer in &metadata.layers {
                    li {
                        (layer.id)
                        @if let Some(geometry) = layer.geometry_type {
                            " (" (format!("{geometry:?}").to_lowercase()) ")"
                        }
                        @if let Some(sample) = &layer.sample_data {
                            @if let Some(href) = &sample.href {
                                " " a href=(href) { "sample data" }
                            }
                        }
                    }
                }
            }
        }
        @if !metadata.links.is_empty() {
            h2 { "Links" }
            (link_list(&metadata.links))
        }
    };
    base_document(title, content)
}
