//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Styles
//! 001 night → Topographic night style (default)
//!     Stylesheets: mapbox, sld10, custom
//!     Layers: VegetationSrf, hydrographycrv
//!     Links: preview
//!
//! Formats
//!     custom → .custom.json (application/vnd.custom.style+json)
//!
//! Additional assets
//!     fonts/*.pbf (application/x-protobuf)
//!
//! Catalog OK: 1 style
//! ```
//!
//! ## Generate
//!
//! One line per document as it is written, then a summary:
//!
//! ```text
//! fonts/bold.pbf (application/x-protobuf, 11 bytes)
//! styles/night.mapbox.json (application/vnd.mapbox.style+json, 48 bytes)
//! styles/night/metadata.json (application/json, 1204 bytes)
//! styles.json (application/json, 596 bytes)
//!
//! Generated 4 documents in dist: 1 collection, 1 metadata, 1 stylesheet, 1 additional asset
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::format;
use crate::links::STYLES_RESOURCE;
use crate::types::{Document, StylesConfig};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the inventory of a validated catalog.
pub fn format_check_output(catalog: &StylesConfig) -> Vec<String> {
    let mut lines = vec!["Styles".to_string()];
    let additional = &catalog.additional_formats;

    for (i, style) in catalog.styles.iter().enumerate() {
        let marker = if catalog.default.as_deref() == Some(style.id.as_str()) {
            " (default)"
        } else {
            ""
        };
        let header = match &style.title {
            Some(title) => format!("{} {} \u{2192} {}", format_index(i + 1), style.id, title),
            None => format!("{} {}", format_index(i + 1), style.id),
        };
        lines.push(format!("{header}{marker}"));

        let encodings: Vec<String> = style
            .stylesheets
            .iter()
            .map(|s| {
                let f = format::resolve_optional(s.link.media_type.as_deref(), additional, true);
                if f.is_empty() {
                    s.link.media_type.clone().unwrap_or_else(|| "?".to_string())
                } else {
                    f.name
                }
            })
            .collect();
        lines.push(format!("{}Stylesheets: {}", indent(1), encodings.join(", ")));

        if !style.layers.is_empty() {
            let ids: Vec<&str> = style.layers.iter().map(|l| l.id.as_str()).collect();
            lines.push(format!("{}Layers: {}", indent(1), ids.join(", ")));
        }
        if !style.links.is_empty() {
            let rels: Vec<&str> = style.links.iter().map(|l| l.rel.as_str()).collect();
            lines.push(format!("{}Links: {}", indent(1), rels.join(", ")));
        }
    }

    if !catalog.additional_formats.is_empty() {
        lines.push(String::new());
        lines.push("Formats".to_string());
        for f in &catalog.additional_formats {
            lines.push(format!(
                "{}{} \u{2192} .{} ({})",
                indent(1),
                f.name,
                f.extension,
                f.media_type
            ));
        }
    }

    if !catalog.additional_assets.is_empty() {
        lines.push(String::new());
        lines.push("Additional assets".to_string());
        for asset in &catalog.additional_assets {
            lines.push(format!("{}{} ({})", indent(1), asset.path, asset.media_type));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Catalog OK: {}",
        plural(catalog.styles.len(), "style", "styles")
    ));
    lines
}

pub fn print_check_output(catalog: &StylesConfig) {
    for line in format_check_output(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

/// What a generated document is, judged by its output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Collection,
    Metadata,
    Stylesheet,
    Resource,
    AdditionalAsset,
}

impl DocumentKind {
    pub fn of(path: &str) -> Self {
        let styles_dir = format!("{STYLES_RESOURCE}/");
        let collection = format!("{STYLES_RESOURCE}.");
        if path.starts_with(&collection) {
            Self::Collection
        } else if let Some(rest) = path.strip_prefix(&styles_dir) {
            if rest.contains("/metadata.") {
                Self::Metadata
            } else {
                Self::Stylesheet
            }
        } else if path.starts_with("resources/") {
            Self::Resource
        } else {
            Self::AdditionalAsset
        }
    }
}

/// Running totals over the documents of one generate run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub collections: usize,
    pub metadata: usize,
    pub stylesheets: usize,
    pub resources: usize,
    pub additional_assets: usize,
}

impl GenerateSummary {
    pub fn record(&mut self, document: &Document) {
        match DocumentKind::of(&document.path) {
            DocumentKind::Collection => self.collections += 1,
            DocumentKind::Metadata => self.metadata += 1,
            DocumentKind::Stylesheet => self.stylesheets += 1,
            DocumentKind::Resource => self.resources += 1,
            DocumentKind::AdditionalAsset => self.additional_assets += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.collections + self.metadata + self.stylesheets + self.resources + self.additional_assets
    }
}

/// One line per written document.
pub fn format_document_line(document: &Document) -> String {
    format!(
        "{} ({}, {})",
        document.path,
        document.media_type,
        plural(document.content.len(), "byte", "bytes")
    )
}

/// Closing summary of a generate run. Zero counts are left out.
pub fn format_generate_summary(summary: &GenerateSummary, output_dir: &Path) -> String {
    let parts: Vec<String> = [
        (summary.collections, "collection", "collections"),
        (summary.metadata, "metadata", "metadata"),
        (summary.stylesheets, "stylesheet", "stylesheets"),
        (summary.resources, "resource", "resources"),
        (summary.additional_assets, "additional asset", "additional assets"),
    ]
    .into_iter()
    .filter(|(count, _, _)| *count > 0)
    .map(|(count, singular, many)| plural(count, singular, many))
    .collect();

    let head = format!(
        "Generated {} in {}",
        plural(summary.total(), "document", "documents"),
        output_dir.display()
    );
    if parts.is_empty() {
        head
    } else {
        format!("{head}: {}", parts.join(", "))
    }
}

pub fn print_document_line(document: &Document) {
    println!("{}", format_document_line(document));
}

pub fn print_generate_summary(summary: &GenerateSummary, output_dir: &Path) {
    println!();
    println!("{}", format_generate_summary(summary, output_dir));
}
