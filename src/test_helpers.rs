//! Shared test utilities.
//!
//! Provides the sample catalog, an asset directory matching it, and lookup
//! helpers over generated documents.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let assets = setup_assets();
//! let documents = generate_documents(&sample_catalog(), assets.path(), &json_only()).unwrap();
//!
//! let styles = find_json(&documents, "styles.json");
//! assert_eq!(styles["default"], "night");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::{self, CatalogSyntax};
use crate::generate::GenerateOptions;
use crate::links::{Link, LinkRelation};
use crate::types::{Document, StyleMetadata, StyleSheet, StylesConfig};

pub const BASE: &str = "https://example.org/catalog/1.0";

/// Bytes of the sample preview. Not valid UTF-8 on purpose.
pub const THUMBNAIL_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0x00];

// =========================================================================
// Fixture setup
// =========================================================================

/// The stock catalog from `gen-config`, parsed.
pub fn sample_catalog() -> StylesConfig {
    config::parse_catalog(
        config::stock_catalog_yaml(),
        CatalogSyntax::Yaml,
        Path::new("<stock>"),
    )
    .unwrap()
}

/// A style with one Mapbox stylesheet backed by `night.mapbox.json` and nothing else.
pub fn minimal_style(id: &str) -> StyleMetadata {
    StyleMetadata {
        id: id.to_string(),
        title: Some("Topographic night style".to_string()),
        stylesheets: vec![StyleSheet {
            link: Link {
                media_type: Some(crate::format::MAPBOX_MEDIA_TYPE.to_string()),
                asset_filename: Some("night.mapbox.json".to_string()),
                ..Link::new(LinkRelation::Stylesheet)
            },
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// A catalog with a single minimal style and nothing else.
pub fn minimal_catalog() -> StylesConfig {
    StylesConfig {
        base_resource: BASE.to_string(),
        styles: vec![minimal_style("night")],
        ..Default::default()
    }
}

/// Write the assets referenced by the sample catalog into a temp directory.
pub fn setup_assets() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_asset(
        tmp.path(),
        "night.mapbox.json",
        br#"{"MAPBOX_STYLE": "{{ base_resource }}"}"#,
    );
    write_asset(
        tmp.path(),
        "night.sld",
        br#"<root href="{{ base_resource }}">SLD</root>"#,
    );
    write_asset(
        tmp.path(),
        "night.custom.json",
        b"Custom Style = {{ base_resource }}",
    );
    write_asset(tmp.path(), "thumbnail.png", THUMBNAIL_BYTES);
    write_asset(tmp.path(), "fonts/bold.pbf", b"bold glyphs");
    write_asset(tmp.path(), "fonts/regular.pbf", b"regular glyphs");
    write_asset(tmp.path(), "fonts/LICENSE.txt", b"OFL");
    tmp
}

pub fn write_asset(dir: &Path, relative: &str, content: &[u8]) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

pub fn json_only() -> GenerateOptions {
    GenerateOptions::default()
}

// =========================================================================
// Document lookups (panic with the available paths on miss)
// =========================================================================

/// All document paths in generation order.
pub fn document_paths(documents: &[Document]) -> Vec<&str> {
    documents.iter().map(|d| d.path.as_str()).collect()
}

/// Find a document by path. Panics if not found.
pub fn find_document<'a>(documents: &'a [Document], path: &str) -> &'a Document {
    documents
        .iter()
        .find(|d| d.path == path)
        .unwrap_or_else(|| {
            let paths = document_paths(documents);
            panic!("document '{path}' not found. Available: {paths:?}")
        })
}

/// Find a document by path and parse it as JSON. Panics on miss or bad JSON.
pub fn find_json(documents: &[Document], path: &str) -> serde_json::Value {
    let document = find_document(documents, path);
    serde_json::from_slice(&document.content)
        .unwrap_or_else(|e| panic!("document '{path}' is not valid JSON: {e}"))
}

/// Find a document by path and return it as text. Panics on miss or bad UTF-8.
pub fn find_text<'a>(documents: &'a [Document], path: &str) -> &'a str {
    let document = find_document(documents, path);
    std::str::from_utf8(&document.content)
        .unwrap_or_else(|e| panic!("document '{path}' is not UTF-8: {e}"))
}
