//! Catalog and output types.
//!
//! The catalog types (`StylesConfig` and everything below it) are deserialized
//! from the user's catalog file with kebab-case keys and rejected on unknown
//! fields. The same structs serialize to the OGC API Styles JSON shape
//! (camelCase keys, absent optionals omitted), which is what the metadata
//! documents contain.
//!
//! `Styles` and `Style` only exist on the output side: they are assembled by
//! the generator and never read from the catalog.

use crate::format::Format;
use crate::links::Link;
use serde::{Deserialize, Serialize};

/// Root of the style catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StylesConfig {
    /// Base URL every href is built on. Stored without leading/trailing `/`.
    #[serde(rename = "base-resource")]
    pub base_resource: String,
    /// Id of the style clients should pick when they have no preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Catalog-specific media types, consulted after the built-in ones.
    #[serde(
        default,
        rename = "additional-formats",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub additional_formats: Vec<Format>,
    /// Static files copied verbatim from the asset directory.
    #[serde(
        default,
        rename = "additional-assets",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub additional_assets: Vec<AdditionalAsset>,
    #[serde(default)]
    pub styles: Vec<StyleMetadata>,
}

/// A glob over the asset directory plus the media type of what it matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdditionalAsset {
    pub path: String,
    #[serde(rename = "media-type")]
    pub media_type: String,
}

/// Style metadata record (OGC API Styles, requirement 7B).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleMetadata {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(
        default,
        rename(deserialize = "point-of-contact", serialize = "pointOfContact"),
        skip_serializing_if = "Option::is_none"
    )]
    pub point_of_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stylesheets: Vec<StyleSheet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<Layer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl StyleMetadata {
    /// Title for display purposes: the declared title, else the id.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// One encoding of a style, e.g. Mapbox JSON or SLD 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleSheet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<bool>,
    pub link: Link,
}

/// A data layer the style applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layer {
    pub id: String,
    #[serde(
        default,
        rename(deserialize = "type", serialize = "geometryType"),
        skip_serializing_if = "Option::is_none"
    )]
    pub geometry_type: Option<GeometryType>,
    #[serde(
        default,
        rename(deserialize = "sample-data", serialize = "sampleData"),
        skip_serializing_if = "Option::is_none"
    )]
    pub sample_data: Option<Link>,
    #[serde(
        default,
        rename(deserialize = "properties-schema", serialize = "propertiesSchema"),
        skip_serializing_if = "Option::is_none"
    )]
    pub properties_schema: Option<PropertiesSchema>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryType {
    Points,
    Lines,
    Polygons,
    Solids,
    Any,
}

/// Placeholder for a layer's property schema. Accepted and echoed as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertiesSchema {}

/// The styles collection resource (OGC API Styles, requirement 3B).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Styles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub styles: Vec<Style>,
}

/// One entry of the styles collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub links: Vec<Link>,
}

/// A generated output file, addressed relative to the output root.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: String,
    pub media_type: String,
    pub content: Vec<u8>,
}

impl Document {
    pub fn new(path: impl Into<String>, media_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            media_type: media_type.into(),
            content,
        }
    }
}
