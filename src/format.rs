//! Media-type to format registry.
//!
//! Every link and document carries a media type (`application/vnd.mapbox.style+json`,
//! `application/vnd.ogc.sld+xml;version=1.0`, ...). Hrefs and output paths need a
//! short, stable name for it (`?f=mapbox`) and a file extension (`.mapbox.json`).
//! This module owns that mapping.
//!
//! ## Lookup Order
//!
//! The built-in formats are consulted first, then the catalog's
//! `additional-formats` list in declaration order. The first match wins, so a
//! catalog cannot redefine `application/json`.
//!
//! ## Versioned Names
//!
//! Media types may carry a `version` parameter. When asked for a versioned
//! format, the digits of that parameter are appended to the name:
//!
//! ```text
//! application/vnd.ogc.sld+xml;version=1.0  →  name "sld10", extension "sld"
//! ```
//!
//! The extension is never versioned.

use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const JSON_MEDIA_TYPE: &str = "application/json";
pub const HTML_MEDIA_TYPE: &str = "text/html";
pub const SLD_MEDIA_TYPE: &str = "application/vnd.ogc.sld+xml";
pub const MAPBOX_MEDIA_TYPE: &str = "application/vnd.mapbox.style+json";
pub const PNG_MEDIA_TYPE: &str = "image/png";

const PARAM_SEPARATOR: char = ';';
const PARAM_VALUE_SEPARATOR: char = '=';
const VERSION_PARAM: &str = "version";

/// A media type with its short name and file extension.
///
/// The empty format (all fields empty) stands for "unknown media type": no
/// query parameter and no extension apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Format {
    #[serde(rename = "media-type")]
    pub media_type: String,
    pub name: String,
    pub extension: String,
}

impl Format {
    pub fn new(media_type: &str, name: &str, extension: &str) -> Self {
        Self {
            media_type: media_type.to_string(),
            name: name.to_string(),
            extension: extension.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// The `f=<name>` query fragment, or an empty string for the empty format.
    pub fn to_query(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("f={}", self.name)
        }
    }
}

static BUILTIN_FORMATS: LazyLock<Vec<Format>> = LazyLock::new(|| {
    vec![
        Format::new(JSON_MEDIA_TYPE, "json", "json"),
        Format::new(HTML_MEDIA_TYPE, "html", "html"),
        Format::new(SLD_MEDIA_TYPE, "sld", "sld"),
        Format::new(MAPBOX_MEDIA_TYPE, "mapbox", "mapbox.json"),
        Format::new(PNG_MEDIA_TYPE, "png", "png"),
    ]
});

pub fn builtin_formats() -> &'static [Format] {
    &BUILTIN_FORMATS
}

/// Split a media type into its root and its `key=value` parameters.
///
/// A parameter without `=` gets an empty value. Parameters with more than one
/// `=` are dropped with a warning.
pub fn split_params(media_type: &str) -> (&str, Vec<(&str, &str)>) {
    let mut parts = media_type.split(PARAM_SEPARATOR);
    let root = parts.next().unwrap_or_default().trim();
    let mut params = Vec::new();
    for part in parts {
        let pieces: Vec<&str> = part.split(PARAM_VALUE_SEPARATOR).collect();
        match pieces.as_slice() {
            [key] => params.push((key.trim(), "")),
            [key, value] => params.push((key.trim(), value.trim())),
            _ => warn!("media type `{media_type}` has an unparseable parameter `{part}`"),
        }
    }
    (root, params)
}

/// Resolve a media type to its format.
///
/// Returns the empty format when neither the built-ins nor `additional`
/// know the media type.
pub fn resolve_format(media_type: &str, additional: &[Format], versioned: bool) -> Format {
    let (root, params) = split_params(media_type);
    let Some(found) = builtin_formats()
        .iter()
        .chain(additional)
        .find(|f| f.media_type == root)
    else {
        return Format::default();
    };

    let mut format = found.clone();
    if versioned {
        if let Some((_, version)) = params.iter().find(|(key, _)| *key == VERSION_PARAM) {
            let digits: String = version.chars().filter(char::is_ascii_digit).collect();
            format.name.push_str(&digits);
        }
    }
    format
}

/// Same as [`resolve_format`] for an optional media type.
pub fn resolve_optional(media_type: Option<&str>, additional: &[Format], versioned: bool) -> Format {
    media_type
        .map(|m| resolve_format(m, additional, versioned))
        .unwrap_or_default()
}

/// Look up a format by its short name (`json`, `html`, ...).
pub fn format_by_name(name: &str, additional: &[Format]) -> Option<Format> {
    builtin_formats()
        .iter()
        .chain(additional)
        .find(|f| f.name == name)
        .cloned()
}
