//! Style catalog loading.
//!
//! The catalog is a single YAML or TOML file describing every style, its
//! encodings, links and the assets backing them. The file extension picks the
//! parser (`.yaml`/`.yml` or `.toml`). Unknown keys are rejected everywhere to
//! catch typos early; unknown link relations and geometry types are rejected
//! the same way.
//!
//! ## Example
//!
//! ```yaml
//! base-resource: https://example.org/catalog/1.0
//! default: night
//! additional-formats:
//!   - media-type: application/vnd.custom.style+json
//!     name: custom
//!     extension: custom.json
//! styles:
//!   - id: night
//!     title: Topographic night style
//!     stylesheets:
//!       - title: Mapbox Style
//!         native: true
//!         link:
//!           rel: stylesheet
//!           type: application/vnd.mapbox.style+json
//!           asset-filename: night.mapbox.json
//! ```
//!
//! Run `ogc-styles-gen gen-config` for a complete, commented catalog.
//!
//! ## Normalization
//!
//! `base-resource` is stored without leading or trailing slashes so that hrefs
//! can always be joined as `{base}/{path}`.

use crate::types::StylesConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read catalog {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),
    #[error("could not parse catalog {1}: {0}")]
    Yaml(#[source] serde_yaml::Error, PathBuf),
    #[error("could not parse catalog {1}: {0}")]
    Toml(#[source] toml::de::Error, PathBuf),
    #[error("unsupported catalog file {0}: expected a .yaml, .yml or .toml extension")]
    UnsupportedExtension(PathBuf),
}

/// Serialization syntax of a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSyntax {
    Yaml,
    Toml,
}

impl CatalogSyntax {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Read, parse and normalize a catalog file.
pub fn load_catalog(path: &Path) -> Result<StylesConfig, ConfigError> {
    let syntax = CatalogSyntax::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedExtension(path.to_path_buf()))?;
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e, path.to_path_buf()))?;
    parse_catalog(&content, syntax, path)
}

/// Parse catalog text. `origin` is only used in error messages.
pub fn parse_catalog(
    content: &str,
    syntax: CatalogSyntax,
    origin: &Path,
) -> Result<StylesConfig, ConfigError> {
    let mut catalog: StylesConfig = match syntax {
        CatalogSyntax::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::Yaml(e, origin.into()))?
        }
        CatalogSyntax::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::Toml(e, origin.into()))?
        }
    };
    catalog.base_resource = normalize_base_resource(&catalog.base_resource);
    Ok(catalog)
}

pub fn normalize_base_resource(base: &str) -> String {
    base.trim_matches('/').to_string()
}

/// A documented example catalog, printed by `gen-config`.
pub fn stock_catalog_yaml() -> &'static str {
    STOCK_CATALOG
}

const STOCK_CATALOG: &str = r#"# Style catalog for ogc-styles-gen.
#
# Every href for stylesheets, previews, preloads and the metadata documents is
# computed from base-resource; hrefs written here for those links are replaced.

# URL the generated document set will be served from (no trailing slash needed).
base-resource: https://example.org/catalog/1.0

# Style picked by clients without a preference. Must be one of the ids below.
default: night

# Media types beyond the built-ins (json, html, sld, mapbox, png).
additional-formats:
  - media-type: application/vnd.custom.style+json
    name: custom
    extension: custom.json

# Static files copied verbatim, matched by glob relative to the asset directory.
additional-assets:
  - path: "fonts/*.pbf"
    media-type: application/x-protobuf

styles:
  - id: night
    title: Topographic night style
    description: >-
      This topographic basemap style is designed to be used in situations with
      low ambient light.
    keywords: [basemap, TDS, OGC API]
    point-of-contact: John Doe
    license: MIT
    created: "2019-01-01T10:05:00Z"
    updated: "2019-01-01T11:05:00Z"
    scope: style
    version: 1.0.0
    stylesheets:
      # Stylesheet assets are templates: {{ base_resource }}, {{ styles_url }},
      # {{ default_style }}, {{ style_id }}, {{ style_title }}, {{ catalog }}
      # and {{ style }} are available.
      - title: Mapbox Style
        version: "8"
        specification: https://docs.mapbox.com/mapbox-gl-js/style-spec/
        native: true
        link:
          rel: stylesheet
          type: application/vnd.mapbox.style+json
          asset-filename: night.mapbox.json
      - title: OGC SLD
        version: "1.0"
        native: false
        link:
          rel: stylesheet
          type: application/vnd.ogc.sld+xml;version=1.0
          asset-filename: night.sld
      - title: Custom Style
        native: true
        link:
          rel: stylesheet
          type: application/vnd.custom.style+json
          asset-filename: night.custom.json
    layers:
      - id: VegetationSrf
        type: polygons
        sample-data:
          href: https://demo.ldproxy.net/daraa/collections/VegetationSrf/items?f=json&limit=100
          rel: start
          type: application/geo+json
      - id: hydrographycrv
        type: lines
    links:
      - rel: preview
        type: image/png
        title: thumbnail of the night style applied to OSM data from Daraa, Syria
        asset-filename: thumbnail.png
"#;
