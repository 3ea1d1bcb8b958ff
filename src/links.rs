//! Link relations and href resolution.
//!
//! Only a handful of relations correspond to resources this tool actually
//! writes; those are the ones with a path:
//!
//! | Relation | Path |
//! |----------|------|
//! | `http://www.opengis.net/def/rel/ogc/1.0/styles` | `styles` |
//! | `stylesheet` | `styles/{id}` |
//! | `describedby` | `styles/{id}/metadata` |
//! | `preview`, `preload` | `resources/{id}` |
//!
//! Every other relation is a decoration: it can appear on a link, but no path
//! can be derived for it and asking for one is an error.

use crate::format::{self, Format};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const STYLES_RESOURCE: &str = "styles";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no path known for link relation: {0}")]
    UnsupportedRelation(LinkRelation),
    #[error("href may not contain both a format query parameter and an extension")]
    ConflictingHrefFormat,
    #[error("link with relation {0} has no href and none can be derived")]
    MissingHref(LinkRelation),
}

/// Link relation types known to OGC API Styles (section 5.2).
///
/// Unknown relations are rejected when the catalog is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkRelation {
    #[serde(rename = "alternate")]
    Alternate,
    #[serde(rename = "collection")]
    Collection,
    #[serde(rename = "describedby")]
    DescribedBy,
    /// Sample data that may need special handling (e.g. a GeoPackage).
    #[serde(rename = "enclosure")]
    Enclosure,
    /// Thumbnail of the style applied to sample data.
    #[serde(rename = "preview")]
    Preview,
    /// Resources loaded ahead of rendering, such as fonts or sprites.
    #[serde(rename = "preload")]
    Preload,
    #[serde(rename = "self")]
    SelfLink,
    #[serde(rename = "service-desc")]
    ServiceDesc,
    #[serde(rename = "service-doc")]
    ServiceDoc,
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "stylesheet")]
    Stylesheet,
    #[serde(rename = "http://www.opengis.net/def/rel/ogc/1.0/schema")]
    Schema,
    #[serde(rename = "http://www.opengis.net/def/rel/ogc/1.0/styles")]
    Styles,
    #[serde(rename = "http://www.opengis.net/def/rel/ogc/1.0/conformance")]
    Conformance,
    #[serde(rename = "http://www.opengis.net/def/rel/ogc/1.0/tilesets-vector")]
    TilesetsVector,
    #[serde(rename = "http://www.opengis.net/def/rel/ogc/1.0/tileset-coverage")]
    TilesetCoverage,
}

impl LinkRelation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alternate => "alternate",
            Self::Collection => "collection",
            Self::DescribedBy => "describedby",
            Self::Enclosure => "enclosure",
            Self::Preview => "preview",
            Self::Preload => "preload",
            Self::SelfLink => "self",
            Self::ServiceDesc => "service-desc",
            Self::ServiceDoc => "service-doc",
            Self::Start => "start",
            Self::Stylesheet => "stylesheet",
            Self::Schema => "http://www.opengis.net/def/rel/ogc/1.0/schema",
            Self::Styles => "http://www.opengis.net/def/rel/ogc/1.0/styles",
            Self::Conformance => "http://www.opengis.net/def/rel/ogc/1.0/conformance",
            Self::TilesetsVector => "http://www.opengis.net/def/rel/ogc/1.0/tilesets-vector",
            Self::TilesetCoverage => "http://www.opengis.net/def/rel/ogc/1.0/tileset-coverage",
        }
    }

    /// Resource path for this relation and identifier.
    pub fn to_path(self, identifier: &str) -> Result<String, ResolveError> {
        match self {
            Self::Styles => Ok(STYLES_RESOURCE.to_string()),
            Self::Stylesheet => Ok(format!("styles/{identifier}")),
            Self::DescribedBy => Ok(format!("styles/{identifier}/metadata")),
            Self::Preview | Self::Preload => Ok(format!("resources/{identifier}")),
            Self::Alternate
            | Self::Collection
            | Self::Enclosure
            | Self::SelfLink
            | Self::ServiceDesc
            | Self::ServiceDoc
            | Self::Start
            | Self::Schema
            | Self::Conformance
            | Self::TilesetsVector
            | Self::TilesetCoverage => Err(ResolveError::UnsupportedRelation(self)),
        }
    }

    /// Absolute URL: `{base}/{path}`.
    pub fn to_url(self, base_resource: &str, identifier: &str) -> Result<String, ResolveError> {
        let path = self.to_path(identifier)?;
        Ok(format!("{base_resource}/{path}"))
    }

    /// Whether the generator writes a resource for links of this relation.
    pub fn has_path(self) -> bool {
        self.to_path("").is_ok()
    }
}

impl fmt::Display for LinkRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed hyperlink, as used in both the catalog and the output documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    /// File in the asset directory holding the linked content. Never serialized.
    #[serde(default, rename = "asset-filename", skip_serializing)]
    pub asset_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub rel: LinkRelation,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
}

impl Link {
    pub fn new(rel: LinkRelation) -> Self {
        Self {
            asset_filename: None,
            href: None,
            rel,
            media_type: None,
            title: None,
            hreflang: None,
            length: None,
        }
    }

    /// Copy of this link under another relation.
    pub fn with_relation(&self, rel: LinkRelation) -> Self {
        Self { rel, ..self.clone() }
    }

    fn format(&self, additional: &[Format], versioned: bool) -> Format {
        format::resolve_optional(self.media_type.as_deref(), additional, versioned)
    }

    /// Output path of the resource this link points to.
    ///
    /// The unversioned format extension is appended unless the path already
    /// ends with it (`resources/thumb.png` stays as is).
    pub fn to_path(&self, identifier: &str, additional: &[Format]) -> Result<String, ResolveError> {
        let path = self.rel.to_path(identifier)?;
        let extension = self.format(additional, false).extension;
        Ok(append_extension(path, &extension))
    }

    /// Compute and store the canonical href for this link.
    ///
    /// With `with_query` the versioned format name is added as `?f=<name>`;
    /// with `with_extension` the format extension is appended. Asking for
    /// both is an error. Any href already on the link is replaced.
    pub fn update_href(
        &mut self,
        base_resource: &str,
        identifier: &str,
        additional: &[Format],
        with_query: bool,
        with_extension: bool,
    ) -> Result<(), ResolveError> {
        if with_query && with_extension {
            return Err(ResolveError::ConflictingHrefFormat);
        }
        let mut url = self.rel.to_url(base_resource, identifier)?;
        let format = self.format(additional, true);
        if with_query {
            let query = format.to_query();
            if !query.is_empty() {
                url = format!("{url}?{query}");
            }
        } else if with_extension {
            url = append_extension(url, &format.extension);
        }
        self.set_href(url);
        Ok(())
    }

    /// Replace the href, warning when a declared one is discarded.
    pub fn set_href(&mut self, href: String) {
        if let Some(previous) = &self.href {
            if *previous != href {
                warn!("link href `{previous}` not empty, overwriting with: `{href}`");
            }
        }
        self.href = Some(href);
    }
}

/// A bare `stylesheet` link, the kind every [`crate::types::StyleSheet`] embeds.
impl Default for Link {
    fn default() -> Self {
        Self::new(LinkRelation::Stylesheet)
    }
}

fn append_extension(path: String, extension: &str) -> String {
    if extension.is_empty() || path.ends_with(&format!(".{extension}")) {
        path
    } else {
        format!("{path}.{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{MAPBOX_MEDIA_TYPE, PNG_MEDIA_TYPE};

    const BASE: &str = "https://example.org/catalog/1.0";

    fn link(rel: LinkRelation, media_type: Option<&str>) -> Link {
        Link {
            media_type: media_type.map(str::to_string),
            ..Link::new(rel)
        }
    }

    #[test]
    fn relation_paths() {
        assert_eq!(LinkRelation::Styles.to_path("x").unwrap(), "styles");
        assert_eq!(LinkRelation::Stylesheet.to_path("night").unwrap(), "styles/night");
        assert_eq!(
            LinkRelation::DescribedBy.to_path("night").unwrap(),
            "styles/night/metadata"
        );
        assert_eq!(
            LinkRelation::Preview.to_path("thumb.png").unwrap(),
            "resources/thumb.png"
        );
        assert_eq!(LinkRelation::Preload.to_path("font").unwrap(), "resources/font");
    }

    #[test]
    fn decoration_relations_have_no_path() {
        for rel in [
            LinkRelation::SelfLink,
            LinkRelation::Enclosure,
            LinkRelation::Start,
            LinkRelation::Schema,
        ] {
            assert_eq!(
                rel.to_path("night"),
                Err(ResolveError::UnsupportedRelation(rel))
            );
            assert!(!rel.has_path());
        }
    }

    #[test]
    fn relation_url_joins_base() {
        assert_eq!(
            LinkRelation::DescribedBy.to_url(BASE, "night").unwrap(),
            "https://example.org/catalog/1.0/styles/night/metadata"
        );
    }

    #[test]
    fn relation_round_trips_through_serde() {
        let rel: LinkRelation =
            serde_yaml::from_str("http://www.opengis.net/def/rel/ogc/1.0/tilesets-vector").unwrap();
        assert_eq!(rel, LinkRelation::TilesetsVector);
        assert_eq!(serde_json::to_string(&LinkRelation::SelfLink).unwrap(), r#""self""#);
    }

    #[test]
    fn unknown_relation_rejected_at_parse_time() {
        let result: Result<LinkRelation, _> = serde_yaml::from_str("license");
        assert!(result.is_err());
    }

    #[test]
    fn link_path_appends_extension() {
        let mapbox = link(LinkRelation::Stylesheet, Some(MAPBOX_MEDIA_TYPE));
        assert_eq!(mapbox.to_path("night", &[]).unwrap(), "styles/night.mapbox.json");

        let sld = link(
            LinkRelation::Stylesheet,
            Some("application/vnd.ogc.sld+xml;version=1.0"),
        );
        assert_eq!(sld.to_path("night", &[]).unwrap(), "styles/night.sld");
    }

    #[test]
    fn link_path_skips_extension_already_present() {
        let preview = link(LinkRelation::Preview, Some(PNG_MEDIA_TYPE));
        assert_eq!(
            preview.to_path("thumbnail.png", &[]).unwrap(),
            "resources/thumbnail.png"
        );
    }

    #[test]
    fn link_path_appends_extension_matching_bare_suffix() {
        let json = link(LinkRelation::Stylesheet, Some("application/json"));
        assert_eq!(json.to_path("geojson", &[]).unwrap(), "styles/geojson.json");

        let mut png = link(LinkRelation::Preview, Some(PNG_MEDIA_TYPE));
        png.update_href(BASE, "ogcpng", &[], false, true).unwrap();
        assert_eq!(
            png.href.as_deref(),
            Some("https://example.org/catalog/1.0/resources/ogcpng.png")
        );
    }

    #[test]
    fn default_link_is_bare_stylesheet() {
        let link = Link::default();
        assert_eq!(link, Link::new(LinkRelation::Stylesheet));
        assert!(link.href.is_none());
        assert_eq!(
            crate::types::StyleSheet::default().link.rel,
            LinkRelation::Stylesheet
        );
    }

    #[test]
    fn link_path_without_media_type_has_no_extension() {
        let metadata = link(LinkRelation::DescribedBy, None);
        assert_eq!(metadata.to_path("night", &[]).unwrap(), "styles/night/metadata");
    }

    #[test]
    fn update_href_with_query_uses_versioned_name() {
        let mut sld = link(
            LinkRelation::Stylesheet,
            Some("application/vnd.ogc.sld+xml;version=1.0"),
        );
        sld.update_href(BASE, "night", &[], true, false).unwrap();
        assert_eq!(
            sld.href.as_deref(),
            Some("https://example.org/catalog/1.0/styles/night?f=sld10")
        );
    }

    #[test]
    fn update_href_with_extension() {
        let mut mapbox = link(LinkRelation::Stylesheet, Some(MAPBOX_MEDIA_TYPE));
        mapbox.update_href(BASE, "night", &[], false, true).unwrap();
        assert_eq!(
            mapbox.href.as_deref(),
            Some("https://example.org/catalog/1.0/styles/night.mapbox.json")
        );
    }

    #[test]
    fn update_href_without_known_format_is_bare_url() {
        let mut custom = link(LinkRelation::Stylesheet, Some("text/x-unknown"));
        custom.update_href(BASE, "night", &[], true, false).unwrap();
        assert_eq!(
            custom.href.as_deref(),
            Some("https://example.org/catalog/1.0/styles/night")
        );
    }

    #[test]
    fn update_href_rejects_query_and_extension() {
        let mut mapbox = link(LinkRelation::Stylesheet, Some(MAPBOX_MEDIA_TYPE));
        assert_eq!(
            mapbox.update_href(BASE, "night", &[], true, true),
            Err(ResolveError::ConflictingHrefFormat)
        );
        assert!(mapbox.href.is_none());
    }

    #[test]
    fn update_href_overwrites_declared_href() {
        let mut mapbox = link(LinkRelation::Stylesheet, Some(MAPBOX_MEDIA_TYPE));
        mapbox.href = Some("https://elsewhere.example/night.json".to_string());
        mapbox.update_href(BASE, "night", &[], true, false).unwrap();
        assert_eq!(
            mapbox.href.as_deref(),
            Some("https://example.org/catalog/1.0/styles/night?f=mapbox")
        );
    }

    #[test]
    fn update_href_is_deterministic() {
        let template = link(
            LinkRelation::Stylesheet,
            Some("application/vnd.ogc.sld+xml;version=1.1"),
        );
        let hrefs: Vec<_> = (0..3)
            .map(|_| {
                let mut l = template.clone();
                l.update_href(BASE, "night", &[], true, false).unwrap();
                l.href.unwrap()
            })
            .collect();
        assert!(hrefs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn asset_filename_is_not_serialized() {
        let mut preview = link(LinkRelation::Preview, Some(PNG_MEDIA_TYPE));
        preview.asset_filename = Some("thumb.png".to_string());
        let json = serde_json::to_string(&preview).unwrap();
        assert_eq!(json, r#"{"rel":"preview","type":"image/png"}"#);
    }

    #[test]
    fn with_relation_keeps_other_fields() {
        let mut selfie = link(LinkRelation::SelfLink, None);
        selfie.href = Some("h".to_string());
        let relabeled = selfie.with_relation(LinkRelation::DescribedBy);
        assert_eq!(relabeled.rel, LinkRelation::DescribedBy);
        assert_eq!(relabeled.href.as_deref(), Some("h"));
    }
}
