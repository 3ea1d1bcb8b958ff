//! Asset lookup and stylesheet templating.
//!
//! Assets live in a read-only asset directory and are referenced from the
//! catalog by `asset-filename` (exact lookup) or by glob (`additional-assets`).
//!
//! ## Templates
//!
//! Stylesheet assets are [minijinja](https://docs.rs/minijinja) templates.
//! Only `{{ }}`, `{% %}` and `{# #}` are special, so JSON escapes, Mapbox
//! `$type` filters and `{name}` text fields pass through untouched. The
//! context holds the whole catalog plus the style being rendered:
//!
//! | Variable | Value |
//! |----------|-------|
//! | `base_resource` | catalog base resource |
//! | `styles_url` | `{base_resource}/styles` |
//! | `default_style` | catalog default style id (only when set) |
//! | `style_id` | id of the style being rendered |
//! | `style_title` | its title, or its id when untitled |
//! | `catalog` | the catalog as written (`catalog.styles`, `catalog["additional-formats"]`, ...) |
//! | `style` | the style's metadata as published (`style.stylesheets`, `style.layers`, ...) |
//!
//! An undefined variable fails the asset. Previews, preloads and additional
//! assets are binary-safe passthroughs and are never templated.
//!
//! ```text
//! {"sprite": "{{ styles_url }}/{{ style_id }}/sprite", "name": "{{ style.title }}"}
//! ```

use crate::links::{LinkRelation, STYLES_RESOURCE};
use crate::types::{AdditionalAsset, Document, StyleMetadata, StylesConfig};
use globset::{GlobBuilder, GlobMatcher};
use log::{debug, warn};
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("could not find asset {0}")]
    NotFound(PathBuf),
    #[error("could not read asset {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),
    #[error("asset-filename not specified for {rel} link of style {style_id}")]
    MissingFilename { style_id: String, rel: LinkRelation },
    #[error("template asset {0} is not valid UTF-8")]
    NotUtf8(PathBuf),
    #[error("could not render template asset {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },
    #[error("invalid additional-assets glob `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("could not walk asset directory {1}: {0}")]
    Walk(#[source] walkdir::Error, PathBuf),
}

/// Values available to stylesheet templates.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext<'a> {
    base_resource: &'a str,
    styles_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_style: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style_title: Option<&'a str>,
    catalog: &'a StylesConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'a StyleMetadata>,
}

impl<'a> TemplateContext<'a> {
    /// Catalog-wide variables only.
    pub fn for_catalog(catalog: &'a StylesConfig) -> Self {
        Self {
            base_resource: &catalog.base_resource,
            styles_url: format!("{}/{STYLES_RESOURCE}", catalog.base_resource),
            default_style: catalog.default.as_deref(),
            style_id: None,
            style_title: None,
            catalog,
            style: None,
        }
    }

    /// Catalog-wide variables plus those of one style.
    pub fn for_style(catalog: &'a StylesConfig, style: &'a StyleMetadata) -> Self {
        Self {
            style_id: Some(&style.id),
            style_title: Some(style.display_title()),
            style: Some(style),
            ..Self::for_catalog(catalog)
        }
    }

    /// Render `source` against this context.
    pub fn render(&self, source: &str) -> Result<String, minijinja::Error> {
        template_env().render_str(source, self)
    }
}

fn template_env() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

/// Load `asset_dir/filename`, rendering it as a template when `templated`.
pub fn render_asset(
    asset_dir: &Path,
    filename: &str,
    templated: bool,
    context: &TemplateContext<'_>,
) -> Result<Vec<u8>, AssetError> {
    let content = read_asset(asset_dir, filename)?;
    if !templated {
        return Ok(content);
    }

    let path = asset_dir.join(filename);
    let text = String::from_utf8(content).map_err(|_| AssetError::NotUtf8(path.clone()))?;
    let rendered = context
        .render(&text)
        .map_err(|source| AssetError::Template { path, source })?;
    Ok(rendered.into_bytes())
}

fn read_asset(asset_dir: &Path, filename: &str) -> Result<Vec<u8>, AssetError> {
    let path = asset_dir.join(filename);
    fs::read(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AssetError::NotFound(path.clone()),
        _ => AssetError::Io(e, path.clone()),
    })
}

/// Expand every `additional-assets` glob into passthrough documents.
///
/// Files are visited in sorted order and hidden entries are skipped. A file
/// matched by several globs is emitted once per glob.
pub fn expand_additional_assets(
    asset_dir: &Path,
    assets: &[AdditionalAsset],
) -> Result<Vec<Document>, AssetError> {
    if assets.is_empty() {
        return Ok(Vec::new());
    }
    let files = list_asset_files(asset_dir)?;
    let mut documents = Vec::new();
    for asset in assets {
        let matcher = compile_glob(&asset.path)?;
        let mut matched = 0;
        for relative in files.iter().filter(|f| matcher.is_match(f.as_str())) {
            let content = read_asset(asset_dir, relative)?;
            debug!("additional asset {relative} matched `{}`", asset.path);
            documents.push(Document::new(relative.clone(), &asset.media_type, content));
            matched += 1;
        }
        if matched == 0 {
            warn!(
                "additional-assets glob `{}` matched no files in {}",
                asset.path,
                asset_dir.display()
            );
        }
    }
    Ok(documents)
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher, AssetError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|source| AssetError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}

/// Relative, `/`-separated paths of all non-hidden files under `asset_dir`.
fn list_asset_files(asset_dir: &Path) -> Result<Vec<String>, AssetError> {
    let mut files = Vec::new();
    let it = walkdir::WalkDir::new(asset_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in it {
        let entry = entry.map_err(|e| AssetError::Walk(e, asset_dir.to_path_buf()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(asset_dir) else {
            continue;
        };
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        files.push(parts.join("/"));
    }
    Ok(files)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}
