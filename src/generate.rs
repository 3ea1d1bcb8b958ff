//! Document generation.
//!
//! Walks the validated catalog and produces every output document in a fixed
//! order:
//!
//! 1. Additional assets (glob matches, verbatim).
//! 2. Per style, in catalog order:
//!    - preview/preload assets from the style's links,
//!    - one rendered asset per stylesheet,
//!    - the style metadata in every requested format.
//! 3. The styles collection in every requested format.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── fonts/regular.pbf              # additional asset, path unchanged
//! ├── resources/thumbnail.png        # preview of a style
//! ├── styles.json                    # styles collection
//! └── styles/
//!     ├── night.mapbox.json          # stylesheet (templated)
//!     ├── night.sld
//!     └── night/
//!         └── metadata.json          # style metadata
//! ```
//!
//! ## Links
//!
//! Each style's collection entry gathers, in encounter order: the links
//! declared on the style (a `self` link shows up as `describedby`), a
//! synthesized `describedby` link when the style declared no `self` link, and
//! one link per stylesheet. The metadata document carries the declared links
//! plus the synthesized `self` link.
//!
//! All href computation and self-link synthesis happens on a per-style clone;
//! the catalog itself is never modified.
//!
//! ## Batch and Streaming
//!
//! [`generate_documents`] collects everything into a `Vec`. [`stream_documents`]
//! runs the same traversal on a producer thread and hands documents over a
//! bounded channel so writing can overlap with generation. Either way the first
//! error ends the run; on the streaming side a panicking producer also ends up
//! as a final [`GenerateError::ProducerPanicked`] rather than a short stream.

use crate::assets::{self, AssetError, TemplateContext};
use crate::format::{self, Format, JSON_MEDIA_TYPE};
use crate::links::{Link, LinkRelation, ResolveError, STYLES_RESOURCE};
use crate::render::{self, RenderError, Resource};
use crate::types::{Document, Style, StyleMetadata, Styles, StylesConfig};
use crate::validate::{self, ValidationError};
use log::{debug, info, warn};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, sync_channel};
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Capacity of the channel between the producer thread and its consumer.
pub const DOCUMENT_CHANNEL_SIZE: usize = 5;

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("style {style_id}: {source}")]
    Resolve {
        style_id: String,
        #[source]
        source: ResolveError,
    },
    #[error("style {style_id}: {source}")]
    Asset {
        style_id: String,
        #[source]
        source: AssetError,
    },
    #[error("additional assets: {0}")]
    AdditionalAssets(#[source] AssetError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("document generation stopped unexpectedly: {0}")]
    ProducerPanicked(String),
}

/// How stylesheet hrefs name their encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum HrefStyle {
    /// `{base}/styles/night.mapbox.json`, the path of the generated file.
    #[default]
    Extension,
    /// `{base}/styles/night?f=mapbox`, for servers that negotiate on `f`.
    Query,
}

impl HrefStyle {
    /// `(with_query, with_extension)` for [`Link::update_href`].
    fn flags(self) -> (bool, bool) {
        match self {
            Self::Extension => (false, true),
            Self::Query => (true, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// Formats the styles collection and the metadata records are rendered in.
    pub formats: Vec<Format>,
    pub href_style: HrefStyle,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            href_style: HrefStyle::default(),
        }
    }
}

impl GenerateOptions {
    /// Build options from requested format names.
    ///
    /// Unknown names and formats without a resource renderer are ignored with
    /// a warning; duplicates collapse. If nothing usable remains, JSON is used.
    pub fn from_format_names<S: AsRef<str>>(names: &[S], href_style: HrefStyle) -> Self {
        let mut formats: Vec<Format> = Vec::new();
        for name in names.iter().map(|n| n.as_ref().trim()).filter(|n| !n.is_empty()) {
            match format::format_by_name(name, &[]) {
                Some(f) if render::has_renderer(&f) => {
                    if !formats.contains(&f) {
                        formats.push(f);
                    }
                }
                Some(_) => warn!("output format {name} cannot be rendered, ignoring"),
                None => warn!("unknown output format {name}, ignoring"),
            }
        }
        if formats.is_empty() {
            formats = default_formats();
        }
        Self {
            formats,
            href_style,
        }
    }
}

fn default_formats() -> Vec<Format> {
    vec![format::resolve_format(JSON_MEDIA_TYPE, &[], false)]
}

/// Validate the catalog and generate the complete document set.
pub fn generate_documents(
    catalog: &StylesConfig,
    asset_dir: &Path,
    options: &GenerateOptions,
) -> Result<Vec<Document>, GenerateError> {
    let mut documents = Vec::new();
    Generator::new(catalog, asset_dir, options).run(|document| {
        documents.push(document);
        ControlFlow::Continue(())
    })?;
    Ok(documents)
}

/// Validate and generate on a background thread.
///
/// Documents arrive in the same order as from [`generate_documents`]. A
/// failure, including a panic of the producer thread, is delivered as the
/// last item. Dropping the stream (or [`DocumentStream::cancel`]) stops the
/// producer.
pub fn stream_documents(
    catalog: StylesConfig,
    asset_dir: PathBuf,
    options: GenerateOptions,
) -> DocumentStream {
    spawn_producer(move |emit| Generator::new(&catalog, &asset_dir, &options).run(emit))
}

type Emit<'e> = &'e mut dyn FnMut(Document) -> ControlFlow<()>;

fn spawn_producer<P>(produce: P) -> DocumentStream
where
    P: FnOnce(Emit<'_>) -> Result<(), GenerateError> + Send + 'static,
{
    let (tx, rx) = sync_channel(DOCUMENT_CHANNEL_SIZE);
    let producer = thread::spawn(move || {
        let mut emit = |document: Document| match tx.send(Ok(document)) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        };
        if let Err(e) = produce(&mut emit) {
            // The receiver may already be gone; nothing left to tell then.
            let _ = tx.send(Err(e));
        }
    });
    DocumentStream {
        documents: rx,
        producer: Some(producer),
    }
}

/// Documents handed over by the producer thread of [`stream_documents`].
pub struct DocumentStream {
    documents: Receiver<Result<Document, GenerateError>>,
    producer: Option<JoinHandle<()>>,
}

impl DocumentStream {
    /// Stop consuming and wait for the producer thread to exit.
    pub fn cancel(self) -> Result<(), GenerateError> {
        let Self {
            documents,
            producer,
        } = self;
        drop(documents);
        match producer {
            Some(handle) => join_producer(handle),
            None => Ok(()),
        }
    }
}

impl Iterator for DocumentStream {
    type Item = Result<Document, GenerateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Ok(item) = self.documents.recv() {
            return Some(item);
        }
        // Channel closed: the producer finished or died.
        let handle = self.producer.take()?;
        join_producer(handle).err().map(Err)
    }
}

fn join_producer(handle: JoinHandle<()>) -> Result<(), GenerateError> {
    handle.join().map_err(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown cause".to_string());
        GenerateError::ProducerPanicked(message)
    })
}

/// One generation run over a catalog.
pub struct Generator<'a> {
    catalog: &'a StylesConfig,
    asset_dir: &'a Path,
    options: &'a GenerateOptions,
}

impl<'a> Generator<'a> {
    pub fn new(catalog: &'a StylesConfig, asset_dir: &'a Path, options: &'a GenerateOptions) -> Self {
        Self {
            catalog,
            asset_dir,
            options,
        }
    }

    /// Run the traversal, handing each document to `emit` as soon as it is
    /// ready. `emit` returning `Break` ends the run early without error.
    pub fn run<F>(&self, mut emit: F) -> Result<(), GenerateError>
    where
        F: FnMut(Document) -> ControlFlow<()>,
    {
        validate::validate(self.catalog)?;

        let additional =
            assets::expand_additional_assets(self.asset_dir, &self.catalog.additional_assets)
                .map_err(GenerateError::AdditionalAssets)?;
        if emit_all(&mut emit, additional).is_break() {
            return Ok(());
        }

        let mut styles = Styles {
            default: self.catalog.default.clone(),
            styles: Vec::with_capacity(self.catalog.styles.len()),
        };
        for style in &self.catalog.styles {
            let (entry, documents) = self.generate_style(style)?;
            info!("style {}: {} documents", style.id, documents.len());
            if emit_all(&mut emit, documents).is_break() {
                return Ok(());
            }
            styles.styles.push(entry);
        }

        for format in &self.options.formats {
            let document = render::render(Resource::Styles(&styles), STYLES_RESOURCE, format)?;
            if emit(document).is_break() {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Collection entry and documents for one style.
    fn generate_style(&self, style: &StyleMetadata) -> Result<(Style, Vec<Document>), GenerateError> {
        let id = style.id.as_str();
        let base = self.catalog.base_resource.as_str();
        let additional = self.catalog.additional_formats.as_slice();
        let context = TemplateContext::for_style(self.catalog, style);
        let resolve_err = |source: ResolveError| GenerateError::Resolve {
            style_id: id.to_string(),
            source,
        };
        let asset_err = |source: AssetError| GenerateError::Asset {
            style_id: id.to_string(),
            source,
        };

        let mut metadata = style.clone();
        let mut documents = Vec::new();
        let mut style_links = Vec::new();
        let mut has_self = false;
        let (with_query, with_extension) = self.options.href_style.flags();

        for link in &mut metadata.links {
            match link.rel {
                LinkRelation::Stylesheet => {
                    link.update_href(base, id, additional, with_query, with_extension)
                        .map_err(resolve_err)?;
                    warn!(
                        "stylesheet link found in metadata links of style {id}, \
                         declare it under stylesheets instead"
                    );
                }
                LinkRelation::SelfLink => {
                    let href = LinkRelation::DescribedBy
                        .to_url(base, id)
                        .map_err(resolve_err)?;
                    link.set_href(href);
                    has_self = true;
                    style_links.push(link.with_relation(LinkRelation::DescribedBy));
                }
                LinkRelation::Preview | LinkRelation::Preload => {
                    let filename = link.asset_filename.clone().ok_or_else(|| {
                        asset_err(AssetError::MissingFilename {
                            style_id: id.to_string(),
                            rel: link.rel,
                        })
                    })?;
                    link.update_href(base, &filename, additional, false, true)
                        .map_err(resolve_err)?;
                    let path = link.to_path(&filename, additional).map_err(resolve_err)?;
                    let content = assets::render_asset(self.asset_dir, &filename, false, &context)
                        .map_err(asset_err)?;
                    let media_type = link.media_type.as_deref().unwrap_or(OCTET_STREAM);
                    documents.push(Document::new(path, media_type, content));
                    style_links.push(link.clone());
                }
                rel if rel.has_path() => {
                    link.update_href(base, id, additional, false, false)
                        .map_err(resolve_err)?;
                    style_links.push(link.clone());
                }
                rel => {
                    if link.href.is_none() {
                        return Err(resolve_err(ResolveError::MissingHref(rel)));
                    }
                    style_links.push(link.clone());
                }
            }
        }

        if !has_self {
            let self_link = self_metadata_link(base, id).map_err(resolve_err)?;
            style_links.push(self_link.with_relation(LinkRelation::DescribedBy));
            metadata.links.push(self_link);
        }

        for sheet in &mut metadata.stylesheets {
            let link = &mut sheet.link;
            link.update_href(base, id, additional, with_query, with_extension)
                .map_err(resolve_err)?;
            match &link.asset_filename {
                Some(filename) => {
                    let path = link.to_path(id, additional).map_err(resolve_err)?;
                    let content = assets::render_asset(self.asset_dir, filename, true, &context)
                        .map_err(asset_err)?;
                    let media_type = link.media_type.as_deref().unwrap_or(OCTET_STREAM);
                    documents.push(Document::new(path, media_type, content));
                }
                None => debug!(
                    "stylesheet {} of style {id} has no asset-filename, linking only",
                    link.href.as_deref().unwrap_or_default()
                ),
            }
            style_links.push(link.clone());
        }

        let metadata_path = LinkRelation::DescribedBy
            .to_path(id)
            .map_err(resolve_err)?;
        for format in &self.options.formats {
            documents.push(render::render(
                Resource::Metadata(&metadata),
                &metadata_path,
                format,
            )?);
        }

        let entry = Style {
            id: style.id.clone(),
            title: style.title.clone(),
            links: style_links,
        };
        Ok((entry, documents))
    }
}

/// The `self` link a style gets when its catalog entry declares none.
pub fn self_metadata_link(base_resource: &str, style_id: &str) -> Result<Link, ResolveError> {
    let mut link = Link::new(LinkRelation::SelfLink);
    link.title = Some(format!("Style Metadata for {style_id}"));
    link.href = Some(LinkRelation::DescribedBy.to_url(base_resource, style_id)?);
    Ok(link)
}

fn emit_all<F>(emit: &mut F, documents: Vec<Document>) -> ControlFlow<()>
where
    F: FnMut(Document) -> ControlFlow<()>,
{
    for document in documents {
        emit(document)?;
    }
    ControlFlow::Continue(())
}
