//! # OGC Styles Gen
//!
//! Turns a style catalog plus a directory of assets into the static document
//! set of an [OGC API - Styles](https://docs.ogc.org/DRAFTS/20-009.html)
//! endpoint: a styles collection, a metadata record per style, every
//! stylesheet encoding, previews and any extra files the styles need.
//!
//! # Pipeline
//!
//! ```text
//! catalog.yaml ──load──▶ StylesConfig ──validate──▶ generate ──▶ Document* ──▶ Writer
//!                                                      ▲
//!                                       asset dir ─────┘
//! ```
//!
//! Generation is a pure function of the catalog, the asset directory contents
//! and the options: the same inputs always produce the same documents, in the
//! same order, with the same bytes. Nothing is written until a [`writer::Writer`]
//! receives the documents.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Catalog loading (YAML or TOML) and the stock example catalog |
//! | [`types`] | Catalog and output resource types with their serde mappings |
//! | [`format`] | Media type ↔ short name ↔ extension registry |
//! | [`links`] | Link relations, resource paths and href computation |
//! | [`validate`] | Catalog-wide checks run before any generation |
//! | [`assets`] | Asset lookup, stylesheet templating, additional-asset globs |
//! | [`render`] | JSON and HTML renderings of the collection and metadata |
//! | [`generate`] | The traversal producing every document, batch or streamed |
//! | [`writer`] | Document sinks; [`writer::FileWriter`] for local output |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Hrefs Are Computed, Never Trusted
//!
//! Every link pointing at something this tool writes (stylesheets, previews,
//! preloads, metadata) gets its href from `base-resource` and the resource
//! path. Hrefs written in the catalog for those links are replaced with a
//! warning, so a moved deployment only needs a new `base-resource`.
//!
//! ## Validate Everything First
//!
//! A catalog with duplicate ids, a dangling default or an unusable style
//! produces no documents at all; every problem is reported in one message.
//!
//! ## Bounded Streaming
//!
//! [`generate::stream_documents`] runs generation on its own thread and hands
//! documents over a small bounded channel, so a large asset set is never held
//! in memory at once and writing overlaps with generation.

pub mod assets;
pub mod config;
pub mod format;
pub mod generate;
pub mod links;
pub mod output;
pub mod render;
pub mod types;
pub mod validate;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;
