//! Document sinks.
//!
//! The generator only produces [`Document`]s; where they end up is decided by
//! a [`Writer`]. [`FileWriter`] mirrors document paths under a local output
//! directory, which is what the CLI uses. Other backends (object stores, HTTP
//! uploads) plug in by implementing the trait.

use crate::types::Document;
use log::info;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("could not write {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),
    #[error("refusing to write outside the output directory: {0}")]
    UnsafePath(String),
}

pub trait Writer {
    /// Persist one document. `path` is relative and `/`-separated.
    fn write(&mut self, path: &str, content: &[u8], media_type: &str) -> Result<(), WriteError>;

    fn write_document(&mut self, document: &Document) -> Result<(), WriteError> {
        self.write(&document.path, &document.content, &document.media_type)
    }
}

/// Writes documents as files below a root directory, creating parents as needed.
#[derive(Debug, Clone)]
pub struct FileWriter {
    root: PathBuf,
}

impl FileWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target(&self, path: &str) -> Result<PathBuf, WriteError> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(WriteError::UnsafePath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl Writer for FileWriter {
    fn write(&mut self, path: &str, content: &[u8], media_type: &str) -> Result<(), WriteError> {
        let target = self.target(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| WriteError::Io(e, parent.to_path_buf()))?;
        }
        fs::write(&target, content).map_err(|e| WriteError::Io(e, target.clone()))?;
        info!("wrote {} ({media_type}, {} bytes)", target.display(), content.len());
        Ok(())
    }
}
