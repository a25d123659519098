pub mod markdown;
pub mod xml;

use std::fs;
use std::path::{Path, PathBuf};

use crate::anchor::StoredAnnotation;
use crate::document::Document;

pub use markdown::load_markdown;
pub use xml::load_xml;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Annotation store error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads a document, choosing the loader by extension: `.md` is Markdown,
/// anything else XML.
pub fn read_document(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let source = fs::read_to_string(path)?;
    if let Some(ext) = path.extension()
        && ext == "md"
    {
        return Ok(load_markdown(&source));
    }
    load_xml(&source)
}

/// Reads a JSON annotation store. A missing file is an empty store.
pub fn read_annotations(path: &Path) -> Result<Vec<StoredAnnotation>, IoError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

/// Writes a JSON annotation store
pub fn write_annotations(path: &Path, annotations: &[StoredAnnotation]) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(annotations)?;
    fs::write(path, json)?;
    Ok(())
}
