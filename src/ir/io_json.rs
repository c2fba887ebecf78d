//! JSON serialization for parsed annotation documents.
//!
//! This is the `parse` subcommand's output format and a convenient way to
//! hand a document to a charting front end without re-parsing the source
//! annotation file.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::model::ParsedDocument;
use crate::error::PeriochartError;

/// Reads a document previously written with [`write_document_json`].
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_document_json(path: &Path) -> Result<ParsedDocument, PeriochartError> {
    let file = File::open(path).map_err(PeriochartError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| PeriochartError::DocumentJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a document as pretty-printed JSON.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_document_json(path: &Path, doc: &ParsedDocument) -> Result<(), PeriochartError> {
    let file = File::create(path).map_err(PeriochartError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, doc).map_err(|source| PeriochartError::DocumentJsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a document from a JSON string.
pub fn from_json_str(json: &str) -> Result<ParsedDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Writes a document to a JSON string.
pub fn to_json_string(doc: &ParsedDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}
