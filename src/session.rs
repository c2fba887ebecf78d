//! The current-document slot of an analysis session.
//!
//! A session holds at most one parsed document: the one for the most
//! recently selected source file. Selecting a file issues a [`Ticket`];
//! a parse result is accepted only if its ticket is still the newest one.
//! Results for superseded selections are discarded, never merged.
//!
//! ```
//! use std::path::Path;
//!
//! use periochart::ir::ParsedDocument;
//! use periochart::session::AnalysisSession;
//!
//! let mut session = AnalysisSession::new();
//! let first = session.begin("a.ini");
//! let second = session.begin("b.ini");
//!
//! assert!(!session.complete(first, ParsedDocument::default()));
//! assert!(session.complete(second, ParsedDocument::default()));
//! assert_eq!(session.current_source(), Some(Path::new("b.ini")));
//! ```

use std::path::{Path, PathBuf};

use crate::error::PeriochartError;
use crate::ir::{io_ini, ParsedDocument};

/// Proof of a selection, consumed when its parse result is delivered.
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    source: PathBuf,
}

impl Ticket {
    /// The file this ticket was issued for.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// A delivered document and the file it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedDocument {
    pub source: PathBuf,
    pub document: ParsedDocument,
    generation: u64,
}

/// Last-write-wins holder of the session's current document.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    generation: u64,
    current: Option<LoadedDocument>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new selection and supersedes every outstanding ticket.
    pub fn begin(&mut self, source: impl Into<PathBuf>) -> Ticket {
        self.generation += 1;
        Ticket {
            generation: self.generation,
            source: source.into(),
        }
    }

    /// Delivers a parse result.
    ///
    /// Returns `true` if the result became current. A ticket older than the
    /// latest selection is stale and its document is dropped.
    pub fn complete(&mut self, ticket: Ticket, document: ParsedDocument) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale result for {} (generation {}, latest {})",
                ticket.source.display(),
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.current = Some(LoadedDocument {
            source: ticket.source,
            document,
            generation: ticket.generation,
        });
        true
    }

    /// Selects `path`, parses it and makes it current.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not UTF-8 text. The
    /// previous document stays current in that case.
    pub fn load(&mut self, path: &Path) -> Result<&ParsedDocument, PeriochartError> {
        let ticket = self.begin(path);
        let document = io_ini::read_ini(path)?;
        let loaded = self.current.insert(LoadedDocument {
            source: ticket.source,
            document,
            generation: ticket.generation,
        });
        Ok(&loaded.document)
    }

    /// The current document, if one has been delivered.
    pub fn current(&self) -> Option<&ParsedDocument> {
        self.current.as_ref().map(|loaded| &loaded.document)
    }

    /// The source of the current document.
    pub fn current_source(&self) -> Option<&Path> {
        self.current.as_ref().map(|loaded| loaded.source.as_path())
    }

    /// Returns true if a newer selection is pending than the current document.
    pub fn is_pending(&self) -> bool {
        self.current
            .as_ref()
            .is_none_or(|loaded| loaded.generation != self.generation)
    }

    /// Drops the current document.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::io_ini::from_ini_str;
    use crate::ir::ToothNumber;

    #[test]
    fn latest_selection_wins() {
        let mut session = AnalysisSession::new();
        let a = session.begin("a.ini");
        let b = session.begin("b.ini");

        let doc_b = from_ini_str("START\nN=21\nTD\nP=0,1\nEND\n");
        assert!(session.complete(b, doc_b.clone()));
        assert!(!session.complete(a, from_ini_str("START\nN=11\nTD\nP=0,1\nEND\n")));

        assert_eq!(session.current(), Some(&doc_b));
        assert_eq!(session.current_source(), Some(Path::new("b.ini")));
        assert!(!session.is_pending());
    }

    #[test]
    fn stale_result_is_not_merged() {
        let mut session = AnalysisSession::new();
        let a = session.begin("a.ini");
        assert!(session.complete(a, from_ini_str("START\nN=11\nTD\nP=0,1\nEND\n")));

        let b = session.begin("b.ini");
        assert!(session.is_pending());
        let c = session.begin("c.ini");
        assert!(!session.complete(b, from_ini_str("START\nN=13\nTD\nP=0,1\nEND\n")));
        assert!(session.complete(c, from_ini_str("START\nN=12\nTD\nP=0,1\nEND\n")));

        let doc = session.current().expect("document delivered");
        assert!(doc.tooth(ToothNumber(11)).is_none());
        assert!(doc.tooth(ToothNumber(13)).is_none());
        assert!(doc.tooth(ToothNumber(12)).is_some());
    }

    #[test]
    fn superseded_ticket_cannot_replace_newer_result() {
        let mut session = AnalysisSession::new();
        let old = session.begin("old.ini");
        let new = session.begin("new.ini");
        assert!(session.complete(new, ParsedDocument::default()));
        assert!(!session.complete(old, from_ini_str("START\nN=11\nTD\nEND\n")));
        assert_eq!(session.current_source(), Some(Path::new("new.ini")));
    }

    #[test]
    fn load_reads_file_and_keeps_previous_on_error() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("case.ini");
        std::fs::write(&path, "START\nN=16\nTD\nP=0,1\nP=0,5\nEND\n").expect("write ini");

        let mut session = AnalysisSession::new();
        let doc = session.load(&path).expect("load ini");
        assert_eq!(doc.records.len(), 1);

        let missing = temp.path().join("missing.ini");
        assert!(session.load(&missing).is_err());
        assert_eq!(session.current_source(), Some(path.as_path()));
        assert!(session.is_pending());

        session.clear();
        assert!(session.current().is_none());
    }
}
