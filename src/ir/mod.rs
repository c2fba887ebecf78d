//! Typed representation of periodontal annotation documents.
//!
//! This module defines the in-memory form of one parsed annotation file and
//! the readers that produce it. Everything downstream (metrics, validation,
//! inspection) works from a [`ParsedDocument`] and never touches raw text.
//!
//! # Design Principles
//!
//! 1. **Tolerant Parsing**: Malformed lines, unparsable numbers and missing
//!    terminators degrade to missing data plus a diagnostic, never an error.
//!
//! 2. **Missing Is Explicit**: A coordinate that failed to parse is `None`,
//!    and a structure that was opened but left empty is `Some(vec![])`, so
//!    "known-empty" and "never mentioned" stay distinguishable.
//!
//! 3. **Immutable Result**: A document is built once per file and replaced,
//!    never merged, when another file is selected.
//!
//! # Example
//!
//! ```
//! use periochart::ir::{io_ini, AnnotationKind, ToothNumber};
//!
//! let doc = io_ini::from_ini_str("START\nN=16\nBD\nP=10,20\nEND\n");
//! let bone = doc.points(ToothNumber::new(16), AnnotationKind::BoneLevel);
//! assert_eq!(bone.map(|p| p.len()), Some(1));
//! ```

pub mod io_ini;
pub mod io_json;
pub mod io_tooth_status;
mod model;
mod point;
mod tooth;

// Re-export core types for convenient access
pub use io_tooth_status::{ToothStatus, ToothStatusMap};
pub use model::{
    AnnotationKind, AnnotationRecord, DiagnosticCode, ParseDiagnostic, ParsedDocument,
    ToothAnnotations, ToothExtremes,
};
pub use point::{Color, Point};
pub use tooth::{Arch, ToothNumber, MANDIBULAR_ORDER, MAXILLARY_ORDER};
