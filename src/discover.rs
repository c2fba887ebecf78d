//! Companion-file discovery.
//!
//! A radiograph is annotated by files that live next to it and share its
//! name: an `.ini` annotation file, a `.json` tooth status sheet and the
//! `.dcm` image itself. Given a folder and the selected file, discovery
//! finds each companion whose file name contains the selected file's stem.

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::PeriochartError;

/// Extension of annotation files.
pub const INI_EXTENSION: &str = "ini";
/// Extension of tooth status sheets.
pub const STATUS_EXTENSION: &str = "json";
/// Extension of DICOM images.
pub const DICOM_EXTENSION: &str = "dcm";

/// The files found for one selection. Each slot holds the first match in
/// sorted path order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Companions {
    /// Stem the companions were matched against.
    pub stem: String,
    pub ini: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub dcm: Option<PathBuf>,
}

impl Companions {
    /// The annotation file, or an error naming what was looked for.
    pub fn require_ini(&self, dir: &Path) -> Result<&Path, PeriochartError> {
        self.ini
            .as_deref()
            .ok_or_else(|| PeriochartError::CompanionNotFound {
                dir: dir.to_path_buf(),
                stem: self.stem.clone(),
                kind: INI_EXTENSION,
            })
    }
}

/// Finds the companions of `selected` under `dir`.
///
/// Only `selected`'s file name matters; its own directory is ignored. Files
/// are matched case-insensitively on extension and case-sensitively on the
/// stem substring.
///
/// # Errors
/// Returns an error if `selected` has no usable stem or `dir` cannot be
/// traversed.
pub fn discover_companions(dir: &Path, selected: &Path) -> Result<Companions, PeriochartError> {
    let stem = selected
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            PeriochartError::UnsupportedFormat(format!(
                "selected file '{}' has no file name to match against",
                selected.display()
            ))
        })?
        .to_string();

    let mut files = collect_files_with_extensions(
        dir,
        &[INI_EXTENSION, STATUS_EXTENSION, DICOM_EXTENSION],
    )?;
    files.sort();

    let find = |ext: &str| {
        files
            .iter()
            .find(|path| has_extension(path, &[ext]) && name_contains(path, &stem))
            .cloned()
    };

    let companions = Companions {
        ini: find(INI_EXTENSION),
        json: find(STATUS_EXTENSION),
        dcm: find(DICOM_EXTENSION),
        stem,
    };

    for (slot, ext) in [
        (&companions.ini, INI_EXTENSION),
        (&companions.json, STATUS_EXTENSION),
        (&companions.dcm, DICOM_EXTENSION),
    ] {
        match slot {
            Some(path) => log::debug!("found .{ext} companion {}", path.display()),
            None => log::warn!(
                "no .{ext} file matching '{}' under {}",
                companions.stem,
                dir.display()
            ),
        }
    }

    Ok(companions)
}

fn collect_files_with_extensions(
    root: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, PeriochartError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| PeriochartError::DirectoryWalk {
            path: root.to_path_buf(),
            message: source.to_string(),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

fn name_contains(path: &Path, stem: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(stem))
}
