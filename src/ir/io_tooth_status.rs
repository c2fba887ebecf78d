//! Reader for per-tooth status sheets.
//!
//! Status sheets accompany an annotation file and record the clinical state
//! of each tooth:
//!
//! ```json
//! { "Annotation_Data": [ { "11": "1", "12": "2", "36": 3 } ] }
//! ```
//!
//! Codes may be strings or integers. Only the first `Annotation_Data` entry
//! is read. Unknown codes and non-numeric tooth keys are skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::tooth::ToothNumber;
use crate::error::PeriochartError;

/// Clinical status of a tooth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToothStatus {
    Normal,
    Missing,
    Implant,
    Bridge,
    Other,
}

impl ToothStatus {
    /// Maps a sheet code (1-5) to a status.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(Self::Normal),
            2 => Some(Self::Missing),
            3 => Some(Self::Implant),
            4 => Some(Self::Bridge),
            5 => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Missing => "missing",
            Self::Implant => "implant",
            Self::Bridge => "bridge",
            Self::Other => "other",
        }
    }
}

/// Status per tooth, as read from a sheet.
pub type ToothStatusMap = BTreeMap<ToothNumber, ToothStatus>;

#[derive(Debug, Deserialize)]
struct StatusSheet {
    #[serde(rename = "Annotation_Data", default)]
    annotation_data: Vec<BTreeMap<String, StatusCode>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusCode {
    Number(u64),
    Text(String),
    Other(serde_json::Value),
}

impl StatusCode {
    fn status(&self) -> Option<ToothStatus> {
        match self {
            StatusCode::Number(n) => ToothStatus::from_code(*n),
            StatusCode::Text(s) => s.trim().parse().ok().and_then(ToothStatus::from_code),
            StatusCode::Other(_) => None,
        }
    }
}

/// Reads a status sheet from disk.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a status sheet.
pub fn read_tooth_status(path: &Path) -> Result<ToothStatusMap, PeriochartError> {
    let data = fs::read_to_string(path).map_err(PeriochartError::Io)?;
    from_status_str(&data).map_err(|source| PeriochartError::StatusSheetParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a status sheet from a JSON string.
pub fn from_status_str(json: &str) -> Result<ToothStatusMap, serde_json::Error> {
    let sheet: StatusSheet = serde_json::from_str(json)?;

    let Some(first) = sheet.annotation_data.into_iter().next() else {
        return Ok(ToothStatusMap::new());
    };

    Ok(first
        .into_iter()
        .filter_map(|(key, code)| {
            let tooth = key.trim().parse::<i64>().ok().map(ToothNumber::new)?;
            let status = code.status();
            if status.is_none() {
                log::debug!("skipping unknown status code for tooth {tooth}: {code:?}");
            }
            Some((tooth, status?))
        })
        .collect())
}

/// Fuzz-only entrypoint for status sheet parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_status(input: &[u8]) -> Result<(), serde_json::Error> {
    if let Ok(text) = std::str::from_utf8(input) {
        let _ = from_status_str(text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_string_and_integer_codes() {
        let json = r#"{"Annotation_Data": [{"11": "1", "12": 2, "36": "4", "47": " 5 "}]}"#;
        let map = from_status_str(json).expect("parse sheet");

        assert_eq!(map.get(&ToothNumber(11)), Some(&ToothStatus::Normal));
        assert_eq!(map.get(&ToothNumber(12)), Some(&ToothStatus::Missing));
        assert_eq!(map.get(&ToothNumber(36)), Some(&ToothStatus::Bridge));
        assert_eq!(map.get(&ToothNumber(47)), Some(&ToothStatus::Other));
    }

    #[test]
    fn skips_unknown_codes_and_keys() {
        let json = r#"{"Annotation_Data": [{"11": "9", "x": "1", "21": null, "22": "3"}]}"#;
        let map = from_status_str(json).expect("parse sheet");

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&ToothNumber(22)), Some(&ToothStatus::Implant));
    }

    #[test]
    fn only_first_entry_is_used() {
        let json = r#"{"Annotation_Data": [{"11": "1"}, {"11": "2", "12": "2"}]}"#;
        let map = from_status_str(json).expect("parse sheet");

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&ToothNumber(11)), Some(&ToothStatus::Normal));
    }

    #[test]
    fn missing_annotation_data_is_empty() {
        assert!(from_status_str("{}").expect("parse sheet").is_empty());
        assert!(from_status_str(r#"{"Annotation_Data": []}"#)
            .expect("parse sheet")
            .is_empty());
    }

    #[test]
    fn rejects_non_json() {
        assert!(from_status_str("not json").is_err());
    }

    #[test]
    fn read_tooth_status_wraps_parse_errors() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("sheet.json");
        fs::write(&path, "[").expect("write sheet");

        let err = read_tooth_status(&path).unwrap_err();
        assert!(matches!(err, PeriochartError::StatusSheetParse { .. }));
    }
}
