//! Document model for parsed periodontal annotations.
//!
//! A [`ParsedDocument`] is built once from one annotation file and never
//! mutated afterwards. It holds the committed records in file order, the
//! per-tooth point collections derived from them, and the vertical outline
//! extremes used to make measurements independent of image scale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::point::{Color, Point};
use super::tooth::ToothNumber;

/// The structure an annotation record outlines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// Tooth contour (`TD`).
    ToothOutline,
    /// Alveolar bone level (`BD`, `DD`).
    BoneLevel,
    /// Cemento-enamel junction (`CD`).
    CejLevel,
    /// Tooth long-axis reference line (`AD`).
    TlaLine,
    /// Relative bone-loss line (`RBLD`). Reserved.
    RblLine,
    /// Tooth-root line (`TRLD`). Reserved.
    TrlLine,
}

impl AnnotationKind {
    /// Maps a section marker line to its kind.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "TD" => Some(Self::ToothOutline),
            "BD" | "DD" => Some(Self::BoneLevel),
            "CD" => Some(Self::CejLevel),
            "AD" => Some(Self::TlaLine),
            "RBLD" => Some(Self::RblLine),
            "TRLD" => Some(Self::TrlLine),
            _ => None,
        }
    }

    /// Reserved kinds are parsed and kept but feed no per-tooth collection.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Self::RblLine | Self::TrlLine)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToothOutline => "tooth_outline",
            Self::BoneLevel => "bone_level",
            Self::CejLevel => "cej_level",
            Self::TlaLine => "tla_line",
            Self::RblLine => "rbl_line",
            Self::TrlLine => "trl_line",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finalized shape from the annotation file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Structure kind, from the most recent section marker.
    pub kind: AnnotationKind,

    /// Tooth from the most recent `N=` line, if any parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooth: Option<ToothNumber>,

    /// Points in encounter order.
    pub points: Vec<Point>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,

    /// Annotation-defined size hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,

    /// Bounding-box marker; never contributes points downstream.
    #[serde(default)]
    pub is_rect: bool,
}

/// The vertical span of a tooth's outline, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToothExtremes {
    pub min_y: i64,
    pub max_y: i64,
}

impl ToothExtremes {
    /// Computes the extremes of all parsed `y` values, or `None` if there are none.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        points.iter().filter_map(|p| p.y).fold(None, |acc, y| {
            Some(match acc {
                None => ToothExtremes { min_y: y, max_y: y },
                Some(ext) => ToothExtremes {
                    min_y: ext.min_y.min(y),
                    max_y: ext.max_y.max(y),
                },
            })
        })
    }

    /// Widens these extremes to cover `other`.
    pub fn merge(&mut self, other: ToothExtremes) {
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Height of the outline in pixels, `None` if it does not fit in an `i64`.
    pub fn span(&self) -> Option<i64> {
        self.max_y.checked_sub(self.min_y)
    }
}

/// Everything annotated for one tooth.
///
/// `None` means the structure was never annotated for this tooth;
/// `Some(vec![])` means a section was opened and closed without points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToothAnnotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bone_points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cej_points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tla_points: Option<Vec<Point>>,
}

impl ToothAnnotations {
    /// Points collected for a kind. Reserved kinds always yield `None`.
    pub fn points(&self, kind: AnnotationKind) -> Option<&[Point]> {
        let slot = match kind {
            AnnotationKind::ToothOutline => &self.outline,
            AnnotationKind::BoneLevel => &self.bone_points,
            AnnotationKind::CejLevel => &self.cej_points,
            AnnotationKind::TlaLine => &self.tla_points,
            AnnotationKind::RblLine | AnnotationKind::TrlLine => return None,
        };
        slot.as_deref()
    }

    fn slot_mut(&mut self, kind: AnnotationKind) -> Option<&mut Option<Vec<Point>>> {
        match kind {
            AnnotationKind::ToothOutline => Some(&mut self.outline),
            AnnotationKind::BoneLevel => Some(&mut self.bone_points),
            AnnotationKind::CejLevel => Some(&mut self.cej_points),
            AnnotationKind::TlaLine => Some(&mut self.tla_points),
            AnnotationKind::RblLine | AnnotationKind::TrlLine => None,
        }
    }

    /// Returns true if no tracked structure holds any point.
    pub fn is_empty(&self) -> bool {
        [
            &self.outline,
            &self.bone_points,
            &self.cej_points,
            &self.tla_points,
        ]
        .iter()
        .all(|slot| slot.as_ref().is_none_or(|points| points.is_empty()))
    }
}

/// A stable code for something the scanner tolerated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// A line matched no known prefix or marker.
    UnknownLine,
    /// A record line appeared outside a `START`/`END` section.
    LineOutsideSection,
    /// A numeric field had no leading digits.
    UnparsableNumber,
    /// `END` was reached before any section kind marker.
    RecordWithoutKind,
    /// A record was committed while no tooth number was current.
    RecordWithoutTooth,
    /// `START` arrived while a section was still open.
    RestartedSection,
    /// Input ended inside an open section.
    UnterminatedRecord,
}

/// A tolerated irregularity, with the 1-based line it was found on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    pub line: usize,
    pub code: DiagnosticCode,
    pub message: String,
}

/// The complete, immutable result of parsing one annotation file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Per-tooth point collections, keyed by tooth number.
    pub teeth: BTreeMap<ToothNumber, ToothAnnotations>,

    /// Committed point-path records in file order.
    pub records: Vec<AnnotationRecord>,

    /// Rectangle records, kept apart from point-based data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rectangles: Vec<AnnotationRecord>,

    /// Running outline extremes per tooth.
    pub extremes: BTreeMap<ToothNumber, ToothExtremes>,

    /// Irregularities the scanner tolerated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParsedDocument {
    /// Annotations for a tooth, if the tooth was ever committed.
    pub fn tooth(&self, tooth: ToothNumber) -> Option<&ToothAnnotations> {
        self.teeth.get(&tooth)
    }

    /// Outline extremes for a tooth.
    pub fn extremes_for(&self, tooth: ToothNumber) -> Option<ToothExtremes> {
        self.extremes.get(&tooth).copied()
    }

    /// Points of one kind for one tooth.
    pub fn points(&self, tooth: ToothNumber, kind: AnnotationKind) -> Option<&[Point]> {
        self.tooth(tooth).and_then(|t| t.points(kind))
    }

    /// Committed records of one kind, in file order.
    pub fn records_of_kind(
        &self,
        kind: AnnotationKind,
    ) -> impl Iterator<Item = &AnnotationRecord> + '_ {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    /// Files a finalized record into the document.
    ///
    /// Rectangles only land in `rectangles`. Point-path records always land
    /// in `records`; when they carry a tooth and a tracked kind they also
    /// extend that tooth's collection, creating it empty if needed, and
    /// outlines widen the tooth's extremes.
    pub(crate) fn commit(&mut self, record: AnnotationRecord) {
        if record.is_rect {
            self.rectangles.push(record);
            return;
        }

        if let Some(tooth) = record.tooth.filter(|_| !record.kind.is_reserved()) {
            let entry = self.teeth.entry(tooth).or_default();
            if let Some(slot) = entry.slot_mut(record.kind) {
                slot.get_or_insert_with(Vec::new)
                    .extend_from_slice(&record.points);
            }

            if record.kind == AnnotationKind::ToothOutline {
                if let Some(found) = ToothExtremes::from_points(&record.points) {
                    self.extremes
                        .entry(tooth)
                        .and_modify(|ext| ext.merge(found))
                        .or_insert(found);
                }
            }
        }

        self.records.push(record);
    }
}
