//! Arch-ordered chart series.
//!
//! Every tooth in an arch contributes exactly three slots (`Left`, `Center`,
//! `Right`) whether or not it has data, so a maxillary or mandibular series
//! is always 48 labels and 48 values long and category axes line up across
//! charts.

use serde::Serialize;
use std::fmt;

use super::{normalize, percent_loss, transform_y};
use crate::config::MetricsConfig;
use crate::ir::{
    AnnotationKind, Arch, ParsedDocument, Point, ToothNumber, ToothStatus, ToothStatusMap,
};

/// A sampling position along a tooth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    Left,
    Center,
    Right,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Left, Slot::Center, Slot::Right];

    /// Single-letter suffix used in chart labels.
    pub fn suffix(&self) -> &'static str {
        match self {
            Slot::Left => "L",
            Slot::Center => "C",
            Slot::Right => "R",
        }
    }

    /// Label for this slot of a tooth, e.g. `16-C`.
    pub fn label(&self, tooth: ToothNumber) -> String {
        format!("{}-{}", tooth, self.suffix())
    }
}

/// Which structure a series measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Bone,
    Cej,
    Tla,
}

impl SeriesKind {
    fn annotation_kind(&self) -> AnnotationKind {
        match self {
            SeriesKind::Bone => AnnotationKind::BoneLevel,
            SeriesKind::Cej => AnnotationKind::CejLevel,
            SeriesKind::Tla => AnnotationKind::TlaLine,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesKind::Bone => "bone",
            SeriesKind::Cej => "cej",
            SeriesKind::Tla => "tla",
        }
    }
}

/// Chart-ready labels and values. Values are finite or `None`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Human-readable series name.
    pub name: String,
    /// One label per slot.
    pub labels: Vec<String>,
    /// One value per label; `None` is a gap.
    pub values: Vec<Option<f64>>,
}

impl ChartSeries {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    fn push_tooth(&mut self, tooth: ToothNumber, values: [Option<f64>; 3]) {
        self.labels
            .extend(Slot::ALL.iter().map(|slot| slot.label(tooth)));
        self.values.extend(values);
    }

    /// Number of slots holding a value.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// `(label, value)` pairs in chart order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

impl fmt::Display for ChartSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} of {} slots)",
            self.name,
            self.present_count(),
            self.values.len()
        )?;
        for (label, value) in self.iter() {
            match value {
                Some(v) => writeln!(f, "  {:<6} {:>10.4}", label, v)?,
                None => writeln!(f, "  {:<6} {:>10}", label, "-")?,
            }
        }
        Ok(())
    }
}

/// Normalized bone, CEJ or TLA series for one arch.
///
/// Bone and CEJ slots hold the pixel distance of the sampled point from the
/// tooth's crown-side outline extreme, normalized with `config.distance`.
/// TLA slots all hold the mean `y` of the tooth's long-axis points,
/// normalized with `config.tla`.
pub fn build_arch_series(
    doc: &ParsedDocument,
    arch: Arch,
    kind: SeriesKind,
    config: &MetricsConfig,
) -> ChartSeries {
    let mut series = ChartSeries::new(format!("{} {}", arch, kind.as_str()));

    for tooth in arch.teeth() {
        let raw = match kind {
            SeriesKind::Bone | SeriesKind::Cej => slot_distances(doc, tooth, arch, kind),
            SeriesKind::Tla => [tla_mean(doc, tooth); 3],
        };
        let norm = match kind {
            SeriesKind::Bone | SeriesKind::Cej => &config.distance,
            SeriesKind::Tla => &config.tla,
        };
        let normalized = normalize(&raw, norm);
        series.push_tooth(tooth, [normalized[0], normalized[1], normalized[2]]);
    }

    series
}

/// Relative bone loss (percent) per slot for one arch, from raw CEJ and bone
/// distances.
pub fn build_rbl_series(doc: &ParsedDocument, arch: Arch) -> ChartSeries {
    let mut series = ChartSeries::new(format!("{} rbl", arch));

    for tooth in arch.teeth() {
        let cej = slot_distances(doc, tooth, arch, SeriesKind::Cej);
        let bone = slot_distances(doc, tooth, arch, SeriesKind::Bone);
        series.push_tooth(
            tooth,
            [
                percent_loss(cej[0], bone[0]),
                percent_loss(cej[1], bone[1]),
                percent_loss(cej[2], bone[2]),
            ],
        );
    }

    series
}

/// Sampled `y` positions mapped into `[0, 2]` against each tooth's outline
/// span, flipped for the mandibular arch.
pub fn build_relative_series(doc: &ParsedDocument, arch: Arch, kind: SeriesKind) -> ChartSeries {
    let mut series = ChartSeries::new(format!("{} relative {}", arch, kind.as_str()));

    for tooth in arch.teeth() {
        let values = match doc.extremes_for(tooth) {
            Some(ext) => sample_slots(doc.points(tooth, kind.annotation_kind())).map(|point| {
                point
                    .and_then(Point::y_f64)
                    .and_then(|y| transform_y(y, ext.min_y as f64, ext.max_y as f64, arch))
            }),
            None => [None; 3],
        };
        series.push_tooth(tooth, values);
    }

    series
}

/// Full-mouth TLA series: maxillary order followed by mandibular order.
pub fn build_tla_series(doc: &ParsedDocument, config: &MetricsConfig) -> ChartSeries {
    let upper = build_arch_series(doc, Arch::Maxillary, SeriesKind::Tla, config);
    let lower = build_arch_series(doc, Arch::Mandibular, SeriesKind::Tla, config);

    let mut series = ChartSeries::new("full-mouth tla");
    series.labels = upper.labels.into_iter().chain(lower.labels).collect();
    series.values = upper.values.into_iter().chain(lower.values).collect();
    series
}

/// A tooth's status in arch order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StatusCell {
    pub tooth: ToothNumber,
    pub status: Option<ToothStatus>,
}

/// The 16 status cells of one arch, in chart order.
pub fn build_status_row(statuses: &ToothStatusMap, arch: Arch) -> Vec<StatusCell> {
    arch.teeth()
        .map(|tooth| StatusCell {
            tooth,
            status: statuses.get(&tooth).copied(),
        })
        .collect()
}

/// Picks the first, middle and last point of a structure.
fn sample_slots(points: Option<&[Point]>) -> [Option<&Point>; 3] {
    match points {
        Some(points) if !points.is_empty() => [
            points.first(),
            points.get(points.len() / 2),
            points.last(),
        ],
        _ => [None; 3],
    }
}

/// Pixel distances from the crown-side outline extreme for each slot.
///
/// Upper crowns point down the image, so the crown edge is the outline's
/// largest `y`; lower crowns point up, so it is the smallest.
fn slot_distances(
    doc: &ParsedDocument,
    tooth: ToothNumber,
    arch: Arch,
    kind: SeriesKind,
) -> [Option<f64>; 3] {
    let Some(ext) = doc.extremes_for(tooth) else {
        return [None; 3];
    };

    sample_slots(doc.points(tooth, kind.annotation_kind())).map(|point| {
        let y = point.and_then(|p| p.y)?;
        let distance = match arch {
            Arch::Maxillary => ext.max_y.checked_sub(y)?,
            Arch::Mandibular => y.checked_sub(ext.min_y)?,
        };
        Some(distance as f64)
    })
}

/// Mean `y` of a tooth's long-axis points, ignoring missing coordinates.
fn tla_mean(doc: &ParsedDocument, tooth: ToothNumber) -> Option<f64> {
    let ys: Vec<f64> = doc
        .points(tooth, AnnotationKind::TlaLine)?
        .iter()
        .filter_map(Point::y_f64)
        .collect();
    if ys.is_empty() {
        return None;
    }
    Some(ys.iter().sum::<f64>() / ys.len() as f64)
}
