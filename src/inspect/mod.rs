//! Document inspection and statistics.
//!
//! This module analyzes a parsed annotation document and produces a
//! structured report with summary counts, per-kind record counts, arch
//! coverage and a per-tooth breakdown.

mod report;

pub use report::{ArchCoverage, InspectReport, KindCount, SummarySection, ToothRow};

use std::collections::BTreeMap;

use crate::ir::{AnnotationKind, Arch, ParsedDocument, ToothAnnotations};

/// Options for document inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self { bar_width: 16 }
    }
}

/// Inspect a document and produce a detailed report.
pub fn inspect_document(doc: &ParsedDocument, opts: &InspectOptions) -> InspectReport {
    InspectReport {
        summary: compute_summary(doc),
        kinds: compute_kinds(doc),
        coverage: [Arch::Maxillary, Arch::Mandibular]
            .into_iter()
            .map(|arch| compute_coverage(doc, arch))
            .collect(),
        teeth: doc
            .teeth
            .iter()
            .map(|(&tooth, annotations)| ToothRow {
                tooth,
                outline: count(annotations, AnnotationKind::ToothOutline),
                bone: count(annotations, AnnotationKind::BoneLevel),
                cej: count(annotations, AnnotationKind::CejLevel),
                tla: count(annotations, AnnotationKind::TlaLine),
                extremes: doc.extremes_for(tooth),
            })
            .collect(),
        bar_width: opts.bar_width,
    }
}

fn compute_summary(doc: &ParsedDocument) -> SummarySection {
    let points = doc.records.iter().flat_map(|r| r.points.iter());

    SummarySection {
        records: doc.records.len(),
        rectangles: doc.rectangles.len(),
        points: points.clone().count(),
        incomplete_points: points.filter(|p| !p.is_complete()).count(),
        teeth: doc.teeth.len(),
        non_fdi_teeth: doc.teeth.keys().filter(|t| !t.is_fdi()).count(),
        diagnostics: doc.diagnostics.len(),
    }
}

/// Counts records and points per kind, most records first.
fn compute_kinds(doc: &ParsedDocument) -> Vec<KindCount> {
    let mut counts: BTreeMap<AnnotationKind, (usize, usize)> = BTreeMap::new();
    for record in &doc.records {
        let entry = counts.entry(record.kind).or_default();
        entry.0 += 1;
        entry.1 += record.points.len();
    }

    let mut kinds: Vec<KindCount> = counts
        .into_iter()
        .map(|(kind, (records, points))| KindCount {
            kind,
            records,
            points,
        })
        .collect();
    // Stable sort keeps kind order among ties.
    kinds.sort_by(|a, b| b.records.cmp(&a.records));
    kinds
}

fn compute_coverage(doc: &ParsedDocument, arch: Arch) -> ArchCoverage {
    let teeth: Vec<&ToothAnnotations> = arch.teeth().filter_map(|t| doc.tooth(t)).collect();
    let with = |kind: AnnotationKind| {
        teeth
            .iter()
            .filter(|t| count(t, kind).is_some_and(|n| n > 0))
            .count()
    };

    ArchCoverage {
        arch,
        outline: with(AnnotationKind::ToothOutline),
        bone: with(AnnotationKind::BoneLevel),
        cej: with(AnnotationKind::CejLevel),
        tla: with(AnnotationKind::TlaLine),
    }
}

fn count(annotations: &ToothAnnotations, kind: AnnotationKind) -> Option<usize> {
    annotations.points(kind).map(<[_]>::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::io_ini::from_ini_str;
    use crate::ir::{ToothExtremes, ToothNumber};

    const DOC: &str = "\
START
N=16
TD
P=0,100
P=0,400
END
START
BD
P=0,310
P=0,x
END
START
N=36
TD
P=0,500
P=0,800
END
START
N=36
CD
END
START
N=99
AD
P=5,5
END
START
R
TD
P=1,1
END
";

    fn report() -> InspectReport {
        inspect_document(&from_ini_str(DOC), &InspectOptions::default())
    }

    #[test]
    fn test_summary_counts() {
        let report = report();

        assert_eq!(report.summary.records, 5);
        assert_eq!(report.summary.rectangles, 1);
        assert_eq!(report.summary.points, 7);
        assert_eq!(report.summary.incomplete_points, 1);
        assert_eq!(report.summary.teeth, 3);
        assert_eq!(report.summary.non_fdi_teeth, 1);
        assert_eq!(report.summary.diagnostics, 1);
    }

    #[test]
    fn test_kind_counts() {
        let report = report();

        assert_eq!(report.kinds[0].kind, AnnotationKind::ToothOutline);
        assert_eq!(report.kinds[0].records, 2);
        assert_eq!(report.kinds[0].points, 4);
        assert_eq!(report.kinds.len(), 4);
    }

    #[test]
    fn test_coverage_and_rows() {
        let report = report();

        let upper = &report.coverage[0];
        assert_eq!(upper.arch, Arch::Maxillary);
        assert_eq!((upper.outline, upper.bone, upper.cej), (1, 1, 0));

        let lower = &report.coverage[1];
        assert_eq!((lower.outline, lower.cej), (1, 0));

        let row36 = report
            .teeth
            .iter()
            .find(|t| t.tooth == ToothNumber(36))
            .expect("tooth 36 row");
        assert_eq!(row36.cej, Some(0));
        assert_eq!(row36.bone, None);
        assert_eq!(
            row36.extremes,
            Some(ToothExtremes {
                min_y: 500,
                max_y: 800
            })
        );
    }

    #[test]
    fn test_display_output() {
        let output = report().to_string();

        assert!(output.contains("Annotation Inspection Report"));
        assert!(output.contains("Summary"));
        assert!(output.contains("Records by kind"));
        assert!(output.contains("Arch coverage"));
        assert!(output.contains("tooth_outline"));
        assert!(output.contains("500..800"));
    }

    #[test]
    fn test_empty_document() {
        let report = inspect_document(&ParsedDocument::default(), &InspectOptions::default());
        let output = report.to_string();

        assert!(output.contains("No records found."));
        assert!(output.contains("No tooth entries found."));
    }
}
