//! Document validation for periochart.
//!
//! This module checks a parsed annotation document for problems that would
//! make its charts misleading or incomplete:
//! - Scanner diagnostics (unknown lines, unparsable numbers, dropped records)
//! - Tooth-level consistency (FDI numbering, outlines present and non-degenerate)
//! - Measurement sanity (points inside the outline span, usable CEJ distances)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use crate::ir::{
    AnnotationKind, Arch, DiagnosticCode, ParseDiagnostic, ParsedDocument, ToothAnnotations,
    ToothExtremes, ToothNumber,
};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates a parsed document and returns a report of all issues found.
///
/// Validation never fails; it only describes. Whether a report is fatal is
/// decided by the caller via [`ValidationReport::is_ok`] or, in strict
/// mode, [`ValidationReport::is_clean`].
pub fn validate_document(doc: &ParsedDocument, _opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    for diagnostic in &doc.diagnostics {
        report.add(diagnostic_issue(diagnostic));
    }

    if doc.records.is_empty() && doc.rectangles.is_empty() {
        report.add(ValidationIssue::warning(
            IssueCode::EmptyDocument,
            "No annotation records were committed",
            IssueContext::Document,
        ));
    }

    for (&tooth, annotations) in &doc.teeth {
        validate_tooth(tooth, annotations, doc.extremes_for(tooth), &mut report);
    }

    report
}

fn diagnostic_issue(diagnostic: &ParseDiagnostic) -> ValidationIssue {
    let context = IssueContext::Line {
        line: diagnostic.line,
    };
    let message = diagnostic.message.clone();

    match diagnostic.code {
        DiagnosticCode::UnknownLine => {
            ValidationIssue::warning(IssueCode::UnknownLine, message, context)
        }
        DiagnosticCode::LineOutsideSection => {
            ValidationIssue::warning(IssueCode::LineOutsideSection, message, context)
        }
        DiagnosticCode::UnparsableNumber => {
            ValidationIssue::warning(IssueCode::UnparsableNumber, message, context)
        }
        DiagnosticCode::RecordWithoutTooth => {
            ValidationIssue::warning(IssueCode::DetachedRecord, message, context)
        }
        DiagnosticCode::RecordWithoutKind
        | DiagnosticCode::RestartedSection
        | DiagnosticCode::UnterminatedRecord => {
            ValidationIssue::error(IssueCode::DroppedRecord, message, context)
        }
    }
}

/// Validates one tooth's collections against its outline.
fn validate_tooth(
    tooth: ToothNumber,
    annotations: &ToothAnnotations,
    extremes: Option<ToothExtremes>,
    report: &mut ValidationReport,
) {
    let context = || IssueContext::Tooth { tooth };

    let arch = tooth.arch();
    if arch.is_none() {
        report.add(ValidationIssue::warning(
            IssueCode::NonFdiTooth,
            format!("Tooth {} is not an FDI permanent tooth and is never charted", tooth),
            context(),
        ));
    }

    let measured = [
        AnnotationKind::BoneLevel,
        AnnotationKind::CejLevel,
        AnnotationKind::TlaLine,
    ];
    let has_measurements = measured
        .iter()
        .any(|&kind| annotations.points(kind).is_some_and(|p| !p.is_empty()));

    let Some(ext) = extremes else {
        if has_measurements {
            report.add(ValidationIssue::warning(
                IssueCode::MissingOutline,
                "Measurement points without a tooth outline; distances will be gaps",
                context(),
            ));
        }
        return;
    };

    if ext.span() == Some(0) {
        report.add(ValidationIssue::warning(
            IssueCode::DegenerateOutline,
            format!("Outline has zero vertical span at y={}", ext.min_y),
            context(),
        ));
    }

    for kind in [AnnotationKind::BoneLevel, AnnotationKind::CejLevel] {
        let outside = annotations
            .points(kind)
            .unwrap_or_default()
            .iter()
            .filter_map(|p| p.y)
            .filter(|&y| y < ext.min_y || y > ext.max_y)
            .count();
        if outside > 0 {
            report.add(ValidationIssue::warning(
                IssueCode::PointOutsideOutline,
                format!(
                    "{} {} point(s) outside outline span [{}, {}]",
                    outside, kind, ext.min_y, ext.max_y
                ),
                context(),
            ));
        }
    }

    if let Some(arch) = arch {
        let crown_edge = match arch {
            Arch::Maxillary => ext.max_y,
            Arch::Mandibular => ext.min_y,
        };
        let on_edge = annotations
            .points(AnnotationKind::CejLevel)
            .unwrap_or_default()
            .iter()
            .any(|p| p.y == Some(crown_edge));
        if on_edge {
            report.add(ValidationIssue::warning(
                IssueCode::ZeroCejDistance,
                format!(
                    "CEJ point on the crown edge (y={}); relative bone loss is undefined there",
                    crown_edge
                ),
                context(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::io_ini::from_ini_str;

    const VALID: &str = "\
START
N=16
TD
P=0,100
P=0,400
END
START
CD
P=0,370
P=0,340
END
START
BD
P=0,300
END
";

    fn validate(text: &str) -> ValidationReport {
        validate_document(&from_ini_str(text), &ValidateOptions::default())
    }

    #[test]
    fn test_valid_document() {
        let report = validate(VALID);
        assert!(
            report.is_clean(),
            "Expected no issues, got: {:?}",
            report.issues
        );
    }

    #[test]
    fn test_empty_document() {
        let report = validate("");
        assert_eq!(report.warning_count(), 1);
        assert!(report.has(IssueCode::EmptyDocument));
        assert!(report.is_ok());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_dropped_record_is_error() {
        let report = validate("START\nN=11\nTD\nP=0,1\n");
        assert_eq!(report.error_count(), 1);
        assert!(report.has(IssueCode::DroppedRecord));
    }

    #[test]
    fn test_unparsable_number_reports_line() {
        let text = format!("{VALID}START\nBD\nP=0,abc\nEND\n");
        let report = validate(&text);

        let issue = report
            .issues
            .iter()
            .find(|i| i.code == IssueCode::UnparsableNumber)
            .expect("unparsable number reported");
        assert!(matches!(issue.context, IssueContext::Line { line: 18 }));
        assert_eq!(issue.severity, Severity::Warning);
    }

    #[test]
    fn test_non_fdi_tooth() {
        let report = validate("START\nN=55\nTD\nP=0,1\nP=0,9\nEND\n");
        assert!(report.has(IssueCode::NonFdiTooth));
    }

    #[test]
    fn test_missing_outline() {
        let report = validate("START\nN=21\nBD\nP=0,10\nEND\n");
        assert!(report.has(IssueCode::MissingOutline));
        assert!(report.is_ok());
    }

    #[test]
    fn test_known_empty_tooth_without_outline_is_fine() {
        let report = validate("START\nN=21\nCD\nEND\n");
        assert!(report.is_clean(), "got: {:?}", report.issues);
    }

    #[test]
    fn test_degenerate_outline() {
        let report = validate("START\nN=31\nTD\nP=0,50\nP=9,50\nEND\n");
        assert!(report.has(IssueCode::DegenerateOutline));
    }

    #[test]
    fn test_outline_spanning_the_integer_range() {
        let text = "START\nN=16\nTD\nP=0,-9000000000000000000\nP=0,9000000000000000000\nEND\n";
        let report = validate(text);
        assert!(!report.has(IssueCode::DegenerateOutline));
        assert!(report.is_clean(), "got: {:?}", report.issues);
    }

    #[test]
    fn test_point_outside_outline() {
        let text = "START\nN=46\nTD\nP=0,100\nP=0,200\nEND\nSTART\nBD\nP=0,250\nEND\n";
        let report = validate(text);
        assert!(report.has(IssueCode::PointOutsideOutline));
    }

    #[test]
    fn test_cej_on_crown_edge() {
        let text = "START\nN=21\nTD\nP=0,10\nP=0,50\nEND\nSTART\nCD\nP=0,50\nEND\n";
        let report = validate(text);
        assert!(report.has(IssueCode::ZeroCejDistance));

        // Mandibular crown edge is the smallest y.
        let text = "START\nN=41\nTD\nP=0,10\nP=0,50\nEND\nSTART\nCD\nP=0,50\nEND\n";
        let report = validate(text);
        assert!(!report.has(IssueCode::ZeroCejDistance));
    }

    #[test]
    fn test_report_display() {
        let report = validate("START\nN=21\nBD\nP=0,10\nEND\n");
        let text = report.to_string();
        assert!(text.contains("0 error(s) and 1 warning(s)"));
        assert!(text.contains("Warnings:\n  tooth 21   MissingOutline: "));

        let clean = validate(VALID).to_string();
        assert!(clean.contains("Validation passed"));
    }
}
