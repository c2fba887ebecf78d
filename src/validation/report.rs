//! Issue types produced by document validation.

use serde::Serialize;
use std::fmt;

use crate::ir::ToothNumber;

/// Everything validation found in one document, in discovery order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    fn of_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn error_count(&self) -> usize {
        self.of_severity(Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.of_severity(Severity::Warning).count()
    }

    /// True when nothing was dropped; warnings are allowed.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// True when there are neither errors nor warnings.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation found {} error(s) and {} warning(s)",
            self.error_count(),
            self.warning_count()
        )?;

        for (severity, heading) in [(Severity::Error, "Errors"), (Severity::Warning, "Warnings")] {
            let mut issues = self.of_severity(severity).peekable();
            if issues.peek().is_none() {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{heading}:")?;
            for issue in issues {
                writeln!(f, "  {issue}")?;
            }
        }
        Ok(())
    }
}

/// One finding, located by line or tooth.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message, context)
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {:?}: {}",
            self.context.to_string(),
            self.code,
            self.message
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Data that charts with gaps or surprises but is not lost.
    Warning,
    /// Annotated data that the parser had to drop.
    Error,
}

/// Stable issue identifiers, printed as-is in text output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Scanner
    UnknownLine,
    LineOutsideSection,
    UnparsableNumber,
    /// A section was discarded before it could be committed.
    DroppedRecord,
    /// A record was committed while no tooth number was in effect.
    DetachedRecord,

    // Per tooth
    NonFdiTooth,
    /// Bone, CEJ or TLA points for a tooth with no outline.
    MissingOutline,
    /// An outline whose vertical span is zero.
    DegenerateOutline,
    PointOutsideOutline,
    /// A CEJ point on the crown edge; relative bone loss is undefined there.
    ZeroCejDistance,

    EmptyDocument,
}

/// Where an issue was found.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum IssueContext {
    Document,
    Line { line: usize },
    Tooth { tooth: ToothNumber },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Document => f.write_str("document"),
            IssueContext::Line { line } => write!(f, "line {line}"),
            IssueContext::Tooth { tooth } => write!(f, "tooth {tooth}"),
        }
    }
}
