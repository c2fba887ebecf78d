//! Inspect report types and terminal formatting.
//!
//! This module provides structured inspection results that are displayed
//! as boxed sections in the terminal or serialized as JSON.

use serde::Serialize;
use std::fmt;

use crate::ir::{AnnotationKind, Arch, ToothExtremes, ToothNumber};

/// Inner width of every boxed section, in characters.
const INNER_WIDTH: usize = 59;

/// The result of inspecting a parsed annotation document.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    /// Summary counts for the document.
    pub summary: SummarySection,
    /// Record and point counts per annotation kind.
    pub kinds: Vec<KindCount>,
    /// How many teeth of each arch carry each structure.
    pub coverage: Vec<ArchCoverage>,
    /// Per-tooth point counts and outline extremes.
    pub teeth: Vec<ToothRow>,
    /// Display options for formatting.
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Summary counts for the document.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SummarySection {
    /// Committed point-path records.
    pub records: usize,
    /// Rectangle records.
    pub rectangles: usize,
    /// Points across all committed records.
    pub points: usize,
    /// Points with a coordinate that did not parse.
    pub incomplete_points: usize,
    /// Tooth entries in the document.
    pub teeth: usize,
    /// Tooth entries outside the FDI permanent dentition.
    pub non_fdi_teeth: usize,
    /// Scanner diagnostics.
    pub diagnostics: usize,
}

/// Records and points of one annotation kind.
#[derive(Clone, Debug, Serialize)]
pub struct KindCount {
    pub kind: AnnotationKind,
    pub records: usize,
    pub points: usize,
}

/// Structure coverage for one arch.
#[derive(Clone, Debug, Serialize)]
pub struct ArchCoverage {
    pub arch: Arch,
    /// Teeth with a non-empty outline.
    pub outline: usize,
    /// Teeth with bone-level points.
    pub bone: usize,
    /// Teeth with CEJ points.
    pub cej: usize,
    /// Teeth with long-axis points.
    pub tla: usize,
}

/// One tooth's annotation counts.
#[derive(Clone, Debug, Serialize)]
pub struct ToothRow {
    pub tooth: ToothNumber,
    pub outline: Option<usize>,
    pub bone: Option<usize>,
    pub cej: Option<usize>,
    pub tla: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extremes: Option<ToothExtremes>,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header
        writeln!(f)?;
        writeln!(f, "╭─────────────────────────────────────────────────────────────╮")?;
        writeln!(f, "│            🦷  Annotation Inspection Report                 │")?;
        writeln!(f, "╰─────────────────────────────────────────────────────────────╯")?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;

        self.fmt_kinds(f)?;
        writeln!(f)?;

        self.fmt_coverage(f)?;
        writeln!(f)?;

        self.fmt_teeth(f)?;

        Ok(())
    }
}

impl InspectReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;

        open_section(f, "Summary")?;
        row(f, &format!("Records:       {:>8}", format_number(s.records)))?;
        if s.rectangles > 0 {
            row(f, &format!("Rectangles:    {:>8}", format_number(s.rectangles)))?;
        }
        row(f, &format!("Points:        {:>8}", format_number(s.points)))?;
        row(f, &format!("Teeth:         {:>8}", format_number(s.teeth)))?;
        row(f, "")?;
        if s.incomplete_points > 0 {
            row(
                f,
                &format!(
                    "⚠ Incomplete points: {} of {} ({})",
                    format_number(s.incomplete_points),
                    format_number(s.points),
                    fmt_percent(s.incomplete_points, s.points)
                ),
            )?;
        }
        if s.non_fdi_teeth > 0 {
            row(
                f,
                &format!("⚠ Non-FDI teeth:     {}", format_number(s.non_fdi_teeth)),
            )?;
        }
        if s.diagnostics > 0 {
            row(
                f,
                &format!("⚠ Diagnostics:       {}", format_number(s.diagnostics)),
            )?;
        }
        if s.incomplete_points == 0 && s.non_fdi_teeth == 0 && s.diagnostics == 0 {
            row(f, "✓ No scanner issues")?;
        }
        close_section(f)
    }

    fn fmt_kinds(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        open_section(f, &format!("Records by kind ({})", self.kinds.len()))?;

        if self.kinds.is_empty() {
            row(f, "No records found.")?;
        } else {
            let max_count = self.kinds.iter().map(|k| k.records).max().unwrap_or(1);
            for entry in &self.kinds {
                let bar = render_bar(entry.records, max_count, self.bar_width);
                row(
                    f,
                    &format!(
                        "{:<14} {:>5} rec {:>7} pts  {}",
                        entry.kind.as_str(),
                        format_number(entry.records),
                        format_number(entry.points),
                        bar
                    ),
                )?;
            }
        }
        close_section(f)
    }

    fn fmt_coverage(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        open_section(f, "Arch coverage (teeth of 16)")?;
        row(f, &format!("{:<12} {:>7} {:>7} {:>7} {:>7}", "", "outline", "bone", "cej", "tla"))?;
        for c in &self.coverage {
            row(
                f,
                &format!(
                    "{:<12} {:>7} {:>7} {:>7} {:>7}",
                    c.arch.as_str(),
                    c.outline,
                    c.bone,
                    c.cej,
                    c.tla
                ),
            )?;
        }
        close_section(f)
    }

    fn fmt_teeth(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        open_section(f, &format!("Teeth ({})", self.teeth.len()))?;

        if self.teeth.is_empty() {
            row(f, "No tooth entries found.")?;
        } else {
            row(
                f,
                &format!(
                    "{:<6} {:>7} {:>5} {:>5} {:>5}  {}",
                    "tooth", "outline", "bone", "cej", "tla", "y-span"
                ),
            )?;
            for t in &self.teeth {
                let span = t
                    .extremes
                    .map(|e| format!("{}..{}", e.min_y, e.max_y))
                    .unwrap_or_else(|| "-".to_string());
                row(
                    f,
                    &format!(
                        "{:<6} {:>7} {:>5} {:>5} {:>5}  {}",
                        t.tooth.to_string(),
                        fmt_count(t.outline),
                        fmt_count(t.bone),
                        fmt_count(t.cej),
                        fmt_count(t.tla),
                        span
                    ),
                )?;
            }
        }
        close_section(f)
    }
}

fn open_section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let fill = INNER_WIDTH.saturating_sub(title.chars().count() + 3);
    writeln!(f, "┌─ {} {}┐", title, "─".repeat(fill))?;
    row(f, "")
}

fn close_section(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    row(f, "")?;
    writeln!(f, "└{}┘", "─".repeat(INNER_WIDTH))
}

/// Writes one boxed row, padding by character count.
fn row(f: &mut fmt::Formatter<'_>, content: &str) -> fmt::Result {
    let body = format!("   {}", content);
    let padding = INNER_WIDTH.saturating_sub(body.chars().count());
    writeln!(f, "│{}{}│", body, " ".repeat(padding))
}

/// `-` for a structure never annotated, otherwise its point count.
fn fmt_count(count: Option<usize>) -> String {
    count.map_or_else(|| "-".to_string(), |n| n.to_string())
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}
