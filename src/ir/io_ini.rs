//! Reader for the line-oriented periodontal annotation format.
//!
//! Files are a sequence of `START` ... `END` sections:
//!
//! ```text
//! START
//! N=16
//! TD
//! C=255,0,0,255
//! P=120,340
//! P=131,402
//! S=3
//! END
//! ```
//!
//! The tooth number (`N=`) and section kind (`TD`, `BD`/`DD`, `CD`, `AD`,
//! `RBLD`, `TRLD`) are positional: they apply to every following record until
//! replaced, and survive `END`. The reader never fails on content. Unknown
//! lines, unparsable numbers and unterminated sections are tolerated and
//! recorded as [`ParseDiagnostic`]s on the document.

use std::fs;
use std::path::Path;

use super::model::{AnnotationKind, AnnotationRecord, DiagnosticCode, ParseDiagnostic, ParsedDocument};
use super::point::{Color, Point};
use super::tooth::ToothNumber;
use crate::error::PeriochartError;

/// Reads and parses an annotation file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn read_ini(path: &Path) -> Result<ParsedDocument, PeriochartError> {
    let bytes = fs::read(path).map_err(PeriochartError::Io)?;
    let text = std::str::from_utf8(&bytes).map_err(|source| PeriochartError::InvalidUtf8 {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = from_ini_str(text);
    log::info!(
        "parsed {}: {} record(s), {} tooth entr(ies), {} diagnostic(s)",
        path.display(),
        doc.records.len(),
        doc.teeth.len(),
        doc.diagnostics.len()
    );
    Ok(doc)
}

/// Parses raw annotation bytes.
///
/// # Errors
/// Returns [`PeriochartError::InvalidUtf8`] if the bytes are not UTF-8 text.
pub fn from_ini_slice(bytes: &[u8]) -> Result<ParsedDocument, PeriochartError> {
    let text = std::str::from_utf8(bytes).map_err(|source| PeriochartError::InvalidUtf8 {
        path: Path::new("<input>").to_path_buf(),
        source,
    })?;
    Ok(from_ini_str(text))
}

/// Parses annotation text into a document.
///
/// This is a single fold over trimmed lines carrying a [`Scanner`]; it
/// cannot fail.
pub fn from_ini_str(text: &str) -> ParsedDocument {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let (scanner, mut doc) = text.lines().enumerate().fold(
        (Scanner::default(), ParsedDocument::default()),
        |(scanner, mut doc), (idx, line)| {
            let scanner = scanner.step(idx + 1, line.trim(), &mut doc);
            (scanner, doc)
        },
    );
    scanner.finish(&mut doc);
    doc
}

/// Fuzz-only entrypoint for annotation parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_ini(input: &[u8]) -> Result<(), PeriochartError> {
    let _ = from_ini_slice(input)?;
    Ok(())
}

/// Scanner position relative to `START`/`END`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ScanState {
    #[default]
    Idle,
    InSection { opened_at: usize },
}

/// Fields buffered for the record being built.
#[derive(Clone, Debug, Default)]
struct RecordBuffer {
    points: Vec<Point>,
    color: Option<Color>,
    size: Option<i64>,
    is_rect: bool,
}

/// The complete scanner state threaded through the fold.
#[derive(Clone, Debug, Default)]
struct Scanner {
    state: ScanState,
    current_tooth: Option<ToothNumber>,
    current_kind: Option<AnnotationKind>,
    buffer: RecordBuffer,
}

/// A classified input line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Start,
    End,
    Section(AnnotationKind),
    Tooth(&'a str),
    Color(&'a str),
    Point(&'a str),
    Size(&'a str),
    Rect,
    Unknown,
}

fn classify(line: &str) -> Line<'_> {
    if line.is_empty() {
        return Line::Blank;
    }
    match line {
        "START" => return Line::Start,
        "END" => return Line::End,
        _ => {}
    }
    // Section markers first: `RBLD` must not be read as a rectangle flag.
    if let Some(kind) = AnnotationKind::from_marker(line) {
        return Line::Section(kind);
    }
    if let Some(rest) = line.strip_prefix("N=") {
        Line::Tooth(rest)
    } else if let Some(rest) = line.strip_prefix("C=") {
        Line::Color(rest)
    } else if let Some(rest) = line.strip_prefix("P=") {
        Line::Point(rest)
    } else if let Some(rest) = line.strip_prefix("S=") {
        Line::Size(rest)
    } else if line.starts_with('R') {
        Line::Rect
    } else {
        Line::Unknown
    }
}

impl Scanner {
    fn step(mut self, line_num: usize, line: &str, doc: &mut ParsedDocument) -> Self {
        let in_section = matches!(self.state, ScanState::InSection { .. });

        match classify(line) {
            Line::Blank => {}
            Line::Start => {
                if in_section {
                    diagnose(
                        doc,
                        line_num,
                        DiagnosticCode::RestartedSection,
                        "START inside an open section; discarding buffered record",
                    );
                }
                self.buffer = RecordBuffer::default();
                self.state = ScanState::InSection {
                    opened_at: line_num,
                };
            }
            Line::End if in_section => {
                self.finalize(line_num, doc);
                self.state = ScanState::Idle;
            }
            Line::Tooth(raw) => {
                self.current_tooth = parse_int(raw).map(ToothNumber::new);
                if self.current_tooth.is_none() {
                    diagnose(
                        doc,
                        line_num,
                        DiagnosticCode::UnparsableNumber,
                        format!("tooth number '{raw}' is not an integer"),
                    );
                }
            }
            Line::Section(kind) if in_section => self.current_kind = Some(kind),
            Line::Color(raw) if in_section => {
                let mut parts = raw.split(',').map(parse_int);
                let color = Color {
                    r: parts.next().flatten(),
                    g: parts.next().flatten(),
                    b: parts.next().flatten(),
                    a: parts.next().flatten(),
                };
                if [color.r, color.g, color.b, color.a].contains(&None) {
                    diagnose(
                        doc,
                        line_num,
                        DiagnosticCode::UnparsableNumber,
                        format!("color '{raw}' has non-integer components"),
                    );
                }
                self.buffer.color = Some(color);
            }
            Line::Point(raw) if in_section => {
                let mut parts = raw.split(',').map(parse_int);
                let point = Point {
                    x: parts.next().flatten(),
                    y: parts.next().flatten(),
                };
                if !point.is_complete() {
                    diagnose(
                        doc,
                        line_num,
                        DiagnosticCode::UnparsableNumber,
                        format!("point '{raw}' has non-integer coordinates"),
                    );
                }
                self.buffer.points.push(point);
            }
            Line::Size(raw) if in_section => {
                self.buffer.size = parse_int(raw);
                if self.buffer.size.is_none() {
                    diagnose(
                        doc,
                        line_num,
                        DiagnosticCode::UnparsableNumber,
                        format!("size '{raw}' is not an integer"),
                    );
                }
            }
            Line::Rect if in_section => self.buffer.is_rect = true,
            Line::Unknown => diagnose(
                doc,
                line_num,
                DiagnosticCode::UnknownLine,
                format!("ignored unrecognized line '{}'", truncate(line)),
            ),
            Line::End
            | Line::Section(_)
            | Line::Color(_)
            | Line::Point(_)
            | Line::Size(_)
            | Line::Rect => diagnose(
                doc,
                line_num,
                DiagnosticCode::LineOutsideSection,
                format!("ignored '{}' outside START/END", truncate(line)),
            ),
        }

        self
    }

    /// Commits the buffered record and clears the buffer.
    fn finalize(&mut self, line_num: usize, doc: &mut ParsedDocument) {
        let buffer = std::mem::take(&mut self.buffer);

        let Some(kind) = self.current_kind else {
            log::debug!("line {line_num}: dropping record with no section kind");
            diagnose(
                doc,
                line_num,
                DiagnosticCode::RecordWithoutKind,
                format!(
                    "record with {} point(s) has no section kind; dropped",
                    buffer.points.len()
                ),
            );
            return;
        };

        if self.current_tooth.is_none() && !buffer.is_rect {
            diagnose(
                doc,
                line_num,
                DiagnosticCode::RecordWithoutTooth,
                format!("{kind} record has no tooth number"),
            );
        }

        doc.commit(AnnotationRecord {
            kind,
            tooth: self.current_tooth,
            points: buffer.points,
            color: buffer.color,
            size: buffer.size,
            is_rect: buffer.is_rect,
        });
    }

    /// Closes the scan. An open section is dropped, never committed.
    fn finish(self, doc: &mut ParsedDocument) {
        if let ScanState::InSection { opened_at } = self.state {
            log::debug!(
                "dropping unterminated record opened at line {opened_at} ({} point(s))",
                self.buffer.points.len()
            );
            diagnose(
                doc,
                opened_at,
                DiagnosticCode::UnterminatedRecord,
                "section opened here was never closed with END; dropped",
            );
        }
    }
}

fn diagnose(
    doc: &mut ParsedDocument,
    line: usize,
    code: DiagnosticCode,
    message: impl Into<String>,
) {
    doc.diagnostics.push(ParseDiagnostic {
        line,
        code,
        message: message.into(),
    });
}

fn truncate(line: &str) -> String {
    const MAX_CHARS: usize = 40;
    if line.chars().count() <= MAX_CHARS {
        line.to_string()
    } else {
        let head: String = line.chars().take(MAX_CHARS).collect();
        format!("{head}...")
    }
}

/// Integer parsing with `parseInt` leniency.
///
/// Leading whitespace is skipped, an optional sign is accepted, and the
/// longest run of decimal digits is read; anything after it is ignored.
/// Returns `None` when there are no digits or the value overflows `i64`.
pub(crate) fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
