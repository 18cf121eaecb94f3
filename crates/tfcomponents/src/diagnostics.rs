//! diagnostics collected while loading configuration
//!
//! Loading never stops at the first problem. Every issue becomes a [Diagnostic] which is appended to a
//! [Diagnostics] collection and handed back to the caller together with whatever could still be decoded.
//!
//! A diagnostic either has a subject ([SourceRange]) pointing into the file it was found in, or it is
//! *sourceless*, which is used when no content could be opened or looked at (unreadable files, wrong filename).
use serde::Serialize;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A position in a source file
///
/// `line` and `column` start at 1, `byte` is a zero based offset. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
    pub byte: usize,
}

impl SourcePos {
    /// The position every parse starts at
    pub const INITIAL: SourcePos = SourcePos {
        line: 1,
        column: 1,
        byte: 0,
    };
}

impl Default for SourcePos {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// A span of source code in a named file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceRange {
    pub filename: String,
    pub start: SourcePos,
    pub end: SourcePos,
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            filename,
            start,
            end,
        } = self;

        if start.line == end.line {
            write!(f, "{filename}:{},{}-{}", start.line, start.column, end.column)
        } else {
            write!(
                f,
                "{filename}:{},{}-{},{}",
                start.line, start.column, end.line, end.column
            )
        }
    }
}

/// Source text of one file, used to turn byte offsets into [SourcePos]
pub struct SourceFile<'a> {
    filename: &'a str,
    text: &'a str,
    /// byte offset of the first character of each line
    line_starts: Vec<usize>,
}

impl<'a> SourceFile<'a> {
    pub fn new(filename: &'a str, text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();

        Self {
            filename,
            text,
            line_starts,
        }
    }

    pub fn filename(&self) -> &str {
        self.filename
    }

    pub fn pos(&self, byte: usize) -> SourcePos {
        let byte = byte.min(self.text.len());
        let line_index = self.line_starts.partition_point(|start| *start <= byte) - 1;
        let line_start = self.line_starts[line_index];

        // offsets handed out by the parser always sit on char boundaries, but be lenient
        let column = match self.text.get(line_start..byte) {
            Some(prefix) => prefix.chars().count() + 1,
            None => byte - line_start + 1,
        };

        SourcePos {
            line: line_index + 1,
            column,
            byte,
        }
    }

    pub fn range(&self, span: Range<usize>) -> SourceRange {
        SourceRange {
            filename: self.filename.to_string(),
            start: self.pos(span.start),
            end: self.pos(span.end),
        }
    }

    /// Range of a parsed hcl item
    ///
    /// Items constructed by hand instead of parsed carry no span, those point to the start of the file.
    pub fn range_of(&self, item: &impl hcl_edit::Span) -> SourceRange {
        self.range(item.span().unwrap_or(0..0))
    }
}

/// A single problem found while loading configuration
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error(
    "{severity}: {summary}{}: {detail}",
    .subject.as_ref().map(|subject| format!(" ({subject})")).unwrap_or_default()
)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    /// Where the problem is. `None` for sourceless diagnostics
    pub subject: Option<SourceRange>,
}

impl Diagnostic {
    pub fn sourceless(
        severity: Severity,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.into(),
            subject: None,
        }
    }

    pub fn error(
        summary: impl Into<String>,
        detail: impl Into<String>,
        subject: SourceRange,
    ) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            subject: Some(subject),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

/// Append-only collection of [Diagnostic]s
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(%diagnostic, "diagnostic found");
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        for diagnostic in other {
            self.push(diagnostic);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|diagnostic| diagnostic.is_error())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(diagnostic);
        diagnostics
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl std::error::Error for Diagnostics {}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(first) = self.diagnostics.first() else {
            return f.write_str("no diagnostics");
        };

        write!(f, "{first}")?;
        if self.diagnostics.len() > 1 {
            write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn positions() {
        let source = SourceFile::new("a.hcl", "one\ntwö three\n");

        assert_eq!(source.pos(0), SourcePos::INITIAL);
        assert_eq!(
            source.pos(4),
            SourcePos {
                line: 2,
                column: 1,
                byte: 4
            }
        );
        // "twö " is 5 bytes but 4 characters
        assert_eq!(
            source.pos(9),
            SourcePos {
                line: 2,
                column: 5,
                byte: 9
            }
        );
    }

    #[test]
    fn range_display() {
        let source = SourceFile::new("a.hcl", "one\ntwo\n");

        assert_eq!(source.range(0..3).to_string(), "a.hcl:1,1-4");
        assert_eq!(source.range(0..6).to_string(), "a.hcl:1,1-2,3");
    }

    #[test]
    fn diagnostic_display() {
        let sourceless = Diagnostic::sourceless(Severity::Error, "Oops", "Something broke.");
        insta::assert_snapshot!(sourceless.to_string(), @"error: Oops: Something broke.");

        let source = SourceFile::new("a.hcl", "foo {}\n");
        let located = Diagnostic::error("Oops", "Something broke.", source.range(0..3));
        insta::assert_snapshot!(located.to_string(), @"error: Oops (a.hcl:1,1-4): Something broke.");
    }

    #[test]
    fn collection() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_errors());

        diagnostics.push(Diagnostic::sourceless(Severity::Warning, "w", "first"));
        assert!(!diagnostics.has_errors());

        diagnostics.push(Diagnostic::sourceless(Severity::Error, "e", "second"));
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.errors().count(), 1);
        assert_eq!(diagnostics.to_string(), "warning: w: first (+1 more)");
    }
}
