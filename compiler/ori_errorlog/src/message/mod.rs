//! Core message types: [`Severity`], [`Kind`], [`SourceSpan`], and
//! [`DiagnosticMessage`].
//!
//! A [`DiagnosticMessage`] is immutable once built. Its rendered
//! [`full_text`](DiagnosticMessage::full_text) is computed at construction
//! and doubles as the message identity used when collapsing duplicates.

use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

/// Sentinel returned for a severity ordinal outside the known range.
pub const UNKNOWN_SEVERITY: &str = "#Internal Error: Unknown ErrorLevel#";

/// Sentinel returned for a kind ordinal outside the known range.
pub const UNKNOWN_KIND: &str = "#Internal Error: Unknown ErrorType#";

/// Severity level of a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Notification,
}

impl Severity {
    /// All severities in ordinal order.
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Notification];

    /// Stable ordinal used across the host boundary.
    #[inline]
    pub fn ordinal(self) -> i32 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Notification => 2,
        }
    }

    /// Look up a severity by ordinal. Unknown ordinals yield `None`.
    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.ordinal() == ordinal)
    }

    /// Display name of this severity.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Notification => "Notification",
        }
    }

    /// Display name for a raw ordinal, or [`UNKNOWN_SEVERITY`].
    pub fn name_of_ordinal(ordinal: i32) -> &'static str {
        Self::from_ordinal(ordinal).map_or(UNKNOWN_SEVERITY, Severity::as_str)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiler phase that produced a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    Syntax,
    Grammar,
    Translation,
    Symbolic,
    Runtime,
    Scripting,
}

impl Kind {
    /// All kinds in ordinal order.
    pub const ALL: [Kind; 6] = [
        Kind::Syntax,
        Kind::Grammar,
        Kind::Translation,
        Kind::Symbolic,
        Kind::Runtime,
        Kind::Scripting,
    ];

    #[inline]
    pub fn ordinal(self) -> i32 {
        match self {
            Kind::Syntax => 0,
            Kind::Grammar => 1,
            Kind::Translation => 2,
            Kind::Symbolic => 3,
            Kind::Runtime => 4,
            Kind::Scripting => 5,
        }
    }

    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.ordinal() == ordinal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Syntax => "SYNTAX",
            Kind::Grammar => "GRAMMAR",
            Kind::Translation => "TRANSLATION",
            Kind::Symbolic => "SYMBOLIC",
            Kind::Runtime => "RUNTIME",
            Kind::Scripting => "SCRIPTING",
        }
    }

    /// Display name for a raw ordinal, or [`UNKNOWN_KIND`].
    pub fn name_of_ordinal(ordinal: i32) -> &'static str {
        Self::from_ordinal(ordinal).map_or(UNKNOWN_KIND, Kind::as_str)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a diagnostic in a source file.
///
/// Lines and columns are 1-based. A span whose four coordinates are all
/// zero means "no location" (see [`SourceSpan::has_coordinates`]).
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceSpan {
    pub file: PathBuf,
    pub is_read_only: bool,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SourceSpan {
    /// Create a writable span.
    pub fn new(
        file: impl Into<PathBuf>,
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
    ) -> Self {
        SourceSpan {
            file: file.into(),
            is_read_only: false,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    #[must_use]
    pub fn read_only(mut self, is_read_only: bool) -> Self {
        self.is_read_only = is_read_only;
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Whether any coordinate is non-zero.
    pub fn has_coordinates(&self) -> bool {
        self.start_line != 0 || self.start_col != 0 || self.end_line != 0 || self.end_col != 0
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}-{}:{}:{}",
            self.file.display(),
            self.start_line,
            self.start_col,
            self.end_line,
            self.end_col,
            if self.is_read_only { "readonly" } else { "writable" }
        )
    }
}

/// A single recorded error, warning, or notification.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DiagnosticMessage {
    id: u32,
    kind: Kind,
    severity: Severity,
    short_text: String,
    full_text: String,
    tokens: Vec<String>,
    span: Option<SourceSpan>,
}

impl DiagnosticMessage {
    /// Build a message, substituting `tokens` into `text`.
    ///
    /// `%s` consumes the next token in order; `%1`..`%9` select a token by
    /// position. Placeholders with no matching token are kept verbatim.
    pub fn new(
        id: u32,
        kind: Kind,
        severity: Severity,
        text: &str,
        tokens: Vec<String>,
        span: Option<SourceSpan>,
    ) -> Self {
        let short_text = substitute_tokens(text, &tokens);
        let full_text = match &span {
            Some(span) => format!("[{span}] {short_text}"),
            None => short_text.clone(),
        };
        DiagnosticMessage {
            id,
            kind,
            severity,
            short_text,
            full_text,
            tokens,
            span,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Message text with tokens substituted, without location.
    pub fn short_text(&self) -> &str {
        &self.short_text
    }

    /// Rendered text including the location prefix, if any.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn span(&self) -> Option<&SourceSpan> {
        self.span.as_ref()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_text)
    }
}

fn substitute_tokens(text: &str, tokens: &[String]) -> String {
    if tokens.is_empty() {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut next = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('s') => {
                chars.next();
                match tokens.get(next) {
                    Some(token) => out.push_str(token),
                    None => out.push_str("%s"),
                }
                next += 1;
            }
            Some(d @ '1'..='9') => {
                chars.next();
                let index = d as usize - '1' as usize;
                match tokens.get(index) {
                    Some(token) => out.push_str(token),
                    None => {
                        let _ = write!(out, "%{d}");
                    }
                }
            }
            _ => out.push('%'),
        }
    }
    out
}
