//! Diagnostic types and the reporting sink
//!
//! Diagnostics are produced by the walker, handed to a [`DiagnosticReporter`]
//! owned by the host, and later fed back into the fix applier. A diagnostic
//! remembers the structural identity of the node it was raised on, so fixes
//! applied in the same batch do not depend on text offsets alone.

use biome_text_size::{TextRange, TextSize};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::syntax::{DocumentId, NodeHandle};

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Half-open byte range inside a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub document: DocumentId,
    pub start: u32,
    pub end: u32,
}

impl SourceSpan {
    pub fn new(document: DocumentId, range: TextRange) -> Self {
        Self {
            document,
            start: range.start().into(),
            end: range.end().into(),
        }
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(TextSize::from(self.start), TextSize::from(self.end))
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if two spans in the same document share any byte
    pub fn overlaps(&self, other: &SourceSpan) -> bool {
        self.document == other.document && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}..{}", self.document, self.start, self.end)
    }
}

/// A diagnostic raised by a migration rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Identifier of the rule that matched
    pub rule_id: String,
    /// Short rule title
    pub title: String,
    /// Message formatted with the matched text
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Span of the matched node, outer trivia excluded
    pub span: SourceSpan,
    /// Node the diagnostic was raised on, when it came from a walk
    #[serde(skip)]
    pub node: Option<NodeHandle>,
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        span: SourceSpan,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            title: title.into(),
            message: message.into(),
            severity,
            span,
            node: None,
        }
    }

    /// Attach the structural identity of the matched node
    pub fn with_node(mut self, node: NodeHandle) -> Self {
        self.node = Some(node);
        self
    }

    /// Key identifying the same finding across duplicate reports
    pub fn key(&self) -> DiagnosticKey {
        DiagnosticKey {
            rule_id: self.rule_id.clone(),
            document: self.span.document.clone(),
            start: self.span.start,
            end: self.span.end,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.span, self.severity, self.rule_id, self.message
        )
    }
}

/// Identity of a finding: rule plus exact span
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiagnosticKey {
    pub rule_id: String,
    pub document: DocumentId,
    pub start: u32,
    pub end: u32,
}

/// Sink for diagnostics; may be called from several walker threads at once
pub trait DiagnosticReporter: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Thread-safe reporter that keeps every distinct finding once
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: DashMap<DiagnosticKey, Diagnostic>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics ordered by document, span start, span end, then rule id
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self.diagnostics.into_iter().map(|(_, d)| d).collect();
        diagnostics.sort_by(|a, b| {
            (&a.span.document, a.span.start, a.span.end, &a.rule_id).cmp(&(
                &b.span.document,
                b.span.start,
                b.span.end,
                &b.rule_id,
            ))
        });
        diagnostics
    }
}

impl DiagnosticReporter for CollectingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        let key = diagnostic.key();
        if self.diagnostics.insert(key, diagnostic).is_some() {
            tracing::debug!("Duplicate diagnostic report ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: u32, end: u32) -> SourceSpan {
        SourceSpan::new(
            DocumentId::new("a.cs"),
            TextRange::new(TextSize::from(start), TextSize::from(end)),
        )
    }

    #[test]
    fn test_span_overlap() {
        assert!(span(0, 5).overlaps(&span(4, 8)));
        assert!(!span(0, 5).overlaps(&span(5, 8)));
        let other_doc = SourceSpan::new(
            DocumentId::new("b.cs"),
            TextRange::new(TextSize::from(0), TextSize::from(5)),
        );
        assert!(!span(0, 5).overlaps(&other_doc));
    }

    #[test]
    fn test_collecting_reporter_dedups_and_sorts() {
        let reporter = CollectingReporter::new();
        let late = Diagnostic::new("rule/b", "B", "b", Severity::Warning, span(10, 12));
        let early = Diagnostic::new("rule/a", "A", "a", Severity::Warning, span(0, 4));
        reporter.report(late.clone());
        reporter.report(early.clone());
        reporter.report(late.clone());

        assert_eq!(reporter.len(), 2);
        assert_eq!(reporter.into_sorted(), vec![early, late]);
    }

    #[test]
    fn test_diagnostic_json_shape() {
        let diagnostic = Diagnostic::new(
            "migration/x",
            "Title",
            "Message",
            Severity::Warning,
            span(1, 3),
        );
        let json = serde_json::to_value(&diagnostic).expect("serialize");
        assert_eq!(json["ruleId"], "migration/x");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["span"]["document"], "a.cs");
        assert_eq!(json["span"]["start"], 1);
        assert!(json.get("node").is_none());
    }
}
