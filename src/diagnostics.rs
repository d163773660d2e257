//! Diagnostics for the expansion pass.
//!
//! Errors found while expanding are accumulated and returned alongside the
//! transformed tree, never thrown; the transform always completes. Every
//! error carries the span of the construct that produced it so callers can
//! point back into the original template text.

use miette::{Diagnostic, LabeledSpan, NamedSource, Report};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::Span;
use crate::expander::{MAX_EXPANSION_DEPTH, PLURAL_CATEGORIES};

/// A non-fatal error produced while expanding message forms.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ExpandError {
    #[error("plural case `{selector}` must be `=<number>` or one of: {}", PLURAL_CATEGORIES.join(", "))]
    InvalidPluralSelector { selector: String, span: Span },
    #[error("expansion forms nest deeper than {} levels", MAX_EXPANSION_DEPTH)]
    DepthExceeded { span: Span },
}

impl ExpandError {
    /// Returns the span of the construct this error points at.
    pub fn span(&self) -> Span {
        match self {
            ExpandError::InvalidPluralSelector { span, .. } => *span,
            ExpandError::DepthExceeded { span } => *span,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ExpandError::InvalidPluralSelector { .. } => "not a valid plural case",
            ExpandError::DepthExceeded { .. } => "nested too deeply",
        }
    }

    /// Wraps this error in a [`miette::Report`] carrying the original
    /// template text, so rendering shows an underlined source snippet.
    pub fn to_report(self, ctx: &SourceContext) -> Report {
        Report::new(self).with_source_code(ctx.to_named_source())
    }
}

impl Diagnostic for ExpandError {
    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span();
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.label().to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// The original template text, for error rendering.
///
/// The transform itself never reads source text; only callers that still
/// hold it attach one of these to produce readable reports.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_selector_message_names_the_vocabulary() {
        let err = ExpandError::InvalidPluralSelector {
            selector: "bogus".to_string(),
            span: Span { start: 4, end: 9 },
        };
        let message = err.to_string();
        assert!(message.contains("`bogus`"));
        assert!(message.contains("zero, one, two, few, many, other"));
        assert!(message.contains("=<number>"));
    }

    #[test]
    fn report_renders_label_against_source() {
        let ctx = SourceContext::from_file(
            "greeting.html",
            "{n, plural, bogus {hi} other {hello}}",
        );
        let err = ExpandError::InvalidPluralSelector {
            selector: "bogus".to_string(),
            span: Span { start: 12, end: 17 },
        };
        let report = err.to_report(&ctx);
        let output = format!("{report:?}");
        assert!(output.contains("bogus"));
        assert!(output.contains("not a valid plural case"));
    }

    #[test]
    fn depth_error_spans_the_offending_form() {
        let err = ExpandError::DepthExceeded {
            span: Span { start: 7, end: 30 },
        };
        assert_eq!(err.span(), Span { start: 7, end: 30 });
        assert!(err.to_string().contains("nest deeper"));
    }
}
