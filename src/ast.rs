//! Markup AST for the expansion pass
//!
//! Core node types for parsed markup with source location tracking. Trees
//! arrive from an upstream parser and leave this crate fully rebuilt; no node
//! is ever mutated after construction.

use serde::{Deserialize, Serialize};

/// Represents a span in the source text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A parsed markup node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Element(Element),
    Attribute(Attribute),
    Text(Text),
    Comment(Comment),
    Expansion(Expansion),
    ExpansionCase(ExpansionCase),
}

/// An element with its attributes and children, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub span: Span,
    pub open_span: Span,
    pub close_span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub value: String,
    pub span: Span,
}

/// An ICU message form: `{switchExpr, form, selector {body} ...}`.
///
/// `form` is kept as the raw discriminant string so that non-plural forms
/// retain their declared spelling in emitted translation markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    pub switch_expr: String,
    pub switch_expr_span: Span,
    pub form: String,
    pub cases: Vec<ExpansionCase>,
    pub span: Span,
}

/// One selector-guarded body inside an [`Expansion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionCase {
    pub selector: String,
    pub selector_span: Span,
    pub body: Vec<Node>,
    pub span: Span,
}

impl Element {
    pub fn new(
        tag: impl Into<String>,
        attrs: Vec<Attribute>,
        children: Vec<Node>,
        span: Span,
        open_span: Span,
        close_span: Span,
    ) -> Self {
        Self {
            tag: tag.into(),
            attrs,
            children,
            span,
            open_span,
            close_span,
        }
    }
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            span,
        }
    }
}

impl Text {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }
}

impl Comment {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }
}

impl Expansion {
    pub fn new(
        switch_expr: impl Into<String>,
        form: impl Into<String>,
        cases: Vec<ExpansionCase>,
        span: Span,
        switch_expr_span: Span,
    ) -> Self {
        Self {
            switch_expr: switch_expr.into(),
            switch_expr_span,
            form: form.into(),
            cases,
            span,
        }
    }
}

impl ExpansionCase {
    pub fn new(
        selector: impl Into<String>,
        body: Vec<Node>,
        span: Span,
        selector_span: Span,
    ) -> Self {
        Self {
            selector: selector.into(),
            selector_span,
            body,
            span,
        }
    }
}

impl Node {
    /// Returns the span of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::Element(el) => el.span,
            Node::Attribute(attr) => attr.span,
            Node::Text(text) => text.span,
            Node::Comment(comment) => comment.span,
            Node::Expansion(exp) => exp.span,
            Node::ExpansionCase(case) => case.span,
        }
    }

    /// Returns the variant name of this node as a string (for diagnostics and debugging).
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Element(_) => "Element",
            Node::Attribute(_) => "Attribute",
            Node::Text(_) => "Text",
            Node::Comment(_) => "Comment",
            Node::Expansion(_) => "Expansion",
            Node::ExpansionCase(_) => "ExpansionCase",
        }
    }

    /// Renders the node back to approximate markup text.
    pub fn pretty(&self) -> String {
        match self {
            Node::Element(el) => {
                let attrs = el
                    .attrs
                    .iter()
                    .map(|a| format!(" {}=\"{}\"", a.name, a.value))
                    .collect::<String>();
                let children = el.children.iter().map(|c| c.pretty()).collect::<String>();
                format!("<{}{}>{}</{}>", el.tag, attrs, children, el.tag)
            }
            Node::Attribute(a) => format!("{}=\"{}\"", a.name, a.value),
            Node::Text(t) => t.value.clone(),
            Node::Comment(c) => format!("<!--{}-->", c.value),
            Node::Expansion(exp) => {
                let cases = exp
                    .cases
                    .iter()
                    .map(|c| format!(" {}", Self::pretty_case(c)))
                    .collect::<String>();
                format!("{{{}, {},{}}}", exp.switch_expr, exp.form, cases)
            }
            Node::ExpansionCase(case) => Self::pretty_case(case),
        }
    }

    fn pretty_case(case: &ExpansionCase) -> String {
        let body = case.body.iter().map(|n| n.pretty()).collect::<String>();
        format!("{} {{{}}}", case.selector, body)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

/// Helper to check if a span is valid for a given source string.
pub fn assert_valid_span(span: Span, source: &str) {
    debug_assert!(
        span.start <= span.end && span.end <= source.len(),
        "Invalid span: {{start: {}, end: {}}} for source of length {}",
        span.start,
        span.end,
        source.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(start: usize, end: usize) -> Span {
        Span { start, end }
    }

    #[test]
    fn node_span_matches_variant_span() {
        let text = Node::Text(Text::new("hi", sp(3, 5)));
        assert_eq!(text.span(), sp(3, 5));
        let attr = Node::Attribute(Attribute::new("class", "big", sp(0, 11)));
        assert_eq!(attr.span(), sp(0, 11));
    }

    #[test]
    fn pretty_round_trips_simple_markup() {
        let el = Node::Element(Element::new(
            "p",
            vec![Attribute::new("class", "big", sp(3, 14))],
            vec![
                Node::Text(Text::new("hello ", sp(15, 21))),
                Node::Comment(Comment::new("note", sp(21, 32))),
            ],
            sp(0, 36),
            sp(0, 15),
            sp(32, 36),
        ));
        assert_eq!(el.pretty(), "<p class=\"big\">hello <!--note--></p>");
    }

    #[test]
    fn pretty_renders_expansion_forms() {
        let exp = Node::Expansion(Expansion::new(
            "count",
            "plural",
            vec![
                ExpansionCase::new(
                    "=0",
                    vec![Node::Text(Text::new("none", sp(20, 24)))],
                    sp(16, 25),
                    sp(16, 18),
                ),
                ExpansionCase::new(
                    "other",
                    vec![Node::Text(Text::new("some", sp(33, 37)))],
                    sp(26, 38),
                    sp(26, 31),
                ),
            ],
            sp(0, 39),
            sp(1, 6),
        ));
        assert_eq!(exp.pretty(), "{count, plural, =0 {none} other {some}}");
    }
}
