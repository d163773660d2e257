//! # Message-Form Expansion
//!
//! Expands ICU-style message forms embedded in a parsed markup tree into
//! plain elements carrying structural directive markers, leaving every other
//! node untouched. Expansion is a pure transformation: input trees are never
//! mutated, and every output node is freshly built with spans carried over
//! from the input.
//!
//! For example,
//!
//! ```text
//! { messages.length, plural,
//!   =0 {zero}
//!   =1 {one}
//!   other {more than one}
//! }
//! ```
//!
//! expands into
//!
//! ```text
//! <ul plural-switch="messages.length">
//!   <template plural-case="=0"><li i18n="plural_=0">zero</li></template>
//!   <template plural-case="=1"><li i18n="plural_=1">one</li></template>
//!   <template plural-case="other"><li i18n="plural_other">more than one</li></template>
//! </ul>
//! ```
//!
//! Case bodies are themselves markup fragments and may contain nested forms;
//! the expander re-enters itself on each body. A body that contains no nested
//! form is tagged with an `i18n` translation marker; a body that does is left
//! for the deeper expansion to tag, so no unit is ever marked twice.
//!
//! Errors (invalid plural selectors, runaway nesting) are accumulated into
//! the returned [`ExpansionResult`] rather than aborting; the transform
//! always returns a complete tree.

use serde::{Deserialize, Serialize};

use crate::ast::{Attribute, Element, Expansion, ExpansionCase, Node};
use crate::diagnostics::ExpandError;

// =============================
// Emitted vocabulary
// =============================

// CLDR plural categories: http://cldr.unicode.org/index/cldr-spec/plural-rules
pub const PLURAL_CATEGORIES: &[&str] = &["zero", "one", "two", "few", "many", "other"];

/// Maximum nesting depth of message forms before expansion gives up on a
/// subtree and reports a diagnostic instead of overflowing the stack.
pub const MAX_EXPANSION_DEPTH: usize = 64;

/// Tag of the outer element wrapping all cases of one form.
pub const LIST_TAG: &str = "ul";
/// Tag of the per-case wrapper element.
pub const CASE_TAG: &str = "template";
/// Tag of the container element holding one case's body.
pub const ITEM_TAG: &str = "li";

/// Switch marker on the outer list element of a plural form.
pub const ATTR_PLURAL_SWITCH: &str = "plural-switch";
/// Case marker on each per-case template element of a plural form.
pub const ATTR_PLURAL_CASE: &str = "plural-case";
/// Switch marker on the outer list element of a select form.
pub const ATTR_SELECT_SWITCH: &str = "select-switch";
/// Case marker on each per-case template element of a select form.
pub const ATTR_SELECT_CASE: &str = "select-case";
/// Translation marker on a case body container whose content is a leaf unit.
pub const ATTR_I18N: &str = "i18n";

const PLURAL_FORM: &str = "plural";

// =============================
// Public API
// =============================

/// Output envelope of one [`expand_nodes`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionResult {
    /// The rebuilt node sequence, with every message form replaced.
    pub nodes: Vec<Node>,
    /// Whether any message form occurred anywhere in this subtree.
    pub expanded: bool,
    /// All diagnostics accumulated across the subtree, in origin order.
    pub errors: Vec<ExpandError>,
}

/// Expands all message forms in `nodes`, recursively.
///
/// Returns a fully independent tree; the input is only read. Diagnostics
/// never abort the transform, so the returned tree is always complete.
pub fn expand_nodes(nodes: &[Node]) -> ExpansionResult {
    expand_level(nodes, 0)
}

/// Checks a plural case selector: a CLDR category or `=<number>`.
pub fn is_plural_selector(selector: &str) -> bool {
    if PLURAL_CATEGORIES.contains(&selector) {
        return true;
    }
    let Some(digits) = selector.strip_prefix('=') else {
        return false;
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// =============================
// Tree walker
// =============================

// Walks one node sequence, rebuilding it with all message forms expanded.
// `depth` counts enclosing message forms, not elements.
fn expand_level(nodes: &[Node], depth: usize) -> ExpansionResult {
    let mut out = Vec::with_capacity(nodes.len());
    let mut expanded = false;
    let mut errors = Vec::new();

    for node in nodes {
        match node {
            Node::Element(el) => {
                let children = expand_level(&el.children, depth);
                expanded |= children.expanded;
                errors.extend(children.errors);
                out.push(Node::Element(Element::new(
                    el.tag.clone(),
                    el.attrs.clone(),
                    children.nodes,
                    el.span,
                    el.open_span,
                    el.close_span,
                )));
            }
            Node::Attribute(_) | Node::Text(_) | Node::Comment(_) => {
                out.push(node.clone());
            }
            Node::Expansion(exp) => {
                expanded = true;
                if depth >= MAX_EXPANSION_DEPTH {
                    errors.push(ExpandError::DepthExceeded { span: exp.span });
                    out.push(node.clone());
                    continue;
                }
                let (element, form_errors) = if exp.form == PLURAL_FORM {
                    expand_plural(exp, depth)
                } else {
                    expand_select(exp, depth)
                };
                errors.extend(form_errors);
                out.push(Node::Element(element));
            }
            Node::ExpansionCase(case) => {
                // A case only exists inside its parent form; the strategies
                // below consume cases directly and never hand one back to the
                // walker. Reaching this arm means the caller built a
                // malformed tree.
                panic!(
                    "expansion case `{}` visited outside its parent expansion",
                    case.selector
                );
            }
        }
    }

    ExpansionResult {
        nodes: out,
        expanded,
        errors,
    }
}

// =============================
// Expansion strategies
// =============================

// Plural forms: selectors are validated against the CLDR vocabulary, and the
// emitted markers use the plural naming.
fn expand_plural(exp: &Expansion, depth: usize) -> (Element, Vec<ExpandError>) {
    let mut errors = Vec::new();
    let mut children = Vec::with_capacity(exp.cases.len());

    for case in &exp.cases {
        if !is_plural_selector(&case.selector) {
            errors.push(ExpandError::InvalidPluralSelector {
                selector: case.selector.clone(),
                span: case.selector_span,
            });
        }
        let body = expand_level(&case.body, depth + 1);
        errors.extend(body.errors);

        let item = Element::new(
            ITEM_TAG,
            translation_marker(exp, case, body.expanded),
            body.nodes,
            case.span,
            case.span,
            case.span,
        );
        children.push(Node::Element(Element::new(
            CASE_TAG,
            vec![Attribute::new(
                ATTR_PLURAL_CASE,
                case.selector.clone(),
                case.selector_span,
            )],
            vec![Node::Element(item)],
            case.span,
            case.span,
            case.span,
        )));
    }

    let switch = Attribute::new(
        ATTR_PLURAL_SWITCH,
        exp.switch_expr.clone(),
        exp.switch_expr_span,
    );
    let list = Element::new(LIST_TAG, vec![switch], children, exp.span, exp.span, exp.span);
    (list, errors)
}

// Select and every other non-plural form: selectors are accepted as-is and
// the emitted markers use the select naming.
fn expand_select(exp: &Expansion, depth: usize) -> (Element, Vec<ExpandError>) {
    let mut errors = Vec::new();
    let mut children = Vec::with_capacity(exp.cases.len());

    for case in &exp.cases {
        let body = expand_level(&case.body, depth + 1);
        errors.extend(body.errors);

        let item = Element::new(
            ITEM_TAG,
            translation_marker(exp, case, body.expanded),
            body.nodes,
            case.span,
            case.span,
            case.span,
        );
        children.push(Node::Element(Element::new(
            CASE_TAG,
            vec![Attribute::new(
                ATTR_SELECT_CASE,
                case.selector.clone(),
                case.selector_span,
            )],
            vec![Node::Element(item)],
            case.span,
            case.span,
            case.span,
        )));
    }

    let switch = Attribute::new(
        ATTR_SELECT_SWITCH,
        exp.switch_expr.clone(),
        exp.switch_expr_span,
    );
    let list = Element::new(LIST_TAG, vec![switch], children, exp.span, exp.span, exp.span);
    (list, errors)
}

// A case body that contained no nested form is a leaf translation unit and
// gets tagged; otherwise the deeper expansion already tagged its own leaves.
fn translation_marker(exp: &Expansion, case: &ExpansionCase, body_expanded: bool) -> Vec<Attribute> {
    if body_expanded {
        return Vec::new();
    }
    vec![Attribute::new(
        ATTR_I18N,
        format!("{}_{}", exp.form, case.selector),
        case.selector_span,
    )]
}
