pub use crate::ast::{Attribute, Comment, Element, Expansion, ExpansionCase, Node, Span, Text};
pub use crate::diagnostics::{ExpandError, SourceContext};
pub use crate::expander::{expand_nodes, ExpansionResult};

pub mod ast;
pub mod diagnostics;
pub mod expander;
