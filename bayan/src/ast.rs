//! AST infrastructure types
//!
//! This module contains metadata types used throughout the parser and engine:
//! - `Span` for tracking source code locations
//! - `VariableGenerator` for naming anonymous variables during parsing

/// Span representing a location in source code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn from_pest_span(span: pest::Span) -> Self {
        let (line, col) = span.start_pos().line_col();
        Self {
            start: span.start(),
            end: span.end(),
            line,
            col,
        }
    }
}

/// Counter that hands out distinct names for anonymous variables (`_`, `?_`)
///
/// Every occurrence of an anonymous variable must unify independently, so each
/// one gets its own name. The `_` prefix keeps them out of reported solutions.
#[derive(Default)]
pub struct VariableGenerator {
    next_id: u64,
}

impl VariableGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_anonymous(&mut self) -> String {
        let name = format!("_G{}", self.next_id);
        self.next_id += 1;
        name
    }
}
