use crate::ast::{Span, VariableGenerator};
use crate::error::BayanError;
use crate::keywords::Keyword;
use crate::resource_limits::ResourceLimits;
use crate::semantic::*;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use std::sync::Arc;

pub mod goals;
pub mod statements;
pub mod terms;

#[derive(Parser)]
#[grammar = "src/parser/bayan.pest"]
pub struct BayanParser;

/// State threaded through the parse functions of one input
pub(crate) struct ParseContext<'a> {
    pub source_id: &'a str,
    pub source_text: Arc<str>,
    pub limits: &'a ResourceLimits,
    pub variables: VariableGenerator,
}

impl<'a> ParseContext<'a> {
    pub fn new(source_id: &'a str, content: &str, limits: &'a ResourceLimits) -> Self {
        Self {
            source_id,
            source_text: Arc::from(content),
            limits,
            variables: VariableGenerator::new(),
        }
    }

    /// Fail when a term or expression nests deeper than the configured limit
    pub fn check_depth(&self, depth: usize, pair: &Pair<Rule>) -> Result<(), BayanError> {
        if depth > self.limits.max_term_depth {
            let span = Span::from_pest_span(pair.as_span());
            return Err(BayanError::ResourceLimitExceeded {
                limit_name: "max_term_depth".to_string(),
                limit_value: self.limits.max_term_depth.to_string(),
                actual_value: depth.to_string(),
                suggestion: format!(
                    "Simplify the nesting at {}:{}:{}",
                    self.source_id, span.line, span.col
                ),
            });
        }
        Ok(())
    }
}

/// Parse a source file into a program
pub fn parse(content: &str, source_id: &str, limits: &ResourceLimits) -> Result<Program, BayanError> {
    // Check file size limit
    if content.len() > limits.max_file_size_bytes {
        return Err(BayanError::ResourceLimitExceeded {
            limit_name: "max_file_size_bytes".to_string(),
            limit_value: format!(
                "{} bytes ({} MB)",
                limits.max_file_size_bytes,
                limits.max_file_size_bytes / (1024 * 1024)
            ),
            actual_value: format!(
                "{} bytes ({:.2} MB)",
                content.len(),
                content.len() as f64 / (1024.0 * 1024.0)
            ),
            suggestion: "Reduce file size or split the program into multiple files".to_string(),
        });
    }

    let mut ctx = ParseContext::new(source_id, content, limits);
    let pairs = BayanParser::parse(Rule::program, content)
        .map_err(|e| pest_error(e, source_id, content))?;

    let mut parsed = Vec::new();
    for pair in pairs {
        if pair.as_rule() == Rule::program {
            for inner_pair in pair.into_inner() {
                if inner_pair.as_rule() != Rule::EOI {
                    parsed.push(statements::parse_statement(inner_pair, &mut ctx)?);
                }
            }
        }
    }

    Ok(Program {
        source_id: source_id.to_string(),
        statements: parsed,
    })
}

/// Parse a query given on its own, with or without a leading `query` keyword
pub fn parse_query(text: &str) -> Result<Vec<Goal>, BayanError> {
    let limits = ResourceLimits::default();
    let mut ctx = ParseContext::new("<query>", text, &limits);
    let pair = parse_entry(Rule::query_input, text, "<query>")?;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::kw_query => expect_keyword(&inner_pair, Keyword::Query)?,
            Rule::body => return goals::parse_body(inner_pair, &mut ctx, 0),
            _ => {}
        }
    }
    Err(BayanError::Engine(
        "Grammar error: query_input missing body".to_string(),
    ))
}

/// Parse a single term such as `[1, ?X, "text"]`
pub fn parse_term(text: &str) -> Result<Term, BayanError> {
    let limits = ResourceLimits::default();
    let mut ctx = ParseContext::new("<term>", text, &limits);
    let pair = parse_entry(Rule::term_input, text, "<term>")?;

    let term_pair = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::term)
        .ok_or_else(|| BayanError::Engine("Grammar error: term_input missing term".to_string()))?;
    terms::parse_term(term_pair, &mut ctx, 0)
}

/// Parse an arithmetic formula such as `(?X + 2) * 3`
pub fn parse_formula(text: &str) -> Result<ArithmeticExpression, BayanError> {
    let limits = ResourceLimits::default();
    let mut ctx = ParseContext::new("<formula>", text, &limits);
    let pair = parse_entry(Rule::formula, text, "<formula>")?;

    let arithmetic = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::arithmetic)
        .ok_or_else(|| BayanError::Engine("Grammar error: formula missing arithmetic".to_string()))?;
    terms::parse_arithmetic(arithmetic, &mut ctx, 0)
}

fn parse_entry<'i>(rule: Rule, text: &'i str, source_id: &str) -> Result<Pair<'i, Rule>, BayanError> {
    BayanParser::parse(rule, text)
        .map_err(|e| pest_error(e, source_id, text))?
        .next()
        .ok_or_else(|| BayanError::Engine(format!("No parse result for {:?}", rule)))
}

fn pest_error(e: pest::error::Error<Rule>, source_id: &str, content: &str) -> BayanError {
    let pest_span = match e.line_col {
        pest::error::LineColLocation::Pos((line, col)) => Span {
            start: 0,
            end: 0,
            line,
            col,
        },
        pest::error::LineColLocation::Span((start_line, start_col), (_, _)) => Span {
            start: 0,
            end: 0,
            line: start_line,
            col: start_col,
        },
    };
    let pest_span = match e.location {
        pest::error::InputLocation::Pos(pos) => Span {
            start: pos,
            end: pos,
            ..pest_span
        },
        pest::error::InputLocation::Span((start, end)) => Span {
            start,
            end,
            ..pest_span
        },
    };

    BayanError::parse(
        e.variant.message().to_string(),
        pest_span,
        source_id,
        Arc::from(content),
    )
}

/// Confirm that a keyword pair resolves to `expected` in the keyword table
///
/// A mismatch means the grammar and the table disagree, which is a bug in the
/// front end rather than in the program being parsed.
pub(crate) fn expect_keyword(pair: &Pair<Rule>, expected: Keyword) -> Result<(), BayanError> {
    match Keyword::lookup(pair.as_str()) {
        Some(found) if found == expected => Ok(()),
        found => Err(BayanError::Engine(format!(
            "Grammar error: '{}' matched as '{}' but the keyword table maps it to {:?}",
            pair.as_str(),
            expected,
            found
        ))),
    }
}

/// Resolve a keyword pair through the keyword table
pub(crate) fn keyword_of(pair: &Pair<Rule>) -> Result<Keyword, BayanError> {
    let text = pair.as_str();
    Keyword::lookup(text).ok_or_else(|| {
        BayanError::Engine(format!(
            "Grammar error: '{}' is not in the keyword table",
            text
        ))
    })
}
