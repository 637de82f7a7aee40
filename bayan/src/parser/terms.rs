use super::{expect_keyword, ParseContext, Rule};
use crate::ast::Span;
use crate::error::BayanError;
use crate::keywords::Keyword;
use crate::semantic::*;
use pest::iterators::Pair;
use rust_decimal::Decimal;
use std::str::FromStr;

pub(crate) fn parse_term(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<Term, BayanError> {
    ctx.check_depth(depth + 1, &pair)?;
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| BayanError::Engine("Grammar error: empty term".to_string()))?;

    match inner.as_rule() {
        Rule::anonymous => Ok(Term::Variable(ctx.variables.next_anonymous())),
        Rule::variable => parse_variable(inner),
        Rule::number => parse_number_literal(&inner, ctx).map(Term::number),
        Rule::string => Ok(Term::text(unquote(inner.as_str()))),
        Rule::boolean => parse_boolean(inner),
        Rule::list => {
            let mut items = Vec::new();
            let mut tail = None;
            for item in inner.into_inner() {
                match item.as_rule() {
                    Rule::term => items.push(parse_term(item, ctx, depth + 1)?),
                    Rule::list_tail => {
                        let tail_term = item.into_inner().next().ok_or_else(|| {
                            BayanError::Engine("Grammar error: empty list tail".to_string())
                        })?;
                        tail = Some(parse_term(tail_term, ctx, depth + 1)?);
                    }
                    _ => {}
                }
            }
            Ok(match tail {
                Some(tail) => Term::cons(items, tail),
                None => Term::Sequence(items),
            })
        }
        Rule::atom => Ok(Term::atom(inner.as_str())),
        other => Err(BayanError::Engine(format!(
            "Grammar error: unexpected {:?} in term",
            other
        ))),
    }
}

fn parse_variable(pair: Pair<Rule>) -> Result<Term, BayanError> {
    let name = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::variable_name)
        .ok_or_else(|| {
            BayanError::Engine("Grammar error: variable missing variable_name".to_string())
        })?;
    Ok(Term::Variable(name.as_str().to_string()))
}

fn parse_boolean(pair: Pair<Rule>) -> Result<Term, BayanError> {
    let keyword_pair = pair
        .into_inner()
        .next()
        .ok_or_else(|| BayanError::Engine("Grammar error: empty boolean".to_string()))?;
    boolean_keyword(&keyword_pair).map(Term::from)
}

/// Decimal value of a number literal; Arabic-Indic digits are accepted
pub(crate) fn parse_number_literal(
    pair: &Pair<Rule>,
    ctx: &ParseContext,
) -> Result<Decimal, BayanError> {
    let text: String = pair
        .as_str()
        .chars()
        .map(|c| match c {
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            _ => c,
        })
        .collect();

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| {
            BayanError::parse_with_suggestion(
                format!("Number '{}' is out of range", pair.as_str()),
                Span::from_pest_span(pair.as_span()),
                ctx.source_id,
                ctx.source_text.clone(),
                "Numbers must fit in 96 bits with at most 28 decimal places",
            )
        })
}

/// Strip the quotes of a string literal and process escapes
fn unquote(literal: &str) -> String {
    let mut chars = literal.chars();
    let open = chars.next();
    chars.next_back();
    let content = chars.as_str();

    if open == Some('«') {
        return content.to_string();
    }

    chars_with_escapes(content).collect()
}

fn chars_with_escapes(content: &str) -> impl Iterator<Item = char> + '_ {
    let mut chars = content.chars();
    std::iter::from_fn(move || {
        let c = chars.next()?;
        if c != '\\' {
            return Some(c);
        }
        Some(match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some(other) => other,
            None => '\\',
        })
    })
}

pub(crate) fn parse_predicate(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<Predicate, BayanError> {
    let mut name = None;
    let mut arguments = Vec::new();

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::name => name = Some(inner_pair.as_str().to_string()),
            Rule::term => arguments.push(parse_term(inner_pair, ctx, depth)?),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| {
        BayanError::Engine("Grammar error: predicate missing name".to_string())
    })?;
    Ok(Predicate::new(name, arguments))
}

pub(crate) fn parse_arithmetic(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<ArithmeticExpression, BayanError> {
    ctx.check_depth(depth + 1, &pair)?;
    let mut result: Option<ArithmeticExpression> = None;
    let mut pending_operation = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::arithmetic_product => {
                let operand = parse_product(inner_pair, ctx, depth)?;
                result = Some(combine(result, pending_operation.take(), operand)?);
            }
            Rule::additive_operator => {
                pending_operation = Some(match inner_pair.as_str() {
                    "+" => ArithmeticOperation::Add,
                    _ => ArithmeticOperation::Subtract,
                });
            }
            _ => {}
        }
    }

    result.ok_or_else(|| BayanError::Engine("Grammar error: empty arithmetic".to_string()))
}

fn parse_product(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<ArithmeticExpression, BayanError> {
    let mut result: Option<ArithmeticExpression> = None;
    let mut pending_operation = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::arithmetic_unary => {
                let operand = parse_unary(inner_pair, ctx, depth)?;
                result = Some(combine(result, pending_operation.take(), operand)?);
            }
            Rule::multiplicative_operator => {
                pending_operation = Some(match inner_pair.as_str() {
                    "*" | "×" => ArithmeticOperation::Multiply,
                    "/" | "÷" => ArithmeticOperation::Divide,
                    _ => ArithmeticOperation::Modulo,
                });
            }
            _ => {}
        }
    }

    result.ok_or_else(|| {
        BayanError::Engine("Grammar error: empty arithmetic_product".to_string())
    })
}

fn combine(
    left: Option<ArithmeticExpression>,
    operation: Option<ArithmeticOperation>,
    right: ArithmeticExpression,
) -> Result<ArithmeticExpression, BayanError> {
    match (left, operation) {
        (None, None) => Ok(right),
        (Some(left), Some(operation)) => Ok(ArithmeticExpression::binary(left, operation, right)),
        _ => Err(BayanError::Engine(
            "Grammar error: operator and operand out of order".to_string(),
        )),
    }
}

fn parse_unary(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<ArithmeticExpression, BayanError> {
    let mut negations = 0;
    let mut operand = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::negate => negations += 1,
            Rule::arithmetic_primary => operand = Some(parse_primary(inner_pair, ctx, depth)?),
            _ => {}
        }
    }

    let mut expression = operand.ok_or_else(|| {
        BayanError::Engine("Grammar error: arithmetic_unary missing operand".to_string())
    })?;
    for _ in 0..negations {
        expression = ArithmeticExpression::Negate(Box::new(expression));
    }
    Ok(expression)
}

fn parse_primary(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<ArithmeticExpression, BayanError> {
    let inner = pair.into_inner().next().ok_or_else(|| {
        BayanError::Engine("Grammar error: empty arithmetic_primary".to_string())
    })?;

    match inner.as_rule() {
        Rule::number => Ok(ArithmeticExpression::Term(Term::number(
            parse_number_literal(&inner, ctx)?,
        ))),
        Rule::variable => Ok(ArithmeticExpression::Term(parse_variable(inner)?)),
        Rule::string => Ok(ArithmeticExpression::Term(Term::text(unquote(
            inner.as_str(),
        )))),
        Rule::arithmetic => parse_arithmetic(inner, ctx, depth + 1),
        other => Err(BayanError::Engine(format!(
            "Grammar error: unexpected {:?} in arithmetic",
            other
        ))),
    }
}

fn boolean_keyword(pair: &Pair<Rule>) -> Result<bool, BayanError> {
    match pair.as_rule() {
        Rule::kw_true => expect_keyword(pair, Keyword::True).map(|_| true),
        Rule::kw_false => expect_keyword(pair, Keyword::False).map(|_| false),
        other => Err(BayanError::Engine(format!(
            "Grammar error: expected a boolean keyword, found {:?}",
            other
        ))),
    }
}
