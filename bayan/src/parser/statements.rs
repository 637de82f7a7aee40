use super::goals::{parse_body, parse_goal_form};
use super::terms::parse_predicate;
use super::{expect_keyword, ParseContext, Rule};
use crate::ast::Span;
use crate::error::BayanError;
use crate::keywords::Keyword;
use crate::semantic::*;
use pest::iterators::Pair;

pub(crate) fn parse_statement(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
) -> Result<Statement, BayanError> {
    match pair.as_rule() {
        Rule::fact_declaration => parse_fact_declaration(pair, ctx).map(Statement::Fact),
        Rule::rule_declaration => parse_rule_declaration(pair, ctx).map(Statement::Rule),
        Rule::query_declaration => parse_query_declaration(pair, ctx).map(Statement::Query),
        Rule::directive => parse_directive(pair, ctx).map(Statement::Directive),
        other => Err(BayanError::Engine(format!(
            "Grammar error: unexpected {:?} at statement level",
            other
        ))),
    }
}

fn parse_fact_declaration(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
) -> Result<FactDeclaration, BayanError> {
    let span = Span::from_pest_span(pair.as_span());
    let mut head = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::kw_fact => expect_keyword(&inner_pair, Keyword::Fact)?,
            Rule::predicate => head = Some(parse_predicate(inner_pair, ctx, 0)?),
            _ => {}
        }
    }

    let head = head.ok_or_else(|| {
        BayanError::Engine("Grammar error: fact_declaration missing predicate".to_string())
    })?;
    Ok(FactDeclaration {
        head,
        span: Some(span),
    })
}

fn parse_rule_declaration(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
) -> Result<RuleDeclaration, BayanError> {
    let span = Span::from_pest_span(pair.as_span());
    let mut head = None;
    let mut body = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::kw_rule => expect_keyword(&inner_pair, Keyword::Rule)?,
            Rule::kw_implies => expect_keyword(&inner_pair, Keyword::Implies)?,
            Rule::predicate => head = Some(parse_predicate(inner_pair, ctx, 0)?),
            Rule::body => body = Some(parse_body(inner_pair, ctx, 0)?),
            _ => {}
        }
    }

    let head = head.ok_or_else(|| {
        BayanError::Engine("Grammar error: rule_declaration missing head".to_string())
    })?;
    let body = body.ok_or_else(|| {
        BayanError::Engine("Grammar error: rule_declaration missing body".to_string())
    })?;
    Ok(RuleDeclaration {
        head,
        body,
        span: Some(span),
    })
}

fn parse_query_declaration(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
) -> Result<QueryExpression, BayanError> {
    let span = Span::from_pest_span(pair.as_span());
    let mut goals = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::kw_query => expect_keyword(&inner_pair, Keyword::Query)?,
            Rule::body => goals = Some(parse_body(inner_pair, ctx, 0)?),
            _ => {}
        }
    }

    let goals = goals.ok_or_else(|| {
        BayanError::Engine("Grammar error: query_declaration missing body".to_string())
    })?;
    Ok(QueryExpression {
        goals,
        span: Some(span),
    })
}

fn parse_directive(pair: Pair<Rule>, ctx: &mut ParseContext) -> Result<Directive, BayanError> {
    let span = Span::from_pest_span(pair.as_span());
    let inner = pair.into_inner().next().ok_or_else(|| {
        BayanError::Engine("Grammar error: empty directive".to_string())
    })?;
    let goal = parse_goal_form(inner, ctx, 0)?;
    Ok(Directive {
        goal,
        span: Some(span),
    })
}
