use super::terms::{parse_arithmetic, parse_predicate, parse_term};
use super::{expect_keyword, keyword_of, ParseContext, Rule};
use crate::error::BayanError;
use crate::keywords::Keyword;
use crate::semantic::*;
use pest::iterators::Pair;

/// Parse a conjunction of goals
pub(crate) fn parse_body(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<Vec<Goal>, BayanError> {
    ctx.check_depth(depth + 1, &pair)?;
    let mut goals = Vec::new();

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::goal => goals.push(parse_goal(inner_pair, ctx, depth)?),
            Rule::kw_and => expect_keyword(&inner_pair, Keyword::And)?,
            _ => {}
        }
    }

    if goals.is_empty() {
        return Err(BayanError::Engine(
            "Grammar error: body without goals".to_string(),
        ));
    }
    Ok(goals)
}

pub(crate) fn parse_goal(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<Goal, BayanError> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| BayanError::Engine("Grammar error: empty goal".to_string()))?;
    parse_goal_form(inner, ctx, depth)
}

/// Parse one of the alternatives of the `goal` rule
pub(crate) fn parse_goal_form(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<Goal, BayanError> {
    match pair.as_rule() {
        Rule::cut => {
            for inner_pair in pair.into_inner() {
                expect_keyword(&inner_pair, Keyword::Cut)?;
            }
            Ok(Goal::Cut)
        }
        Rule::negation => parse_negation(pair, ctx, depth),
        Rule::collect => parse_collect(pair, ctx, depth),
        Rule::assert_goal => {
            let (head, body) = parse_clause_target(pair, Keyword::Assert, ctx, depth)?;
            Ok(Goal::Assert(AssertExpression { head, body }))
        }
        Rule::retract_goal => {
            let (head, body) = parse_clause_target(pair, Keyword::Retract, ctx, depth)?;
            Ok(Goal::Retract(RetractExpression { head, body }))
        }
        Rule::unify_call | Rule::unify_goal => {
            let mut terms = Vec::with_capacity(2);
            for inner_pair in pair.into_inner() {
                match inner_pair.as_rule() {
                    Rule::kw_unify => expect_keyword(&inner_pair, Keyword::Unify)?,
                    Rule::term => terms.push(parse_term(inner_pair, ctx, depth)?),
                    _ => {}
                }
            }
            let right = terms.pop();
            let left = terms.pop();
            match (left, right) {
                (Some(left), Some(right)) => Ok(Goal::Unify(left, right)),
                _ => Err(BayanError::Engine(
                    "Grammar error: unification needs two terms".to_string(),
                )),
            }
        }
        Rule::is_goal => {
            let mut result = None;
            let mut expression = None;
            for inner_pair in pair.into_inner() {
                match inner_pair.as_rule() {
                    Rule::term => result = Some(parse_term(inner_pair, ctx, depth)?),
                    Rule::kw_is => expect_keyword(&inner_pair, Keyword::Is)?,
                    Rule::arithmetic => {
                        expression = Some(parse_arithmetic(inner_pair, ctx, depth)?)
                    }
                    _ => {}
                }
            }
            let result = result.ok_or_else(|| {
                BayanError::Engine("Grammar error: is_goal missing term".to_string())
            })?;
            let expression = expression.ok_or_else(|| {
                BayanError::Engine("Grammar error: is_goal missing arithmetic".to_string())
            })?;
            Ok(Goal::Is(IsExpression { result, expression }))
        }
        Rule::comparison => parse_comparison(pair, ctx, depth),
        Rule::true_goal | Rule::false_goal => {
            let keyword_pair = pair.into_inner().next().ok_or_else(|| {
                BayanError::Engine("Grammar error: empty boolean goal".to_string())
            })?;
            match keyword_of(&keyword_pair)? {
                Keyword::True | Keyword::False => {
                    Ok(Goal::Call(Predicate::new(keyword_pair.as_str(), Vec::new())))
                }
                other => Err(BayanError::Engine(format!(
                    "Grammar error: '{}' matched as a boolean goal but is the keyword '{}'",
                    keyword_pair.as_str(),
                    other
                ))),
            }
        }
        Rule::call => {
            let predicate_pair = pair.into_inner().next().ok_or_else(|| {
                BayanError::Engine("Grammar error: call missing predicate".to_string())
            })?;
            Ok(Goal::Call(parse_predicate(predicate_pair, ctx, depth)?))
        }
        other => Err(BayanError::Engine(format!(
            "Grammar error: unexpected {:?} in goal",
            other
        ))),
    }
}

/// Goals of a `nested` group or of a single `goal`
fn parse_scoped_goals(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<Vec<Goal>, BayanError> {
    match pair.as_rule() {
        Rule::nested => {
            let body = pair.into_inner().next().ok_or_else(|| {
                BayanError::Engine("Grammar error: nested missing body".to_string())
            })?;
            parse_body(body, ctx, depth + 1)
        }
        _ => {
            ctx.check_depth(depth + 1, &pair)?;
            Ok(vec![parse_goal(pair, ctx, depth + 1)?])
        }
    }
}

fn parse_negation(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<Goal, BayanError> {
    let mut goals = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::kw_not => expect_keyword(&inner_pair, Keyword::Not)?,
            Rule::kw_query => expect_keyword(&inner_pair, Keyword::Query)?,
            Rule::nested | Rule::goal => goals = Some(parse_scoped_goals(inner_pair, ctx, depth)?),
            _ => {}
        }
    }

    let goals = goals.ok_or_else(|| {
        BayanError::Engine("Grammar error: negation missing goal".to_string())
    })?;
    Ok(Goal::Not(NegationExpression { goals }))
}

fn parse_collect(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<Goal, BayanError> {
    let mut keyword = None;
    let mut terms = Vec::with_capacity(2);
    let mut goals = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::kw_findall | Rule::kw_bagof | Rule::kw_setof => {
                keyword = Some(keyword_of(&inner_pair)?)
            }
            Rule::kw_query => expect_keyword(&inner_pair, Keyword::Query)?,
            Rule::term => terms.push(parse_term(inner_pair, ctx, depth)?),
            Rule::nested | Rule::goal => goals = Some(parse_scoped_goals(inner_pair, ctx, depth)?),
            _ => {}
        }
    }

    let goals = goals.ok_or_else(|| {
        BayanError::Engine("Grammar error: collect missing goal".to_string())
    })?;
    let result = terms.pop();
    let template = terms.pop();
    let (Some(template), Some(result)) = (template, result) else {
        return Err(BayanError::Engine(
            "Grammar error: collect needs a template and a result".to_string(),
        ));
    };
    let collect = CollectExpression {
        template,
        goals,
        result,
    };

    match keyword {
        Some(Keyword::FindAll) => Ok(Goal::FindAll(collect)),
        Some(Keyword::BagOf) => Ok(Goal::BagOf(collect)),
        Some(Keyword::SetOf) => Ok(Goal::SetOf(collect)),
        other => Err(BayanError::Engine(format!(
            "Grammar error: collect keyword resolved to {:?}",
            other
        ))),
    }
}

/// `kw predicate` or `kw (predicate :- body)` for assert and retract
fn parse_clause_target(
    pair: Pair<Rule>,
    keyword: Keyword,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<(Predicate, Vec<Goal>), BayanError> {
    let mut head = None;
    let mut body = Vec::new();

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::kw_assert | Rule::kw_retract => expect_keyword(&inner_pair, keyword)?,
            Rule::predicate => head = Some(parse_predicate(inner_pair, ctx, depth)?),
            Rule::clause_form => {
                for clause_pair in inner_pair.into_inner() {
                    match clause_pair.as_rule() {
                        Rule::predicate => {
                            head = Some(parse_predicate(clause_pair, ctx, depth)?)
                        }
                        Rule::kw_implies => expect_keyword(&clause_pair, Keyword::Implies)?,
                        Rule::body => body = parse_body(clause_pair, ctx, depth + 1)?,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    let head = head.ok_or_else(|| {
        BayanError::Engine(format!("Grammar error: {} missing predicate", keyword))
    })?;
    Ok((head, body))
}

fn parse_comparison(
    pair: Pair<Rule>,
    ctx: &mut ParseContext,
    depth: usize,
) -> Result<Goal, BayanError> {
    let mut operands = Vec::with_capacity(2);
    let mut operator = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::arithmetic => operands.push(parse_arithmetic(inner_pair, ctx, depth)?),
            Rule::comparison_operator => {
                operator = Some(match inner_pair.as_str() {
                    ">" => ComparisonOperator::GreaterThan,
                    "<" => ComparisonOperator::LessThan,
                    ">=" | "≥" => ComparisonOperator::GreaterThanOrEqual,
                    "<=" | "≤" => ComparisonOperator::LessThanOrEqual,
                    "==" => ComparisonOperator::Equal,
                    _ => ComparisonOperator::NotEqual,
                })
            }
            _ => {}
        }
    }

    let operator = operator.ok_or_else(|| {
        BayanError::Engine("Grammar error: comparison missing operator".to_string())
    })?;
    let right = operands.pop();
    let left = operands.pop();
    let (Some(left), Some(right)) = (left, right) else {
        return Err(BayanError::Engine(
            "Grammar error: comparison needs two operands".to_string(),
        ));
    };
    Ok(Goal::Compare(ComparisonExpression {
        left,
        operator,
        right,
    }))
}
