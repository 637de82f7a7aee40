//! Arithmetic evaluation and numeric comparison
//!
//! All arithmetic is exact decimal arithmetic. Operands coerce from text when
//! the text parses as a number; text that is not a number is parsed as a
//! formula. Anything that cannot be evaluated (unbound variables, malformed
//! formulas, division by zero, overflow) makes the goal fail.

use super::substitution::Substitution;
use super::unify::unify;
use crate::semantic::{
    ArithmeticExpression, ArithmeticOperation, ComparisonOperator, Term, Value,
};
use rust_decimal::Decimal;

/// Formula text may name variables bound to further formula text; this bounds the nesting
const MAX_FORMULA_NESTING: usize = 16;

/// Evaluate `expression` to a number under `sub`
pub fn evaluate(expression: &ArithmeticExpression, sub: &Substitution) -> Option<Decimal> {
    evaluate_nested(expression, sub, 0)
}

fn evaluate_nested(
    expression: &ArithmeticExpression,
    sub: &Substitution,
    nesting: usize,
) -> Option<Decimal> {
    match expression {
        ArithmeticExpression::Term(term) => evaluate_term(term, sub, nesting),
        ArithmeticExpression::Negate(inner) => {
            evaluate_nested(inner, sub, nesting).map(|value| -value)
        }
        ArithmeticExpression::Binary(left, operation, right) => {
            let left = evaluate_nested(left, sub, nesting)?;
            let right = evaluate_nested(right, sub, nesting)?;
            apply(left, *operation, right)
        }
    }
}

fn evaluate_term(term: &Term, sub: &Substitution, nesting: usize) -> Option<Decimal> {
    match sub.walk(term) {
        Term::Constant(value @ Value::Text(text)) => value.as_number().or_else(|| {
            if nesting >= MAX_FORMULA_NESTING {
                return None;
            }
            let formula = ArithmeticExpression::parse(text).ok()?;
            evaluate_nested(&formula, sub, nesting + 1)
        }),
        Term::Constant(value) => value.as_number(),
        _ => None,
    }
}

pub fn apply(left: Decimal, operation: ArithmeticOperation, right: Decimal) -> Option<Decimal> {
    match operation {
        ArithmeticOperation::Add => left.checked_add(right),
        ArithmeticOperation::Subtract => left.checked_sub(right),
        ArithmeticOperation::Multiply => left.checked_mul(right),
        ArithmeticOperation::Divide => left.checked_div(right),
        ArithmeticOperation::Modulo => left.checked_rem(right),
    }
}

/// `result is expression`: evaluate and unify `result` with the number
pub fn evaluate_arithmetic(
    result: &Term,
    expression: &ArithmeticExpression,
    sub: &Substitution,
) -> Option<Substitution> {
    let value = evaluate(expression, sub)?;
    unify(result, &Term::number(value.normalize()), sub)
}

/// Compare two expressions numerically; fails on anything non-numeric
pub fn compare(
    left: &ArithmeticExpression,
    operator: ComparisonOperator,
    right: &ArithmeticExpression,
    sub: &Substitution,
) -> bool {
    let (Some(left), Some(right)) = (evaluate(left, sub), evaluate(right, sub)) else {
        return false;
    };
    match operator {
        ComparisonOperator::GreaterThan => left > right,
        ComparisonOperator::LessThan => left < right,
        ComparisonOperator::GreaterThanOrEqual => left >= right,
        ComparisonOperator::LessThanOrEqual => left <= right,
        ComparisonOperator::Equal => left == right,
        ComparisonOperator::NotEqual => left != right,
    }
}

fn compare_terms(left: &Term, operator: ComparisonOperator, right: &Term) -> bool {
    compare(
        &ArithmeticExpression::Term(left.clone()),
        operator,
        &ArithmeticExpression::Term(right.clone()),
        &Substitution::new(),
    )
}

pub fn greater_than(left: &Term, right: &Term) -> bool {
    compare_terms(left, ComparisonOperator::GreaterThan, right)
}

pub fn less_than(left: &Term, right: &Term) -> bool {
    compare_terms(left, ComparisonOperator::LessThan, right)
}

pub fn greater_than_or_equal(left: &Term, right: &Term) -> bool {
    compare_terms(left, ComparisonOperator::GreaterThanOrEqual, right)
}

pub fn less_than_or_equal(left: &Term, right: &Term) -> bool {
    compare_terms(left, ComparisonOperator::LessThanOrEqual, right)
}

pub fn arithmetic_equal(left: &Term, right: &Term) -> bool {
    compare_terms(left, ComparisonOperator::Equal, right)
}

pub fn arithmetic_not_equal(left: &Term, right: &Term) -> bool {
    compare_terms(left, ComparisonOperator::NotEqual, right)
}
