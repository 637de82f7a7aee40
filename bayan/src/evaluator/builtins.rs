//! Sequence predicates: `member/2`, `append/3` and `length/2`
//!
//! Each builtin returns every substitution it can produce, in order. The
//! solver turns more than one result into a choice point. Lists whose tail is
//! still unbound (`[a | ?T]`) are not enumerated: the builtins need the whole
//! list, except where unification alone can match it.

use super::budget::InferenceBudget;
use super::substitution::Substitution;
use super::unify::unify;
use crate::semantic::Term;
use crate::BayanError;
use rust_decimal::prelude::ToPrimitive;

/// Items of a fully known list, following bound tails
fn list_items(term: &Term, sub: &Substitution) -> Option<Vec<Term>> {
    match sub.walk(term) {
        Term::Sequence(items) => Some(items.clone()),
        Term::Cons(items, tail) => {
            let mut all = items.clone();
            all.extend(list_items(tail, sub)?);
            Some(all)
        }
        _ => None,
    }
}

/// `member(Element, List)`: one result per list item that unifies with `Element`
pub fn member(element: &Term, list: &Term, sub: &Substitution) -> Vec<Substitution> {
    match list_items(list, sub) {
        Some(items) => items
            .iter()
            .filter_map(|item| unify(element, item, sub))
            .collect(),
        None => Vec::new(),
    }
}

/// `append(Front, Back, Whole)`
///
/// Concatenates when both `Front` and `Back` are lists. Otherwise, when
/// `Whole` is a list, enumerates its splits from shortest front to longest.
pub fn append(
    front: &Term,
    back: &Term,
    whole: &Term,
    sub: &Substitution,
    budget: &InferenceBudget,
) -> Result<Vec<Substitution>, BayanError> {
    if let (Some(a), Some(b)) = (list_items(front, sub), list_items(back, sub)) {
        budget.check_list_length(a.len().saturating_add(b.len()))?;
        let joined = Term::Sequence(a.into_iter().chain(b).collect());
        return Ok(unify(whole, &joined, sub).into_iter().collect());
    }

    let Some(items) = list_items(whole, sub) else {
        return Ok(Vec::new());
    };
    Ok((0..=items.len())
        .filter_map(|split| {
            let sub = unify(front, &Term::Sequence(items[..split].to_vec()), sub)?;
            unify(back, &Term::Sequence(items[split..].to_vec()), &sub)
        })
        .collect())
}

/// `length(List, N)`
///
/// Measures a list, or builds a list of `N` fresh variables when `List` is
/// unbound and `N` is a non-negative integer. A requested length over the
/// budget's list limit is an error, raised before anything is allocated.
pub fn length(
    list: &Term,
    count: &Term,
    sub: &Substitution,
    fresh: u64,
    budget: &InferenceBudget,
) -> Result<Vec<Substitution>, BayanError> {
    if let Some(items) = list_items(list, sub) {
        return Ok(unify(count, &Term::number(items.len() as i64), sub)
            .into_iter()
            .collect());
    }
    if !sub.walk(list).is_variable() {
        return Ok(Vec::new());
    }

    let size = match sub.walk(count) {
        Term::Constant(value) => value
            .as_number()
            .filter(|n| n.fract().is_zero() && !n.is_sign_negative()),
        _ => None,
    };
    let Some(size) = size else {
        return Ok(Vec::new());
    };
    let size = size.to_usize().unwrap_or(usize::MAX);
    budget.check_list_length(size)?;

    let items = (0..size)
        .map(|i| Term::Variable(format!("_L{}#{}", i, fresh)))
        .collect();
    Ok(unify(list, &Term::Sequence(items), sub).into_iter().collect())
}

/// Drop later duplicates under loose value equality, keeping first occurrences in order
pub fn deduplicate(items: Vec<Term>) -> Vec<Term> {
    let mut unique: Vec<Term> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.iter().any(|seen| seen.loosely_equals(&item)) {
            unique.push(item);
        }
    }
    unique
}
