use super::substitution::Substitution;
use crate::semantic::{Predicate, Term};

/// Unify two terms under `sub`, returning the extended substitution on success
///
/// There is no occurs check.
pub fn unify(left: &Term, right: &Term, sub: &Substitution) -> Option<Substitution> {
    let left = sub.walk(left);
    let right = sub.walk(right);

    match (left, right) {
        (Term::Variable(a), Term::Variable(b)) if a == b => Some(sub.clone()),
        (Term::Variable(name), other) | (other, Term::Variable(name)) => {
            Some(sub.bind(name, other.clone()))
        }
        (Term::Constant(a), Term::Constant(b)) => a.loosely_equals(b).then(|| sub.clone()),
        (Term::Sequence(a), Term::Sequence(b)) => unify_sequences(a, b, sub),
        (Term::Cons(items, tail), Term::Sequence(list))
        | (Term::Sequence(list), Term::Cons(items, tail)) => {
            if list.len() < items.len() {
                return None;
            }
            let (front, back) = list.split_at(items.len());
            let sub = unify_sequences(items, front, sub)?;
            unify(tail, &Term::Sequence(back.to_vec()), &sub)
        }
        (Term::Cons(a, a_tail), Term::Cons(b, b_tail)) => {
            let shared = a.len().min(b.len());
            let sub = unify_sequences(&a[..shared], &b[..shared], sub)?;
            let left = Term::cons(a[shared..].to_vec(), (**a_tail).clone());
            let right = Term::cons(b[shared..].to_vec(), (**b_tail).clone());
            unify(&left, &right, &sub)
        }
        _ => None,
    }
}

/// Element-wise unification of two equally long term lists
pub fn unify_sequences(left: &[Term], right: &[Term], sub: &Substitution) -> Option<Substitution> {
    if left.len() != right.len() {
        return None;
    }
    let mut current = sub.clone();
    for (a, b) in left.iter().zip(right) {
        current = unify(a, b, &current)?;
    }
    Some(current)
}

pub fn unify_predicates(
    left: &Predicate,
    right: &Predicate,
    sub: &Substitution,
) -> Option<Substitution> {
    if left.name != right.name {
        return None;
    }
    unify_sequences(&left.arguments, &right.arguments, sub)
}
