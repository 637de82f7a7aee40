use crate::{unify, Substitution, Term};

#[test]
fn test_variable_binds_to_constant() {
    let sub = unify(&Term::var("X"), &Term::atom("ali"), &Substitution::new()).unwrap();
    assert_eq!(sub.resolve(&Term::var("X")), Term::atom("ali"));
}

#[test]
fn test_same_variable_unifies_without_binding() {
    let sub = unify(&Term::var("X"), &Term::var("X"), &Substitution::new()).unwrap();
    assert!(sub.is_empty());
}

#[test]
fn test_distinct_constants_fail() {
    assert!(unify(&Term::atom("a"), &Term::atom("b"), &Substitution::new()).is_none());
    assert!(unify(&Term::number(1), &Term::number(2), &Substitution::new()).is_none());
    assert!(unify(&Term::from(true), &Term::atom("true"), &Substitution::new()).is_none());
}

#[test]
fn test_numeric_text_equals_number() {
    assert!(unify(&Term::text("5"), &Term::number(5), &Substitution::new()).is_some());
    assert!(unify(&Term::text(" 5.0 "), &Term::number(5), &Substitution::new()).is_some());
    assert!(unify(&Term::text("five"), &Term::number(5), &Substitution::new()).is_none());
}

#[test]
fn test_text_and_atom_compare_by_characters() {
    assert!(unify(&Term::text("ali"), &Term::atom("ali"), &Substitution::new()).is_some());
}

#[test]
fn test_bound_variable_uses_its_value() {
    let sub = Substitution::new().bind("X", Term::number(3));
    assert!(unify(&Term::var("X"), &Term::number(3), &sub).is_some());
    assert!(unify(&Term::var("X"), &Term::number(4), &sub).is_none());
}

#[test]
fn test_variable_chains_resolve() {
    let sub = unify(&Term::var("X"), &Term::var("Y"), &Substitution::new()).unwrap();
    let sub = unify(&Term::var("Y"), &Term::text("end"), &sub).unwrap();
    assert_eq!(sub.resolve(&Term::var("X")), Term::text("end"));
}

#[test]
fn test_sequences_unify_elementwise() {
    let left = Term::list(vec![Term::var("A"), Term::number(2), Term::var("C")]);
    let right = Term::list(vec![Term::number(1), Term::var("B"), Term::number(3)]);
    let sub = unify(&left, &right, &Substitution::new()).unwrap();

    assert_eq!(sub.resolve(&Term::var("A")), Term::number(1));
    assert_eq!(sub.resolve(&Term::var("B")), Term::number(2));
    assert_eq!(sub.resolve(&Term::var("C")), Term::number(3));
}

#[test]
fn test_sequences_of_different_length_fail() {
    let short = Term::list(vec![Term::number(1)]);
    let long = Term::list(vec![Term::number(1), Term::number(2)]);
    assert!(unify(&short, &long, &Substitution::new()).is_none());
}

#[test]
fn test_constant_never_unifies_with_sequence() {
    let list = Term::list(vec![Term::number(1)]);
    assert!(unify(&Term::number(1), &list, &Substitution::new()).is_none());
}

#[test]
fn test_cyclic_binding_resolves_without_looping() {
    // No occurs check: X = [1, X] succeeds
    let cyclic = Term::list(vec![Term::number(1), Term::var("X")]);
    let sub = unify(&Term::var("X"), &cyclic, &Substitution::new()).unwrap();
    assert_eq!(
        sub.resolve(&Term::var("X")),
        Term::list(vec![Term::number(1), Term::var("X")])
    );
}

#[test]
fn test_failed_unification_leaves_input_untouched() {
    let sub = Substitution::new().bind("X", Term::number(1));
    let left = Term::list(vec![Term::var("Y"), Term::var("X")]);
    let right = Term::list(vec![Term::number(9), Term::number(2)]);
    assert!(unify(&left, &right, &sub).is_none());
    assert_eq!(sub.len(), 1);
    assert!(sub.get("Y").is_none());
}

#[test]
fn test_list_pattern_splits_head_and_tail() {
    let pattern = Term::cons(vec![Term::var("H")], Term::var("T"));
    let list = Term::list(vec![Term::number(1), Term::number(2), Term::number(3)]);
    let sub = unify(&pattern, &list, &Substitution::new()).unwrap();

    assert_eq!(sub.resolve(&Term::var("H")), Term::number(1));
    assert_eq!(
        sub.resolve(&Term::var("T")),
        Term::list(vec![Term::number(2), Term::number(3)])
    );
    assert_eq!(sub.resolve(&pattern), list);
}

#[test]
fn test_list_pattern_needs_enough_items() {
    let pattern = Term::cons(vec![Term::number(1), Term::var("X")], Term::var("T"));
    assert!(unify(&pattern, &Term::list(vec![Term::number(1)]), &Substitution::new()).is_none());

    let exact = unify(
        &pattern,
        &Term::list(vec![Term::number(1), Term::number(2)]),
        &Substitution::new(),
    )
    .unwrap();
    assert_eq!(exact.resolve(&Term::var("T")), Term::list(vec![]));
}

#[test]
fn test_list_patterns_unify_with_each_other() {
    let left = Term::cons(vec![Term::number(1)], Term::var("A"));
    let right = Term::cons(vec![Term::var("B"), Term::number(2)], Term::var("C"));
    let sub = unify(&left, &right, &Substitution::new()).unwrap();

    assert_eq!(sub.resolve(&Term::var("B")), Term::number(1));
    assert_eq!(
        sub.resolve(&Term::var("A")),
        Term::cons(vec![Term::number(2)], Term::var("C"))
    );
    assert_eq!(sub.resolve(&left), sub.resolve(&right));
}

#[test]
fn test_shared_variables_across_sides() {
    let left = Term::list(vec![Term::var("X"), Term::var("Y")]);
    let right = Term::list(vec![Term::var("Y"), Term::number(1)]);
    let sub = unify(&left, &right, &Substitution::new()).unwrap();

    let expected = Term::list(vec![Term::number(1), Term::number(1)]);
    assert_eq!(sub.resolve(&left), expected);
    assert_eq!(sub.resolve(&right), expected);
}

#[test]
fn test_numeric_texts_equal_each_other() {
    assert!(unify(&Term::text("5"), &Term::text("5.0"), &Substitution::new()).is_some());
    assert!(unify(&Term::text("1e2"), &Term::text("100"), &Substitution::new()).is_some());
    assert!(unify(&Term::text("5"), &Term::text("five"), &Substitution::new()).is_none());
}
