use super::solve;
use crate::{Engine, Term};

fn numbers(values: &[i64]) -> Term {
    Term::list(values.iter().map(|&n| Term::number(n)).collect())
}

#[test]
fn test_member_enumerates_in_order() {
    let engine = Engine::new();
    let found: Vec<Term> = solve(&engine, "member(?X, [3, 1, 2])")
        .iter()
        .map(|s| s.get("X").cloned().unwrap())
        .collect();
    assert_eq!(found, vec![Term::number(3), Term::number(1), Term::number(2)]);
}

#[test]
fn test_member_checks_membership() {
    let engine = Engine::new();
    assert_eq!(solve(&engine, "member(2, [1, 2, 3])").len(), 1);
    assert!(solve(&engine, "member(4, [1, 2, 3])").is_empty());
    assert!(solve(&engine, "member(1, not_a_list)").is_empty());
    assert_eq!(solve(&engine, "عضو(2, [1, 2, 3])").len(), 1);
}

#[test]
fn test_append_concatenates() {
    let engine = Engine::new();
    let solutions = solve(&engine, "append([1, 2], [3], ?X)");
    assert_eq!(solutions[0].get("X"), Some(&numbers(&[1, 2, 3])));
}

#[test]
fn test_append_enumerates_splits() {
    let engine = Engine::new();
    let splits: Vec<(Term, Term)> = solve(&engine, "append(?A, ?B, [1, 2])")
        .iter()
        .map(|s| (s.get("A").cloned().unwrap(), s.get("B").cloned().unwrap()))
        .collect();
    assert_eq!(
        splits,
        vec![
            (numbers(&[]), numbers(&[1, 2])),
            (numbers(&[1]), numbers(&[2])),
            (numbers(&[1, 2]), numbers(&[])),
        ]
    );
}

#[test]
fn test_append_solves_for_missing_part() {
    let engine = Engine::new();
    let solutions = solve(&engine, "ألحق([1], ?Rest, [1, 2, 3])");
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].get("Rest"), Some(&numbers(&[2, 3])));
}

#[test]
fn test_length_measures() {
    let engine = Engine::new();
    let solutions = solve(&engine, "length([a, b, c], ?N)");
    assert_eq!(solutions[0].get("N"), Some(&Term::number(3)));
    assert_eq!(solve(&engine, "طول([], 0)").len(), 1);
    assert!(solve(&engine, "length([a], 2)").is_empty());
}

#[test]
fn test_length_builds_fresh_list() {
    let engine = Engine::new();
    let solutions = solve(&engine, "length(?L, 2), ?L = [x, ?Second], ?Second = y");
    assert_eq!(
        solutions[0].get("L"),
        Some(&Term::list(vec![Term::atom("x"), Term::atom("y")]))
    );
    assert!(solve(&engine, "length(?L, -1)").is_empty());
}

#[test]
fn test_unify_builtin_and_operator() {
    let engine = Engine::new();
    assert_eq!(solve(&engine, "unify(?X, 5), ?X == 5").len(), 1);
    assert_eq!(solve(&engine, "يوحد([?A, 2], [1, ?B])").len(), 1);
    assert_eq!(solve(&engine, "?X = [1, 2]").len(), 1);
    assert!(solve(&engine, "unify(1, 2)").is_empty());
}

#[test]
fn test_true_and_false_goals() {
    let engine = Engine::new();
    assert_eq!(solve(&engine, "true").len(), 1);
    assert_eq!(solve(&engine, "صحيح").len(), 1);
    assert!(solve(&engine, "false").is_empty());
    assert!(solve(&engine, "true, خطأ").is_empty());
}

#[test]
fn test_builtins_backtrack_inside_rules() {
    let mut engine = Engine::new();
    engine
        .load(
            r#"
            rule pair_sum(?L, ?S) :- member(?A, ?L), member(?B, ?L), ?A < ?B, ?S is ?A + ?B;
        "#,
            "sums.bayan",
        )
        .unwrap();
    let sums: Vec<Term> = solve(&engine, "pair_sum([1, 2, 3], ?S)")
        .iter()
        .map(|s| s.get("S").cloned().unwrap())
        .collect();
    assert_eq!(sums, vec![Term::number(3), Term::number(4), Term::number(5)]);
}
