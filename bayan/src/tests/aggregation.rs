use super::{engine_with, solve};
use crate::{Goal, Term};

const SCORES: &str = r#"
    fact score(ali, 10);
    fact score(sara, 20);
    fact score(omar, 10);
    fact score(zain, "20");
"#;

fn list_of(solution: &crate::Solution, variable: &str) -> Vec<Term> {
    match solution.get(variable) {
        Some(Term::Sequence(items)) => items.clone(),
        other => panic!("{} is not a list: {:?}", variable, other),
    }
}

#[test]
fn test_findall_keeps_order_and_duplicates() {
    let engine = engine_with(SCORES);
    let solutions = solve(&engine, "findall(?S, score(?_, ?S), ?L)");
    assert_eq!(solutions.len(), 1);
    assert_eq!(
        list_of(&solutions[0], "L"),
        vec![Term::number(10), Term::number(20), Term::number(10), Term::text("20")]
    );
}

#[test]
fn test_bagof_matches_findall() {
    let engine = engine_with(SCORES);
    let findall = solve(&engine, "findAll(?S, score(?_, ?S), ?L)");
    let bagof = solve(&engine, "bagOf(?S, score(?_, ?S), ?L)");
    assert_eq!(findall, bagof);
}

#[test]
fn test_setof_keeps_first_occurrences() {
    let engine = engine_with(SCORES);
    let solutions = solve(&engine, "setof(?S, score(?_, ?S), ?L)");
    // "20" equals 20 under loose equality, so it is dropped
    assert_eq!(
        list_of(&solutions[0], "L"),
        vec![Term::number(10), Term::number(20)]
    );
}

#[test]
fn test_empty_aggregation_binds_empty_list() {
    let engine = engine_with(SCORES);
    for keyword in ["findall", "bagof", "setof"] {
        let query = format!("{}(?S, score(nobody, ?S), ?L)", keyword);
        let solutions = solve(&engine, &query);
        assert_eq!(solutions.len(), 1, "{}", query);
        assert!(list_of(&solutions[0], "L").is_empty());
    }
}

#[test]
fn test_compound_template() {
    let engine = engine_with(SCORES);
    let solutions = solve(&engine, "findall([?N, ?S], (score(?N, ?S), ?S > 15), ?Pairs)");
    assert_eq!(
        list_of(&solutions[0], "Pairs"),
        vec![
            Term::list(vec![Term::atom("sara"), Term::number(20)]),
            Term::list(vec![Term::atom("zain"), Term::text("20")]),
        ]
    );
}

#[test]
fn test_aggregation_does_not_bind_template_variables() {
    let engine = engine_with(SCORES);
    let solutions = solve(&engine, "findall(?S, score(?_, ?S), ?L)");
    assert!(solutions[0].get("S").is_none());
}

#[test]
fn test_aggregation_result_can_be_checked() {
    let engine = engine_with("fact n(1); fact n(2);");
    assert_eq!(solve(&engine, "findall(?X, n(?X), [1, 2])").len(), 1);
    assert!(solve(&engine, "findall(?X, n(?X), [2, 1])").is_empty());
}

#[test]
fn test_aggregation_sees_outer_bindings() {
    let engine = engine_with(SCORES);
    let solutions = solve(&engine, "?Target = 10, findall(?N, score(?N, ?Target), ?Who)");
    assert_eq!(
        list_of(&solutions[0], "Who"),
        vec![Term::atom("ali"), Term::atom("omar")]
    );
}

#[test]
fn test_arabic_aggregation() {
    let engine = engine_with(
        r#"
        حقيقة لون(أحمر);
        حقيقة لون(أزرق);
        حقيقة لون(أحمر);
        استعلام مجموعة_من(?ل، لون(?ل)، ?قائمة)؛
    "#,
    );
    let solutions = solve(&engine, "اجمع_كل(?ل، لون(?ل)، ?قائمة)");
    assert_eq!(list_of(&solutions[0], "قائمة").len(), 3);
    let solutions = solve(&engine, "مجموعة(?ل، لون(?ل)، ?قائمة)");
    assert_eq!(list_of(&solutions[0], "قائمة").len(), 2);
}

#[test]
fn test_engine_aggregation_api() {
    let engine = engine_with(SCORES);
    let goals = vec![Goal::call("score", vec![Term::var("Name"), Term::number(10)])];
    let template = Term::var("Name");

    assert_eq!(
        engine.find_all(&template, &goals).unwrap(),
        vec![Term::atom("ali"), Term::atom("omar")]
    );
    assert_eq!(engine.bag_of(&template, &goals).unwrap().len(), 2);

    let values = vec![Goal::call("score", vec![Term::var("_"), Term::var("S")])];
    assert_eq!(
        engine.set_of(&Term::var("S"), &values).unwrap(),
        vec![Term::number(10), Term::number(20)]
    );
}

#[test]
fn test_cut_inside_aggregation_is_local() {
    let engine = engine_with("fact n(1); fact n(2); fact n(3);");
    let solutions = solve(&engine, "n(?Y), findall(?X, (n(?X), cut), ?L)");
    assert_eq!(solutions.len(), 3);
    assert_eq!(list_of(&solutions[0], "L"), vec![Term::number(1)]);
}

#[test]
fn test_setof_collapses_numeric_text_in_any_order() {
    let text_first = engine_with(r#"fact v("5"); fact v("5.0"); fact v(5);"#);
    let solutions = solve(&text_first, "setof(?X, v(?X), ?L)");
    assert_eq!(list_of(&solutions[0], "L"), vec![Term::text("5")]);

    let number_first = engine_with(r#"fact v(5); fact v("5"); fact v("5.0");"#);
    let solutions = solve(&number_first, "setof(?X, v(?X), ?L)");
    assert_eq!(list_of(&solutions[0], "L"), vec![Term::number(5)]);
}

#[test]
fn test_setof_keeps_distinct_text() {
    let engine = engine_with(r#"fact v("abc"); fact v("ABC"); fact v("abc");"#);
    let solutions = solve(&engine, "setof(?X, v(?X), ?L)");
    assert_eq!(
        list_of(&solutions[0], "L"),
        vec![Term::text("abc"), Term::text("ABC")]
    );
}
