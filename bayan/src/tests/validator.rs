use crate::{BayanError, Engine};

fn load(code: &str) -> Result<crate::Response, BayanError> {
    let mut engine = Engine::new();
    engine.load(code, "validate.bayan")
}

#[test]
fn test_builtin_cannot_be_redefined() {
    let result = load("fact member(1, [1]);");
    match result {
        Err(BayanError::Semantic(details)) => {
            assert!(details.message.contains("member/2"), "{}", details.message);
            assert!(details.suggestion.is_some());
        }
        other => panic!("Expected a semantic error, got {:?}", other),
    }
}

#[test]
fn test_builtin_redefinition_through_assert_is_rejected() {
    assert!(matches!(
        load("query assert طول(1, 2);"),
        Err(BayanError::Semantic(_))
    ));
}

#[test]
fn test_builtin_name_with_other_arity_is_allowed() {
    let response = load("fact member(club, ali, 2020); query member(club, ?Who, ?Year);").unwrap();
    assert_eq!(response.results[0].solutions.len(), 1);
}

#[test]
fn test_is_with_constant_left_side_is_rejected() {
    assert!(matches!(
        load("query abc is 1 + 2;"),
        Err(BayanError::Semantic(_))
    ));
    assert!(load("query 3 is 1 + 2;").is_ok());
}

#[test]
fn test_aggregation_into_constant_is_rejected() {
    let err = load("fact p(1);\nquery findall(?X, p(?X), total);").unwrap_err();
    assert!(matches!(err, BayanError::Semantic(_)));

    let details = err.details().unwrap();
    assert_eq!(details.source_id, "validate.bayan");
    assert_eq!(details.span.line, 2);
    assert!(details.suggestion.is_none());
}

#[test]
fn test_several_errors_are_reported_together() {
    let result = load(
        r#"
        fact append(1, 2, 3);
        rule length(?A, ?B) :- member(?A, ?B);
    "#,
    );
    match result {
        Err(BayanError::MultipleErrors(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("Expected multiple errors, got {:?}", other),
    }
}

#[test]
fn test_rejected_program_is_not_loaded() {
    let mut engine = Engine::new();
    assert!(engine
        .load("fact ok(1); fact member(1, 2);", "bad.bayan")
        .is_err());
    assert!(engine.knowledge_base().is_empty());
}

#[test]
fn test_undefined_predicate_warns() {
    let response = load("fact parent(a, b); rule grandparent(?X, ?Z) :- parent(?X, ?Y), parnet(?Y, ?Z);").unwrap();
    assert_eq!(response.warnings.len(), 1);
    assert!(response.warnings[0].contains("parnet/2"), "{}", response.warnings[0]);
}

#[test]
fn test_definitions_from_earlier_loads_count() {
    let mut engine = Engine::new();
    engine.load("fact base(1);", "a.bayan").unwrap();
    let response = engine.load("query base(?X);", "b.bayan").unwrap();
    assert!(response.warnings.is_empty());
}

#[test]
fn test_asserted_predicates_are_defined() {
    let response = load("query assert seen(1), seen(?X);").unwrap();
    assert!(response.warnings.is_empty());
    assert_eq!(response.results[0].solutions.len(), 1);
}

#[test]
fn test_builtins_do_not_warn() {
    let response = load("query member(?X, [1]), append(?A, ?B, [1]), length([1], ?N), true, unify(?X, 1);").unwrap();
    assert!(response.warnings.is_empty(), "{:?}", response.warnings);
}
