use bayan::{BayanError, Engine, ResourceLimits};

#[test]
fn test_file_size_limit() {
    let limits = ResourceLimits {
        max_file_size_bytes: 100,
        ..ResourceLimits::default()
    };
    let mut engine = Engine::with_limits(limits);

    let large_code = "fact number(1);\n".repeat(10);
    match engine.load(&large_code, "large.bayan") {
        Err(BayanError::ResourceLimitExceeded { limit_name, .. }) => {
            assert_eq!(limit_name, "max_file_size_bytes");
        }
        _ => panic!("Expected ResourceLimitExceeded error"),
    }
}

#[test]
fn test_file_size_just_under_limit() {
    let limits = ResourceLimits {
        max_file_size_bytes: 1000,
        ..ResourceLimits::default()
    };
    let mut engine = Engine::with_limits(limits);
    assert!(engine.load("fact x(1); query x(?X);", "small.bayan").is_ok());
}

#[test]
fn test_default_limits_are_unbounded_for_search() {
    let limits = ResourceLimits::default();
    assert_eq!(limits.max_inferences, None);
    assert_eq!(limits.max_query_time_ms, None);

    let sandboxed = ResourceLimits::sandboxed();
    assert!(sandboxed.max_inferences.is_some());
    assert!(sandboxed.max_query_time_ms.is_some());
}

#[test]
fn test_inference_limit_on_runaway_recursion() {
    let mut engine = Engine::with_limits(ResourceLimits {
        max_inferences: Some(10_000),
        ..ResourceLimits::default()
    });
    engine
        .load("rule forever(?N) :- ?M is ?N + 1, forever(?M);", "forever.bayan")
        .unwrap();

    let result = engine.run_query("forever(0)").unwrap().collect_all();
    match result {
        Err(BayanError::ResourceLimitExceeded { limit_name, .. }) => {
            assert_eq!(limit_name, "max_inferences")
        }
        other => panic!("Expected an inference limit error, got {:?}", other),
    }
}

#[test]
fn test_limit_covers_nested_searches() {
    let mut engine = Engine::with_limits(ResourceLimits {
        max_inferences: Some(1_000),
        ..ResourceLimits::default()
    });
    engine.load("rule spin :- spin;", "spin.bayan").unwrap();

    // The runaway search is inside findall; the limit still applies and is reported
    let mut solutions = engine.run_query("findall(1, spin, ?L)").unwrap();
    assert!(solutions.next().is_none());
    assert!(matches!(
        solutions.error(),
        Some(BayanError::ResourceLimitExceeded { .. })
    ));
}

#[test]
fn test_time_limit() {
    let mut engine = Engine::with_limits(ResourceLimits {
        max_query_time_ms: Some(50),
        ..ResourceLimits::default()
    });
    engine
        .load("rule forever(?N) :- ?M is ?N + 1, forever(?M);", "forever.bayan")
        .unwrap();

    match engine.run_query("forever(0)").unwrap().collect_all() {
        Err(BayanError::ResourceLimitExceeded { limit_name, .. }) => {
            assert_eq!(limit_name, "max_query_time_ms")
        }
        other => panic!("Expected a time limit error, got {:?}", other),
    }
}

#[test]
fn test_limits_do_not_affect_answers() {
    let code = r#"
    fact edge(a, b);
    fact edge(b, c);
    fact edge(c, d);
    rule path(?X, ?Y) :- edge(?X, ?Y);
    rule path(?X, ?Y) :- edge(?X, ?Z), path(?Z, ?Y);
    "#;
    let mut unlimited = Engine::new();
    unlimited.load(code, "graph.bayan").unwrap();
    let mut sandboxed = Engine::with_limits(ResourceLimits::sandboxed());
    sandboxed.load(code, "graph.bayan").unwrap();

    let a = unlimited.run_query("path(a, ?Y)").unwrap().collect_all().unwrap();
    let b = sandboxed.run_query("path(a, ?Y)").unwrap().collect_all().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 3);
}

#[test]
fn test_huge_length_request_is_a_limit_error() {
    let engine = Engine::with_limits(ResourceLimits::sandboxed());

    match engine.run_query("length(?L, 100000000000000)").unwrap().collect_all() {
        Err(BayanError::ResourceLimitExceeded { limit_name, .. }) => {
            assert_eq!(limit_name, "max_list_length")
        }
        other => panic!("Expected a list length error, got {:?}", other),
    }
}

#[test]
fn test_default_limits_bound_list_length() {
    let engine = Engine::new();

    let mut solutions = engine.run_query("length(?L, 100000000000000)").unwrap();
    assert!(solutions.next().is_none());
    assert!(matches!(
        solutions.error(),
        Some(BayanError::ResourceLimitExceeded { .. })
    ));
}

#[test]
fn test_list_length_limit_is_inclusive() {
    let engine = Engine::with_limits(ResourceLimits {
        max_list_length: 10,
        ..ResourceLimits::default()
    });

    let within = engine.run_query("length(?L, 10)").unwrap().collect_all();
    assert_eq!(within.unwrap().len(), 1);

    let over = engine.run_query("length(?L, 11)").unwrap().collect_all();
    assert!(matches!(over, Err(BayanError::ResourceLimitExceeded { .. })));
}

#[test]
fn test_append_result_is_bounded() {
    let engine = Engine::with_limits(ResourceLimits {
        max_list_length: 10,
        ..ResourceLimits::default()
    });

    let result = engine
        .run_query("append([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11], ?L)")
        .unwrap()
        .collect_all();
    assert!(matches!(result, Err(BayanError::ResourceLimitExceeded { .. })));

    let fits = engine
        .run_query("append([1, 2, 3], [4, 5], ?L)")
        .unwrap()
        .collect_all()
        .unwrap();
    assert_eq!(fits.len(), 1);
}
