

// Resolution tests
mod aggregation;
mod builtins;
mod unification;

// Validator tests
mod validator;

use crate::{Engine, Solution};

/// Load `code` into a fresh engine, panicking on any error
pub(crate) fn engine_with(code: &str) -> Engine {
    let mut engine = Engine::new();
    engine.load(code, "test.bayan").unwrap();
    engine
}

/// All solutions of `query` against `engine`
pub(crate) fn solve(engine: &Engine, query: &str) -> Vec<Solution> {
    engine.run_query(query).unwrap().collect_all().unwrap()
}
