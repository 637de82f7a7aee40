#![no_main]

use bayan::{Engine, ResourceLimits};
use libfuzzer_sys::fuzz_target;

const PROGRAM: &str = r#"
fact parent(ahmed, ali);
fact parent(ali, omar);
fact parent(ali, sara);
rule ancestor(?X, ?Y) :- parent(?X, ?Y);
rule ancestor(?X, ?Y) :- parent(?X, ?Z), ancestor(?Z, ?Y);
"#;

fuzz_target!(|data: &[u8]| {
    if let Ok(query) = std::str::from_utf8(data) {
        let limits = ResourceLimits {
            max_inferences: Some(10_000),
            ..ResourceLimits::default()
        };
        let mut engine = Engine::with_limits(limits);
        if engine.load(PROGRAM, "family").is_err() {
            return;
        }

        if let Ok(solutions) = engine.run_query(query) {
            for _ in solutions.take(32) {}
        }
    }
});
