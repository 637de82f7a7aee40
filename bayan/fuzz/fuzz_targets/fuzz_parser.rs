#![no_main]

use bayan::{Engine, ResourceLimits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let limits = ResourceLimits {
            max_inferences: Some(10_000),
            ..ResourceLimits::default()
        };
        let mut engine = Engine::with_limits(limits);

        let _ = engine.load(s, "fuzz_input");
    }
});
