#![no_main]

use bayan::ArithmeticExpression;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(expression) = ArithmeticExpression::parse(s) {
            let _ = bayan::evaluator::operations::evaluate(&expression, &bayan::Substitution::new());
        }
    }
});
