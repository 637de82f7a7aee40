mod json;

pub use json::{facts_to_json, solutions_to_json, to_bayan_syntax as from_json};
