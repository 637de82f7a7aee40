//! Resolution engine
//!
//! - `substitution`, `unify`: bindings and structural matching
//! - `solver`: SLD resolution with cut, negation and aggregation
//! - `builtins`, `operations`: sequence predicates and arithmetic
//! - `budget`: optional inference and time limits

pub mod budget;
pub mod builtins;
pub mod operations;
pub(crate) mod solver;
pub mod solutions;
pub mod substitution;
pub mod unify;

pub use budget::InferenceBudget;
pub use solutions::{Solution, Solutions};
pub use substitution::Substitution;
pub use unify::{unify, unify_predicates};
