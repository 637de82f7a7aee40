//! # Bayan Engine
//!
//! **Logic programming in two scripts**
//!
//! Bayan is a logic programming language whose keywords can be written in
//! Latin or in Arabic script, freely mixed within one file. This crate holds
//! its core: the bilingual parser, the knowledge base and the resolution
//! engine.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bayan::{BayanResult, Engine};
//!
//! fn main() -> BayanResult<()> {
//!     let mut engine = Engine::new();
//!
//!     // Facts and rules, in either vocabulary
//!     engine.load(r#"
//!         fact parent("Ahmed", "Ali");
//!         حقيقة parent("Ali", "Zain");
//!         rule grandparent(?X, ?Z) :- parent(?X, ?Y), parent(?Y, ?Z);
//!     "#, "family.bayan")?;
//!
//!     // Solutions are produced lazily, one backtrack at a time
//!     for solution in engine.run_query("grandparent(?Who, \"Zain\")")? {
//!         println!("{}", solution);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Terms
//! Variables carry a `?` sigil (`?X`, `?س`). Everything else is a constant
//! (numbers, text, booleans, atoms) or a list of terms.
//!
//! ### Clauses
//! Facts are unconditionally true; rules are proved by proving their body.
//! Clauses are tried in the order they were added.
//!
//! ### Resolution
//! Queries are answered by depth-first SLD resolution with cut,
//! negation as failure, `findall`/`bagof`/`setof`, dynamic `assert`/`retract`
//! and exact decimal arithmetic.

pub mod ast;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod keywords;
pub mod knowledge_base;
pub mod parser;
pub mod resource_limits;
pub mod response;
pub mod semantic;
pub mod serializers;
pub mod validator;

pub use ast::Span;
pub use engine::Engine;
pub use error::BayanError;
pub use evaluator::operations::{
    arithmetic_equal, arithmetic_not_equal, evaluate_arithmetic, greater_than,
    greater_than_or_equal, less_than, less_than_or_equal,
};
pub use evaluator::{unify, Solution, Solutions, Substitution};
pub use keywords::{Keyword, Vocabulary};
pub use knowledge_base::{Clause, KnowledgeBase, PredicateKey, PredicateSummary};
pub use parser::{parse, parse_query, parse_term};
pub use resource_limits::ResourceLimits;
pub use response::{DirectiveResult, QueryResult, Response};
pub use semantic::*;
pub use validator::{ValidatedProgram, Validator};

/// Result type for Bayan operations
pub type BayanResult<T> = Result<T, BayanError>;

#[cfg(test)]
mod tests;
