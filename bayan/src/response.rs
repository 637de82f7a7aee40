use crate::evaluator::Solution;
use serde::Serialize;

/// Response from loading a Bayan program
///
/// Contains the answers to every `query` statement in the program and the
/// outcome of every top-level `assert`/`retract`, in source order.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub source_id: String,
    pub results: Vec<QueryResult>,
    pub directives: Vec<DirectiveResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Answers to a single query statement
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// The query as written in source
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub variables: Vec<String>,
    pub solutions: Vec<Solution>,
    /// Set when the search was stopped by a resource limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    /// Whether the query was proved at least once
    pub fn succeeded(&self) -> bool {
        !self.solutions.is_empty()
    }
}

/// Outcome of a top-level `assert` or `retract`
#[derive(Debug, Clone, Serialize)]
pub struct DirectiveResult {
    pub directive: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub succeeded: bool,
}

impl Response {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            results: Vec::new(),
            directives: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_result(&mut self, result: QueryResult) {
        self.results.push(result);
    }

    pub fn add_directive(&mut self, directive: DirectiveResult) {
        self.directives.push(directive);
    }
}
