use super::solver::Solver;
use super::substitution::Substitution;
use crate::semantic::Term;
use crate::BayanError;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::iter::FusedIterator;

/// One answer to a query: the query's variables and their values
///
/// Variables are listed in the order they first appear in the query.
/// Variables left unbound by the proof are omitted, and so are anonymous
/// variables (names starting with `_`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Solution {
    bindings: Vec<(String, Term)>,
}

impl Solution {
    pub(crate) fn project(variables: &[String], substitution: &Substitution) -> Self {
        let bindings = variables
            .iter()
            .filter(|name| !name.starts_with('_'))
            .filter_map(|name| {
                let value = substitution.resolve(&Term::Variable(name.clone()));
                (!value.is_variable()).then(|| (name.clone(), value))
            })
            .collect();
        Self { bindings }
    }

    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.bindings
            .iter()
            .find(|(name, _)| name == variable)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return write!(f, "true");
        }
        let parts: Vec<String> = self
            .bindings
            .iter()
            .map(|(name, value)| format!("?{} = {}", name, value))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl Serialize for Solution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bindings.len()))?;
        for (name, value) in &self.bindings {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Lazy stream of answers to a query
///
/// Each call to `next` resumes the search from the newest open choice point.
/// The stream is fused: after it returns `None` it keeps returning `None`. A
/// stream that ended because a resource limit was hit reports the limit
/// through [`Solutions::error`].
pub struct Solutions<'e> {
    solver: Solver<'e>,
    variables: Vec<String>,
    finished: bool,
}

impl<'e> Solutions<'e> {
    pub(crate) fn new(solver: Solver<'e>, variables: Vec<String>) -> Self {
        Self {
            solver,
            variables,
            finished: false,
        }
    }

    /// Variables reported in each solution, in first-appearance order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Why the stream stopped early, if it did
    pub fn error(&self) -> Option<&BayanError> {
        self.solver.error()
    }

    /// Resolution steps taken so far
    pub fn inferences(&self) -> u64 {
        self.solver.inferences()
    }

    /// Drain the stream, failing if it was cut short by a resource limit
    pub fn collect_all(mut self) -> Result<Vec<Solution>, BayanError> {
        let solutions: Vec<Solution> = self.by_ref().collect();
        match self.solver.take_error() {
            Some(err) => Err(err),
            None => Ok(solutions),
        }
    }
}

impl Iterator for Solutions<'_> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        if self.finished {
            return None;
        }
        match self.solver.next_substitution() {
            Some(substitution) => Some(Solution::project(&self.variables, &substitution)),
            None => {
                self.finished = true;
                None
            }
        }
    }
}

impl FusedIterator for Solutions<'_> {}
