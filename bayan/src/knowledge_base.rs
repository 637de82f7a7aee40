//! The fact and rule store
//!
//! Clauses are grouped by [`PredicateKey`] and kept in insertion order. Each
//! stored clause gets a [`ClauseId`] from a counter that only grows, so ids
//! increase along every clause list. A running search remembers the id of the
//! last clause it tried at a call site and asks for the next live clause after
//! it; that keeps pending choice points valid while `assert`/`retract` edit
//! the lists underneath them.

use crate::evaluator::unify::unify_predicates;
use crate::keywords::{Keyword, Vocabulary};
use crate::semantic::{render_goals, Goal, Predicate};
use crate::Substitution;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Indexing identity of a predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PredicateKey {
    pub name: String,
    pub arity: usize,
}

impl PredicateKey {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

impl fmt::Display for PredicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClauseId(u64);

/// A fact (empty body) or a rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub head: Predicate,
    pub body: Vec<Goal>,
}

impl Clause {
    pub fn fact(head: Predicate) -> Self {
        Self {
            head,
            body: Vec::new(),
        }
    }

    pub fn rule(head: Predicate, body: Vec<Goal>) -> Self {
        Self { head, body }
    }

    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }

    /// Copy of the clause with every variable renamed apart using `suffix`
    pub fn rename(&self, suffix: u64) -> Clause {
        let mut rename = |term: &crate::Term| {
            term.map_variables(&mut |name| crate::Term::Variable(format!("{}#{}", name, suffix)))
        };
        Clause {
            head: self.head.map_terms(&mut rename),
            body: self.body.iter().map(|goal| goal.map_terms(&mut rename)).collect(),
        }
    }

    pub fn render(&self, vocabulary: Vocabulary) -> String {
        if self.is_fact() {
            format!(
                "{} {};",
                Keyword::Fact.spelling(vocabulary),
                self.head.render(vocabulary)
            )
        } else {
            format!(
                "{} {} :- {};",
                Keyword::Rule.spelling(vocabulary),
                self.head.render(vocabulary),
                render_goals(&self.body, vocabulary)
            )
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Vocabulary::Latin))
    }
}

#[derive(Debug, Clone)]
struct StoredClause {
    id: ClauseId,
    clause: Rc<Clause>,
}

/// Per-predicate counts reported by [`KnowledgeBase::summary`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredicateSummary {
    pub name: String,
    pub arity: usize,
    pub facts: usize,
    pub rules: usize,
}

#[derive(Debug, Default)]
pub struct KnowledgeBase {
    predicates: HashMap<PredicateKey, Vec<StoredClause>>,
    /// First-definition order of predicate keys
    order: Vec<PredicateKey>,
    next_id: u64,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause after every existing clause of its predicate
    pub fn add_clause(&mut self, clause: Clause) -> ClauseId {
        let id = ClauseId(self.next_id);
        self.next_id += 1;

        let key = clause.head.key();
        tracing::trace!(predicate = %key, clause = %clause, "adding clause");
        if !self.predicates.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.predicates.entry(key).or_default().push(StoredClause {
            id,
            clause: Rc::new(clause),
        });
        id
    }

    pub fn add_fact(&mut self, head: Predicate) -> ClauseId {
        self.add_clause(Clause::fact(head))
    }

    pub fn add_rule(&mut self, head: Predicate, body: Vec<Goal>) -> ClauseId {
        self.add_clause(Clause::rule(head, body))
    }

    /// Remove the first clause whose head unifies with `pattern` under an empty substitution
    pub fn retract_fact(&mut self, pattern: &Predicate) -> bool {
        let key = pattern.key();
        let Some(clauses) = self.predicates.get_mut(&key) else {
            return false;
        };
        let position = clauses.iter().position(|stored| {
            // Rename so variables shared by name between pattern and clause stay distinct
            let candidate = stored.clause.rename(stored.id.0);
            unify_predicates(&candidate.head, pattern, &Substitution::new()).is_some()
        });
        match position {
            Some(index) => {
                clauses.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove the first rule structurally identical to `head :- body`
    pub fn retract_rule(&mut self, head: &Predicate, body: &[Goal]) -> bool {
        let key = head.key();
        let Some(clauses) = self.predicates.get_mut(&key) else {
            return false;
        };
        match clauses
            .iter()
            .position(|stored| stored.clause.head == *head && stored.clause.body == body)
        {
            Some(index) => {
                clauses.remove(index);
                true
            }
            None => false,
        }
    }

    /// Ordered snapshot of the clauses for `key`
    pub fn clauses_for(&self, key: &PredicateKey) -> Vec<Rc<Clause>> {
        self.predicates
            .get(key)
            .map(|clauses| clauses.iter().map(|stored| stored.clause.clone()).collect())
            .unwrap_or_default()
    }

    /// First live clause for `key` stored after `after` (or the first clause when `None`)
    pub fn next_clause(
        &self,
        key: &PredicateKey,
        after: Option<ClauseId>,
    ) -> Option<(ClauseId, Rc<Clause>)> {
        let clauses = self.predicates.get(key)?;
        let start = match after {
            Some(after) => clauses.partition_point(|stored| stored.id <= after),
            None => 0,
        };
        clauses
            .get(start)
            .map(|stored| (stored.id, stored.clause.clone()))
    }

    /// Whether any clause is stored for `key`
    pub fn contains(&self, key: &PredicateKey) -> bool {
        self.predicates
            .get(key)
            .is_some_and(|clauses| !clauses.is_empty())
    }

    /// Whether some stored fact unifies with `pattern`
    pub fn has_fact(&self, pattern: &Predicate) -> bool {
        self.predicates.get(&pattern.key()).is_some_and(|clauses| {
            clauses.iter().any(|stored| {
                stored.clause.is_fact()
                    && unify_predicates(
                        &stored.clause.rename(stored.id.0).head,
                        pattern,
                        &Substitution::new(),
                    )
                    .is_some()
            })
        })
    }

    /// Predicate keys with at least one clause, in first-definition order
    pub fn predicates(&self) -> impl Iterator<Item = &PredicateKey> {
        self.order.iter().filter(|key| self.contains(key))
    }

    pub fn summary(&self) -> Vec<PredicateSummary> {
        self.predicates()
            .map(|key| {
                let clauses = &self.predicates[key];
                let facts = clauses.iter().filter(|s| s.clause.is_fact()).count();
                PredicateSummary {
                    name: key.name.clone(),
                    arity: key.arity,
                    facts,
                    rules: clauses.len() - facts,
                }
            })
            .collect()
    }

    /// Total number of stored clauses
    pub fn len(&self) -> usize {
        self.predicates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.predicates.clear();
        self.order.clear();
    }

    /// Remove every clause of every arity named `name`; returns how many were removed
    pub fn clear_predicate(&mut self, name: &str) -> usize {
        let mut removed = 0;
        self.predicates.retain(|key, clauses| {
            if key.name == name {
                removed += clauses.len();
                false
            } else {
                true
            }
        });
        self.order.retain(|key| key.name != name);
        removed
    }
}
