//! Persistent variable bindings
//!
//! A [`Substitution`] is an immutable hash-trie map. Extending it returns a new
//! map that shares structure with the old one, so every choice point can hold
//! on to the bindings it started from at the cost of a pointer copy.

use crate::semantic::Term;
use rpds::HashTrieMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    bindings: HashTrieMap<String, Term>,
}

impl Default for Substitution {
    fn default() -> Self {
        Self::new()
    }
}

impl Substitution {
    pub fn new() -> Self {
        Self {
            bindings: HashTrieMap::new(),
        }
    }

    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.bindings.get(variable)
    }

    /// New substitution with `variable` bound to `term`
    pub fn bind(&self, variable: &str, term: Term) -> Substitution {
        Substitution {
            bindings: self.bindings.insert(variable.to_string(), term),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.size()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Term)> {
        self.bindings.iter()
    }

    /// Follow variable bindings until reaching an unbound variable or a non-variable term
    pub fn walk<'a>(&'a self, term: &'a Term) -> &'a Term {
        let mut current = term;
        while let Term::Variable(name) = current {
            match self.bindings.get(name) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current
    }

    /// Fully instantiate `term`
    ///
    /// Without an occurs check a variable can end up bound to a sequence that
    /// contains it. Such a variable is left in place at the point where it
    /// would recurse into itself.
    pub fn resolve(&self, term: &Term) -> Term {
        let mut visiting = Vec::new();
        self.resolve_with(term, &mut visiting)
    }

    fn resolve_with(&self, term: &Term, visiting: &mut Vec<String>) -> Term {
        match term {
            Term::Variable(name) => {
                if visiting.iter().any(|seen| seen == name) {
                    return term.clone();
                }
                match self.bindings.get(name) {
                    Some(bound) => {
                        visiting.push(name.clone());
                        let resolved = self.resolve_with(bound, visiting);
                        visiting.pop();
                        resolved
                    }
                    None => term.clone(),
                }
            }
            Term::Constant(_) => term.clone(),
            Term::Sequence(items) => Term::Sequence(
                items
                    .iter()
                    .map(|item| self.resolve_with(item, visiting))
                    .collect(),
            ),
            // A tail bound to a list turns the pattern back into a plain list
            Term::Cons(items, tail) => Term::cons(
                items
                    .iter()
                    .map(|item| self.resolve_with(item, visiting))
                    .collect(),
                self.resolve_with(tail, visiting),
            ),
        }
    }
}
