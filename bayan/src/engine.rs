use crate::evaluator::budget::InferenceBudget;
use crate::evaluator::builtins::deduplicate;
use crate::evaluator::solver::{collect_solutions, Context, Solver};
use crate::evaluator::{Solutions, Substitution};
use crate::knowledge_base::{Clause, KnowledgeBase, PredicateKey, PredicateSummary};
use crate::parser::{parse, parse_query};
use crate::response::{DirectiveResult, QueryResult, Response};
use crate::semantic::*;
use crate::{BayanResult, ResourceLimits, Validator};
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

/// The Bayan resolution engine.
///
/// Owns one knowledge base. Loading (`load`, `add_fact`, `add_rule`) needs
/// `&mut self`; queries and the dynamic `assert_*`/`retract_*` operations only
/// need `&self`, so a running query can edit the knowledge base it is
/// searching. Queries against one engine must not be interleaved with
/// borrows obtained from [`Engine::knowledge_base`].
pub struct Engine {
    knowledge_base: RefCell<KnowledgeBase>,
    renaming: Cell<u64>,
    sources: HashMap<String, String>,
    validator: Validator,
    limits: ResourceLimits,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_limits(ResourceLimits::default())
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom resource limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self {
            knowledge_base: RefCell::new(KnowledgeBase::new()),
            renaming: Cell::new(0),
            sources: HashMap::new(),
            validator: Validator,
            limits,
        }
    }

    /// Get the current resource limits
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Parse, validate and execute a program
    ///
    /// Facts and rules are added in source order; `query` statements are run
    /// to exhaustion at the point they appear and `assert`/`retract`
    /// directives are applied in between.
    pub fn load(&mut self, code: &str, source_id: &str) -> BayanResult<Response> {
        let program = parse(code, source_id, &self.limits)?;
        let validated = self.validator.validate(
            program,
            Arc::from(code),
            &self.knowledge_base.borrow(),
        )?;
        self.sources.insert(source_id.to_string(), code.to_string());

        let mut response = Response::new(source_id);
        response.warnings = validated.warnings;

        for statement in validated.program.statements {
            match statement {
                Statement::Fact(fact) => {
                    self.add_fact(fact.head);
                }
                Statement::Rule(rule) => {
                    self.add_rule(rule.head, rule.body);
                }
                Statement::Query(query) => {
                    let text = source_excerpt(code, query.span.as_ref())
                        .unwrap_or_else(|| Statement::Query(query.clone()).render(crate::Vocabulary::Latin));
                    let variables = query.variables();
                    let (solutions, error) = match self.query_goals(query.goals).collect_all() {
                        Ok(solutions) => (solutions, None),
                        Err(err) => (Vec::new(), Some(err.to_string())),
                    };
                    response.add_result(QueryResult {
                        query: text,
                        line: query.span.as_ref().map(|span| span.line),
                        variables,
                        solutions,
                        error,
                    });
                }
                Statement::Directive(directive) => {
                    let text = source_excerpt(code, directive.span.as_ref())
                        .unwrap_or_else(|| directive.goal.to_string());
                    let succeeded = self.query_goals(vec![directive.goal]).next().is_some();
                    response.add_directive(DirectiveResult {
                        directive: text,
                        line: directive.span.as_ref().map(|span| span.line),
                        succeeded,
                    });
                }
            }
        }

        tracing::debug!(
            source = source_id,
            clauses = self.knowledge_base.borrow().len(),
            queries = response.results.len(),
            "loaded program"
        );
        Ok(response)
    }

    pub fn add_fact(&mut self, head: Predicate) {
        self.knowledge_base.get_mut().add_fact(head);
    }

    pub fn add_rule(&mut self, head: Predicate, body: Vec<Goal>) {
        self.knowledge_base.get_mut().add_rule(head, body);
    }

    /// Add a fact while queries may be running
    pub fn assert_fact(&self, head: Predicate) {
        self.knowledge_base.borrow_mut().add_fact(head);
    }

    /// Add a rule while queries may be running
    pub fn assert_rule(&self, head: Predicate, body: Vec<Goal>) {
        self.knowledge_base.borrow_mut().add_rule(head, body);
    }

    /// Remove the first clause whose head unifies with `pattern`
    pub fn retract_fact(&self, pattern: &Predicate) -> bool {
        self.knowledge_base.borrow_mut().retract_fact(pattern)
    }

    /// Remove the first rule identical to `head :- body`
    pub fn retract_rule(&self, head: &Predicate, body: &[Goal]) -> bool {
        self.knowledge_base.borrow_mut().retract_rule(head, body)
    }

    /// Lazily enumerate the solutions of a single predicate goal
    pub fn query(&self, goal: &Predicate) -> Solutions<'_> {
        self.query_goals(vec![Goal::Call(goal.clone())])
    }

    /// Lazily enumerate the solutions of a conjunction of goals
    pub fn query_goals(&self, goals: Vec<Goal>) -> Solutions<'_> {
        let mut variables = Vec::new();
        collect_goal_variables(&goals, &mut variables);
        variables.retain(|name| !name.starts_with('_'));

        tracing::debug!(query = %render_goals(&goals, crate::Vocabulary::Latin), "query");
        let solver = Solver::new(self.context(), goals, Substitution::new());
        Solutions::new(solver, variables)
    }

    /// Parse `text` as a query and enumerate its solutions
    pub fn run_query(&self, text: &str) -> BayanResult<Solutions<'_>> {
        let goals = parse_query(text)?;
        Ok(self.query_goals(goals))
    }

    /// True iff `goals` has no solution; bindings never leak out
    ///
    /// A search stopped by a resource limit before finding a solution proves
    /// nothing, so it is reported as an error.
    pub fn negation_as_failure(&self, goals: &[Goal]) -> BayanResult<bool> {
        let mut solutions = self.query_goals(goals.to_vec());
        let proved = solutions.next().is_some();
        match solutions.error() {
            Some(err) => Err(err.clone()),
            None => Ok(!proved),
        }
    }

    /// Instantiate `template` for every solution of `goals`, duplicates included
    pub fn find_all(&self, template: &Term, goals: &[Goal]) -> BayanResult<Vec<Term>> {
        collect_solutions(&self.context(), template, goals, &Substitution::new())
    }

    /// Same collection as [`Engine::find_all`]; no free-variable grouping
    pub fn bag_of(&self, template: &Term, goals: &[Goal]) -> BayanResult<Vec<Term>> {
        self.find_all(template, goals)
    }

    /// As [`Engine::bag_of`], keeping only the first occurrence of equal values
    pub fn set_of(&self, template: &Term, goals: &[Goal]) -> BayanResult<Vec<Term>> {
        self.bag_of(template, goals).map(deduplicate)
    }

    /// Read access to the knowledge base
    ///
    /// Drop the guard before running a query that may assert or retract.
    pub fn knowledge_base(&self) -> Ref<'_, KnowledgeBase> {
        self.knowledge_base.borrow()
    }

    pub fn summary(&self) -> Vec<PredicateSummary> {
        self.knowledge_base.borrow().summary()
    }

    pub fn clauses(&self, key: &PredicateKey) -> Vec<Rc<Clause>> {
        self.knowledge_base.borrow().clauses_for(key)
    }

    /// Clauses of every arity named `name`, grouped by arity in definition order
    pub fn clauses_named(&self, name: &str) -> Vec<Rc<Clause>> {
        let knowledge_base = self.knowledge_base.borrow();
        knowledge_base
            .predicates()
            .filter(|key| key.name == name)
            .flat_map(|key| knowledge_base.clauses_for(key))
            .collect()
    }

    pub fn clear(&mut self) {
        self.knowledge_base.get_mut().clear();
        self.sources.clear();
    }

    /// Source text of every loaded program, by source id
    pub fn sources(&self) -> &HashMap<String, String> {
        &self.sources
    }

    fn context(&self) -> Context<'_> {
        Context {
            knowledge_base: &self.knowledge_base,
            renaming: &self.renaming,
            budget: InferenceBudget::new(&self.limits),
        }
    }
}

fn source_excerpt(code: &str, span: Option<&crate::Span>) -> Option<String> {
    let span = span?;
    let text = code.get(span.start..span.end)?.trim();
    Some(text.to_string())
}
