//! SLD resolution with an explicit choice-point stack
//!
//! The solver keeps the remaining goals as a shared linked list of frames and
//! the alternatives it has not explored yet as a stack of choice points.
//! Pulling the next answer runs the machine until the goal list is empty,
//! backtracking into the newest choice point whenever a goal fails. Nothing
//! is re-run between pulls.
//!
//! Every frame carries the cut barrier of the call whose clause body it came
//! from: the height of the choice stack when that call was entered. A cut
//! truncates the stack back to that height, which removes the call's
//! remaining clauses together with every choice point created to its left in
//! the same body.

use super::budget::InferenceBudget;
use super::builtins;
use super::operations;
use super::substitution::Substitution;
use super::unify::{unify, unify_predicates};
use crate::keywords::{self, Keyword};
use crate::knowledge_base::{Clause, ClauseId, KnowledgeBase, PredicateKey};
use crate::semantic::{CollectExpression, Goal, Predicate, Term};
use crate::BayanError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// What a search needs from its engine
#[derive(Clone)]
pub(crate) struct Context<'e> {
    pub knowledge_base: &'e RefCell<KnowledgeBase>,
    pub renaming: &'e Cell<u64>,
    pub budget: InferenceBudget,
}

impl Context<'_> {
    fn fresh_suffix(&self) -> u64 {
        let suffix = self.renaming.get();
        self.renaming.set(suffix + 1);
        suffix
    }
}

struct Frame {
    goal: Goal,
    cut_barrier: usize,
    next: Continuation,
}

type Continuation = Option<Rc<Frame>>;

fn push_goals(goals: Vec<Goal>, cut_barrier: usize, rest: Continuation) -> Continuation {
    goals.into_iter().rev().fold(rest, |next, goal| {
        Some(Rc::new(Frame {
            goal,
            cut_barrier,
            next,
        }))
    })
}

enum ChoicePoint {
    /// Remaining clauses of a call
    Clauses {
        predicate: Predicate,
        after: ClauseId,
        continuation: Continuation,
        substitution: Substitution,
    },
    /// Remaining answers of a nondeterministic builtin
    Alternatives {
        pending: std::vec::IntoIter<Substitution>,
        continuation: Continuation,
    },
}

pub(crate) struct Solver<'e> {
    context: Context<'e>,
    current: Option<(Continuation, Substitution)>,
    choices: Vec<ChoicePoint>,
    error: Option<BayanError>,
}

impl<'e> Solver<'e> {
    pub fn new(context: Context<'e>, goals: Vec<Goal>, substitution: Substitution) -> Self {
        Self {
            context,
            current: Some((push_goals(goals, 0, None), substitution)),
            choices: Vec::new(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&BayanError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<BayanError> {
        self.error.take()
    }

    pub fn inferences(&self) -> u64 {
        self.context.budget.inferences()
    }

    /// Run until the next answer, or `None` once the search space is exhausted
    pub fn next_substitution(&mut self) -> Option<Substitution> {
        loop {
            if self.error.is_some() {
                return None;
            }
            let (goals, substitution) = match self.current.take() {
                Some(state) => state,
                None => self.backtrack()?,
            };
            let Some(frame) = goals else {
                return Some(substitution);
            };
            if let Err(err) = self.context.budget.step() {
                self.fail_with(err);
                return None;
            }
            self.step(&frame, substitution);
        }
    }

    fn fail_with(&mut self, err: BayanError) {
        self.error = Some(err);
        self.current = None;
        self.choices.clear();
    }

    fn succeed(&mut self, continuation: Continuation, substitution: Substitution) {
        self.current = Some((continuation, substitution));
    }

    fn backtrack(&mut self) -> Option<(Continuation, Substitution)> {
        loop {
            match self.choices.pop()? {
                ChoicePoint::Clauses {
                    predicate,
                    after,
                    continuation,
                    substitution,
                } => {
                    self.try_clauses(&predicate, Some(after), continuation, substitution);
                    if let Some(state) = self.current.take() {
                        return Some(state);
                    }
                }
                ChoicePoint::Alternatives {
                    mut pending,
                    continuation,
                } => {
                    if let Some(substitution) = pending.next() {
                        if pending.len() > 0 {
                            self.choices.push(ChoicePoint::Alternatives {
                                pending,
                                continuation: continuation.clone(),
                            });
                        }
                        return Some((continuation, substitution));
                    }
                }
            }
        }
    }

    fn step(&mut self, frame: &Frame, substitution: Substitution) {
        let rest = frame.next.clone();
        tracing::trace!(goal = %frame.goal, "resolving");

        match &frame.goal {
            Goal::Call(predicate) => {
                self.call(predicate, frame.cut_barrier, rest, substitution)
            }
            Goal::Cut => self.cut(frame.cut_barrier, rest, substitution),
            Goal::Not(negation) => {
                let mut inner = Solver::new(
                    self.context.clone(),
                    negation.goals.clone(),
                    substitution.clone(),
                );
                let proved = inner.next_substitution().is_some();
                if let Some(err) = inner.take_error() {
                    self.fail_with(err);
                } else if !proved {
                    self.succeed(rest, substitution);
                }
            }
            Goal::Unify(left, right) => {
                if let Some(unified) = unify(left, right, &substitution) {
                    self.succeed(rest, unified);
                }
            }
            Goal::Is(is) => {
                if let Some(evaluated) =
                    operations::evaluate_arithmetic(&is.result, &is.expression, &substitution)
                {
                    self.succeed(rest, evaluated);
                }
            }
            Goal::Compare(comparison) => {
                if operations::compare(
                    &comparison.left,
                    comparison.operator,
                    &comparison.right,
                    &substitution,
                ) {
                    self.succeed(rest, substitution);
                }
            }
            Goal::FindAll(collect) | Goal::BagOf(collect) => {
                self.aggregate(collect, false, rest, substitution)
            }
            Goal::SetOf(collect) => self.aggregate(collect, true, rest, substitution),
            Goal::Assert(assert) => {
                let mut resolve = |term: &Term| substitution.resolve(term);
                let clause = Clause::rule(
                    assert.head.map_terms(&mut resolve),
                    assert
                        .body
                        .iter()
                        .map(|goal| goal.map_terms(&mut resolve))
                        .collect(),
                );
                tracing::debug!(clause = %clause, "assert");
                self.context.knowledge_base.borrow_mut().add_clause(clause);
                self.succeed(rest, substitution);
            }
            Goal::Retract(retract) => {
                let mut resolve = |term: &Term| substitution.resolve(term);
                let head = retract.head.map_terms(&mut resolve);
                let removed = if retract.body.is_empty() {
                    self.context
                        .knowledge_base
                        .borrow_mut()
                        .retract_fact(&head)
                } else {
                    let body: Vec<Goal> = retract
                        .body
                        .iter()
                        .map(|goal| goal.map_terms(&mut resolve))
                        .collect();
                    self.context
                        .knowledge_base
                        .borrow_mut()
                        .retract_rule(&head, &body)
                };
                tracing::debug!(head = %head, removed, "retract");
                if removed {
                    self.succeed(rest, substitution);
                }
            }
        }
    }

    fn cut(&mut self, cut_barrier: usize, rest: Continuation, substitution: Substitution) {
        self.choices.truncate(cut_barrier);
        self.succeed(rest, substitution);
    }

    fn call(
        &mut self,
        predicate: &Predicate,
        cut_barrier: usize,
        rest: Continuation,
        substitution: Substitution,
    ) {
        let args = &predicate.arguments;
        match (keywords::Keyword::lookup(&predicate.name), args.len()) {
            (Some(Keyword::Cut), 0) => self.cut(cut_barrier, rest, substitution),
            (Some(Keyword::True), 0) => self.succeed(rest, substitution),
            (Some(Keyword::False), 0) => {}
            (Some(Keyword::Member), 2) => {
                let answers = builtins::member(&args[0], &args[1], &substitution);
                self.alternatives(answers, rest);
            }
            (Some(Keyword::Append), 3) => {
                let answers = builtins::append(
                    &args[0],
                    &args[1],
                    &args[2],
                    &substitution,
                    &self.context.budget,
                );
                self.alternatives_or_fail(answers, rest);
            }
            (Some(Keyword::Length), 2) => {
                let fresh = self.context.fresh_suffix();
                let answers = builtins::length(
                    &args[0],
                    &args[1],
                    &substitution,
                    fresh,
                    &self.context.budget,
                );
                self.alternatives_or_fail(answers, rest);
            }
            (Some(Keyword::Unify), 2) => {
                if let Some(unified) = unify(&args[0], &args[1], &substitution) {
                    self.succeed(rest, unified);
                }
            }
            _ => self.try_clauses(predicate, None, rest, substitution),
        }
    }

    fn alternatives_or_fail(
        &mut self,
        answers: Result<Vec<Substitution>, BayanError>,
        continuation: Continuation,
    ) {
        match answers {
            Ok(answers) => self.alternatives(answers, continuation),
            Err(err) => self.fail_with(err),
        }
    }

    fn alternatives(&mut self, answers: Vec<Substitution>, continuation: Continuation) {
        let mut pending = answers.into_iter();
        if let Some(first) = pending.next() {
            if pending.len() > 0 {
                self.choices.push(ChoicePoint::Alternatives {
                    pending,
                    continuation: continuation.clone(),
                });
            }
            self.succeed(continuation, first);
        }
    }

    /// Resolve `predicate` against its clauses, starting after `after`
    ///
    /// Leaves `current` empty when no remaining clause head unifies.
    fn try_clauses(
        &mut self,
        predicate: &Predicate,
        mut after: Option<ClauseId>,
        rest: Continuation,
        substitution: Substitution,
    ) {
        let key: PredicateKey = predicate.key();
        let cut_barrier = self.choices.len();

        loop {
            // Keep the borrow short: the body may assert or retract
            let next = self
                .context
                .knowledge_base
                .borrow()
                .next_clause(&key, after);
            let Some((id, clause)) = next else {
                if after.is_none() && !self.context.knowledge_base.borrow().contains(&key) {
                    if keywords::builtin_predicate(&predicate.name).is_some() {
                        tracing::debug!(predicate = %key, "builtin called with wrong arity");
                    } else {
                        tracing::debug!(predicate = %key, "unknown predicate, failing");
                    }
                }
                return;
            };
            after = Some(id);

            let renamed = clause.rename(self.context.fresh_suffix());
            if let Some(unified) = unify_predicates(&renamed.head, predicate, &substitution) {
                self.choices.push(ChoicePoint::Clauses {
                    predicate: predicate.clone(),
                    after: id,
                    continuation: rest.clone(),
                    substitution,
                });
                let continuation = push_goals(renamed.body, cut_barrier, rest);
                self.succeed(continuation, unified);
                return;
            }
        }
    }

    fn aggregate(
        &mut self,
        collect: &CollectExpression,
        distinct: bool,
        rest: Continuation,
        substitution: Substitution,
    ) {
        let items = match collect_solutions(
            &self.context,
            &collect.template,
            &collect.goals,
            &substitution,
        ) {
            Ok(items) => items,
            Err(err) => {
                self.fail_with(err);
                return;
            }
        };
        let items = if distinct {
            builtins::deduplicate(items)
        } else {
            items
        };
        if let Some(unified) = unify(&collect.result, &Term::Sequence(items), &substitution) {
            self.succeed(rest, unified);
        }
    }
}

/// Instantiate `template` for every solution of `goals`, in order
pub(crate) fn collect_solutions(
    context: &Context<'_>,
    template: &Term,
    goals: &[Goal],
    substitution: &Substitution,
) -> Result<Vec<Term>, BayanError> {
    let mut solver = Solver::new(context.clone(), goals.to_vec(), substitution.clone());
    let mut items = Vec::new();
    while let Some(answer) = solver.next_substitution() {
        items.push(answer.resolve(template));
    }
    match solver.take_error() {
        Some(err) => Err(err),
        None => Ok(items),
    }
}
