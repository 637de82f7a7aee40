use crate::ast::Span;
use crate::error::BayanError;
use crate::keywords::{self, Keyword};
use crate::knowledge_base::{KnowledgeBase, PredicateKey};
use crate::semantic::*;
use crate::BayanResult;
use std::collections::HashSet;
use std::sync::Arc;

/// A program that has passed semantic validation
#[derive(Debug, Clone)]
pub struct ValidatedProgram {
    pub program: Program,
    pub warnings: Vec<String>,
}

/// Semantic checks that run after parsing but before loading
///
/// Errors reject the whole program. Warnings point at likely typos but do not
/// change behaviour: a call to a predicate nobody defines simply fails.
#[derive(Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate `program` against itself and the clauses already loaded
    pub fn validate(
        &self,
        program: Program,
        source_text: Arc<str>,
        loaded: &KnowledgeBase,
    ) -> BayanResult<ValidatedProgram> {
        let mut errors = Vec::new();

        // Phase 1: Builtin predicates cannot be redefined
        self.validate_heads(&program, &source_text, &mut errors);

        // Phase 2: Goal shapes the engine could never satisfy
        self.validate_goal_forms(&program, &source_text, &mut errors);

        match errors.len() {
            0 => {}
            1 => return Err(errors.remove(0)),
            _ => return Err(BayanError::MultipleErrors(errors)),
        }

        // Phase 3: Calls to predicates that are defined nowhere
        let warnings = self.undefined_predicate_warnings(&program, loaded);
        for warning in &warnings {
            tracing::warn!(source = %program.source_id, "{}", warning);
        }

        Ok(ValidatedProgram { program, warnings })
    }

    fn validate_heads(
        &self,
        program: &Program,
        source_text: &Arc<str>,
        errors: &mut Vec<BayanError>,
    ) {
        for statement in &program.statements {
            let mut heads: Vec<&Predicate> = Vec::new();
            match statement {
                Statement::Fact(fact) => heads.push(&fact.head),
                Statement::Rule(rule) => {
                    heads.push(&rule.head);
                    asserted_heads(&rule.body, &mut heads);
                }
                Statement::Query(query) => asserted_heads(&query.goals, &mut heads),
                Statement::Directive(directive) => {
                    asserted_heads(std::slice::from_ref(&directive.goal), &mut heads)
                }
            }

            for head in heads {
                if let Some(builtin) = builtin_with_arity(head) {
                    errors.push(semantic_error(
                        format!(
                            "Cannot define clauses for builtin predicate '{}/{}'",
                            head.name,
                            head.arity()
                        ),
                        statement.span(),
                        &program.source_id,
                        source_text,
                        Some(format!(
                            "'{}' is the builtin '{}'; choose another predicate name",
                            head.name, builtin
                        )),
                    ));
                }
            }
        }
    }

    fn validate_goal_forms(
        &self,
        program: &Program,
        source_text: &Arc<str>,
        errors: &mut Vec<BayanError>,
    ) {
        for statement in &program.statements {
            let goals: &[Goal] = match statement {
                Statement::Fact(_) => continue,
                Statement::Rule(rule) => &rule.body,
                Statement::Query(query) => &query.goals,
                Statement::Directive(directive) => std::slice::from_ref(&directive.goal),
            };

            visit_goals(goals, &mut |goal| match goal {
                Goal::Is(is) if !matches!(is.result, Term::Variable(_) | Term::Constant(Value::Number(_))) => {
                    errors.push(semantic_error(
                        format!(
                            "The left side of 'is' must be a variable or a number, found '{}'",
                            is.result
                        ),
                        statement.span(),
                        &program.source_id,
                        source_text,
                        Some("Write the result variable first, as in '?X is 2 + 3'".to_string()),
                    ));
                }
                Goal::FindAll(collect) | Goal::BagOf(collect) | Goal::SetOf(collect)
                    if matches!(collect.result, Term::Constant(_)) =>
                {
                    errors.push(semantic_error(
                        format!(
                            "The result of an aggregation must be a variable or a list, found '{}'",
                            collect.result
                        ),
                        statement.span(),
                        &program.source_id,
                        source_text,
                        None,
                    ));
                }
                _ => {}
            });
        }
    }

    fn undefined_predicate_warnings(&self, program: &Program, loaded: &KnowledgeBase) -> Vec<String> {
        let mut defined: HashSet<PredicateKey> = loaded.predicates().cloned().collect();
        for statement in &program.statements {
            let mut heads: Vec<&Predicate> = Vec::new();
            match statement {
                Statement::Fact(fact) => heads.push(&fact.head),
                Statement::Rule(rule) => {
                    heads.push(&rule.head);
                    asserted_heads(&rule.body, &mut heads);
                }
                Statement::Query(query) => asserted_heads(&query.goals, &mut heads),
                Statement::Directive(directive) => {
                    asserted_heads(std::slice::from_ref(&directive.goal), &mut heads)
                }
            }
            defined.extend(heads.into_iter().map(Predicate::key));
        }

        let mut reported = HashSet::new();
        let mut warnings = Vec::new();
        for statement in &program.statements {
            let goals: &[Goal] = match statement {
                Statement::Fact(_) => continue,
                Statement::Rule(rule) => &rule.body,
                Statement::Query(query) => &query.goals,
                Statement::Directive(_) => continue,
            };
            visit_goals(goals, &mut |goal| {
                let Goal::Call(predicate) = goal else {
                    return;
                };
                let key = predicate.key();
                if is_builtin_call(predicate) || defined.contains(&key) || !reported.insert(key.clone()) {
                    return;
                }
                let location = statement
                    .span()
                    .map(|span| format!(" (line {})", span.line))
                    .unwrap_or_default();
                warnings.push(format!(
                    "Predicate '{}' is called{} but never defined; the call will always fail",
                    key, location
                ));
            });
        }
        warnings
    }
}

/// Visit every goal, descending into negations, aggregations and asserted bodies
pub fn visit_goals(goals: &[Goal], f: &mut impl FnMut(&Goal)) {
    for goal in goals {
        f(goal);
        match goal {
            Goal::Not(negation) => visit_goals(&negation.goals, f),
            Goal::FindAll(collect) | Goal::BagOf(collect) | Goal::SetOf(collect) => {
                visit_goals(&collect.goals, f)
            }
            Goal::Assert(assert) => visit_goals(&assert.body, f),
            Goal::Retract(retract) => visit_goals(&retract.body, f),
            _ => {}
        }
    }
}

fn asserted_heads<'a>(goals: &'a [Goal], heads: &mut Vec<&'a Predicate>) {
    for goal in goals {
        match goal {
            Goal::Assert(assert) => {
                heads.push(&assert.head);
                asserted_heads(&assert.body, heads);
            }
            Goal::Not(negation) => asserted_heads(&negation.goals, heads),
            Goal::FindAll(collect) | Goal::BagOf(collect) | Goal::SetOf(collect) => {
                asserted_heads(&collect.goals, heads)
            }
            _ => {}
        }
    }
}

/// The builtin a head would shadow, if its name and arity match one
fn builtin_with_arity(head: &Predicate) -> Option<Keyword> {
    let builtin = keywords::builtin_predicate(&head.name)?;
    let arity = match builtin {
        Keyword::Member | Keyword::Length => 2,
        Keyword::Append => 3,
        _ => return None,
    };
    (head.arity() == arity).then_some(builtin)
}

fn is_builtin_call(predicate: &Predicate) -> bool {
    if builtin_with_arity(predicate).is_some() {
        return true;
    }
    match (Keyword::lookup(&predicate.name), predicate.arity()) {
        (Some(Keyword::Cut | Keyword::True | Keyword::False), 0) => true,
        (Some(Keyword::Unify), 2) => true,
        _ => false,
    }
}

fn semantic_error(
    message: String,
    span: Option<&Span>,
    source_id: &str,
    source_text: &Arc<str>,
    suggestion: Option<String>,
) -> BayanError {
    let span = span.cloned().unwrap_or_default();
    match suggestion {
        Some(suggestion) => BayanError::semantic_with_suggestion(
            message,
            span,
            source_id,
            source_text.clone(),
            suggestion,
        ),
        None => BayanError::semantic(message, span, source_id, source_text.clone()),
    }
}
