use crate::ast::Span;
use crate::keywords::{Keyword, Vocabulary};
use crate::knowledge_base::PredicateKey;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An atomic value carried by a constant term
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Number(Decimal),
    Text(String),
    Boolean(bool),
    /// Bare identifier such as `ali` or `أحمد`
    Atom(String),
}

impl Value {
    /// Numeric view of the value
    ///
    /// Text coerces when it parses as a number (`"10"`, `" 2.5 "`, `"1e3"`).
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(text) => parse_number(text),
            _ => None,
        }
    }

    /// Equality used by unification and by `setOf` de-duplication
    ///
    /// Numbers compare numerically, and so does text that parses as a number.
    /// Other text and atoms compare by their characters. Booleans only equal
    /// booleans.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Number(n), Value::Text(text)) | (Value::Text(text), Value::Number(n)) => {
                parse_number(text).is_some_and(|parsed| parsed == *n)
            }
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            // "5" and "5.0" both equal 5, so they must equal each other
            (Value::Text(a), Value::Text(b)) => match (parse_number(a), parse_number(b)) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
            (Value::Text(a) | Value::Atom(a), Value::Text(b) | Value::Atom(b)) => a == b,
            _ => false,
        }
    }

    pub fn render(&self, vocabulary: Vocabulary) -> String {
        match self {
            Value::Number(n) => n.normalize().to_string(),
            Value::Text(text) => format!("\"{}\"", escape_text(text)),
            Value::Boolean(true) => Keyword::True.spelling(vocabulary).to_string(),
            Value::Boolean(false) => Keyword::False.spelling(vocabulary).to_string(),
            Value::Atom(name) => name.clone(),
        }
    }
}

/// Parse a number out of text, accepting surrounding whitespace and scientific notation
pub fn parse_number(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Vocabulary::Latin))
    }
}

/// A term of the logic language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Variable(String),
    Constant(Value),
    Sequence(Vec<Term>),
    /// `[a, b | ?Rest]`: known leading items followed by a tail list
    ///
    /// Built through [`Term::cons`], which keeps the prefix non-empty and the
    /// tail something other than a list.
    Cons(Vec<Term>, Box<Term>),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Term::Constant(Value::Atom(name.into()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Term::Constant(Value::Text(text.into()))
    }

    pub fn number(n: impl Into<Decimal>) -> Self {
        Term::Constant(Value::Number(n.into()))
    }

    pub fn list(items: Vec<Term>) -> Self {
        Term::Sequence(items)
    }

    /// `[items | tail]`, flattened when the tail is itself a list
    pub fn cons(mut items: Vec<Term>, tail: Term) -> Self {
        if items.is_empty() {
            return tail;
        }
        match tail {
            Term::Sequence(rest) => {
                items.extend(rest);
                Term::Sequence(items)
            }
            Term::Cons(rest, tail) => {
                items.extend(rest);
                Term::Cons(items, tail)
            }
            tail => Term::Cons(items, Box::new(tail)),
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Term::Constant(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Sequence(items) => items.iter().all(Term::is_ground),
            Term::Cons(items, tail) => items.iter().all(Term::is_ground) && tail.is_ground(),
        }
    }

    /// Nesting depth; constants and variables have depth 1
    pub fn depth(&self) -> usize {
        match self {
            Term::Sequence(items) => 1 + items.iter().map(Term::depth).max().unwrap_or(0),
            Term::Cons(items, tail) => {
                1 + items.iter().map(Term::depth).max().unwrap_or(0).max(tail.depth())
            }
            _ => 1,
        }
    }

    /// Append the variables of this term to `out`, first appearance first, without duplicates
    pub fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Term::Variable(name) => {
                if !out.iter().any(|seen| seen == name) {
                    out.push(name.clone());
                }
            }
            Term::Constant(_) => {}
            Term::Sequence(items) => {
                for item in items {
                    item.collect_variables(out);
                }
            }
            Term::Cons(items, tail) => {
                for item in items {
                    item.collect_variables(out);
                }
                tail.collect_variables(out);
            }
        }
    }

    /// Rebuild the term, replacing every variable with `f(name)`
    pub fn map_variables(&self, f: &mut impl FnMut(&str) -> Term) -> Term {
        match self {
            Term::Variable(name) => f(name),
            Term::Constant(_) => self.clone(),
            Term::Sequence(items) => {
                Term::Sequence(items.iter().map(|item| item.map_variables(f)).collect())
            }
            Term::Cons(items, tail) => {
                let items = items.iter().map(|item| item.map_variables(f)).collect();
                Term::cons(items, tail.map_variables(f))
            }
        }
    }

    /// Structural equality under [`Value::loosely_equals`]
    pub fn loosely_equals(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Variable(a), Term::Variable(b)) => a == b,
            (Term::Constant(a), Term::Constant(b)) => a.loosely_equals(b),
            (Term::Sequence(a), Term::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
            }
            (Term::Cons(a, a_tail), Term::Cons(b, b_tail)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
                    && a_tail.loosely_equals(b_tail)
            }
            _ => false,
        }
    }

    pub fn render(&self, vocabulary: Vocabulary) -> String {
        match self {
            Term::Variable(name) if name.starts_with('_') => "_".to_string(),
            Term::Variable(name) => format!("?{}", name),
            Term::Constant(value) => value.render(vocabulary),
            Term::Sequence(items) => format!("[{}]", render_terms(items, vocabulary)),
            Term::Cons(items, tail) => format!(
                "[{} | {}]",
                render_terms(items, vocabulary),
                tail.render(vocabulary)
            ),
        }
    }
}

fn render_terms(terms: &[Term], vocabulary: Vocabulary) -> String {
    terms
        .iter()
        .map(|term| term.render(vocabulary))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Vocabulary::Latin))
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Term::number(n)
    }
}

impl From<Decimal> for Term {
    fn from(n: Decimal) -> Self {
        Term::number(n)
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Self {
        Term::Constant(Value::Boolean(b))
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::atom(name)
    }
}

/// Terms serialize to plain JSON: numbers as numbers, atoms and text as
/// strings, sequences as arrays, unbound variables as `"?Name"`. A list with
/// an unbound tail serializes as its source text.
impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Term::Variable(name) => serializer.serialize_str(&format!("?{}", name)),
            Term::Constant(Value::Number(n)) => {
                if n.fract().is_zero() {
                    if let Some(i) = n.to_i64() {
                        return serializer.serialize_i64(i);
                    }
                }
                match n.to_f64() {
                    Some(f) => serializer.serialize_f64(f),
                    None => serializer.serialize_str(&n.to_string()),
                }
            }
            Term::Constant(Value::Text(text)) | Term::Constant(Value::Atom(text)) => {
                serializer.serialize_str(text)
            }
            Term::Constant(Value::Boolean(b)) => serializer.serialize_bool(*b),
            Term::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Term::Cons(..) => serializer.serialize_str(&self.render(Vocabulary::Latin)),
        }
    }
}

/// A predicate application `name(arg, ...)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub name: String,
    pub arguments: Vec<Term>,
}

impl Predicate {
    pub fn new(name: impl Into<String>, arguments: Vec<Term>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    pub fn key(&self) -> PredicateKey {
        PredicateKey::new(self.name.clone(), self.arity())
    }

    pub fn collect_variables(&self, out: &mut Vec<String>) {
        for argument in &self.arguments {
            argument.collect_variables(out);
        }
    }

    pub fn map_terms(&self, f: &mut impl FnMut(&Term) -> Term) -> Predicate {
        Predicate {
            name: self.name.clone(),
            arguments: self.arguments.iter().map(|arg| f(arg)).collect(),
        }
    }

    pub fn render(&self, vocabulary: Vocabulary) -> String {
        if self.arguments.is_empty() {
            self.name.clone()
        } else {
            format!("{}({})", self.name, render_terms(&self.arguments, vocabulary))
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Vocabulary::Latin))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOperation {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOperation::Add => "+",
            ArithmeticOperation::Subtract => "-",
            ArithmeticOperation::Multiply => "*",
            ArithmeticOperation::Divide => "/",
            ArithmeticOperation::Modulo => "%",
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            ArithmeticOperation::Add | ArithmeticOperation::Subtract => 1,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Equal,
    NotEqual,
}

impl ComparisonOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        }
    }
}

/// Right-hand side of `is` and both sides of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArithmeticExpression {
    Term(Term),
    Negate(Box<ArithmeticExpression>),
    Binary(
        Box<ArithmeticExpression>,
        ArithmeticOperation,
        Box<ArithmeticExpression>,
    ),
}

impl ArithmeticExpression {
    /// Parse a standalone formula such as `(?X + 2) * 3`
    pub fn parse(text: &str) -> crate::BayanResult<ArithmeticExpression> {
        crate::parser::parse_formula(text)
    }

    pub fn binary(
        left: ArithmeticExpression,
        operation: ArithmeticOperation,
        right: ArithmeticExpression,
    ) -> Self {
        ArithmeticExpression::Binary(Box::new(left), operation, Box::new(right))
    }

    pub fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            ArithmeticExpression::Term(term) => term.collect_variables(out),
            ArithmeticExpression::Negate(inner) => inner.collect_variables(out),
            ArithmeticExpression::Binary(left, _, right) => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
        }
    }

    pub fn map_terms(&self, f: &mut impl FnMut(&Term) -> Term) -> ArithmeticExpression {
        match self {
            ArithmeticExpression::Term(term) => ArithmeticExpression::Term(f(term)),
            ArithmeticExpression::Negate(inner) => {
                ArithmeticExpression::Negate(Box::new(inner.map_terms(f)))
            }
            ArithmeticExpression::Binary(left, op, right) => {
                let left = left.map_terms(f);
                let right = right.map_terms(f);
                ArithmeticExpression::binary(left, *op, right)
            }
        }
    }

    pub fn render(&self, vocabulary: Vocabulary) -> String {
        self.render_with_precedence(vocabulary, 0)
    }

    fn render_with_precedence(&self, vocabulary: Vocabulary, outer: u8) -> String {
        match self {
            ArithmeticExpression::Term(term) => term.render(vocabulary),
            ArithmeticExpression::Negate(inner) => {
                format!("-{}", inner.render_with_precedence(vocabulary, 3))
            }
            ArithmeticExpression::Binary(left, op, right) => {
                let precedence = op.precedence();
                let text = format!(
                    "{} {} {}",
                    left.render_with_precedence(vocabulary, precedence),
                    op.symbol(),
                    right.render_with_precedence(vocabulary, precedence + 1)
                );
                if precedence < outer {
                    format!("({})", text)
                } else {
                    text
                }
            }
        }
    }
}

impl From<Term> for ArithmeticExpression {
    fn from(term: Term) -> Self {
        ArithmeticExpression::Term(term)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NegationExpression {
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IsExpression {
    pub result: Term,
    pub expression: ArithmeticExpression,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComparisonExpression {
    pub left: ArithmeticExpression,
    pub operator: ComparisonOperator,
    pub right: ArithmeticExpression,
}

/// Shared shape of `findAll`, `bagOf` and `setOf`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectExpression {
    pub template: Term,
    pub goals: Vec<Goal>,
    pub result: Term,
}

/// `assert head` or `assert (head :- body)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssertExpression {
    pub head: Predicate,
    pub body: Vec<Goal>,
}

/// `retract head` removes a matching fact; `retract (head :- body)` removes an identical rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RetractExpression {
    pub head: Predicate,
    pub body: Vec<Goal>,
}

/// A single goal in a rule body or query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Goal {
    Call(Predicate),
    Cut,
    Not(NegationExpression),
    Unify(Term, Term),
    Is(IsExpression),
    Compare(ComparisonExpression),
    FindAll(CollectExpression),
    BagOf(CollectExpression),
    SetOf(CollectExpression),
    Assert(AssertExpression),
    Retract(RetractExpression),
}

impl Goal {
    pub fn call(name: impl Into<String>, arguments: Vec<Term>) -> Self {
        Goal::Call(Predicate::new(name, arguments))
    }

    pub fn not(goals: Vec<Goal>) -> Self {
        Goal::Not(NegationExpression { goals })
    }

    pub fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Goal::Call(predicate) => predicate.collect_variables(out),
            Goal::Cut => {}
            Goal::Not(negation) => collect_goal_variables(&negation.goals, out),
            Goal::Unify(left, right) => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
            Goal::Is(is) => {
                is.result.collect_variables(out);
                is.expression.collect_variables(out);
            }
            Goal::Compare(comparison) => {
                comparison.left.collect_variables(out);
                comparison.right.collect_variables(out);
            }
            Goal::FindAll(collect) | Goal::BagOf(collect) | Goal::SetOf(collect) => {
                collect.template.collect_variables(out);
                collect_goal_variables(&collect.goals, out);
                collect.result.collect_variables(out);
            }
            Goal::Assert(assert) => {
                assert.head.collect_variables(out);
                collect_goal_variables(&assert.body, out);
            }
            Goal::Retract(retract) => {
                retract.head.collect_variables(out);
                collect_goal_variables(&retract.body, out);
            }
        }
    }

    /// Rebuild the goal with `f` applied to every term it contains, nested goals included
    pub fn map_terms(&self, f: &mut impl FnMut(&Term) -> Term) -> Goal {
        match self {
            Goal::Call(predicate) => Goal::Call(predicate.map_terms(f)),
            Goal::Cut => Goal::Cut,
            Goal::Not(negation) => Goal::Not(NegationExpression {
                goals: map_goal_terms(&negation.goals, f),
            }),
            Goal::Unify(left, right) => Goal::Unify(f(left), f(right)),
            Goal::Is(is) => Goal::Is(IsExpression {
                result: f(&is.result),
                expression: is.expression.map_terms(f),
            }),
            Goal::Compare(comparison) => Goal::Compare(ComparisonExpression {
                left: comparison.left.map_terms(f),
                operator: comparison.operator,
                right: comparison.right.map_terms(f),
            }),
            Goal::FindAll(collect) => Goal::FindAll(map_collect(collect, f)),
            Goal::BagOf(collect) => Goal::BagOf(map_collect(collect, f)),
            Goal::SetOf(collect) => Goal::SetOf(map_collect(collect, f)),
            Goal::Assert(assert) => Goal::Assert(AssertExpression {
                head: assert.head.map_terms(f),
                body: map_goal_terms(&assert.body, f),
            }),
            Goal::Retract(retract) => Goal::Retract(RetractExpression {
                head: retract.head.map_terms(f),
                body: map_goal_terms(&retract.body, f),
            }),
        }
    }

    pub fn render(&self, vocabulary: Vocabulary) -> String {
        match self {
            Goal::Call(predicate) => predicate.render(vocabulary),
            Goal::Cut => Keyword::Cut.spelling(vocabulary).to_string(),
            Goal::Not(negation) => format!(
                "{} {}",
                Keyword::Not.spelling(vocabulary),
                render_nested(&negation.goals, vocabulary)
            ),
            Goal::Unify(left, right) => {
                format!("{} = {}", left.render(vocabulary), right.render(vocabulary))
            }
            Goal::Is(is) => format!(
                "{} {} {}",
                is.result.render(vocabulary),
                Keyword::Is.spelling(vocabulary),
                is.expression.render(vocabulary)
            ),
            Goal::Compare(comparison) => format!(
                "{} {} {}",
                comparison.left.render(vocabulary),
                comparison.operator.symbol(),
                comparison.right.render(vocabulary)
            ),
            Goal::FindAll(collect) => render_collect(Keyword::FindAll, collect, vocabulary),
            Goal::BagOf(collect) => render_collect(Keyword::BagOf, collect, vocabulary),
            Goal::SetOf(collect) => render_collect(Keyword::SetOf, collect, vocabulary),
            Goal::Assert(assert) => format!(
                "{} {}",
                Keyword::Assert.spelling(vocabulary),
                render_clause_form(&assert.head, &assert.body, vocabulary)
            ),
            Goal::Retract(retract) => format!(
                "{} {}",
                Keyword::Retract.spelling(vocabulary),
                render_clause_form(&retract.head, &retract.body, vocabulary)
            ),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Vocabulary::Latin))
    }
}

pub fn collect_goal_variables(goals: &[Goal], out: &mut Vec<String>) {
    for goal in goals {
        goal.collect_variables(out);
    }
}

pub fn map_goal_terms(goals: &[Goal], f: &mut impl FnMut(&Term) -> Term) -> Vec<Goal> {
    goals.iter().map(|goal| goal.map_terms(f)).collect()
}

fn map_collect(collect: &CollectExpression, f: &mut impl FnMut(&Term) -> Term) -> CollectExpression {
    CollectExpression {
        template: f(&collect.template),
        goals: map_goal_terms(&collect.goals, f),
        result: f(&collect.result),
    }
}

/// Render a conjunction with the vocabulary's separator
pub fn render_goals(goals: &[Goal], vocabulary: Vocabulary) -> String {
    let separator = match vocabulary {
        Vocabulary::Latin => ", ",
        Vocabulary::Arabic => "، ",
    };
    goals
        .iter()
        .map(|goal| goal.render(vocabulary))
        .collect::<Vec<_>>()
        .join(separator)
}

fn render_nested(goals: &[Goal], vocabulary: Vocabulary) -> String {
    match goals {
        [single @ Goal::Call(_)] => single.render(vocabulary),
        _ => format!("({})", render_goals(goals, vocabulary)),
    }
}

fn render_collect(keyword: Keyword, collect: &CollectExpression, vocabulary: Vocabulary) -> String {
    format!(
        "{}({}, {}, {})",
        keyword.spelling(vocabulary),
        collect.template.render(vocabulary),
        render_nested(&collect.goals, vocabulary),
        collect.result.render(vocabulary)
    )
}

fn render_clause_form(head: &Predicate, body: &[Goal], vocabulary: Vocabulary) -> String {
    if body.is_empty() {
        head.render(vocabulary)
    } else {
        format!(
            "({} :- {})",
            head.render(vocabulary),
            render_goals(body, vocabulary)
        )
    }
}

/// `fact head;`
#[derive(Debug, Clone, PartialEq)]
pub struct FactDeclaration {
    pub head: Predicate,
    pub span: Option<Span>,
}

/// `rule head :- body;`
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDeclaration {
    pub head: Predicate,
    pub body: Vec<Goal>,
    pub span: Option<Span>,
}

/// `query goals;`
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExpression {
    pub goals: Vec<Goal>,
    pub span: Option<Span>,
}

impl QueryExpression {
    /// Variables reported by this query, in first-appearance order
    pub fn variables(&self) -> Vec<String> {
        let mut variables = Vec::new();
        collect_goal_variables(&self.goals, &mut variables);
        variables.retain(|name| !name.starts_with('_'));
        variables
    }
}

/// Top-level `assert` or `retract`, executed in program order
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub goal: Goal,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Fact(FactDeclaration),
    Rule(RuleDeclaration),
    Query(QueryExpression),
    Directive(Directive),
}

impl Statement {
    pub fn span(&self) -> Option<&Span> {
        match self {
            Statement::Fact(fact) => fact.span.as_ref(),
            Statement::Rule(rule) => rule.span.as_ref(),
            Statement::Query(query) => query.span.as_ref(),
            Statement::Directive(directive) => directive.span.as_ref(),
        }
    }

    pub fn render(&self, vocabulary: Vocabulary) -> String {
        match self {
            Statement::Fact(fact) => format!(
                "{} {};",
                Keyword::Fact.spelling(vocabulary),
                fact.head.render(vocabulary)
            ),
            Statement::Rule(rule) => format!(
                "{} {} :- {};",
                Keyword::Rule.spelling(vocabulary),
                rule.head.render(vocabulary),
                render_goals(&rule.body, vocabulary)
            ),
            Statement::Query(query) => format!(
                "{} {};",
                Keyword::Query.spelling(vocabulary),
                render_goals(&query.goals, vocabulary)
            ),
            Statement::Directive(directive) => format!("{};", directive.goal.render(vocabulary)),
        }
    }
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub source_id: String,
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn facts(&self) -> impl Iterator<Item = &FactDeclaration> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::Fact(fact) => Some(fact),
            _ => None,
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = &RuleDeclaration> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::Rule(rule) => Some(rule),
            _ => None,
        })
    }

    pub fn queries(&self) -> impl Iterator<Item = &QueryExpression> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::Query(query) => Some(query),
            _ => None,
        })
    }
}
