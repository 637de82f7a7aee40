//! Bilingual keyword table
//!
//! Every keyword of the logic sublanguage has a canonical [`Keyword`] kind and
//! one or more spellings in each [`Vocabulary`]. The table is the single
//! source of truth for the parser (which resolves every keyword it matches
//! through [`Keyword::lookup`]), for the resolution engine (which recognises
//! the sequence builtins by name) and for rendering programs back to text.
//!
//! Spellings are case-sensitive and unique across the whole table, so the
//! mapping from spelling to kind is unambiguous. The first spelling listed
//! for a kind in a vocabulary is its preferred spelling.

use serde::Serialize;
use std::fmt;

/// Script family a keyword spelling belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    Latin,
    Arabic,
}

/// Canonical keyword kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Fact,
    Rule,
    Query,
    Implies,
    And,
    Not,
    Cut,
    FindAll,
    BagOf,
    SetOf,
    Assert,
    Retract,
    Is,
    Unify,
    Member,
    Append,
    Length,
    True,
    False,
}

/// One row of the keyword table
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KeywordSpelling {
    pub keyword: Keyword,
    pub vocabulary: Vocabulary,
    pub spelling: &'static str,
}

const fn latin(keyword: Keyword, spelling: &'static str) -> KeywordSpelling {
    KeywordSpelling {
        keyword,
        vocabulary: Vocabulary::Latin,
        spelling,
    }
}

const fn arabic(keyword: Keyword, spelling: &'static str) -> KeywordSpelling {
    KeywordSpelling {
        keyword,
        vocabulary: Vocabulary::Arabic,
        spelling,
    }
}

pub const KEYWORDS: &[KeywordSpelling] = &[
    latin(Keyword::Fact, "fact"),
    arabic(Keyword::Fact, "حقيقة"),
    latin(Keyword::Rule, "rule"),
    arabic(Keyword::Rule, "قاعدة"),
    latin(Keyword::Query, "query"),
    arabic(Keyword::Query, "استعلام"),
    latin(Keyword::Implies, "implies"),
    arabic(Keyword::Implies, "يستلزم"),
    latin(Keyword::And, "and"),
    arabic(Keyword::And, "و"),
    latin(Keyword::Not, "not"),
    arabic(Keyword::Not, "ليس"),
    latin(Keyword::Cut, "cut"),
    arabic(Keyword::Cut, "قطع"),
    arabic(Keyword::Cut, "اقطع"),
    latin(Keyword::FindAll, "findall"),
    latin(Keyword::FindAll, "findAll"),
    arabic(Keyword::FindAll, "اجمع_كل"),
    arabic(Keyword::FindAll, "اجمع"),
    latin(Keyword::BagOf, "bagof"),
    latin(Keyword::BagOf, "bagOf"),
    arabic(Keyword::BagOf, "كيس_من"),
    arabic(Keyword::BagOf, "كيس"),
    latin(Keyword::SetOf, "setof"),
    latin(Keyword::SetOf, "setOf"),
    arabic(Keyword::SetOf, "مجموعة_من"),
    arabic(Keyword::SetOf, "مجموعة"),
    latin(Keyword::Assert, "assert"),
    arabic(Keyword::Assert, "أضف"),
    arabic(Keyword::Assert, "اضف"),
    latin(Keyword::Retract, "retract"),
    arabic(Keyword::Retract, "احذف"),
    latin(Keyword::Is, "is"),
    arabic(Keyword::Is, "هو"),
    latin(Keyword::Unify, "unify"),
    arabic(Keyword::Unify, "يوحد"),
    latin(Keyword::Member, "member"),
    arabic(Keyword::Member, "عضو"),
    arabic(Keyword::Member, "عضو_في"),
    latin(Keyword::Append, "append"),
    arabic(Keyword::Append, "ألحق"),
    arabic(Keyword::Append, "الحق"),
    latin(Keyword::Length, "length"),
    arabic(Keyword::Length, "طول"),
    latin(Keyword::True, "true"),
    arabic(Keyword::True, "صحيح"),
    latin(Keyword::False, "false"),
    arabic(Keyword::False, "خطأ"),
    arabic(Keyword::False, "خاطئ"),
];

impl Keyword {
    pub const ALL: [Keyword; 19] = [
        Keyword::Fact,
        Keyword::Rule,
        Keyword::Query,
        Keyword::Implies,
        Keyword::And,
        Keyword::Not,
        Keyword::Cut,
        Keyword::FindAll,
        Keyword::BagOf,
        Keyword::SetOf,
        Keyword::Assert,
        Keyword::Retract,
        Keyword::Is,
        Keyword::Unify,
        Keyword::Member,
        Keyword::Append,
        Keyword::Length,
        Keyword::True,
        Keyword::False,
    ];

    /// Resolve a spelling in either vocabulary to its canonical kind
    pub fn lookup(spelling: &str) -> Option<Keyword> {
        KEYWORDS
            .iter()
            .find(|entry| entry.spelling == spelling)
            .map(|entry| entry.keyword)
    }

    /// All spellings of this keyword, in table order
    pub fn spellings(self) -> impl Iterator<Item = &'static KeywordSpelling> {
        KEYWORDS.iter().filter(move |entry| entry.keyword == self)
    }

    /// Preferred spelling in the given vocabulary
    pub fn spelling(self, vocabulary: Vocabulary) -> &'static str {
        self.spellings()
            .find(|entry| entry.vocabulary == vocabulary)
            .map(|entry| entry.spelling)
            .unwrap_or_else(|| self.canonical_name())
    }

    /// Stable ASCII name of the kind
    pub fn canonical_name(self) -> &'static str {
        match self {
            Keyword::Fact => "fact",
            Keyword::Rule => "rule",
            Keyword::Query => "query",
            Keyword::Implies => "implies",
            Keyword::And => "and",
            Keyword::Not => "not",
            Keyword::Cut => "cut",
            Keyword::FindAll => "findall",
            Keyword::BagOf => "bagof",
            Keyword::SetOf => "setof",
            Keyword::Assert => "assert",
            Keyword::Retract => "retract",
            Keyword::Is => "is",
            Keyword::Unify => "unify",
            Keyword::Member => "member",
            Keyword::Append => "append",
            Keyword::Length => "length",
            Keyword::True => "true",
            Keyword::False => "false",
        }
    }

    /// Kinds that name builtin predicates callable like user predicates
    pub fn is_builtin_predicate(self) -> bool {
        matches!(self, Keyword::Member | Keyword::Append | Keyword::Length)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// Builtin predicate named by `name` in any vocabulary, if any
pub fn builtin_predicate(name: &str) -> Option<Keyword> {
    Keyword::lookup(name).filter(|keyword| keyword.is_builtin_predicate())
}
