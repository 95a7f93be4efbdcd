//! The parsed form of a query.
//!
//! A [`Query`] is built once per query string and never mutated. Its
//! [`Display`](fmt::Display) implementation renders the canonical query
//! syntax, which parses back to an equal tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::schema::FieldKind;
use crate::lexicon::relation::Relation;

/// The sub-language of an atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AtomKind {
    /// `word` or `'word'`
    Form,
    /// `<lemma>`
    Lemma,
    /// `[gloss]`
    Gloss,
    /// `{semantic field}`
    Semfield,
    /// `/relation label/`
    Morphosyntax,
    /// `:GLOSS.` or `|code.` on its own
    Annotation,
}

impl AtomKind {
    /// The field an atom of this kind is looked up in before any redirection
    /// (glosses resolve to lemmas unless they name a raw sense).
    pub fn field(self) -> FieldKind {
        match self {
            AtomKind::Form => FieldKind::Form,
            AtomKind::Lemma | AtomKind::Gloss => FieldKind::Lemma,
            AtomKind::Semfield => FieldKind::Semfield,
            AtomKind::Morphosyntax => FieldKind::Morphosyntax,
            AtomKind::Annotation => FieldKind::Annotation,
        }
    }
}

/// One leaf of a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub kind: AtomKind,
    /// Text between the delimiters, without relation or language prefixes.
    pub text: String,
    /// Relation operator (`REL::text`).
    pub relation: Option<Relation>,
    /// Language of a cross-language gloss (`lang?text`).
    pub language: Option<String>,
    /// Annotation attached to the atom (`<virtus>:ABL.`).
    pub annotation: Option<String>,
}

impl Atom {
    pub fn new(kind: AtomKind, text: impl Into<String>) -> Self {
        Atom {
            kind,
            text: text.into(),
            relation: None,
            language: None,
            annotation: None,
        }
    }

    pub fn form(text: impl Into<String>) -> Self {
        Self::new(AtomKind::Form, text)
    }

    pub fn lemma(text: impl Into<String>) -> Self {
        Self::new(AtomKind::Lemma, text)
    }

    pub fn gloss(text: impl Into<String>) -> Self {
        Self::new(AtomKind::Gloss, text)
    }

    pub fn semfield(text: impl Into<String>) -> Self {
        Self::new(AtomKind::Semfield, text)
    }

    pub fn morphosyntax(text: impl Into<String>) -> Self {
        Self::new(AtomKind::Morphosyntax, text)
    }

    pub fn annotation(text: impl Into<String>) -> Self {
        Self::new(AtomKind::Annotation, text)
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = Some(relation);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Whether the atom ends in a prefix wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.text.ends_with('*')
    }

    fn is_plain_word(&self) -> bool {
        !self.text.is_empty()
            && self.text.chars().all(|c| c.is_alphanumeric() || c == '*' || c == '-')
            && !self.text.starts_with('-')
            && !super::lexer::is_operator_word(&self.text)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relation = self
            .relation
            .map(|relation| format!("{relation}::"))
            .unwrap_or_default();
        match self.kind {
            AtomKind::Form if self.is_plain_word() && self.annotation.is_none() => {
                write!(f, "{}", self.text)?
            }
            AtomKind::Form => write!(f, "'{}'", self.text)?,
            AtomKind::Lemma => write!(f, "<{relation}{}>", self.text)?,
            AtomKind::Gloss => {
                let language = self
                    .language
                    .as_ref()
                    .map(|language| format!("{language}?"))
                    .unwrap_or_default();
                write!(f, "[{language}{relation}{}]", self.text)?
            }
            AtomKind::Semfield => write!(f, "{{{}}}", self.text)?,
            AtomKind::Morphosyntax => write!(f, "/{}/", self.text)?,
            AtomKind::Annotation => write!(f, "{}", self.text)?,
        }
        if let Some(annotation) = &self.annotation {
            write!(f, "{annotation}")?;
        }
        Ok(())
    }
}

/// One member of a sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceTerm {
    pub atom: Atom,
    /// Explicit weight; members without one weigh as much as the sequence is long.
    pub boost: Option<f32>,
}

/// A parsed query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Query {
    Atom(Atom),
    /// `"a b c"~N`
    Sequence { terms: Vec<SequenceTerm>, slop: u32 },
    And(Vec<Query>),
    Or(Vec<Query>),
    /// Left, unless right also matches.
    AndNot(Box<Query>, Box<Query>),
    /// Left, scored higher when right also matches.
    AndMaybe(Box<Query>, Box<Query>),
    /// Left where right also matches, scored from left only.
    Require(Box<Query>, Box<Query>),
    Not(Box<Query>),
    Boost(Box<Query>, f32),
}

impl Query {
    pub fn atom(atom: Atom) -> Self {
        Query::Atom(atom)
    }

    /// Conjunction that collapses single members.
    pub fn and(mut queries: Vec<Query>) -> Self {
        if queries.len() == 1 {
            return queries.remove(0);
        }
        Query::And(queries)
    }

    /// Disjunction that collapses single members.
    pub fn or(mut queries: Vec<Query>) -> Self {
        if queries.len() == 1 {
            return queries.remove(0);
        }
        Query::Or(queries)
    }

    /// Every atom in the query, depth first.
    pub fn atoms(&self) -> Vec<&Atom> {
        let mut atoms = Vec::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms<'a>(&'a self, atoms: &mut Vec<&'a Atom>) {
        match self {
            Query::Atom(atom) => atoms.push(atom),
            Query::Sequence { terms, .. } => atoms.extend(terms.iter().map(|term| &term.atom)),
            Query::And(queries) | Query::Or(queries) => {
                queries.iter().for_each(|query| query.collect_atoms(atoms))
            }
            Query::AndNot(left, right) | Query::AndMaybe(left, right) | Query::Require(left, right) => {
                left.collect_atoms(atoms);
                right.collect_atoms(atoms);
            }
            Query::Not(query) | Query::Boost(query, _) => query.collect_atoms(atoms),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, queries: &[Query], operator: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, query) in queries.iter().enumerate() {
        if i > 0 {
            write!(f, " {operator} ")?;
        }
        write!(f, "{query}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Atom(atom) => write!(f, "{atom}"),
            Query::Sequence { terms, slop } => {
                write!(f, "\"")?;
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", term.atom)?;
                    if let Some(boost) = term.boost {
                        write!(f, "^{boost}")?;
                    }
                }
                write!(f, "\"~{slop}")
            }
            Query::And(queries) => join(f, queries, "AND"),
            Query::Or(queries) => join(f, queries, "OR"),
            Query::AndNot(left, right) => write!(f, "({left} ANDNOT {right})"),
            Query::AndMaybe(left, right) => write!(f, "({left} ANDMAYBE {right})"),
            Query::Require(left, right) => write!(f, "({left} REQUIRE {right})"),
            Query::Not(query) => write!(f, "NOT {query}"),
            Query::Boost(query, boost) => write!(f, "{query}^{boost}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_display() {
        assert_eq!(Atom::form("cum").to_string(), "cum");
        assert_eq!(Atom::form("arma uirumque").to_string(), "'arma uirumque'");
        assert_eq!(
            Atom::lemma("virtus").with_relation(Relation::DerivedForm).with_annotation(":ABL.").to_string(),
            "</::virtus>:ABL."
        );
        assert_eq!(
            Atom::gloss("courage").with_language("en").with_relation(Relation::Hypernym).to_string(),
            "[en?@::courage]"
        );
        assert_eq!(Atom::semfield("613").to_string(), "{613}");
        assert_eq!(Atom::morphosyntax("obj").to_string(), "/obj/");
        assert_eq!(Atom::annotation(":GEN.PL.").to_string(), ":GEN.PL.");
        assert_eq!(Atom::form("AND").to_string(), "'AND'");
    }

    #[test]
    fn test_query_display() {
        let query = Query::Or(vec![
            Query::And(vec![Query::atom(Atom::form("arma")), Query::atom(Atom::lemma("cano"))]),
            Query::Not(Box::new(Query::Boost(Box::new(Query::atom(Atom::form("uirum"))), 2.0))),
        ]);
        assert_eq!(query.to_string(), "((arma AND <cano>) OR NOT uirum^2)");

        let sequence = Query::Sequence {
            terms: vec![
                SequenceTerm { atom: Atom::form("cum"), boost: None },
                SequenceTerm { atom: Atom::annotation(":ABL."), boost: Some(3.0) },
            ],
            slop: 1,
        };
        assert_eq!(sequence.to_string(), "\"cum :ABL.^3\"~1");
    }

    #[test]
    fn test_atoms() {
        let query = Query::AndNot(
            Box::new(Query::atom(Atom::lemma("virtus"))),
            Box::new(Query::or(vec![Query::atom(Atom::semfield("613"))])),
        );
        let kinds: Vec<_> = query.atoms().iter().map(|atom| atom.kind).collect();
        assert_eq!(kinds, vec![AtomKind::Lemma, AtomKind::Semfield]);
    }
}
