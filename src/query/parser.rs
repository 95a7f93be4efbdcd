//! Query parser for converting query strings to [`Query`] trees.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! or       := and ("OR" and)*
//! and      := marked (("AND")? marked)*
//! marked   := ("+" | "-")? binary
//! binary   := not (("ANDNOT" | "ANDMAYBE" | "REQUIRE") not)*
//! not      := "NOT" not | postfix
//! postfix  := primary ("^" number)?
//! primary  := "(" or ")" | sequence | atom annotation? | annotation
//! sequence := '"' (atom annotation? | annotation) ("^" number)? ... '"' ("~" number)?
//! ```
//!
//! Within an `and` list, `+term` marks a required term and `-term` an
//! excluded one. When required terms are present the unmarked ones become
//! optional (`ANDMAYBE`); excluded terms are subtracted (`ANDNOT`).
//!
//! An annotation written directly after a bracketed atom (`<virtus>:ABL.`,
//! `'cum':ABL.`) restricts that atom. After a bare word, a group, or
//! whitespace it is an atom of its own.

use crate::config::QueryConfig;
use crate::error::{CylleneusError, Result};
use crate::lexicon::relation::{Relation, RelationKind, SEPARATOR};
use crate::query::ast::{Atom, AtomKind, Query, SequenceTerm};
use crate::query::lexer::{Lexeme, LexemeKind, tokenize};

/// Parses query strings.
#[derive(Clone, Debug)]
pub struct QueryParser {
    /// Slop of sequences written without `~N`.
    default_slop: u32,
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryParser {
    pub fn new() -> Self {
        QueryParser { default_slop: 1 }
    }

    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new().with_default_slop(config.default_sequence_slop)
    }

    /// Set the slop of sequences written without `~N` (at least 1).
    pub fn with_default_slop(mut self, slop: u32) -> Self {
        self.default_slop = slop.max(1);
        self
    }

    pub fn default_slop(&self) -> u32 {
        self.default_slop
    }

    /// Parse a query string.
    ///
    /// An empty query parses to an empty disjunction, which matches nothing.
    ///
    /// ```
    /// use cylleneus::query::parser::QueryParser;
    ///
    /// let parser = QueryParser::new();
    /// let query = parser.parse("</::virtus>:ABL. OR \"cum :ABL.\"").unwrap();
    /// assert_eq!(query.to_string(), "(</::virtus>:ABL. OR \"cum :ABL.\"~1)");
    /// ```
    pub fn parse(&self, query: &str) -> Result<Query> {
        let lexemes = tokenize(query)?;
        if lexemes.is_empty() {
            return Ok(Query::Or(Vec::new()));
        }
        let mut parser = Parser {
            lexemes,
            pos: 0,
            default_slop: self.default_slop,
        };
        let parsed = parser.parse_or()?;
        if let Some(lexeme) = parser.peek() {
            return Err(CylleneusError::query(format!(
                "unexpected {} at {}",
                describe(&lexeme.kind),
                lexeme.offset
            )));
        }
        log::debug!("parsed query '{query}' as {parsed}");
        Ok(parsed)
    }
}

/// Builder for creating query parsers.
#[derive(Debug, Default)]
pub struct QueryParserBuilder {
    default_slop: Option<u32>,
}

impl QueryParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_slop(mut self, slop: u32) -> Self {
        self.default_slop = Some(slop);
        self
    }

    pub fn build(self) -> QueryParser {
        match self.default_slop {
            Some(slop) => QueryParser::new().with_default_slop(slop),
            None => QueryParser::new(),
        }
    }
}

fn describe(kind: &LexemeKind) -> String {
    match kind {
        LexemeKind::Word(word) => format!("'{word}'"),
        LexemeKind::Quoted(text) => format!("'{text}'"),
        LexemeKind::Lemma(text) => format!("<{text}>"),
        LexemeKind::Gloss(text) => format!("[{text}]"),
        LexemeKind::Semfield(text) => format!("{{{text}}}"),
        LexemeKind::Morphosyntax(text) => format!("/{text}/"),
        LexemeKind::Annotation(text) => text.clone(),
        LexemeKind::DoubleQuote => "'\"'".to_string(),
        LexemeKind::Slop(slop) => format!("'~{slop}'"),
        LexemeKind::Boost(boost) => format!("'^{boost}'"),
        LexemeKind::And => "AND".to_string(),
        LexemeKind::Or => "OR".to_string(),
        LexemeKind::AndNot => "ANDNOT".to_string(),
        LexemeKind::AndMaybe => "ANDMAYBE".to_string(),
        LexemeKind::Not => "NOT".to_string(),
        LexemeKind::Require => "REQUIRE".to_string(),
        LexemeKind::Plus => "'+'".to_string(),
        LexemeKind::Minus => "'-'".to_string(),
        LexemeKind::LParen => "'('".to_string(),
        LexemeKind::RParen => "')'".to_string(),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Marker {
    Plain,
    Required,
    Excluded,
}

struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
    default_slop: u32,
}

impl Parser {
    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&LexemeKind> {
        self.peek().map(|lexeme| &lexeme.kind)
    }

    fn advance(&mut self) -> Option<Lexeme> {
        let lexeme = self.lexemes.get(self.pos).cloned();
        self.pos += 1;
        lexeme
    }

    fn error_here(&self, expected: &str) -> CylleneusError {
        match self.peek() {
            Some(lexeme) => CylleneusError::query(format!(
                "expected {expected} at {}, found {}",
                lexeme.offset,
                describe(&lexeme.kind)
            )),
            None => CylleneusError::query(format!("expected {expected} at end of query")),
        }
    }

    fn parse_or(&mut self) -> Result<Query> {
        let mut queries = vec![self.parse_and()?];
        while self.peek_kind() == Some(&LexemeKind::Or) {
            self.advance();
            queries.push(self.parse_and()?);
        }
        Ok(Query::or(queries))
    }

    fn ends_and(&self) -> bool {
        matches!(self.peek_kind(), None | Some(LexemeKind::RParen) | Some(LexemeKind::Or))
    }

    fn parse_and(&mut self) -> Result<Query> {
        let mut items = Vec::new();
        loop {
            if self.ends_and() {
                break;
            }
            if self.peek_kind() == Some(&LexemeKind::And) {
                if items.is_empty() {
                    return Err(self.error_here("a term before AND"));
                }
                self.advance();
                if self.ends_and() {
                    return Err(self.error_here("a term after AND"));
                }
            }
            items.push(self.parse_marked()?);
        }
        if items.is_empty() {
            return Err(self.error_here("a query term"));
        }
        Ok(combine(items))
    }

    fn parse_marked(&mut self) -> Result<(Marker, Query)> {
        let marker = match self.peek_kind() {
            Some(LexemeKind::Plus) => Marker::Required,
            Some(LexemeKind::Minus) => Marker::Excluded,
            _ => Marker::Plain,
        };
        if marker != Marker::Plain {
            self.advance();
        }
        Ok((marker, self.parse_binary()?))
    }

    fn parse_binary(&mut self) -> Result<Query> {
        let mut left = self.parse_not()?;
        loop {
            let combine: fn(Box<Query>, Box<Query>) -> Query = match self.peek_kind() {
                Some(LexemeKind::AndNot) => Query::AndNot,
                Some(LexemeKind::AndMaybe) => Query::AndMaybe,
                Some(LexemeKind::Require) => Query::Require,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_not()?;
            left = combine(Box::new(left), Box::new(right));
        }
    }

    fn parse_not(&mut self) -> Result<Query> {
        if self.peek_kind() == Some(&LexemeKind::Not) {
            self.advance();
            return Ok(Query::Not(Box::new(self.parse_not()?)));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Query> {
        let query = self.parse_primary()?;
        match self.take_boost() {
            Some(boost) => Ok(Query::Boost(Box::new(query), boost)),
            None => Ok(query),
        }
    }

    fn take_boost(&mut self) -> Option<f32> {
        match self.peek() {
            Some(Lexeme {
                kind: LexemeKind::Boost(boost),
                spaced: false,
                ..
            }) => {
                let boost = *boost;
                self.advance();
                Some(boost)
            }
            _ => None,
        }
    }

    fn parse_primary(&mut self) -> Result<Query> {
        match self.peek_kind() {
            Some(LexemeKind::LParen) => {
                self.advance();
                let query = self.parse_or()?;
                if self.peek_kind() != Some(&LexemeKind::RParen) {
                    return Err(self.error_here("')'"));
                }
                self.advance();
                Ok(query)
            }
            Some(LexemeKind::DoubleQuote) => self.parse_sequence(),
            _ => Ok(Query::Atom(self.parse_atom()?)),
        }
    }

    fn parse_sequence(&mut self) -> Result<Query> {
        let start = self.advance().map(|lexeme| lexeme.offset).unwrap_or_default();
        let mut terms = Vec::new();
        loop {
            match self.peek_kind() {
                Some(LexemeKind::DoubleQuote) => {
                    self.advance();
                    break;
                }
                None => {
                    return Err(CylleneusError::query(format!(
                        "unterminated sequence starting at {start}"
                    )));
                }
                _ => {
                    let atom = self.parse_atom()?;
                    let boost = self.take_boost();
                    terms.push(SequenceTerm { atom, boost });
                }
            }
        }

        let slop = match self.peek_kind() {
            Some(LexemeKind::Slop(slop)) => {
                let slop = (*slop).max(1);
                self.advance();
                slop
            }
            _ => self.default_slop,
        };

        match terms.len() {
            0 => Err(CylleneusError::query(format!("empty sequence at {start}"))),
            1 => {
                let term = terms.remove(0);
                let atom = Query::Atom(term.atom);
                Ok(match term.boost {
                    Some(boost) => Query::Boost(Box::new(atom), boost),
                    None => atom,
                })
            }
            _ => Ok(Query::Sequence { terms, slop }),
        }
    }

    fn parse_atom(&mut self) -> Result<Atom> {
        let Some(lexeme) = self.peek().cloned() else {
            return Err(self.error_here("a term"));
        };
        let (mut atom, bracketed) = match lexeme.kind {
            LexemeKind::Word(word) => (Atom::form(word), false),
            LexemeKind::Quoted(text) => (plain(AtomKind::Form, &text)?, true),
            LexemeKind::Lemma(text) => (lemma(&text)?, true),
            LexemeKind::Gloss(text) => (gloss(&text)?, true),
            LexemeKind::Semfield(text) => (plain(AtomKind::Semfield, &text)?, true),
            LexemeKind::Morphosyntax(text) => (plain(AtomKind::Morphosyntax, &text)?, true),
            LexemeKind::Annotation(text) => (Atom::annotation(text), false),
            _ => return Err(self.error_here("a term")),
        };
        self.advance();

        while bracketed
            && let Some(Lexeme {
                kind: LexemeKind::Annotation(annotation),
                spaced: false,
                ..
            }) = self.peek()
        {
            if atom.annotation.is_some() {
                return Err(self.error_here("a single annotation per term"));
            }
            atom.annotation = Some(annotation.clone());
            self.advance();
        }
        Ok(atom)
    }
}

/// Fold a `+`/`-` marked list into one query.
fn combine(items: Vec<(Marker, Query)>) -> Query {
    let mut plain = Vec::new();
    let mut required = Vec::new();
    let mut excluded = Vec::new();
    for (marker, query) in items {
        match marker {
            Marker::Plain => plain.push(query),
            Marker::Required => required.push(query),
            Marker::Excluded => excluded.push(query),
        }
    }

    let base = match (required.is_empty(), plain.is_empty()) {
        (true, true) => None,
        (true, false) => Some(Query::and(plain)),
        (false, true) => Some(Query::and(required)),
        (false, false) => Some(Query::AndMaybe(
            Box::new(Query::and(required)),
            Box::new(Query::and(plain)),
        )),
    };
    if excluded.is_empty() {
        return base.unwrap_or(Query::And(Vec::new()));
    }
    let excluded = Box::new(Query::or(excluded));
    match base {
        Some(base) => Query::AndNot(Box::new(base), excluded),
        None => Query::Not(excluded),
    }
}

fn reject_relation(kind: AtomKind, text: &str) -> Result<()> {
    if text.contains(SEPARATOR) {
        return Err(CylleneusError::query(format!(
            "relation operators are not allowed in {kind:?} terms: '{text}'"
        )));
    }
    Ok(())
}

fn plain(kind: AtomKind, text: &str) -> Result<Atom> {
    reject_relation(kind, text)?;
    Ok(Atom::new(kind, text))
}

/// `REL::operand`, checking the relation suits the bracket.
fn relation(text: &str, allowed: RelationKind, bracket: &str) -> Result<(Option<Relation>, String)> {
    match Relation::split(text)? {
        Some((relation, operand)) => {
            if relation.kind() != allowed {
                return Err(CylleneusError::query(format!(
                    "relation '{relation}' cannot be used in {bracket}"
                )));
            }
            let operand = operand.trim();
            if operand.is_empty() {
                return Err(CylleneusError::query(format!("relation '{relation}' has no operand")));
            }
            Ok((Some(relation), operand.to_string()))
        }
        None => Ok((None, text.to_string())),
    }
}

fn lemma(text: &str) -> Result<Atom> {
    let (relation, operand) = relation(text, RelationKind::Lexical, "<…>")?;
    let mut atom = Atom::lemma(operand.as_str());
    atom.relation = relation;

    // `<virtus:ABL.>` carries its annotation inside the brackets
    if let Some((lemma, suffix)) = operand.split_once(':')
        && suffix.ends_with('.')
        && !suffix.contains('=')
    {
        atom.text = lemma.to_string();
        atom.annotation = Some(format!(":{suffix}"));
    }
    Ok(atom)
}

fn gloss(text: &str) -> Result<Atom> {
    let (language, rest) = match text.split_once('?') {
        Some((language, rest)) => {
            let language = language.trim();
            if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(CylleneusError::query(format!("invalid gloss language '{language}'")));
            }
            (Some(language.to_string()), rest.trim())
        }
        None => (None, text),
    };
    let (relation, operand) = relation(rest, RelationKind::Semantic, "[…]")?;
    if operand.is_empty() {
        return Err(CylleneusError::query(format!("empty gloss '{text}'")));
    }
    let mut atom = Atom::gloss(operand);
    atom.relation = relation;
    atom.language = language;
    Ok(atom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Query {
        QueryParser::new().parse(query).unwrap()
    }

    fn form(text: &str) -> Query {
        Query::Atom(Atom::form(text))
    }

    #[test]
    fn test_bracket_atoms() {
        assert_eq!(parse("<virtus>"), Query::Atom(Atom::lemma("virtus")));
        assert_eq!(parse("'uirtutem'"), form("uirtutem"));
        assert_eq!(parse("{613}"), Query::Atom(Atom::semfield("613")));
        assert_eq!(parse("/obj/"), Query::Atom(Atom::morphosyntax("obj")));
        assert_eq!(parse(":ACC.SG."), Query::Atom(Atom::annotation(":ACC.SG.")));
        assert_eq!(parse("virt*"), form("virt*"));
    }

    #[test]
    fn test_relation_before_annotation() {
        assert_eq!(
            parse("</::virtus>:ABL."),
            Query::Atom(
                Atom::lemma("virtus")
                    .with_relation(Relation::DerivedForm)
                    .with_annotation(":ABL.")
            )
        );
        assert_eq!(
            parse("<virtus:ABL.>"),
            Query::Atom(Atom::lemma("virtus").with_annotation(":ABL."))
        );
        assert_eq!(
            parse("<virtus:v0123=n-----f-3->"),
            Query::Atom(Atom::lemma("virtus:v0123=n-----f-3-"))
        );
    }

    #[test]
    fn test_gloss_prefixes() {
        assert_eq!(
            parse("[en?courage]"),
            Query::Atom(Atom::gloss("courage").with_language("en"))
        );
        assert_eq!(
            parse("[@::courage]"),
            Query::Atom(Atom::gloss("courage").with_relation(Relation::Hypernym))
        );
        assert_eq!(parse("[#n#04829550]"), Query::Atom(Atom::gloss("#n#04829550")));
    }

    #[test]
    fn test_relation_must_suit_bracket() {
        let parser = QueryParser::new();
        assert!(parser.parse("<@::virtus>").is_err());
        assert!(parser.parse("[\\::courage]").is_err());
        assert!(parser.parse("{@::613}").is_err());
        assert!(parser.parse("<?::virtus>").is_err());
        assert!(parser.parse("</::>").is_err());
    }

    #[test]
    fn test_annotation_attaches_only_to_brackets() {
        assert_eq!(
            parse("'cum':ABL."),
            Query::Atom(Atom::form("cum").with_annotation(":ABL."))
        );
        assert_eq!(
            parse("cum:ABL."),
            Query::And(vec![form("cum"), Query::Atom(Atom::annotation(":ABL."))])
        );
        assert_eq!(
            parse("<cum> :ABL."),
            Query::And(vec![
                Query::Atom(Atom::lemma("cum")),
                Query::Atom(Atom::annotation(":ABL."))
            ])
        );
        assert!(QueryParser::new().parse("<cum>:ABL.:SG.").is_err());
    }

    #[test]
    fn test_sequences() {
        assert_eq!(
            parse("\"cum :ABL.\""),
            Query::Sequence {
                terms: vec![
                    SequenceTerm { atom: Atom::form("cum"), boost: None },
                    SequenceTerm { atom: Atom::annotation(":ABL."), boost: None },
                ],
                slop: 1,
            }
        );

        let Query::Sequence { terms, slop } = parse("\"arma^3 <cano>\"~4") else {
            panic!("expected a sequence");
        };
        assert_eq!(slop, 4);
        assert_eq!(terms[0].boost, Some(3.0));
        assert_eq!(terms[1].atom, Atom::lemma("cano"));

        let Query::Sequence { slop, .. } = parse("\"a b\"~0") else {
            panic!("expected a sequence");
        };
        assert_eq!(slop, 1);

        assert_eq!(parse("\"arma\""), form("arma"));
    }

    #[test]
    fn test_default_slop() {
        let parser = QueryParserBuilder::new().default_slop(3).build();
        let Query::Sequence { slop, .. } = parser.parse("\"a b\"").unwrap() else {
            panic!("expected a sequence");
        };
        assert_eq!(slop, 3);
        assert_eq!(QueryParser::new().with_default_slop(0).default_slop(), 1);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("a b OR c"),
            Query::Or(vec![Query::And(vec![form("a"), form("b")]), form("c")])
        );
        assert_eq!(
            parse("a AND b ANDNOT c"),
            Query::And(vec![
                form("a"),
                Query::AndNot(Box::new(form("b")), Box::new(form("c")))
            ])
        );
        assert_eq!(
            parse("NOT a ANDMAYBE b"),
            Query::AndMaybe(
                Box::new(Query::Not(Box::new(form("a")))),
                Box::new(form("b"))
            )
        );
        assert_eq!(
            parse("a REQUIRE b^2"),
            Query::Require(
                Box::new(form("a")),
                Box::new(Query::Boost(Box::new(form("b")), 2.0))
            )
        );
        assert_eq!(
            parse("(a OR b)^1.5 c"),
            Query::And(vec![
                Query::Boost(Box::new(Query::Or(vec![form("a"), form("b")])), 1.5),
                form("c")
            ])
        );
    }

    #[test]
    fn test_plus_minus() {
        assert_eq!(
            parse("+a b -c"),
            Query::AndNot(
                Box::new(Query::AndMaybe(Box::new(form("a")), Box::new(form("b")))),
                Box::new(form("c"))
            )
        );
        assert_eq!(parse("-a"), Query::Not(Box::new(form("a"))));
        assert_eq!(parse("+a +b"), Query::And(vec![form("a"), form("b")]));
    }

    #[test]
    fn test_syntax_errors() {
        let parser = QueryParser::new();
        for query in [
            "(a OR b",
            "a OR b)",
            "AND a",
            "a AND",
            "a OR",
            "\"a b",
            "\"\"",
            "\"a (b)\"",
            "a ~2",
            "[?courage]",
            "^2",
        ] {
            assert!(parser.parse(query).is_err(), "{query} should not parse");
        }
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(parse("   "), Query::Or(Vec::new()));
        assert_eq!(parse("   ").to_string(), "()");
    }

    #[test]
    fn test_display_parses_back() {
        for query in [
            "</::virtus>:ABL. OR \"cum :ABL.\"~2",
            "+[en?courage] {613} -/obj/",
            "'arma uirumque'^2 ANDNOT (<cano> OR NOT :GEN.PL.)",
            "[#n#04829550]:ACC. REQUIRE |n-p----g--.",
        ] {
            let parsed = parse(query);
            assert_eq!(parse(&parsed.to_string()), parsed, "{query}");
        }
    }
}
