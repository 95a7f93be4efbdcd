//! Query lexer.
//!
//! Splits a query string into [`Lexeme`]s. Bracketed atoms are read whole,
//! delimiters included, so their contents never clash with operator
//! characters (`</::virtus>` is one lemma lexeme, not a morphosyntax one).

use crate::error::{CylleneusError, Result};

/// Operator keywords, which must be written in capitals.
const OPERATORS: &[(&str, LexemeKind)] = &[
    ("AND", LexemeKind::And),
    ("OR", LexemeKind::Or),
    ("ANDNOT", LexemeKind::AndNot),
    ("ANDMAYBE", LexemeKind::AndMaybe),
    ("NOT", LexemeKind::Not),
    ("REQUIRE", LexemeKind::Require),
];

/// Characters that end a bare word.
const WORD_BREAKS: &[char] = &[
    '(', ')', '"', '\'', '<', '>', '[', ']', '{', '}', '/', '^', '~', ':', '|',
];

/// Whether `word` is an operator keyword.
pub fn is_operator_word(word: &str) -> bool {
    OPERATORS.iter().any(|(keyword, _)| *keyword == word)
}

#[derive(Clone, Debug, PartialEq)]
pub enum LexemeKind {
    /// Bare word.
    Word(String),
    /// `'text'`
    Quoted(String),
    /// `<text>`
    Lemma(String),
    /// `[text]`
    Gloss(String),
    /// `{text}`
    Semfield(String),
    /// `/text/`
    Morphosyntax(String),
    /// `:GLOSS.` or `|code.`, prefix included.
    Annotation(String),
    /// `"`
    DoubleQuote,
    /// `~N`
    Slop(u32),
    /// `^n`
    Boost(f32),
    And,
    Or,
    AndNot,
    AndMaybe,
    Not,
    Require,
    /// `+` before a term.
    Plus,
    /// `-` before a term.
    Minus,
    LParen,
    RParen,
}

/// A lexeme and where it starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    /// Character offset in the query.
    pub offset: usize,
    /// Whether whitespace (or the start of the query) precedes the lexeme.
    pub spaced: bool,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Read up to `close`, consuming both delimiters.
    fn delimited(&mut self, close: char, what: &str) -> Result<String> {
        let start = self.pos;
        self.pos += 1;
        let contents = self.take_while(|c| c != close);
        if self.peek() != Some(close) {
            return Err(CylleneusError::query(format!(
                "unterminated {what} starting at {start}: missing '{close}'"
            )));
        }
        self.pos += 1;
        let contents = contents.trim().to_string();
        if contents.is_empty() {
            return Err(CylleneusError::query(format!("empty {what} at {start}")));
        }
        Ok(contents)
    }

    fn next_kind(&mut self) -> Result<LexemeKind> {
        let offset = self.pos;
        let Some(c) = self.peek() else {
            return Err(CylleneusError::query("unexpected end of query"));
        };
        let kind = match c {
            '(' => {
                self.pos += 1;
                LexemeKind::LParen
            }
            ')' => {
                self.pos += 1;
                LexemeKind::RParen
            }
            '"' => {
                self.pos += 1;
                LexemeKind::DoubleQuote
            }
            '\'' => LexemeKind::Quoted(self.delimited('\'', "form")?),
            '<' => LexemeKind::Lemma(self.delimited('>', "lemma")?),
            '[' => LexemeKind::Gloss(self.delimited(']', "gloss")?),
            '{' => LexemeKind::Semfield(self.delimited('}', "semantic field")?),
            '/' => LexemeKind::Morphosyntax(self.delimited('/', "relation label")?),
            '~' => {
                self.pos += 1;
                let digits = self.take_while(|c| c.is_ascii_digit());
                let slop = digits.parse().map_err(|_| {
                    CylleneusError::query(format!("expected a number after '~' at {offset}"))
                })?;
                LexemeKind::Slop(slop)
            }
            '^' => {
                self.pos += 1;
                let digits = self.take_while(|c| c.is_ascii_digit() || c == '.');
                let boost: f32 = digits.parse().map_err(|_| {
                    CylleneusError::query(format!("expected a number after '^' at {offset}"))
                })?;
                LexemeKind::Boost(boost)
            }
            ':' | '|' => {
                self.pos += 1;
                let body = self.take_while(|c| c.is_alphanumeric() || c == '.' || c == '-');
                if body.is_empty() {
                    return Err(CylleneusError::query(format!("empty annotation at {offset}")));
                }
                LexemeKind::Annotation(format!("{c}{body}"))
            }
            '+' | '-' if self.peek_next().is_some_and(|next| !next.is_whitespace()) => {
                self.pos += 1;
                if c == '+' { LexemeKind::Plus } else { LexemeKind::Minus }
            }
            '>' | ']' | '}' => {
                return Err(CylleneusError::query(format!("unbalanced '{c}' at {offset}")));
            }
            _ => {
                let word = self.take_while(|c| !c.is_whitespace() && !WORD_BREAKS.contains(&c));
                match OPERATORS.iter().find(|(keyword, _)| *keyword == word) {
                    Some((_, operator)) => operator.clone(),
                    None if word == "+" || word == "-" => {
                        return Err(CylleneusError::query(format!("dangling '{word}' at {offset}")));
                    }
                    None => LexemeKind::Word(word),
                }
            }
        };
        Ok(kind)
    }
}

/// Split `query` into lexemes.
///
/// ```
/// use cylleneus::query::lexer::{LexemeKind, tokenize};
///
/// let kinds: Vec<_> = tokenize("<virtus>:ABL. OR arma^2")
///     .unwrap()
///     .into_iter()
///     .map(|lexeme| lexeme.kind)
///     .collect();
/// assert_eq!(
///     kinds,
///     vec![
///         LexemeKind::Lemma("virtus".to_string()),
///         LexemeKind::Annotation(":ABL.".to_string()),
///         LexemeKind::Or,
///         LexemeKind::Word("arma".to_string()),
///         LexemeKind::Boost(2.0),
///     ]
/// );
/// ```
pub fn tokenize(query: &str) -> Result<Vec<Lexeme>> {
    let mut lexer = Lexer {
        chars: query.chars().collect(),
        pos: 0,
    };
    let mut lexemes = Vec::new();
    let mut spaced = true;
    while let Some(c) = lexer.peek() {
        if c.is_whitespace() {
            lexer.pos += 1;
            spaced = true;
            continue;
        }
        let offset = lexer.pos;
        let kind = lexer.next_kind()?;
        lexemes.push(Lexeme { kind, offset, spaced });
        spaced = false;
    }
    Ok(lexemes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(query: &str) -> Vec<LexemeKind> {
        tokenize(query).unwrap().into_iter().map(|l| l.kind).collect()
    }

    #[test]
    fn test_brackets() {
        assert_eq!(
            kinds("'cum' <virtus> [en?courage] {613} /obj/"),
            vec![
                LexemeKind::Quoted("cum".into()),
                LexemeKind::Lemma("virtus".into()),
                LexemeKind::Gloss("en?courage".into()),
                LexemeKind::Semfield("613".into()),
                LexemeKind::Morphosyntax("obj".into()),
            ]
        );
    }

    #[test]
    fn test_relation_inside_lemma() {
        assert_eq!(
            kinds("</::virtus>:ABL."),
            vec![
                LexemeKind::Lemma("/::virtus".into()),
                LexemeKind::Annotation(":ABL.".into()),
            ]
        );
    }

    #[test]
    fn test_spacing_is_recorded() {
        let lexemes = tokenize("<arma> :ACC. <arma>:ACC.").unwrap();
        let spaced: Vec<bool> = lexemes.iter().map(|l| l.spaced).collect();
        assert_eq!(spaced, vec![true, true, true, false]);
    }

    #[test]
    fn test_operators_and_markers() {
        assert_eq!(
            kinds("+arma -uirum (a ANDNOT b) NOT c and"),
            vec![
                LexemeKind::Plus,
                LexemeKind::Word("arma".into()),
                LexemeKind::Minus,
                LexemeKind::Word("uirum".into()),
                LexemeKind::LParen,
                LexemeKind::Word("a".into()),
                LexemeKind::AndNot,
                LexemeKind::Word("b".into()),
                LexemeKind::RParen,
                LexemeKind::Not,
                LexemeKind::Word("c".into()),
                LexemeKind::Word("and".into()),
            ]
        );
    }

    #[test]
    fn test_sequence_slop_and_raw_code() {
        assert_eq!(
            kinds("\"cum |n-s----b--.\"~3"),
            vec![
                LexemeKind::DoubleQuote,
                LexemeKind::Word("cum".into()),
                LexemeKind::Annotation("|n-s----b--.".into()),
                LexemeKind::DoubleQuote,
                LexemeKind::Slop(3),
            ]
        );
    }

    #[test]
    fn test_errors() {
        assert!(tokenize("<virtus").is_err());
        assert!(tokenize("[]").is_err());
        assert!(tokenize("arma^").is_err());
        assert!(tokenize("\"a b\"~x").is_err());
        assert!(tokenize("arma]").is_err());
        assert!(tokenize("a - b").is_err());
    }
}
