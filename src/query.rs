//! The query language.
//!
//! - [`ast`] - The parsed query tree
//! - [`lexer`] - Query string to lexemes
//! - [`parser`] - Lexemes to [`ast::Query`]
//!
//! # Syntax
//!
//! | Syntax | Matches |
//! |---|---|
//! | `word`, `'word'` | a surface form (`word*` for a prefix) |
//! | `<lemma>` | every form of a lemma; `<REL::lemma>` follows a lexical relation |
//! | `[gloss]` | lemmas whose senses mention the gloss; `[lang?gloss]`, `[REL::gloss]`, `[#sense]` |
//! | `{field}` | lemmas in a semantic field, by code or name |
//! | `/label/` | tokens with a treebank relation label |
//! | `:GEN.PL.`, `\|n-p----g--.` | tokens with a morphological annotation |
//! | `"a b c"~N` | the terms in order, within `N` positions |
//!
//! Terms combine with `AND` (or juxtaposition), `OR`, `ANDNOT`, `ANDMAYBE`,
//! `REQUIRE`, `NOT`, `+`/`-` markers, parentheses and `^n` boosts.

pub mod ast;
pub mod lexer;
pub mod parser;
