//! Turning a parsed [`Query`] into a tree of matchers.
//!
//! Every atom is run through the query pipeline of its field, so query text
//! is normalized exactly as indexed text was. The resulting keys are looked
//! up in the index:
//!
//! | Atom | Pipeline | Looked up in |
//! |---|---|---|
//! | `'form'`, bare word | form | form |
//! | `<lemma>` | lemma | lemma |
//! | `[gloss]` | synset | lemma |
//! | `[#sense]` | synset | synset |
//! | `{field}` | semfield | semfield |
//! | `/label/` | morphosyntax | morphosyntax |
//! | `:ANN.` | annotation | annotation (pattern scan) |
//!
//! A trailing `*` expands against the terms of the looked-up field. An
//! annotation attached to a lemma or gloss only matches annotation keys
//! derived with one of the resolved lemmas; attached to anything else it
//! must occur at the same position.

use std::iter;

use ahash::AHashSet;

use crate::analysis::pipeline::AnalysisContext;
use crate::analysis::schema::{FieldKind, Schema};
use crate::analysis::token::Token;
use crate::analysis::token_filter::synset::SENSE_PREFIX;
use crate::config::EngineConfig;
use crate::error::{CylleneusError, Result};
use crate::index::IndexSnapshot;
use crate::morph::key::{AnnotationKey, LemmaKey};
use crate::morph::tag::Tag;
use crate::query::ast::{Atom, AtomKind, Query};
use crate::search::matcher::{
    AndMaybeMatcher, AndNotMatcher, BoostMatcher, ColocationMatcher, ConjunctionMatcher,
    DisjunctionMatcher, EmptyMatcher, Matcher, NotMatcher, Proximity, RequireMatcher,
    SequenceMatcher, TermMatcher,
};

/// Index terms an atom stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub field: FieldKind,
    pub terms: Vec<String>,
}

/// Builds matchers for queries against one index snapshot.
#[derive(Debug)]
pub struct QueryResolver<'a> {
    schema: &'a Schema,
    index: &'a dyn IndexSnapshot,
    config: &'a EngineConfig,
}

impl<'a> QueryResolver<'a> {
    pub fn new(schema: &'a Schema, index: &'a dyn IndexSnapshot, config: &'a EngineConfig) -> Self {
        QueryResolver {
            schema,
            index,
            config,
        }
    }

    /// Build the matcher for `query`, positioned on its first document.
    pub fn matcher(&self, query: &Query) -> Result<Box<dyn Matcher>> {
        let matcher: Box<dyn Matcher> = match query {
            Query::Atom(atom) => self.atom_matcher(atom)?,
            Query::Sequence { terms, slop } => {
                let weight = terms.len() as f32;
                let mut members = Vec::with_capacity(terms.len());
                for term in terms {
                    members.push((self.atom_matcher(&term.atom)?, term.boost.unwrap_or(weight)));
                }
                let proximity = Proximity::from_config(*slop, &self.config.matcher);
                Box::new(SequenceMatcher::new(members, proximity)?)
            }
            Query::And(queries) if queries.is_empty() => Box::new(EmptyMatcher::new()),
            Query::And(queries) => Box::new(ConjunctionMatcher::new(self.matchers(queries)?)?),
            Query::Or(queries) => Box::new(DisjunctionMatcher::new(self.matchers(queries)?)),
            Query::AndNot(positive, negative) => {
                Box::new(AndNotMatcher::new(self.matcher(positive)?, self.matcher(negative)?)?)
            }
            Query::AndMaybe(required, optional) => {
                Box::new(AndMaybeMatcher::new(self.matcher(required)?, self.matcher(optional)?)?)
            }
            Query::Require(scored, required) => {
                Box::new(RequireMatcher::new(self.matcher(scored)?, self.matcher(required)?)?)
            }
            Query::Not(query) => Box::new(NotMatcher::new(self.matcher(query)?, self.index.doc_ids())?),
            Query::Boost(query, boost) => Box::new(BoostMatcher::new(self.matcher(query)?, *boost)),
        };
        Ok(matcher)
    }

    fn matchers(&self, queries: &[Query]) -> Result<Vec<Box<dyn Matcher>>> {
        queries.iter().map(|query| self.matcher(query)).collect()
    }

    fn atom_matcher(&self, atom: &Atom) -> Result<Box<dyn Matcher>> {
        let Some(annotation) = &atom.annotation else {
            return self.term_matcher(&self.resolve(atom)?);
        };
        let resolved = self.resolve(atom)?;
        if resolved.field == FieldKind::Lemma {
            let uris: AHashSet<String> = resolved
                .terms
                .iter()
                .filter_map(|term| term.parse::<LemmaKey>().ok())
                .map(|key| key.uri)
                .collect();
            return self.term_matcher(&self.annotation_terms(annotation, Some(&uris))?);
        }
        let base = self.term_matcher(&resolved)?;
        let annotated = self.term_matcher(&self.annotation_terms(annotation, None)?)?;
        Ok(Box::new(ColocationMatcher::new(vec![base, annotated])?))
    }

    fn term_matcher(&self, resolved: &Resolved) -> Result<Box<dyn Matcher>> {
        if resolved.terms.is_empty() {
            return Ok(Box::new(EmptyMatcher::new()));
        }
        let postings = resolved
            .terms
            .iter()
            .map(|term| self.index.postings(resolved.field, term))
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(TermMatcher::from_terms(postings)))
    }

    /// The index terms an atom resolves to, ignoring any attached annotation.
    pub fn resolve(&self, atom: &Atom) -> Result<Resolved> {
        let (pipeline_field, field) = match atom.kind {
            AtomKind::Annotation => return self.annotation_terms(&atom.text, None),
            AtomKind::Gloss if atom.text.starts_with(SENSE_PREFIX) => {
                (FieldKind::Synset, FieldKind::Synset)
            }
            AtomKind::Gloss => (FieldKind::Synset, FieldKind::Lemma),
            kind => (kind.field(), kind.field()),
        };
        self.schema.require(field)?;
        let pipeline = self.schema.require(pipeline_field)?.query_pipeline();

        let mut token = Token::query(atom.text.as_str());
        token.reltype = atom.relation;
        token.language = atom.language.clone();
        let keys: Vec<String> = pipeline
            .run(Box::new(iter::once(token)), &AnalysisContext::query())?
            .map(|token| token.text)
            .collect();

        let terms = self.expand(field, keys)?;
        log::debug!("{atom} resolved to {} {field} terms", terms.len());
        Ok(Resolved { field, terms })
    }

    /// Replace prefix wildcards by the matching terms of `field`. A wildcard
    /// matching more than `max_expansions` terms is a query error.
    fn expand(&self, field: FieldKind, keys: Vec<String>) -> Result<Vec<String>> {
        let limit = self.config.query.max_expansions;
        let mut seen = AHashSet::new();
        let mut terms = Vec::new();
        for key in keys {
            let Some(prefix) = key.strip_suffix('*') else {
                if seen.insert(key.clone()) {
                    terms.push(key);
                }
                continue;
            };
            let matches = self.index.terms_with_prefix(field, prefix)?;
            if matches.len() > limit {
                return Err(CylleneusError::query(format!(
                    "'{key}' matches {} {field} terms, more than the {limit} allowed",
                    matches.len()
                )));
            }
            for term in matches {
                if seen.insert(term.clone()) {
                    terms.push(term);
                }
            }
        }
        Ok(terms)
    }

    /// Annotation keys satisfying an annotation pattern, restricted to the
    /// given lemma uris.
    fn annotation_terms(&self, annotation: &str, uris: Option<&AHashSet<String>>) -> Result<Resolved> {
        let pipeline = self.schema.require(FieldKind::Annotation)?.query_pipeline();
        let patterns: Vec<Tag> = pipeline
            .run(Box::new(iter::once(Token::query(annotation))), &AnalysisContext::query())?
            .filter_map(|token| token.text.parse().ok())
            .collect();

        let mut terms = Vec::new();
        if !patterns.is_empty() && uris.is_none_or(|uris| !uris.is_empty()) {
            for term in self.index.terms(FieldKind::Annotation)? {
                let Ok(key) = term.parse::<AnnotationKey>() else {
                    continue;
                };
                let lemma_matches = uris.is_none_or(|uris| uris.contains(&key.uri));
                if lemma_matches && patterns.iter().any(|pattern| key.satisfies(pattern, None)) {
                    terms.push(term);
                }
            }
        }
        log::debug!("annotation '{annotation}' resolved to {} keys", terms.len());
        Ok(Resolved {
            field: FieldKind::Annotation,
            terms,
        })
    }
}
