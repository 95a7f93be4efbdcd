mod common;

use std::sync::Arc;

use cylleneus::analysis::schema::{FieldKind, Schema};
use cylleneus::analysis::tokenizer::plain::PlainTextTokenizer;
use cylleneus::analysis::tokenizer::tagged::TaggedTokenizer;
use cylleneus::config::EngineConfig;
use cylleneus::error::Result;
use cylleneus::index::memory::MemoryIndex;
use cylleneus::lexicon::memory::MemoryWordNet;
use cylleneus::lexicon::wordnet::{LemmaEntry, WordNets};
use cylleneus::morph::descriptive::DescriptiveTagset;
use cylleneus::query::ast::Query;
use cylleneus::search::searcher::{Match, Searcher};

use common::{COURAGE, corpus};

fn doc_ids(searcher: &Searcher<'_>, query: &str) -> Result<Vec<u64>> {
    let query = searcher.parse(query)?;
    Ok(searcher.search_docs(&query)?.into_iter().map(|hit| hit.doc_id).collect())
}

fn matches(searcher: &Searcher<'_>, query: &str) -> Result<Vec<Match>> {
    searcher.search_str(query)?.collect()
}

#[test]
fn test_lemma_query() -> Result<()> {
    let corpus = corpus()?;
    let searcher = Searcher::new(&corpus.schema, &corpus.index);

    assert_eq!(doc_ids(&searcher, "<virtus>")?, vec![0, 1]);

    let query = searcher.parse("<virtus>")?;
    let Query::Atom(atom) = &query else {
        panic!("expected an atom, got {query:?}");
    };
    let resolved = searcher.resolver().resolve(atom)?;
    assert_eq!(resolved.field, FieldKind::Lemma);
    assert_eq!(resolved.terms, vec!["virtus:v0123=n-----f-3-".to_string()]);

    let spans: Vec<_> = matches(&searcher, "<virtus>")?
        .into_iter()
        .map(|m| (m.doc_id, m.startchar, m.endchar))
        .collect();
    assert_eq!(spans, vec![(0, 4, 11), (1, 0, 8)]);
    Ok(())
}

#[test]
fn test_annotation_query() -> Result<()> {
    let corpus = corpus()?;
    let searcher = Searcher::new(&corpus.schema, &corpus.index);

    assert_eq!(doc_ids(&searcher, ":ACC.SG.")?, vec![1, 2]);
    assert_eq!(doc_ids(&searcher, ":ACC.PL.")?, vec![0, 2, 3]);
    assert_eq!(doc_ids(&searcher, "<arma>:ACC.")?, vec![0, 2, 3]);
    assert_eq!(doc_ids(&searcher, "<virtus>:ACC.")?, vec![1]);
    Ok(())
}

#[test]
fn test_sequence_with_annotation() -> Result<()> {
    let corpus = corpus()?;
    let searcher = Searcher::new(&corpus.schema, &corpus.index);

    let found: Vec<_> = matches(&searcher, "\"cum :ABL.\"")?
        .into_iter()
        .map(|m| (m.doc_id, m.span_start, m.span_end, m.startchar, m.endchar))
        .collect();
    assert_eq!(found, vec![(0, 0, 2, 0, 11), (1, 1, 3, 9, 19)]);
    Ok(())
}

#[test]
fn test_gloss_queries() -> Result<()> {
    let corpus = corpus()?;
    let searcher = Searcher::new(&corpus.schema, &corpus.index);

    assert_eq!(doc_ids(&searcher, "[en?courage]")?, vec![0, 1]);
    assert_eq!(doc_ids(&searcher, &format!("[#{COURAGE}]"))?, vec![0, 1]);
    assert_eq!(doc_ids(&searcher, "[en?cowardice]")?, Vec::<u64>::new());
    Ok(())
}

#[test]
fn test_lexical_relation() -> Result<()> {
    let corpus = corpus()?;
    let searcher = Searcher::new(&corpus.schema, &corpus.index);

    assert_eq!(doc_ids(&searcher, "</::vir>")?, vec![0, 1]);
    assert_eq!(doc_ids(&searcher, "</::vir>:ABL.")?, vec![0]);
    Ok(())
}

#[test]
fn test_semantic_field() -> Result<()> {
    let corpus = corpus()?;
    let searcher = Searcher::new(&corpus.schema, &corpus.index);

    assert_eq!(doc_ids(&searcher, "{613}")?, vec![0, 1, 2, 3]);
    assert_eq!(doc_ids(&searcher, "{Military}")?, vec![0, 1, 2, 3]);
    assert_eq!(doc_ids(&searcher, "{180}")?, vec![0, 1]);
    assert_eq!(doc_ids(&searcher, "{180} ANDNOT <arma>")?, vec![1]);
    Ok(())
}

#[test]
fn test_boolean_combinations() -> Result<()> {
    let corpus = corpus()?;
    let searcher = Searcher::new(&corpus.schema, &corpus.index);

    assert_eq!(doc_ids(&searcher, "<gladius> AND <arma>")?, vec![3]);
    assert_eq!(doc_ids(&searcher, "<gladius> OR <vir>")?, vec![0, 1, 2, 3]);
    assert_eq!(doc_ids(&searcher, "+<arma> -<vir>")?, vec![3]);
    assert_eq!(doc_ids(&searcher, "NOT <arma>")?, vec![1]);
    Ok(())
}

fn annotated_corpus() -> Result<(Schema, MemoryIndex)> {
    let mut wordnet = MemoryWordNet::new("lat");
    wordnet
        .add_lemma(LemmaEntry::new("civis", "c0300", "n-----m-3-".parse()?))
        .add_lemma(LemmaEntry::new("urbs", "u0100", "n-----f-3-".parse()?));
    let schema = Schema::builder()
        .with_wordnets(WordNets::new().with(Arc::new(wordnet)))
        .with_tokenizer(Arc::new(TaggedTokenizer::new()))
        .with_tagset(Arc::new(DescriptiveTagset::new()))
        .build()?;

    let mut index = MemoryIndex::new();
    index.add_document(
        &schema,
        0,
        "civium\tcivis\tnoun masc/fem gen pl\tATR\nurbs\turbs\tnoun fem nom sg\tSBJ\n",
    )?;
    index.add_document(&schema, 1, "urbium\turbs\tnoun fem gen pl\tATR\n")?;
    Ok((schema, index))
}

#[test]
fn test_descriptive_tags_fan_out() -> Result<()> {
    let (schema, index) = annotated_corpus()?;
    let searcher = Searcher::new(&schema, &index);

    assert_eq!(doc_ids(&searcher, ":M.GEN.PL.")?, vec![0]);
    assert_eq!(doc_ids(&searcher, ":F.GEN.PL.")?, vec![0, 1]);
    assert_eq!(doc_ids(&searcher, ":N.GEN.PL.")?, Vec::<u64>::new());
    assert_eq!(doc_ids(&searcher, "<civis>:M.GEN.PL.")?, vec![0]);
    Ok(())
}

#[test]
fn test_relation_labels() -> Result<()> {
    let (schema, index) = annotated_corpus()?;
    let searcher = Searcher::new(&schema, &index);

    assert_eq!(doc_ids(&searcher, "/atr/")?, vec![0, 1]);
    assert_eq!(doc_ids(&searcher, "/SBJ/")?, vec![0]);
    assert_eq!(doc_ids(&searcher, "\"/atr/ /sbj/\"")?, vec![0]);
    Ok(())
}

fn structured_index(schema: &Schema) -> Result<MemoryIndex> {
    let mut index = MemoryIndex::new();
    index.add_document(schema, 0, "1.1\tarma virumque\n1.2\tcano Troiae")?;
    Ok(index)
}

#[test]
fn test_structural_slop() -> Result<()> {
    let schema = Schema::builder()
        .with_fields([FieldKind::Form])
        .with_tokenizer(Arc::new(PlainTextTokenizer::with_meta(["book", "line"])))
        .build()?;
    let index = structured_index(&schema)?;

    let searcher = Searcher::new(&schema, &index);
    let found = matches(&searcher, "\"arma cano\"")?;
    assert_eq!(found.len(), 1);
    assert_eq!((found[0].span_start, found[0].span_end), (0, 3));

    let mut config = EngineConfig::default();
    config.matcher.meta_min_slop = None;
    let strict = Searcher::new(&schema, &index).with_config(config);
    assert!(matches(&strict, "\"arma cano\"")?.is_empty());
    assert_eq!(matches(&strict, "\"arma cano\"~2")?.len(), 1);
    Ok(())
}
