mod common;

use cylleneus::analysis::schema::FieldKind;
use cylleneus::error::Result;
use cylleneus::search::searcher::Searcher;

use common::{DOCUMENTS, corpus};

#[test]
fn test_reanalysis_is_served_from_cache() -> Result<()> {
    let corpus = corpus()?;
    let schema = &corpus.schema;

    let first = schema.analyze_document(7, DOCUMENTS[0])?;
    let wordnet_calls = corpus.wordnet.calls();
    let lemmatizer_calls = corpus.lemmatizer.calls();
    let hits: Vec<usize> = schema.caches().iter().map(|cache| cache.hits()).collect();

    let second = schema.analyze_document(7, DOCUMENTS[0])?;
    assert_eq!(first, second);
    assert_eq!(corpus.wordnet.calls(), wordnet_calls);
    assert_eq!(corpus.lemmatizer.calls(), lemmatizer_calls);
    for (cache, before) in schema.caches().iter().zip(hits) {
        assert!(cache.hits() > before, "{cache:?} was not hit");
        assert_eq!(cache.cached_docix(), Some(7));
    }
    Ok(())
}

#[test]
fn test_new_document_replaces_cache() -> Result<()> {
    let corpus = corpus()?;
    let schema = &corpus.schema;

    schema.analyze_document(10, DOCUMENTS[1])?;
    let misses: Vec<usize> = schema.caches().iter().map(|cache| cache.misses()).collect();
    let fields = schema.analyze_document(11, DOCUMENTS[2])?;

    for (cache, before) in schema.caches().iter().zip(misses) {
        assert_eq!(cache.misses(), before + 1);
        assert_eq!(cache.cached_docix(), Some(11));
    }
    let mut lemmas = fields
        .iter()
        .find(|(kind, _)| *kind == FieldKind::Lemma)
        .map(|(_, tokens)| tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>())
        .unwrap_or_default();
    lemmas.dedup();
    assert_eq!(lemmas, vec!["arma:a0100=n-p---n-2-", "vir:v0100=n-----m-2-"]);
    Ok(())
}

#[test]
fn test_queries_leave_caches_alone() -> Result<()> {
    let corpus = corpus()?;
    let schema = &corpus.schema;
    let counters = || -> Vec<(usize, usize, Option<u64>)> {
        schema
            .caches()
            .iter()
            .map(|cache| (cache.hits(), cache.misses(), cache.cached_docix()))
            .collect()
    };
    let before = counters();

    let searcher = Searcher::new(schema, &corpus.index);
    for query in ["<virtus>", "[en?courage]", "{613}", "\"cum :ABL.\"", "</::vir>:ABL."] {
        searcher.search_str(query)?.collect::<Result<Vec<_>>>()?;
    }
    assert_eq!(counters(), before);
    Ok(())
}
