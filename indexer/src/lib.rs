use anyhow::{Context, Result};
use search_core::persist::{save_frequencies, save_index, IndexPaths};
use search_core::IndexBuilder;
use std::path::Path;

pub mod corpus;

/// Progress is logged every this many documents.
const PROGRESS_EVERY: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub num_docs: usize,
    pub num_terms: usize,
}

/// Index every `*.txt` file in `corpus_dir`, write the binary index to `output`
/// and the term frequencies to `<output>.csv`.
pub fn build_index(corpus_dir: &Path, output: &Path) -> Result<BuildSummary> {
    let files = corpus::list_txt_files(corpus_dir);
    tracing::info!(corpus = %corpus_dir.display(), files = files.len(), "indexing corpus");

    let mut builder = IndexBuilder::new();
    for doc in corpus::read_corpus(files) {
        builder.add_document(doc.name, &doc.content)?;
        if builder.num_docs() % PROGRESS_EVERY == 0 {
            tracing::info!(processed = builder.num_docs(), "progress");
        }
    }
    tracing::info!(num_docs = builder.num_docs(), num_terms = builder.store().num_terms(), "ingested documents");

    let (index, frequencies) = builder.finalize();
    let paths = IndexPaths::new(output);
    save_index(&paths, &index).with_context(|| format!("writing index to {}", output.display()))?;
    if let Err(e) = save_frequencies(&paths, &frequencies) {
        tracing::warn!(path = %paths.frequencies().display(), error = %e, "frequency export failed");
    }

    Ok(BuildSummary { num_docs: index.num_docs(), num_terms: index.num_terms() })
}
