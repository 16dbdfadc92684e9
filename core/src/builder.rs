use crate::error::{IndexError, Result};
use crate::index::{DocId, InvertedIndex, PostingList};
use crate::tokenizer::normalize;
use std::collections::HashMap;

/// Total occurrence count per term across the corpus.
pub type TermFrequencies = HashMap<String, u64>;

/// Posting lists and raw occurrence counters for one build session.
#[derive(Debug, Default)]
pub struct PostingStore {
    postings: HashMap<String, PostingList>,
    frequencies: TermFrequencies,
}

impl PostingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every stem of one document. `doc_id` must not be lower than any id
    /// ingested before.
    pub fn ingest<I, S>(&mut self, doc_id: DocId, stems: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for stem in stems {
            let stem = stem.into();
            *self.frequencies.entry(stem.clone()).or_insert(0) += 1;
            self.postings.entry(stem).or_default().push(doc_id);
        }
    }

    /// Fold in a store whose doc ids all come after the ones held here, e.g.
    /// one built by a worker over a later slice of the corpus.
    pub fn merge(&mut self, other: PostingStore) {
        for (term, list) in other.postings {
            self.postings.entry(term).or_default().extend_from(&list);
        }
        for (term, count) in other.frequencies {
            *self.frequencies.entry(term).or_insert(0) += count;
        }
    }

    pub fn postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(PostingList::as_slice).unwrap_or(&[])
    }

    pub fn frequency(&self, term: &str) -> u64 {
        self.frequencies.get(term).copied().unwrap_or(0)
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }
}

/// Owns the document-name table and the posting store for one build run.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    docs: Vec<String>,
    store: PostingStore,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next doc id to `name` and index `content`. Empty content still
    /// takes an id; it just contributes no postings.
    pub fn add_document(&mut self, name: impl Into<String>, content: &[u8]) -> Result<DocId> {
        let next = self.docs.len();
        if next > i32::MAX as usize {
            return Err(IndexError::TooManyDocuments(next + 1));
        }
        let doc_id = next as DocId;
        self.docs.push(name.into());
        self.store.ingest(doc_id, normalize(content));
        Ok(doc_id)
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn store(&self) -> &PostingStore {
        &self.store
    }

    /// Hand over the finished index and the frequency table. Posting lists are
    /// re-sorted in case a merge appended out of order.
    pub fn finalize(self) -> (InvertedIndex, TermFrequencies) {
        let PostingStore { mut postings, frequencies } = self.store;
        for list in postings.values_mut() {
            list.normalize();
        }
        tracing::debug!(num_docs = self.docs.len(), num_terms = postings.len(), "index finalized");
        (InvertedIndex::new(self.docs, postings), frequencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_terms_count_but_do_not_duplicate_postings() {
        let mut store = PostingStore::new();
        store.ingest(0, ["cat", "cat", "sat"]);
        store.ingest(1, ["cat"]);
        assert_eq!(store.postings("cat"), &[0, 1]);
        assert_eq!(store.frequency("cat"), 3);
        assert_eq!(store.frequency("sat"), 1);
        assert_eq!(store.frequency("dog"), 0);
    }

    #[test]
    fn merge_appends_later_ranges() {
        let mut left = PostingStore::new();
        left.ingest(0, ["a", "b"]);
        left.ingest(1, ["a"]);
        let mut right = PostingStore::new();
        right.ingest(1, ["a"]);
        right.ingest(2, ["b", "c"]);
        left.merge(right);
        assert_eq!(left.postings("a"), &[0, 1]);
        assert_eq!(left.postings("b"), &[0, 2]);
        assert_eq!(left.postings("c"), &[2]);
        assert_eq!(left.frequency("a"), 3);
    }

    #[test]
    fn builder_assigns_dense_ids() {
        let mut b = IndexBuilder::new();
        assert_eq!(b.add_document("a.txt", b"Cats sat").unwrap(), 0);
        assert_eq!(b.add_document("empty.txt", b"").unwrap(), 1);
        assert_eq!(b.add_document("c.txt", b"the cat").unwrap(), 2);
        let (idx, freqs) = b.finalize();
        assert_eq!(idx.num_docs(), 3);
        assert_eq!(idx.postings("cat"), &[0, 2]);
        assert_eq!(freqs["cat"], 2);
        assert!(idx.check_invariants());
    }
}
