use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Matches the signed 4-byte posting field on disk.
pub type DocId = i32;

/// Ascending, duplicate-free document ids for one term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingList(Vec<DocId>);

impl PostingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `doc_id` unless it is already the tail. Callers feed ids in
    /// non-decreasing order, which keeps the list sorted without a search.
    pub fn push(&mut self, doc_id: DocId) {
        if self.0.last() != Some(&doc_id) {
            self.0.push(doc_id);
        }
    }

    pub fn as_slice(&self) -> &[DocId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_strictly_ascending(&self) -> bool {
        self.0.windows(2).all(|w| w[0] < w[1])
    }

    pub(crate) fn extend_from(&mut self, other: &PostingList) {
        for &id in &other.0 {
            self.push(id);
        }
    }

    /// Restore the ordering invariant regardless of how ids were appended.
    pub(crate) fn normalize(&mut self) {
        self.0.sort_unstable();
        self.0.dedup();
    }
}

impl From<Vec<DocId>> for PostingList {
    /// Sorts and dedups, so any id vector becomes a valid list.
    fn from(ids: Vec<DocId>) -> Self {
        let mut list = PostingList(ids);
        list.normalize();
        list
    }
}

/// Read-only term -> posting list mapping plus the document-name table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    docs: Vec<String>,
    postings: HashMap<String, PostingList>,
}

impl InvertedIndex {
    pub fn new(docs: Vec<String>, postings: HashMap<String, PostingList>) -> Self {
        Self { docs, postings }
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn doc_names(&self) -> &[String] {
        &self.docs
    }

    /// Ids read from disk are not checked at load, so this may miss,
    /// negative ids included.
    pub fn doc_name(&self, doc_id: DocId) -> Option<&str> {
        let slot = usize::try_from(doc_id).ok()?;
        self.docs.get(slot).map(String::as_str)
    }

    /// Posting list for an already-normalized term; empty when absent.
    pub fn postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(PostingList::as_slice).unwrap_or(&[])
    }

    /// Vocabulary in ascending byte order. Hash iteration order is never used
    /// for anything observable.
    pub fn sorted_terms(&self) -> Vec<(&str, &PostingList)> {
        let mut terms: Vec<(&str, &PostingList)> =
            self.postings.iter().map(|(t, p)| (t.as_str(), p)).collect();
        terms.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
        terms
    }

    /// Every list strictly ascending and every id inside the name table.
    pub fn check_invariants(&self) -> bool {
        let n = self.docs.len();
        self.postings
            .values()
            .all(|p| p.is_strictly_ascending() && p.as_slice().iter().all(|&id| usize::try_from(id).map_or(false, |i| i < n)))
    }
}
