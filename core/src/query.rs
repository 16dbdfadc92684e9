//! Boolean AND/OR evaluation over posting lists.
//!
//! Queries are read strictly left to right with no precedence and no grouping:
//! `a OR b AND c` means `(a OR b) AND c`. A token between two terms that is
//! not `AND`/`OR` becomes another term joined by an implicit AND, so
//! `cat XOR dog` searches for the three terms `cat`, `xor`, `dog`.

use crate::index::{DocId, InvertedIndex};
use crate::tokenizer::normalize_term;
use std::io::{self, Write};

/// Answers list at most this many document names.
pub const MAX_DISPLAYED: usize = 15;

/// Terminates every answer block so a client can frame a stream of answers.
pub const END_MARKER: &str = "---END---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("AND") {
            Some(Operator::And)
        } else if token.eq_ignore_ascii_case("OR") {
            Some(Operator::Or)
        } else {
            None
        }
    }

    pub fn apply(self, acc: &[DocId], next: &[DocId]) -> Vec<DocId> {
        match self {
            Operator::And => intersect(acc, next),
            Operator::Or => union(acc, next),
        }
    }
}

/// A parsed query: the first term and the operator/term pairs that follow.
/// Terms are kept raw; normalization happens at evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub first: String,
    pub rest: Vec<(Operator, String)>,
}

/// Split a query line on whitespace. Returns `None` for a blank line. An
/// operator with nothing after it is dropped.
pub fn parse_query(line: &str) -> Option<Query> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?.to_string();
    let mut rest = Vec::new();
    while let Some(token) = parts.next() {
        match Operator::parse(token) {
            Some(op) => match parts.next() {
                Some(term) => rest.push((op, term.to_string())),
                None => break,
            },
            None => rest.push((Operator::And, token.to_string())),
        }
    }
    Some(Query { first, rest })
}

/// Ids present in both lists. Both inputs must be ascending and duplicate-free.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Ids present in either list. Both inputs must be ascending and duplicate-free.
pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(a.len() + b.len());
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else {
            out.push(b[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Matching doc ids for one query, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hits {
    pub doc_ids: Vec<DocId>,
}

impl Hits {
    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    /// Names of the first [`MAX_DISPLAYED`] hits. Ids outside the name table
    /// (possible with a hand-made index file) render as `(doc id N)`.
    pub fn displayed_names(&self, index: &InvertedIndex) -> Vec<String> {
        self.doc_ids
            .iter()
            .take(MAX_DISPLAYED)
            .map(|&id| match index.doc_name(id) {
                Some(name) => name.to_string(),
                None => format!("(doc id {id})"),
            })
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(MAX_DISPLAYED)
    }

    /// Write one framed answer block.
    pub fn render<W: Write>(&self, index: &InvertedIndex, mut out: W) -> io::Result<()> {
        writeln!(out, "Found {} documents:", self.len())?;
        for name in self.displayed_names(index) {
            writeln!(out, "{name}")?;
        }
        if self.remaining() > 0 {
            writeln!(out, "... and {} more", self.remaining())?;
        }
        writeln!(out, "{END_MARKER}")
    }
}

/// Evaluates queries against a loaded, read-only index.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &'a InvertedIndex {
        self.index
    }

    /// Posting list for one raw query term, normalized the way documents are.
    pub fn term_postings(&self, term: &str) -> &'a [DocId] {
        match normalize_term(term) {
            Some(stem) => self.index.postings(&stem),
            None => &[],
        }
    }

    pub fn evaluate(&self, query: &Query) -> Hits {
        let mut acc = self.term_postings(&query.first).to_vec();
        for (op, term) in &query.rest {
            acc = op.apply(&acc, self.term_postings(term));
        }
        Hits { doc_ids: acc }
    }

    /// Parse and evaluate one query line. A blank line matches nothing.
    pub fn search(&self, line: &str) -> Hits {
        let hits = parse_query(line).map(|q| self.evaluate(&q)).unwrap_or_default();
        tracing::debug!(query = line, hits = hits.len(), "query evaluated");
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::PostingList;
    use std::collections::HashMap;

    fn index() -> InvertedIndex {
        let mut postings = HashMap::new();
        postings.insert("cat".to_string(), PostingList::from(vec![0, 2]));
        postings.insert("dog".to_string(), PostingList::from(vec![1, 2]));
        postings.insert("rat".to_string(), PostingList::from(vec![2, 3]));
        postings.insert("xor".to_string(), PostingList::from(vec![2]));
        InvertedIndex::new((0..4).map(|i| format!("d{i}.txt")).collect(), postings)
    }

    #[test]
    fn parse_operators_case_insensitively() {
        let q = parse_query("cat and dog Or rat").unwrap();
        assert_eq!(q.first, "cat");
        assert_eq!(q.rest, vec![(Operator::And, "dog".to_string()), (Operator::Or, "rat".to_string())]);
        assert_eq!(parse_query("  \t "), None);
    }

    #[test]
    fn dangling_operator_is_ignored() {
        let q = parse_query("cat OR").unwrap();
        assert!(q.rest.is_empty());
    }

    #[test]
    fn operator_as_operand() {
        // the token after an operator is always a term, even if it spells AND
        let q = parse_query("cat AND and").unwrap();
        assert_eq!(q.rest, vec![(Operator::And, "and".to_string())]);
    }

    #[test]
    fn unknown_connective_becomes_implicit_and_term() {
        let idx = index();
        let engine = QueryEngine::new(&idx);
        assert_eq!(engine.search("cat XOR dog").doc_ids, vec![2]);
        assert_eq!(engine.search("cat dog rat").doc_ids, vec![2]);
    }

    #[test]
    fn strict_left_to_right() {
        let idx = index();
        let engine = QueryEngine::new(&idx);
        // (cat OR dog) AND rat, not cat OR (dog AND rat)
        assert_eq!(engine.search("cat OR dog AND rat").doc_ids, vec![2]);
        assert_eq!(engine.search("rat AND cat OR dog").doc_ids, vec![1, 2]);
    }

    #[test]
    fn missing_terms() {
        let idx = index();
        let engine = QueryEngine::new(&idx);
        assert!(engine.search("fish").is_empty());
        assert!(engine.search("cat AND fish").is_empty());
        assert_eq!(engine.search("fish OR cat").doc_ids, vec![0, 2]);
        assert_eq!(engine.search("cats").doc_ids, vec![0, 2]);
    }

    #[test]
    fn render_truncates_after_fifteen() {
        let ids: Vec<DocId> = (0..20).collect();
        let idx = InvertedIndex::new((0..18).map(|i| format!("f{i}")).collect(), HashMap::new());
        let hits = Hits { doc_ids: ids };
        let mut out = Vec::new();
        hits.render(&idx, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Found 20 documents:");
        assert_eq!(lines[1], "f0");
        assert_eq!(lines[15], "f14");
        assert_eq!(lines[16], "... and 5 more");
        assert_eq!(lines[17], END_MARKER);
        assert_eq!(lines.len(), 18);
    }

    #[test]
    fn render_out_of_range_ids() {
        let idx = InvertedIndex::new(vec!["only.txt".into()], HashMap::new());
        let hits = Hits { doc_ids: vec![0, 7] };
        let mut out = Vec::new();
        hits.render(&idx, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Found 2 documents:\nonly.txt\n(doc id 7)\n---END---\n");
    }
}
