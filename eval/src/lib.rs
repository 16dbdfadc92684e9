//! Retrieval evaluation over a built index.
//!
//! `generate` runs a query file through [`QueryEngine`] and writes a results
//! file (`qid doc rank`) plus term-count relevance judgments (`qid doc rel`).
//! `score` reads both back and reports P@k, nDCG@k and ERR@k per query.

use anyhow::{bail, Context, Result};
use search_core::tokenizer::tokenize;
use search_core::QueryEngine;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod metrics;

/// Cutoffs reported for every query.
pub const CUTOFFS: [usize; 4] = [1, 5, 10, 20];

/// Judged relevance by query id, then document name.
pub type Qrels = HashMap<String, HashMap<String, f64>>;

/// Retrieved documents of one query in rank order.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub qid: String,
    pub docs: Vec<String>,
}

/// Lines are `qid query`. A tab separates the id when present; otherwise a
/// first word starting with `q` is the id; otherwise the id is `q<line number>`.
pub fn parse_queries(text: &str) -> Vec<(String, String)> {
    let mut queries = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (qid, query) = if let Some((qid, query)) = line.split_once('\t') {
            (qid.to_string(), query.to_string())
        } else {
            match line.split_once(char::is_whitespace) {
                Some((first, rest)) if first.starts_with('q') => (first.to_string(), rest.trim_start().to_string()),
                _ => (format!("q{}", i + 1), line.to_string()),
            }
        };
        queries.push((qid, query));
    }
    queries
}

/// `qid doc rel` lines; shorter lines and unparsable grades are skipped.
pub fn parse_qrels(text: &str) -> Qrels {
    let mut qrels = Qrels::new();
    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        match parts[2].parse::<f64>() {
            Ok(rel) => {
                qrels.entry(parts[0].to_string()).or_default().insert(parts[1].to_string(), rel);
            }
            Err(_) => tracing::warn!(line, "bad relevance grade, skipping"),
        }
    }
    qrels
}

/// `qid doc rank` lines grouped per query in order of first appearance, each
/// group sorted by rank.
pub fn parse_results(text: &str) -> Vec<Run> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut ranked: Vec<(String, Vec<(i64, String)>)> = Vec::new();
    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        let Ok(rank) = parts[2].parse::<i64>() else {
            tracing::warn!(line, "bad rank, skipping");
            continue;
        };
        let slot = *slots.entry(parts[0].to_string()).or_insert_with(|| {
            ranked.push((parts[0].to_string(), Vec::new()));
            ranked.len() - 1
        });
        ranked[slot].1.push((rank, parts[1].to_string()));
    }
    ranked
        .into_iter()
        .map(|(qid, mut docs)| {
            docs.sort();
            Run { qid, docs: docs.into_iter().map(|(_, d)| d).collect() }
        })
        .collect()
}

/// Write the per-query report: a `Query:` line, one line per cutoff, a blank line.
pub fn write_report<W: Write>(qrels: &Qrels, runs: &[Run], mut out: W) -> Result<()> {
    let empty = HashMap::new();
    for run in runs {
        let judged = qrels.get(&run.qid).unwrap_or(&empty);
        let rels: Vec<f64> = run.docs.iter().map(|d| judged.get(d).copied().unwrap_or(0.0)).collect();
        writeln!(out, "Query: {}", run.qid)?;
        for k in CUTOFFS {
            writeln!(
                out,
                " P@{k}: {:.4}  NDCG@{k}: {:.4}  ERR@{k}: {:.4}",
                metrics::precision_at_k(&rels, k),
                metrics::ndcg_at_k(&rels, k),
                metrics::err_at_k(&rels, k),
            )?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

pub fn score<W: Write>(qrels_path: &Path, results_path: &Path, out: W) -> Result<()> {
    let qrels = parse_qrels(&read_text(qrels_path)?);
    let runs = parse_results(&read_text(results_path)?);
    tracing::info!(judged_queries = qrels.len(), runs = runs.len(), "scoring");
    write_report(&qrels, &runs, out)
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Matches with at least `high` query-token occurrences are graded 2, with at
/// least `low` graded 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub high: u64,
    pub low: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { high: 5, low: 1 }
    }
}

impl Thresholds {
    fn grade(&self, count: u64) -> Option<u8> {
        if count >= self.high {
            Some(2)
        } else if count >= self.low {
            Some(1)
        } else {
            None
        }
    }
}

/// Raw (unstemmed) token counts of one corpus document.
pub struct CountedDoc {
    pub name: String,
    pub counts: HashMap<String, u64>,
}

impl CountedDoc {
    pub fn new(name: impl Into<String>, content: &[u8]) -> Self {
        let mut counts = HashMap::new();
        for token in tokenize(content) {
            *counts.entry(token).or_insert(0) += 1;
        }
        Self { name: name.into(), counts }
    }

    /// Occurrences of every query token, a repeated query token counted again.
    fn matches(&self, query_tokens: &[String]) -> u64 {
        query_tokens.iter().map(|t| self.counts.get(t).copied().unwrap_or(0)).sum()
    }
}

/// Top `topk` matching document names, in ascending id order.
pub fn retrieve(engine: &QueryEngine<'_>, query: &str, topk: usize) -> Vec<String> {
    let index = engine.index();
    engine
        .search(query)
        .doc_ids
        .iter()
        .filter_map(|&id| index.doc_name(id))
        .take(topk)
        .map(str::to_string)
        .collect()
}

/// Graded documents for one query, in corpus order.
pub fn judge(query: &str, corpus: &[CountedDoc], thresholds: Thresholds) -> Vec<(String, u8)> {
    let tokens: Vec<String> = tokenize(query).collect();
    if tokens.is_empty() {
        return Vec::new();
    }
    corpus
        .iter()
        .filter_map(|doc| thresholds.grade(doc.matches(&tokens)).map(|g| (doc.name.clone(), g)))
        .collect()
}

/// Write results and qrels lines for every query.
pub fn write_runs<R: Write, Q: Write>(
    engine: &QueryEngine<'_>,
    queries: &[(String, String)],
    corpus: &[CountedDoc],
    topk: usize,
    thresholds: Thresholds,
    mut results: R,
    mut qrels: Q,
) -> Result<()> {
    for (qid, query) in queries {
        let docs = retrieve(engine, query, topk);
        tracing::info!(qid = %qid, query = %query, retrieved = docs.len(), "processing query");
        for (rank, doc) in docs.iter().enumerate() {
            writeln!(results, "{qid} {doc} {}", rank + 1)?;
        }
        for (doc, rel) in judge(query, corpus, thresholds) {
            writeln!(qrels, "{qid} {doc} {rel}")?;
        }
    }
    results.flush()?;
    qrels.flush()?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub queries: PathBuf,
    pub index: PathBuf,
    pub corpus: PathBuf,
    pub out_qrels: PathBuf,
    pub out_results: PathBuf,
    pub topk: usize,
    pub thresholds: Thresholds,
}

pub fn generate(cfg: &GenerateConfig) -> Result<()> {
    let queries = parse_queries(&read_text(&cfg.queries)?);
    if !cfg.corpus.is_dir() {
        bail!("corpus directory not found: {}", cfg.corpus.display());
    }
    let index = search_core::persist::load_index(&search_core::persist::IndexPaths::new(&cfg.index))
        .with_context(|| format!("failed to load index {}", cfg.index.display()))?;
    let corpus: Vec<CountedDoc> = indexer::corpus::read_corpus(indexer::corpus::list_txt_files(&cfg.corpus))
        .map(|doc| CountedDoc::new(doc.name, &doc.content))
        .collect();

    let results = BufWriter::new(File::create(&cfg.out_results).with_context(|| format!("creating {}", cfg.out_results.display()))?);
    let qrels = BufWriter::new(File::create(&cfg.out_qrels).with_context(|| format!("creating {}", cfg.out_qrels.display()))?);
    write_runs(&QueryEngine::new(&index), &queries, &corpus, cfg.topk, cfg.thresholds, results, qrels)?;
    tracing::info!(queries = queries.len(), qrels = %cfg.out_qrels.display(), results = %cfg.out_results.display(), "done");
    Ok(())
}
