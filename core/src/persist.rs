//! On-disk index format.
//!
//! ```text
//! doc_count   u64
//!   name_len  u64, name bytes            (doc_count times, in id order)
//! vocab_count u64
//!   term_len  u64, term bytes            (vocab_count times, ascending)
//!   posting_count u64, i32 * posting_count
//! ```
//!
//! All integers are fixed width in host byte order. bincode with fixint
//! encoding produces exactly this for the record types below.

use crate::builder::TermFrequencies;
use crate::error::Result;
use crate::index::{InvertedIndex, PostingList};
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct IndexRecord<'a> {
    docs: &'a [String],
    vocab: Vec<(&'a str, &'a PostingList)>,
}

#[derive(Deserialize)]
struct OwnedIndexRecord {
    docs: Vec<String>,
    vocab: Vec<(String, PostingList)>,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_native_endian()
        .allow_trailing_bytes()
}

/// Where a build writes its artifacts: the index itself and `<index>.csv`.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub index: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(index: P) -> Self {
        Self { index: index.as_ref().to_path_buf() }
    }

    pub fn frequencies(&self) -> PathBuf {
        self.with_suffix(".csv")
    }

    fn staging(&self) -> PathBuf {
        self.with_suffix(".tmp")
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut s: OsString = self.index.as_os_str().to_owned();
        s.push(suffix);
        PathBuf::from(s)
    }
}

/// Serialize the whole index; the vocabulary is sorted here.
pub fn encode_index<W: Write>(index: &InvertedIndex, writer: W) -> Result<()> {
    let record = IndexRecord { docs: index.doc_names(), vocab: index.sorted_terms() };
    codec().serialize_into(writer, &record)?;
    Ok(())
}

/// Inverse of [`encode_index`]. A buffer that ends before a declared length
/// is an error; lengths are checked against the buffer before allocating.
pub fn decode_index(bytes: &[u8]) -> Result<InvertedIndex> {
    let record: OwnedIndexRecord = codec().deserialize(bytes)?;
    Ok(InvertedIndex::new(record.docs, record.vocab.into_iter().collect()))
}

/// Write the index through a staging file so a failed build never leaves a
/// partial index at the target path.
pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    if let Some(parent) = paths.index.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let staging = paths.staging();
    if let Err(e) = write_staged(&staging, index) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }
    fs::rename(&staging, &paths.index)?;
    tracing::info!(path = %paths.index.display(), num_docs = index.num_docs(), num_terms = index.num_terms(), "index saved");
    Ok(())
}

fn write_staged(path: &Path, index: &InvertedIndex) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    encode_index(index, &mut w)?;
    w.flush()?;
    Ok(())
}

pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    let bytes = fs::read(&paths.index)?;
    let index = decode_index(&bytes)?;
    tracing::info!(path = %paths.index.display(), num_docs = index.num_docs(), num_terms = index.num_terms(), "index loaded");
    Ok(index)
}

/// Rows ordered by descending count, ties by term, for rank/frequency plots.
pub fn write_frequencies<W: Write>(freqs: &TermFrequencies, mut writer: W) -> Result<()> {
    let mut rows: Vec<(&str, u64)> = freqs.iter().map(|(t, &c)| (t.as_str(), c)).collect();
    rows.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    writeln!(writer, "Term,Frequency")?;
    for (term, count) in rows {
        writeln!(writer, "{term},{count}")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_frequencies(paths: &IndexPaths, freqs: &TermFrequencies) -> Result<()> {
    let path = paths.frequencies();
    write_frequencies(freqs, BufWriter::new(File::create(&path)?))?;
    tracing::info!(path = %path.display(), rows = freqs.len(), "frequencies exported");
    Ok(())
}
