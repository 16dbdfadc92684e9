use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One input document: display name (file name only) and raw bytes.
pub struct CorpusDoc {
    pub name: String,
    pub content: Vec<u8>,
}

/// Top-level `*.txt` files of `dir`, sorted by path. Subdirectories are not
/// searched, and a bare `.txt` does not count. A missing directory lists as
/// empty.
pub fn list_txt_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::warn!(corpus = %dir.display(), "corpus directory not found, building an empty index");
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .map(|e| e.into_path())
        .filter(|p| is_txt(p))
        .collect();
    files.sort();
    files
}

fn is_txt(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .map_or(false, |n| n.len() > 4 && n.ends_with(".txt"))
}

/// Lazily read each file in order. An unreadable file yields an empty
/// document so ids stay aligned with the sorted listing.
pub fn read_corpus(files: Vec<PathBuf>) -> impl Iterator<Item = CorpusDoc> {
    files.into_iter().map(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content = fs::read(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "unreadable document, indexing as empty");
            Vec::new()
        });
        CorpusDoc { name, content }
    })
}
