use indexer::build_index;
use indexer::corpus::list_txt_files;
use search_core::persist::{load_index, IndexPaths};
use search_core::QueryEngine;
use std::fs;
use tempfile::tempdir;

#[test]
fn builds_sorted_corpus_and_csv() {
    let corpus = tempdir().unwrap();
    fs::write(corpus.path().join("doc1.txt"), "the dog sat").unwrap();
    fs::write(corpus.path().join("doc0.txt"), "the cat sat").unwrap();
    fs::write(corpus.path().join("notes.md"), "cat cat cat").unwrap();
    fs::write(corpus.path().join(".txt"), "hidden").unwrap();
    fs::create_dir(corpus.path().join("sub")).unwrap();
    fs::write(corpus.path().join("sub/deep.txt"), "cat").unwrap();

    let out = tempdir().unwrap();
    let index_path = out.path().join("main_index.bin");
    let summary = build_index(corpus.path(), &index_path).unwrap();
    assert_eq!(summary.num_docs, 2);

    let paths = IndexPaths::new(&index_path);
    let idx = load_index(&paths).unwrap();
    assert_eq!(idx.doc_names(), &["doc0.txt".to_string(), "doc1.txt".to_string()]);
    let engine = QueryEngine::new(&idx);
    assert_eq!(engine.search("cat").doc_ids, vec![0]);
    assert_eq!(engine.search("cat OR dog").doc_ids, vec![0, 1]);
    assert_eq!(engine.search("sat AND cat").doc_ids, vec![0]);
    assert!(engine.search("fish").is_empty());

    let csv = fs::read_to_string(paths.frequencies()).unwrap();
    assert!(csv.starts_with("Term,Frequency\n"));
    assert_eq!(csv.lines().count(), 5);
}

#[test]
fn empty_files_still_take_an_id() {
    let corpus = tempdir().unwrap();
    fs::write(corpus.path().join("a.txt"), "").unwrap();
    fs::write(corpus.path().join("b.txt"), "zebra").unwrap();
    let out = tempdir().unwrap();
    let index_path = out.path().join("idx.bin");
    build_index(corpus.path(), &index_path).unwrap();
    let idx = load_index(&IndexPaths::new(&index_path)).unwrap();
    assert_eq!(idx.num_docs(), 2);
    assert_eq!(idx.postings("zebra"), &[1]);
}

#[test]
fn missing_corpus_dir_writes_empty_index() {
    let out = tempdir().unwrap();
    let missing = out.path().join("no-such-dir");
    assert!(list_txt_files(&missing).is_empty());

    let index_path = out.path().join("idx.bin");
    let summary = build_index(&missing, &index_path).unwrap();
    assert_eq!(summary.num_docs, 0);

    let paths = IndexPaths::new(&index_path);
    let idx = load_index(&paths).unwrap();
    assert_eq!(idx.num_docs(), 0);
    assert_eq!(idx.num_terms(), 0);
    assert_eq!(fs::read(&index_path).unwrap(), [0u8; 16]);
    assert_eq!(fs::read_to_string(paths.frequencies()).unwrap(), "Term,Frequency
");
}

#[test]
fn unwritable_output_fails_without_partial_index() {
    let corpus = tempdir().unwrap();
    fs::write(corpus.path().join("a.txt"), "hello").unwrap();
    let out = tempdir().unwrap();
    // a regular file where a parent directory is expected
    let blocker = out.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let target = blocker.join("idx.bin");
    assert!(build_index(corpus.path(), &target).is_err());
}
