use anyhow::Result;
use clap::Parser;
use indexer::build_index;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a boolean inverted index from a directory of .txt files", long_about = None)]
struct Cli {
    /// Directory holding the .txt corpus
    corpus_dir: PathBuf,
    /// Index file to write; term frequencies go to <OUTPUT>.csv
    output: PathBuf,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    // clap exits with 2 on usage errors; this tool reports them as 1
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(if e.use_stderr() { 1 } else { 0 });
    });

    let summary = build_index(&cli.corpus_dir, &cli.output)?;
    tracing::info!(num_docs = summary.num_docs, num_terms = summary.num_terms, output = %cli.output.display(), "index build complete");
    Ok(())
}
