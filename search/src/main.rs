use anyhow::{Context, Result};
use clap::Parser;
use search::run_session;
use search_core::persist::{load_index, IndexPaths};
use search_core::QueryEngine;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Answer boolean AND/OR queries read from stdin", long_about = None)]
struct Args {
    /// Index file produced by the indexer
    #[arg(default_value = "dumps/main_index.bin")]
    index: PathBuf,
}

fn main() -> Result<()> {
    // stdout carries the answer stream, so logs go to stderr
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    tracing::info!(path = %args.index.display(), "loading index");
    let index = load_index(&IndexPaths::new(&args.index))
        .with_context(|| format!("failed to load index {}", args.index.display()))?;
    tracing::info!("Index loaded. Ready for queries.");

    let engine = QueryEngine::new(&index);
    let answered = run_session(&engine, io::stdin().lock(), io::stdout().lock())?;
    tracing::debug!(answered, "session finished");
    Ok(())
}
