use anyhow::Result;
use clap::{Parser, Subcommand};
use eval::{generate, score, GenerateConfig, Thresholds};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "eval")]
#[command(about = "Generate and score retrieval runs against a built index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query file and write results plus term-count relevance judgments
    Generate {
        /// One query per line, optionally `id<TAB>query`
        #[arg(long)]
        queries: PathBuf,
        #[arg(long, default_value = "dumps/main_index.bin")]
        index: PathBuf,
        /// Directory holding the .txt corpus
        #[arg(long, default_value = "data/corpus")]
        corpus: PathBuf,
        #[arg(long, default_value = "qrels.txt")]
        out_qrels: PathBuf,
        #[arg(long, default_value = "results.txt")]
        out_results: PathBuf,
        /// Results kept per query
        #[arg(long, default_value_t = 100)]
        topk: usize,
        /// Query-token occurrences graded as relevance 2
        #[arg(long, default_value_t = 5)]
        rel2_threshold: u64,
        /// Query-token occurrences graded as relevance 1
        #[arg(long, default_value_t = 1)]
        rel1_threshold: u64,
    },
    /// Report P@k, NDCG@k and ERR@k per query
    Score {
        qrels: PathBuf,
        results: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { queries, index, corpus, out_qrels, out_results, topk, rel2_threshold, rel1_threshold } => {
            generate(&GenerateConfig {
                queries,
                index,
                corpus,
                out_qrels,
                out_results,
                topk,
                thresholds: Thresholds { high: rel2_threshold, low: rel1_threshold },
            })
        }
        Commands::Score { qrels, results } => score(&qrels, &results, io::stdout().lock()),
    }
}
