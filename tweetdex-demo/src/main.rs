mod cli;
mod ingest;
mod repl;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tweetdex_core::{IndexBuilder, TweetIndex};

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let index = build_index(&cli)?;

    match cli.command {
        Command::Search { query } => {
            let hits = index
                .search_hits(&query)
                .with_context(|| format!("Failed to run query {query:?}"))?;
            repl::print_hits(&mut io::stdout().lock(), &hits)
        }
        Command::Stats => repl::print_stats(&mut io::stdout().lock(), &index),
        Command::Repl => repl::run(&index, io::stdin().lock(), io::stdout().lock()),
    }
}

fn build_index(cli: &Cli) -> Result<TweetIndex> {
    let tweets = ingest::load_tweets(&cli.data, cli.lenient)
        .with_context(|| format!("Failed to load tweets from {}", cli.data.display()))?;

    let mut builder = IndexBuilder::with_config(cli.search_config());
    builder.extend(tweets);
    let index = builder.build();

    info!(stats = %index.stats(), "index ready");
    Ok(index)
}
