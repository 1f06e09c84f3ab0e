use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tweetdex_core::{ReingestPolicy, SearchConfig, DEFAULT_RESULT_LIMIT};

/// tweetdex - boolean search over timestamped tweets
#[derive(Parser, Debug)]
#[command(name = "tweetdex", version, about)]
pub struct Cli {
    /// CSV file with `timestamp,tweet` rows. Defaults to the bundled sample.
    #[arg(
        long,
        env = "TWEETDEX_DATA",
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/small.csv")
    )]
    pub data: PathBuf,

    /// Maximum number of results per query.
    #[arg(long, env = "TWEETDEX_LIMIT", default_value_t = DEFAULT_RESULT_LIMIT)]
    pub limit: usize,

    /// Keep postings of tweets overwritten by a repeated timestamp.
    #[arg(long, env = "TWEETDEX_KEEP_STALE")]
    pub keep_stale: bool,

    /// Skip malformed CSV rows instead of failing.
    #[arg(long, env = "TWEETDEX_LENIENT")]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one query and print the newest matches.
    Search {
        /// Boolean query, e.g. `hello & !(neeva | this)`.
        query: String,
    },
    /// Show index statistics.
    Stats,
    /// Read queries from stdin, one per line.
    Repl,
}

impl Cli {
    /// Index configuration derived from the flags.
    pub fn search_config(&self) -> SearchConfig {
        let reingest = if self.keep_stale {
            ReingestPolicy::KeepStale
        } else {
            ReingestPolicy::Reindex
        };

        SearchConfig::new()
            .with_result_limit(self.limit)
            .with_reingest(reingest)
    }
}
