use std::io::{BufRead, Write};

use anyhow::Result;
use tweetdex_core::{SearchHit, TweetIndex};

const PROMPT: &str = "tweetdex> ";

const HELP: &str = "\
queries: terms joined by & and |, negated with !, grouped with ( )
:stats   show index statistics
:quit    leave (also :exit)";

/// Prints hits newest first, one per line.
pub fn print_hits<W: Write>(out: &mut W, hits: &[SearchHit]) -> Result<()> {
    if hits.is_empty() {
        writeln!(out, "(no matches)")?;
    }
    for hit in hits {
        writeln!(out, "{:>12}  {}", hit.timestamp, hit.text)?;
    }
    Ok(())
}

/// Prints index statistics, the approximate footprint and ingest counters.
pub fn print_stats<W: Write>(out: &mut W, index: &TweetIndex) -> Result<()> {
    let stats = index.stats();
    let metrics = index.metrics();
    writeln!(out, "{stats}")?;
    writeln!(out, "approx {} bytes in memory", stats.memory_usage_bytes())?;
    writeln!(
        out,
        "{} tweets ingested, {} overwritten",
        metrics.documents_indexed, metrics.documents_overwritten
    )?;
    Ok(())
}

/// Answers one query per input line until EOF or `:quit`.
///
/// Session commands start with `:` so that any bare word is a query.
/// Malformed queries are reported on `out` and do not end the session.
pub fn run<R: BufRead, W: Write>(index: &TweetIndex, input: R, mut out: W) -> Result<()> {
    writeln!(
        out,
        "tweetdex ({} tweets). Type ':help' for commands, ':quit' to exit.",
        index.len()
    )?;
    write!(out, "{PROMPT}")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let query = line.trim();

        match query {
            "" => {}
            ":quit" | ":exit" => break,
            ":stats" => print_stats(&mut out, index)?,
            ":help" => writeln!(out, "{HELP}")?,
            _ => match index.search_hits(query) {
                Ok(hits) => print_hits(&mut out, &hits)?,
                Err(err) => writeln!(out, "error: {err}")?,
            },
        }

        write!(out, "{PROMPT}")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}
