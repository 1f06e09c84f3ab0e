//! Query Benchmarking Tool
//!
//! Measures index construction, query parsing and end-to-end search over a
//! synthetic tweet corpus. The corpus is generated from a fixed seed, so two
//! runs with the same document count index identical text.
//!
//! ## Usage
//!
//! ```bash
//! # 100_000 documents (default)
//! ./target/release/query_bench
//!
//! # A larger corpus
//! ./target/release/query_bench 2000000
//! ```
//!
//! ## Example Output
//!
//! ```text
//! === Search ===
//! --------------------------------
//! Mode        : hello & !(neeva | this)
//! Elapsed     : 0.004 s
//! Per op      : 4.120 ms
//! Count       : 41_233
//! --------------------------------
//! ```
//!
//! Build in release mode. Negated queries complement against the whole
//! corpus and dominate the timings on large inputs.

use std::env;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tweetdex_core::{parse_query, IndexBuilder, Result, Timestamp, TweetIndex};

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;
const DEFAULT_DOCS: usize = 100_000;
const SEED: u64 = 0x7EE7_DE11;

const VOCABULARY: &[&str] = &[
    "hello", "world", "neeva", "this", "is", "me", "bob", "yes", "not", "stuff", "some", "tweet",
    "rust", "search", "index", "query", "fast", "slow", "coffee", "rain", "train", "late", "news",
    "today", "tomorrow", "why", "how", "great", "terrible", "launch",
];

const QUERIES: &[&str] = &[
    "hello",
    "neeva & rust",
    "bob | is | he",
    "hello & !(neeva | this)",
    "hello & ((!neeva & this) & (not | is))",
    "!(coffee | rain) & (launch | news) & !late",
];

fn main() -> Result<()> {
    let docs = env::args()
        .nth(1)
        .and_then(|arg| arg.replace('_', "").parse().ok())
        .unwrap_or(DEFAULT_DOCS);

    println!("Generating {} documents...", fmt_count(docs as u64));
    let corpus = synthetic_corpus(docs);
    let bytes: usize = corpus.iter().map(|(_, text)| text.len()).sum();
    println!("Corpus text: {} bytes\n", fmt_count(bytes as u64));

    let index = bench_build(&corpus);
    println!("Index: {}\n", index.stats());

    bench_parse()?;
    bench_search(&index)?;

    Ok(())
}

fn synthetic_corpus(docs: usize) -> Vec<(Timestamp, String)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut corpus = Vec::with_capacity(docs);

    for ts in 0..docs as Timestamp {
        let words = rng.random_range(2..12);
        let mut text = String::with_capacity(words * 8);
        for i in 0..words {
            if i > 0 {
                text.push(' ');
            }
            text.push_str(VOCABULARY[rng.random_range(0..VOCABULARY.len())]);
        }
        corpus.push((ts, text));
    }

    corpus
}

fn bench_build(corpus: &[(Timestamp, String)]) -> TweetIndex {
    println!("=== Build ===");

    let build = || {
        let mut builder = IndexBuilder::new();
        builder.extend(corpus.iter().map(|(ts, text)| (*ts, text.as_str())));
        builder.build()
    };

    warmup(|| {
        std::hint::black_box(build());
    });
    let elapsed = measure(|| {
        std::hint::black_box(build());
    });
    print_perf("Build", elapsed, corpus.len() as u64);

    build()
}

fn bench_parse() -> Result<()> {
    println!("=== Parse ===");

    let run = || -> Result<u64> {
        let mut elements = 0u64;
        for query in QUERIES {
            elements += parse_query(query)?.len() as u64;
        }
        Ok(elements)
    };

    let elements = run()?;
    warmup(|| {
        std::hint::black_box(run().ok());
    });
    let elapsed = measure(|| {
        std::hint::black_box(run().ok());
    });
    print_perf("Parse (all queries)", elapsed, elements);

    Ok(())
}

fn bench_search(index: &TweetIndex) -> Result<()> {
    println!("=== Search ===");

    for query in QUERIES {
        let matched = index.evaluate(&parse_query(query)?, false)?.len();

        warmup(|| {
            std::hint::black_box(index.search(query).ok());
        });
        let elapsed = measure(|| {
            std::hint::black_box(index.search(query).ok());
        });

        print_perf(query, elapsed, matched as u64);
    }

    Ok(())
}

fn warmup<F: FnMut()>(mut f: F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(mut f: F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, elapsed: Duration, count: u64) {
    let secs = elapsed.as_secs_f64();

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Per op      : {:.3} ms", secs * 1000.0);

    if count > 0 {
        println!("Count       : {}", fmt_count(count));
    }

    println!("--------------------------------\n");
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
