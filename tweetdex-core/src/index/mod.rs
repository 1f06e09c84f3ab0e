//! Inverted index, query entry points and recency ranking.
//!
//! The index is built once and never mutated afterwards:
//! - Posting lists are sorted, deduplicated timestamp vectors ([`DocSet`])
//!   keyed by the exact space-separated terms of the stored text
//! - The universe (all timestamps) is kept alongside as the complement
//!   base for negation
//! - Document text lives in an append-only [`CorpusStore`](crate::store::CorpusStore)
//!
//! Threading:
//! - [`TweetIndex`] is `Send + Sync`. Queries take `&self` and the only
//!   shared mutable state is an atomic query counter.

mod builder;
mod postings;
mod rank;
mod search;
mod stats;
mod types;

pub use builder::IndexBuilder;
pub use postings::DocSet;
pub use rank::{into_parts, rank};
pub use stats::IndexStats;
pub use types::{EngineMetrics, TweetIndex};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tweetdex_types::{
        MalformedReason, ReingestPolicy, SearchConfig, SearchError, Timestamp, MAX_NESTING_DEPTH,
    };

    const FIXTURE: [(Timestamp, &str); 16] = [
        (0, "yay"),
        (1, "her"),
        (2, "some tweet"),
        (3, "he he"),
        (4, "hello this is neeva"),
        (5, "hello neeva me"),
        (6, "hello this is me"),
        (7, "hello yes neeva"),
        (8, "hello world"),
        (9, "hello hello"),
        (10, "hello neeva this is neeva"),
        (11, "hello neeva this is bob"),
        (12, "hello stuff"),
        (13, "hello me"),
        (14, "hello not me"),
        (15, "hello this is also neeva"),
    ];

    fn fixture() -> TweetIndex {
        TweetIndex::from_tweets(FIXTURE)
    }

    fn vocabulary() -> Vec<&'static str> {
        let mut terms: Vec<&str> = FIXTURE
            .iter()
            .flat_map(|(_, text)| text.split(' '))
            .collect();
        terms.sort_unstable();
        terms.dedup();
        terms.push("blueberries");
        terms
    }

    fn timestamps(index: &TweetIndex, query: &str) -> Vec<Timestamp> {
        index.search(query).expect("query should be valid").1
    }

    fn full_set(index: &TweetIndex, query: &str) -> DocSet {
        let expr = crate::query::parse_query(query).expect("query parses");
        index.evaluate(&expr, false).expect("query evaluates")
    }

    #[test]
    fn single_term_search() {
        let index = fixture();
        assert_eq!(
            index.search("yay").unwrap(),
            (vec!["yay".to_string()], vec![0])
        );
    }

    #[test]
    fn unknown_term_forces_empty_intersection() {
        let index = fixture();
        assert_eq!(index.search("neeva & Erika").unwrap(), (vec![], vec![]));
        assert_eq!(index.search("blueberries").unwrap(), (vec![], vec![]));
    }

    #[test]
    fn negated_unknown_term_matches_everything() {
        let index = fixture();
        let (texts, stamps) = index.search("!blueberries").unwrap();
        assert_eq!(stamps, vec![15, 14, 13, 12, 11]);
        assert_eq!(
            texts,
            vec![
                "hello this is also neeva",
                "hello not me",
                "hello me",
                "hello stuff",
                "hello neeva this is bob",
            ]
        );
    }

    #[test]
    fn three_level_nesting_with_inner_negation() {
        let index = fixture();
        assert_eq!(
            index
                .search("hello & ((!neeva & this) & (not | is))")
                .unwrap(),
            (vec!["hello this is me".to_string()], vec![6])
        );
    }

    #[test]
    fn flat_or_folding() {
        let index = fixture();
        let (texts, stamps) = index.search("bob | is | he").unwrap();
        assert_eq!(stamps, vec![15, 11, 10, 6, 4]);
        assert_eq!(
            texts,
            vec![
                "hello this is also neeva",
                "hello neeva this is bob",
                "hello neeva this is neeva",
                "hello this is me",
                "hello this is neeva",
            ]
        );
    }

    #[test]
    fn truncation_does_not_pad() {
        let index = fixture();
        assert_eq!(
            index.search("tweet | world").unwrap(),
            (
                vec!["hello world".to_string(), "some tweet".to_string()],
                vec![8, 2]
            )
        );
    }

    #[test]
    fn golden_queries() {
        let index = fixture();
        assert_eq!(
            timestamps(&index, "hello & !(yes | neeva) | !(hello & stuff)"),
            vec![15, 14, 13, 12, 11]
        );
        assert_eq!(
            timestamps(&index, "hello & !(neeva | this)"),
            vec![14, 13, 12, 9, 8]
        );
        assert_eq!(timestamps(&index, "!neeva"), vec![14, 13, 12, 9, 8]);
        assert_eq!(timestamps(&index, "neeva & (me | it) & !this"), vec![5]);
        assert_eq!(timestamps(&index, "some | (her & he)"), vec![2]);
    }

    #[test]
    fn query_case_is_folded() {
        let index = fixture();
        assert_eq!(timestamps(&index, "HELLO & Stuff"), vec![12]);
    }

    #[test]
    fn case_sensitive_config_keeps_query_case() {
        let mut builder = IndexBuilder::with_config(SearchConfig::new().case_sensitive());
        builder.extend([(1, "Rust"), (2, "rust")]);
        let index = builder.build();
        assert_eq!(timestamps(&index, "Rust"), vec![1]);
        assert_eq!(timestamps(&index, "rust"), vec![2]);
    }

    #[test]
    fn result_limit_is_configurable() {
        let mut builder = IndexBuilder::with_config(SearchConfig::new().with_result_limit(2));
        builder.extend(FIXTURE);
        let index = builder.build();
        assert_eq!(timestamps(&index, "hello"), vec![15, 14]);

        let mut builder = IndexBuilder::with_config(SearchConfig::new().with_result_limit(0));
        builder.extend(FIXTURE);
        assert!(timestamps(&builder.build(), "hello").is_empty());
    }

    #[test]
    fn malformed_queries_surface_errors() {
        let index = fixture();
        let cases = [
            ("(hello & world", MalformedReason::UnbalancedParens { position: 0 }),
            ("hello & world)", MalformedReason::UnbalancedParens { position: 3 }),
            ("hello & !", MalformedReason::DanglingNegation { position: 2 }),
            ("hello &", MalformedReason::MissingOperand),
            ("hello world", MalformedReason::MissingOperand),
            ("hello world yay", MalformedReason::MissingOperator),
            ("", MalformedReason::EmptySegment),
            ("hello | ()", MalformedReason::EmptySegment),
        ];

        for (query, expected) in cases {
            match index.search(query) {
                Err(SearchError::MalformedQuery { reason }) => {
                    assert_eq!(reason, expected, "query {query:?}")
                }
                Ok(result) => panic!("query {query:?} should fail, got {result:?}"),
            }
        }
    }

    #[test]
    fn nesting_up_to_the_limit_evaluates() {
        let index = fixture();
        let parens = format!(
            "{}yay{}",
            "(".repeat(MAX_NESTING_DEPTH),
            ")".repeat(MAX_NESTING_DEPTH)
        );
        assert_eq!(timestamps(&index, &parens), vec![0]);

        // An even number of negations cancels out.
        let negations = format!("{}yay", "!".repeat(MAX_NESTING_DEPTH));
        assert_eq!(timestamps(&index, &negations), vec![0]);
        let negations = format!("{}(yay)", "!".repeat(MAX_NESTING_DEPTH - 1));
        assert_eq!(timestamps(&index, &negations), vec![15, 14, 13, 12, 11]);
    }

    #[test]
    fn deep_nesting_fails_with_an_error() {
        let index = fixture();
        let too_deep = MalformedReason::NestingTooDeep {
            position: MAX_NESTING_DEPTH,
        };

        let parens = format!("{}a{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(index.search(&parens).unwrap_err().reason(), too_deep);

        let negations = format!("{}a", "!".repeat(100_000));
        assert_eq!(index.search(&negations).unwrap_err().reason(), too_deep);

        let negated_groups = format!("{}a{}", "!(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(
            index.search(&negated_groups).unwrap_err().reason(),
            MalformedReason::NestingTooDeep { .. }
        ));

        // The index stays usable afterwards.
        assert_eq!(timestamps(&index, "yay"), vec![0]);
    }

    #[test]
    fn get_matches_is_sound() {
        let index = fixture();
        for term in vocabulary() {
            let matches = index.get_matches(term);
            assert!(matches.is_subset(index.universe()), "term {term}");

            let negated = index.get_matches(&format!("!{term}"));
            assert!(negated.is_subset(index.universe()), "term !{term}");
            assert!(matches.intersect(&negated).is_empty());
            assert_eq!(matches.union(&negated), *index.universe());
        }
    }

    #[test]
    fn get_matches_handles_absent_terms() {
        let index = fixture();
        assert!(index.get_matches("blueberries").is_empty());
        assert_eq!(index.get_matches("!blueberries"), *index.universe());
        assert_eq!(index.get_matches("neeva").as_slice(), &[4, 5, 7, 10, 11, 15]);
    }

    #[test]
    fn double_negation_is_identity() {
        let index = fixture();
        let terms = vocabulary();
        for a in &terms {
            for b in &terms {
                for expr in [format!("{a} & {b}"), format!("{a} | !{b}")] {
                    assert_eq!(
                        full_set(&index, &format!("!(!({expr}))")),
                        full_set(&index, &expr),
                        "expression {expr}"
                    );
                }
            }
        }
    }

    #[test]
    fn operators_commute_pairwise() {
        let index = fixture();
        let terms = vocabulary();
        for a in &terms {
            for b in &terms {
                assert_eq!(
                    full_set(&index, &format!("{a} & {b}")),
                    full_set(&index, &format!("{b} & {a}"))
                );
                assert_eq!(
                    full_set(&index, &format!("{a} | {b}")),
                    full_set(&index, &format!("{b} | {a}"))
                );
            }
        }
    }

    #[test]
    fn operators_associate_within_one_operator() {
        let index = fixture();
        assert_eq!(
            full_set(&index, "(hello & me) & not"),
            full_set(&index, "hello & (me & not)")
        );
        assert_eq!(
            full_set(&index, "(bob | he) | yay"),
            full_set(&index, "bob | (he | yay)")
        );
    }

    #[test]
    fn absent_terms_annihilate_and_or_is_noop() {
        let index = fixture();
        for term in vocabulary() {
            assert!(full_set(&index, &format!("{term} & blueberries")).is_empty());
            assert_eq!(
                full_set(&index, &format!("{term} | blueberries")),
                index.get_matches(term)
            );
        }
    }

    #[test]
    fn rankings_are_strictly_descending() {
        let index = fixture();
        for term in vocabulary() {
            for query in [term.to_string(), format!("!{term}")] {
                let expected = full_set(&index, &query).len().min(5);
                let stamps = timestamps(&index, &query);
                assert_eq!(stamps.len(), expected, "query {query}");
                for w in stamps.windows(2) {
                    assert!(w[0] > w[1], "query {query} not strictly descending");
                }
            }
        }
    }

    #[test]
    fn reingest_updates_text() {
        let mut tweets = FIXTURE.to_vec();
        tweets.push((6, "goodbye this is me"));
        let index = TweetIndex::from_tweets(tweets);

        assert_eq!(index.len(), 16);
        assert_eq!(index.get(6), Some("goodbye this is me"));
        assert_eq!(
            index.search("goodbye").unwrap(),
            (vec!["goodbye this is me".to_string()], vec![6])
        );
        // Reindexed: `hello` no longer matches timestamp 6.
        assert!(!index.get_matches("hello").contains(6));
        assert_eq!(index.metrics().documents_overwritten, 1);
    }

    #[test]
    fn reingest_with_stale_postings() {
        let mut builder =
            IndexBuilder::with_config(SearchConfig::new().with_reingest(ReingestPolicy::KeepStale));
        builder.extend(FIXTURE).add(6, "goodbye this is me");
        let index = builder.build();

        assert_eq!(index.get(6), Some("goodbye this is me"));
        assert!(index.get_matches("hello").contains(6));
        assert_eq!(
            index.search("hello & me & this").unwrap(),
            (vec!["goodbye this is me".to_string()], vec![6])
        );
    }

    #[test]
    fn empty_index_search() {
        let index = IndexBuilder::new().build();
        assert_eq!(index.search("anything").unwrap(), (vec![], vec![]));
        assert_eq!(index.search("!anything").unwrap(), (vec![], vec![]));
    }

    #[test]
    fn search_hits_are_paired() {
        let index = fixture();
        let hits = index.search_hits("me").unwrap();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].timestamp, 14);
        assert_eq!(hits[0].text, "hello not me");
        assert!(hits.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn stats_describe_the_corpus() {
        let index = fixture();
        let stats = index.stats();
        assert_eq!(stats.num_documents, 16);
        assert_eq!(stats.num_terms, vocabulary().len() - 1);
        assert_eq!(stats.dead_bytes, 0);
        assert!(stats.total_postings >= stats.num_documents);
        assert!(stats.memory_usage_bytes() > stats.corpus_bytes);
        assert!(stats.to_string().starts_with("16 docs"));
    }

    #[test]
    fn metrics_tracks_operations() {
        let index = fixture();
        let metrics = index.metrics();
        assert_eq!(metrics.documents_indexed, 16);
        assert_eq!(metrics.queries_executed, 0);
        assert_eq!(metrics.current_doc_count, 16);

        index.search("yay").unwrap();
        index.search("hello & me").unwrap();
        let _ = index.search("(broken");

        assert_eq!(index.metrics().queries_executed, 3);
    }

    #[test]
    fn concurrent_readers_agree() {
        let index = Arc::new(fixture());
        let expected = timestamps(&index, "hello & !(neeva | this)");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let index = Arc::clone(&index);
                std::thread::spawn(move || timestamps(&index, "hello & !(neeva | this)"))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().expect("reader thread"), expected);
        }
        assert_eq!(index.metrics().queries_executed, 5);
    }
}
