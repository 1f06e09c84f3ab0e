//! CSV ingestion.
//!
//! The input has a header row followed by `timestamp,tweet` records. Columns
//! are read by position, so the header names are not checked.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};
use tweetdex_core::Timestamp;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: invalid timestamp {value:?}")]
    InvalidTimestamp { line: u64, value: String },

    #[error("line {line}: missing {column} column")]
    MissingColumn { line: u64, column: &'static str },
}

/// Reads `(timestamp, tweet)` pairs from CSV.
///
/// In lenient mode, rows with a bad timestamp, a missing column or text
/// that is not UTF-8 are skipped with a warning. Otherwise the first bad
/// row fails the read. I/O errors always fail.
pub fn read_tweets<R: Read>(
    reader: R,
    lenient: bool,
) -> Result<Vec<(Timestamp, String)>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut tweets = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) if lenient && is_row_error(&err) => {
                warn!(error = %err, "skipping row");
                skipped += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        match parse_record(&record) {
            Ok(tweet) => tweets.push(tweet),
            Err(err) if lenient => {
                warn!(error = %err, "skipping row");
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    if skipped > 0 {
        warn!(skipped, "rows skipped during ingestion");
    }
    Ok(tweets)
}

/// Opens `path` and reads it with [`read_tweets`].
pub fn load_tweets(path: &Path, lenient: bool) -> Result<Vec<(Timestamp, String)>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let tweets = read_tweets(file, lenient)?;
    info!(path = %path.display(), tweets = tweets.len(), "loaded tweets");
    Ok(tweets)
}

/// Errors confined to one record, after which the reader can continue.
fn is_row_error(err: &csv::Error) -> bool {
    matches!(
        err.kind(),
        csv::ErrorKind::Utf8 { .. } | csv::ErrorKind::UnequalLengths { .. }
    )
}

fn parse_record(record: &csv::StringRecord) -> Result<(Timestamp, String), IngestError> {
    let line = record.position().map_or(0, |pos| pos.line());

    let raw = record.get(0).ok_or(IngestError::MissingColumn {
        line,
        column: "timestamp",
    })?;
    let timestamp = raw
        .trim()
        .parse::<Timestamp>()
        .map_err(|_| IngestError::InvalidTimestamp {
            line,
            value: raw.to_string(),
        })?;

    let text = record.get(1).ok_or(IngestError::MissingColumn {
        line,
        column: "tweet",
    })?;

    Ok((timestamp, text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "timestamp,tweet\n0,yay\n2,some tweet\n8,\"hello world\"\n";

    #[test]
    fn reads_rows_after_header() {
        let tweets = read_tweets(SAMPLE.as_bytes(), false).unwrap();
        assert_eq!(
            tweets,
            vec![
                (0, "yay".to_string()),
                (2, "some tweet".to_string()),
                (8, "hello world".to_string()),
            ]
        );
    }

    #[test]
    fn quoted_commas_stay_in_text() {
        let tweets = read_tweets("timestamp,tweet\n5,\"a, b\"\n".as_bytes(), false).unwrap();
        assert_eq!(tweets, vec![(5, "a, b".to_string())]);
    }

    #[test]
    fn strict_mode_rejects_bad_timestamp() {
        let input = "timestamp,tweet\n1,ok\nsoon,bad\n";
        match read_tweets(input.as_bytes(), false) {
            Err(IngestError::InvalidTimestamp { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn strict_mode_rejects_missing_column() {
        let input = "timestamp,tweet\n1\n";
        assert!(matches!(
            read_tweets(input.as_bytes(), false),
            Err(IngestError::MissingColumn {
                column: "tweet",
                ..
            })
        ));
    }

    #[test]
    fn lenient_mode_skips_bad_rows() {
        let input = "timestamp,tweet\n1,ok\n-4,negative\n2\n3,fine\n";
        let tweets = read_tweets(input.as_bytes(), true).unwrap();
        assert_eq!(tweets, vec![(1, "ok".to_string()), (3, "fine".to_string())]);
    }

    #[test]
    fn invalid_utf8_row_is_skipped_when_lenient() {
        let input: &[u8] = b"timestamp,tweet\n1,ok\n2,bad \xff byte\n3,fine\n";
        let tweets = read_tweets(input, true).unwrap();
        assert_eq!(tweets, vec![(1, "ok".to_string()), (3, "fine".to_string())]);
    }

    #[test]
    fn invalid_utf8_row_fails_when_strict() {
        let input: &[u8] = b"timestamp,tweet\n1,ok\n2,bad \xff byte\n3,fine\n";
        match read_tweets(input, false) {
            Err(IngestError::Csv(err)) => {
                assert!(matches!(err.kind(), csv::ErrorKind::Utf8 { .. }))
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn header_only_is_empty() {
        assert!(read_tweets("timestamp,tweet\n".as_bytes(), false)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let tweets = load_tweets(file.path(), false).unwrap();
        assert_eq!(tweets.len(), 3);
        assert_eq!(tweets[2].1, "hello world");
    }

    #[test]
    fn bundled_sample_answers_queries() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/small.csv");
        let tweets = load_tweets(&path, false).unwrap();
        assert_eq!(tweets.len(), 16);

        let index = tweetdex_core::TweetIndex::from_tweets(tweets);
        assert_eq!(
            index.search("hello & !(neeva | this)").unwrap().1,
            vec![14, 13, 12, 9, 8]
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_tweets(&dir.path().join("absent.csv"), false).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }
}
