//! Query entry points.

use std::borrow::Cow;

use tracing::trace;
use tweetdex_types::{Result, SearchHit, Timestamp};

use crate::index::postings::DocSet;
use crate::index::rank::{into_parts, rank};
use crate::index::types::TweetIndex;
use crate::query::{parse_query, Evaluator, Expr};

impl TweetIndex {
    /// Searches for the most recent tweets matching a boolean query.
    ///
    /// Returns parallel `(texts, timestamps)` sequences, newest first, of at
    /// most `result_limit` entries (5 by default).
    ///
    /// # Errors
    ///
    /// Returns `MalformedQuery` if the query does not parse or its shape is
    /// invalid. Unknown terms are not errors: they simply match nothing.
    pub fn search(&self, query: &str) -> Result<(Vec<String>, Vec<Timestamp>)> {
        self.search_hits(query).map(into_parts)
    }

    /// Like [`search`](Self::search), but returns paired hits.
    pub fn search_hits(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.record_query();

        let query: Cow<'_, str> = if self.config.fold_query_case {
            Cow::Owned(query.to_lowercase())
        } else {
            Cow::Borrowed(query)
        };

        let expr = parse_query(&query)?;
        let matches = self.evaluate(&expr, false)?;
        let hits = rank(&matches, &self.store, self.config.result_limit);

        trace!(query = %expr, matched = matches.len(), returned = hits.len(), "search");
        Ok(hits)
    }

    /// Evaluates a parsed expression to its full set of matching timestamps.
    ///
    /// With `negate` set, the result is complemented against the universe.
    pub fn evaluate(&self, expr: &Expr, negate: bool) -> Result<DocSet> {
        Evaluator::new(self).evaluate(expr, negate)
    }

    /// Finds the timestamps of all tweets containing `term`.
    ///
    /// A leading `!` negates the lookup: `get_matches("!x")` is every
    /// timestamp whose tweet lacks `x`. Absent terms match nothing, and
    /// negated absent terms match the whole universe.
    pub fn get_matches(&self, term: &str) -> DocSet {
        match term.strip_prefix('!') {
            Some(rest) => self.matches(rest, true).into_owned(),
            None => self.matches(term, false).into_owned(),
        }
    }

    /// Leaf lookup shared by the evaluator. Borrows the posting list when
    /// no complement is needed.
    #[inline]
    pub(crate) fn matches(&self, term: &str, negated: bool) -> Cow<'_, DocSet> {
        match (self.terms.get(term), negated) {
            (Some(postings), false) => Cow::Borrowed(postings),
            (None, false) => Cow::Owned(DocSet::new()),
            (Some(postings), true) => Cow::Owned(self.universe.difference(postings)),
            (None, true) => Cow::Borrowed(&self.universe),
        }
    }
}
