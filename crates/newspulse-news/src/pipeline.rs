//! Query expansion: walk the query ladder page by page until enough articles
//! are collected.

use crate::error::FetchError;
use crate::fetcher::{fetch_page, ArticleCollector};
use crate::scorer::SentimentScorer;
use crate::sources::FeedSource;
use crate::types::{Collection, CollectionPlan};

/// What the collector does after a page has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Target reached; stop all fetching.
    Done,
    /// Fetch the next page of the current query.
    Continue,
    /// The page was empty; move on to the next query.
    NextQuery,
}

/// Decide the next move after a page fetch.
#[must_use]
pub fn next_step(collector: &ArticleCollector, had_entries: bool) -> Step {
    if collector.is_full() {
        Step::Done
    } else if had_entries {
        Step::Continue
    } else {
        Step::NextQuery
    }
}

/// Collect up to `plan.target` relevant, de-duplicated, scored articles.
///
/// Tries `company`, `"<company> stock"` and `"<company> news"` in that order.
/// Each query is paged from zero until [`next_step`] says otherwise or
/// `plan.max_pages_per_query` pages have been fetched. Fetches are strictly
/// sequential.
///
/// Returning fewer than `plan.target` articles is not an error; it is logged
/// at `warn`.
///
/// # Errors
///
/// Returns the first [`FetchError`] encountered; no further queries are tried.
pub async fn collect_articles<F, S>(
    feed: &F,
    scorer: &S,
    company: &str,
    plan: &CollectionPlan,
) -> Result<Collection, FetchError>
where
    F: FeedSource,
    S: SentimentScorer + ?Sized,
{
    let mut collector = ArticleCollector::new(company, plan.target);
    let mut attempted_queries = Vec::new();
    let mut pages_fetched = 0_usize;

    'queries: for query in CollectionPlan::queries_for(company) {
        if collector.is_full() {
            break;
        }

        tracing::info!(company, query = %query, "trying query");
        attempted_queries.push(query.clone());

        for page in 0..plan.max_pages_per_query {
            let had_entries =
                fetch_page(feed, scorer, &query, page, plan.page_size, &mut collector).await?;
            pages_fetched += 1;

            match next_step(&collector, had_entries) {
                Step::Done => break 'queries,
                Step::NextQuery => break,
                Step::Continue => {}
            }
        }
    }

    if collector.len() < plan.target {
        tracing::warn!(
            company,
            found = collector.len(),
            attempted = %attempted_queries.join(", "),
            "fewer unique relevant articles than requested after expanded search"
        );
    }

    Ok(Collection {
        articles: collector.into_articles(),
        attempted_queries,
        pages_fetched,
    })
}
