//! Single-page fetch: request, parse, filter, score, accumulate.

use crate::error::FetchError;
use crate::filter::{is_relevant, TitleDeduplicator};
use crate::scorer::SentimentScorer;
use crate::sources::{parse_feed, FeedSource};
use crate::types::{Article, FeedEntry, SentimentLabel};

/// Report accumulator for one company.
///
/// Owns the accepted articles and the seen-title set; holds at most `target`
/// articles and never two with the same title.
#[derive(Debug)]
pub struct ArticleCollector {
    company: String,
    target: usize,
    articles: Vec<Article>,
    seen: TitleDeduplicator,
}

impl ArticleCollector {
    #[must_use]
    pub fn new(company: &str, target: usize) -> Self {
        Self {
            company: company.to_string(),
            target,
            articles: Vec::with_capacity(target),
            seen: TitleDeduplicator::new(),
        }
    }

    /// Score and keep `entry` if it mentions the company and its title is new.
    ///
    /// Returns whether the entry was accepted. Entries offered after the
    /// collector is full are rejected.
    pub fn offer<S: SentimentScorer + ?Sized>(&mut self, entry: FeedEntry, scorer: &S) -> bool {
        if self.is_full() {
            return false;
        }
        if !is_relevant(&self.company, &entry.title, &entry.description) {
            return false;
        }
        if !self.seen.admit(&entry.title) {
            tracing::debug!(title = %entry.title, "duplicate title skipped");
            return false;
        }

        let score = scorer.polarity(&format!("{} {}", entry.title, entry.description));
        self.articles.push(Article {
            title: entry.title,
            summary: entry.description,
            source: entry.source,
            date: entry.published,
            sentiment_label: SentimentLabel::from_score(score),
            sentiment_score: score,
        });
        true
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.articles.len() >= self.target
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    #[must_use]
    pub fn into_articles(self) -> Vec<Article> {
        self.articles
    }
}

/// Fetch page `page` of `query` and feed its entries to `collector`.
///
/// Entries are offered in feed order and processing stops the moment the
/// collector fills, even mid-page. Returns `true` if the page held at least
/// one raw entry, relevant or not.
///
/// # Errors
///
/// Returns [`FetchError`] if the feed request fails; nothing from the page is
/// kept in that case.
pub async fn fetch_page<F, S>(
    feed: &F,
    scorer: &S,
    query: &str,
    page: usize,
    page_size: usize,
    collector: &mut ArticleCollector,
) -> Result<bool, FetchError>
where
    F: FeedSource,
    S: SentimentScorer + ?Sized,
{
    let document = feed
        .fetch_document(query, page * page_size, page_size)
        .await?;
    let entries = parse_feed(&document);
    let had_entries = !entries.is_empty();

    let mut accepted = 0_usize;
    for entry in entries {
        if collector.offer(entry, scorer) {
            accepted += 1;
        }
        if collector.is_full() {
            break;
        }
    }

    tracing::debug!(
        query,
        page,
        had_entries,
        accepted,
        total = collector.len(),
        "processed feed page"
    );

    Ok(had_entries)
}
