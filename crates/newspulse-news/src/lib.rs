//! News collection and sentiment aggregation for NewsPulse.
//!
//! Pages through a news RSS feed for a company using a fixed ladder of query
//! variants, keeps only articles that mention the company, drops repeated
//! titles, scores each article with a lexicon scorer, and stops as soon as ten
//! articles are collected. [`summarize`] turns the collected articles into
//! per-sentiment counts and a one-paragraph synopsis.

pub mod error;
pub mod fetcher;
pub mod filter;
pub mod pipeline;
pub mod scorer;
pub mod sources;
pub mod summary;
pub mod types;

pub use error::FetchError;
pub use fetcher::{fetch_page, ArticleCollector};
pub use filter::{is_relevant, TitleDeduplicator};
pub use pipeline::{collect_articles, next_step, Step};
pub use scorer::{LexiconScorer, SentimentScorer};
pub use sources::{parse_feed, FeedSource, GoogleNewsFeed};
pub use summary::{summarize, SentimentBucket, SentimentSummary};
pub use types::{Article, Collection, CollectionPlan, FeedEntry, SentimentLabel};
