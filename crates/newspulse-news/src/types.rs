use serde::{Deserialize, Serialize};

/// Compound scores strictly above this are positive, strictly below its
/// negation are negative.
pub const CLASSIFICATION_THRESHOLD: f64 = 0.05;

/// Sentiment class assigned to an article from its compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Classify a compound score. Scores of exactly `±0.05` are neutral.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > CLASSIFICATION_THRESHOLD {
            Self::Positive
        } else if score < -CLASSIFICATION_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Negative => write!(f, "Negative"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
        }
    }
}

/// A relevant, scored news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Plain-text description with markup removed.
    pub summary: String,
    pub source: String,
    /// Publication date exactly as the feed reported it.
    pub date: String,
    #[serde(rename = "sentiment")]
    pub sentiment_label: SentimentLabel,
    /// Compound polarity in `[-1.0, 1.0]`.
    #[serde(rename = "score")]
    pub sentiment_score: f64,
}

/// One `<item>` from a feed page, with placeholders for missing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub description: String,
    pub source: String,
    pub published: String,
}

impl FeedEntry {
    pub const NO_TITLE: &'static str = "No title";
    pub const NO_SUMMARY: &'static str = "No summary available";
    pub const UNKNOWN: &'static str = "Unknown";
}

/// Bounds for one collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionPlan {
    /// Items requested per feed page.
    pub page_size: usize,
    /// Pages fetched per query variant at most.
    pub max_pages_per_query: usize,
    /// Articles after which collection stops.
    pub target: usize,
}

impl Default for CollectionPlan {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_pages_per_query: 5,
            target: 10,
        }
    }
}

impl CollectionPlan {
    /// Query variants in priority order: the bare name, then `stock`, then `news`.
    #[must_use]
    pub fn queries_for(company: &str) -> Vec<String> {
        vec![
            company.to_string(),
            format!("{company} stock"),
            format!("{company} news"),
        ]
    }

    /// Upper bound on feed requests for one company.
    #[must_use]
    pub fn max_fetches(&self, company: &str) -> usize {
        Self::queries_for(company).len() * self.max_pages_per_query
    }
}

/// Result of running the query ladder for one company.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub articles: Vec<Article>,
    /// Query variants that were actually tried, in order.
    pub attempted_queries: Vec<String>,
    /// Number of feed pages requested.
    pub pages_fetched: usize,
}
