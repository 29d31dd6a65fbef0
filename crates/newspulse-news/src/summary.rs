//! Aggregate sentiment figures for a finished report.

use serde::{Deserialize, Serialize};

use crate::types::{Article, SentimentLabel};

/// Count and share of one sentiment class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentBucket {
    pub count: usize,
    /// `count / total * 100`, or `0.0` for an empty report.
    pub percentage: f64,
}

/// Sentiment breakdown of a report, always derived from the full article list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: SentimentBucket,
    pub negative: SentimentBucket,
    pub neutral: SentimentBucket,
    /// Mean compound score, `0.0` for an empty report.
    pub average_score: f64,
    /// One-paragraph synopsis of the figures.
    pub text: String,
}

#[allow(clippy::cast_precision_loss)]
fn bucket(count: usize, total: usize) -> SentimentBucket {
    let percentage = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    };
    SentimentBucket { count, percentage }
}

/// Summarise `articles` collected for `company`.
///
/// An empty slice yields zero counts, zero percentages and a zero average.
#[must_use]
pub fn summarize(company: &str, articles: &[Article]) -> SentimentSummary {
    let total = articles.len();
    let count_of = |label: SentimentLabel| {
        articles
            .iter()
            .filter(|a| a.sentiment_label == label)
            .count()
    };
    let positive_count = count_of(SentimentLabel::Positive);
    let negative_count = count_of(SentimentLabel::Negative);
    let neutral_count = total - positive_count - negative_count;

    let average_score = if total == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let denom = total as f64;
        articles.iter().map(|a| a.sentiment_score).sum::<f64>() / denom
    };

    let positive = bucket(positive_count, total);
    let negative = bucket(negative_count, total);
    let neutral = bucket(neutral_count, total);

    let text = format!(
        "{company} news: {total} articles analyzed. \
         {} Positive ({:.1}%), {} Negative ({:.1}%), {} Neutral ({:.1}%). \
         Average sentiment score: {average_score:.2}",
        positive.count,
        positive.percentage,
        negative.count,
        negative.percentage,
        neutral.count,
        neutral.percentage,
    );

    SentimentSummary {
        total,
        positive,
        negative,
        neutral,
        average_score,
        text,
    }
}
