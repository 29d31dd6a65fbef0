//! Console rendering of an analysis report.

use newspulse_news::SentimentBucket;

use super::Report;

const TITLE_WIDTH: usize = 60;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn bucket_line(label: &str, bucket: &SentimentBucket) -> String {
    format!("{label:<10}{:>5}  {:>6.1}%", bucket.count, bucket.percentage)
}

/// Article table, comparative analysis, and both summaries.
pub(super) fn print_report(report: &Report) {
    println!(
        "# News sentiment for {} ({} articles)",
        report.company, report.total_articles
    );
    println!();

    if report.articles.is_empty() {
        println!("no relevant articles found");
    } else {
        println!(
            "{:<62}{:<22}{:<32}{:<10}SCORE",
            "TITLE", "SOURCE", "DATE", "SENTIMENT"
        );
        for article in &report.articles {
            println!(
                "{:<62}{:<22}{:<32}{:<10}{:.3}",
                truncate(&article.title, TITLE_WIDTH),
                truncate(&article.source, 20),
                truncate(&article.date, 30),
                article.sentiment_label.to_string(),
                article.sentiment_score
            );
        }
    }

    let summary = &report.summary;
    println!();
    println!("## Comparative analysis");
    println!("{}", bucket_line("Positive", &summary.positive));
    println!("{}", bucket_line("Negative", &summary.negative));
    println!("{}", bucket_line("Neutral", &summary.neutral));
    println!("Average sentiment score: {:.2}", summary.average_sentiment_score);
    println!();
    println!("## Summary ({})", summary.source_language);
    println!("{}", summary.text);
    println!();
    println!("## Summary ({})", summary.target_language);
    println!("{}", summary.translated_text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Acme rises", 60), "Acme rises");
    }

    #[test]
    fn truncate_marks_cut_text() {
        let long = "a".repeat(70);
        let cut = truncate(&long, 60);
        assert_eq!(cut.chars().count(), 60);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn bucket_line_formats_percentage() {
        let bucket = SentimentBucket {
            count: 1,
            percentage: 100.0 / 3.0,
        };
        assert_eq!(bucket_line("Positive", &bucket), "Positive      1    33.3%");
    }
}
