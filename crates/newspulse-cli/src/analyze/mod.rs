//! `analyze` command: call the API, print the report, save JSON and audio.

mod render;

use std::path::{Path, PathBuf};
use std::time::Duration;

use newspulse_news::{Article, SentimentBucket};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Settings for one `analyze` invocation.
#[derive(Debug, Clone)]
pub(crate) struct AnalyzeOptions {
    pub server: String,
    pub api_key: Option<String>,
    pub out_dir: PathBuf,
    pub timeout_secs: u64,
}

/// Failures talking to the API, each reported with its own message.
#[derive(Debug, Error)]
pub(crate) enum ReportError {
    #[error("invalid server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("could not connect to the API at {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API returned HTTP {status} ({code}): {message}")]
    Status {
        status: u16,
        code: String,
        message: String,
    },

    #[error("API returned a malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// The `data` object of a successful analysis response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Report {
    pub company: String,
    pub total_articles: usize,
    pub articles: Vec<Article>,
    pub summary: ReportSummary,
    pub audio: ReportAudio,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReportSummary {
    pub text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub positive: SentimentBucket,
    pub negative: SentimentBucket,
    pub neutral: SentimentBucket,
    pub average_sentiment_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReportAudio {
    pub source: String,
    pub translated: String,
}

fn analyze_url(server: &str, company: &str) -> Result<Url, ReportError> {
    let invalid = |reason: String| ReportError::InvalidServerUrl {
        url: server.to_string(),
        reason,
    };
    let mut url = Url::parse(server).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(["api", "v1", "analyze", company]);
    Ok(url)
}

/// Request an analysis and return the parsed report plus the raw `data` JSON.
///
/// # Errors
///
/// Returns [`ReportError`] for connection failures, non-success statuses, and
/// bodies that do not match the expected shape.
pub(crate) async fn fetch_report(
    company: &str,
    options: &AnalyzeOptions,
) -> Result<(Report, serde_json::Value), ReportError> {
    let url = analyze_url(&options.server, company)?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_secs))
        .build()
        .map_err(|e| ReportError::Connection {
            url: url.to_string(),
            source: e,
        })?;

    let mut request = client.get(url.clone());
    if let Some(key) = &options.api_key {
        request = request.bearer_auth(key);
    }

    tracing::info!(company, url = %url, "requesting analysis");
    let response = request.send().await.map_err(|e| ReportError::Connection {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| ReportError::Connection {
        url: url.to_string(),
        source: e,
    })?;

    if !status.is_success() {
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => ("unknown".to_string(), body.chars().take(200).collect()),
        };
        return Err(ReportError::Status {
            status: status.as_u16(),
            code,
            message,
        });
    }

    let envelope: Envelope =
        serde_json::from_str(&body).map_err(|e| ReportError::Malformed(e.to_string()))?;
    let report: Report = serde_json::from_value(envelope.data.clone())
        .map_err(|e| ReportError::Malformed(e.to_string()))?;
    Ok((report, envelope.data))
}

/// Decode lowercase or uppercase hex into bytes.
///
/// # Errors
///
/// Returns [`ReportError::Malformed`] on odd length or a non-hex digit.
pub(crate) fn hex_decode(encoded: &str) -> Result<Vec<u8>, ReportError> {
    hex::decode(encoded)
        .map_err(|e| ReportError::Malformed(format!("audio is not valid hex: {e}")))
}

/// Turn a company name into a safe file name stem.
fn file_stem(company: &str) -> String {
    company
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Write the JSON report and both audio clips into `out_dir`.
///
/// Returns the written paths in order: JSON, source audio, translated audio.
///
/// # Errors
///
/// Returns an error if the audio is not valid hex or a file cannot be written.
pub(crate) fn save_outputs(
    out_dir: &Path,
    report: &Report,
    raw: &serde_json::Value,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let stem = file_stem(&report.company);

    let json_path = out_dir.join(format!("{stem}_sentiment_analysis.json"));
    std::fs::write(&json_path, serde_json::to_string_pretty(raw)?)?;

    let source_path = out_dir.join(format!("{stem}_{}.mp3", report.summary.source_language));
    std::fs::write(&source_path, hex_decode(&report.audio.source)?)?;

    let translated_path =
        out_dir.join(format!("{stem}_{}.mp3", report.summary.target_language));
    std::fs::write(&translated_path, hex_decode(&report.audio.translated)?)?;

    Ok(vec![json_path, source_path, translated_path])
}

/// Run the `analyze` command end to end.
///
/// A blank company prints a warning and sends no request.
///
/// # Errors
///
/// Returns an error if the API call fails or the outputs cannot be saved.
pub(crate) async fn run_analyze(company: &str, options: &AnalyzeOptions) -> anyhow::Result<()> {
    let company = company.trim();
    if company.is_empty() {
        eprintln!("warning: please enter a company name");
        return Ok(());
    }

    println!("Fetching and analyzing news for {company}...");
    let (report, raw) = fetch_report(company, options).await?;

    println!("{}", serde_json::to_string_pretty(&raw)?);
    println!();
    render::print_report(&report);

    let written = save_outputs(&options.out_dir, &report, &raw)?;
    println!();
    for path in &written {
        println!("saved {}", path.display());
    }

    Ok(())
}
