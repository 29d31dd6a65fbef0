use axum::{
    extract::{Path, State},
    Extension, Json,
};
use newspulse_news::{Article, SentimentBucket};
use serde::Serialize;

use crate::analysis::{AnalysisError, AnalysisReport};
use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct AnalysisPayload {
    pub company: String,
    pub total_articles: usize,
    pub articles: Vec<Article>,
    pub summary: SummaryPayload,
    pub audio: AudioPayload,
}

#[derive(Debug, Serialize)]
pub(super) struct SummaryPayload {
    pub text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub positive: SentimentBucket,
    pub negative: SentimentBucket,
    pub neutral: SentimentBucket,
    pub average_sentiment_score: f64,
}

/// Lowercase hex MP3 bytes.
#[derive(Debug, Serialize)]
pub(super) struct AudioPayload {
    pub source: String,
    pub translated: String,
}

impl From<AnalysisReport> for AnalysisPayload {
    fn from(report: AnalysisReport) -> Self {
        Self {
            company: report.company,
            total_articles: report.summary.total,
            articles: report.articles,
            summary: SummaryPayload {
                text: report.summary.text,
                translated_text: report.translated_text,
                source_language: report.source_language,
                target_language: report.target_language,
                positive: report.summary.positive,
                negative: report.summary.negative,
                neutral: report.summary.neutral,
                average_sentiment_score: report.summary.average_score,
            },
            audio: AudioPayload {
                source: hex::encode(&report.source_audio),
                translated: hex::encode(&report.translated_audio),
            },
        }
    }
}

fn map_analysis_error(request_id: String, company: &str, error: &AnalysisError) -> ApiError {
    tracing::error!(company, error = %error, "analysis failed");
    match error {
        AnalysisError::Fetch(e) => ApiError::new(request_id, "fetch_failed", e.to_string()),
        AnalysisError::AudioGeneration(_) => {
            ApiError::new(request_id, "audio_generation_failed", error.to_string())
        }
        AnalysisError::AudioRead(_) => {
            ApiError::new(request_id, "audio_read_failed", "failed to read generated audio")
        }
        AnalysisError::Unexpected(_) => {
            ApiError::new(request_id, "internal_error", "internal server error")
        }
    }
}

pub(super) async fn analyze_company(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(company): Path<String>,
) -> Result<Json<ApiResponse<AnalysisPayload>>, ApiError> {
    let company = company.trim();
    if company.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "company name must not be empty",
        ));
    }

    let report = state
        .pipeline
        .analyze(company)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), company, &e))?;

    Ok(Json(ApiResponse {
        data: AnalysisPayload::from(report),
        meta: ResponseMeta::new(req_id.0),
    }))
}
