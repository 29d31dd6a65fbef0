mod analyze;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::analysis::LivePipeline;
use crate::middleware::{
    enforce_analysis_budget, request_id, require_bearer_auth, AnalysisBudget, AuthState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<LivePipeline>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "fetch_failed" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, budget: AnalysisBudget) -> Router<AppState> {
    Router::new()
        .route("/api/v1/analyze/{company}", get(analyze::analyze_company))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    budget,
                    enforce_analysis_budget,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, budget: AnalysisBudget) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, budget))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

/// Analysis is slow and hits third-party services; keep the budget small.
pub fn default_analysis_budget() -> AnalysisBudget {
    AnalysisBudget::new(30, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use newspulse_core::{AppConfig, Environment, FeedLocale};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
        <item><title>Acme posts record profit</title><description>Quarterly results</description>\
        <source url=\"https://wire.example.com\">Example Wire</source>\
        <pubDate>Mon, 06 Jan 2025 08:00:00 GMT</pubDate></item>\
        <item><title>Acme faces lawsuit</title><description>Filed in court</description></item>\
        <item><title>Acme Q3 report</title><description>Published today</description></item>\
        </channel></rss>";

    const EMPTY_FEED: &str = "<rss version=\"2.0\"><channel></channel></rss>";

    fn test_config(server: &MockServer) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            log_level: "info".to_string(),
            api_keys: Vec::new(),
            feed_base_url: server.uri(),
            feed_locale: FeedLocale::default(),
            feed_timeout_secs: 5,
            user_agent: "newspulse-test".to_string(),
            translate_base_url: server.uri(),
            tts_base_url: server.uri(),
            source_language: "en".to_string(),
            target_language: "hi".to_string(),
            audio_dir: std::env::temp_dir()
                .join(format!("newspulse-api-{}", uuid::Uuid::new_v4())),
        }
    }

    fn app_for(server: &MockServer, auth: AuthState, budget: AnalysisBudget) -> Router {
        let pipeline = LivePipeline::from_config(&test_config(server)).expect("pipeline");
        build_app(
            AppState {
                pipeline: Arc::new(pipeline),
            },
            auth,
            budget,
        )
    }

    async fn mount_feed(server: &MockServer, status: u16) {
        Mock::given(method("GET"))
            .and(path("/rss/search"))
            .and(query_param("q", "Acme"))
            .and(query_param("start", "0"))
            .respond_with(ResponseTemplate::new(status).set_body_string(FEED))
            .with_priority(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rss/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_FEED))
            .with_priority(2)
            .mount(server)
            .await;
    }

    async fn mount_translate(server: &MockServer, status: u16) {
        let body = serde_json::json!([[["एक्मे समाचार", "Acme news", null]], null, "en"]);
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(status).set_body_json(&body))
            .mount(server)
            .await;
    }

    async fn mount_tts(server: &MockServer, status: u16) {
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .respond_with(ResponseTemplate::new(status).set_body_bytes(vec![0xff, 0xf3, 0x01]))
            .mount(server)
            .await;
    }

    async fn send_get_with_id(
        app: Router,
        uri: &str,
        request_id: &str,
    ) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header("x-request-id", request_id)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, headers, json)
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_returns_ok_without_auth() {
        let server = MockServer::start().await;
        let auth = AuthState::from_config(&AppConfig {
            api_keys: vec!["secret".to_string()],
            ..test_config(&server)
        })
        .expect("auth");
        let app = app_for(&server, auth, default_analysis_budget());

        let (status, json) = send_get(app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn analyze_returns_full_report() {
        let server = MockServer::start().await;
        mount_feed(&server, 200).await;
        mount_translate(&server, 200).await;
        mount_tts(&server, 200).await;
        let app = app_for(&server, AuthState::disabled(), default_analysis_budget());

        let (status, json) = send_get(app, "/api/v1/analyze/Acme").await;
        assert_eq!(status, StatusCode::OK);

        let data = &json["data"];
        assert_eq!(data["company"], "Acme");
        assert_eq!(data["total_articles"], 3);
        let articles = data["articles"].as_array().expect("articles array");
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0]["title"], "Acme posts record profit");
        assert_eq!(articles[0]["source"], "Example Wire");
        assert_eq!(articles[0]["sentiment"], "Positive");
        assert_eq!(articles[1]["sentiment"], "Negative");
        assert_eq!(articles[2]["sentiment"], "Neutral");
        assert_eq!(articles[2]["source"], "Unknown");

        let summary = &data["summary"];
        assert_eq!(summary["positive"]["count"], 1);
        assert_eq!(summary["negative"]["count"], 1);
        assert_eq!(summary["neutral"]["count"], 1);
        assert!(summary["text"]
            .as_str()
            .expect("text")
            .contains("1 Positive (33.3%)"));
        assert_eq!(summary["translated_text"], "एक्मे समाचार");
        assert_eq!(summary["source_language"], "en");
        assert_eq!(summary["target_language"], "hi");

        let source_audio = data["audio"]["source"].as_str().expect("hex audio");
        assert!(source_audio.starts_with("fff301"));
        assert_eq!(source_audio.len() % 2, 0);
        assert!(data["audio"]["translated"].as_str().is_some());
    }

    #[tokio::test]
    async fn feed_failure_maps_to_bad_gateway() {
        let server = MockServer::start().await;
        mount_feed(&server, 503).await;
        let app = app_for(&server, AuthState::disabled(), default_analysis_budget());

        let (status, json) = send_get(app, "/api/v1/analyze/Acme").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "fetch_failed");
    }

    #[tokio::test]
    async fn translation_failure_maps_to_internal_error() {
        let server = MockServer::start().await;
        mount_feed(&server, 200).await;
        mount_translate(&server, 500).await;
        let app = app_for(&server, AuthState::disabled(), default_analysis_budget());

        let (status, json) = send_get(app, "/api/v1/analyze/Acme").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "internal_error");
        assert_eq!(json["error"]["message"], "internal server error");
    }

    #[tokio::test]
    async fn synthesis_failure_maps_to_audio_generation_failed() {
        let server = MockServer::start().await;
        mount_feed(&server, 200).await;
        mount_translate(&server, 200).await;
        mount_tts(&server, 500).await;
        let app = app_for(&server, AuthState::disabled(), default_analysis_budget());

        let (status, json) = send_get(app, "/api/v1/analyze/Acme").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "audio_generation_failed");
        assert!(json["error"]["message"]
            .as_str()
            .expect("message")
            .contains("500"));
    }

    #[tokio::test]
    async fn blank_company_is_bad_request() {
        let server = MockServer::start().await;
        let app = app_for(&server, AuthState::disabled(), default_analysis_budget());

        let (status, json) = send_get(app, "/api/v1/analyze/%20%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");
        let requests = server.received_requests().await.expect("request recording");
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn analyze_requires_bearer_token_when_enabled() {
        let server = MockServer::start().await;
        let auth = AuthState::from_config(&AppConfig {
            api_keys: vec!["secret".to_string()],
            ..test_config(&server)
        })
        .expect("auth");
        let app = app_for(&server, auth, default_analysis_budget());

        let (status, _, json) = send_get_with_id(app, "/api/v1/analyze/Acme", "req-7").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "unauthorized");
        assert_eq!(json["meta"]["request_id"], "req-7");
        assert!(json["meta"]["timestamp"].is_string());
        let requests = server.received_requests().await.expect("request recording");
        assert!(requests.is_empty(), "rejected requests never reach the feed");
    }

    #[tokio::test]
    async fn unauthorized_requests_do_not_spend_budget() {
        let server = MockServer::start().await;
        let auth = AuthState::from_config(&AppConfig {
            api_keys: vec!["secret".to_string()],
            ..test_config(&server)
        })
        .expect("auth");
        let app = app_for(&server, auth, AnalysisBudget::new(1, Duration::from_secs(60)));

        let (status, _) = send_get(app.clone(), "/api/v1/analyze/%20").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/analyze/%20")
                    .header("authorization", "Bearer secret")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_bearer_token_reaches_handler() {
        let server = MockServer::start().await;
        let auth = AuthState::from_config(&AppConfig {
            api_keys: vec!["secret".to_string()],
            ..test_config(&server)
        })
        .expect("auth");
        let app = app_for(&server, auth, default_analysis_budget());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/analyze/%20")
                    .header("authorization", "Bearer secret")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn analyze_is_rate_limited() {
        let server = MockServer::start().await;
        let app = app_for(
            &server,
            AuthState::disabled(),
            AnalysisBudget::new(1, Duration::from_secs(60)),
        );

        let (first, _) = send_get(app.clone(), "/api/v1/analyze/%20").await;
        assert_eq!(first, StatusCode::BAD_REQUEST);
        let (second, headers, json) = send_get_with_id(app, "/api/v1/analyze/%20", "req-8").await;
        assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"]["code"], "rate_limited");
        assert_eq!(json["meta"]["request_id"], "req-8");
        assert!(json["meta"]["timestamp"].is_string());
        let retry_after: u64 = headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .expect("retry-after header");
        assert!((1..=60).contains(&retry_after));
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let server = MockServer::start().await;
        let app = app_for(&server, AuthState::disabled(), default_analysis_budget());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-42")
        );
    }

    #[test]
    fn error_codes_map_to_statuses() {
        let cases = [
            ("bad_request", StatusCode::BAD_REQUEST),
            ("unauthorized", StatusCode::UNAUTHORIZED),
            ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
            ("fetch_failed", StatusCode::BAD_GATEWAY),
            ("audio_generation_failed", StatusCode::INTERNAL_SERVER_ERROR),
            ("audio_read_failed", StatusCode::INTERNAL_SERVER_ERROR),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, expected) in cases {
            let response = ApiError::new("req-1", code, "msg").into_response();
            assert_eq!(response.status(), expected, "code {code}");
        }
    }
}
