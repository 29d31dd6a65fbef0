//! Request boundary for the API: request ids, bearer auth, and the
//! analysis budget.
//!
//! Every rejection is rendered through [`ApiError`] so clients always get the
//! `{error, meta}` envelope with the request id.

use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use newspulse_core::{AppConfig, Environment};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::ApiError;

const ANALYZE_PREFIX: &str = "/api/v1/analyze/";
const MAX_REQUEST_ID_LEN: usize = 128;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// API key auth settings used by middleware.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<HashSet<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from the configured bearer tokens.
    ///
    /// In development, an empty key list disables auth for local iteration.
    /// In any other environment, an empty key list fails startup.
    ///
    /// # Errors
    ///
    /// Returns an error if no keys are configured outside development.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let keys: HashSet<String> = config
            .api_keys
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if keys.is_empty() {
            if config.env == Environment::Development {
                tracing::warn!(
                    "NEWSPULSE_API_KEYS not set; bearer auth disabled in development environment"
                );
                return Ok(Self::disabled());
            }

            anyhow::bail!(
                "NEWSPULSE_API_KEYS is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self {
            api_keys: Arc::new(keys),
            enabled: true,
        })
    }

    /// Auth that lets every request through.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            api_keys: Arc::new(HashSet::new()),
            enabled: false,
        }
    }

    fn allows(&self, token: &str) -> bool {
        self.api_keys.contains(token)
    }
}

#[derive(Debug)]
struct BudgetWindow {
    started_at: Instant,
    runs: usize,
}

/// Caps how many analyses may start per fixed window.
///
/// Each analysis fans out to up to fifteen feed pages plus translation and
/// speech calls, so the budget counts analysis runs, not raw requests.
#[derive(Debug, Clone)]
pub struct AnalysisBudget {
    max_runs: usize,
    window: Duration,
    state: Arc<Mutex<BudgetWindow>>,
}

impl AnalysisBudget {
    #[must_use]
    pub fn new(max_runs: usize, window: Duration) -> Self {
        Self {
            max_runs,
            window,
            state: Arc::new(Mutex::new(BudgetWindow {
                started_at: Instant::now(),
                runs: 0,
            })),
        }
    }

    /// Reserve one run, or return how long until the window resets.
    pub async fn try_acquire(&self) -> Result<(), Duration> {
        let mut state = self.state.lock().await;
        if state.started_at.elapsed() >= self.window {
            state.started_at = Instant::now();
            state.runs = 0;
        }

        if state.runs >= self.max_runs {
            return Err(self.window.saturating_sub(state.started_at.elapsed()));
        }
        state.runs += 1;
        Ok(())
    }
}

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map_or_else(|| "unknown".to_string(), |id| id.0.clone())
}

/// Raw (still percent-encoded) company segment of an analysis path.
fn company_of(req: &Request) -> &str {
    req.uri()
        .path()
        .strip_prefix(ANALYZE_PREFIX)
        .unwrap_or_default()
}

/// Keep a caller-supplied id only if it is short printable ASCII.
fn accept_request_id(value: Option<&HeaderValue>) -> Option<String> {
    value
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map(ToOwned::to_owned)
}

/// Assign a request id, run the request inside a span carrying it, and echo
/// it back in `x-request-id`.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = accept_request_id(req.headers().get("x-request-id"))
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    let started = Instant::now();
    let mut res = next.run(req).instrument(span.clone()).await;
    span.in_scope(|| {
        tracing::debug!(
            status = res.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis(),
            "request finished"
        );
    });

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }
    res
}

/// Reject analysis requests without a configured bearer token.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    if extract_bearer_token(req.headers().get(AUTHORIZATION)).is_some_and(|t| auth.allows(t)) {
        return next.run(req).await;
    }

    let request_id = request_id_of(&req);
    tracing::warn!(
        request_id = %request_id,
        company = company_of(&req),
        "rejected analysis request: missing or invalid bearer token"
    );
    ApiError::new(request_id, "unauthorized", "missing or invalid bearer token").into_response()
}

/// Spend one unit of the analysis budget, or answer 429 with `Retry-After`.
pub async fn enforce_analysis_budget(
    State(budget): State<AnalysisBudget>,
    req: Request,
    next: Next,
) -> Response {
    match budget.try_acquire().await {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            let request_id = request_id_of(&req);
            let retry_secs = retry_after.as_secs().max(1);
            tracing::warn!(
                request_id = %request_id,
                company = company_of(&req),
                retry_after_secs = retry_secs,
                "analysis budget exhausted"
            );

            let mut res = ApiError::new(
                request_id,
                "rate_limited",
                format!("analysis budget exhausted; retry in {retry_secs}s"),
            )
            .into_response();
            res.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_secs));
            res
        }
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
