//! Text translation client.

use std::future::Future;
use std::time::Duration;

use newspulse_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::SpeechError;

const SERVICE: &str = "translate";

/// Longest input accepted in a single translation request.
pub const MAX_TRANSLATE_CHARS: usize = 5000;

/// Translates text between two language codes (e.g. `en` → `hi`).
pub trait Translator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SpeechError`] if the text is too long or the service fails.
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> impl Future<Output = Result<String, SpeechError>> + Send;
}

/// Client for the public Google Translate `translate_a/single` endpoint.
pub struct GoogleTranslator {
    client: Client,
    base_url: Url,
}

impl GoogleTranslator {
    /// Creates a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError`] if the base URL is invalid or the client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SpeechError> {
        Self::with_base_url(
            &config.translate_base_url,
            config.feed_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SpeechError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .and_then(|u| u.join("translate_a/single"))
            .map_err(|e| SpeechError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    fn build_url(&self, text: &str, source: &str, target: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", source)
            .append_pair("tl", target)
            .append_pair("dt", "t")
            .append_pair("q", text);
        url
    }
}

impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, SpeechError> {
        let len = text.chars().count();
        if len > MAX_TRANSLATE_CHARS {
            return Err(SpeechError::TextTooLong {
                len,
                max: MAX_TRANSLATE_CHARS,
            });
        }
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let url = self.build_url(text, source, target);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::UnexpectedStatus {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SpeechError::MalformedResponse {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        let translated = extract_translation(&payload)?;
        tracing::debug!(source, target, chars = translated.chars().count(), "translated text");
        Ok(translated)
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The response is a nested array whose first element lists
/// `[translated, original, ...]` segments.
fn extract_translation(payload: &serde_json::Value) -> Result<String, SpeechError> {
    let segments = payload
        .get(0)
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| SpeechError::MalformedResponse {
            service: SERVICE,
            reason: "missing segment list".to_string(),
        })?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(serde_json::Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(SpeechError::MalformedResponse {
            service: SERVICE,
            reason: "no translated segments".to_string(),
        });
    }
    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_and_joins_segments() {
        let payload = json!([
            [["पहला वाक्य। ", "First sentence. ", null], ["दूसरा।", "Second.", null]],
            null,
            "en"
        ]);
        assert_eq!(
            extract_translation(&payload).expect("should extract"),
            "पहला वाक्य। दूसरा।"
        );
    }

    #[test]
    fn missing_segment_list_is_malformed() {
        let payload = json!({"error": "nope"});
        assert!(matches!(
            extract_translation(&payload),
            Err(SpeechError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn empty_segments_are_malformed() {
        let payload = json!([[], null, "en"]);
        assert!(matches!(
            extract_translation(&payload),
            Err(SpeechError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn build_url_encodes_text() {
        let translator =
            GoogleTranslator::with_base_url("https://translate.example.com/", 5, "test").unwrap();
        let url = translator.build_url("Acme & Co: 33.3%", "en", "hi");
        assert_eq!(url.path(), "/translate_a/single");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".to_string(), "Acme & Co: 33.3%".to_string())));
        assert!(pairs.contains(&("tl".to_string(), "hi".to_string())));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GoogleTranslator::with_base_url("not a url", 5, "test");
        assert!(matches!(result, Err(SpeechError::InvalidBaseUrl { .. })));
    }

    #[tokio::test]
    async fn oversized_text_is_rejected_without_request() {
        let translator =
            GoogleTranslator::with_base_url("http://127.0.0.1:1", 1, "test").unwrap();
        let text = "a".repeat(MAX_TRANSLATE_CHARS + 1);
        let result = translator.translate(&text, "en", "hi").await;
        assert!(matches!(
            result,
            Err(SpeechError::TextTooLong { len, max }) if len == MAX_TRANSLATE_CHARS + 1 && max == MAX_TRANSLATE_CHARS
        ));
    }

    #[tokio::test]
    async fn blank_text_translates_to_empty() {
        let translator =
            GoogleTranslator::with_base_url("http://127.0.0.1:1", 1, "test").unwrap();
        assert_eq!(translator.translate("  ", "en", "hi").await.unwrap(), "");
    }
}
