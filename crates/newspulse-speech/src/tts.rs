//! Text-to-speech client producing MP3 audio.

use std::future::Future;
use std::time::Duration;

use newspulse_core::AppConfig;
use regex::Regex;
use reqwest::{Client, Url};

use crate::error::SpeechError;

const SERVICE: &str = "tts";

/// Longest text the TTS endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Turns text into spoken audio in the given language.
pub trait SpeechSynthesizer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SpeechError`] if the text is empty or the service fails.
    fn synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> impl Future<Output = Result<Vec<u8>, SpeechError>> + Send;
}

/// Client for the Google Translate `translate_tts` endpoint.
///
/// Text is split into chunks of at most [`MAX_CHUNK_CHARS`] characters, each
/// chunk is fetched in order, and the MP3 frames are concatenated.
pub struct GoogleTts {
    client: Client,
    base_url: Url,
}

impl GoogleTts {
    /// Creates a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError`] if the base URL is invalid or the client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SpeechError> {
        Self::with_base_url(
            &config.tts_base_url,
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
            .and_then(|u| u.join("translate_tts"))
            .map_err(|e| SpeechError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    fn build_url(&self, chunk: &str, language: &str, idx: usize, total: usize) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("client", "tw-ob")
            .append_pair("tl", language)
            .append_pair("ttsspeed", "1")
            .append_pair("q", chunk)
            .append_pair("total", &total.to_string())
            .append_pair("idx", &idx.to_string())
            .append_pair("textlen", &chunk.chars().count().to_string());
        url
    }
}

impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SpeechError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.build_url(chunk, language, idx, total);
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SpeechError::UnexpectedStatus {
                    service: SERVICE,
                    status: status.as_u16(),
                });
            }
            audio.extend_from_slice(&response.bytes().await?);
        }

        if audio.is_empty() {
            return Err(SpeechError::MalformedResponse {
                service: SERVICE,
                reason: "empty audio body".to_string(),
            });
        }

        tracing::debug!(language, chunks = total, bytes = audio.len(), "synthesized speech");
        Ok(audio)
    }
}

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Breaks preferably after sentence or clause punctuation that is followed by
/// whitespace (so `33.3` stays whole), then between words, and only splits a
/// word when it alone exceeds `max_chars`. Adjacent short pieces are packed
/// together. Blank input yields no chunks.
#[must_use]
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let boundary = Regex::new(r"[.!?;:,।]+(?:\s+|$)").expect("valid boundary regex");
    let max_chars = max_chars.max(1);

    let mut pieces = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(text) {
        pieces.push(&text[start..m.end()]);
        start = m.end();
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for piece in pieces.into_iter().map(str::trim).filter(|p| !p.is_empty()) {
        if piece.chars().count() <= max_chars {
            pack(&mut chunks, &mut current, piece, max_chars);
            continue;
        }
        for word in piece.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for part in chars.chunks(max_chars) {
                let part: String = part.iter().collect();
                pack(&mut chunks, &mut current, &part, max_chars);
            }
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn pack(chunks: &mut Vec<String>, current: &mut String, part: &str, max_chars: usize) {
    let current_len = current.chars().count();
    let needed = if current.is_empty() {
        part.chars().count()
    } else {
        current_len + 1 + part.chars().count()
    };

    if needed > max_chars && !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
    if !current.is_empty() {
        current.push(' ');
    }
    current.push_str(part);
}
