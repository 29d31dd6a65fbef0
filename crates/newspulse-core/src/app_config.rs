use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Locale parameters appended to every news feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLocale {
    /// Interface language, e.g. `en-US` (`hl`).
    pub language: String,
    /// Geographic region, e.g. `US` (`gl`).
    pub region: String,
    /// Edition identifier, e.g. `US:en` (`ceid`).
    pub edition: String,
}

impl Default for FeedLocale {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            region: "US".to_string(),
            edition: "US:en".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_keys: Vec<String>,
    pub feed_base_url: String,
    pub feed_locale: FeedLocale,
    pub feed_timeout_secs: u64,
    pub user_agent: String,
    pub translate_base_url: String,
    pub tts_base_url: String,
    pub source_language: String,
    pub target_language: String,
    pub audio_dir: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .field("feed_base_url", &self.feed_base_url)
            .field("feed_locale", &self.feed_locale)
            .field("feed_timeout_secs", &self.feed_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("translate_base_url", &self.translate_base_url)
            .field("tts_base_url", &self.tts_base_url)
            .field("source_language", &self.source_language)
            .field("target_language", &self.target_language)
            .field("audio_dir", &self.audio_dir)
            .finish()
    }
}
