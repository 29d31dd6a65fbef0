use crate::app_config::{AppConfig, Environment, FeedLocale};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it from a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let invalid = |reason: String| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason,
        };
        let url = reqwest::Url::parse(&raw).map_err(|e| invalid(format!("'{raw}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid(format!("expected an http(s) URL with a host, got '{raw}'")));
        }
        Ok(raw.trim_end_matches('/').to_string())
    };

    let env = parse_environment(&or_default("NEWSPULSE_ENV", "development"))?;
    let bind_addr = parse_addr("NEWSPULSE_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("NEWSPULSE_LOG_LEVEL", "info");

    let api_keys: Vec<String> = or_default("NEWSPULSE_API_KEYS", "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if api_keys.is_empty() && env == Environment::Production {
        return Err(ConfigError::MissingEnvVar("NEWSPULSE_API_KEYS".to_string()));
    }

    let feed_base_url = parse_url("NEWSPULSE_FEED_BASE_URL", "https://news.google.com")?;
    let defaults = FeedLocale::default();
    let feed_locale = FeedLocale {
        language: or_default("NEWSPULSE_FEED_LANGUAGE", &defaults.language),
        region: or_default("NEWSPULSE_FEED_REGION", &defaults.region),
        edition: or_default("NEWSPULSE_FEED_EDITION", &defaults.edition),
    };
    let feed_timeout_secs = parse_u64("NEWSPULSE_FEED_TIMEOUT_SECS", "10")?;
    if feed_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSPULSE_FEED_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }
    let user_agent = or_default("NEWSPULSE_USER_AGENT", "newspulse/0.1 (news-sentiment)");

    let translate_base_url = parse_url(
        "NEWSPULSE_TRANSLATE_BASE_URL",
        "https://translate.googleapis.com",
    )?;
    let tts_base_url = parse_url("NEWSPULSE_TTS_BASE_URL", "https://translate.google.com")?;
    let source_language = or_default("NEWSPULSE_SOURCE_LANGUAGE", "en");
    let target_language = or_default("NEWSPULSE_TARGET_LANGUAGE", "hi");

    let audio_dir = lookup("NEWSPULSE_AUDIO_DIR")
        .map_or_else(|_| std::env::temp_dir(), PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_keys,
        feed_base_url,
        feed_locale,
        feed_timeout_secs,
        user_agent,
        translate_base_url,
        tts_base_url,
        source_language,
        target_language,
        audio_dir,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEWSPULSE_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
