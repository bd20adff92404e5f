//! Environment-driven configuration

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Per-session game settings
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// How long correct/incorrect feedback stays up before the next round
    pub feedback_delay: Duration,
    /// How long the "copied" flag stays set after sharing
    pub copied_reset: Duration,
    /// Upper bound for reading the dataset
    pub load_timeout: Duration,
    /// URL prefix portraits are served under
    pub portrait_base_url: String,
    /// Site shown at the bottom of the share text
    pub share_site_url: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            feedback_delay: Duration::from_millis(1500),
            copied_reset: Duration::from_millis(2000),
            load_timeout: Duration::from_secs(10),
            portrait_base_url: "/portraits".to_string(),
            share_site_url: "senatordle.com".to_string(),
        }
    }
}

impl GameConfig {
    /// Load game settings from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let feedback_delay = env_parse("FEEDBACK_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.feedback_delay);

        let copied_reset = env_parse("COPIED_RESET_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.copied_reset);

        let load_timeout = env_parse("LOAD_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.load_timeout);

        let portrait_base_url = env_string("PORTRAIT_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.portrait_base_url);

        let share_site_url = env_string("SHARE_SITE_URL").unwrap_or(defaults.share_site_url);

        Self {
            feedback_delay,
            copied_reset,
            load_timeout,
            portrait_base_url,
            share_site_url,
        }
    }

    /// Public URL of a Senator's portrait
    pub fn portrait_url(&self, portrait_file: &str) -> String {
        format!("{}/{}", self.portrait_base_url, portrait_file)
    }
}

/// Server settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Directory holding `senators_metadata.json` and `portraits/`
    pub static_dir: PathBuf,
    /// File path or http(s) URL of the roster dataset
    pub dataset: String,
    pub game: GameConfig,
}

impl AppConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let port = env_parse("PORT").unwrap_or(3000);

        let static_dir = env_string("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static"));

        let dataset = env_string("SENATORS_DATASET").unwrap_or_else(|| {
            static_dir
                .join("senators_metadata.json")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            port,
            static_dir,
            dataset,
            game: GameConfig::from_env(),
        }
    }
}

/// Non-empty, trimmed env var
fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parsed env var; invalid values are logged and ignored
fn env_parse<T: FromStr>(key: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    let raw = env_string(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Invalid {} value {:?}: {}. Using default.", key, raw, e);
            None
        }
    }
}
