use anyhow::{anyhow, Context, Result};

use crate::layout::Typeface;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Typeface used by the built-in measurer when a request names none.
    pub typeface: Typeface,
    /// Upper bound on topics accepted per layout request.
    pub max_topics: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            typeface: Typeface::default(),
            max_topics: 500,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            port: match lookup("PORT") {
                Some(v) => v
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            typeface: match lookup("CLOUD_TYPEFACE") {
                Some(v) => v
                    .parse::<Typeface>()
                    .map_err(|e| anyhow!(e))
                    .context("CLOUD_TYPEFACE must be one of inter, eb-garamond, oswald")?,
                None => defaults.typeface,
            },
            max_topics: match lookup("CLOUD_MAX_TOPICS") {
                Some(v) => v
                    .parse::<usize>()
                    .context("CLOUD_MAX_TOPICS must be a non-negative integer")?,
                None => defaults.max_topics,
            },
        })
    }
}
