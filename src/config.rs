use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::constants;

/// Runtime settings. Every field has a default so no variable is required.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub http_timeout: Duration,
    pub chart_png_path: Option<PathBuf>, // PNG export target, off when unset.
    pub chart_height: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: constants::DEFAULT_API_BASE.to_string(),
            http_timeout: Duration::from_secs(constants::DEFAULT_HTTP_TIMEOUT_SECS),
            chart_png_path: None,
            chart_height: constants::DEFAULT_CHART_HEIGHT,
        }
    }
}

impl Config {
    /// Reads overrides from the process environment (after `.env` is loaded).
    pub fn from_env() -> Config {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
        let defaults = Config::default();
        Config {
            api_base: lookup("COINGECKO_API_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.api_base),
            http_timeout: Duration::from_secs(
                parse_or(&lookup, "HTTP_TIMEOUT_SECS", constants::DEFAULT_HTTP_TIMEOUT_SECS).max(1),
            ),
            chart_png_path: lookup("CHART_PNG_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            chart_height: parse_or(&lookup, "CHART_HEIGHT", defaults.chart_height).max(5),
        }
    }
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("ignoring {}={:?}, not a valid number", key, raw);
                default
            }
        },
        None => default,
    }
}
