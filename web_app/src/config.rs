//! Client configuration read from the host page.
//!
//! The page may carry `<meta name="admin-api-base" content="...">` and
//! `<meta name="admin-log-level" content="info">`. Everything else is fixed.

use std::time::Duration;

use web_common::COLOR_LOOKUP_BATCH;

const API_BASE_META: &str = "admin-api-base";
const LOG_LEVEL_META: &str = "admin-log-level";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Prefix for every request path. Empty means same-origin.
    pub api_base: String,
    pub log_level: log::Level,
    pub stream_poll: Duration,
    pub epg_refresh_period: Duration,
    pub epg_refresh_attempts: u32,
    pub ticker_period: Duration,
    /// Delay before reloading after a successful settings action.
    pub reload_delay: Duration,
    /// Delay before hiding an inline status message after a failure.
    pub hide_delay: Duration,
    pub stop_reenable_delay: Duration,
    /// How long a row stays highlighted after an inline edit.
    pub row_flag_duration: Duration,
    pub epg_search_limit: u32,
    pub color_lookup_batch: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            log_level: log::Level::Debug,
            stream_poll: Duration::from_secs(5),
            epg_refresh_period: Duration::from_millis(500),
            epg_refresh_attempts: 10,
            ticker_period: Duration::from_millis(400),
            reload_delay: Duration::from_secs(3),
            hide_delay: Duration::from_secs(5),
            stop_reenable_delay: Duration::from_millis(1500),
            row_flag_duration: Duration::from_millis(1500),
            epg_search_limit: 50,
            color_lookup_batch: COLOR_LOOKUP_BATCH,
        }
    }
}

impl ClientConfig {
    /// Build the configuration from the current document's meta tags.
    pub fn from_document() -> Self {
        let mut config = Self::default();

        if let Some(base) = meta_content(API_BASE_META) {
            config.api_base = base.trim_end_matches('/').to_string();
        } else if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
            config.api_base = origin;
        }

        if let Some(level) = meta_content(LOG_LEVEL_META).and_then(|l| parse_level(&l)) {
            config.log_level = level;
        }

        config
    }
}

fn meta_content(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let selector = format!("meta[name=\"{}\"]", name);
    let element = document.query_selector(&selector).ok()??;
    element
        .get_attribute("content")
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn parse_level(text: &str) -> Option<log::Level> {
    match text.to_ascii_lowercase().as_str() {
        "error" => Some(log::Level::Error),
        "warn" | "warning" => Some(log::Level::Warn),
        "info" => Some(log::Level::Info),
        "debug" => Some(log::Level::Debug),
        "trace" => Some(log::Level::Trace),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_names_are_case_insensitive() {
        assert_eq!(parse_level("WARN"), Some(log::Level::Warn));
        assert_eq!(parse_level("trace"), Some(log::Level::Trace));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn defaults_match_polling_contract() {
        let config = ClientConfig::default();
        assert_eq!(config.stream_poll, Duration::from_secs(5));
        assert_eq!(config.epg_refresh_period, Duration::from_millis(500));
        assert_eq!(config.epg_refresh_attempts, 10);
        assert_eq!(config.color_lookup_batch, 5);
    }
}
