//! Instance-wide agenda configuration.
//!
//! Loaded from a TOML file. Defaults mirror the stock calendar display:
//! three entries, a one-year window, relative times with a 7-day urgency
//! threshold.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};
use crate::source::SourceConfig;

/// How event times are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// Relative phrases ("in 3 hours", "Tomorrow at 9:00").
    #[default]
    Relative,
    /// Absolute dates, softened by the urgency threshold.
    Absolute,
    /// Grouped under per-day headers; times shown absolutely.
    Dateheaders,
}

/// One ordered title replacement. The needle is either a literal substring
/// or `/pattern/flags` regex syntax; order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleReplacement {
    pub needle: String,
    pub replacement: String,
}

impl TitleReplacement {
    pub fn new(needle: &str, replacement: &str) -> Self {
        TitleReplacement {
            needle: needle.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// Instance-wide display and filtering policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgendaConfig {
    pub maximum_entries: usize,
    pub maximum_number_of_days: i64,
    pub fetch_interval_ms: u64,

    pub fade: bool,
    pub fade_point: f64,

    pub time_format: TimeFormat,
    /// Day threshold below which absolute dates become relative phrases.
    pub urgency: i64,
    /// Hour threshold below which upcoming events are always relative.
    pub get_relative: i64,
    pub next_days_relative: bool,
    pub date_format: String,
    pub date_end_format: String,
    pub full_day_event_date_format: String,
    pub show_end: bool,
    /// 12 or 24; anything else keeps the default clock.
    pub hour_format: Option<u8>,

    pub hide_private: bool,
    pub hide_ongoing: bool,
    pub slice_multi_day_events: bool,

    pub broadcast_events: bool,
    pub broadcast_past_events: bool,
    pub excluded_events: Vec<String>,

    pub default_symbol: String,
    pub display_repeating_count_title: bool,
    pub default_repeating_count_title: String,

    pub title_replace: Vec<TitleReplacement>,
    pub max_title_length: usize,
    pub wrap_events: bool,
    pub max_title_lines: usize,

    pub sources: Vec<SourceConfig>,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            maximum_entries: 3,
            maximum_number_of_days: 365,
            fetch_interval_ms: 60_000,
            fade: true,
            fade_point: 0.25,
            time_format: TimeFormat::Relative,
            urgency: 7,
            get_relative: 6,
            next_days_relative: false,
            date_format: "MMM Do".into(),
            date_end_format: "LT".into(),
            full_day_event_date_format: "MMM Do".into(),
            show_end: false,
            hour_format: None,
            hide_private: false,
            hide_ongoing: false,
            slice_multi_day_events: false,
            broadcast_events: true,
            broadcast_past_events: false,
            excluded_events: Vec::new(),
            default_symbol: "calendar".into(),
            display_repeating_count_title: true,
            default_repeating_count_title: String::new(),
            title_replace: vec![
                TitleReplacement::new("De verjaardag van ", ""),
                TitleReplacement::new("'s birthday", ""),
            ],
            max_title_length: 100,
            wrap_events: false,
            max_title_lines: 3,
            sources: Vec::new(),
        }
    }
}

impl AgendaConfig {
    /// Load the configuration from a TOML file.
    pub fn load(path: &Path) -> AgendaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AgendaError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_display() {
        let config = AgendaConfig::default();
        assert_eq!(config.maximum_entries, 3);
        assert_eq!(config.maximum_number_of_days, 365);
        assert_eq!(config.urgency, 7);
        assert_eq!(config.get_relative, 6);
        assert_eq!(config.time_format, TimeFormat::Relative);
        assert_eq!(config.date_format, "MMM Do");
        assert_eq!(config.date_end_format, "LT");
        assert!(config.broadcast_events);
        assert_eq!(config.title_replace.len(), 2);
    }

    #[test]
    fn parses_toml_with_sources_and_rules() {
        let toml = r#"
            maximum_entries = 10
            time_format = "absolute"
            hour_format = 24

            [[title_replace]]
            needle = "/\\bMeeting\\b/g"
            replacement = "Mtg"

            [[sources]]
            url = "https://example.org/work.ics"
            symbol = "briefcase"
            maximum_entries = 5

            [[sources]]
            url = "webcal://example.org/home.ics"
            user = "alice"
            pass = "secret"
        "#;
        let config: AgendaConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.maximum_entries, 10);
        assert_eq!(config.time_format, TimeFormat::Absolute);
        assert_eq!(config.hour_format, Some(24));
        assert_eq!(config.title_replace.len(), 1);
        assert_eq!(config.title_replace[0].needle, "/\\bMeeting\\b/g");
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].maximum_entries, Some(5));
        assert_eq!(config.sources[1].user.as_deref(), Some("alice"));
        // Untouched fields keep their defaults.
        assert_eq!(config.maximum_number_of_days, 365);
    }

    #[test]
    fn time_format_names_are_lowercase() {
        assert_eq!(
            serde_json::to_value(TimeFormat::Dateheaders).unwrap(),
            "dateheaders"
        );
        assert_eq!(serde_json::to_value(TimeFormat::Relative).unwrap(), "relative");
    }
}
