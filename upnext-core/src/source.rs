//! Per-source configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Credentials forwarded to the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auth {
    pub user: String,
    pub pass: String,
}

/// A configured calendar source. The URL doubles as the source id.
///
/// All override fields fall back to the instance-wide defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,

    pub auth: Option<Auth>,
    /// Deprecated: use the `auth` table instead.
    pub user: Option<String>,
    /// Deprecated: use the `auth` table instead.
    pub pass: Option<String>,

    // Display overrides
    pub symbol: Option<String>,
    pub symbol_class: Option<String>,
    pub title_class: Option<String>,
    pub time_class: Option<String>,
    pub color: Option<String>,
    pub name: Option<String>,
    pub repeating_count_title: Option<String>,

    // Policy overrides
    pub maximum_entries: Option<usize>,
    pub maximum_number_of_days: Option<i64>,
    pub excluded_events: Option<Vec<String>>,
    pub broadcast_past_events: Option<bool>,
}

impl SourceConfig {
    /// Rewrites `webcal://` URLs to `http://` and folds the legacy
    /// `user`/`pass` pair into a structured `auth` value.
    pub fn normalize(&mut self) {
        if let Some(rest) = self.url.strip_prefix("webcal://") {
            self.url = format!("http://{rest}");
        }

        if self.user.is_some() && self.pass.is_some() {
            warn!(
                url = %self.url,
                "deprecated `user`/`pass` source options, please move them into an `auth` table"
            );
            if let (Some(user), Some(pass)) = (self.user.take(), self.pass.take()) {
                self.auth = Some(Auth { user, pass });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_webcal_urls() {
        let mut source = SourceConfig {
            url: "webcal://example.org/basic.ics".into(),
            ..SourceConfig::default()
        };
        source.normalize();
        assert_eq!(source.url, "http://example.org/basic.ics");
    }

    #[test]
    fn folds_legacy_credentials() {
        let mut source = SourceConfig {
            url: "https://example.org/a.ics".into(),
            user: Some("alice".into()),
            pass: Some("secret".into()),
            ..SourceConfig::default()
        };
        source.normalize();
        assert_eq!(
            source.auth,
            Some(Auth {
                user: "alice".into(),
                pass: "secret".into()
            })
        );
        assert_eq!(source.user, None);
        assert_eq!(source.pass, None);
    }

    #[test]
    fn keeps_structured_auth_shape() {
        let mut source = SourceConfig {
            url: "https://example.org/a.ics".into(),
            auth: Some(Auth {
                user: "a".into(),
                pass: "b".into(),
            }),
            ..SourceConfig::default()
        };
        source.normalize();
        assert_eq!(source.auth.as_ref().map(|a| a.user.as_str()), Some("a"));
    }
}
