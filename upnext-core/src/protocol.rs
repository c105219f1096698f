//! Wire messages exchanged with the fetch collaborator.
//!
//! Both directions are JSON objects tagged with a `type` field. Commands
//! flow out to the fetcher, notifications flow back in.

use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};
use crate::event::CalendarEvent;
use crate::source::Auth;

/// A command sent to the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetcherCommand {
    RegisterSource(RegisterSource),
}

impl FetcherCommand {
    /// Serializes the command as one JSON wire line (without the newline).
    pub fn to_wire_line(&self) -> AgendaResult<String> {
        serde_json::to_string(self).map_err(|e| AgendaError::Serialization(e.to_string()))
    }
}

/// The resolved fetch parameters for one source: instance defaults with
/// the per-source overrides already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSource {
    /// Source id; the normalized URL.
    pub id: String,
    pub excluded_events: Vec<String>,
    pub maximum_entries: usize,
    pub maximum_number_of_days: i64,
    /// Poll interval in milliseconds.
    pub fetch_interval: u64,
    pub symbol_class: String,
    pub title_class: String,
    pub time_class: String,
    pub broadcast_past_events: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
}

/// A notification received from the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetcherNotification {
    /// A fresh batch for one source, replacing its previous batch.
    #[serde(rename_all = "camelCase")]
    EventsDelivered {
        id: String,
        events: Vec<CalendarEvent>,
    },
    /// The fetch failed; previously delivered events stay on display.
    #[serde(rename_all = "camelCase")]
    FetchError { id: String },
    /// The source URL cannot be fetched at all.
    #[serde(rename_all = "camelCase")]
    IncorrectUrl { id: String },
}

impl FetcherNotification {
    /// Parses a notification out of a raw JSON value.
    pub fn from_value(value: &serde_json::Value) -> AgendaResult<Self> {
        serde_json::from_value(value.clone()).map_err(|e| AgendaError::Protocol(e.to_string()))
    }

    /// The source id the notification refers to.
    pub fn source_id(&self) -> &str {
        match self {
            FetcherNotification::EventsDelivered { id, .. }
            | FetcherNotification::FetchError { id }
            | FetcherNotification::IncorrectUrl { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_command_wire_shape() {
        let command = FetcherCommand::RegisterSource(RegisterSource {
            id: "https://example.org/a.ics".into(),
            excluded_events: vec!["Private".into()],
            maximum_entries: 3,
            maximum_number_of_days: 365,
            fetch_interval: 60_000,
            symbol_class: String::new(),
            title_class: String::new(),
            time_class: String::new(),
            broadcast_past_events: false,
            auth: None,
        });
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["type"], "REGISTER_SOURCE");
        assert_eq!(value["id"], "https://example.org/a.ics");
        assert_eq!(value["maximumNumberOfDays"], 365);
        assert_eq!(value["fetchInterval"], 60_000);
        // Absent credentials stay off the wire.
        assert!(value.get("auth").is_none());
    }

    #[test]
    fn parses_delivered_events() {
        let json = r#"{
            "type": "EVENTS_DELIVERED",
            "id": "https://example.org/a.ics",
            "events": [
                {"title": "Standup", "startDate": 1, "endDate": 2}
            ]
        }"#;
        let notification: FetcherNotification = serde_json::from_str(json).unwrap();
        let FetcherNotification::EventsDelivered { id, events } = notification else {
            panic!("wrong variant");
        };
        assert_eq!(id, "https://example.org/a.ics");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Standup");
    }

    #[test]
    fn parses_error_notifications() {
        let error: FetcherNotification =
            serde_json::from_str(r#"{"type": "FETCH_ERROR", "id": "x"}"#).unwrap();
        assert_eq!(error, FetcherNotification::FetchError { id: "x".into() });

        let bad_url: FetcherNotification =
            serde_json::from_str(r#"{"type": "INCORRECT_URL", "id": "x"}"#).unwrap();
        assert_eq!(bad_url.source_id(), "x");
    }

    #[test]
    fn unknown_notification_kind_is_a_protocol_error() {
        let value = serde_json::json!({"type": "SOMETHING_ELSE", "id": "x"});
        let result = FetcherNotification::from_value(&value);
        assert!(matches!(result, Err(AgendaError::Protocol(_))));
    }

    #[test]
    fn wire_line_round_trips() {
        let command = FetcherCommand::RegisterSource(RegisterSource {
            id: "a".into(),
            excluded_events: vec![],
            maximum_entries: 3,
            maximum_number_of_days: 365,
            fetch_interval: 60_000,
            symbol_class: String::new(),
            title_class: String::new(),
            time_class: String::new(),
            broadcast_past_events: false,
            auth: None,
        });
        let line = command.to_wire_line().unwrap();
        assert!(!line.contains('\n'));
        let parsed: FetcherCommand = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, command);
    }
}
