//! Calendar event types.
//!
//! `CalendarEvent` is the wire-level record delivered by the fetch
//! collaborator. The builder never hands stored records back out directly:
//! display and broadcast consumers each get their own decorated clones.

use serde::{Deserialize, Serialize};

/// A raw calendar event as delivered by the fetch collaborator.
///
/// Timestamps are epoch milliseconds with `start_date <= end_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    pub start_date: i64,
    pub end_date: i64,
    #[serde(default)]
    pub full_day_event: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Wire name `class`, after the iCal CLASS property.
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// First year of a recurring event, used for "Nth occurrence" labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_year: Option<i32>,
}

/// Event visibility classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    Public,
    Private,
}

/// An event selected for display: a clone of a stored event stamped with
/// its owning source id and whether it starts today.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEvent {
    #[serde(flatten)]
    pub event: CalendarEvent,
    pub source_id: String,
    pub today: bool,
}

/// An event as shared with other display consumers: decorated with its
/// resolved symbol, calendar name and color, with the source key removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastEvent {
    #[serde(flatten)]
    pub event: CalendarEvent,
    pub symbol: String,
    pub calendar_name: String,
    pub color: String,
}
