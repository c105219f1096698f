//! Core agenda logic for the upnext ecosystem.
//!
//! This crate turns raw calendar-source event batches into a bounded,
//! de-duplicated, time-windowed, chronologically ordered display list,
//! and produces human-readable relative-time labels for each event:
//! - `Agenda` is the instance that receives fetcher notifications
//! - `builder` constructs the display list from the stored batches
//! - `title` and `label` produce per-event display strings
//! - `protocol` defines the JSON contract with the fetch collaborator

pub mod agenda;
pub mod builder;
pub mod config;
pub mod error;
pub mod event;
pub mod label;
pub mod locale;
pub mod protocol;
pub mod source;
pub mod store;
pub mod timefmt;
pub mod title;

pub use agenda::{Agenda, SourceProfile};
pub use builder::build_event_list;
pub use config::{AgendaConfig, TimeFormat, TitleReplacement};
pub use error::{AgendaError, AgendaResult};
pub use event::{AgendaEvent, BroadcastEvent, CalendarEvent, Visibility};
pub use label::time_label;
pub use locale::{ClockFormat, Locale, Translations};
pub use protocol::{FetcherCommand, FetcherNotification, RegisterSource};
pub use source::{Auth, SourceConfig};
pub use store::EventStore;
pub use title::TitleTransformer;
