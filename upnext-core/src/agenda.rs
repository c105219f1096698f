//! The agenda instance: configured sources, stored batches and the
//! display accessors built on top of them.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, TimeZone};
use tracing::{debug, error, warn};

use crate::builder::build_event_list;
use crate::config::AgendaConfig;
use crate::error::AgendaResult;
use crate::event::{AgendaEvent, BroadcastEvent};
use crate::label::time_label;
use crate::locale::{ClockFormat, Locale};
use crate::protocol::{FetcherCommand, FetcherNotification, RegisterSource};
use crate::source::Auth;
use crate::store::EventStore;
use crate::timefmt::datetime_from_ms;
use crate::title::TitleTransformer;

/// Per-source values with the instance-wide defaults already applied,
/// resolved once at construction.
#[derive(Debug, Clone)]
pub struct SourceProfile {
    /// The normalized source URL, doubling as the source id.
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub color: String,
    pub symbol_class: String,
    pub title_class: String,
    pub time_class: String,
    pub repeating_count_title: String,
    pub maximum_entries: usize,
    pub maximum_number_of_days: i64,
    pub fetch_interval_ms: u64,
    pub excluded_events: Vec<String>,
    pub broadcast_past_events: bool,
    pub auth: Option<Auth>,
}

/// One configured agenda: holds the event store, the compiled title
/// rules and the resolved source profiles, and answers display queries.
///
/// `loaded` flips once the first notification lands, so consumers can
/// distinguish "nothing fetched yet" from "no upcoming events".
#[derive(Debug)]
pub struct Agenda {
    config: AgendaConfig,
    profiles: HashMap<String, SourceProfile>,
    store: EventStore,
    titles: TitleTransformer,
    locale: Locale,
    loaded: bool,
}

impl Agenda {
    /// Builds an instance from its configuration: normalizes source URLs,
    /// compiles the title rules and resolves the per-source profiles.
    pub fn new(mut config: AgendaConfig) -> AgendaResult<Self> {
        for source in &mut config.sources {
            source.normalize();
        }

        let titles = TitleTransformer::new(
            &config.title_replace,
            config.max_title_length,
            config.wrap_events,
            config.max_title_lines,
        )?;

        let locale = Locale {
            clock: ClockFormat::from_hour_style(config.hour_format),
            ..Locale::default()
        };

        let mut profiles = HashMap::new();
        for source in &config.sources {
            let profile = SourceProfile {
                id: source.url.clone(),
                name: source.name.clone().unwrap_or_else(|| source.url.clone()),
                symbol: source
                    .symbol
                    .clone()
                    .unwrap_or_else(|| config.default_symbol.clone()),
                color: source.color.clone().unwrap_or_else(|| "#fff".into()),
                symbol_class: source.symbol_class.clone().unwrap_or_default(),
                title_class: source.title_class.clone().unwrap_or_default(),
                time_class: source.time_class.clone().unwrap_or_default(),
                repeating_count_title: source
                    .repeating_count_title
                    .clone()
                    .unwrap_or_else(|| config.default_repeating_count_title.clone()),
                maximum_entries: source.maximum_entries.unwrap_or(config.maximum_entries),
                maximum_number_of_days: source
                    .maximum_number_of_days
                    .unwrap_or(config.maximum_number_of_days),
                fetch_interval_ms: config.fetch_interval_ms,
                excluded_events: source
                    .excluded_events
                    .clone()
                    .unwrap_or_else(|| config.excluded_events.clone()),
                broadcast_past_events: source
                    .broadcast_past_events
                    .unwrap_or(config.broadcast_past_events),
                auth: source.auth.clone(),
            };
            profiles.insert(profile.id.clone(), profile);
        }

        Ok(Agenda {
            config,
            profiles,
            store: EventStore::new(),
            titles,
            locale,
            loaded: false,
        })
    }

    /// The registration commands for every configured source, in
    /// configuration order. Sent once at startup and again on every poll
    /// tick, as registration is idempotent on the fetcher side.
    pub fn register_messages(&self) -> Vec<FetcherCommand> {
        self.config
            .sources
            .iter()
            .filter_map(|source| self.profiles.get(&source.url))
            .map(|profile| {
                FetcherCommand::RegisterSource(RegisterSource {
                    id: profile.id.clone(),
                    excluded_events: profile.excluded_events.clone(),
                    maximum_entries: profile.maximum_entries,
                    maximum_number_of_days: profile.maximum_number_of_days,
                    fetch_interval: profile.fetch_interval_ms,
                    symbol_class: profile.symbol_class.clone(),
                    title_class: profile.title_class.clone(),
                    time_class: profile.time_class.clone(),
                    broadcast_past_events: profile.broadcast_past_events,
                    auth: profile.auth.clone(),
                })
            })
            .collect()
    }

    /// Applies one fetcher notification. Returns whether the display
    /// (and the broadcast list) should be refreshed.
    pub fn apply(&mut self, notification: FetcherNotification) -> bool {
        if !self.profiles.contains_key(notification.source_id()) {
            debug!(
                source = notification.source_id(),
                "notification for an unconfigured source, ignoring"
            );
            return false;
        }

        match notification {
            FetcherNotification::EventsDelivered { id, events } => {
                debug!(source = %id, count = events.len(), "event batch delivered");
                self.store.put(&id, events);
                self.loaded = true;
                true
            }
            FetcherNotification::FetchError { id } => {
                // Keep whatever the source last delivered on display.
                error!(source = %id, "source fetch failed");
                self.loaded = true;
                true
            }
            FetcherNotification::IncorrectUrl { id } => {
                error!(source = %id, "source url cannot be fetched");
                false
            }
        }
    }

    /// Parses and applies a raw JSON notification, logging and dropping
    /// anything that does not match the protocol.
    pub fn apply_json(&mut self, value: &serde_json::Value) -> bool {
        match FetcherNotification::from_value(value) {
            Ok(notification) => self.apply(notification),
            Err(e) => {
                warn!(error = %e, "unrecognized fetcher message");
                false
            }
        }
    }

    // ========================================================================
    // Display accessors
    // ========================================================================

    /// The bounded, ordered display list as of `now`.
    pub fn event_list<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<AgendaEvent> {
        build_event_list(&self.store, &self.config, now)
    }

    /// The event title after replacement rules and shortening.
    pub fn display_title(&self, event: &AgendaEvent) -> String {
        self.titles.transform(&event.event.title)
    }

    /// The time column for one display event.
    pub fn display_time<Tz: TimeZone>(&self, event: &AgendaEvent, now: &DateTime<Tz>) -> String {
        time_label(event, &self.config, &self.locale, now)
    }

    /// The `", N. anniversary"` style suffix for recurring events that
    /// carry a first year, when the source names a count title.
    pub fn repeating_count_title<Tz: TimeZone>(
        &self,
        event: &AgendaEvent,
        tz: &Tz,
    ) -> Option<String> {
        if !self.config.display_repeating_count_title {
            return None;
        }
        let first_year = event.event.first_year?;
        let count_title = self
            .profiles
            .get(&event.source_id)
            .map(|p| p.repeating_count_title.as_str())
            .unwrap_or_default();
        if count_title.is_empty() {
            return None;
        }
        let year = datetime_from_ms(tz, event.event.start_date).year();
        Some(format!(", {}. {count_title}", year - first_year))
    }

    /// Every stored event decorated for other display consumers, sorted
    /// by start date. Unfiltered: past and beyond-window events included.
    pub fn broadcast_list(&self) -> Vec<BroadcastEvent> {
        let mut list = Vec::new();
        for source in &self.config.sources {
            let Some(batch) = self.store.get(&source.url) else {
                continue;
            };
            let Some(profile) = self.profiles.get(&source.url) else {
                continue;
            };
            for event in batch {
                list.push(BroadcastEvent {
                    event: event.clone(),
                    symbol: profile.symbol.clone(),
                    calendar_name: profile.name.clone(),
                    color: profile.color.clone(),
                });
            }
        }
        list.sort_by_key(|e| e.event.start_date);
        list
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn config(&self) -> &AgendaConfig {
        &self.config
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn profile(&self, source_id: &str) -> Option<&SourceProfile> {
        self.profiles.get(source_id)
    }
}
