//! Builds the bounded, de-duplicated, chronologically ordered display list.

use chrono::{DateTime, Duration, TimeZone};

use crate::config::AgendaConfig;
use crate::event::{AgendaEvent, Visibility};
use crate::store::EventStore;
use crate::timefmt::{ONE_DAY_MS, end_of_day_ms, next_midnight_ms, start_of_day};

/// Produces the display list as of `now`.
///
/// Stored events are cloned before any decoration, so repeated builds and
/// broadcasts read the same untouched batches. Sources are visited in
/// configuration order; the sort is stable, so ties keep insertion order.
pub fn build_event_list<Tz: TimeZone>(
    store: &EventStore,
    config: &AgendaConfig,
    now: &DateTime<Tz>,
) -> Vec<AgendaEvent> {
    if config.maximum_number_of_days <= 0 {
        return Vec::new();
    }

    let tz = now.timezone();
    let now_ms = now.timestamp_millis();
    let today = start_of_day(now);
    let today_ms = today.timestamp_millis();
    let future_ms = (today + Duration::days(config.maximum_number_of_days)).timestamp_millis();

    let mut events: Vec<AgendaEvent> = Vec::new();
    for source in &config.sources {
        let Some(batch) = store.get(&source.url) else {
            continue;
        };
        for raw in batch {
            let mut event = AgendaEvent {
                event: raw.clone(),
                source_id: source.url.clone(),
                today: false,
            };

            // Already finished.
            if event.event.end_date <= now_ms {
                continue;
            }
            if config.hide_private && event.event.visibility == Some(Visibility::Private) {
                continue;
            }
            // Already started.
            if config.hide_ongoing && event.event.start_date < now_ms {
                continue;
            }
            // Same event delivered by an overlapping source.
            if contains_duplicate(&events, &event) {
                continue;
            }

            event.today = starts_today(event.event.start_date, today_ms);

            let total = day_span(&tz, event.event.start_date, event.event.end_date);
            if config.slice_multi_day_events && total > 1 {
                for fragment in slice_event(&tz, event, total, today_ms) {
                    if fragment.event.end_date > now_ms && fragment.event.end_date <= future_ms {
                        events.push(fragment);
                    }
                }
            } else if event.event.start_date < future_ms {
                events.push(event);
            }
        }
    }

    events.sort_by_key(|e| e.event.start_date);
    events.truncate(config.maximum_entries);
    events
}

fn starts_today(start_ms: i64, today_ms: i64) -> bool {
    start_ms >= today_ms && start_ms < today_ms + ONE_DAY_MS
}

fn contains_duplicate(events: &[AgendaEvent], candidate: &AgendaEvent) -> bool {
    events.iter().any(|e| {
        e.event.title == candidate.event.title && e.event.start_date == candidate.event.start_date
    })
}

/// Number of calendar days the event touches, counted past the end of its
/// first day (1 for events contained in a single day).
fn day_span<Tz: TimeZone>(tz: &Tz, start_ms: i64, end_ms: i64) -> i64 {
    let past_first_day = end_ms - 1 - end_of_day_ms(tz, start_ms);
    div_ceil(past_first_day, ONE_DAY_MS) + 1
}

fn div_ceil(a: i64, b: i64) -> i64 {
    (a + b - 1).div_euclid(b)
}

/// Splits a multi-day event into per-day fragments clipped at local
/// midnights, titled `" (k/n)"`. The final fragment keeps the true end
/// date and the `today` flag computed from the original start.
fn slice_event<Tz: TimeZone>(
    tz: &Tz,
    mut event: AgendaEvent,
    total: i64,
    today_ms: i64,
) -> Vec<AgendaEvent> {
    let mut fragments = Vec::new();
    let mut count = 1;
    let mut midnight = next_midnight_ms(tz, event.event.start_date);

    while event.event.end_date > midnight {
        let mut fragment = event.clone();
        fragment.today = starts_today(fragment.event.start_date, today_ms);
        fragment.event.end_date = midnight;
        fragment.event.title = format!("{} ({count}/{total})", fragment.event.title);
        fragments.push(fragment);

        event.event.start_date = midnight;
        count += 1;
        midnight = next_midnight_ms(tz, midnight);
    }

    event.event.title = format!("{} ({count}/{total})", event.event.title);
    fragments.push(event);
    fragments
}
