//! Relative time labels for upcoming events.
//!
//! The decision tree distinguishes full-day from timed events, near from
//! far starts, and already-running events, honoring the configured time
//! format and urgency thresholds.

use chrono::{DateTime, TimeZone};

use crate::config::{AgendaConfig, TimeFormat};
use crate::event::AgendaEvent;
use crate::locale::Locale;
use crate::timefmt::{
    ONE_DAY_MS, ONE_HOUR_MS, ONE_SECOND_MS, calendar_phrase, cap_first, datetime_from_ms,
    format_pattern, relative_phrase, start_of_day,
};

/// Renders the time column for one display event as of `now`.
///
/// Full-day events label by day ("Today", "Tomorrow", "In 3 days"); timed
/// events switch between relative phrases, calendar phrases and absolute
/// dates depending on distance, and running events show time left to the
/// end. With `show_end` the formatted end is appended after a dash.
pub fn time_label<Tz: TimeZone>(
    event: &AgendaEvent,
    config: &AgendaConfig,
    locale: &Locale,
    now: &DateTime<Tz>,
) -> String {
    let tz = now.timezone();
    let now_ms = now.timestamp_millis();
    let start_ms = event.event.start_date;
    let delta = start_ms - now_ms;

    let mut label = if event.event.full_day_event {
        if event.today {
            cap_first(&locale.phrases.today)
        } else if delta > 0 && delta < ONE_DAY_MS {
            cap_first(&locale.phrases.tomorrow)
        } else if delta > 0 && delta < 2 * ONE_DAY_MS {
            match &locale.phrases.day_after_tomorrow {
                Some(phrase) => cap_first(phrase),
                None => cap_first(&relative_phrase(delta, true)),
            }
        } else {
            // Whole-day offsets count from local midnight, so a day-spanning
            // distance never rounds down to the shorter phrase.
            let today_ms = start_of_day(now).timestamp_millis();
            urgency_aware(
                &tz,
                start_ms,
                now_ms,
                config,
                &relative_phrase(start_ms - today_ms, true),
                &config.full_day_event_date_format,
                locale,
            )
        }
    } else if start_ms >= now_ms {
        if delta < 2 * ONE_DAY_MS {
            if delta < config.get_relative * ONE_HOUR_MS {
                cap_first(&relative_phrase(delta, true))
            } else if config.time_format == TimeFormat::Absolute && !config.next_days_relative {
                cap_first(&format_pattern(
                    &datetime_from_ms(&tz, start_ms),
                    &config.date_format,
                    locale,
                ))
            } else {
                cap_first(&calendar_phrase(&datetime_from_ms(&tz, start_ms), now, locale))
            }
        } else {
            urgency_aware(
                &tz,
                start_ms,
                now_ms,
                config,
                &relative_phrase(delta, true),
                &config.date_format,
                locale,
            )
        }
    } else {
        cap_first(&format!(
            "{} {}",
            locale.phrases.running,
            relative_phrase(event.event.end_date - now_ms, false)
        ))
    };

    if config.show_end {
        // Full-day ends sit on the next midnight; pull them back a second
        // so the label reads as the event's last day.
        let (end_ms, pattern) = if event.event.full_day_event {
            (
                event.event.end_date - ONE_SECOND_MS,
                config.full_day_event_date_format.as_str(),
            )
        } else {
            (event.event.end_date, config.date_end_format.as_str())
        };
        label.push('-');
        label.push_str(&cap_first(&format_pattern(
            &datetime_from_ms(&tz, end_ms),
            pattern,
            locale,
        )));
    }

    label
}

/// Far-future label: absolute mode shows the formatted date unless the
/// start falls inside the urgency window, relative mode always phrases.
fn urgency_aware<Tz: TimeZone>(
    tz: &Tz,
    start_ms: i64,
    now_ms: i64,
    config: &AgendaConfig,
    relative: &str,
    pattern: &str,
    locale: &Locale,
) -> String {
    if config.time_format == TimeFormat::Absolute {
        if config.urgency > 1 && start_ms - now_ms < config.urgency * ONE_DAY_MS {
            cap_first(relative)
        } else {
            cap_first(&format_pattern(&datetime_from_ms(tz, start_ms), pattern, locale))
        }
    } else {
        cap_first(relative)
    }
}
