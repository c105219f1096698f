//! Terminal rendering for the agenda list using owo_colors.

use chrono::{DateTime, TimeZone};
use owo_colors::OwoColorize;
use upnext_core::Agenda;
use upnext_core::config::TimeFormat;
use upnext_core::event::AgendaEvent;
use upnext_core::timefmt::{datetime_from_ms, format_pattern};

/// Renders the whole agenda as of `now`.
///
/// Shows a loading placeholder before the first notification arrives and
/// an empty-state line when nothing is upcoming. Rows past the fade point
/// are dimmed.
pub fn render_agenda<Tz: TimeZone>(agenda: &Agenda, now: &DateTime<Tz>) -> String {
    if !agenda.loaded() {
        return "Loading…".dimmed().to_string();
    }

    let events = agenda.event_list(now);
    if events.is_empty() {
        return "No upcoming events.".dimmed().to_string();
    }

    let config = agenda.config();
    let fade_from = fade_start(events.len(), config.fade, config.fade_point);
    let tz = now.timezone();

    let mut lines = Vec::new();
    let mut last_header: Option<String> = None;
    for (index, event) in events.iter().enumerate() {
        if config.time_format == TimeFormat::Dateheaders {
            let header = format_pattern(
                &datetime_from_ms(&tz, event.event.start_date),
                &config.date_format,
                agenda.locale(),
            );
            if last_header.as_deref() != Some(header.as_str()) {
                lines.push(header.bold().to_string());
                last_header = Some(header);
            }
        }

        let line = event_line(agenda, event, now);
        if index >= fade_from {
            lines.push(format!("  {}", line.dimmed()));
        } else {
            lines.push(format!("  {line}"));
        }
    }
    lines.join("\n")
}

/// Index of the first dimmed row. A negative fade point counts as zero,
/// fading the whole list.
fn fade_start(count: usize, fade: bool, fade_point: f64) -> usize {
    if !fade {
        return count;
    }
    (count as f64 * fade_point.max(0.0)).floor() as usize
}

fn event_line<Tz: TimeZone>(agenda: &Agenda, event: &AgendaEvent, now: &DateTime<Tz>) -> String {
    let tz = now.timezone();
    let mut title = agenda.display_title(event);
    if let Some(suffix) = agenda.repeating_count_title(event, &tz) {
        title.push_str(&suffix);
    }

    let time = if agenda.config().time_format == TimeFormat::Dateheaders {
        dateheader_time(agenda, event, &tz)
    } else {
        agenda.display_time(event, now)
    };

    let mut line = match time.is_empty() {
        true => title,
        false => format!("{title}  {}", time.dimmed()),
    };
    if let Some(location) = &event.event.location {
        line.push_str(&format!("  {}", format!("@ {location}").dimmed()));
    }
    line
}

/// Under date headers the day is already printed, so events carry only
/// their clock time; full-day events carry none.
fn dateheader_time<Tz: TimeZone>(agenda: &Agenda, event: &AgendaEvent, tz: &Tz) -> String {
    if event.event.full_day_event {
        return String::new();
    }
    let locale = agenda.locale();
    let mut time = format_pattern(&datetime_from_ms(tz, event.event.start_date), "LT", locale);
    if agenda.config().show_end {
        time.push('-');
        time.push_str(&format_pattern(
            &datetime_from_ms(tz, event.event.end_date),
            "LT",
            locale,
        ));
    }
    time
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use upnext_core::config::AgendaConfig;
    use upnext_core::protocol::FetcherNotification;
    use upnext_core::source::SourceConfig;
    use upnext_core::CalendarEvent;

    use super::*;

    fn agenda() -> Agenda {
        let config = AgendaConfig {
            sources: vec![SourceConfig {
                url: "a".into(),
                ..SourceConfig::default()
            }],
            ..AgendaConfig::default()
        };
        Agenda::new(config).unwrap()
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn shows_loading_until_first_notification() {
        let rendered = render_agenda(&agenda(), &noon());
        assert!(rendered.contains("Loading"));
    }

    #[test]
    fn shows_empty_state_after_an_empty_delivery() {
        let mut agenda = agenda();
        agenda.apply(FetcherNotification::EventsDelivered {
            id: "a".into(),
            events: vec![],
        });
        let rendered = render_agenda(&agenda, &noon());
        assert!(rendered.contains("No upcoming events."));
    }

    #[test]
    fn renders_title_and_time() {
        let mut agenda = agenda();
        let start = noon().timestamp_millis() + 3 * 60 * 60 * 1000;
        agenda.apply(FetcherNotification::EventsDelivered {
            id: "a".into(),
            events: vec![CalendarEvent {
                title: "Dentist".into(),
                start_date: start,
                end_date: start + 1,
                full_day_event: false,
                location: None,
                visibility: None,
                first_year: None,
            }],
        });
        let rendered = render_agenda(&agenda, &noon());
        assert!(rendered.contains("Dentist"));
        assert!(rendered.contains("In 3 hours"));
    }

    #[test]
    fn fade_start_boundaries() {
        assert_eq!(fade_start(4, true, 0.25), 1);
        assert_eq!(fade_start(4, true, -1.0), 0);
        assert_eq!(fade_start(4, false, 0.25), 4);
        assert_eq!(fade_start(4, true, 1.0), 4);
    }
}
