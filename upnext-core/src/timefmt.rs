//! Time helpers: day boundaries, moment-style pattern formatting, and
//! relative/calendar phrasing.
//!
//! The configuration surface uses moment.js-style display patterns
//! (`"MMM Do"`, `"LT"`), so the formatter speaks that token language.
//! Everything is generic over `chrono::TimeZone`; "local midnight" is
//! always derived from the caller's `now`, never from process state.

use chrono::{
    DateTime, Datelike, Duration, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
    offset::LocalResult,
};

use crate::locale::Locale;

pub const ONE_SECOND_MS: i64 = 1000;
pub const ONE_MINUTE_MS: i64 = 60 * ONE_SECOND_MS;
pub const ONE_HOUR_MS: i64 = 60 * ONE_MINUTE_MS;
pub const ONE_DAY_MS: i64 = 24 * ONE_HOUR_MS;

/// The start of the day (00:00:00) for the given `DateTime` in the same
/// timezone.
pub fn start_of_day<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    let naive = dt.date_naive().and_time(NaiveTime::MIN);
    from_local_datetime(&dt.timezone(), naive)
}

/// Converts a `NaiveDateTime` into the given timezone, handling local
/// time ambiguities:
/// - `Single` returns directly;
/// - `Ambiguous` takes the earlier side;
/// - `None` (the local time does not exist, e.g. a DST gap) falls back to
///   the UTC interpretation converted into the timezone.
pub fn from_local_datetime<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(x) => x,
        LocalResult::Ambiguous(a, b) => {
            if a <= b { a } else { b }
        }
        LocalResult::None => Utc.from_utc_datetime(&naive).with_timezone(tz),
    }
}

/// The instant for an epoch-millisecond timestamp in the given timezone.
pub fn datetime_from_ms<Tz: TimeZone>(tz: &Tz, ms: i64) -> DateTime<Tz> {
    DateTime::from_timestamp_millis(ms)
        .unwrap_or_default()
        .with_timezone(tz)
}

/// Epoch ms of the first local midnight after the day containing `ms`.
pub fn next_midnight_ms<Tz: TimeZone>(tz: &Tz, ms: i64) -> i64 {
    let dt = datetime_from_ms(tz, ms);
    (start_of_day(&dt) + Duration::days(1)).timestamp_millis()
}

/// Epoch ms of the last millisecond (23:59:59.999) of the local day
/// containing `ms`.
pub fn end_of_day_ms<Tz: TimeZone>(tz: &Tz, ms: i64) -> i64 {
    next_midnight_ms(tz, ms) - 1
}

/// Capitalizes the first letter of a phrase.
pub fn cap_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ============================================================================
// Relative phrasing
// ============================================================================

/// Human phrasing for a signed millisecond offset, with moment.js default
/// thresholds: "a few seconds", "a minute", "5 minutes", ..., "2 years".
///
/// With `with_affix`, the phrase is wrapped as "in N" (future) or "N ago"
/// (past); a zero offset counts as future.
pub fn relative_phrase(delta_ms: i64, with_affix: bool) -> String {
    let future = delta_ms >= 0;
    let seconds = (delta_ms.abs() as f64 / 1000.0).round() as i64;
    let minutes = (seconds as f64 / 60.0).round() as i64;
    let hours = (minutes as f64 / 60.0).round() as i64;
    let days = (hours as f64 / 24.0).round() as i64;
    // 146097 days per 400 Gregorian years.
    let months = (days as f64 * 4800.0 / 146_097.0).round() as i64;
    let years = (months as f64 / 12.0).round() as i64;

    let phrase = if seconds <= 44 {
        "a few seconds".to_string()
    } else if seconds <= 89 {
        "a minute".to_string()
    } else if minutes <= 44 {
        format!("{minutes} minutes")
    } else if minutes <= 89 {
        "an hour".to_string()
    } else if hours <= 21 {
        format!("{hours} hours")
    } else if hours <= 35 {
        "a day".to_string()
    } else if days <= 25 {
        format!("{days} days")
    } else if days <= 45 {
        "a month".to_string()
    } else if days <= 319 {
        format!("{months} months")
    } else if days <= 547 {
        "a year".to_string()
    } else {
        format!("{years} years")
    };

    if !with_affix {
        phrase
    } else if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

/// Calendar-relative phrasing ("Today at 2:30 PM", "Tomorrow at 9:00 AM",
/// "Sunday at 1:00 PM"), falling back to the `L` date format outside the
/// surrounding week.
pub fn calendar_phrase<Tz: TimeZone>(dt: &DateTime<Tz>, now: &DateTime<Tz>, locale: &Locale) -> String {
    let day_diff = dt
        .date_naive()
        .signed_duration_since(now.date_naive())
        .num_days();
    let lt = format_pattern(dt, "LT", locale);
    match day_diff {
        0 => format!("Today at {lt}"),
        1 => format!("Tomorrow at {lt}"),
        -1 => format!("Yesterday at {lt}"),
        2..=6 => format!("{} at {lt}", dt.naive_local().format("%A")),
        -6..=-2 => format!("Last {} at {lt}", dt.naive_local().format("%A")),
        _ => format_pattern(dt, "L", locale),
    }
}

// ============================================================================
// Pattern formatting
// ============================================================================

/// Formats a datetime with a moment.js-style pattern.
///
/// Supported tokens: `YYYY YY MMMM MMM MM M DD D Do dddd ddd HH H hh h
/// mm m ss s A a LT L`. Text inside `[...]` passes through literally.
pub fn format_pattern<Tz: TimeZone>(dt: &DateTime<Tz>, pattern: &str, locale: &Locale) -> String {
    let local = dt.naive_local();
    let mut out = String::new();
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '[' {
            i += 1;
            while i < chars.len() && chars[i] != ']' {
                out.push(chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }
        let rest: String = chars[i..].iter().collect();
        match expand_token(&local, &rest, locale) {
            Some((consumed, text)) => {
                out.push_str(&text);
                i += consumed;
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }
    out
}

/// Tries to expand the longest matching token at the start of `rest`.
fn expand_token(local: &NaiveDateTime, rest: &str, locale: &Locale) -> Option<(usize, String)> {
    let (hour12_pm, hour12) = local.hour12();
    let token = |text: String, len: usize| Some((len, text));

    if rest.starts_with("YYYY") {
        return token(format!("{:04}", local.year()), 4);
    }
    if rest.starts_with("YY") {
        return token(format!("{:02}", local.year() % 100), 2);
    }
    if rest.starts_with("MMMM") {
        return token(local.format("%B").to_string(), 4);
    }
    if rest.starts_with("MMM") {
        return token(local.format("%b").to_string(), 3);
    }
    if rest.starts_with("MM") {
        return token(format!("{:02}", local.month()), 2);
    }
    if rest.starts_with('M') {
        return token(local.month().to_string(), 1);
    }
    if rest.starts_with("Do") {
        return token(ordinal(local.day()), 2);
    }
    if rest.starts_with("DD") {
        return token(format!("{:02}", local.day()), 2);
    }
    if rest.starts_with('D') {
        return token(local.day().to_string(), 1);
    }
    if rest.starts_with("dddd") {
        return token(local.format("%A").to_string(), 4);
    }
    if rest.starts_with("ddd") {
        return token(local.format("%a").to_string(), 3);
    }
    if rest.starts_with("HH") {
        return token(format!("{:02}", local.hour()), 2);
    }
    if rest.starts_with('H') {
        return token(local.hour().to_string(), 1);
    }
    if rest.starts_with("hh") {
        return token(format!("{hour12:02}"), 2);
    }
    if rest.starts_with('h') {
        return token(hour12.to_string(), 1);
    }
    if rest.starts_with("mm") {
        return token(format!("{:02}", local.minute()), 2);
    }
    if rest.starts_with('m') {
        return token(local.minute().to_string(), 1);
    }
    if rest.starts_with("ss") {
        return token(format!("{:02}", local.second()), 2);
    }
    if rest.starts_with('s') {
        return token(local.second().to_string(), 1);
    }
    if rest.starts_with('A') {
        return token(if hour12_pm { "PM" } else { "AM" }.to_string(), 1);
    }
    if rest.starts_with('a') {
        return token(if hour12_pm { "pm" } else { "am" }.to_string(), 1);
    }
    // LT before L: the longer token wins.
    if rest.starts_with("LT") {
        return token(expand_pattern_naive(local, locale.clock.time_pattern(), locale), 2);
    }
    if rest.starts_with('L') {
        return token(expand_pattern_naive(local, "MM/DD/YYYY", locale), 1);
    }
    None
}

/// Expands a nested pattern (used by the `LT` and `L` shorthands).
fn expand_pattern_naive(local: &NaiveDateTime, pattern: &str, locale: &Locale) -> String {
    let mut out = String::new();
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let rest: String = chars[i..].iter().collect();
        match expand_token(local, &rest, locale) {
            Some((consumed, text)) => {
                out.push_str(&text);
                i += consumed;
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }
    out
}

fn ordinal(day: u32) -> String {
    let suffix = match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{day}{suffix}")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn locale_24h() -> Locale {
        Locale {
            clock: crate::locale::ClockFormat::TwentyFourHour,
            ..Locale::default()
        }
    }

    #[test]
    fn start_of_day_is_local_midnight() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 15, 14, 30, 45).unwrap();
        let start = start_of_day(&dt);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn next_midnight_and_end_of_day() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 15, 14, 30, 45).unwrap();
        let ms = dt.timestamp_millis();
        let midnight = Utc.with_ymd_and_hms(2025, 3, 16, 0, 0, 0).unwrap();
        assert_eq!(next_midnight_ms(&Utc, ms), midnight.timestamp_millis());
        assert_eq!(end_of_day_ms(&Utc, ms), midnight.timestamp_millis() - 1);
    }

    #[test]
    fn caps_first_letter_only() {
        assert_eq!(cap_first("in 3 days"), "In 3 days");
        assert_eq!(cap_first("today"), "Today");
        assert_eq!(cap_first(""), "");
    }

    #[test]
    fn relative_phrase_thresholds() {
        assert_eq!(relative_phrase(30 * ONE_SECOND_MS, true), "in a few seconds");
        assert_eq!(relative_phrase(60 * ONE_SECOND_MS, true), "in a minute");
        assert_eq!(relative_phrase(10 * ONE_MINUTE_MS, true), "in 10 minutes");
        assert_eq!(relative_phrase(ONE_HOUR_MS, true), "in an hour");
        assert_eq!(relative_phrase(3 * ONE_HOUR_MS, true), "in 3 hours");
        assert_eq!(relative_phrase(ONE_DAY_MS, true), "in a day");
        assert_eq!(relative_phrase(5 * ONE_DAY_MS, true), "in 5 days");
        assert_eq!(relative_phrase(40 * ONE_DAY_MS, true), "in a month");
        assert_eq!(relative_phrase(90 * ONE_DAY_MS, true), "in 3 months");
        assert_eq!(relative_phrase(400 * ONE_DAY_MS, true), "in a year");
        assert_eq!(relative_phrase(800 * ONE_DAY_MS, true), "in 2 years");
    }

    #[test]
    fn relative_phrase_past_and_bare() {
        assert_eq!(relative_phrase(-3 * ONE_HOUR_MS, true), "3 hours ago");
        assert_eq!(relative_phrase(3 * ONE_HOUR_MS, false), "3 hours");
    }

    #[test]
    fn formats_default_date_pattern() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 1, 9, 5, 0).unwrap();
        assert_eq!(format_pattern(&dt, "MMM Do", &Locale::default()), "Mar 1st");
        let dt = Utc.with_ymd_and_hms(2025, 3, 22, 9, 5, 0).unwrap();
        assert_eq!(format_pattern(&dt, "MMM Do", &Locale::default()), "Mar 22nd");
        let dt = Utc.with_ymd_and_hms(2025, 3, 13, 9, 5, 0).unwrap();
        assert_eq!(format_pattern(&dt, "MMM Do", &Locale::default()), "Mar 13th");
    }

    #[test]
    fn lt_follows_the_clock() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 15, 14, 5, 0).unwrap();
        assert_eq!(format_pattern(&dt, "LT", &Locale::default()), "2:05 PM");
        assert_eq!(format_pattern(&dt, "LT", &locale_24h()), "14:05");
    }

    #[test]
    fn l_expands_to_slash_date() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(format_pattern(&dt, "L", &Locale::default()), "03/05/2025");
    }

    #[test]
    fn bracketed_text_is_literal() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(
            format_pattern(&dt, "[Day] D [at] LT", &locale_24h()),
            "Day 5 at 10:00"
        );
    }

    #[test]
    fn calendar_phrase_near_days() {
        let locale = locale_24h();
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2025, 3, 15, 18, 30, 0).unwrap();
        let tomorrow = Utc.with_ymd_and_hms(2025, 3, 16, 9, 0, 0).unwrap();
        // 2025-03-18 is a Tuesday.
        let weekday = Utc.with_ymd_and_hms(2025, 3, 18, 9, 0, 0).unwrap();
        let far = Utc.with_ymd_and_hms(2025, 4, 20, 9, 0, 0).unwrap();

        assert_eq!(calendar_phrase(&today, &now, &locale), "Today at 18:30");
        // HH zero-pads single-digit hours on the 24-hour clock.
        assert_eq!(calendar_phrase(&tomorrow, &now, &locale), "Tomorrow at 09:00");
        assert_eq!(calendar_phrase(&weekday, &now, &locale), "Tuesday at 09:00");
        assert_eq!(calendar_phrase(&far, &now, &locale), "04/20/2025");
    }
}
