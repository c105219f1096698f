//! Explicit locale values for time labelling.
//!
//! The label code takes a `Locale` as a plain input instead of mutating a
//! process-wide locale, so two instances can label with different clocks.

/// Clock style used to expand the `LT` format token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockFormat {
    /// 12-hour clock, `h:mm A`.
    #[default]
    TwelveHour,
    /// 24-hour clock, `HH:mm`.
    TwentyFourHour,
}

impl ClockFormat {
    /// Maps the configured hour style (12 or 24) to a clock format.
    /// Any other value keeps the default.
    pub fn from_hour_style(style: Option<u8>) -> Self {
        match style {
            Some(12) => ClockFormat::TwelveHour,
            Some(24) => ClockFormat::TwentyFourHour,
            _ => ClockFormat::default(),
        }
    }

    /// The pattern `LT` expands to.
    pub fn time_pattern(&self) -> &'static str {
        match self {
            ClockFormat::TwelveHour => "h:mm A",
            ClockFormat::TwentyFourHour => "HH:mm",
        }
    }
}

/// Fixed display phrases used by the time labeller.
#[derive(Debug, Clone, PartialEq)]
pub struct Translations {
    pub today: String,
    pub tomorrow: String,
    /// Not every language has a word for this; `None` falls back to
    /// relative phrasing.
    pub day_after_tomorrow: Option<String>,
    /// Prefix for events already underway.
    pub running: String,
}

impl Default for Translations {
    fn default() -> Self {
        Translations {
            today: "today".into(),
            tomorrow: "tomorrow".into(),
            day_after_tomorrow: None,
            running: "ends in".into(),
        }
    }
}

/// Clock format plus fixed phrases, passed explicitly into the labeller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Locale {
    pub clock: ClockFormat,
    pub phrases: Translations,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_style_maps_to_clock() {
        assert_eq!(
            ClockFormat::from_hour_style(Some(24)),
            ClockFormat::TwentyFourHour
        );
        assert_eq!(
            ClockFormat::from_hour_style(Some(12)),
            ClockFormat::TwelveHour
        );
        assert_eq!(ClockFormat::from_hour_style(None), ClockFormat::default());
        assert_eq!(
            ClockFormat::from_hour_style(Some(7)),
            ClockFormat::default()
        );
    }

    #[test]
    fn time_patterns() {
        assert_eq!(ClockFormat::TwelveHour.time_pattern(), "h:mm A");
        assert_eq!(ClockFormat::TwentyFourHour.time_pattern(), "HH:mm");
    }
}
