use std::fmt;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::Date;
use time::OffsetDateTime;

/// Simple "YYYY-MM-DD" calendar-day key with total ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay {
    pub year: u16,
    pub month: u8, // 1..=12
    pub day: u8,   // 1..=31
}

impl CalendarDay {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        assert!((1..=12).contains(&month), "Month must be 1..=12");
        assert!((1..=31).contains(&day), "Day must be 1..=31");
        Self { year, month, day }
    }

    fn from_date(date: Date) -> Self {
        let year = date.year().clamp(0, u16::MAX as i32) as u16;
        Self { year, month: date.month() as u8, day: date.day() }
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDay {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = Date::parse(s, format_description!("[year]-[month]-[day]"))
            .map_err(|_| "expected YYYY-MM-DD".to_string())?;
        Ok(Self::from_date(date))
    }
}

/// Truncate an ISO-8601 timestamp string to its calendar day.
///
/// Two grammars are accepted, tried in order:
///   1. strict RFC 3339 with offset, e.g. `2024-01-01T12:00:00+00:00` or
///      `2024-01-01T12:00:00Z`;
///   2. a calendar-prefix parse of the leading ten characters, provided the
///      string is exactly a date or the eleventh character is `T`, e.g.
///      `2024-01-01` or `2024-01-01Tnot-a-time`.
///
/// The prefix grammar accepts timestamps whose time-of-day portion is
/// malformed as long as the date part is a real calendar day; the strict
/// grammar rejects those. Neither grammar accepts `2024-13-01T...` or
/// `2024-01-01x`.
pub fn day_from_timestamp(raw: &str) -> Option<CalendarDay> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(CalendarDay::from_date(dt.date()));
    }
    if raw.len() != 10 && (raw.len() < 11 || raw.as_bytes()[10] != b'T') {
        return None;
    }
    Date::parse(&raw[..10], format_description!("[year]-[month]-[day]"))
        .ok()
        .map(CalendarDay::from_date)
}
