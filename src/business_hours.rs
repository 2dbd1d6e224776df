use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Timelike, Utc, Weekday};

/// The studio runs on America/El_Salvador time. The zone observes no DST,
/// so it reduces to a fixed UTC-6 offset.
const UTC_OFFSET_HOURS: i32 = -6;

// Opening windows in decimal hours, bounds inclusive on both ends.
const WEEKDAY_MORNING: (f64, f64) = (8.0, 12.5);
const WEEKDAY_AFTERNOON: (f64, f64) = (14.0, 18.0);
const SATURDAY_MORNING: (f64, f64) = (8.0, 12.5);

pub const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn business_offset() -> FixedOffset {
    FixedOffset::east_opt(UTC_OFFSET_HOURS * 3600).expect("valid UTC offset")
}

/// Current wall-clock time at the studio.
pub fn local_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&business_offset())
}

/// Whether the studio is open at the given local date and time.
pub fn is_open_at(at: NaiveDateTime) -> bool {
    let hour = at.hour() as f64 + at.minute() as f64 / 60.0;
    let in_window = |(from, to): (f64, f64)| hour >= from && hour <= to;

    match at.weekday() {
        Weekday::Sat => in_window(SATURDAY_MORNING),
        Weekday::Sun => false,
        _ => in_window(WEEKDAY_MORNING) || in_window(WEEKDAY_AFTERNOON),
    }
}

pub fn is_open_now() -> bool {
    is_open_at(local_now().naive_local())
}

pub fn is_sunday_now() -> bool {
    local_now().weekday() == Weekday::Sun
}

/// Parses a `YYYY-MM-DD HH:mm` string (the hour may be one or two digits).
/// Returns `None` on anything malformed; callers re-prompt with a format
/// hint instead of guessing.
pub fn parse_local_datetime(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), LOCAL_FORMAT).ok()
}

/// Canonical zero-padded rendering of a local date and time.
pub fn format_local_datetime(at: &NaiveDateTime) -> String {
    at.format(LOCAL_FORMAT).to_string()
}
