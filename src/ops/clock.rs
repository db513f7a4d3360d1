use chrono::NaiveDateTime;

/// Long-form date, e.g. `Sunday, October 18, 2026`
pub fn format_date(now: &NaiveDateTime) -> String {
    now.format("%A, %B %-d, %Y").to_string()
}

/// Clock time: `02:05 PM`, or `14:05` in 24-hour mode
pub fn format_time(now: &NaiveDateTime, clock_24h: bool) -> String {
    if clock_24h {
        now.format("%H:%M").to_string()
    } else {
        now.format("%I:%M %p").to_string()
    }
}
