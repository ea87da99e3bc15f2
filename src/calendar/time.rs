use super::models::{CalendarEvent, EventTime};
use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Resolve an event-side time to a local instant: the precise timestamp
/// when given, else the calendar date at local midnight.
pub fn effective_instant(time: &EventTime) -> Option<DateTime<Local>> {
    if let Some(date_time) = &time.date_time {
        DateTime::parse_from_rfc3339(date_time)
            .ok()
            .map(|dt| dt.with_timezone(&Local))
    } else if let Some(date) = &time.date {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        Local
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .earliest()
    } else {
        None
    }
}

/// The event's start time used for all comparisons and sorting
pub fn effective_start(event: &CalendarEvent) -> Option<DateTime<Local>> {
    effective_instant(&event.start)
}

/// Whether the event is specified by calendar date only, no time-of-day
pub fn is_all_day(event: &CalendarEvent) -> bool {
    event.start.date_time.is_none()
}

/// Table-cell date: birthdays get day + abbreviated month with no year,
/// everything else day/month/year
pub fn format_list_date(start: DateTime<Local>, is_birthday: bool) -> String {
    if is_birthday {
        start.format("%d %b").to_string()
    } else {
        start.format("%d/%m/%Y").to_string()
    }
}

/// Detail-panel date: long form, year omitted for birthdays
pub fn format_full_date(start: DateTime<Local>, is_birthday: bool) -> String {
    if is_birthday {
        start.format("%A, %d %B").to_string()
    } else {
        start.format("%A, %d %B %Y").to_string()
    }
}

/// Table-cell time: the local start time, or "All day" for date-only events
pub fn format_time_cell(event: &CalendarEvent) -> String {
    if is_all_day(event) {
        return String::from("All day");
    }
    match effective_start(event) {
        Some(start) => start.format("%H:%M").to_string(),
        None => String::from("All day"),
    }
}

/// Detail-panel time range for timed events. A missing or date-only end is
/// tolerated: the range degrades to the bare start time.
pub fn format_time_range(event: &CalendarEvent) -> Option<String> {
    if is_all_day(event) {
        return None;
    }
    let start = effective_start(event)?;
    let end = event
        .end
        .date_time
        .as_deref()
        .and_then(|dt| DateTime::parse_from_rfc3339(dt).ok())
        .map(|dt| dt.with_timezone(&Local));

    Some(match end {
        Some(end) => format!("{} - {}", start.format("%H:%M"), end.format("%H:%M")),
        None => start.format("%H:%M").to_string(),
    })
}
