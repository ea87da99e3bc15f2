use super::models::CalendarEvent;
use super::time::effective_start;
use chrono::{DateTime, Local, NaiveDate};

/// Display filter modes, mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewFilter {
    #[default]
    All,
    Upcoming,
    Past,
    Birthdays,
}

impl ViewFilter {
    pub fn label(self) -> &'static str {
        match self {
            ViewFilter::All => "All",
            ViewFilter::Upcoming => "Upcoming",
            ViewFilter::Past => "Past",
            ViewFilter::Birthdays => "Birthdays",
        }
    }
}

/// Map the full event list to the displayed, ordered subset.
///
/// Pure: `now` is passed in explicitly, nothing is read from ambient
/// state. `Upcoming` keeps events starting at or after `now`, `Past`
/// keeps the rest, `Birthdays` keeps provider-marked birthday entries
/// regardless of time. A selected date intersects with the mode filter,
/// keeping only events whose effective start falls on that local
/// calendar date. Order is ascending by effective start for `Upcoming`
/// and `Birthdays`, descending otherwise; ties keep input order.
pub fn view(
    events: &[CalendarEvent],
    filter: ViewFilter,
    selected_date: Option<NaiveDate>,
    now: DateTime<Local>,
) -> Vec<CalendarEvent> {
    let mut visible: Vec<(DateTime<Local>, CalendarEvent)> = events
        .iter()
        .filter_map(|event| {
            let start = effective_start(event)?;

            let keep = match filter {
                ViewFilter::All => true,
                ViewFilter::Upcoming => start >= now,
                ViewFilter::Past => start < now,
                ViewFilter::Birthdays => event.is_birthday(),
            };
            if !keep {
                return None;
            }

            if let Some(date) = selected_date {
                if start.date_naive() != date {
                    return None;
                }
            }

            Some((start, event.clone()))
        })
        .collect();

    // Both sorts are stable, so equal instants preserve input order
    match filter {
        ViewFilter::Upcoming | ViewFilter::Birthdays => {
            visible.sort_by_key(|(start, _)| *start);
        }
        ViewFilter::All | ViewFilter::Past => {
            visible.sort_by(|a, b| b.0.cmp(&a.0));
        }
    }

    visible.into_iter().map(|(_, event)| event).collect()
}
