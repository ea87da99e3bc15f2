use serde::{Deserialize, Serialize};

/// One occurrence on the calendar, as returned by the events.list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    /// Present on provider-annotated birthday entries; only presence is consumed
    pub birthday_properties: Option<BirthdayProperties>,
    pub conference_data: Option<ConferenceData>,
}

/// Either an all-day calendar date or a precise instant with offset
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BirthdayProperties {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ConferenceData {
    pub conference_id: Option<String>,
}

impl EventTime {
    /// Whether at least one of the two time representations is present
    pub fn is_present(&self) -> bool {
        self.date.is_some() || self.date_time.is_some()
    }
}

impl CalendarEvent {
    /// An event is valid for display only if it has a non-empty title and
    /// both sides of its time range carry a date or dateTime. Invalid
    /// events are dropped at fetch time and never reach the filter stage.
    pub fn is_valid(&self) -> bool {
        self.summary.as_deref().is_some_and(|s| !s.is_empty())
            && self.start.is_present()
            && self.end.is_present()
    }

    /// Whether the provider marked this event as a birthday entry
    pub fn is_birthday(&self) -> bool {
        self.birthday_properties.is_some()
    }

    /// Meeting-join link derived from the conference identifier, if any
    pub fn meet_link(&self) -> Option<String> {
        self.conference_data
            .as_ref()
            .and_then(|c| c.conference_id.as_deref())
            .map(|id| format!("https://meet.google.com/{}", id))
    }
}
