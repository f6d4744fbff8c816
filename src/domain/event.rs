//! Event models and the create-event validation rules

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event identifiers come back as numbers or strings depending on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(n) => write!(f, "{n}"),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub id: Option<EventId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl Event {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled Event"
        } else {
            &self.title
        }
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start_date.as_deref().and_then(parse_timestamp)
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end_date.as_deref().and_then(parse_timestamp)
    }
}

/// Accepts RFC 3339 (with offset) and the offset-less form the form submits.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// "Mon, Mar 3, 2025 14:30", or "No date" when missing/unparseable
pub fn format_when(value: Option<NaiveDateTime>) -> String {
    match value {
        Some(dt) => dt.format("%a, %b %-d, %Y %H:%M").to_string(),
        None => "No date".to_string(),
    }
}

/// Payload for `POST /events`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

impl NewEvent {
    /// What we show when the server answers a create with an unusable body
    pub fn into_event(self) -> Event {
        Event {
            id: None,
            title: self.title,
            description: Some(self.description).filter(|d| !d.is_empty()),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("{0} date is required")]
    DateRequired(&'static str),
    #[error("{field} date must be YYYY-MM-DD, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} time must be HH:MM, got '{value}'")]
    InvalidTime { field: &'static str, value: String },
}

/// Raw text of the create-event form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
}

impl EventDraft {
    /// Submission gate: title plus both dates.
    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<NewEvent, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        if self.start_date.trim().is_empty() {
            return Err(ValidationError::DateRequired("Start"));
        }
        if self.end_date.trim().is_empty() {
            return Err(ValidationError::DateRequired("End"));
        }
        let start_date = combine_date_time("Start", &self.start_date, &self.start_time)?;
        let end_date = combine_date_time("End", &self.end_date, &self.end_time)?;
        Ok(NewEvent {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date,
            end_date,
        })
    }
}

/// Combine a date and an optional time into `YYYY-MM-DDTHH:MM:00`.
/// A missing time means midnight; a missing date means now.
pub fn combine_date_time(
    field: &'static str,
    date: &str,
    time: &str,
) -> Result<String, ValidationError> {
    let date = date.trim();
    if date.is_empty() {
        return Ok(Local::now().format("%Y-%m-%dT%H:%M:%S").to_string());
    }
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: date.to_string(),
        }
    })?;
    let time = match time.trim() {
        "" => "00:00",
        other => other,
    };
    let clock =
        NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| ValidationError::InvalidTime {
            field,
            value: time.to_string(),
        })?;
    Ok(format!("{}T{}:00", day.format("%Y-%m-%d"), clock.format("%H:%M")))
}

/// One normalized page of events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPage {
    pub items: Vec<Event>,
    pub total_count: u64,
    pub has_next_page: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EventDraft {
        EventDraft {
            title: "Standup".into(),
            description: " daily ".into(),
            start_date: "2025-03-03".into(),
            start_time: "09:30".into(),
            end_date: "2025-03-03".into(),
            end_time: String::new(),
        }
    }

    #[test]
    fn test_validate_combines_date_and_time() {
        let event = draft().validate().unwrap();
        assert_eq!(event.start_date, "2025-03-03T09:30:00");
        assert_eq!(event.end_date, "2025-03-03T00:00:00");
        assert_eq!(event.description, "daily");
    }

    #[test]
    fn test_validate_requires_title_and_dates() {
        let mut missing_title = draft();
        missing_title.title = "   ".into();
        assert_eq!(missing_title.validate(), Err(ValidationError::TitleRequired));

        let mut missing_end = draft();
        missing_end.end_date.clear();
        assert_eq!(missing_end.validate(), Err(ValidationError::DateRequired("End")));
        assert!(!missing_end.is_submittable());
    }

    #[test]
    fn test_validate_rejects_bad_text() {
        let mut bad_date = draft();
        bad_date.start_date = "03/03/2025".into();
        assert!(matches!(
            bad_date.validate(),
            Err(ValidationError::InvalidDate { field: "Start", .. })
        ));

        let mut bad_time = draft();
        bad_time.end_time = "25:99".into();
        assert!(matches!(
            bad_time.validate(),
            Err(ValidationError::InvalidTime { field: "End", .. })
        ));
    }

    #[test]
    fn test_missing_date_defaults_to_now() {
        let combined = combine_date_time("Start", "", "10:00").unwrap();
        assert!(parse_timestamp(&combined).is_some());
    }

    #[test]
    fn test_event_deserializes_camel_case() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Launch",
            "startDate": "2025-01-02T10:00:00Z",
            "endDate": "2025-01-02T11:00:00"
        }))
        .unwrap();
        assert_eq!(event.id, Some(EventId::Number(7)));
        assert!(event.start().is_some());
        assert!(event.end().is_some());
        assert_eq!(event.description, None);
    }

    #[test]
    fn test_untitled_and_undated_display() {
        let event = Event {
            id: Some(EventId::Text("abc".into())),
            title: String::new(),
            description: None,
            start_date: Some("garbage".into()),
            end_date: None,
        };
        assert_eq!(event.display_title(), "Untitled Event");
        assert_eq!(format_when(event.start()), "No date");
    }

    #[test]
    fn test_new_event_serializes_camel_case() {
        let value = serde_json::to_value(draft().validate().unwrap()).unwrap();
        assert_eq!(value["startDate"], "2025-03-03T09:30:00");
        assert_eq!(value["title"], "Standup");
    }
}
