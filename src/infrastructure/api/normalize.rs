//! Listing responses come in several shapes; fold them into one `EventPage`

use serde_json::Value;
use tracing::warn;

use crate::domain::{Event, EventPage};

/// Accepts a bare array, `{items, total|totalCount}` or
/// `{data, totalCount|total}`. Anything else is an empty page.
///
/// Without a usable count the total is `offset + items.len()`, so a later
/// page never reports fewer events than it skipped.
///
/// `has_next_page` is always `offset + items.len() < total_count`, whatever
/// the server claims.
pub fn normalize_page(body: &Value, offset: u64) -> EventPage {
    let (raw_items, total) = match body {
        Value::Array(items) => (items.as_slice(), None),
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("items") {
                (items.as_slice(), first_count(map, &["total", "totalCount"]))
            } else if let Some(Value::Array(items)) = map.get("data") {
                (items.as_slice(), first_count(map, &["totalCount", "total"]))
            } else {
                warn!("unrecognized events response shape");
                return EventPage::default();
            }
        }
        _ => {
            warn!("unrecognized events response shape");
            return EventPage::default();
        }
    };

    let items: Vec<Event> = raw_items.iter().filter_map(parse_event).collect();
    let total_count = total.unwrap_or(offset + raw_items.len() as u64);
    let has_next_page = offset + (raw_items.len() as u64) < total_count;

    EventPage {
        items,
        total_count,
        has_next_page,
    }
}

fn first_count(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find_map(|value| {
            let count = match value {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            };
            count.filter(|count| *count > 0)
        })
}

fn parse_event(value: &Value) -> Option<Event> {
    if !value.is_object() {
        return None;
    }
    match serde_json::from_value::<Event>(value.clone()) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!("skipping malformed event: {err}");
            None
        }
    }
}
