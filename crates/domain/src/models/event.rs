//! Event domain model and listing filters.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Whether an event is free to attend or requires a paid ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Free,
    Paid,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Free => "free",
            EventType::Paid => "paid",
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(EventType::Free),
            "paid" => Ok(EventType::Paid),
            _ => Err(format!("Invalid event type: {}", s)),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of an event.
///
/// Transitions are unconstrained: organizers may set any status at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Archived,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
            EventStatus::Archived => "archived",
        }
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(EventStatus::Draft),
            "published" => Ok(EventStatus::Published),
            "archived" => Ok(EventStatus::Archived),
            _ => Err(format!("Invalid event status: {}", s)),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An event listed in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub banner_image_url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub location: String,
    pub event_type: EventType,
    pub status: EventStatus,
    pub organizer_name: String,
    pub organizer_email: String,
    pub organizer_phone: String,
    pub created_at: DateTime<Utc>,
}

/// Filters for the event listing.
///
/// All filters are conjunctive; `category` and `event_type` accept "all"
/// as a no-op value (the filter UI's default option).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub event_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

impl EventFilter {
    /// Category filter value, with "all" treated as absent.
    pub fn category_filter(&self) -> Option<&str> {
        active_filter(&self.category)
    }

    /// Event-type filter value, with "all" treated as absent.
    pub fn event_type_filter(&self) -> Option<&str> {
        active_filter(&self.event_type)
    }

    /// Search term, with empty strings treated as absent.
    pub fn search_filter(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Requested page, 1-based; defaults to the first page.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

fn active_filter(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_from_str() {
        assert_eq!(EventType::from_str("free").unwrap(), EventType::Free);
        assert_eq!(EventType::from_str("PAID").unwrap(), EventType::Paid);
        assert!(EventType::from_str("donation").is_err());
    }

    #[test]
    fn test_event_status_roundtrip() {
        for status in [
            EventStatus::Draft,
            EventStatus::Published,
            EventStatus::Archived,
        ] {
            assert_eq!(EventStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_event_status_display() {
        assert_eq!(format!("{}", EventStatus::Published), "published");
    }

    #[test]
    fn test_filter_all_is_noop() {
        let filter = EventFilter {
            category: Some("all".to_string()),
            event_type: Some("All".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.category_filter(), None);
        assert_eq!(filter.event_type_filter(), None);
    }

    #[test]
    fn test_filter_values_pass_through() {
        let filter = EventFilter {
            category: Some("Music".to_string()),
            event_type: Some("paid".to_string()),
            search: Some("  jazz night ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.category_filter(), Some("Music"));
        assert_eq!(filter.event_type_filter(), Some("paid"));
        assert_eq!(filter.search_filter(), Some("jazz night"));
    }

    #[test]
    fn test_filter_blank_search_is_absent() {
        let filter = EventFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_filter(), None);
    }

    #[test]
    fn test_filter_page_defaults_and_clamps() {
        assert_eq!(EventFilter::default().page(), 1);
        let filter = EventFilter {
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(filter.page(), 1);
        let filter = EventFilter {
            page: Some(4),
            ..Default::default()
        };
        assert_eq!(filter.page(), 4);
    }
}
