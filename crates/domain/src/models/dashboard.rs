//! Organizer dashboard aggregate types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Event counts broken down by lifecycle status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCounts {
    pub total: i64,
    pub published: i64,
    pub draft: i64,
    pub archived: i64,
}

/// Read-side aggregation over one organizer's events and paid bookings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerDashboard {
    pub events: EventCounts,
    /// Total seats booked across paid bookings.
    pub tickets_booked: i64,
    /// Sum of amount_paid across paid bookings.
    pub revenue: Decimal,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_serialization() {
        let dashboard = OrganizerDashboard {
            events: EventCounts {
                total: 5,
                published: 3,
                draft: 1,
                archived: 1,
            },
            tickets_booked: 42,
            revenue: Decimal::from_str_exact("10500.00").unwrap(),
            generated_at: Utc::now(),
        };
        let json = serde_json::to_string(&dashboard).unwrap();
        assert!(json.contains("\"ticketsBooked\":42"));
        assert!(json.contains("\"published\":3"));
        assert!(json.contains("10500.00"));
    }
}
