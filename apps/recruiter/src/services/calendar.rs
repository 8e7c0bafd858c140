//! Simulated calendar: fixed availability and an in-memory event book.

use std::sync::Mutex;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Offered start times on every day of the search window.
const SLOT_START_HOURS: [u32; 2] = [10, 14];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attendee {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: String,
    pub attendees: Vec<Attendee>,
}

#[derive(Default)]
pub struct SimulatedCalendar {
    events: Mutex<Vec<CalendarEvent>>,
}

impl SimulatedCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two slots (10:00 and 14:00) on each of the `days` days after `today`.
    pub fn available_slots(&self, today: NaiveDate, days: u32, duration_minutes: u32) -> Vec<TimeSlot> {
        let length = Duration::minutes(i64::from(duration_minutes));
        (1..=days)
            .filter_map(|offset| today.checked_add_signed(Duration::days(i64::from(offset))))
            .flat_map(|day| {
                SLOT_START_HOURS.iter().filter_map(move |&hour| {
                    let start = day.and_time(NaiveTime::from_hms_opt(hour, 0, 0)?);
                    Some(TimeSlot {
                        start,
                        end: start + length,
                    })
                })
            })
            .collect()
    }

    pub fn create_event(&self, event: CalendarEvent) -> Uuid {
        info!(
            "Calendar event {} created (simulated): {} at {}",
            event.id, event.title, event.start
        );
        let id = event.id;
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
        id
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
