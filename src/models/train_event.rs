use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::constants::MINUTE_MS;
use crate::time::{parse_timestamp, Timestamp};
use super::timeline::TimelineEntry;

/// Train id → events, in the order the source supplied them
pub type TrainTimeline = IndexMap<String, Vec<TrainEvent>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Arrival,
    Departure,
    Delay,
    StatusChange,
    Other,
}

impl EventType {
    /// Map a backend `event_type` string; unknown kinds become `Other`
    #[must_use]
    pub fn from_wire(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrival" => Self::Arrival,
            "departure" => Self::Departure,
            "delay" => Self::Delay,
            "status_change" => Self::StatusChange,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arrival => "arrival",
            Self::Departure => "departure",
            Self::Delay => "delay",
            Self::StatusChange => "status_change",
            Self::Other => "other",
        }
    }
}

/// A planned and/or observed occurrence for one train
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainEvent {
    pub event_type: EventType,
    pub planned_time: Option<Timestamp>,
    pub actual_time: Option<Timestamp>,
    pub delay_minutes: Option<f64>,
    pub station_id: String,
    pub section_id: String,
    pub status: Option<String>,
    pub platform: Option<String>,
}

impl TrainEvent {
    #[must_use]
    pub fn new(event_type: EventType, planned_time: Option<Timestamp>, actual_time: Option<Timestamp>) -> Self {
        Self {
            event_type,
            planned_time,
            actual_time,
            delay_minutes: None,
            station_id: String::new(),
            section_id: String::new(),
            status: None,
            platform: None,
        }
    }

    /// Build an event from a wire row; unparsable timestamps become `None`
    #[must_use]
    pub fn from_entry(entry: &TimelineEntry) -> Self {
        Self {
            event_type: EventType::from_wire(&entry.event_type),
            planned_time: entry.planned_time.as_deref().and_then(parse_timestamp),
            actual_time: entry.actual_time.as_deref().and_then(parse_timestamp),
            delay_minutes: entry.delay_minutes.filter(|d| d.is_finite()),
            station_id: entry.station_id.clone(),
            section_id: entry.section_id.clone(),
            status: entry.status.clone(),
            platform: entry.platform.clone(),
        }
    }

    /// Reported delay, or the planned/actual difference in whole minutes
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn effective_delay_minutes(&self) -> Option<f64> {
        if self.delay_minutes.is_some() {
            return self.delay_minutes;
        }
        let (planned, actual) = (self.planned_time?, self.actual_time?);
        Some(((actual - planned) / MINUTE_MS) as f64)
    }

    /// Every valid timestamp carried by the event
    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> {
        self.planned_time.into_iter().chain(self.actual_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_from_wire() {
        assert_eq!(EventType::from_wire("arrival"), EventType::Arrival);
        assert_eq!(EventType::from_wire("Departure"), EventType::Departure);
        assert_eq!(EventType::from_wire(" delay "), EventType::Delay);
        assert_eq!(EventType::from_wire("status_change"), EventType::StatusChange);
        assert_eq!(EventType::from_wire("platform_change"), EventType::Other);
        assert_eq!(EventType::from_wire(""), EventType::Other);
    }

    #[test]
    fn test_event_type_round_trips_through_as_str() {
        for kind in [EventType::Arrival, EventType::Departure, EventType::Delay, EventType::StatusChange] {
            assert_eq!(EventType::from_wire(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_from_entry_drops_bad_timestamps() {
        let entry = TimelineEntry {
            event_type: "arrival".to_string(),
            planned_time: Some("2025-09-10T12:00:00Z".to_string()),
            actual_time: Some("soon".to_string()),
            ..TimelineEntry::default()
        };
        let event = TrainEvent::from_entry(&entry);
        assert!(event.planned_time.is_some());
        assert_eq!(event.actual_time, None);
    }

    #[test]
    fn test_effective_delay_prefers_reported_value() {
        let mut event = TrainEvent::new(EventType::Arrival, Some(0), Some(10 * MINUTE_MS));
        event.delay_minutes = Some(3.0);
        assert_eq!(event.effective_delay_minutes(), Some(3.0));
    }

    #[test]
    fn test_effective_delay_derived_from_times() {
        let event = TrainEvent::new(EventType::Arrival, Some(0), Some(7 * MINUTE_MS + 30_000));
        assert_eq!(event.effective_delay_minutes(), Some(7.0));

        let early = TrainEvent::new(EventType::Departure, Some(5 * MINUTE_MS), Some(3 * MINUTE_MS));
        assert_eq!(early.effective_delay_minutes(), Some(-2.0));

        let planned_only = TrainEvent::new(EventType::Departure, Some(0), None);
        assert_eq!(planned_only.effective_delay_minutes(), None);
    }

    #[test]
    fn test_timestamps_skips_absent_times() {
        let event = TrainEvent::new(EventType::Other, None, Some(42));
        assert_eq!(event.timestamps().collect::<Vec<_>>(), vec![42]);
    }
}
