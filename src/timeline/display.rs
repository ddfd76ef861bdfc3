use crate::models::{EventType, TrainEvent};
use crate::time::Timestamp;
use super::normalize::{position_percent, NormalizedEvent};
use super::range::TimeRange;

/// Colour family of an actual-time event marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTone {
    Delayed,
    Arrival,
    Departure,
    Delay,
    StatusChange,
    Other,
}

impl EventTone {
    /// Tones shown in the legend, in display order
    pub const LEGEND: [Self; 4] = [Self::Arrival, Self::Departure, Self::Delay, Self::StatusChange];

    /// Any positive delay wins over the event type
    #[must_use]
    pub fn for_event(event: &TrainEvent) -> Self {
        if event.delay_minutes.is_some_and(|d| d > 0.0) {
            return Self::Delayed;
        }
        match event.event_type {
            EventType::Arrival => Self::Arrival,
            EventType::Departure => Self::Departure,
            EventType::Delay => Self::Delay,
            EventType::StatusChange => Self::StatusChange,
            EventType::Other => Self::Other,
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Delayed | Self::Delay => "tone-delay",
            Self::Arrival => "tone-arrival",
            Self::Departure => "tone-departure",
            Self::StatusChange => "tone-status-change",
            Self::Other => "tone-other",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Delayed => "Delayed",
            Self::Arrival => "Arrival",
            Self::Departure => "Departure",
            Self::Delay => "Delay",
            Self::StatusChange => "Status Change",
            Self::Other => "Other",
        }
    }
}

/// A tick mark on the time axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub time: Timestamp,
}

/// `count` interior ticks, evenly spaced so that neither edge carries one
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn axis_ticks(range: TimeRange, count: usize) -> Vec<AxisTick> {
    let slots = (count + 1) as f64;
    (1..=count)
        .map(|i| {
            let position = i as f64 * 100.0 / slots;
            let offset = (range.duration_ms() as f64 * position / 100.0).round() as i64;
            AxisTick {
                position,
                time: range.start + offset,
            }
        })
        .collect()
}

/// Percentage of a journey completed at `now`, clamped to 0–100
///
/// `None` when the arrival is not after the departure.
#[must_use]
pub fn journey_progress(departure: Timestamp, arrival: Timestamp, now: Timestamp) -> Option<f64> {
    TimeRange::new(departure, arrival).map(|journey| position_percent(now, journey))
}

/// How far a train is through its planned run at `now`
///
/// The run spans the first planned departure to the last planned arrival.
/// Without a departure or an arrival the earliest or latest planned time
/// stands in for it.
#[must_use]
pub fn train_progress(events: &[NormalizedEvent], now: Timestamp) -> Option<f64> {
    let planned = |kind: EventType| {
        events
            .iter()
            .filter(move |e| e.event.event_type == kind)
            .filter_map(|e| e.event.planned_time)
    };
    let all_planned = || events.iter().filter_map(|e| e.event.planned_time);

    let departure = planned(EventType::Departure).min().or_else(|| all_planned().min())?;
    let arrival = planned(EventType::Arrival).max().or_else(|| all_planned().max())?;
    journey_progress(departure, arrival, now)
}
