use serde::Serialize;
use crate::models::{TrainEvent, TrainTimeline};
use crate::time::Timestamp;
use super::range::TimeRange;

/// A train event placed on the horizontal track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEvent {
    #[serde(flatten)]
    pub event: TrainEvent,
    pub planned_position: Option<f64>,
    pub actual_position: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTrain {
    pub train_id: String,
    pub events: Vec<NormalizedEvent>,
}

/// Percentage (0–100) of the way through `range` at which `time` falls
///
/// Times outside the range are clamped to the nearest edge.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn position_percent(time: Timestamp, range: TimeRange) -> f64 {
    let offset = time.saturating_sub(range.start) as f64;
    let percent = offset / range.duration_ms() as f64 * 100.0;
    percent.clamp(0.0, 100.0)
}

impl NormalizedEvent {
    #[must_use]
    pub fn new(event: TrainEvent, range: TimeRange) -> Self {
        Self {
            planned_position: event.planned_time.map(|t| position_percent(t, range)),
            actual_position: event.actual_time.map(|t| position_percent(t, range)),
            event,
        }
    }
}

/// Place every event of every train on the track, keeping source order
#[must_use]
pub fn normalize_timeline(timeline: &TrainTimeline, range: TimeRange) -> Vec<NormalizedTrain> {
    timeline
        .iter()
        .map(|(train_id, events)| NormalizedTrain {
            train_id: train_id.clone(),
            events: events
                .iter()
                .map(|event| NormalizedEvent::new(event.clone(), range))
                .collect(),
        })
        .collect()
}
