use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use super::train_event::{TrainEvent, TrainTimeline};

/// Treat an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One row of the `/api/train-logs/timeline` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub station_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub section_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_type: String,
    pub planned_time: Option<String>,
    pub actual_time: Option<String>,
    pub delay_minutes: Option<f64>,
    pub status: Option<String>,
    pub platform: Option<String>,
}

/// Server-suggested display window, both ends ISO 8601 strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTimeRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Timeline payload as delivered by the backend
///
/// Trains keep the order of the JSON object they were read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeline: IndexMap<String, Vec<TimelineEntry>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_range: WireTimeRange,
}

impl TimelineData {
    /// Parse a timeline payload from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON timeline payload
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to deserialize timeline: {e}"))
    }

    /// Convert wire rows into typed events, keeping train and event order
    #[must_use]
    pub fn to_train_timeline(&self) -> TrainTimeline {
        self.timeline
            .iter()
            .map(|(train_id, entries)| {
                let events = entries.iter().map(TrainEvent::from_entry).collect();
                (train_id.clone(), events)
            })
            .collect()
    }
}
