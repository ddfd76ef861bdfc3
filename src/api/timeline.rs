use serde::{Deserialize, Serialize};
use crate::constants::{DEFAULT_LOOKBACK_HOURS, MAX_LOOKBACK_HOURS};
use crate::models::TimelineData;

const TIMELINE_API: &str = "/api/train-logs/timeline";

/// Filters accepted by the timeline endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineQuery {
    pub train_id: Option<String>,
    pub section_id: Option<String>,
    pub hours: u32,
}

impl Default for TimelineQuery {
    fn default() -> Self {
        Self::with_hours(DEFAULT_LOOKBACK_HOURS)
    }
}

impl TimelineQuery {
    #[must_use]
    pub fn with_hours(hours: u32) -> Self {
        Self {
            train_id: None,
            section_id: None,
            hours: hours.clamp(1, MAX_LOOKBACK_HOURS),
        }
    }

    /// Query-string pairs; blank filters are left out
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let filters = [("train_id", &self.train_id), ("section_id", &self.section_id)];
        for (key, value) in filters {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        pairs.push(("hours", self.hours.clamp(1, MAX_LOOKBACK_HOURS).to_string()));
        pairs
    }
}

/// Endpoint URL under `base_url`, or under the page origin when `base_url` is empty
#[must_use]
pub fn timeline_url(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        format!("{origin}{TIMELINE_API}")
    } else {
        format!("{base}{TIMELINE_API}")
    }
}

/// Fetch the per-train timeline from the backend
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP request fails
/// - The response status is not ok
/// - The response body is not a timeline payload
pub async fn fetch_timeline_data(base_url: &str, query: &TimelineQuery) -> Result<TimelineData, String> {
    let response = reqwest::Client::new()
        .get(timeline_url(base_url))
        .query(&query.to_pairs())
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {e}"))?;
    TimelineData::from_json(&body)
}
