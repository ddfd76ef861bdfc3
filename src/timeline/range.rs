use serde::{Deserialize, Serialize};
use crate::constants::{FALLBACK_HALF_WINDOW_MS, MIN_RANGE_PADDING_MS, RANGE_PADDING_DIVISOR};
use crate::logging::log;
use crate::models::TrainTimeline;
use crate::time::{format_iso, now_millis, parse_timestamp, Timestamp};

/// Display window used for normalization. `end` is always after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeRange {
    /// Build a range, rejecting empty and inverted windows
    #[must_use]
    pub fn new(start: Timestamp, end: Timestamp) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// Window of `half_width` on either side of `center`
    #[must_use]
    pub fn around(center: Timestamp, half_width: i64) -> Self {
        let half_width = half_width.max(1);
        Self {
            start: center.saturating_sub(half_width),
            end: center.saturating_add(half_width),
        }
    }

    /// Width of the window, never less than one millisecond
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.end.saturating_sub(self.start).max(1)
    }

    #[must_use]
    pub fn contains(&self, time: Timestamp) -> bool {
        (self.start..=self.end).contains(&time)
    }

    #[must_use]
    pub fn clamp(&self, time: Timestamp) -> Timestamp {
        time.clamp(self.start, self.end)
    }

    /// Both ends as RFC 3339 strings for display
    #[must_use]
    pub fn to_iso(&self) -> (String, String) {
        (format_iso(self.start), format_iso(self.end))
    }
}

/// Earliest and latest valid timestamp across every train, if they differ
fn event_bounds(timeline: &TrainTimeline) -> Option<(Timestamp, Timestamp)> {
    let mut times = timeline.values().flatten().flat_map(|event| event.timestamps());
    let first = times.next()?;
    let (min, max) = times.fold((first, first), |(min, max), t| (min.min(t), max.max(t)));
    (max > min).then_some((min, max))
}

/// Derive the effective display window
///
/// The candidate bounds are used as-is when both parse and form a non-empty
/// window. Otherwise the window is mined from the planned and actual event
/// times and padded outward by `max(60 s, 5% of the span)`. With no usable
/// timestamps at all, the window is `now ± 30 min`.
#[must_use]
pub fn derive_time_range(
    candidate_start: Option<&str>,
    candidate_end: Option<&str>,
    timeline: &TrainTimeline,
    now: Timestamp,
) -> TimeRange {
    let start = candidate_start.and_then(parse_timestamp);
    let end = candidate_end.and_then(parse_timestamp);
    if let Some(range) = start.zip(end).and_then(|(start, end)| TimeRange::new(start, end)) {
        return range;
    }

    if let Some((min, max)) = event_bounds(timeline) {
        let span = max - min;
        let padding = MIN_RANGE_PADDING_MS.max((span + RANGE_PADDING_DIVISOR / 2) / RANGE_PADDING_DIVISOR);
        log!("Time range derived from events, padding {}ms", padding);
        return TimeRange {
            start: min.saturating_sub(padding),
            end: max.saturating_add(padding),
        };
    }

    log!("No usable timestamps, centring time range on the wall clock");
    TimeRange::around(now, FALLBACK_HALF_WINDOW_MS)
}

/// [`derive_time_range`] against the current wall clock
#[must_use]
pub fn derive_time_range_now(
    candidate_start: Option<&str>,
    candidate_end: Option<&str>,
    timeline: &TrainTimeline,
) -> TimeRange {
    derive_time_range(candidate_start, candidate_end, timeline, now_millis())
}
