//! Timeline reconstruction and playback
//!
//! `range` derives the display window, `normalize` places events on it,
//! `playback` sweeps a simulated cursor across it and `driver` owns the timer
//! that advances the cursor in the browser.

pub mod display;
pub mod driver;
pub mod normalize;
pub mod playback;
pub mod range;

pub use display::{axis_ticks, journey_progress, train_progress, AxisTick, EventTone};
pub use driver::{GlooScheduler, PlaybackDriver, PlaybackStatus, TickScheduler};
pub use normalize::{normalize_timeline, position_percent, NormalizedEvent, NormalizedTrain};
pub use playback::{interpolate_position, markers_at, FinishedPolicy, PlaybackCursor, PlaybackEngine, PlaybackState, TrainMarker};
pub use range::{derive_time_range, derive_time_range_now, TimeRange};

use crate::models::TimelineData;
use crate::time::{now_millis, Timestamp};

/// Everything the renderer needs for one `TimelineData` input
///
/// Recomputed from scratch whenever the input changes; nothing is carried over
/// from the previous view.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineView {
    pub range: TimeRange,
    /// `range` as RFC 3339 strings
    pub range_iso: (String, String),
    pub trains: Vec<NormalizedTrain>,
}

impl TimelineView {
    #[must_use]
    pub fn compute(data: &TimelineData, now: Timestamp) -> Self {
        let timeline = data.to_train_timeline();
        let range = derive_time_range(
            data.time_range.start.as_deref(),
            data.time_range.end.as_deref(),
            &timeline,
            now,
        );

        Self {
            range,
            range_iso: range.to_iso(),
            trains: normalize_timeline(&timeline, range),
        }
    }

    /// [`TimelineView::compute`] against the wall clock
    #[must_use]
    pub fn compute_now(data: &TimelineData) -> Self {
        Self::compute(data, now_millis())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }
}
