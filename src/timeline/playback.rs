use serde::{Deserialize, Serialize};
use crate::time::Timestamp;
use super::normalize::{NormalizedEvent, NormalizedTrain};
use super::range::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Not advancing; the cursor is either unset or the point playback was paused at
    Stopped,
    Running,
    /// Cursor pinned to the end of the range
    Finished,
}

/// What `start` does once playback has reached the end of the range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishedPolicy {
    /// Rewind to the start of the range and play again
    #[default]
    Restart,
    /// Stay at the end until `reset` or `seek`
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackCursor {
    pub simulated_time: Option<Timestamp>,
    pub is_playing: bool,
}

/// Interpolated marker position for one train at the cursor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainMarker {
    pub train_id: String,
    pub position: Option<f64>,
}

/// Simulated clock that sweeps a cursor across a [`TimeRange`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackEngine {
    range: TimeRange,
    step_ms: i64,
    finished_policy: FinishedPolicy,
    state: PlaybackState,
    simulated_time: Option<Timestamp>,
}

impl PlaybackEngine {
    #[must_use]
    pub fn new(range: TimeRange, step_ms: i64, finished_policy: FinishedPolicy) -> Self {
        Self {
            range,
            step_ms: step_ms.max(1),
            finished_policy,
            state: PlaybackState::Stopped,
            simulated_time: None,
        }
    }

    #[must_use]
    pub fn range(&self) -> TimeRange {
        self.range
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub fn simulated_time(&self) -> Option<Timestamp> {
        self.simulated_time
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Running
    }

    #[must_use]
    pub fn cursor(&self) -> PlaybackCursor {
        PlaybackCursor {
            simulated_time: self.simulated_time,
            is_playing: self.is_playing(),
        }
    }

    /// Begin or resume playback. Returns whether the engine is now running.
    pub fn start(&mut self) -> bool {
        match self.state {
            PlaybackState::Running => {}
            PlaybackState::Stopped => {
                if self.simulated_time.is_none() {
                    self.simulated_time = Some(self.range.start);
                }
                self.state = PlaybackState::Running;
            }
            PlaybackState::Finished => match self.finished_policy {
                FinishedPolicy::Restart => {
                    self.simulated_time = Some(self.range.start);
                    self.state = PlaybackState::Running;
                }
                FinishedPolicy::Hold => {}
            },
        }
        self.is_playing()
    }

    /// Stop advancing but keep the cursor as the resume point
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Stopped;
        }
    }

    /// Advance the cursor by one step, finishing at the end of the range.
    /// Returns whether the cursor moved.
    pub fn tick(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }

        let current = self.simulated_time.unwrap_or(self.range.start);
        let next = current.saturating_add(self.step_ms);
        if next > self.range.end {
            self.simulated_time = Some(self.range.end);
            self.state = PlaybackState::Finished;
        } else {
            self.simulated_time = Some(next);
        }
        self.simulated_time != Some(current)
    }

    /// Clear the cursor and stop
    pub fn reset(&mut self) {
        self.state = PlaybackState::Stopped;
        self.simulated_time = None;
    }

    /// Move the cursor, clamped into the range
    pub fn seek(&mut self, time: Timestamp) {
        let time = self.range.clamp(time);
        self.simulated_time = Some(time);
        if self.state == PlaybackState::Finished && time < self.range.end {
            self.state = PlaybackState::Stopped;
        }
    }

    /// Switch to a freshly derived range
    ///
    /// A cursor that still falls inside the new range is kept, otherwise the
    /// engine is reset.
    pub fn replace_range(&mut self, range: TimeRange) {
        self.range = range;
        match self.simulated_time {
            Some(time) if range.contains(time) => {
                if self.state == PlaybackState::Finished && time < range.end {
                    self.state = PlaybackState::Stopped;
                }
            }
            Some(_) => self.reset(),
            None => {}
        }
    }

    /// Marker position for every train at the current cursor
    #[must_use]
    pub fn markers(&self, trains: &[NormalizedTrain]) -> Vec<TrainMarker> {
        markers_at(trains, self.simulated_time)
    }
}

/// Marker positions for every train at `time`; empty when there is no cursor
#[must_use]
pub fn markers_at(trains: &[NormalizedTrain], time: Option<Timestamp>) -> Vec<TrainMarker> {
    let Some(time) = time else {
        return Vec::new();
    };

    trains
        .iter()
        .map(|train| TrainMarker {
            train_id: train.train_id.clone(),
            position: interpolate_position(&train.events, time),
        })
        .collect()
}

/// Interpolated track position of a train at `time`
///
/// Only events with a planned time take part. They are ordered by planned
/// time (stable, so ties keep source order) before the bracketing pair is
/// searched. Before the first keyframe the train sits on it, likewise after
/// the last. Returns `None` when the train has no planned events.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn interpolate_position(events: &[NormalizedEvent], time: Timestamp) -> Option<f64> {
    let mut keyframes: Vec<(Timestamp, f64)> = events
        .iter()
        .filter_map(|e| Some((e.event.planned_time?, e.planned_position?)))
        .collect();
    keyframes.sort_by_key(|&(t, _)| t);

    let &(first_time, first_position) = keyframes.first()?;
    let &(last_time, last_position) = keyframes.last()?;

    if time <= first_time {
        return Some(first_position);
    }
    if time >= last_time {
        return Some(last_position);
    }

    keyframes.windows(2).find_map(|pair| {
        let ((t1, p1), (t2, p2)) = (pair[0], pair[1]);
        if !(t1 <= time && time <= t2) {
            return None;
        }
        if t2 == t1 {
            return Some(p1);
        }
        let ratio = (time - t1) as f64 / (t2 - t1) as f64;
        Some(p1 + ratio * (p2 - p1))
    })
}
