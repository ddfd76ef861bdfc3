use serde::{Deserialize, Serialize};
use crate::api::timeline::TimelineQuery;
use crate::constants::{DEFAULT_LOOKBACK_HOURS, DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_STEP_MS, DEFAULT_TICK_INTERVAL_MS, MAX_LOOKBACK_HOURS};
use crate::timeline::{FinishedPolicy, PlaybackEngine, TimeRange};

const SETTINGS_STORAGE_KEY: &str = "rail_timeline_settings";

fn default_tick_interval_ms() -> u32 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_step_ms() -> i64 {
    DEFAULT_STEP_MS
}

fn default_lookback_hours() -> u32 {
    DEFAULT_LOOKBACK_HOURS
}

fn default_refresh_interval_secs() -> u32 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Playback and data-source settings, persisted in `localStorage`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Wall-clock milliseconds between ticks
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u32,
    /// Simulated milliseconds added per tick
    #[serde(default = "default_step_ms")]
    pub step_ms: i64,
    #[serde(default)]
    pub finished_policy: FinishedPolicy,
    /// Backend origin; empty means the page's own origin
    #[serde(default)]
    pub api_base_url: String,
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
    /// Seconds between automatic re-fetches; 0 leaves refreshing to the user
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u32,
    #[serde(default)]
    pub train_id: Option<String>,
    #[serde(default)]
    pub section_id: Option<String>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            step_ms: DEFAULT_STEP_MS,
            finished_policy: FinishedPolicy::default(),
            api_base_url: String::new(),
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            train_id: None,
            section_id: None,
        }
    }
}

impl PlaybackSettings {
    /// Parse and validate settings JSON
    ///
    /// Missing fields take their defaults, the look-back window is clamped
    /// to what the backend accepts and blank filters are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the tick interval or step
    /// is not positive
    pub fn from_json(json: &str) -> Result<Self, String> {
        let mut settings: Self = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse settings: {e}"))?;

        if settings.tick_interval_ms == 0 {
            return Err("Tick interval must be positive".to_string());
        }
        if settings.step_ms <= 0 {
            return Err("Playback step must be positive".to_string());
        }
        settings.lookback_hours = settings.lookback_hours.clamp(1, MAX_LOOKBACK_HOURS);
        settings.api_base_url = settings.api_base_url.trim().trim_end_matches('/').to_string();
        settings.train_id = non_blank(settings.train_id);
        settings.section_id = non_blank(settings.section_id);

        Ok(settings)
    }

    /// Load settings from `localStorage`, falling back to defaults
    #[must_use]
    pub fn load() -> Self {
        let Some(json) = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(SETTINGS_STORAGE_KEY).ok().flatten())
        else {
            return Self::default();
        };

        Self::from_json(&json).unwrap_or_else(|e| {
            web_sys::console::warn_1(&format!("Ignoring stored settings: {e}").into());
            Self::default()
        })
    }

    /// Endpoint filters for the configured look-back and train/section scope
    #[must_use]
    pub fn timeline_query(&self) -> TimelineQuery {
        TimelineQuery {
            train_id: self.train_id.clone(),
            section_id: self.section_id.clone(),
            ..TimelineQuery::with_hours(self.lookback_hours)
        }
    }

    /// Wall-clock period between automatic re-fetches, `None` when disabled
    #[must_use]
    pub fn refresh_period_ms(&self) -> Option<u32> {
        (self.refresh_interval_secs > 0).then_some(self.refresh_interval_secs.saturating_mul(1000))
    }

    /// Fresh engine over `range` using these settings
    #[must_use]
    pub fn engine_for(&self, range: TimeRange) -> PlaybackEngine {
        PlaybackEngine::new(range, self.step_ms, self.finished_policy)
    }
}
