/// One minute in milliseconds
pub const MINUTE_MS: i64 = 60_000;

/// Half-width of the window used when neither the server range nor any event
/// timestamp is usable (the window is centred on the wall clock)
pub const FALLBACK_HALF_WINDOW_MS: i64 = 30 * MINUTE_MS;

/// Smallest padding added on each side of a window mined from event times
pub const MIN_RANGE_PADDING_MS: i64 = MINUTE_MS;

/// Padding as a fraction of the mined span, expressed as a divisor (1/20 = 5%)
pub const RANGE_PADDING_DIVISOR: i64 = 20;

/// Default wall-clock period between playback ticks
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 1000;

/// Default simulated time added per playback tick
pub const DEFAULT_STEP_MS: i64 = 1000;

/// Default look-back window requested from the timeline endpoint
pub const DEFAULT_LOOKBACK_HOURS: u32 = 12;

/// Largest look-back window the timeline endpoint accepts (one week)
pub const MAX_LOOKBACK_HOURS: u32 = 168;

/// Number of interior tick marks drawn on the time axis
pub const AXIS_TICK_COUNT: usize = 6;

/// Default period between automatic timeline re-fetches (0 disables them)
pub const DEFAULT_REFRESH_INTERVAL_SECS: u32 = 30;
