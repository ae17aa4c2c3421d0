/// Length of each regulation half in seconds (20:00)
pub const HALF_LENGTH: f64 = 20.0 * 60.0;

/// Length of each overtime period in seconds (5:00)
pub const OT_LENGTH: f64 = 5.0 * 60.0;

/// Regulation game length in seconds (two halves)
pub const REGULATION_LENGTH: f64 = 2.0 * HALF_LENGTH;

/// Game length assumed when no event carries a usable clock
pub const DEFAULT_GAME_SECONDS: f64 = REGULATION_LENGTH;

/// Logical half-court drawing surface width (sideline to sideline)
pub const COURT_WIDTH: f64 = 50.0;

/// Logical half-court drawing surface height (baseline to half-court line)
pub const COURT_HEIGHT: f64 = 47.0;

/// Horizontal padding inside the drawing surface
pub const H_PAD: f64 = 3.0;

/// Padding between the half-court line and the top edge
pub const TOP_PAD: f64 = 2.0;

/// Padding between the hoop and the bottom edge
pub const BOT_PAD: f64 = 2.0;

/// Raw coordinate bounds used when a game has no plottable shots: (min_x, max_x, min_y, max_y)
pub const FALLBACK_SHOT_BOUNDS: [f64; 4] = [0.0, 47.0, 0.0, 50.0];

/// Shooter label used in shot charts when the event names nobody
pub const UNKNOWN_SHOOTER: &str = "Unknown";

/// Start offset and duration of a period on the game timeline.
pub fn period_span(period: u32) -> (f64, f64) {
    match period {
        0 | 1 => (0.0, HALF_LENGTH),
        2 => (HALF_LENGTH, HALF_LENGTH),
        p => (REGULATION_LENGTH + (p - 3) as f64 * OT_LENGTH, OT_LENGTH),
    }
}

/// Box scores kept by the cache before the least recently used is evicted
pub const BOX_CACHE_CAPACITY: usize = 16;
