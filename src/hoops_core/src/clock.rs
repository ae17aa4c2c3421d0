//! Game clock: mapping `(period, secondsRemaining)` onto one timeline from
//! tip-off, `M:SS` formatting, and the time-window filter state shared by the
//! box score and the shot chart.

use serde::{Deserialize, Serialize};

use crate::constants::{period_span, DEFAULT_GAME_SECONDS, HALF_LENGTH};
use crate::error::{HoopsError, Result};
use crate::event::{PlayByPlayEvent, ShotEvent};

/// Absolute elapsed seconds from tip-off.
///
/// Halves are 20 minutes, every overtime is 5. `seconds_remaining` is clamped
/// to the period length, so slightly out-of-range upstream clocks still land
/// inside their period. Returns `None` when there is no usable clock.
pub fn game_second(period: u32, seconds_remaining: Option<f64>) -> Option<f64> {
    let remaining = seconds_remaining.filter(|s| s.is_finite())?;
    let (start, duration) = period_span(period);
    let clamped = remaining.clamp(0.0, duration);
    Some(start + (duration - clamped))
}

/// Anything placed on the game timeline by its period clock.
pub trait Timed {
    fn period(&self) -> u32;
    fn seconds_remaining(&self) -> Option<f64>;

    fn game_second(&self) -> Option<f64> {
        game_second(self.period(), self.seconds_remaining())
    }
}

impl Timed for PlayByPlayEvent {
    fn period(&self) -> u32 {
        self.period
    }

    fn seconds_remaining(&self) -> Option<f64> {
        self.seconds_remaining
    }
}

impl Timed for ShotEvent {
    fn period(&self) -> u32 {
        self.period
    }

    fn seconds_remaining(&self) -> Option<f64> {
        self.seconds_remaining
    }
}

/// Latest game second seen in `items`, or a regulation game when nothing has
/// a clock (or everything sits at tip-off).
pub fn max_game_second<T: Timed>(items: &[T]) -> f64 {
    let max = items
        .iter()
        .filter_map(Timed::game_second)
        .fold(0.0_f64, f64::max);
    if max > 0.0 {
        max
    } else {
        DEFAULT_GAME_SECONDS
    }
}

/// Format seconds as `M:SS`, minutes unpadded.
pub fn format_clock(sec: f64) -> String {
    let total = if sec.is_finite() { sec.max(0.0).floor() as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Parse `M:SS` back to seconds.
pub fn parse_clock(text: &str) -> Result<f64> {
    let invalid = || HoopsError::InvalidClock(text.to_string());
    let (m, s) = text.split_once(':').ok_or_else(invalid)?;
    if s.contains(':') {
        return Err(invalid());
    }
    let minutes = parse_clock_part(m).ok_or_else(invalid)?;
    let seconds = parse_clock_part(s).ok_or_else(invalid)?;
    Ok(minutes * 60.0 + seconds)
}

/// An empty part reads as zero, so ":30" is thirty seconds.
fn parse_clock_part(part: &str) -> Option<f64> {
    let trimmed = part.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Inclusive `[start, end]` range of game seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    /// Build a window, swapping the bounds if they arrive reversed.
    pub fn new(a: f64, b: f64) -> Self {
        TimeWindow {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn full_game(max: f64) -> Self {
        TimeWindow::new(0.0, max)
    }

    pub fn first_half(max: f64) -> Self {
        TimeWindow::new(0.0, HALF_LENGTH.min(max))
    }

    pub fn second_half_ot(max: f64) -> Self {
        TimeWindow::new(HALF_LENGTH.min(max), max)
    }

    pub fn contains(&self, second: f64) -> bool {
        second >= self.start && second <= self.end
    }

    /// Whether an item's game second is known and inside the window.
    pub fn covers<T: Timed>(&self, item: &T) -> bool {
        item.game_second().map_or(false, |gs| self.contains(gs))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    All,
    Range,
}

/// Time filter state behind the preset buttons, the `M:SS` inputs and the
/// two range sliders.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub mode: TimeMode,
    pub start: f64,
    pub end: f64,
    pub game_max: f64,
}

impl TimeRange {
    pub fn new(game_max: f64) -> Self {
        let game_max = game_max.max(0.0);
        TimeRange {
            mode: TimeMode::All,
            start: 0.0,
            end: game_max,
            game_max,
        }
    }

    /// Start from the latest clock seen in `items`.
    pub fn for_items<T: Timed>(items: &[T]) -> Self {
        TimeRange::new(max_game_second(items))
    }

    pub fn full_game(&mut self) {
        self.mode = TimeMode::All;
        self.start = 0.0;
        self.end = self.game_max;
    }

    pub fn first_half(&mut self) {
        let w = TimeWindow::first_half(self.game_max);
        self.set_range(w.start, w.end);
    }

    pub fn second_half_ot(&mut self) {
        let w = TimeWindow::second_half_ot(self.game_max);
        self.set_range(w.start, w.end);
    }

    /// Typed "From" value. Bad text leaves the state untouched.
    pub fn set_start_text(&mut self, text: &str) -> Result<()> {
        let value = parse_clock(text)?;
        self.mode = TimeMode::Range;
        self.start = value.clamp(0.0, self.game_max);
        Ok(())
    }

    /// Typed "To" value. Bad text leaves the state untouched.
    pub fn set_end_text(&mut self, text: &str) -> Result<()> {
        let value = parse_clock(text)?;
        self.mode = TimeMode::Range;
        self.end = value.clamp(0.0, self.game_max);
        Ok(())
    }

    /// "From" slider; cannot pass the current end.
    pub fn drag_start(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.mode = TimeMode::Range;
        self.start = value.clamp(0.0, self.end.min(self.game_max).max(0.0));
    }

    /// "To" slider; cannot pass the current start.
    pub fn drag_end(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.mode = TimeMode::Range;
        let lo = self.start.min(self.game_max);
        self.end = value.clamp(lo, self.game_max.max(lo));
    }

    /// New game length (e.g. fresh data arrived); keeps `end` inside it.
    pub fn set_game_max(&mut self, game_max: f64) {
        self.game_max = game_max.max(0.0);
        self.end = self.end.clamp(0.0, self.game_max);
    }

    /// The window filters should actually use.
    pub fn effective(&self) -> TimeWindow {
        match self.mode {
            TimeMode::All => TimeWindow::full_game(self.game_max),
            TimeMode::Range => TimeWindow::new(self.start, self.end),
        }
    }

    /// Caption under the controls, e.g. "0:00 to 20:00 (max 40:00)".
    pub fn describe(&self) -> String {
        let w = self.effective();
        format!(
            "{} to {} (max {})",
            format_clock(w.start),
            format_clock(w.end),
            format_clock(self.game_max)
        )
    }

    fn set_range(&mut self, start: f64, end: f64) {
        self.mode = TimeMode::Range;
        self.start = start;
        self.end = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_period_boundaries() {
        assert_eq!(game_second(1, Some(1200.0)), Some(0.0));
        assert_eq!(game_second(1, Some(0.0)), Some(1200.0));
        assert_eq!(game_second(2, Some(1200.0)), Some(1200.0));
        assert_eq!(game_second(2, Some(0.0)), Some(2400.0));
        assert_eq!(game_second(3, Some(300.0)), Some(2400.0));
        assert_eq!(game_second(3, Some(0.0)), Some(2700.0));
        assert_eq!(game_second(4, Some(0.0)), Some(3000.0));
    }

    #[test]
    fn test_remaining_is_clamped() {
        // OT clock that claims more than five minutes left pins to the OT start
        assert_eq!(game_second(3, Some(900.0)), Some(2400.0));
        assert_eq!(game_second(1, Some(-5.0)), Some(1200.0));
    }

    #[test]
    fn test_missing_clock() {
        assert_eq!(game_second(1, None), None);
        assert_eq!(game_second(2, Some(f64::NAN)), None);
    }

    #[test]
    fn test_shots_and_events_share_mapping() {
        let event = PlayByPlayEvent { period: 2, seconds_remaining: Some(61.0), ..Default::default() };
        let shot = ShotEvent { period: 2, seconds_remaining: Some(61.0), ..Default::default() };
        assert_eq!(event.game_second(), shot.game_second());
        assert_eq!(event.game_second(), Some(2339.0));
    }

    #[test]
    fn test_max_game_second() {
        let events = vec![
            PlayByPlayEvent { period: 1, seconds_remaining: Some(100.0), ..Default::default() },
            PlayByPlayEvent { period: 3, seconds_remaining: Some(12.0), ..Default::default() },
            PlayByPlayEvent { period: 2, seconds_remaining: None, ..Default::default() },
        ];
        assert_eq!(max_game_second(&events), 2688.0);
        assert_eq!(max_game_second::<PlayByPlayEvent>(&[]), DEFAULT_GAME_SECONDS);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(65.9), "1:05");
        assert_eq!(format_clock(2400.0), "40:00");
        assert_eq!(format_clock(-3.0), "0:00");
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("12:30").unwrap(), 750.0);
        assert_eq!(parse_clock("0:05").unwrap(), 5.0);
        assert!(matches!(parse_clock("1230"), Err(HoopsError::InvalidClock(_))));
        assert!(parse_clock("1:2:3").is_err());
        assert!(parse_clock("ab:cd").is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(TimeWindow::first_half(2700.0), TimeWindow { start: 0.0, end: 1200.0 });
        assert_eq!(TimeWindow::second_half_ot(2700.0), TimeWindow { start: 1200.0, end: 2700.0 });
        // game data that stops before halftime
        assert_eq!(TimeWindow::second_half_ot(900.0), TimeWindow { start: 900.0, end: 900.0 });
    }

    #[test]
    fn test_window_is_inclusive() {
        let w = TimeWindow::new(1200.0, 600.0);
        assert_eq!(w.start, 600.0);
        assert!(w.contains(600.0));
        assert!(w.contains(1200.0));
        assert!(!w.contains(1200.5));
    }

    #[test]
    fn test_time_range_text_entry() {
        let mut range = TimeRange::new(2400.0);
        range.set_start_text("5:00").unwrap();
        range.set_end_text("50:00").unwrap();
        assert_eq!(range.mode, TimeMode::Range);
        assert_eq!(range.effective(), TimeWindow { start: 300.0, end: 2400.0 });

        let before = range;
        assert!(range.set_start_text("five").is_err());
        assert!(range.set_end_text("").is_err());
        assert_eq!(range, before, "invalid text leaves bounds unchanged");
    }

    #[test]
    fn test_time_range_sliders() {
        let mut range = TimeRange::new(2400.0);
        range.drag_end(1000.0);
        range.drag_start(1500.0);
        assert_eq!(range.start, 1000.0, "start cannot pass end");
        range.drag_end(200.0);
        assert_eq!(range.end, 1000.0, "end cannot pass start");
    }

    #[test]
    fn test_time_range_modes() {
        let mut range = TimeRange::new(2700.0);
        range.second_half_ot();
        assert_eq!(range.effective(), TimeWindow { start: 1200.0, end: 2700.0 });
        range.full_game();
        assert_eq!(range.mode, TimeMode::All);
        assert_eq!(range.effective(), TimeWindow { start: 0.0, end: 2700.0 });
        assert_eq!(range.describe(), "0:00 to 45:00 (max 45:00)");

        range.set_game_max(2400.0);
        assert_eq!(range.end, 2400.0);
    }

    #[test]
    fn test_reversed_typed_range_is_normalized() {
        let mut range = TimeRange::new(2400.0);
        range.set_start_text("30:00").unwrap();
        range.set_end_text("10:00").unwrap();
        assert_eq!(range.effective(), TimeWindow { start: 600.0, end: 1800.0 });
    }

    fn clock_strategy() -> impl Strategy<Value = (u32, f64)> {
        (1u32..=6).prop_flat_map(|p| {
            let (_, duration) = period_span(p);
            (Just(p), 0.0..=duration)
        })
    }

    proptest! {
        #[test]
        fn prop_game_second_monotonic(a in clock_strategy(), b in clock_strategy()) {
            // chronological order: earlier period, or same period with more time left
            let (first, second) = if a.0 < b.0 || (a.0 == b.0 && a.1 >= b.1) { (a, b) } else { (b, a) };
            let gs1 = game_second(first.0, Some(first.1)).unwrap();
            let gs2 = game_second(second.0, Some(second.1)).unwrap();
            prop_assert!(gs1 <= gs2);
        }

        #[test]
        fn prop_clock_text_roundtrip(sec in 0u32..20_000) {
            let parsed = parse_clock(&format_clock(sec as f64)).unwrap();
            prop_assert_eq!(parsed, sec as f64);
        }
    }
}
