//! Hoops Core - game-level analytics for NCAA basketball play-by-play.
//!
//! This library turns raw play-by-play and shot records into windowed box
//! scores and shot chart geometry, with optional Python bindings via PyO3
//! (cargo feature `python`).

pub mod box_score;
pub mod cache;
pub mod classify;
pub mod clock;
pub mod color;
pub mod constants;
pub mod error;
pub mod event;
pub mod play_by_play;
pub mod shot_chart;

pub use box_score::{
    build_box, build_box_with, roster_for_side, AggregationDiagnostics, BoxScore, BoxScoreOptions, GameBox,
    PlayerBoxRow, TeamTotals,
};
pub use cache::{BoxScoreCache, GameLog};
pub use classify::{CategoryPolicy, ReboundKind, StatCategory, DEFAULT_REBOUND_KIND};
pub use clock::{format_clock, game_second, max_game_second, parse_clock, TimeMode, TimeRange, TimeWindow, Timed};
pub use color::readable_text_color;
pub use constants::{DEFAULT_GAME_SECONDS, HALF_LENGTH, OT_LENGTH};
pub use error::{HoopsError, Result};
pub use event::{events_from_json, shots_from_json, EventKey, PlayByPlayEvent, ShotEvent, ShotMade, Side};
pub use play_by_play::{group_by_period, period_label, running_score, PeriodGroup};
pub use shot_chart::{
    player_options, plot_shots, to_drawing_space, CourtLayout, CourtPoint, PlottedShot, ShotBounds, ShotFilter,
    ShotSummary,
};

#[cfg(feature = "python")]
mod python {
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::box_score::{build_box, roster_for_side, AggregationDiagnostics, BoxScore, PlayerBoxRow, TeamTotals};
    use crate::clock::TimeWindow;
    use crate::constants::{COURT_HEIGHT, COURT_WIDTH, DEFAULT_GAME_SECONDS, HALF_LENGTH, OT_LENGTH};
    use crate::error::HoopsError;
    use crate::event::{events_from_json, shots_from_json, Side};
    use crate::shot_chart::{plot_shots, CourtLayout, ShotBounds, ShotFilter};

    impl From<HoopsError> for PyErr {
        fn from(err: HoopsError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    /// Absolute game second for a period clock, or None without a clock.
    #[pyfunction]
    #[pyo3(signature = (period, seconds_remaining = None))]
    fn py_game_second(period: u32, seconds_remaining: Option<f64>) -> Option<f64> {
        crate::clock::game_second(period, seconds_remaining)
    }

    #[pyfunction]
    fn py_format_clock(sec: f64) -> String {
        crate::clock::format_clock(sec)
    }

    #[pyfunction]
    fn py_parse_clock(text: &str) -> PyResult<f64> {
        Ok(crate::clock::parse_clock(text)?)
    }

    /// Box score for one side from a play-by-play JSON payload.
    #[pyfunction]
    #[pyo3(signature = (events_json, side, start = 0.0, end = DEFAULT_GAME_SECONDS))]
    fn py_box_score_json(events_json: &str, side: &str, start: f64, end: f64) -> PyResult<BoxScore> {
        let events = events_from_json(events_json)?;
        let side: Side = side.parse()?;
        let roster = roster_for_side(&events, side);
        Ok(build_box(&events, side, &roster, TimeWindow::new(start, end)))
    }

    /// `(key, cx, cy, made, side)` tuples for every shot on `side` (all shots when None).
    #[pyfunction]
    #[pyo3(signature = (shots_json, side = None))]
    fn py_shot_points_json(shots_json: &str, side: Option<&str>) -> PyResult<Vec<(String, f64, f64, bool, String)>> {
        let shots = shots_from_json(shots_json)?;
        let filter = ShotFilter {
            side: side.map(str::parse::<Side>).transpose()?,
            ..Default::default()
        };
        let bounds = ShotBounds::from_shots(&shots);
        Ok(plot_shots(&shots, &filter, &bounds, &CourtLayout::default())
            .into_iter()
            .map(|p| (p.key.to_string(), p.cx, p.cy, p.made, p.side.to_string()))
            .collect())
    }

    #[pyfunction]
    fn py_readable_text_color(bg_hex: &str) -> &'static str {
        crate::color::readable_text_color(bg_hex)
    }

    /// Python module definition
    #[pymodule]
    fn hoops_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Classes
        m.add_class::<Side>()?;
        m.add_class::<PlayerBoxRow>()?;
        m.add_class::<TeamTotals>()?;
        m.add_class::<AggregationDiagnostics>()?;
        m.add_class::<BoxScore>()?;

        // Clock functions
        m.add_function(wrap_pyfunction!(py_game_second, m)?)?;
        m.add_function(wrap_pyfunction!(py_format_clock, m)?)?;
        m.add_function(wrap_pyfunction!(py_parse_clock, m)?)?;

        // Aggregation and shot chart
        m.add_function(wrap_pyfunction!(py_box_score_json, m)?)?;
        m.add_function(wrap_pyfunction!(py_shot_points_json, m)?)?;
        m.add_function(wrap_pyfunction!(py_readable_text_color, m)?)?;

        // Constants
        m.add("HALF_LENGTH", HALF_LENGTH)?;
        m.add("OT_LENGTH", OT_LENGTH)?;
        m.add("DEFAULT_GAME_SECONDS", DEFAULT_GAME_SECONDS)?;
        m.add("COURT_WIDTH", COURT_WIDTH)?;
        m.add("COURT_HEIGHT", COURT_HEIGHT)?;

        Ok(())
    }
}
