//! Shot chart geometry and filtering.
//!
//! Raw shot coordinates come in whatever units the upstream source uses and
//! cover the full court. They are rescaled onto a fixed half-court drawing
//! surface with the hoop at the bottom. Shots near either basket are mirrored
//! onto the single drawn hoop by their distance to the nearer end.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::clock::TimeWindow;
use crate::constants::{BOT_PAD, COURT_HEIGHT, COURT_WIDTH, FALLBACK_SHOT_BOUNDS, H_PAD, TOP_PAD};
use crate::event::{EventKey, ShotEvent, Side};

/// Logical drawing surface for a half court.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtLayout {
    pub width: f64,
    pub height: f64,
    pub h_pad: f64,
    pub top_pad: f64,
    pub bot_pad: f64,
}

impl Default for CourtLayout {
    fn default() -> Self {
        CourtLayout {
            width: COURT_WIDTH,
            height: COURT_HEIGHT,
            h_pad: H_PAD,
            top_pad: TOP_PAD,
            bot_pad: BOT_PAD,
        }
    }
}

impl CourtLayout {
    /// Where the hoop is drawn.
    pub fn hoop(&self) -> CourtPoint {
        CourtPoint {
            cx: self.width / 2.0,
            cy: self.height - self.bot_pad,
        }
    }
}

/// Observed extent of the raw coordinates for one game's shots.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShotBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for ShotBounds {
    fn default() -> Self {
        let [min_x, max_x, min_y, max_y] = FALLBACK_SHOT_BOUNDS;
        ShotBounds { min_x, max_x, min_y, max_y }
    }
}

impl ShotBounds {
    /// Bounds over every shot with both coordinates present.
    ///
    /// Recompute whenever the shot list changes. A list with no usable
    /// coordinates gets the fallback bounds; a flat `y` range widens to
    /// `[0, 1]` so it can still be divided by.
    pub fn from_shots(shots: &[ShotEvent]) -> Self {
        let mut coords = shots.iter().filter_map(|s| match (s.x, s.y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        });
        let Some((x0, y0)) = coords.next() else {
            return ShotBounds::default();
        };
        let mut b = coords.fold(
            ShotBounds { min_x: x0, max_x: x0, min_y: y0, max_y: y0 },
            |b, (x, y)| ShotBounds {
                min_x: b.min_x.min(x),
                max_x: b.max_x.max(x),
                min_y: b.min_y.min(y),
                max_y: b.max_y.max(y),
            },
        );
        if b.min_y == b.max_y {
            b.min_y = 0.0;
            b.max_y = 1.0;
        }
        b
    }

    /// Half the raw court length; 1 for a degenerate range.
    pub fn half_length(&self) -> f64 {
        let half = (self.max_x - self.min_x) / 2.0;
        if half == 0.0 || !half.is_finite() {
            1.0
        } else {
            half
        }
    }

    /// Distance from raw `x` to the nearer basket, capped at half court.
    pub fn hoop_distance(&self, x: f64) -> f64 {
        let half = self.half_length();
        let from_min = (x - self.min_x).clamp(0.0, half);
        let from_max = (self.max_x - x).clamp(0.0, half);
        from_min.min(from_max)
    }
}

/// Position on the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourtPoint {
    pub cx: f64,
    pub cy: f64,
}

/// Project a shot onto the drawing surface.
///
/// Raw `y` runs sideline to sideline and becomes `cx`. Raw `x` runs along
/// the court and becomes the distance up from the hoop. A missing coordinate
/// pins that axis to mid-court width or to the hoop line.
pub fn to_drawing_space(shot: &ShotEvent, bounds: &ShotBounds, layout: &CourtLayout) -> CourtPoint {
    let cx = match shot.y {
        Some(y) => {
            let t = ((y - bounds.min_y) / (bounds.max_y - bounds.min_y)).clamp(0.0, 1.0);
            layout.h_pad + t * (layout.width - 2.0 * layout.h_pad)
        }
        None => layout.width / 2.0,
    };
    let cy = match shot.x {
        Some(x) => {
            let t = (bounds.hoop_distance(x) / bounds.half_length()).clamp(0.0, 1.0);
            let usable = layout.height - layout.top_pad - layout.bot_pad;
            layout.height - layout.bot_pad - t * usable
        }
        None => layout.height - layout.bot_pad,
    };
    CourtPoint { cx, cy }
}

/// Filters applied to a shot list, in this order: side, shooter, time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotFilter {
    pub side: Option<Side>,
    /// Shooter label as shown in the picker ("Unknown" for unnamed shots)
    pub player: Option<String>,
    /// No window means the whole game, including shots without a clock
    pub window: Option<TimeWindow>,
}

impl ShotFilter {
    pub fn for_side(side: Side) -> Self {
        ShotFilter {
            side: Some(side),
            ..Default::default()
        }
    }

    pub fn accepts(&self, shot: &ShotEvent) -> bool {
        if self.side.map_or(false, |side| shot.side() != side) {
            return false;
        }
        if let Some(player) = &self.player {
            if shot.shooter() != player {
                return false;
            }
        }
        match &self.window {
            Some(window) => window.covers(shot),
            None => true,
        }
    }

    /// Accepted shots with their ordinal in the source list.
    pub fn apply<'a>(&'a self, shots: &'a [ShotEvent]) -> impl Iterator<Item = (usize, &'a ShotEvent)> + 'a {
        shots.iter().enumerate().filter(move |(_, s)| self.accepts(s))
    }
}

/// Sorted shooter labels for the player picker.
pub fn player_options(shots: &[ShotEvent], side: Option<Side>) -> Vec<String> {
    let names: BTreeSet<&str> = shots
        .iter()
        .filter(|s| side.map_or(true, |side| s.side() == side))
        .map(ShotEvent::shooter)
        .collect();
    names.into_iter().map(str::to_string).collect()
}

/// A shot ready to draw: a circle when made, an X when missed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlottedShot {
    pub key: EventKey,
    pub cx: f64,
    pub cy: f64,
    pub made: bool,
    pub side: Side,
}

/// Filter and project a game's shots.
pub fn plot_shots(shots: &[ShotEvent], filter: &ShotFilter, bounds: &ShotBounds, layout: &CourtLayout) -> Vec<PlottedShot> {
    filter
        .apply(shots)
        .filter_map(|(ordinal, shot)| {
            let CourtPoint { cx, cy } = to_drawing_space(shot, bounds, layout);
            if !cx.is_finite() || !cy.is_finite() {
                return None;
            }
            Some(PlottedShot {
                key: EventKey {
                    period: shot.period,
                    seconds_remaining: shot.seconds_remaining,
                    ordinal,
                },
                cx,
                cy,
                made: shot.shot_made,
                side: shot.side(),
            })
        })
        .collect()
}

/// Made/attempted counts for the current filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotSummary {
    pub made: u32,
    pub attempts: u32,
    pub home_made: u32,
    pub home_attempts: u32,
    pub away_made: u32,
    pub away_attempts: u32,
}

impl ShotSummary {
    pub fn from_shots<'a, I: IntoIterator<Item = &'a ShotEvent>>(shots: I) -> Self {
        shots.into_iter().fold(ShotSummary::default(), |mut acc, s| {
            let made = u32::from(s.shot_made);
            acc.attempts += 1;
            acc.made += made;
            match s.side() {
                Side::Home => {
                    acc.home_attempts += 1;
                    acc.home_made += made;
                }
                Side::Away => {
                    acc.away_attempts += 1;
                    acc.away_made += made;
                }
            }
            acc
        })
    }

    /// Percentage (0-100), `None` without attempts.
    pub fn pct(&self) -> Option<f64> {
        if self.attempts == 0 {
            None
        } else {
            Some(self.made as f64 / self.attempts as f64 * 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(x: f64, y: f64) -> ShotEvent {
        ShotEvent {
            period: 1,
            seconds_remaining: Some(600.0),
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    fn bounds_0_100() -> ShotBounds {
        ShotBounds { min_x: 0.0, max_x: 100.0, min_y: 0.0, max_y: 50.0 }
    }

    #[test]
    fn test_mirrored_baskets_share_depth() {
        let layout = CourtLayout::default();
        let b = bounds_0_100();
        let near_a = to_drawing_space(&at(10.0, 25.0), &b, &layout);
        let near_b = to_drawing_space(&at(90.0, 25.0), &b, &layout);
        assert!((near_a.cy - near_b.cy).abs() < 1e-12);
        assert!((near_a.cx - near_b.cx).abs() < 1e-12);
    }

    #[test]
    fn test_hoop_and_half_court_lines() {
        let layout = CourtLayout::default();
        let b = bounds_0_100();
        let at_rim = to_drawing_space(&at(0.0, 25.0), &b, &layout);
        assert_eq!(at_rim.cy, 45.0);
        let at_mid = to_drawing_space(&at(50.0, 25.0), &b, &layout);
        assert_eq!(at_mid.cy, 2.0);
        assert_eq!(at_mid.cx, 25.0);
    }

    #[test]
    fn test_sideline_scaling() {
        let layout = CourtLayout::default();
        let b = bounds_0_100();
        assert_eq!(to_drawing_space(&at(10.0, 0.0), &b, &layout).cx, 3.0);
        assert_eq!(to_drawing_space(&at(10.0, 50.0), &b, &layout).cx, 47.0);
        // outside the observed range clamps to the padding
        assert_eq!(to_drawing_space(&at(10.0, 80.0), &b, &layout).cx, 47.0);
    }

    #[test]
    fn test_missing_coordinates() {
        let layout = CourtLayout::default();
        let shot = ShotEvent::default();
        let p = to_drawing_space(&shot, &bounds_0_100(), &layout);
        assert_eq!(p, CourtPoint { cx: 25.0, cy: 45.0 });
        assert_eq!(layout.hoop(), p);
    }

    #[test]
    fn test_bounds_from_shots() {
        let shots = vec![at(5.0, 10.0), at(88.0, 40.0), ShotEvent { x: Some(500.0), ..Default::default() }];
        let b = ShotBounds::from_shots(&shots);
        assert_eq!(b, ShotBounds { min_x: 5.0, max_x: 88.0, min_y: 10.0, max_y: 40.0 });
    }

    #[test]
    fn test_bounds_degenerate_cases() {
        assert_eq!(ShotBounds::from_shots(&[]), ShotBounds::default());

        let flat = ShotBounds::from_shots(&[at(1.0, 7.0), at(9.0, 7.0)]);
        assert_eq!((flat.min_y, flat.max_y), (0.0, 1.0));

        let single = ShotBounds::from_shots(&[at(4.0, 2.0)]);
        assert_eq!(single.half_length(), 1.0);
        let p = to_drawing_space(&at(4.0, 2.0), &single, &CourtLayout::default());
        assert!(p.cx.is_finite() && p.cy.is_finite());
    }

    #[test]
    fn test_filter_order_and_keys() {
        let mut shots = vec![at(10.0, 10.0), at(20.0, 20.0), at(30.0, 30.0)];
        shots[0].is_home_team = true;
        shots[0].shooter_name = Some("Hunter".to_string());
        shots[1].is_home_team = true;
        shots[2].shooter_name = Some("Avery".to_string());

        let filter = ShotFilter {
            side: Some(Side::Home),
            player: Some("Unknown".to_string()),
            window: None,
        };
        let plotted = plot_shots(&shots, &filter, &ShotBounds::from_shots(&shots), &CourtLayout::default());
        assert_eq!(plotted.len(), 1);
        assert_eq!(plotted[0].key.ordinal, 1, "keys index the source list");
        assert_eq!(plotted[0].key.to_string(), "1-600-1");
    }

    #[test]
    fn test_time_filter_drops_untimed() {
        let mut shots = vec![at(1.0, 1.0), at(2.0, 2.0)];
        shots[1].seconds_remaining = None;

        let everything = ShotFilter::default();
        assert_eq!(everything.apply(&shots).count(), 2);

        let first_half = ShotFilter {
            window: Some(TimeWindow::first_half(2400.0)),
            ..Default::default()
        };
        let kept: Vec<usize> = first_half.apply(&shots).map(|(i, _)| i).collect();
        assert_eq!(kept, vec![0]);

        let second_half = ShotFilter {
            window: Some(TimeWindow::new(1201.0, 2400.0)),
            ..Default::default()
        };
        assert_eq!(second_half.apply(&shots).count(), 0);
    }

    #[test]
    fn test_player_options() {
        let mut shots = vec![at(1.0, 1.0), at(2.0, 2.0), at(3.0, 3.0)];
        shots[0].shooter_name = Some("Zoe".to_string());
        shots[1].shooter_name = Some("Ann".to_string());
        shots[2].is_home_team = true;
        assert_eq!(player_options(&shots, Some(Side::Away)), vec!["Ann", "Zoe"]);
        assert_eq!(player_options(&shots, Some(Side::Home)), vec!["Unknown"]);
        assert_eq!(player_options(&shots, None).len(), 3);
    }

    #[test]
    fn test_summary() {
        let mut shots = vec![at(1.0, 1.0), at(2.0, 2.0), at(3.0, 3.0)];
        shots[0].shot_made = true;
        shots[0].is_home_team = true;
        shots[1].is_home_team = true;
        shots[2].shot_made = true;
        let s = ShotSummary::from_shots(&shots);
        assert_eq!((s.made, s.attempts), (2, 3));
        assert_eq!((s.home_made, s.home_attempts), (1, 2));
        assert_eq!((s.away_made, s.away_attempts), (1, 1));
        assert!((s.pct().unwrap() - 66.666).abs() < 0.01);
        assert_eq!(ShotSummary::default().pct(), None);
    }

    proptest! {
        #[test]
        fn prop_mirror_symmetry(min in -50.0..50.0f64, len in 1.0..200.0f64, d in 0.0..1.0f64, y in 0.0..50.0f64) {
            let b = ShotBounds { min_x: min, max_x: min + len, min_y: 0.0, max_y: 50.0 };
            let offset = d * len / 2.0;
            let layout = CourtLayout::default();
            let a = to_drawing_space(&at(b.min_x + offset, y), &b, &layout);
            let m = to_drawing_space(&at(b.max_x - offset, y), &b, &layout);
            prop_assert!((a.cy - m.cy).abs() < 1e-9);
        }

        #[test]
        fn prop_points_stay_on_surface(x in -500.0..500.0f64, y in -500.0..500.0f64) {
            let layout = CourtLayout::default();
            let p = to_drawing_space(&at(x, y), &bounds_0_100(), &layout);
            prop_assert!(p.cx >= layout.h_pad && p.cx <= layout.width - layout.h_pad);
            prop_assert!(p.cy >= layout.top_pad && p.cy <= layout.height - layout.bot_pad);
        }
    }
}
