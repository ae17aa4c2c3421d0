//! Windowed box scores built from play-by-play.
//!
//! Rows are seeded from the full-game roster so every player who appears at
//! any point is listed, then filled from the events inside the window.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::classify::{categories_for, point_value, rebound_kind, ActorField, CategoryPolicy, ReboundKind, StatCategory};
use crate::clock::{TimeWindow, Timed};
use crate::event::{PlayByPlayEvent, ShotMade, Side};

/// One player's line for a side and time window.
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerBoxRow {
    pub name: String,

    /// Not derivable from play-by-play; left empty by the aggregator
    pub minutes: Option<f64>,

    pub fieldgoals_made: u32,
    pub fieldgoals_attempted: u32,
    pub points: u32,
    pub rebounds_defensive: u32,
    pub rebounds_offensive: u32,
    pub assists: u32,
    pub turnovers: u32,
    pub blocks: u32,
}

impl PlayerBoxRow {
    pub fn new(name: &str) -> Self {
        PlayerBoxRow {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn rebounds(&self) -> u32 {
        self.rebounds_defensive.saturating_add(self.rebounds_offensive)
    }
}

/// Sums over every row of one side.
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTotals {
    pub fg_made: u32,
    pub fg_att: u32,
    pub points: u32,
    pub dreb: u32,
    pub oreb: u32,
    pub ast: u32,
    pub tov: u32,
    pub blk: u32,
}

impl TeamTotals {
    /// Saturates at `u32::MAX` instead of overflowing.
    pub fn from_rows(rows: &[PlayerBoxRow]) -> Self {
        rows.iter().fold(TeamTotals::default(), |mut acc, p| {
            acc.fg_made = acc.fg_made.saturating_add(p.fieldgoals_made);
            acc.fg_att = acc.fg_att.saturating_add(p.fieldgoals_attempted);
            acc.points = acc.points.saturating_add(p.points);
            acc.dreb = acc.dreb.saturating_add(p.rebounds_defensive);
            acc.oreb = acc.oreb.saturating_add(p.rebounds_offensive);
            acc.ast = acc.ast.saturating_add(p.assists);
            acc.tov = acc.tov.saturating_add(p.turnovers);
            acc.blk = acc.blk.saturating_add(p.blocks);
            acc
        })
    }

    pub fn rebounds(&self) -> u32 {
        self.dreb.saturating_add(self.oreb)
    }

    /// Field goal percentage (0-100), `None` without attempts.
    pub fn field_goal_pct(&self) -> Option<f64> {
        if self.fg_att == 0 {
            None
        } else {
            Some(self.fg_made as f64 / self.fg_att as f64 * 100.0)
        }
    }
}

/// Counts of events the tolerant classifier had to skip or guess about.
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationDiagnostics {
    /// Side-matching events without a usable clock
    pub skipped_untimed: u32,
    /// Classified events whose actor name could not be resolved
    pub unresolved_actor: u32,
    /// Rebounds credited as defensive because `reboundType` was missing or unknown
    pub default_rebound_type: u32,
    /// Made shots with no point value field
    pub made_without_value: u32,
}

#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxScore {
    pub side: Side,
    pub players: Vec<PlayerBoxRow>,
    pub totals: TeamTotals,
    pub diagnostics: AggregationDiagnostics,
}

/// Aggregation settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScoreOptions {
    #[serde(default)]
    pub policy: CategoryPolicy,
}

/// Every actor named anywhere in the full event list for `side`, sorted.
///
/// Names are compared exactly (case-sensitive).
pub fn roster_for_side(events: &[PlayByPlayEvent], side: Side) -> Vec<String> {
    let names: BTreeSet<&str> = events
        .iter()
        .filter(|e| e.is_side(side))
        .flat_map(|e| ActorField::ALL.iter().filter_map(move |f| f.get(e)))
        .collect();
    names.into_iter().map(str::to_string).collect()
}

/// Build one side's box score for `window` with default options.
pub fn build_box(events: &[PlayByPlayEvent], side: Side, all_known_players: &[String], window: TimeWindow) -> BoxScore {
    build_box_with(events, side, all_known_players, window, &BoxScoreOptions::default())
}

/// Build one side's box score for `window`.
///
/// Every name in `all_known_players` gets a row even with nothing in the
/// window. Rows come back sorted by points, highest first; ties keep roster
/// order. Malformed events are skipped, never errors.
pub fn build_box_with(
    events: &[PlayByPlayEvent],
    side: Side,
    all_known_players: &[String],
    window: TimeWindow,
    options: &BoxScoreOptions,
) -> BoxScore {
    let mut table = RowTable::seeded(all_known_players);
    let mut diagnostics = AggregationDiagnostics::default();

    for (ordinal, e) in events.iter().enumerate() {
        if !e.is_side(side) {
            continue;
        }
        let Some(gs) = e.game_second() else {
            tracing::trace!(ordinal, period = e.period, "skipping event without a game clock");
            diagnostics.skipped_untimed += 1;
            continue;
        };
        if !window.contains(gs) {
            continue;
        }

        for category in categories_for(e, options.policy) {
            let Some(name) = category.actor(e) else {
                diagnostics.unresolved_actor += 1;
                continue;
            };
            let row = table.row(name);
            match category {
                StatCategory::Shot => {
                    row.fieldgoals_attempted += 1;
                    if e.shot_made.map_or(false, ShotMade::made) {
                        row.fieldgoals_made += 1;
                        match point_value(e) {
                            Some(points) => row.points = row.points.saturating_add(whole_points(points)),
                            None => {
                                tracing::warn!(
                                    ordinal,
                                    player = name,
                                    period = e.period,
                                    "made shot has no point value, crediting 0"
                                );
                                diagnostics.made_without_value += 1;
                            }
                        }
                    }
                }
                StatCategory::Rebound => {
                    let (kind, defaulted) = rebound_kind(e);
                    if defaulted {
                        tracing::debug!(ordinal, player = name, raw = ?e.rebound_type, "rebound type defaulted");
                        diagnostics.default_rebound_type += 1;
                    }
                    match kind {
                        ReboundKind::Defensive => row.rebounds_defensive += 1,
                        ReboundKind::Offensive => row.rebounds_offensive += 1,
                    }
                }
                StatCategory::Assist => row.assists += 1,
                StatCategory::Turnover => row.turnovers += 1,
                StatCategory::Block => row.blocks += 1,
            }
        }
    }

    let mut players = table.into_rows();
    // stable: equal points keep seed order
    players.sort_by(|a, b| b.points.cmp(&a.points));
    let totals = TeamTotals::from_rows(&players);

    tracing::debug!(
        side = %side,
        start = window.start,
        end = window.end,
        players = players.len(),
        points = totals.points,
        skipped_untimed = diagnostics.skipped_untimed,
        unresolved_actor = diagnostics.unresolved_actor,
        default_rebound_type = diagnostics.default_rebound_type,
        made_without_value = diagnostics.made_without_value,
        "built box score"
    );

    BoxScore {
        side,
        players,
        totals,
        diagnostics,
    }
}

/// Both teams' box scores for one window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameBox {
    pub home: BoxScore,
    pub away: BoxScore,
}

impl GameBox {
    /// Rosters and boxes for both sides, built in parallel.
    pub fn build(events: &[PlayByPlayEvent], window: TimeWindow, options: &BoxScoreOptions) -> Self {
        let side_box = |side: Side| {
            let roster = roster_for_side(events, side);
            build_box_with(events, side, &roster, window, options)
        };
        let (home, away) = rayon::join(|| side_box(Side::Home), || side_box(Side::Away));
        GameBox { home, away }
    }

    pub fn side(&self, side: Side) -> &BoxScore {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

/// Point values arrive as floats; rows count whole points.
fn whole_points(points: f64) -> u32 {
    if points.is_finite() && points > 0.0 {
        points.round() as u32
    } else {
        0
    }
}

/// Rows in insertion order with name lookup.
struct RowTable {
    rows: Vec<PlayerBoxRow>,
    index: HashMap<String, usize>,
}

impl RowTable {
    fn seeded(names: &[String]) -> Self {
        let mut table = RowTable {
            rows: Vec::with_capacity(names.len()),
            index: HashMap::with_capacity(names.len()),
        };
        for name in names {
            table.row(name);
        }
        table
    }

    /// Existing row for `name`, or a fresh zero row appended at the end.
    fn row(&mut self, name: &str) -> &mut PlayerBoxRow {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.rows.push(PlayerBoxRow::new(name));
                self.index.insert(name.to_string(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        &mut self.rows[idx]
    }

    fn into_rows(self) -> Vec<PlayerBoxRow> {
        self.rows
    }
}
