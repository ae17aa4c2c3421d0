//! Play-by-play and shot records as delivered by the analytics API.
//!
//! Upstream payloads are heterogeneous: the same field shows up in camelCase
//! or snake_case, numbers arrive as strings, and empty strings stand in for
//! missing names. Decoding folds all of that into one typed shape so the rest
//! of the crate never looks at raw JSON.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{HoopsError, Result};

/// Which of the two teams an event or aggregation belongs to.
#[cfg_attr(feature = "python", pyclass(eq, eq_int))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn from_is_home(is_home: bool) -> Self {
        if is_home {
            Side::Home
        } else {
            Side::Away
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = HoopsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Side::Home),
            "away" => Ok(Side::Away),
            _ => Err(HoopsError::InvalidSide(s.to_string())),
        }
    }
}

/// Synthetic identity of an event inside its source list.
///
/// Events carry no id, so the key is built from the clock plus the event's
/// ordinal position in the list it was loaded from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EventKey {
    pub period: u32,
    pub seconds_remaining: Option<f64>,
    pub ordinal: usize,
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seconds_remaining {
            Some(secs) => write!(f, "{}-{}-{}", self.period, secs, self.ordinal),
            None => write!(f, "{}--{}", self.period, self.ordinal),
        }
    }
}

/// How a `shotMade` value arrived.
///
/// Only a real JSON boolean marks an event as a shot by itself, but any
/// non-null value still says whether the shot went in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ShotMade {
    Flag(bool),
    Loose(bool),
}

impl ShotMade {
    pub fn made(self) -> bool {
        match self {
            ShotMade::Flag(b) | ShotMade::Loose(b) => b,
        }
    }

    pub fn is_flag(self) -> bool {
        matches!(self, ShotMade::Flag(_))
    }
}

impl From<bool> for ShotMade {
    fn from(made: bool) -> Self {
        ShotMade::Flag(made)
    }
}

/// One logged play-by-play action.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PlayByPlayEvent {
    #[serde(default = "first_period", deserialize_with = "lenient_period")]
    pub period: u32,

    #[serde(rename = "secondsRemaining", default, deserialize_with = "lenient_f64")]
    pub seconds_remaining: Option<f64>,

    #[serde(rename = "isHomeTeam", default, deserialize_with = "truthy")]
    pub is_home_team: bool,

    #[serde(default, deserialize_with = "non_empty_name")]
    pub player: Option<String>,

    #[serde(rename = "shooterName", default, deserialize_with = "non_empty_name")]
    pub shooter_name: Option<String>,

    #[serde(rename = "reboundPlayerName", default, deserialize_with = "non_empty_name")]
    pub rebound_player_name: Option<String>,

    #[serde(rename = "assistPlayerName", default, deserialize_with = "non_empty_name")]
    pub assist_player_name: Option<String>,

    #[serde(rename = "turnoverPlayerName", default, deserialize_with = "non_empty_name")]
    pub turnover_player_name: Option<String>,

    #[serde(rename = "blockPlayerName", default, deserialize_with = "non_empty_name")]
    pub block_player_name: Option<String>,

    #[serde(rename = "shotMade", default, deserialize_with = "shot_made_value")]
    pub shot_made: Option<ShotMade>,

    #[serde(rename = "shootingPlay", default, deserialize_with = "truthy")]
    pub shooting_play: bool,

    #[serde(rename = "shotRange", default, deserialize_with = "non_empty_name")]
    pub shot_range: Option<String>,

    /// Point fields: present but unreadable values coerce to 0.
    #[serde(rename = "scoreValue", default, deserialize_with = "coerced_points")]
    pub score_value: Option<f64>,

    #[serde(default, deserialize_with = "coerced_points")]
    pub points: Option<f64>,

    #[serde(rename = "points_scored", default, deserialize_with = "coerced_points")]
    pub points_scored: Option<f64>,

    #[serde(rename = "shotValue", default, deserialize_with = "coerced_points")]
    pub shot_value: Option<f64>,

    #[serde(rename = "reboundType", default, deserialize_with = "non_empty_name")]
    pub rebound_type: Option<String>,

    #[serde(rename = "play_type", default, deserialize_with = "non_empty_name")]
    pub play_type: Option<String>,

    #[serde(rename = "playText", default, deserialize_with = "non_empty_name")]
    pub play_text: Option<String>,

    #[serde(default, deserialize_with = "non_empty_name")]
    pub clock: Option<String>,

    #[serde(rename = "homeScore", default, deserialize_with = "lenient_f64")]
    pub home_score: Option<f64>,

    #[serde(rename = "awayScore", default, deserialize_with = "lenient_f64")]
    pub away_score: Option<f64>,
}

impl PlayByPlayEvent {
    pub fn side(&self) -> Side {
        Side::from_is_home(self.is_home_team)
    }

    /// Lower-cased free-text play type, empty when absent.
    pub fn play_type_lower(&self) -> String {
        self.play_type.as_deref().unwrap_or_default().to_lowercase()
    }

    /// Whether the event's side matches `side`.
    pub fn is_side(&self, side: Side) -> bool {
        self.side() == side
    }
}

/// One shot attempt with raw court coordinates.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ShotEvent {
    #[serde(default = "first_period", deserialize_with = "lenient_period")]
    pub period: u32,

    #[serde(rename = "secondsRemaining", default, deserialize_with = "lenient_f64")]
    pub seconds_remaining: Option<f64>,

    #[serde(rename = "isHomeTeam", default, deserialize_with = "truthy")]
    pub is_home_team: bool,

    #[serde(rename = "shooterName", default, deserialize_with = "non_empty_name")]
    pub shooter_name: Option<String>,

    #[serde(rename = "shotMade", default, deserialize_with = "truthy")]
    pub shot_made: bool,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub x: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub y: Option<f64>,
}

impl ShotEvent {
    pub fn side(&self) -> Side {
        Side::from_is_home(self.is_home_team)
    }

    pub fn shooter(&self) -> &str {
        self.shooter_name
            .as_deref()
            .unwrap_or(crate::constants::UNKNOWN_SHOOTER)
    }
}

/// Alternate spellings seen upstream, as `(field, synonym)`.
///
/// The first spelling wins; the synonym is only read when the first is
/// missing, null or an empty string.
const SYNONYMS: &[(&str, &str)] = &[
    ("secondsRemaining", "seconds_remaining"),
    ("isHomeTeam", "is_home_team"),
    ("shooterName", "shooter_name"),
    ("reboundPlayerName", "rebound_player_name"),
    ("assistPlayerName", "assist_player_name"),
    ("turnoverPlayerName", "turnover_player_name"),
    ("blockPlayerName", "block_player_name"),
    ("shotMade", "shot_made"),
    ("shootingPlay", "shooting_play"),
    ("shotRange", "shot_range"),
    ("scoreValue", "score_value"),
    ("points_scored", "pointsScored"),
    ("shotValue", "shot_value"),
    ("reboundType", "rebound_type"),
    ("play_type", "playType"),
    ("playText", "play_text"),
    ("homeScore", "home_score"),
    ("awayScore", "away_score"),
];

/// Decode a play-by-play payload.
///
/// The payload must be a JSON array. Synonym spellings are merged before
/// decoding, so a record may carry both. Elements that are not objects are
/// dropped with a debug log rather than failing the whole game.
pub fn events_from_json(json: &str) -> Result<Vec<PlayByPlayEvent>> {
    decode_list(json, "play-by-play")
}

/// Decode a shot payload; same tolerance rules as [`events_from_json`].
pub fn shots_from_json(json: &str) -> Result<Vec<ShotEvent>> {
    decode_list(json, "shot")
}

fn decode_list<T: for<'de> Deserialize<'de>>(json: &str, what: &str) -> Result<Vec<T>> {
    let raw: Vec<Value> = serde_json::from_str(json)?;
    let total = raw.len();
    let items: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(ordinal, value)| match serde_json::from_value(fold_synonyms(value)) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!(ordinal, error = %e, "dropping undecodable {} record", what);
                None
            }
        })
        .collect();
    if items.len() < total {
        tracing::debug!(kept = items.len(), total, "decoded {} records", what);
    }
    Ok(items)
}

fn fold_synonyms(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        for &(field, synonym) in SYNONYMS {
            let Some(alt) = map.remove(synonym) else {
                continue;
            };
            let blank = match map.get(field) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            };
            if blank {
                map.insert(field.to_string(), alt);
            }
        }
    }
    value
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

fn first_period() -> u32 {
    1
}

/// Number or numeric string; anything else is treated as absent.
pub(crate) fn value_to_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

/// Periods are positive integers; unreadable values fall back to the first half.
fn lenient_period<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let period = value
        .as_ref()
        .and_then(value_to_f64)
        .filter(|p| p.fract() == 0.0 && *p >= 1.0 && *p <= u32::MAX as f64)
        .map(|p| p as u32);
    Ok(period.unwrap_or(1))
}

fn truthy<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().map_or(false, value_is_truthy))
}

fn shot_made_value<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<ShotMade>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(ShotMade::Flag(b)),
        Some(other) => Some(ShotMade::Loose(value_is_truthy(&other))),
    })
}

/// Null means absent. Anything else counts as present: numbers and numeric
/// strings keep their value, booleans read as 1 or 0, the rest as 0.
fn coerced_points<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(if b { 1.0 } else { 0.0 }),
        Some(other) => Some(value_to_f64(&other).unwrap_or(0.0)),
    })
}

fn non_empty_name<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}
