//! Event classification policy.
//!
//! Each stat category is decided by a fixed, ordered list of field checks:
//! dedicated role fields first, then the free-text `play_type`. Actors
//! resolve the same way: role name, then the generic `player`.

use serde::{Deserialize, Serialize};

use crate::event::{PlayByPlayEvent, ShotMade};

/// Actor name fields an event can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorField {
    Player,
    Shooter,
    Rebounder,
    Assister,
    TurnoverPlayer,
    Blocker,
}

impl ActorField {
    /// Every field scanned when building a side's full-game roster.
    pub const ALL: [ActorField; 6] = [
        ActorField::Player,
        ActorField::Shooter,
        ActorField::Rebounder,
        ActorField::Assister,
        ActorField::TurnoverPlayer,
        ActorField::Blocker,
    ];

    pub fn get(self, e: &PlayByPlayEvent) -> Option<&str> {
        match self {
            ActorField::Player => e.player.as_deref(),
            ActorField::Shooter => e.shooter_name.as_deref(),
            ActorField::Rebounder => e.rebound_player_name.as_deref(),
            ActorField::Assister => e.assist_player_name.as_deref(),
            ActorField::TurnoverPlayer => e.turnover_player_name.as_deref(),
            ActorField::Blocker => e.block_player_name.as_deref(),
        }
    }
}

/// Point value fields, in the order they are trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointField {
    ScoreValue,
    Points,
    PointsScored,
    ShotValue,
}

impl PointField {
    pub const PRIORITY: [PointField; 4] = [
        PointField::ScoreValue,
        PointField::Points,
        PointField::PointsScored,
        PointField::ShotValue,
    ];

    pub fn get(self, e: &PlayByPlayEvent) -> Option<f64> {
        match self {
            PointField::ScoreValue => e.score_value,
            PointField::Points => e.points,
            PointField::PointsScored => e.points_scored,
            PointField::ShotValue => e.shot_value,
        }
    }
}

/// First point value present on the event.
pub fn point_value(e: &PlayByPlayEvent) -> Option<f64> {
    PointField::PRIORITY.iter().find_map(|f| f.get(e))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatCategory {
    Shot,
    Rebound,
    Assist,
    Turnover,
    Block,
}

impl StatCategory {
    /// Order in which categories are tested.
    pub const PRIORITY: [StatCategory; 5] = [
        StatCategory::Shot,
        StatCategory::Rebound,
        StatCategory::Assist,
        StatCategory::Turnover,
        StatCategory::Block,
    ];

    /// Dedicated name field for this category's actor.
    pub fn role_field(self) -> ActorField {
        match self {
            StatCategory::Shot => ActorField::Shooter,
            StatCategory::Rebound => ActorField::Rebounder,
            StatCategory::Assist => ActorField::Assister,
            StatCategory::Turnover => ActorField::TurnoverPlayer,
            StatCategory::Block => ActorField::Blocker,
        }
    }

    /// Substrings of the lower-cased `play_type` that identify the category.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            StatCategory::Shot => &["made", "missed", "jumper", "layup", "dunk", "three", "free_throw"],
            StatCategory::Rebound => &["rebound"],
            StatCategory::Assist => &["assist"],
            StatCategory::Turnover => &["turnover"],
            StatCategory::Block => &["block"],
        }
    }

    /// Whether the event records this kind of action. `play_type` must
    /// already be lower-cased.
    pub fn matches(self, e: &PlayByPlayEvent, play_type: &str) -> bool {
        let dedicated = match self {
            StatCategory::Shot => has_shot_flag(e),
            _ => self.role_field().get(e).is_some(),
        };
        dedicated || self.keywords().iter().any(|k| play_type.contains(k))
    }

    /// Who gets credit: the role field, else the generic player.
    pub fn actor(self, e: &PlayByPlayEvent) -> Option<&str> {
        [self.role_field(), ActorField::Player]
            .into_iter()
            .find_map(|f| f.get(e))
    }
}

/// Dedicated shot markers: a shooting-play flag, a recorded made/missed
/// boolean, or a shot range.
pub fn has_shot_flag(e: &PlayByPlayEvent) -> bool {
    e.shooting_play || e.shot_made.map_or(false, ShotMade::is_flag) || e.shot_range.is_some()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReboundKind {
    Defensive,
    Offensive,
}

/// Kind assumed when `reboundType` is missing or unrecognized.
pub const DEFAULT_REBOUND_KIND: ReboundKind = ReboundKind::Defensive;

/// Read `reboundType`. Returns the kind and whether the default was applied.
pub fn rebound_kind(e: &PlayByPlayEvent) -> (ReboundKind, bool) {
    let raw = e.rebound_type.as_deref().unwrap_or_default().to_uppercase();
    match raw.as_str() {
        "DEF" | "D" => (ReboundKind::Defensive, false),
        "OFF" | "O" => (ReboundKind::Offensive, false),
        _ => (DEFAULT_REBOUND_KIND, true),
    }
}

/// How many categories one event may feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// Only the first matching category in priority order.
    #[default]
    FirstMatch,
    /// Every matching category, e.g. a made shot also credits its assister.
    AllMatches,
}

/// Categories an event feeds under `policy`, in priority order.
pub fn categories_for(e: &PlayByPlayEvent, policy: CategoryPolicy) -> Vec<StatCategory> {
    let play_type = e.play_type_lower();
    let matching = StatCategory::PRIORITY
        .into_iter()
        .filter(|c| c.matches(e, &play_type));
    match policy {
        CategoryPolicy::FirstMatch => matching.take(1).collect(),
        CategoryPolicy::AllMatches => matching.collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> PlayByPlayEvent {
        PlayByPlayEvent { period: 1, seconds_remaining: Some(600.0), ..Default::default() }
    }

    #[test]
    fn test_shot_detected_by_flags() {
        let mut e = event();
        e.shot_made = Some(ShotMade::Flag(false));
        assert!(has_shot_flag(&e));

        let mut e = event();
        e.shot_made = Some(ShotMade::Loose(true));
        assert!(!has_shot_flag(&e));

        let mut e = event();
        e.shot_range = Some("rim".to_string());
        assert!(has_shot_flag(&e));

        let mut e = event();
        e.shooting_play = true;
        assert!(has_shot_flag(&e));

        assert!(!has_shot_flag(&event()));
    }

    #[test]
    fn test_shot_detected_by_play_type() {
        for text in ["JumpShot Made", "Layup", "Dunk Shot", "ThreePointJumper", "free_throw"] {
            let mut e = event();
            e.play_type = Some(text.to_string());
            assert_eq!(categories_for(&e, CategoryPolicy::FirstMatch), vec![StatCategory::Shot], "{}", text);
        }
    }

    #[test]
    fn test_priority_order() {
        let mut e = event();
        e.play_type = Some("Offensive Rebound".to_string());
        e.assist_player_name = Some("B".to_string());
        assert_eq!(categories_for(&e, CategoryPolicy::FirstMatch), vec![StatCategory::Rebound]);
        assert_eq!(
            categories_for(&e, CategoryPolicy::AllMatches),
            vec![StatCategory::Rebound, StatCategory::Assist]
        );
    }

    #[test]
    fn test_actor_fallback() {
        let mut e = event();
        e.player = Some("Generic".to_string());
        assert_eq!(StatCategory::Turnover.actor(&e), Some("Generic"));
        e.turnover_player_name = Some("Specific".to_string());
        assert_eq!(StatCategory::Turnover.actor(&e), Some("Specific"));
        assert_eq!(StatCategory::Block.actor(&event()), None);
    }

    #[test]
    fn test_rebound_kind() {
        let mut e = event();
        for (raw, kind, defaulted) in [
            ("DEF", ReboundKind::Defensive, false),
            ("d", ReboundKind::Defensive, false),
            ("off", ReboundKind::Offensive, false),
            ("O", ReboundKind::Offensive, false),
            ("deadball", ReboundKind::Defensive, true),
        ] {
            e.rebound_type = Some(raw.to_string());
            assert_eq!(rebound_kind(&e), (kind, defaulted), "{}", raw);
        }
        e.rebound_type = None;
        assert_eq!(rebound_kind(&e), (DEFAULT_REBOUND_KIND, true));
    }

    #[test]
    fn test_point_value_priority() {
        let mut e = event();
        assert_eq!(point_value(&e), None);
        e.shot_value = Some(3.0);
        e.points = Some(2.0);
        assert_eq!(point_value(&e), Some(2.0));
        e.score_value = Some(0.0);
        assert_eq!(point_value(&e), Some(0.0), "a present zero still wins");
    }

    #[test]
    fn test_no_category() {
        let mut e = event();
        e.play_type = Some("Foul".to_string());
        e.player = Some("A".to_string());
        assert!(categories_for(&e, CategoryPolicy::AllMatches).is_empty());
    }
}
