//! Play-by-play feed grouped by period for display.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::event::{EventKey, PlayByPlayEvent};

/// Events of one period in source order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PeriodGroup<'a> {
    pub period: u32,
    pub label: String,
    pub events: Vec<(EventKey, &'a PlayByPlayEvent)>,
}

/// Display name for a period.
pub fn period_label(period: u32) -> String {
    match period {
        1 => "1st Half".to_string(),
        2 => "2nd Half".to_string(),
        3 => "OT".to_string(),
        4 => "2OT".to_string(),
        p => format!("Period {}", p),
    }
}

/// Group events by period, periods ascending. Keys index the full list.
pub fn group_by_period(events: &[PlayByPlayEvent]) -> Vec<PeriodGroup<'_>> {
    let mut by_period: BTreeMap<u32, Vec<(EventKey, &PlayByPlayEvent)>> = BTreeMap::new();
    for (ordinal, e) in events.iter().enumerate() {
        let key = EventKey {
            period: e.period,
            seconds_remaining: e.seconds_remaining,
            ordinal,
        };
        by_period.entry(e.period).or_default().push((key, e));
    }
    by_period
        .into_iter()
        .map(|(period, events)| PeriodGroup {
            period,
            label: period_label(period),
            events,
        })
        .collect()
}

/// `(away, home)` score after the event, when both are known.
pub fn running_score(e: &PlayByPlayEvent) -> Option<(f64, f64)> {
    Some((e.away_score?, e.home_score?))
}
