//! Versioned event log and the memoized box scores built from it.

use std::collections::{HashMap, VecDeque};

use crate::box_score::{build_box_with, roster_for_side, BoxScore, BoxScoreOptions};
use crate::clock::TimeWindow;
use crate::constants::BOX_CACHE_CAPACITY;
use crate::event::{EventKey, PlayByPlayEvent, Side};

/// A game's play-by-play list plus a version that changes whenever the list
/// is replaced.
///
/// Positions in the list are the arena indices behind [`EventKey`].
#[derive(Clone, Debug, Default)]
pub struct GameLog {
    events: Vec<PlayByPlayEvent>,
    version: u64,
}

impl GameLog {
    pub fn new(events: Vec<PlayByPlayEvent>) -> Self {
        GameLog { events, version: 0 }
    }

    /// Swap in a fresh list (e.g. a new fetch finished).
    pub fn replace(&mut self, events: Vec<PlayByPlayEvent>) {
        self.events = events;
        self.version += 1;
    }

    pub fn events(&self) -> &[PlayByPlayEvent] {
        &self.events
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn key_of(&self, ordinal: usize) -> Option<EventKey> {
        self.events.get(ordinal).map(|e| EventKey {
            period: e.period,
            seconds_remaining: e.seconds_remaining,
            ordinal,
        })
    }

    /// Resolve a key back to its event. A key whose clock no longer matches
    /// the event at that position is stale and resolves to nothing.
    pub fn find(&self, key: &EventKey) -> Option<&PlayByPlayEvent> {
        self.events
            .get(key.ordinal)
            .filter(|e| e.period == key.period && e.seconds_remaining == key.seconds_remaining)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct BoxKey {
    version: u64,
    side: Side,
    start_bits: u64,
    end_bits: u64,
}

/// Memoized box scores and rosters for one [`GameLog`].
///
/// Entries are keyed by `(log version, side, window)`. Looking up a newer
/// version than the one cached throws every entry away first. At most
/// `capacity` box scores are held; the least recently used goes first.
#[derive(Debug)]
pub struct BoxScoreCache {
    options: BoxScoreOptions,
    capacity: usize,
    version: Option<u64>,
    rosters: HashMap<Side, Vec<String>>,
    boxes: HashMap<BoxKey, BoxScore>,
    // front is least recently used
    recency: VecDeque<BoxKey>,
    hits: u64,
    misses: u64,
}

impl Default for BoxScoreCache {
    fn default() -> Self {
        BoxScoreCache::new(BoxScoreOptions::default())
    }
}

impl BoxScoreCache {
    pub fn new(options: BoxScoreOptions) -> Self {
        BoxScoreCache::with_capacity(options, BOX_CACHE_CAPACITY)
    }

    /// A cache holding at most `capacity` box scores (minimum 1).
    pub fn with_capacity(options: BoxScoreOptions, capacity: usize) -> Self {
        BoxScoreCache {
            options,
            capacity: capacity.max(1),
            version: None,
            rosters: HashMap::new(),
            boxes: HashMap::new(),
            recency: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Full-game roster for `side`, scanned once per log version.
    pub fn roster(&mut self, log: &GameLog, side: Side) -> &[String] {
        self.sync(log);
        self.rosters
            .entry(side)
            .or_insert_with(|| roster_for_side(log.events(), side))
    }

    pub fn get_or_build(&mut self, log: &GameLog, side: Side, window: TimeWindow) -> &BoxScore {
        self.sync(log);
        let key = BoxKey {
            version: log.version(),
            side,
            start_bits: window.start.to_bits(),
            end_bits: window.end.to_bits(),
        };
        if self.boxes.contains_key(&key) {
            self.hits += 1;
            self.touch(key);
        } else {
            self.misses += 1;
            let roster = self
                .rosters
                .entry(side)
                .or_insert_with(|| roster_for_side(log.events(), side));
            let built = build_box_with(log.events(), side, roster, window, &self.options);
            self.boxes.insert(key, built);
            self.recency.push_back(key);
            self.evict();
        }
        &self.boxes[&key]
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop everything cached.
    pub fn invalidate(&mut self) {
        self.version = None;
        self.rosters.clear();
        self.boxes.clear();
        self.recency.clear();
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    fn touch(&mut self, key: BoxKey) {
        if let Some(pos) = self.recency.iter().position(|k| *k == key) {
            self.recency.remove(pos);
        }
        self.recency.push_back(key);
    }

    fn evict(&mut self) {
        while self.boxes.len() > self.capacity {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            self.boxes.remove(&oldest);
        }
    }

    fn sync(&mut self, log: &GameLog) {
        if self.version != Some(log.version()) {
            if self.version.is_some() {
                tracing::debug!(from = ?self.version, to = log.version(), "event list changed, clearing box score cache");
            }
            self.invalidate();
            self.version = Some(log.version());
        }
    }
}
