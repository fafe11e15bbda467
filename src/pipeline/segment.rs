//! Game segmentation over the ordered record stream.
//!
//! A match holds up to three games but the stream carries no explicit
//! game-end marker; games are delimited solely by evidence that the next
//! one has begun. Two boundary signals exist in the wild and neither is
//! authoritative, so the rule is a configuration choice.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::replay::PlayRecord;

/// Private-log phrase the service emits once per game at setup.
pub const GO_FIRST_PHRASE: &str = "Chose to go first";

/// Which structural evidence opens a new game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryRule {
    /// A record whose `log` is an entry sequence marks a boundary.
    #[default]
    Wrapper,
    /// A private log containing the go-first phrase marks a boundary.
    ChoseFirst,
}

/// Stateful scan assigning records to game indices.
///
/// Starts with no game open; events seen before the first boundary
/// cannot be attributed and are dropped by the caller.
#[derive(Debug)]
pub struct GameSegmenter {
    rule: BoundaryRule,
    current: Option<usize>,
}

impl GameSegmenter {
    pub fn new(rule: BoundaryRule) -> Self {
        Self {
            rule,
            current: None,
        }
    }

    /// The open game index, if any boundary was seen yet.
    pub fn current_game(&self) -> Option<usize> {
        self.current
    }

    /// Number of games opened so far.
    pub fn games_seen(&self) -> usize {
        self.current.map_or(0, |idx| idx + 1)
    }

    /// Observe a record before extracting its entries. Returns true when
    /// this record opened a new game; the record's own events belong to
    /// the game it opened.
    pub fn observe_record(&mut self, record: &PlayRecord) -> bool {
        if self.is_boundary(record) {
            self.current = Some(self.current.map_or(0, |idx| idx + 1));
            true
        } else {
            false
        }
    }

    fn is_boundary(&self, record: &PlayRecord) -> bool {
        let Some(log) = &record.log else { return false };
        match self.rule {
            BoundaryRule::Wrapper => log.is_wrapper(),
            BoundaryRule::ChoseFirst => log
                .entries()
                .any(|entry| entry.private_log.contains(GO_FIRST_PHRASE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{LogEntry, LogField};

    fn single(private_log: &str) -> PlayRecord {
        PlayRecord {
            log: Some(LogField::One(LogEntry {
                username: "Alice".to_string(),
                public_log: String::new(),
                private_log: private_log.to_string(),
            })),
            ..Default::default()
        }
    }

    fn wrapper() -> PlayRecord {
        PlayRecord {
            log: Some(LogField::Many(vec![LogEntry::default()])),
            ..Default::default()
        }
    }

    #[test]
    fn no_game_open_before_first_boundary() {
        let segmenter = GameSegmenter::new(BoundaryRule::Wrapper);
        assert_eq!(segmenter.current_game(), None);
        assert_eq!(segmenter.games_seen(), 0);
    }

    #[test]
    fn wrapper_records_open_games() {
        let mut segmenter = GameSegmenter::new(BoundaryRule::Wrapper);

        assert!(!segmenter.observe_record(&single("x")));
        assert_eq!(segmenter.current_game(), None);

        assert!(segmenter.observe_record(&wrapper()));
        assert_eq!(segmenter.current_game(), Some(0));

        assert!(!segmenter.observe_record(&single("y")));
        assert_eq!(segmenter.current_game(), Some(0));

        assert!(segmenter.observe_record(&wrapper()));
        assert_eq!(segmenter.current_game(), Some(1));
        assert_eq!(segmenter.games_seen(), 2);
    }

    #[test]
    fn go_first_phrase_opens_games() {
        let mut segmenter = GameSegmenter::new(BoundaryRule::ChoseFirst);

        assert!(segmenter.observe_record(&single("Chose to go first")));
        assert_eq!(segmenter.current_game(), Some(0));

        assert!(!segmenter.observe_record(&single("Drew \"Sangan\"")));

        assert!(segmenter.observe_record(&single("Chose to go first")));
        assert_eq!(segmenter.current_game(), Some(1));
    }

    #[test]
    fn rules_do_not_trigger_on_each_other() {
        let mut by_wrapper = GameSegmenter::new(BoundaryRule::Wrapper);
        assert!(!by_wrapper.observe_record(&single("Chose to go first")));

        let mut by_phrase = GameSegmenter::new(BoundaryRule::ChoseFirst);
        assert!(!by_phrase.observe_record(&wrapper()));
    }

    #[test]
    fn recordless_records_are_never_boundaries() {
        let mut segmenter = GameSegmenter::new(BoundaryRule::Wrapper);
        assert!(!segmenter.observe_record(&PlayRecord::default()));
    }
}
