//! Event extraction from narration entries.
//!
//! Applies every enabled pattern to the matching channel of a log entry
//! and yields the card events found there. Service-authored entries are
//! rejected once per entry, before any pattern runs.

use crate::replay::LogEntry;

use super::patterns::{ActionKind, Channel, PatternSet};

/// One observed deck-revealing action, not yet assigned to a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Username of the acting player, taken from the entry author.
    pub player: String,
    /// Card name exactly as narrated.
    pub card_name: String,
    pub action: ActionKind,
}

/// Extracts [`RawEvent`]s from log entries using a compiled pattern set.
#[derive(Debug, Default)]
pub struct EventExtractor {
    patterns: PatternSet,
}

impl EventExtractor {
    pub fn new(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    /// Events found in one entry, in pattern-then-match order.
    ///
    /// Entries authored by the replay service produce nothing.
    pub fn extract(&self, entry: &LogEntry) -> Vec<RawEvent> {
        if entry.is_system() || entry.username.is_empty() {
            return Vec::new();
        }

        let mut events = Vec::new();
        for pattern in self.patterns.iter() {
            let text = match pattern.channel {
                Channel::Public => &entry.public_log,
                Channel::Private => &entry.private_log,
            };
            for card_name in pattern.card_names(text) {
                events.push(RawEvent {
                    player: entry.username.clone(),
                    card_name: card_name.to_string(),
                    action: pattern.action,
                });
            }
        }
        events
    }
}
