//! Text patterns recognizing deck-revealing actions in narration logs.
//!
//! Each pattern targets one action kind in one log channel and captures
//! the acted-upon card name. Matching is case-sensitive on the literal
//! keywords, and a single log line can report several qualifying actions,
//! so every non-overlapping match counts.

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which narration channel a pattern reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Visible to both players.
    Public,
    /// Visible only to the acting player.
    Private,
}

/// A deck-revealing action kind. Every kind implies the card came from
/// the owner's deck, which is what makes it usable for reconstruction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Drew a card (private).
    Drew,
    /// Added a card from deck to hand by effect (private).
    AddedToHand,
    /// Milled a card from the top of the deck (public).
    Milled,
    /// Special summoned a card from the deck (public).
    SpecialSummoned,
    /// Banished a card from the deck (public).
    Banished,
    /// Sent a card to the graveyard (public).
    SentToGraveyard,
}

impl ActionKind {
    /// All recognized action kinds, in pattern order.
    pub fn all() -> [ActionKind; 6] {
        [
            ActionKind::Drew,
            ActionKind::AddedToHand,
            ActionKind::Milled,
            ActionKind::SpecialSummoned,
            ActionKind::Banished,
            ActionKind::SentToGraveyard,
        ]
    }

    /// The default enabled set: every kind.
    pub fn default_set() -> HashSet<ActionKind> {
        Self::all().into_iter().collect()
    }
}

/// One compiled pattern: channel, action kind, and a regex with exactly
/// one capture group yielding the card name.
#[derive(Debug)]
pub struct Pattern {
    pub channel: Channel,
    pub action: ActionKind,
    regex: Regex,
}

impl Pattern {
    fn new(channel: Channel, action: ActionKind, pattern: &str) -> Self {
        Self {
            channel,
            action,
            regex: Regex::new(pattern).expect("built-in pattern is valid"),
        }
    }

    /// All non-overlapping card names this pattern finds in `text`, in
    /// match order. Names are returned verbatim: no normalization.
    pub fn card_names<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }
}

/// The compiled set of enabled patterns for one reconstruction run.
#[derive(Debug)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile patterns for the enabled action kinds.
    ///
    /// `strict_banish` requires the `from Deck` qualifier on banishes;
    /// the lax variant counts any banish, as some replay variants
    /// narrate it unqualified.
    pub fn new(enabled: &HashSet<ActionKind>, strict_banish: bool) -> Self {
        let mut patterns = Vec::new();
        for action in ActionKind::all() {
            if !enabled.contains(&action) {
                continue;
            }
            patterns.push(match action {
                ActionKind::Drew => {
                    Pattern::new(Channel::Private, action, r#"Drew "(.+?)""#)
                }
                ActionKind::AddedToHand => Pattern::new(
                    Channel::Private,
                    action,
                    r#"Added "(.+?)" from Deck to hand"#,
                ),
                ActionKind::Milled => Pattern::new(
                    Channel::Public,
                    action,
                    r#"Milled "(.+?)" from top of deck"#,
                ),
                ActionKind::SpecialSummoned => Pattern::new(
                    Channel::Public,
                    action,
                    r#"Special Summoned "(.+?)" from Deck"#,
                ),
                ActionKind::Banished if strict_banish => Pattern::new(
                    Channel::Public,
                    action,
                    r#"Banished "(.+?)" from Deck"#,
                ),
                ActionKind::Banished => {
                    Pattern::new(Channel::Public, action, r#"Banished "(.+?)""#)
                }
                ActionKind::SentToGraveyard => Pattern::new(
                    Channel::Public,
                    action,
                    r#"Sent(?: Set)?\s*"([^"]+)"(?: from .*?)?\s+to GY"#,
                ),
            });
        }
        Self { patterns }
    }

    /// Iterate the compiled patterns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new(&ActionKind::default_set(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(action: ActionKind, strict: bool) -> PatternSet {
        let enabled: HashSet<ActionKind> = [action].into_iter().collect();
        PatternSet::new(&enabled, strict)
    }

    fn matches(set: &PatternSet, text: &str) -> Vec<String> {
        set.iter()
            .flat_map(|p| p.card_names(text).into_iter().map(String::from))
            .collect()
    }

    #[test]
    fn default_set_compiles_all_six() {
        assert_eq!(PatternSet::default().len(), 6);
    }

    #[test]
    fn drew_captures_name() {
        let set = only(ActionKind::Drew, true);
        assert_eq!(matches(&set, r#"Drew "Pot of Greed""#), vec!["Pot of Greed"]);
    }

    #[test]
    fn drew_finds_every_match_in_one_line() {
        let set = only(ActionKind::Drew, true);
        assert_eq!(
            matches(&set, r#"Drew "Pot of Greed" Drew "Sangan""#),
            vec!["Pot of Greed", "Sangan"]
        );
    }

    #[test]
    fn drew_is_case_sensitive() {
        let set = only(ActionKind::Drew, true);
        assert!(matches(&set, r#"drew "Pot of Greed""#).is_empty());
    }

    #[test]
    fn added_to_hand_requires_full_phrase() {
        let set = only(ActionKind::AddedToHand, true);
        assert_eq!(
            matches(&set, r#"Added "Sangan" from Deck to hand"#),
            vec!["Sangan"]
        );
        assert!(matches(&set, r#"Added "Sangan" from GY to hand"#).is_empty());
    }

    #[test]
    fn milled_from_top_of_deck() {
        let set = only(ActionKind::Milled, true);
        assert_eq!(
            matches(&set, r#"Milled "Snake Rain" from top of deck"#),
            vec!["Snake Rain"]
        );
    }

    #[test]
    fn special_summoned_from_deck() {
        let set = only(ActionKind::SpecialSummoned, true);
        assert_eq!(
            matches(&set, r#"Special Summoned "Mezuki" from Deck"#),
            vec!["Mezuki"]
        );
        assert!(matches(&set, r#"Special Summoned "Mezuki" from GY"#).is_empty());
    }

    #[test]
    fn strict_banish_requires_deck_qualifier() {
        let set = only(ActionKind::Banished, true);
        assert_eq!(
            matches(&set, r#"Banished "Gold Sarcophagus target" from Deck"#),
            vec!["Gold Sarcophagus target"]
        );
        assert!(matches(&set, r#"Banished "Kuriboh""#).is_empty());
    }

    #[test]
    fn lax_banish_counts_any_banish() {
        let set = only(ActionKind::Banished, false);
        assert_eq!(matches(&set, r#"Banished "Kuriboh""#), vec!["Kuriboh"]);
    }

    #[test]
    fn sent_to_gy_variants() {
        let set = only(ActionKind::SentToGraveyard, true);
        assert_eq!(
            matches(&set, r#"Sent "Mezuki" from Deck to GY"#),
            vec!["Mezuki"]
        );
        assert_eq!(matches(&set, r#"Sent "Mezuki" to GY"#), vec!["Mezuki"]);
        assert_eq!(
            matches(&set, r#"Sent Set "Mystic Mine" from field to GY"#),
            vec!["Mystic Mine"]
        );
    }

    #[test]
    fn captured_names_are_verbatim() {
        // Differing capitalization or whitespace stays distinct on purpose.
        let set = only(ActionKind::Drew, true);
        assert_eq!(
            matches(&set, r#"Drew "pot of greed""#),
            vec!["pot of greed"]
        );
    }

    #[test]
    fn disabled_kinds_do_not_match() {
        let set = only(ActionKind::Drew, true);
        assert!(matches(&set, r#"Milled "Sangan" from top of deck"#).is_empty());
    }
}
