//! Deck accumulation, cross-game merging, and legality clamping.
//!
//! Counts are observations, not truth: seeing a card N times in one game
//! proves at least N copies exist. Games are independent shuffles of the
//! same deck, so merging takes the maximum observed count per game, never
//! the sum, then clamps to the card's legality tier.

use std::collections::HashSet;

/// One card's observed (or final) copy count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub name: String,
    pub count: u32,
}

/// Copy counts for one player, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct DeckCounts {
    entries: Vec<DeckEntry>,
}

impl DeckCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more observed copy of `name`.
    pub fn record(&mut self, name: &str) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.count += 1,
            None => self.entries.push(DeckEntry {
                name: name.to_string(),
                count: 1,
            }),
        }
    }

    /// Raise `name` to at least `count`, inserting it if absent.
    pub fn raise_to(&mut self, name: &str, count: u32) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.count = entry.count.max(count),
            None => self.entries.push(DeckEntry {
                name: name.to_string(),
                count,
            }),
        }
    }

    pub fn count(&self, name: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map_or(0, |e| e.count)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &DeckEntry> {
        self.entries.iter()
    }

    /// Entries sorted ascending by count; ties keep first-seen order.
    /// This is the export order.
    pub fn sorted(&self) -> Vec<&DeckEntry> {
        let mut sorted: Vec<&DeckEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.count);
        sorted
    }

    /// A copy with every count clamped to its legality tier.
    pub fn clamped(&self, table: &LegalityTable) -> DeckCounts {
        DeckCounts {
            entries: self
                .entries
                .iter()
                .map(|e| DeckEntry {
                    name: e.name.clone(),
                    count: table.clamp(&e.name, e.count),
                })
                .collect(),
        }
    }

    /// Total physical copies across all entries.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-player decks for one game (or the merged result), in first-seen
/// player order.
#[derive(Debug, Clone, Default)]
pub struct PlayerDecks {
    players: Vec<(String, DeckCounts)>,
}

impl PlayerDecks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observed copy for `(player, card)`, creating the player
    /// slot on first sight.
    pub fn record(&mut self, player: &str, card_name: &str) {
        self.deck_mut(player).record(card_name);
    }

    fn deck_mut(&mut self, player: &str) -> &mut DeckCounts {
        if let Some(idx) = self.players.iter().position(|(name, _)| name == player) {
            return &mut self.players[idx].1;
        }
        self.players.push((player.to_string(), DeckCounts::new()));
        &mut self.players.last_mut().expect("just pushed").1
    }

    pub fn deck(&self, player: &str) -> Option<&DeckCounts> {
        self.players
            .iter()
            .find(|(name, _)| name == player)
            .map(|(_, deck)| deck)
    }

    /// Players in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeckCounts)> {
        self.players
            .iter()
            .map(|(name, deck)| (name.as_str(), deck))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Per-game observations for a whole match.
#[derive(Debug, Clone, Default)]
pub struct GameObservations {
    games: Vec<PlayerDecks>,
}

impl GameObservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the accumulator for the next game and return its index.
    pub fn open_game(&mut self) -> usize {
        self.games.push(PlayerDecks::new());
        self.games.len() - 1
    }

    /// Count one observed copy in the given game, creating any missing
    /// game or player slot on the way.
    pub fn record(&mut self, game: usize, player: &str, card_name: &str) {
        while self.games.len() <= game {
            self.games.push(PlayerDecks::new());
        }
        self.games[game].record(player, card_name);
    }

    pub fn game(&self, game: usize) -> Option<&PlayerDecks> {
        self.games.get(game)
    }

    pub fn games(&self) -> impl Iterator<Item = (usize, &PlayerDecks)> {
        self.games.iter().enumerate()
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// True when no game recorded any event.
    pub fn is_empty(&self) -> bool {
        self.games.iter().all(PlayerDecks::is_empty)
    }

    /// Merge all games into pre-clamp per-player decks: for every
    /// (player, card) the maximum count observed in any single game.
    pub fn merge(&self) -> PlayerDecks {
        let mut merged = PlayerDecks::new();
        for game in &self.games {
            for (player, deck) in game.iter() {
                let target = merged.deck_mut(player);
                for entry in deck.iter() {
                    target.raise_to(&entry.name, entry.count);
                }
            }
        }
        merged
    }
}

/// Maximum copies permitted per card name: two restricted tiers plus an
/// implicit default of three.
#[derive(Debug, Clone)]
pub struct LegalityTable {
    limit_one: HashSet<String>,
    limit_two: HashSet<String>,
}

/// Cards restricted to a single copy. A representative slice of the
/// format's restriction list; override via `[legality]` in the config.
const DEFAULT_LIMIT_ONE: &[&str] = &[
    "Pot of Greed",
    "Graceful Charity",
    "Sangan",
    "Raigeki",
    "Harpie's Feather Duster",
    "Monster Reborn",
    "Change of Heart",
    "Dark Hole",
    "Left Arm of the Forbidden One",
    "Right Arm of the Forbidden One",
    "Left Leg of the Forbidden One",
    "Right Leg of the Forbidden One",
    "Exodia the Forbidden One",
    "Imperial Order",
];

/// Cards restricted to two copies.
const DEFAULT_LIMIT_TWO: &[&str] = &[
    "Upstart Goblin",
    "Reckless Greed",
    "Chain Strike",
    "Summoner Monk",
];

impl LegalityTable {
    pub fn new<I, J>(limit_one: I, limit_two: J) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
    {
        Self {
            limit_one: limit_one.into_iter().map(Into::into).collect(),
            limit_two: limit_two.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in one-copy tier.
    pub fn default_limit_one() -> impl Iterator<Item = &'static str> {
        DEFAULT_LIMIT_ONE.iter().copied()
    }

    /// The built-in two-copy tier.
    pub fn default_limit_two() -> impl Iterator<Item = &'static str> {
        DEFAULT_LIMIT_TWO.iter().copied()
    }

    /// Maximum legal copies of `name`.
    pub fn limit(&self, name: &str) -> u32 {
        if self.limit_one.contains(name) {
            1
        } else if self.limit_two.contains(name) {
            2
        } else {
            3
        }
    }

    /// Clamp an observed count to the legal maximum.
    pub fn clamp(&self, name: &str, count: u32) -> u32 {
        count.min(self.limit(name))
    }
}

impl Default for LegalityTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_LIMIT_ONE.iter().copied(),
            DEFAULT_LIMIT_TWO.iter().copied(),
        )
    }
}

/// Merge a match's observations and clamp to legality in one step.
pub fn final_decks(observations: &GameObservations, table: &LegalityTable) -> PlayerDecks {
    let merged = observations.merge();
    let mut finals = PlayerDecks::new();
    for (player, deck) in merged.iter() {
        finals.players.push((player.to_string(), deck.clamped(table)));
    }
    finals
}
