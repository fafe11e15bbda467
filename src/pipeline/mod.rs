//! Deck reconstruction pipeline.
//!
//! Consumes the ordered play records of one match and produces, per
//! player, the minimum deck consistent with everything the log revealed:
//! per-game observation counts, a max-merged and legality-clamped final
//! deck, and the name-to-serial map for structured export.

pub mod deck;
pub mod extract;
pub mod patterns;
pub mod resolver;
pub mod segment;

use std::collections::HashSet;

use tracing::debug;

use crate::replay::PlayRecord;

use self::deck::{final_decks, GameObservations, LegalityTable, PlayerDecks};
use self::extract::EventExtractor;
use self::patterns::{ActionKind, PatternSet};
use self::resolver::SerialResolver;
use self::segment::{BoundaryRule, GameSegmenter};

/// Configuration for one reconstruction run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Action kinds to recognize. Defaults to all of them.
    pub actions: HashSet<ActionKind>,
    /// Require the deck qualifier on banish lines.
    pub strict_banish: bool,
    /// How game boundaries are detected.
    pub boundary: BoundaryRule,
    /// Copy limits applied after merging.
    pub legality: LegalityTable,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            actions: ActionKind::default_set(),
            strict_banish: true,
            boundary: BoundaryRule::default(),
            legality: LegalityTable::default(),
        }
    }
}

/// Counters describing one scan, for reporting and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Records consumed.
    pub records: usize,
    /// Records skipped for having no log field.
    pub records_without_log: usize,
    /// Log entries inspected.
    pub entries: usize,
    /// Card events extracted.
    pub events: usize,
    /// Events dropped because no game boundary was seen yet.
    pub events_before_first_game: usize,
}

/// Everything one reconstruction run produces.
#[derive(Debug)]
pub struct MatchDecks {
    /// Raw per-game observations, pre-merge and pre-clamp.
    pub games: GameObservations,
    /// Final per-player decks: max-merged across games, then clamped.
    pub finals: PlayerDecks,
    /// Name-to-serial map, finalized for every card in the final decks.
    pub serials: SerialResolver,
    pub stats: ScanStats,
}

impl MatchDecks {
    /// True when the scan produced nothing exportable.
    pub fn is_empty(&self) -> bool {
        self.finals.is_empty()
    }
}

/// The reconstruction pipeline: extraction, segmentation, accumulation,
/// merge, legality. Single-threaded; records are consumed once, in order.
#[derive(Debug)]
pub struct DeckPipeline {
    extractor: EventExtractor,
    boundary: BoundaryRule,
    legality: LegalityTable,
}

impl DeckPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            extractor: EventExtractor::new(PatternSet::new(
                &options.actions,
                options.strict_banish,
            )),
            boundary: options.boundary,
            legality: options.legality,
        }
    }

    /// Run the pipeline over one match's ordered records.
    pub fn run(&self, records: &[PlayRecord]) -> MatchDecks {
        // Serial metadata may trail the log lines that mention a card,
        // so the resolver harvests the whole input before the scan.
        let mut serials = SerialResolver::from_records(records);

        let mut segmenter = GameSegmenter::new(self.boundary);
        let mut games = GameObservations::new();
        let mut stats = ScanStats::default();

        for record in records {
            stats.records += 1;
            if segmenter.observe_record(record) {
                games.open_game();
            }
            let Some(log) = &record.log else {
                stats.records_without_log += 1;
                continue;
            };
            for entry in log.entries() {
                stats.entries += 1;
                for event in self.extractor.extract(entry) {
                    stats.events += 1;
                    match segmenter.current_game() {
                        Some(game) => games.record(game, &event.player, &event.card_name),
                        None => stats.events_before_first_game += 1,
                    }
                }
            }
        }

        let finals = final_decks(&games, &self.legality);

        // Force a resolution for every exported card so the map carries
        // an explicit sentinel entry for names with no metadata.
        for (_, deck) in finals.iter() {
            for entry in deck.iter() {
                serials.resolve(&entry.name);
            }
        }

        debug!(
            records = stats.records,
            events = stats.events,
            games = games.game_count(),
            "scan complete"
        );

        MatchDecks {
            games,
            finals,
            serials,
            stats,
        }
    }
}

impl Default for DeckPipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::Replay;

    fn run(json: &str) -> MatchDecks {
        let replay = Replay::parse_str(json).unwrap();
        DeckPipeline::default().run(&replay.records)
    }

    fn run_with(json: &str, options: PipelineOptions) -> MatchDecks {
        let replay = Replay::parse_str(json).unwrap();
        DeckPipeline::new(options).run(&replay.records)
    }

    const TWO_GAME_MATCH: &str = r#"[
        {"log":[{"username":"Duelingbook","public_log":"Game 1","private_log":""}]},
        {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Pot of Greed\""}},
        {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Pot of Greed\""}},
        {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Sangan\""},
         "card":{"name":"Sangan","serial_number":"26202165"}},
        {"log":[{"username":"Duelingbook","public_log":"Game 2","private_log":""}]},
        {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Pot of Greed\""}}
    ]"#;

    #[test]
    fn segments_games_and_merges_with_max() {
        let decks = run(TWO_GAME_MATCH);
        assert_eq!(decks.games.game_count(), 2);

        let game1 = decks.games.game(0).unwrap().deck("Alice").unwrap();
        assert_eq!(game1.count("Pot of Greed"), 2);
        assert_eq!(game1.count("Sangan"), 1);

        // Merged pre-clamp max is 2, clamped to the one-copy tier.
        let final_deck = decks.finals.deck("Alice").unwrap();
        assert_eq!(final_deck.count("Pot of Greed"), 1);
        assert_eq!(final_deck.count("Sangan"), 1);
    }

    #[test]
    fn events_before_first_boundary_are_dropped() {
        let decks = run(r#"[
            {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Orphan\""}},
            {"log":[{"username":"Duelingbook","public_log":"Game 1","private_log":""}]},
            {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Counted\""}}
        ]"#);
        assert_eq!(decks.stats.events_before_first_game, 1);
        let deck = decks.finals.deck("Alice").unwrap();
        assert_eq!(deck.count("Orphan"), 0);
        assert_eq!(deck.count("Counted"), 1);
    }

    #[test]
    fn no_boundary_at_all_yields_nothing_to_export() {
        let decks = run(r#"[
            {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Sangan\""}}
        ]"#);
        assert!(decks.is_empty());
        assert_eq!(decks.stats.events_before_first_game, 1);
    }

    #[test]
    fn empty_input_is_empty_not_fatal() {
        let decks = run("[]");
        assert!(decks.is_empty());
        assert_eq!(decks.stats, ScanStats::default());
    }

    #[test]
    fn records_without_log_are_skipped() {
        let decks = run(r#"[
            {"play":"RPS","player1_choice":"Rock","player2_choice":"Paper"},
            {"log":[{"username":"Duelingbook","public_log":"","private_log":""}]},
            {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Sangan\""}}
        ]"#);
        assert_eq!(decks.stats.records_without_log, 1);
        assert_eq!(decks.finals.deck("Alice").unwrap().count("Sangan"), 1);
    }

    #[test]
    fn banish_and_sent_to_gy_both_count() {
        let decks = run(r#"[
            {"log":[{"username":"Duelingbook","public_log":"","private_log":""}]},
            {"log":{"username":"Alice","public_log":"Banished \"Gren Maju Charger\" from Deck","private_log":""}},
            {"log":{"username":"Alice","public_log":"Sent \"Gren Maju Charger\" from Deck to GY","private_log":""}}
        ]"#);
        let deck = decks.finals.deck("Alice").unwrap();
        assert_eq!(deck.count("Gren Maju Charger"), 2);
    }

    #[test]
    fn chose_first_boundary_rule() {
        let options = PipelineOptions {
            boundary: BoundaryRule::ChoseFirst,
            ..Default::default()
        };
        let decks = run_with(
            r#"[
                {"log":{"username":"Alice","public_log":"","private_log":"Chose to go first"}},
                {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Sangan\""}},
                {"log":{"username":"Alice","public_log":"","private_log":"Chose to go first"}},
                {"log":{"username":"Alice","public_log":"","private_log":"Drew \"Sangan\""}}
            ]"#,
            options,
        );
        assert_eq!(decks.games.game_count(), 2);
        assert_eq!(decks.finals.deck("Alice").unwrap().count("Sangan"), 1);
    }

    #[test]
    fn serials_are_finalized_for_every_final_card() {
        let decks = run(TWO_GAME_MATCH);
        assert_eq!(decks.serials.lookup("Sangan"), Some("26202165"));
        // No metadata anywhere for this one, so it holds the sentinel.
        assert_eq!(
            decks.serials.lookup("Pot of Greed"),
            Some(resolver::UNKNOWN_SERIAL)
        );
    }

    #[test]
    fn system_narration_never_accumulates() {
        let decks = run(r#"[
            {"log":[{"username":"Duelingbook","public_log":"","private_log":""}]},
            {"log":{"username":"Duelingbook","public_log":"Sent \"Sangan\" to GY","private_log":"Drew \"Sangan\""}}
        ]"#);
        assert!(decks.is_empty());
    }

    #[test]
    fn determinism_two_runs_agree() {
        let a = run(TWO_GAME_MATCH);
        let b = run(TWO_GAME_MATCH);
        assert_eq!(a.stats, b.stats);

        let deck_a: Vec<_> = a
            .finals
            .deck("Alice")
            .unwrap()
            .sorted()
            .iter()
            .map(|e| (e.name.clone(), e.count))
            .collect();
        let deck_b: Vec<_> = b
            .finals
            .deck("Alice")
            .unwrap()
            .sorted()
            .iter()
            .map(|e| (e.name.clone(), e.count))
            .collect();
        assert_eq!(deck_a, deck_b);
    }
}
