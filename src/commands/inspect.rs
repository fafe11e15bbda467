//! Inspect command handler

use anyhow::Result;
use humansize::{format_size, DECIMAL};

use rdr::pipeline::{DeckPipeline, PipelineOptions};
use rdr::Config;

use super::load_replay;

/// Summarize a replay without writing any files.
#[cfg(not(tarpaulin_include))]
pub fn handle(file: &str) -> Result<()> {
    let config = Config::load()?;
    let replay = load_replay(file)?;

    if file != "-" {
        if let Ok(metadata) = std::fs::metadata(file) {
            println!("Replay: {} ({})", file, format_size(metadata.len(), DECIMAL));
        }
    }
    println!("Records: {}", replay.records.len());

    let mut rps_seen = false;
    for record in replay.rps_records() {
        if !rps_seen {
            println!("\nOpening rock-paper-scissors:");
            rps_seen = true;
        }
        println!(
            "  {} chose {} / {} chose {} / winner: {}",
            record.player1.as_deref().unwrap_or("?"),
            record.player1_choice.as_deref().unwrap_or("N/A"),
            record.player2.as_deref().unwrap_or("?"),
            record.player2_choice.as_deref().unwrap_or("N/A"),
            record.winner.as_deref().unwrap_or("N/A"),
        );
    }

    let options = PipelineOptions {
        actions: config.patterns.actions.iter().copied().collect(),
        strict_banish: config.patterns.strict_banish,
        boundary: config.segmenter.boundary,
        legality: config.legality.table(),
    };
    let decks = DeckPipeline::new(options).run(&replay.records);

    println!("\nGames detected: {}", decks.games.game_count());
    println!(
        "Events: {} extracted, {} dropped before the first game boundary",
        decks.stats.events, decks.stats.events_before_first_game
    );

    if decks.is_empty() {
        println!("\nNo attributable card events; nothing would be exported.");
        return Ok(());
    }

    println!("\nPlayers:");
    for (player, deck) in decks.finals.iter() {
        println!(
            "  {}: {} distinct cards, {} copies after merge",
            player,
            deck.len(),
            deck.total()
        );
    }

    let unresolved = decks.serials.unresolved();
    if !unresolved.is_empty() {
        println!("\nCards with no serial metadata in the payload:");
        for name in unresolved {
            println!("  {}", name);
        }
    }

    Ok(())
}
