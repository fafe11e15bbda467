//! Reconstruct command handler

use anyhow::{bail, Result};

use rdr::export::{DeckFormat, Exporter};
use rdr::pipeline::patterns::ActionKind;
use rdr::pipeline::segment::BoundaryRule;
use rdr::pipeline::{DeckPipeline, PipelineOptions};
use rdr::Config;

use super::load_replay;

/// CLI overrides for one reconstruction run. `None` means "use config".
pub struct ReconstructArgs<'a> {
    pub file: &'a str,
    pub out_dir: Option<&'a str>,
    pub format: Option<DeckFormat>,
    pub per_game: bool,
    pub boundary: Option<BoundaryRule>,
    pub lax_banish: bool,
    pub actions: Option<&'a [ActionKind]>,
}

/// Run the full pipeline over a replay and write deck files.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: ReconstructArgs) -> Result<()> {
    let config = Config::load()?;
    let replay = load_replay(args.file)?;

    let options = PipelineOptions {
        actions: args
            .actions
            .map(|kinds| kinds.iter().copied().collect())
            .unwrap_or_else(|| config.patterns.actions.iter().copied().collect()),
        strict_banish: if args.lax_banish {
            false
        } else {
            config.patterns.strict_banish
        },
        boundary: args.boundary.unwrap_or(config.segmenter.boundary),
        legality: config.legality.table(),
    };

    let decks = DeckPipeline::new(options).run(&replay.records);

    if decks.is_empty() {
        println!("Nothing to export: no attributable card events found.");
        if decks.stats.events_before_first_game > 0 {
            println!(
                "({} event(s) were seen before any game boundary; try --boundary chose-first)",
                decks.stats.events_before_first_game
            );
        }
        return Ok(());
    }

    let out_dir = args
        .out_dir
        .map(Into::into)
        .unwrap_or_else(|| config.output_directory());
    let format = args.format.unwrap_or(config.output.format);
    let per_game = args.per_game || config.output.per_game;

    let outcome = Exporter::new(out_dir, format, per_game).export(&decks)?;

    println!(
        "Scanned {} records, {} events across {} game(s).",
        decks.stats.records,
        decks.stats.events,
        decks.games.game_count()
    );
    for path in &outcome.written {
        println!("Saved {}", path.display());
    }
    for failure in &outcome.failures {
        eprintln!("{}", failure);
    }

    if outcome.written.is_empty() && !outcome.failures.is_empty() {
        bail!("Every deck file failed to write");
    }
    Ok(())
}
