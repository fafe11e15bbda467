//! Deck file export.
//!
//! Writes one file set per player: a readable listing, a structured
//! deck-list keyed by serial, and optionally per-game readable dumps.
//! A failed write only loses that one file; remaining players are still
//! attempted.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use deunicode::deunicode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pipeline::deck::DeckCounts;
use crate::pipeline::resolver::SerialResolver;
use crate::pipeline::MatchDecks;

/// Comment line opening every structured deck-list file.
pub const DECK_LIST_HEADER: &str = "#created by rdr";

/// File extension for the readable encoding.
pub const READABLE_EXT: &str = "txt";

/// File extension for the structured deck-list encoding.
pub const DECK_LIST_EXT: &str = "ydk";

/// Fallback stem when a username sanitizes to nothing.
const FALLBACK_STEM: &str = "player";

/// Characters stripped from usernames when building filenames.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Which encodings to write.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DeckFormat {
    /// `<name> x<count>` lines.
    Readable,
    /// Serial-per-copy deck list with section markers.
    Ydk,
    /// Both encodings side by side.
    #[default]
    Both,
}

impl DeckFormat {
    fn readable(self) -> bool {
        matches!(self, DeckFormat::Readable | DeckFormat::Both)
    }

    fn ydk(self) -> bool {
        matches!(self, DeckFormat::Ydk | DeckFormat::Both)
    }
}

/// A single file that could not be written.
#[derive(Debug, thiserror::Error)]
#[error("Failed to write deck file for {player} at {path:?}: {source}")]
pub struct ExportFailure {
    pub player: String,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// What an export run produced and what it could not.
#[derive(Debug, Default)]
pub struct ExportOutcome {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ExportFailure>,
}

impl ExportOutcome {
    /// True when there was nothing to write at all.
    pub fn is_empty(&self) -> bool {
        self.written.is_empty() && self.failures.is_empty()
    }
}

/// Writes deck files for a reconstructed match.
#[derive(Debug)]
pub struct Exporter {
    out_dir: PathBuf,
    format: DeckFormat,
    per_game: bool,
}

impl Exporter {
    pub fn new<P: Into<PathBuf>>(out_dir: P, format: DeckFormat, per_game: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            format,
            per_game,
        }
    }

    /// Write the final decks (and optional per-game dumps) for every
    /// player. Failures are collected per file, never cascaded.
    pub fn export(&self, decks: &MatchDecks) -> Result<ExportOutcome> {
        let mut outcome = ExportOutcome::default();
        if decks.is_empty() {
            return Ok(outcome);
        }

        fs::create_dir_all(&self.out_dir).with_context(|| {
            format!("Failed to create output directory: {:?}", self.out_dir)
        })?;

        // Distinct players may sanitize to the same stem; number the
        // later ones so no player's files overwrite another's.
        let mut used_stems: Vec<String> = Vec::new();

        for (player, deck) in decks.finals.iter() {
            let stem = unique_stem(sanitize_username(player), &mut used_stems);

            if self.format.readable() {
                let path = self
                    .out_dir
                    .join(format!("{}-final-deck.{}", stem, READABLE_EXT));
                self.write_file(&path, player, render_readable(deck), &mut outcome);
            }
            if self.format.ydk() {
                let path = self
                    .out_dir
                    .join(format!("{}-final-deck.{}", stem, DECK_LIST_EXT));
                self.write_file(
                    &path,
                    player,
                    render_deck_list(deck, &decks.serials),
                    &mut outcome,
                );
            }

            if self.per_game {
                for (index, game) in decks.games.games() {
                    let Some(game_deck) = game.deck(player) else { continue };
                    if game_deck.is_empty() {
                        continue;
                    }
                    let path = self.out_dir.join(format!(
                        "{}-game{}-deck.{}",
                        stem,
                        index + 1,
                        READABLE_EXT
                    ));
                    self.write_file(&path, player, render_readable(game_deck), &mut outcome);
                }
            }
        }

        Ok(outcome)
    }

    fn write_file(
        &self,
        path: &Path,
        player: &str,
        contents: String,
        outcome: &mut ExportOutcome,
    ) {
        match fs::write(path, contents) {
            Ok(()) => outcome.written.push(path.to_path_buf()),
            Err(source) => {
                warn!(player, path = ?path, "deck file write failed");
                outcome.failures.push(ExportFailure {
                    player: player.to_string(),
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }
}

/// Render the readable encoding: one `<name> x<count>` line per card,
/// ascending by count, ties in first-seen order.
pub fn render_readable(deck: &DeckCounts) -> String {
    let mut out = String::new();
    for entry in deck.sorted() {
        writeln!(out, "{} x{}", entry.name, entry.count).expect("string write");
    }
    out
}

/// Render the structured deck-list encoding: header comment, main
/// section with one serial line per physical copy, then empty extra and
/// side sections.
pub fn render_deck_list(deck: &DeckCounts, serials: &SerialResolver) -> String {
    let mut out = String::new();
    writeln!(out, "{}", DECK_LIST_HEADER).expect("string write");
    writeln!(out, "#main").expect("string write");
    for entry in deck.sorted() {
        let serial = serials.serial_or_unknown(&entry.name);
        for _ in 0..entry.count {
            writeln!(out, "{}", serial).expect("string write");
        }
    }
    writeln!(out, "#extra").expect("string write");
    writeln!(out, "!side").expect("string write");
    out
}

/// Reserve a stem, appending a counter when it is already taken.
fn unique_stem(stem: String, used: &mut Vec<String>) -> String {
    let mut candidate = stem.clone();
    let mut counter = 2;
    while used.contains(&candidate) {
        candidate = format!("{}-{}", stem, counter);
        counter += 1;
    }
    used.push(candidate.clone());
    candidate
}

/// Sanitize a username into a filesystem-safe filename stem: ASCII
/// transliteration, whitespace to hyphens, path separators and other
/// invalid characters removed.
pub fn sanitize_username(username: &str) -> String {
    let ascii = deunicode(username);

    let mut result = String::with_capacity(ascii.len());
    let mut last_was_hyphen = false;
    for c in ascii.chars() {
        if c.is_whitespace() || c == '-' {
            if !last_was_hyphen {
                result.push('-');
                last_was_hyphen = true;
            }
        } else if INVALID_CHARS.contains(&c) {
            continue;
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            result.push(c);
            last_was_hyphen = false;
        }
    }

    let trimmed = result
        .trim_matches(|c| c == '.' || c == '-')
        .to_string();
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed
    }
}
