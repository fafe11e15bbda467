//! CLI definitions for RDR
//!
//! This module contains the clap CLI structure definitions, separated from
//! main.rs so the command handlers in commands/ can reference them.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use rdr::export::DeckFormat;
use rdr::pipeline::patterns::ActionKind;
use rdr::pipeline::segment::BoundaryRule;

/// Build clap styles using our theme colors.
///
/// - Green: headers, usage, command names (accent color)
/// - White: descriptions, placeholders (renders as light gray on dark terminals)
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "rdr")]
#[command(about = "[ Replay Deck Reconstructor ] - rebuild deck lists from recorded match replays!")]
#[command(
    long_about = "Replay Deck Reconstructor (RDR) - rebuild deck lists from match replays.

RDR reads the play-record payload a replay fetcher saved to disk and
reconstructs, per player, the minimum deck consistent with every card the
log revealed: draws, searches, mills, deck summons, banishes, and cards
sent from deck to graveyard. Games of a best-of-three are merged with a
take-the-maximum policy and clamped to copy limits.

QUICK START:
    rdr reconstruct replay.json    Write deck files for every player
    rdr inspect replay.json        Summarize a replay without writing
    rdr config show                Show the active configuration

For more information, see: https://github.com/simon/replay-deck-reconstructor"
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconstruct deck files from a replay
    #[command(long_about = "Reconstruct per-player deck files from a replay payload.

Reads the JSON play-record array (pass '-' to read from stdin), scans it
once, and writes one deck file set per player into the output directory.
Flags override the config file, which overrides built-in defaults.

EXAMPLES:
    rdr reconstruct replay.json                    Use configured defaults
    rdr reconstruct replay.json --out-dir decks    Write into ./decks
    rdr reconstruct replay.json --format ydk       Structured deck lists only
    rdr reconstruct replay.json --per-game         Also dump per-game decks
    rdr reconstruct replay.json --boundary chose-first
    rdr reconstruct replay.json --actions drew,banished
    cat replay.json | rdr reconstruct -")]
    Reconstruct {
        /// Path to the replay JSON file, or '-' for stdin
        #[arg(help = "Replay payload path, or '-' for stdin")]
        file: String,
        /// Output directory for deck files
        #[arg(long, help = "Directory to write deck files into")]
        out_dir: Option<String>,
        /// Which encodings to write
        #[arg(long, value_enum, help = "Deck file encoding(s) to write")]
        format: Option<DeckFormat>,
        /// Also write per-game diagnostic dumps
        #[arg(long, help = "Write one readable dump per player per game")]
        per_game: bool,
        /// Game boundary detection rule
        #[arg(long, value_enum, help = "How game boundaries are detected")]
        boundary: Option<BoundaryRule>,
        /// Count banishes without the deck qualifier
        #[arg(long, help = "Count any banish, not just 'from Deck'")]
        lax_banish: bool,
        /// Action kinds to recognize (comma separated)
        #[arg(long, value_enum, value_delimiter = ',', help = "Subset of action kinds to recognize")]
        actions: Option<Vec<ActionKind>>,
    },

    /// Summarize a replay without writing files
    #[command(long_about = "Summarize a replay: players, games, event counts, the
opening rock-paper-scissors results, and card names with no serial
metadata anywhere in the payload.

EXAMPLES:
    rdr inspect replay.json
    cat replay.json | rdr inspect -")]
    Inspect {
        /// Path to the replay JSON file, or '-' for stdin
        #[arg(help = "Replay payload path, or '-' for stdin")]
        file: String,
    },

    /// Configuration management
    #[command(
        subcommand,
        long_about = "View and edit the RDR configuration file.

Configuration is stored in ~/.config/rdr/config.toml and covers output
location and formats, enabled patterns, the game-boundary rule, and
copy-limit overrides.

EXAMPLES:
    rdr config show          Display current configuration
    rdr config path          Print the config file location
    rdr config edit          Open config in $EDITOR"
    )]
    Config(ConfigCommands),

    /// Generate shell completions (internal use)
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Option<CompletionShell>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Open configuration file in your default editor
    #[command(long_about = "Open the configuration file in your default editor.

Uses the $EDITOR environment variable (defaults to 'vi').
Config file location: ~/.config/rdr/config.toml")]
    Edit,
}
