//! Replay Deck Reconstructor (RDR) - CLI entry point

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommands};
use commands::reconstruct::ReconstructArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Reconstruct {
            file,
            out_dir,
            format,
            per_game,
            boundary,
            lax_banish,
            actions,
        } => commands::reconstruct::handle(ReconstructArgs {
            file: &file,
            out_dir: out_dir.as_deref(),
            format,
            per_game,
            boundary,
            lax_banish,
            actions: actions.as_deref(),
        }),
        Commands::Inspect { file } => commands::inspect::handle(&file),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Path => commands::config::handle_path(),
            ConfigCommands::Edit => commands::config::handle_edit(),
        },
        Commands::Completions { shell } => commands::completions::handle::<Cli>(shell),
    }
}
