//! Completions command handler

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};
use std::io;

/// Handle completions command.
///
/// Generates a shell completion script on stdout.
#[cfg(not(tarpaulin_include))]
pub fn handle<C: CommandFactory>(shell_arg: Option<CompletionShell>) -> Result<()> {
    if let Some(shell) = shell_arg {
        return generate_completions::<C>(shell);
    }

    eprintln!("Usage: rdr completions --shell <bash|zsh|fish|powershell>");
    std::process::exit(1);
}

/// Generate shell completion script.
pub(crate) fn generate_completions<C: CommandFactory>(shell: CompletionShell) -> Result<()> {
    let mut cmd = C::command();
    generate(shell, &mut cmd, "rdr", &mut io::stdout());
    Ok(())
}
