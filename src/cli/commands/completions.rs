//! `credvault completions`: generate shell completion scripts.
//!
//! Usage:
//!   credvault completions bash > ~/.bash_completion.d/credvault
//!   credvault completions zsh
//!   credvault completions fish

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    io::stdout().write_all(&render(shell))?;
    Ok(())
}

/// Build the completion script for `shell`.
fn render(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, "credvault", &mut buf);
    buf
}
