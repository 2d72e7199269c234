//! `credvault list`: display all credentials in a table.

use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, reveal: bool) -> Result<()> {
    let session = Session::open(cli)?;
    let entries = session.store.list();

    output::info(&format!(
        "{} credential(s) in {}",
        entries.len(),
        session.vault_path.display()
    ));

    output::print_entries_table(entries, reveal.then(|| session.shift()))?;

    if !reveal && !entries.is_empty() {
        output::tip("Run `credvault list --reveal` to show secrets.");
    }

    Ok(())
}
