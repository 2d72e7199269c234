//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command and the menu.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::errors::Result;
use crate::vault::Entry;

/// Shown instead of a secret when it is not being revealed. Fixed width
/// so the table does not leak the secret's length.
const MASK: &str = "********";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a framed title line, used by the menu screens.
pub fn banner(title: &str) {
    let rule = "=".repeat(title.chars().count() + 6);
    println!("{}", style(&rule).cyan());
    println!("{} {} {}", style("||").cyan(), style(title).bold(), style("||").cyan());
    println!("{}", style(&rule).cyan());
}

/// Print a table of credentials (#, Username, Secret, Resource).
///
/// Secrets are masked unless `reveal_shift` is given, in which case each
/// one is decrypted with that shift.
pub fn print_entries_table(entries: &[Entry], reveal_shift: Option<i64>) -> Result<()> {
    if entries.is_empty() {
        info("No credentials in this vault yet.");
        tip("Run `credvault add` to store your first credential.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Username", "Secret", "Resource"]);

    for (index, entry) in entries.iter().enumerate() {
        let secret = match reveal_shift {
            Some(shift) => entry.reveal(shift)?,
            None => MASK.to_string(),
        };
        table.add_row(vec![
            index.to_string(),
            entry.username.clone(),
            secret,
            entry.resource.clone(),
        ]);
    }

    println!("{table}");
    Ok(())
}
