//! `credvault history`: show the change journal.
//!
//! ```text
//! credvault history                    # last 50 changes
//! credvault history --event reset      # only resets, with their cause
//! credvault history --since 2w --last 10
//! ```

use chrono::{DateTime, TimeDelta, Utc};

use crate::cli::Cli;
use crate::errors::{CredVaultError, Result};
use crate::journal::EventKind;

/// Execute the `history` command.
#[cfg(feature = "journal")]
pub fn execute(
    cli: &Cli,
    last: usize,
    since: Option<&str>,
    event: Option<EventKind>,
) -> Result<()> {
    use crate::cli::{load_settings, output};
    use crate::journal::{Journal, JournalQuery};

    let query = JournalQuery {
        limit: last,
        since: since.map(parse_since).transpose()?,
        kind: event,
    };

    let cwd = std::env::current_dir()?;
    let path = load_settings(cli, &cwd)?.journal_path(&cwd);
    if !path.exists() {
        output::info("The vault has no recorded changes yet.");
        return Ok(());
    }

    let records = Journal::open(&path)?.query(&query)?;
    if records.is_empty() {
        output::info("No changes match.");
        return Ok(());
    }

    print_history(&records);
    Ok(())
}

/// Execute the `history` command in a build without the journal.
#[cfg(not(feature = "journal"))]
pub fn execute(
    _cli: &Cli,
    _last: usize,
    since: Option<&str>,
    _event: Option<EventKind>,
) -> Result<()> {
    since.map(parse_since).transpose()?;
    Err(CredVaultError::CommandFailed(
        "credvault was built without the `journal` feature".into(),
    ))
}

/// Turn `30m`, `12h`, `7d` or `2w` into the instant that long ago.
fn parse_since(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        CredVaultError::CommandFailed(format!(
            "invalid --since value '{input}'; expected a count and a unit (m, h, d, w), e.g. 7d"
        ))
    };

    let Some(unit) = input.chars().last() else {
        return Err(invalid());
    };
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;

    let span = match unit {
        'm' => TimeDelta::try_minutes(amount),
        'h' => TimeDelta::try_hours(amount),
        'd' => TimeDelta::try_days(amount),
        'w' => TimeDelta::try_weeks(amount),
        _ => return Err(invalid()),
    };

    span.and_then(|span| Utc::now().checked_sub_signed(span))
        .ok_or_else(|| {
            CredVaultError::CommandFailed(format!("--since value '{input}' is too far back"))
        })
}

#[cfg(feature = "journal")]
fn print_history(records: &[crate::journal::JournalRecord]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["When", "Change", "Entry", "Credential", "Entries after", "Cause"]);

    for record in records {
        let kind = match record.kind {
            EventKind::Created | EventKind::Added => style(record.kind).green(),
            EventKind::Overwritten => style(record.kind).cyan(),
            EventKind::Deleted => style(record.kind).red(),
            EventKind::Reset => style(record.kind).yellow().bold(),
        };

        table.add_row(vec![
            record.at.format("%Y-%m-%d %H:%M:%S").to_string(),
            kind.to_string(),
            record.index.map_or_else(|| "-".into(), |i| i.to_string()),
            record.label.clone().unwrap_or_else(|| "-".into()),
            record.entries_after.to_string(),
            record.cause.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");
}
