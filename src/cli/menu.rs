//! Interactive text menu.
//!
//! The menu is a small dispatch table: every `MenuCommand` has a title and
//! a handler with the same signature. Handler errors are shown, appended
//! to the error log, and the menu keeps running.

use console::Term;
use dialoguer::{Input, Select};

use crate::cli::commands::{add, delete};
use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::errors::{CredVaultError, Result};

/// What the menu loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

type Handler = fn(&mut Session) -> Result<Flow>;

/// Entries of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Add,
    View,
    Quit,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 3] = [MenuCommand::Add, MenuCommand::View, MenuCommand::Quit];

    pub fn title(self) -> &'static str {
        match self {
            MenuCommand::Add => "Add Credentials",
            MenuCommand::View => "View Credentials",
            MenuCommand::Quit => "Quit",
        }
    }

    fn handler(self) -> Handler {
        match self {
            MenuCommand::Add => add_credentials,
            MenuCommand::View => view_credentials,
            MenuCommand::Quit => quit,
        }
    }
}

/// A line typed on the view screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    Quit,
    Delete(i64),
}

/// Parse `quit` or `delete <n>` (case-insensitive, surrounding blanks
/// ignored). Anything else is `None`.
pub fn parse_view_command(line: &str) -> Option<ViewCommand> {
    let line = line.trim().to_lowercase();
    let mut words = line.split_whitespace();

    match (words.next()?, words.next(), words.next()) {
        ("quit", None, None) => Some(ViewCommand::Quit),
        ("delete", Some(n), None) => n.parse().ok().map(ViewCommand::Delete),
        _ => None,
    }
}

/// Run the menu until the user picks Quit (or presses Esc).
pub fn run(cli: &Cli) -> Result<()> {
    let mut session = Session::open(cli)?;
    let term = Term::stdout();
    let titles: Vec<&str> = MenuCommand::ALL.iter().map(|c| c.title()).collect();

    loop {
        let _ = term.clear_screen();
        output::banner("credvault");

        let choice = Select::new()
            .with_prompt("Select a menu option")
            .items(&titles)
            .default(0)
            .interact_on_opt(&term)
            .map_err(|e| CredVaultError::CommandFailed(format!("menu prompt: {e}")))?;

        let Some(command) = choice.map(|i| MenuCommand::ALL[i]) else {
            return Ok(());
        };

        let _ = term.clear_screen();
        output::banner(command.title());

        match (command.handler())(&mut session) {
            Ok(Flow::Exit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => {
                output::error(&e.to_string());
                tracing::error!(menu = command.title(), "{e}");
                output::tip(&format!(
                    "Details were appended to {}",
                    session.log_path().display()
                ));
            }
        }

        pause(&term)?;
    }
}

fn add_credentials(session: &mut Session) -> Result<Flow> {
    add::interactive(session)?;
    Ok(Flow::Continue)
}

fn view_credentials(session: &mut Session) -> Result<Flow> {
    if session.store.is_empty() {
        output::info("No credentials found. Pick 'Add Credentials' on the menu to create one.");
        return Ok(Flow::Continue);
    }

    output::print_entries_table(session.store.list(), Some(session.shift()))?;
    output::tip("To remove an entry, type 'delete' followed by the entry number (e.g. delete 1).");
    output::tip("Otherwise, type 'quit' to return to the menu.");

    loop {
        let line: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| CredVaultError::CommandFailed(format!("view prompt: {e}")))?;

        match parse_view_command(&line) {
            Some(ViewCommand::Quit) => return Ok(Flow::Continue),
            Some(ViewCommand::Delete(index)) => match delete::remove_entry(session, index) {
                Ok(removed) => {
                    output::success(&format!(
                        "Deleted entry {index} ('{}' on '{}')",
                        removed.username, removed.resource
                    ));
                    return Ok(Flow::Continue);
                }
                Err(CredVaultError::OutOfRange { .. }) => output::warning("Invalid entry index."),
                Err(e) => return Err(e),
            },
            None => output::warning("Invalid input."),
        }
    }
}

fn quit(_session: &mut Session) -> Result<Flow> {
    Ok(Flow::Exit)
}

fn pause(term: &Term) -> Result<()> {
    term.write_line("Press <ENTER> to return to the main menu.")?;
    term.read_line()?;
    Ok(())
}
