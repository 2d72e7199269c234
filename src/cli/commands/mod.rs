//! One module per subcommand. Each exposes an `execute` function that
//! `main` dispatches to.

pub mod add;
pub mod completions;
pub mod delete;
pub mod history;
pub mod list;
