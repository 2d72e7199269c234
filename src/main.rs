use clap::Parser;
use credvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    // Without a subscriber events are dropped; the command still runs.
    let _ = credvault::logging::init(credvault::cli::log_file(&cli));

    let result = match &cli.command {
        None | Some(Commands::Menu) => credvault::cli::menu::run(&cli),
        Some(Commands::Add {
            username,
            resource,
            secret,
            force,
        }) => credvault::cli::commands::add::execute(
            &cli,
            username.as_deref(),
            resource.as_deref(),
            secret.as_deref(),
            *force,
        ),
        Some(Commands::List { reveal }) => credvault::cli::commands::list::execute(&cli, *reveal),
        Some(Commands::Delete { index, force }) => {
            credvault::cli::commands::delete::execute(&cli, *index, *force)
        }
        Some(Commands::History { last, since, event }) => {
            credvault::cli::commands::history::execute(&cli, *last, since.as_deref(), *event)
        }
        Some(Commands::Completions { shell }) => {
            credvault::cli::commands::completions::execute(*shell)
        }
    };

    if let Err(e) = result {
        credvault::cli::output::error(&e.to_string());
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
