use clap::Parser;
use owo_colors::{OwoColorize, Style};
use recur_core::error::CoreError;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    if let Err(e) = dispatch(cli.command, &config).await {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn dispatch(command: cli::Commands, config: &config::Config) -> anyhow::Result<()> {
    match command {
        cli::Commands::Run(command) => commands::run::run_once(config, command).await,
        cli::Commands::Watch(command) => commands::watch::watch(config, command).await,
        cli::Commands::Lists => commands::lists::show_lists(&commands::editor(config)?).await,
        cli::Commands::Tasks(command) => {
            commands::tasks::show_tasks(&commands::editor(config)?, command).await
        }
        cli::Commands::Add(command) => commands::add::add_task(&commands::editor(config)?, command).await,
        cli::Commands::Edit(command) => {
            commands::edit::edit_task(&commands::editor(config)?, command).await
        }
    }
}

/// Logs go to stderr so command output stays clean on stdout.
fn init_tracing(verbose: bool) {
    let default = if verbose { "recur=debug" } else { "recur=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::Authentication(s) => {
                eprintln!("{} Not authenticated: {}", "Error:".style(error_style), s);
                eprintln!(
                    "Set {} or {} (or [store] in recur.toml).",
                    "RECUR_STORE__ACCESS_TOKEN".yellow(),
                    "RECUR_STORE__TOKEN_FILE".yellow()
                );
            }
            CoreError::AmbiguousList(lists) => {
                eprintln!("{}", "Error: Ambiguous list.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, title) in lists {
                    eprintln!("  {} ({})", id.yellow(), title);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
