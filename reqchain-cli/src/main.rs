use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;
mod utils;

pub use args::*;
use commands::{Command, WorkflowsCommand};

#[derive(Debug, Parser)]
#[command(name = "reqchain", version, about = "Run chained HTTP API workflows")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Run {
            path,
            events,
            output,
            policy,
        } => cmd::run::run_cmd(&path, events, output, policy).await,
        Command::Validate { path, output } => cmd::validate::validate_cmd(&path, output).await,
        Command::Export {
            path,
            as_format,
            output,
        } => cmd::export::export_cmd(&path, as_format, output).await,
        Command::Migrate { store, output } => cmd::migrate::migrate_cmd(store, output).await,
        Command::Workflows { action } => match action {
            WorkflowsCommand::List { store, output } => {
                cmd::workflows::list_cmd(store, output).await
            }
            WorkflowsCommand::Import {
                path,
                store,
                output,
            } => cmd::workflows::import_cmd(&path, store, output).await,
            WorkflowsCommand::Show { id, store, output } => {
                cmd::workflows::show_cmd(&id, store, output).await
            }
            WorkflowsCommand::Export {
                id,
                as_format,
                store,
                output,
            } => cmd::workflows::export_cmd(&id, as_format, store, output).await,
            WorkflowsCommand::Delete { id, store, output } => {
                cmd::workflows::delete_cmd(&id, store, output).await
            }
            WorkflowsCommand::Run {
                id,
                events,
                store,
                output,
                policy,
            } => cmd::workflows::run_cmd(&id, events, store, output, policy).await,
        },
    }
}
