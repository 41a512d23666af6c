use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a workflow file and execute it.
    Run {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = EventsMode::None)]
        events: EventsMode,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Check a workflow file and list unresolved variable references.
    Validate {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Re-export a workflow file in normalized form.
    Export {
        path: PathBuf,
        #[arg(long = "as", value_enum, default_value_t = ExportAs::Json)]
        as_format: ExportAs,
        #[command(flatten)]
        output: OutputArgs,
    },
    Migrate {
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Manage workflows kept in Postgres.
    Workflows {
        #[command(subcommand)]
        action: WorkflowsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum WorkflowsCommand {
    List {
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    Import {
        path: PathBuf,
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    Show {
        id: String,
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    Export {
        id: String,
        #[arg(long = "as", value_enum, default_value_t = ExportAs::Json)]
        as_format: ExportAs,
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    Delete {
        id: String,
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    Run {
        id: String,
        #[arg(long, value_enum, default_value_t = EventsMode::None)]
        events: EventsMode,
        #[command(flatten)]
        store: StoreArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        policy: PolicyArgs,
    },
}
