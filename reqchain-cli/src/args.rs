use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// Postgres URL; falls back to REQCHAIN_DATABASE_URL, then DATABASE_URL.
    #[arg(long)]
    pub store: Option<String>,
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,
}

#[derive(Debug, Args, Clone)]
pub struct PolicyArgs {
    /// Restrict requests to these hosts and their subdomains.
    #[arg(long = "allow-host")]
    pub allow_hosts: Vec<String>,
    #[arg(long)]
    pub allow_hosts_file: Option<PathBuf>,
    /// Permit loopback and private-range destinations.
    #[arg(long)]
    pub allow_private_networks: bool,
    #[arg(long, default_value_t = 5)]
    pub max_redirects: usize,
    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 30000)]
    pub timeout: u64,
    #[arg(long, default_value_t = 10_485_760)]
    pub max_response_bytes: usize,
    #[arg(long, default_value = "X-API-Key")]
    pub api_key_header: String,
    /// Record non-2xx responses as successful steps.
    #[arg(long)]
    pub no_fail_on_error_status: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EventsMode {
    #[default]
    None,
    Stdout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportAs {
    #[default]
    Json,
    Yaml,
}

impl From<ExportAs> for reqchain_core::ExportFormat {
    fn from(value: ExportAs) -> Self {
        match value {
            ExportAs::Json => reqchain_core::ExportFormat::Json,
            ExportAs::Yaml => reqchain_core::ExportFormat::Yaml,
        }
    }
}
