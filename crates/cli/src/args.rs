//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Read connection settings from flags or `TOWER_*` environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not handle config loading (see `config_context` module).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tower_mapping::Side;

use crate::commands;

#[derive(Parser)]
#[command(name = "tower-cli")]
#[command(about = "Tower CLI - Map fields between connection schemas", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  tower-cli fields order.json\n  tower-cli automap order.json erp-order.json --export mappings.json\n  tower-cli preview order.json erp-order.json --mappings mappings.json\n  tower-cli schema --source-type shopify --target-type erp\n  tower-cli test --connection c1 --source-type shopify --target-type erp\n  tower-cli -o json connections list\n"
)]
pub struct Cli {
    /// Base URL of the Tower server (e.g., https://tower.example.com)
    #[arg(short, long, global = true, env = "TOWER_BASE_URL")]
    pub base_url: Option<String>,

    /// Username for session token authentication
    #[arg(short, long, global = true, env = "TOWER_USERNAME")]
    pub username: Option<String>,

    /// Password for session token authentication
    #[arg(short, long, global = true, env = "TOWER_PASSWORD")]
    pub password: Option<String>,

    /// API token for authentication (preferred over username/password)
    #[arg(short, long, global = true, env = "TOWER_API_TOKEN")]
    pub api_token: Option<String>,

    /// Connection timeout in seconds
    #[arg(long, global = true, env = "TOWER_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Maximum number of retries for rate-limited requests
    #[arg(long, global = true, env = "TOWER_MAX_RETRIES")]
    pub max_retries: Option<usize>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true, env = "TOWER_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// Maximum nesting depth followed when extracting fields
    #[arg(long, global = true, env = "TOWER_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Disable the client-side response cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Output format (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    pub output: String,

    /// Output file path (saves results to file instead of stdout)
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Path to a JSON configuration file.
    ///
    /// Can also be set via TOWER_CONFIG_PATH environment variable.
    #[arg(long, global = true, env = "TOWER_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Log line format on stderr. Levels come from RUST_LOG.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the fields extracted from a sample JSON document
    Fields {
        /// Sample document
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Which side the document describes (source, target)
        #[arg(long, default_value = "source")]
        side: Side,
    },

    /// Propose mappings between two sample documents by field name
    Automap {
        /// Source sample document
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Target sample document
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Write the proposed mappings to this file
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },

    /// Render the target document locally from a source sample
    Preview {
        /// Source sample document
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Target sample document
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Exported mappings to apply (auto-mapped when omitted)
        #[arg(long, value_name = "FILE")]
        mappings: Option<PathBuf>,
    },

    /// Fetch sample documents and saved mappings from the server
    Schema {
        /// Source connection type (e.g., 'shopify')
        #[arg(long)]
        source_type: String,

        /// Target connection type (e.g., 'erp')
        #[arg(long)]
        target_type: String,
    },

    /// Run a mapping set against the connection's sample data on the server
    Test(RemoteMappingArgs),

    /// Save a mapping set for a connection
    Save(RemoteMappingArgs),

    /// List and inspect connections
    Connections {
        #[command(subcommand)]
        command: commands::connections::ConnectionsCommand,
    },
}

/// Arguments shared by commands that send a mapping set to the server.
#[derive(Debug, Clone, Args)]
pub struct RemoteMappingArgs {
    /// Connection id
    #[arg(long)]
    pub connection: String,

    /// Source connection type
    #[arg(long)]
    pub source_type: String,

    /// Target connection type
    #[arg(long)]
    pub target_type: String,

    /// Exported mappings to use instead of the saved ones
    #[arg(long, value_name = "FILE")]
    pub mappings: Option<PathBuf>,
}

impl Commands {
    /// Whether the command talks to the server and so needs connection settings.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Commands::Schema { .. }
                | Commands::Test(_)
                | Commands::Save(_)
                | Commands::Connections { .. }
        )
    }
}
