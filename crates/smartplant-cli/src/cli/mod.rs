use clap::{Args, Parser, Subcommand};
use smartplant_config::BackendKind;

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `smartplant` binary.
#[derive(Debug, Parser)]
#[command(
    name = "smartplant",
    version,
    about = "SmartPlant - inspect and maintain plant-care storage"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Storage backend, overriding `storage.backend` (memory, key_value, sql)
    #[arg(short, long, global = true)]
    pub backend: Option<BackendKind>,

    /// Storage namespace, overriding `storage.namespace`
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            backend: self.backend,
            namespace: self.namespace.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Hydrate the store and report what was loaded, migrated or dropped.
    Status,
    /// List plants with their resolved species profiles.
    Plants,
    /// List cached species entries with TTL metadata.
    Species,
    /// Remove species cache entries whose TTL has elapsed.
    Purge(PurgeArgs),
    /// Wipe all plant and species data in the namespace.
    Clear(ClearArgs),
    /// Print the JSON Schema of a persisted shape.
    Schema(SchemaArgs),
}

/// Arguments for `smartplant purge`.
#[derive(Clone, Debug, Args)]
pub struct PurgeArgs {
    /// Reference instant (RFC 3339) instead of the current time.
    #[arg(long)]
    pub at: Option<String>,
}

/// Arguments for `smartplant clear`.
#[derive(Clone, Debug, Args)]
pub struct ClearArgs {
    /// Confirm the wipe.
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for `smartplant schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name, e.g. `plants_payload`.
    #[arg(required_unless_present = "list")]
    pub name: Option<String>,

    /// List available schema names.
    #[arg(long, conflicts_with = "name")]
    pub list: bool,
}
