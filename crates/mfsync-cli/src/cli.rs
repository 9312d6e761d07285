use clap::{Args, Parser, Subcommand, ValueEnum};
use mfsync_core::model::ResourceFilter;
use std::path::PathBuf;

/// Metafield and Metaobject Synchronization Tool
///
/// List, copy, replace and delete metafield definitions, metaobject definitions and
/// metaobject entries between stores
#[derive(Parser, Debug)]
#[command(name = "mfsync")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preview changes without executing (dry-run)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Skip confirmations and update conflicting entries without prompting
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Use specific config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a markdown listing of a store's definitions (usable as a manifest)
    List {
        /// Store to list
        #[arg(long, value_name = "NAME")]
        store: String,

        /// Definition kinds to include
        #[arg(long, value_enum, default_value = "all")]
        resources: Resources,

        /// Count the entries of each metaobject definition
        #[arg(long)]
        entries: bool,

        /// Write the listing to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Copy definitions (and optionally entries) from one store to another
    Copy(TransferArgs),

    /// Delete definitions (and optionally entries) from a store
    Delete {
        /// Store to delete from
        #[arg(long, value_name = "NAME")]
        store: String,

        /// Definition kinds to include
        #[arg(long, value_enum, default_value = "all")]
        resources: Resources,

        /// Only delete the definitions listed in this manifest
        #[arg(short, long, value_name = "PATH")]
        manifest: Option<PathBuf>,

        /// Delete metaobject entries before their definitions
        #[arg(long)]
        entries: bool,
    },

    /// Replace definitions on the target: delete them there, then copy from the source
    Bulk(TransferArgs),
}

/// Arguments shared by `copy` and `bulk`
#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Store to read from
    #[arg(long, value_name = "NAME")]
    pub from: String,

    /// Store to write to
    #[arg(long, value_name = "NAME")]
    pub to: String,

    /// Definition kinds to include
    #[arg(long, value_enum, default_value = "all")]
    pub resources: Resources,

    /// Only transfer the definitions listed in this manifest
    #[arg(short, long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Also copy metaobject entries
    #[arg(long)]
    pub entries: bool,

    /// What to do with entries that differ between the stores
    #[arg(long, value_enum, default_value = "prompt")]
    pub conflict: ConflictMode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Resources {
    /// Metafield definitions
    Fields,
    /// Metaobject definitions
    Objects,
    /// Both kinds (default)
    All,
}

impl Resources {
    pub const fn filter(self) -> ResourceFilter {
        match self {
            Self::Fields => ResourceFilter::Fields,
            Self::Objects => ResourceFilter::Objects,
            Self::All => ResourceFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictMode {
    /// Ask for each conflicting entry (default)
    Prompt,
    /// Overwrite the target entry
    Update,
    /// Keep the target entry
    Skip,
}
