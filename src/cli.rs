use std::path::PathBuf;

use clap::{Parser, Subcommand};
use modeldex::{Layer, Locator};

use crate::logging::LogFormat;

/// modeldex - entity index and locator resolution engine
#[derive(Parser, Debug)]
#[command(name = "modeldex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Solution descriptor or the directory holding it
    /// (default: search the working directory and its ancestors)
    #[arg(long, global = true)]
    pub solution: Option<PathBuf>,

    /// Emit the result as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Exit non-zero on any validation error, not just fatal ones
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load, validate and commit the index
    ValidateIndex {
        /// Ignore the previous index and rebuild from scratch
        #[arg(long)]
        full: bool,
    },

    /// Validate the index, then plan generation for stale entities
    RefreshGenerate {
        /// Rebuild from scratch and plan every entity
        #[arg(long)]
        full: bool,
    },

    /// Show one indexed entity
    Lookup {
        #[arg(value_parser = parse_locator)]
        locator: Locator,
    },

    /// List entities that reference an entity
    Dependents {
        #[arg(value_parser = parse_locator)]
        locator: Locator,

        /// Include indirect dependents
        #[arg(long)]
        transitive: bool,
    },

    /// List entities an entity references
    Dependencies {
        #[arg(value_parser = parse_locator)]
        locator: Locator,
    },

    /// List indexed entities
    List {
        /// Only entities in this layer
        #[arg(long)]
        layer: Option<Layer>,
    },

    /// Check whether a layer root holds any entity definitions
    CheckLayer { layer: Layer },

    /// Resolve a reference expression as written in an entity
    Resolve {
        /// Full or partial locator, e.g. `Customer/Customer`
        reference: String,

        /// Entity the reference is written in
        #[arg(long, value_parser = parse_locator)]
        from: Locator,
    },
}

fn parse_locator(s: &str) -> Result<Locator, String> {
    Locator::parse(s).map_err(|e| e.to_string())
}
