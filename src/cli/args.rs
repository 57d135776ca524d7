//! CLI argument definitions using clap
//!
//! Commands:
//! - fieldguard check --schema <path> [--config <path>] [--records <path>] [--json]
//! - fieldguard rules <annotation>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fieldguard - declarative record validation
#[derive(Parser, Debug)]
#[command(name = "fieldguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate JSON records (one per line) against a schema file
    Check {
        /// Path to the schema file
        #[arg(long)]
        schema: PathBuf,

        /// Path to a validation config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to the records file (stdin when absent)
        #[arg(long)]
        records: Option<PathBuf>,

        /// Print one JSON report per record
        #[arg(long)]
        json: bool,
    },

    /// Parse a rule annotation and print its rules, one per line
    Rules {
        /// Annotation such as "required,min=2,max=64"
        annotation: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
