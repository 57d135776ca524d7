//! Command line interface for fieldguard
//!
//! Commands:
//! - `check`: validate JSON records against a schema file
//! - `rules`: print the normalized rules of an annotation
//!
//! Reports go to stdout; logs go to stderr, filtered by `FIELDGUARD_LOG`.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, load_config, rules, run, run_command, CheckSummary, LOG_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{
    open_records, write_json_rejection, write_json_report, write_text_rejection, write_text_report,
};
