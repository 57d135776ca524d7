//! CLI command implementations
//!
//! `check` streams records through a validator built from the schema file;
//! `rules` prints the normalized form of an annotation.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::engine::{ErrorKind, ValidationConfig, Validator};
use crate::providers::DisposableBlockList;
use crate::rules::parse_rules;
use crate::schema::{LoadedSchema, SchemaLoader};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{
    open_records, write_json_rejection, write_json_report, write_text_rejection, write_text_report,
};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FIELDGUARD_LOG";

/// Load a validation config file
pub fn load_config(path: &Path) -> CliResult<ValidationConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
}

/// Outcome of a `check` run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Records read
    pub records: usize,
    /// Records with at least one violation
    pub invalid: usize,
}

impl CheckSummary {
    pub fn all_valid(&self) -> bool {
        self.invalid == 0
    }
}

/// Main CLI entry point.
///
/// Returns whether every checked record was valid.
pub fn run() -> CliResult<bool> {
    let cli = Cli::parse_args();
    init_logging(cli.log_json);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<bool> {
    match cmd {
        Command::Check {
            schema,
            config,
            records,
            json,
        } => {
            let loaded = SchemaLoader::load_file(&schema)?;
            let config = match config {
                Some(path) => load_config(&path)?,
                None => ValidationConfig::default(),
            };
            let input = open_records(records.as_deref())?;
            let stdout = io::stdout();
            let summary = check(&loaded, &config, json, input, &mut stdout.lock())?;
            Ok(summary.all_valid())
        }
        Command::Rules { annotation } => {
            let stdout = io::stdout();
            rules(&annotation, &mut stdout.lock())?;
            Ok(true)
        }
    }
}

/// Validates every JSON record in `input` and writes one report per record.
///
/// Blank lines are ignored. A record whose values do not match the schema's
/// kinds is reported as invalid. A line that is not valid JSON aborts the run.
pub fn check<R: BufRead, W: Write>(
    loaded: &LoadedSchema,
    config: &ValidationConfig,
    json: bool,
    input: R,
    out: &mut W,
) -> CliResult<CheckSummary> {
    let validator = Validator::builder()
        .disposable_classifier(DisposableBlockList::default().with_domains(&loaded.disposable_domains))
        .build();

    let mut summary = CheckSummary::default();

    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record: Value = serde_json::from_str(&line)
            .map_err(|e| CliError::io_error(format!("Invalid record on line {}: {}", line_no + 1, e)))?;

        summary.records += 1;
        let report = match validator.validate(&loaded.schema, &record, config) {
            Ok(report) => report,
            Err(e) if e.kind() == ErrorKind::Record => {
                summary.invalid += 1;
                if json {
                    write_json_rejection(out, summary.records, &e)?;
                } else {
                    write_text_rejection(out, summary.records, &e)?;
                }
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if !report.is_valid() {
            summary.invalid += 1;
        }

        if json {
            write_json_report(out, summary.records, &report)?;
        } else {
            write_text_report(out, summary.records, &report)?;
        }
    }

    out.flush()?;
    info!(
        schema = loaded.schema.name(),
        records = summary.records,
        invalid = summary.invalid,
        "check finished"
    );
    Ok(summary)
}

/// Prints the rules of `annotation`, one per line.
pub fn rules<W: Write>(annotation: &str, out: &mut W) -> CliResult<()> {
    let set = parse_rules(annotation)?;
    debug!(annotation, rules = set.len(), "annotation parsed");

    for rule in &set {
        writeln!(out, "{}", rule)?;
    }
    Ok(())
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    // A subscriber may already be installed when embedded; keep it.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
