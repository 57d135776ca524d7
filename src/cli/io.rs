//! Record input and report output for the CLI
//!
//! - Input: one JSON record per line, from a file or stdin
//! - Output: text or one JSON object per record
//! - UTF-8 only

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use serde_json::json;

use crate::engine::ValidationError;
use crate::report::ValidationReport;

use super::errors::{CliError, CliResult};

/// Opens the record source: the given file, or stdin
pub fn open_records(path: Option<&Path>) -> CliResult<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                CliError::io_error(format!("Failed to open records '{}': {}", path.display(), e))
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Writes a report as text
pub fn write_text_report<W: Write>(out: &mut W, index: usize, report: &ValidationReport) -> CliResult<()> {
    if report.is_valid() {
        writeln!(out, "record {}: valid", index)?;
        return Ok(());
    }

    writeln!(out, "record {}: invalid", index)?;
    for violation in report {
        writeln!(out, "  - {}", violation)?;
    }
    Ok(())
}

/// Writes a report as a single JSON line
pub fn write_json_report<W: Write>(out: &mut W, index: usize, report: &ValidationReport) -> CliResult<()> {
    let line = json!({
        "record": index,
        "valid": report.is_valid(),
        "violations": report.violations(),
    });

    serde_json::to_writer(&mut *out, &line)?;
    writeln!(out)?;
    Ok(())
}

/// Writes a record that could not be validated as text
pub fn write_text_rejection<W: Write>(out: &mut W, index: usize, error: &ValidationError) -> CliResult<()> {
    writeln!(out, "record {}: invalid", index)?;
    writeln!(out, "  - {}", error)?;
    Ok(())
}

/// Writes a record that could not be validated as a single JSON line
pub fn write_json_rejection<W: Write>(out: &mut W, index: usize, error: &ValidationError) -> CliResult<()> {
    let line = json!({
        "record": index,
        "valid": false,
        "violations": [],
        "error": { "code": error.code(), "message": error.to_string() },
    });

    serde_json::to_writer(&mut *out, &line)?;
    writeln!(out)?;
    Ok(())
}
