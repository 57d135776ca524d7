//! fieldguard CLI entry point
//!
//! Exit status:
//! - 0: every record is valid
//! - 1: at least one record is invalid
//! - 2: configuration, schema, input or provider error

use fieldguard::cli;

fn main() {
    match cli::run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    }
}
