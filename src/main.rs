//! gameshelf CLI entry point
//!
//! Delegates everything to `cli::run` and turns a failure into a JSON error
//! response plus a non-zero exit code.

use gameshelf::cli;

fn main() {
    if let Err(e) = cli::run() {
        if cli::write_error(e.code_str(), e.message()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
