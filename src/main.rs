//! mysql-inspector entry point
//!
//! Parses arguments, runs the selected command, prints errors to stderr and
//! exits non-zero on failure. All wiring lives in the CLI module.

use mysql_inspector::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
