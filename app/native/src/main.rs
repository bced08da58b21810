//! Casement diagnostic CLI.
//!
//! Runs the geometry and animation engine against an in-memory desktop. Log
//! output goes to stderr and is filtered by `CASEMENT_LOG`, then `RUST_LOG`.

use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = std::env::var("CASEMENT_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() {
    init_tracing();

    if let Err(err) = casement::cli::run() {
        eprintln!("casement: {err}");
        std::process::exit(1);
    }
}
