#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr; stdout carries nothing but frames.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    if let Err(error) = marquee::run_from_env() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
