use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber from the `RUST_LOG`
/// environment variable.
///
/// Diagnostics go to stderr so stdout stays machine-readable with `--json`.
/// Set e.g. `RUST_LOG=gavel=debug` for per-step detail.
pub fn subscriber() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
