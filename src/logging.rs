use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Logs at `info` and above by default; override with `RUST_LOG`, e.g.
/// `RUST_LOG=udpfs=debug`. Diagnostics go to stderr so they never
/// interleave with protocol output on stdout.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
