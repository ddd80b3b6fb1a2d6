// Logging — powered by tracing-subscriber
//
// Diagnostics go to stderr so stdout stays clean for command output
// (`list --format json`, `export` without `--out`).

use tracing_subscriber::EnvFilter;

/// Build the filter from the configured level, keeping third-party crates
/// quiet unless asked for explicitly.
fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let directives = [level, "csv=warn"].join(",");
    EnvFilter::try_new(&directives)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", directives, e))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = build_env_filter(level)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}
