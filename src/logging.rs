//! Process logging setup.
//!
//! Level resolution, first match wins:
//!
//! 1. `--log-level` on the command line
//! 2. `RUST_LOG` in the environment (full `EnvFilter` syntax)
//! 3. `log-level` in the settings file
//!
//! Logs go to stderr so `--dry-run` output on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Map a settings-style level name to a `tracing` directive.
pub fn directive(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warning" | "warn" => "warn",
        "error" | "fatal" => "error",
        _ => "info",
    }
}

/// Build the filter from the three level sources.
pub fn filter(
    flag: Option<&str>,
    env: Option<&str>,
    settings: &str,
) -> EnvFilter {
    if let Some(level) = flag {
        return EnvFilter::new(directive(level));
    }
    if let Some(env) = env.filter(|e| !e.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(env) {
            return filter;
        }
    }
    EnvFilter::new(directive(settings))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(
    flag: Option<&str>,
    settings: &str,
) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter(flag, env.as_deref(), settings);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
