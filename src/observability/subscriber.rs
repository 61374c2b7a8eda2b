//! Subscriber setup for embedding applications and tests

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Variable read before `RUST_LOG`
pub const LOG_ENV_VAR: &str = "COHESIONMAP_LOG";

/// Filter from `COHESIONMAP_LOG`, else `RUST_LOG`, else `warn`
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a global fmt subscriber.
///
/// Fails when another global subscriber is already installed.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter())
        .try_init()?;
    Ok(())
}
