//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use athlete_core::{Error, Result};

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to `info`
pub fn init_tracing() -> Result<()> {
    init_tracing_with("info")
}

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"athlete_live=debug"`).
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing_with(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| Error::Config(format!("tracing already initialized: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever call won, a global subscriber is now installed
        let _ = init_tracing_with("debug");
        assert!(matches!(init_tracing(), Err(Error::Config(_))));
    }
}
