//! Diagnostic log setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `opusbridge=debug`.
pub const ENV_LOG: &str = "OPUSBRIDGE_LOG";

const DEFAULT_FILTER: &str = "info";

/// Installs a stderr subscriber filtered by [`ENV_LOG`].
///
/// Does nothing if the host process already installed a global subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
