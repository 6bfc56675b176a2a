use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `APPDOC_LOG=appdoc=debug`.
pub const LOG_ENV: &str = "APPDOC_LOG";

/// Initialize the tracing subscriber once; later calls are no-ops.
///
/// Falls back to `appdoc=info` when `APPDOC_LOG` is unset or invalid.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("appdoc=info"));

        // Another subscriber may already be installed by an embedding application.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    });
}
