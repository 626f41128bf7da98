use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Used when `SCPGEN_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn,scpgen=info,runner=info";

/// Reads `SCPGEN_LOG` (e.g. `SCPGEN_LOG=runner=debug`), falling back to [`DEFAULT_FILTER`].
/// Logs go to stderr so the summary on stdout stays machine readable.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("SCPGEN_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .init();
}
