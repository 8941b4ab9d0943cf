//! Logging bootstrap for the bookstore service.

use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use bookstore_kernel::settings::{LogFormat, TelemetrySettings};

/// Crates whose logs follow the configured level.
const FILTERED_TARGETS: &[&str] = &[
    "bookstore_app",
    "bookstore_cli",
    "bookstore_db",
    "bookstore_http",
    "bookstore_kernel",
    "bookstore_telemetry",
    "tower_http",
];

/// Build the filter directive for the configured level.
///
/// `RUST_LOG` takes precedence when it is set.
pub fn filter_directive(level: &str) -> String {
    let mut directive = String::from("warn");
    for target in FILTERED_TARGETS {
        directive.push_str(&format!(",{target}={level}"));
    }
    directive
}

/// Install the global tracing subscriber.
///
/// A subscriber that is already installed (tests, embedding) is kept and
/// reported at debug level.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directive(&settings.level))
            .with_context(|| format!("invalid log level '{}'", settings.level))?,
    };

    let fmt_layer = match settings.log_format {
        LogFormat::Pretty => fmt::layer().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
    {
        tracing::debug!(%err, "tracing subscriber already installed");
        return Ok(());
    }

    tracing::info!(
        target: "bookstore_telemetry",
        level = %settings.level,
        format = ?settings.log_format,
        "telemetry initialized"
    );

    Ok(())
}
