//! # Logging
//!
//! Installs a `tracing_subscriber` registry that prints spans and events to
//! the console. The verbosity defaults to `info` and follows `RUST_LOG` when
//! it is set:
//!
//! ```bash
//! RUST_LOG=workpool=trace,workpool_demo=debug cargo run --bin workpool-demo
//! ```
//!
//! Set `LOG_FORMAT=json` to emit one JSON object per line instead of the
//! pretty, multi-line format.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_thread_ids(true)
                    .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339()),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                    .with_file(true)
                    .pretty(),
            )
            .try_init()?;
    }

    Ok(())
}
