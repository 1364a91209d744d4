#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use clap::Parser;
use config::CliArgs;
use std::sync::Arc;
use telemetry::init_telemetry;
use tokio::signal;
use workpool::{
    CancelSignal, DoWork, Doubler, JobWorker, KeyedStore, PoolConfig, RunReport,
    run_pipeline_until, simulate_failure,
};

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = PoolConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    // 1. Workers, producer and consumer run in the background.
    let cancel = CancelSignal::with_timeout(config.deadline);
    match cancel.deadline() {
        Some(deadline) => tracing::debug!("Cancel signal armed for {:?}", deadline),
        None => tracing::debug!("Cancel signal has no deadline, waiting for interrupt"),
    }
    let pipeline = tokio::spawn({
        let config = config.clone();
        let cancel = cancel.clone();
        async move { run_pipeline_until(&config, Doubler, cancel).await }
    });
    let interrupt = tokio::spawn(release_on_interrupt(cancel));

    // 2. Worker description through the `DoWork` capability.
    let worker = JobWorker::new("John", "processing");
    tracing::info!("{}", worker.do_work());

    // 3. A coded error surfaced one frame up, logged, and left behind.
    if let Err(e) = simulate_failure() {
        tracing::error!("Error occurred: {e}");
    }

    // 4. Shared keyed store.
    store_roundtrip().await;

    // 5. Wait for every result to be collected.
    let report = pipeline.await??;
    interrupt.abort();
    log_summary(&report);

    Ok(())
}

fn log_startup_info(config: &PoolConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting worker pool with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting {} workers for {} jobs (deadline {:?})",
            config.num_workers,
            config.num_jobs,
            config.deadline
        );
    }
}

fn log_summary(report: &RunReport) {
    tracing::info!(
        "Collected {} results in {:?} ({} sent, {} workers cancelled, {} drained)",
        report.results.len(),
        report.elapsed,
        report.sent,
        report.pool.cancelled(),
        report.pool.drained()
    );
}

/// Writes from a spawned task and reads from here without waiting, then
/// reads again once the write is known to have completed.
async fn store_roundtrip() {
    let store: Arc<KeyedStore> = Arc::new(KeyedStore::new());

    let writer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.set("key", 42) })
    };

    // Overlaps the write, so either outcome is fine.
    match store.get("key") {
        Some(value) => tracing::info!("Value: {value}"),
        None => tracing::debug!("Value not written yet"),
    }

    if let Err(e) = writer.await {
        tracing::warn!("Store writer failed: {e}");
        return;
    }

    if let Some(value) = store.get("key") {
        tracing::info!("Value after write: {value}");
    }
}

/// Releases `cancel` early on Ctrl+C or SIGTERM. Returns without doing
/// anything once the signal fires on its own.
async fn release_on_interrupt(cancel: CancelSignal) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    let reason = tokio::select! {
        () = cancel.fired() => return,
        () = ctrl_c => "Ctrl+C",
        () = terminate => "SIGTERM",
    };

    tracing::info!("Received {reason}, releasing cancel signal");
    cancel.release();
}
