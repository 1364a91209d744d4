//! End-to-end run: job source, worker pool and consumer wired together.
//!
//! ```text
//! JobSource ─▶ input queue ─▶ N workers ─▶ output queue ─▶ collect_results
//! ```
//!
//! Every shared resource is created here as a local value and moved into the
//! tasks that use it. The cancel signal is released when the run returns,
//! which also stops its deadline timer.

use crate::{
    config::PoolConfig,
    consumer::collect_results,
    error::{Error, Result},
    pool::{PoolReport, WorkerPool},
    signal::CancelSignal,
    source::JobSource,
    transform::{Doubler, ResultItem, Transform},
};
use core::time::Duration;
use tokio::{sync::mpsc, time::Instant};

/// Outcome of [`run_pipeline`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Results in the order the consumer received them.
    pub results: Vec<ResultItem>,
    /// How each worker exited.
    pub pool: PoolReport,
    /// Items the source managed to enqueue.
    pub sent: usize,
    /// Wall time from the start of the run until the output queue closed.
    pub elapsed: Duration,
}

impl RunReport {
    /// Returns the results sorted ascending, for order-independent checks.
    pub fn sorted_results(&self) -> Vec<ResultItem> {
        let mut results = self.results.clone();
        results.sort_unstable();
        results
    }
}

/// Runs the pipeline with the [`Doubler`] transform.
///
/// # Errors
///
/// Returns an error if `config` is invalid or a task panicked.
pub async fn run_pipeline(config: &PoolConfig) -> Result<RunReport> {
    run_pipeline_with(config, Doubler).await
}

/// Runs the pipeline with a caller-supplied transform and a fresh signal
/// that fires after `config.deadline`.
///
/// # Errors
///
/// Returns an error if `config` is invalid or a task panicked.
pub async fn run_pipeline_with<T>(config: &PoolConfig, transform: T) -> Result<RunReport>
where
    T: Transform,
{
    config.validate()?;
    let signal = CancelSignal::with_timeout(config.deadline);
    run_pipeline_until(config, transform, signal).await
}

/// Runs the pipeline against a signal owned by the caller, who may release
/// it early. `config.deadline` is ignored in favour of the signal's own.
/// The signal is released when this returns.
///
/// # Errors
///
/// Returns an error if `config` is invalid or a task panicked.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(workers = config.num_workers, jobs = config.num_jobs)))]
pub async fn run_pipeline_until<T>(
    config: &PoolConfig,
    transform: T,
    signal: CancelSignal,
) -> Result<RunReport>
where
    T: Transform,
{
    config.validate()?;

    let start = Instant::now();
    let _release = signal.guard();

    let (jobs_tx, jobs_rx) = mpsc::channel(config.queue_capacity);
    let (results_tx, results_rx) = mpsc::channel(config.queue_capacity);

    let pool = WorkerPool::new(config.num_workers, signal.clone()).spawn(
        jobs_rx,
        results_tx,
        transform,
        config.latency,
    );
    let source = JobSource::sequential(config.num_jobs).spawn(jobs_tx);

    let results = collect_results(results_rx).await;
    let elapsed = start.elapsed();
    let pool = pool.join().await?;

    // All workers are gone, so the source has either finished or will fail
    // its next send and stop.
    let sent = source.await.map_err(|e| Error::ChannelError {
        context: format!("Job source failed: {e}"),
    })?;

    #[cfg(feature = "tracing")]
    tracing::info!(
        "Pipeline finished in {:?}: {} results, {} of {} workers cancelled",
        elapsed,
        results.len(),
        pool.cancelled(),
        config.num_workers
    );

    Ok(RunReport {
        results,
        pool,
        sent,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::WorkItem;

    #[tokio::test(start_paused = true)]
    async fn reference_scenario_completes_before_deadline() {
        let config = PoolConfig::default();
        let report = run_pipeline(&config).await.unwrap();

        assert_eq!(report.sorted_results(), vec![2, 4, 6, 8, 10]);
        assert_eq!(report.sent, 5);
        assert_eq!(report.pool.cancelled(), 0);
        assert_eq!(report.pool.drained(), 3);
        // ceil(5 / 3) rounds of 100ms, not one round per item.
        assert!(report.elapsed >= Duration::from_millis(200));
        assert!(report.elapsed < Duration::from_millis(300));
        assert!(report.elapsed < config.deadline);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reference_scenario_on_real_clock() {
        let report = run_pipeline(&PoolConfig::default()).await.unwrap();

        assert_eq!(report.sorted_results(), vec![2, 4, 6, 8, 10]);
        assert!(report.elapsed < PoolConfig::DEFAULT_DEADLINE);
    }

    #[tokio::test]
    async fn zero_deadline_produces_no_results() {
        let config = PoolConfig {
            deadline: Duration::ZERO,
            ..PoolConfig::default()
        };
        let report = run_pipeline(&config).await.unwrap();

        assert!(report.results.is_empty());
        assert_eq!(report.pool.cancelled(), config.num_workers);
        assert!(report.sent <= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_mid_run_bounds_results() {
        let config = PoolConfig {
            num_workers: 1,
            num_jobs: 5,
            deadline: Duration::from_millis(250),
            ..PoolConfig::default()
        };
        let report = run_pipeline(&config).await.unwrap();

        assert_eq!(report.sorted_results(), vec![2, 4, 6]);
        assert_eq!(report.pool.cancelled(), 1);
        assert_eq!(report.sent, 5);
    }

    #[tokio::test]
    async fn custom_transform_and_more_jobs_than_capacity() {
        let config = PoolConfig {
            num_workers: 4,
            num_jobs: 50,
            queue_capacity: 2,
            latency: Duration::ZERO,
            deadline: Duration::from_secs(30),
        };
        let report = run_pipeline_with(&config, |item: WorkItem| item + 1000).await.unwrap();

        let expected: Vec<_> = (1001..=1050).collect();
        assert_eq!(report.sorted_results(), expected);
        assert_eq!(report.pool.processed(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn early_release_stops_the_run() {
        let config = PoolConfig {
            num_workers: 1,
            ..PoolConfig::default()
        };
        let signal = CancelSignal::with_timeout(Duration::from_secs(60));

        let releaser = {
            let signal = signal.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(150)).await;
                signal.release();
            })
        };

        let report = run_pipeline_until(&config, Doubler, signal.clone()).await.unwrap();
        releaser.await.unwrap();

        assert_eq!(report.sorted_results(), vec![2, 4]);
        assert_eq!(report.pool.cancelled(), 1);
        assert!(report.elapsed < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn signal_is_released_when_run_returns() {
        let config = PoolConfig {
            latency: Duration::ZERO,
            ..PoolConfig::default()
        };
        let signal = CancelSignal::with_timeout(Duration::from_secs(60));

        let report = run_pipeline_until(&config, Doubler, signal.clone()).await.unwrap();

        assert_eq!(report.pool.drained(), 3);
        assert!(signal.is_fired());
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let config = PoolConfig {
            num_workers: 0,
            ..PoolConfig::default()
        };
        assert!(matches!(
            run_pipeline(&config).await,
            Err(Error::InvalidConfig { .. })
        ));
    }
}
