use clap::Parser;
use core::time::Duration;
use workpool::PoolConfig;

/// Runtime configuration for the `workpool-demo` binary.
///
/// All values are parsed from CLI arguments or environment variables. The
/// defaults reproduce the reference run: three workers sharing five jobs,
/// queues of five, a two second deadline and 100ms of work per item.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "workpool-demo",
    version,
    about = "Runs a cancellable bounded worker pool and logs the results"
)]
pub struct CliArgs {
    /// Number of worker tasks pulling from the shared input queue.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = PoolConfig::DEFAULT_WORKERS)]
    pub num_workers: usize,

    /// Number of work items produced, numbered from 1.
    ///
    /// Environment variable: `NUM_JOBS`
    #[arg(long, env = "NUM_JOBS", default_value_t = PoolConfig::DEFAULT_JOBS)]
    pub num_jobs: u64,

    /// Capacity of the input and output queues.
    ///
    /// The producer waits when the input queue is full, and workers wait when
    /// the output queue is full.
    ///
    /// Environment variable: `QUEUE_CAPACITY`
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = PoolConfig::DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Milliseconds until the cancel signal fires. `0` cancels immediately.
    ///
    /// Environment variable: `DEADLINE_MS`
    #[arg(long, env = "DEADLINE_MS", default_value_t = 2_000)]
    pub deadline_ms: u64,

    /// Simulated processing time per item, in milliseconds.
    ///
    /// Environment variable: `LATENCY_MS`
    #[arg(long, env = "LATENCY_MS", default_value_t = 100)]
    pub latency_ms: u64,
}

impl TryFrom<CliArgs> for PoolConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let config = Self {
            num_workers: args.num_workers,
            num_jobs: args.num_jobs,
            queue_capacity: args.queue_capacity,
            deadline: Duration::from_millis(args.deadline_ms),
            latency: Duration::from_millis(args.latency_ms),
        };
        config.validate()?;

        Ok(config)
    }
}
