use crate::error::{Error, Result};
use core::time::Duration;

/// Settings for one pipeline run.
///
/// The defaults describe the reference scenario: three workers, five jobs,
/// queues of five, a two second deadline and 100ms per item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of workers spawned by the pool.
    pub num_workers: usize,
    /// Number of sequential work items produced (`1..=num_jobs`).
    pub num_jobs: u64,
    /// Capacity of both the input and the output queue.
    pub queue_capacity: usize,
    /// Time after which the cancel signal fires.
    pub deadline: Duration,
    /// Simulated processing time per item.
    pub latency: Duration,
}

impl PoolConfig {
    pub const DEFAULT_WORKERS: usize = 3;
    pub const DEFAULT_JOBS: u64 = 5;
    pub const DEFAULT_QUEUE_CAPACITY: usize = 5;
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(2);
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(100);

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if there are no workers or the queues
    /// have no capacity. A zero deadline is accepted and cancels immediately.
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "num_workers must be greater than 0".to_string(),
            });
        }

        // Tokio panics on zero-capacity bounded channels.
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "queue_capacity must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_workers: Self::DEFAULT_WORKERS,
            num_jobs: Self::DEFAULT_JOBS,
            queue_capacity: Self::DEFAULT_QUEUE_CAPACITY,
            deadline: Self::DEFAULT_DEADLINE,
            latency: Self::DEFAULT_LATENCY,
        }
    }
}
