//! Worker descriptions built by composition.
//!
//! A [`JobWorker`] holds a [`WorkerKind`] for its identity and adds the type
//! of job it performs. The [`DoWork`] capability is implemented on the outer
//! type and reads through to the inner one.

/// Anything that can describe the work it performs.
pub trait DoWork {
    fn do_work(&self) -> String;
}

/// Identity shared by every kind of worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerKind {
    name: String,
}

impl WorkerKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A named worker bound to one type of job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobWorker {
    kind: WorkerKind,
    job_type: String,
}

impl JobWorker {
    pub fn new(name: impl Into<String>, job_type: impl Into<String>) -> Self {
        Self {
            kind: WorkerKind::new(name),
            job_type: job_type.into(),
        }
    }

    pub const fn kind(&self) -> &WorkerKind {
        &self.kind
    }

    pub fn job_type(&self) -> &str {
        &self.job_type
    }
}

impl DoWork for JobWorker {
    fn do_work(&self) -> String {
        format!("Worker {} doing {} job", self.kind.name(), self.job_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_its_work() {
        let worker = JobWorker::new("John", "processing");
        assert_eq!(worker.do_work(), "Worker John doing processing job");
        assert_eq!(worker.kind().name(), "John");
        assert_eq!(worker.job_type(), "processing");
    }

    #[test]
    fn usable_as_trait_object() {
        let workers: Vec<Box<dyn DoWork>> = vec![
            Box::new(JobWorker::new("Ada", "indexing")),
            Box::new(JobWorker::new("Lin", "compaction")),
        ];
        let described: Vec<_> = workers.iter().map(|w| w.do_work()).collect();
        assert_eq!(
            described,
            vec![
                "Worker Ada doing indexing job",
                "Worker Lin doing compaction job"
            ]
        );
    }
}
