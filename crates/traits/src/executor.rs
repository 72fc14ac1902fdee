//! Executor trait for abstracting the worker pool.
//!
//! Export and render rounds hand a batch of independent jobs to an executor
//! and block until every job has finished. Whether the jobs run on a thread
//! pool or one after another is the executor's business.

use std::fmt::Debug;
use thiserror::Error;

/// Error type for executor construction.
#[derive(Error, Debug, Clone)]
#[error("Executor error: {message}")]
pub struct ExecutorError {
    pub message: String,
}

impl ExecutorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A trait for executing work items, potentially in parallel.
///
/// # Implementations
///
/// - `SyncExecutor`: Sequential execution, no threading (always available)
/// - `RayonExecutor`: Fixed-size thread pool (`diplo-executor`)
pub trait Executor: Send + Sync + Debug {
    /// Execute a batch of work items, potentially in parallel.
    ///
    /// The call returns once every item has been processed. Results are
    /// returned in the same order as the input items.
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static;

    /// Returns the number of jobs that may run at the same time.
    fn parallelism(&self) -> usize;

    /// Returns a human-readable name for this executor (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A synchronous executor that processes items sequentially.
#[derive(Debug, Clone, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SyncExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SyncExecutor"
    }
}
