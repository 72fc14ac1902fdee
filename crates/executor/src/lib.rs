//! Worker pools for the diplo pipeline.
//!
//! ## Available Executors
//!
//! - [`RayonExecutor`]: Dedicated fixed-size thread pool (feature: `rayon`)
//! - [`SyncExecutor`]: Sequential execution (re-exported from diplo-traits)
//!
//! ## Usage
//!
//! ```ignore
//! use diplo_executor::ExecutorImpl;
//! use diplo_traits::Executor;
//!
//! let executor = ExecutorImpl::with_threads(4)?;
//! let results = executor.execute_all(vec![1, 2, 3], |x| x * 2);
//! ```

#[cfg(feature = "rayon")]
mod rayon_executor;

#[cfg(feature = "rayon")]
pub use rayon_executor::RayonExecutor;

pub use diplo_traits::{Executor, ExecutorError, SyncExecutor};

/// A type-erased executor that wraps concrete executor implementations.
///
/// The `Executor` trait has generic methods and cannot be used as a trait
/// object, so the pipeline holds this enum instead.
#[derive(Clone, Debug)]
pub enum ExecutorImpl {
    /// Sequential executor (no parallelism)
    Sync(SyncExecutor),

    /// Dedicated rayon thread pool
    #[cfg(feature = "rayon")]
    Rayon(RayonExecutor),
}

impl ExecutorImpl {
    /// Builds the default executor for the requested pool size.
    ///
    /// `0` means one worker per available CPU.
    pub fn with_threads(threads: usize) -> Result<Self, ExecutorError> {
        #[cfg(feature = "rayon")]
        {
            RayonExecutor::with_threads(threads).map(ExecutorImpl::Rayon)
        }
        #[cfg(not(feature = "rayon"))]
        {
            let _ = threads;
            Ok(ExecutorImpl::Sync(SyncExecutor::new()))
        }
    }
}

impl Executor for ExecutorImpl {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        match self {
            ExecutorImpl::Sync(exec) => exec.execute_all(items, f),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.execute_all(items, f),
        }
    }

    fn parallelism(&self) -> usize {
        match self {
            ExecutorImpl::Sync(exec) => exec.parallelism(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.parallelism(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ExecutorImpl::Sync(exec) => exec.name(),
            #[cfg(feature = "rayon")]
            ExecutorImpl::Rayon(exec) => exec.name(),
        }
    }
}

impl Default for ExecutorImpl {
    fn default() -> Self {
        ExecutorImpl::Sync(SyncExecutor::new())
    }
}
