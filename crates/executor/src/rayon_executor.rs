//! Rayon-based parallel executor.

use diplo_traits::{Executor, ExecutorError};
use rayon::prelude::*;
use std::sync::Arc;

/// A parallel executor backed by a dedicated rayon thread pool.
///
/// Unlike rayon's global pool, the dedicated pool bounds the number of
/// renderer subprocesses running at the same time to exactly the configured
/// size, regardless of what else in the process uses rayon.
///
/// Results come back in input order.
///
/// # Example
///
/// ```ignore
/// use diplo_executor::RayonExecutor;
/// use diplo_traits::Executor;
///
/// let executor = RayonExecutor::with_threads(4)?;
/// let results = executor.execute_all(vec![1, 2, 3], |x| x * 2);
/// assert_eq!(results, vec![2, 4, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct RayonExecutor {
    pool: Arc<rayon::ThreadPool>,
    num_threads: usize,
}

impl RayonExecutor {
    /// Creates an executor with one worker per available CPU.
    pub fn new() -> Result<Self, ExecutorError> {
        Self::with_threads(0)
    }

    /// Creates an executor with `threads` workers; `0` autodetects.
    pub fn with_threads(threads: usize) -> Result<Self, ExecutorError> {
        let num_threads = if threads == 0 {
            num_cpus::get()
        } else {
            threads
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("diplo-worker-{i}"))
            .build()
            .map_err(|e| ExecutorError::new(e.to_string()))?;
        log::debug!("Started worker pool with {} threads", num_threads);
        Ok(Self {
            pool: Arc::new(pool),
            num_threads,
        })
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        self.pool
            .install(move || items.into_par_iter().map(f).collect())
    }

    fn parallelism(&self) -> usize {
        self.num_threads
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_rayon_executor_preserves_order() {
        let executor = RayonExecutor::with_threads(4).unwrap();
        let results = executor.execute_all((1..=50).collect::<Vec<_>>(), |x| x * 2);
        assert_eq!(results, (1..=50).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_threads_autodetects() {
        let executor = RayonExecutor::new().unwrap();
        assert_eq!(executor.parallelism(), num_cpus::get());
        assert!(executor.parallelism() > 0);
    }

    #[test]
    fn test_pool_bounds_concurrency() {
        let executor = RayonExecutor::with_threads(2).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let _ = executor.execute_all((0..20).collect::<Vec<_>>(), {
            let running = running.clone();
            let peak = peak.clone();
            move |_| {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(2));
                running.fetch_sub(1, Ordering::SeqCst);
            }
        });

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(running.load(Ordering::SeqCst), 0);
    }
}
