//! Fixed-size worker pool with indexed jobs and an overall deadline.
//!
//! [`WorkerPool::run_indexed`] submits jobs `0..n` to a rayon thread pool,
//! collects `(index, result)` pairs over a channel and returns the results
//! ordered by index, independent of completion order.
//!
//! # Cancellation
//!
//! When the deadline passes (or a job panics) a shared flag is raised and
//! queued jobs return without running. Jobs already executing are not
//! interrupted; their results are discarded.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use pricer_pricing::pool::WorkerPool;
//!
//! let pool = WorkerPool::new(4).unwrap();
//! let squares = pool
//!     .run_indexed(8, |i| i * i, Duration::from_secs(10))
//!     .unwrap();
//! assert_eq!(squares, vec![0, 1, 4, 9, 16, 25, 36, 49]);
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Failures of a pooled batch of jobs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The rayon thread pool could not be built.
    #[error("Failed to build worker pool: {0}")]
    Build(String),

    /// The deadline passed before every job reported.
    #[error("Timed out with {completed}/{total} jobs completed")]
    Timeout {
        /// Jobs that reported before the deadline
        completed: usize,
        /// Jobs submitted
        total: usize,
    },

    /// A job panicked.
    #[error("Job {index} panicked")]
    Panicked {
        /// Index of the panicking job
        index: usize,
    },

    /// Every worker hung up before all results arrived.
    #[error("Workers disconnected with {completed}/{total} jobs completed")]
    Disconnected {
        /// Jobs that reported
        completed: usize,
        /// Jobs submitted
        total: usize,
    },
}

/// Thread pool running indexed jobs under a deadline.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Builds a pool with `workers` threads.
    ///
    /// # Errors
    /// `Build` for zero workers or when the OS refuses the threads.
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        if workers == 0 {
            return Err(PoolError::Build("worker count must be positive".to_string()));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("pricer-worker-{i}"))
            .build()
            .map_err(|e| PoolError::Build(e.to_string()))?;
        Ok(Self { pool, workers })
    }

    /// Number of worker threads.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `job(0)..job(n_jobs - 1)` on the pool and waits at most
    /// `timeout` for all of them.
    ///
    /// Each job sees only its index. Results come back in index order.
    ///
    /// # Errors
    /// - `Timeout` when the deadline passes first
    /// - `Panicked` for the first job observed to panic
    pub fn run_indexed<F, R>(&self, n_jobs: usize, job: F, timeout: Duration) -> Result<Vec<R>, PoolError>
    where
        F: Fn(usize) -> R + Send + Sync + 'static,
        R: Send + 'static,
    {
        let job = Arc::new(job);
        let cancelled = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel::<(usize, Option<R>)>();

        for index in 0..n_jobs {
            let job = Arc::clone(&job);
            let cancelled = Arc::clone(&cancelled);
            let tx = tx.clone();
            self.pool.spawn(move || {
                if cancelled.load(Ordering::Acquire) {
                    return;
                }
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(index)));
                // the receiver is gone after a timeout
                let _ = tx.send((index, outcome.ok()));
            });
        }
        drop(tx);

        let deadline = Instant::now().checked_add(timeout);
        let mut slots: Vec<Option<R>> = (0..n_jobs).map(|_| None).collect();
        let mut completed = 0;

        while completed < n_jobs {
            let received = match deadline {
                Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok((index, Some(value))) => {
                    slots[index] = Some(value);
                    completed += 1;
                }
                Ok((index, None)) => {
                    cancelled.store(true, Ordering::Release);
                    return Err(PoolError::Panicked { index });
                }
                Err(RecvTimeoutError::Timeout) => {
                    cancelled.store(true, Ordering::Release);
                    return Err(PoolError::Timeout {
                        completed,
                        total: n_jobs,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(PoolError::Disconnected {
                        completed,
                        total: n_jobs,
                    });
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn test_results_ordered_by_index() {
        let pool = WorkerPool::new(4).unwrap();
        // later indices finish first
        let out = pool
            .run_indexed(
                8,
                |i| {
                    thread::sleep(Duration::from_millis(((8 - i) * 5) as u64));
                    i * 10
                },
                Duration::from_secs(10),
            )
            .unwrap();
        assert_eq!(out, (0..8).map(|i| i * 10).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_jobs() {
        let pool = WorkerPool::new(2).unwrap();
        let out: Vec<usize> = pool.run_indexed(0, |i| i, Duration::from_secs(1)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(PoolError::Build(_))));
    }

    #[test]
    fn test_timeout_reports_progress() {
        let pool = WorkerPool::new(1).unwrap();
        let result = pool.run_indexed(
            4,
            |i| {
                if i > 0 {
                    thread::sleep(Duration::from_millis(500));
                }
                i
            },
            Duration::from_millis(100),
        );
        match result {
            Err(PoolError::Timeout { completed, total }) => {
                assert!(completed <= 1);
                assert_eq!(total, 4);
            }
            other => panic!("Expected Timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_queued_jobs_skipped_after_timeout() {
        let pool = WorkerPool::new(1).unwrap();
        let started = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&started);
        let result = pool.run_indexed(
            10,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(50));
            },
            Duration::from_millis(20),
        );
        assert!(matches!(result, Err(PoolError::Timeout { .. })));

        // let the in-flight job drain, then nothing else should start
        thread::sleep(Duration::from_millis(300));
        assert!(started.load(Ordering::SeqCst) < 10);
    }

    #[test]
    fn test_panic_is_caught() {
        let pool = WorkerPool::new(2).unwrap();
        let result = pool.run_indexed(
            4,
            |i| {
                if i == 2 {
                    panic!("boom");
                }
                i
            },
            Duration::from_secs(10),
        );
        assert_eq!(result, Err(PoolError::Panicked { index: 2 }));
    }

    #[test]
    fn test_unbounded_timeout() {
        let pool = WorkerPool::new(2).unwrap();
        let out = pool.run_indexed(4, |i| i * i, Duration::MAX).unwrap();
        assert_eq!(out, vec![0, 1, 4, 9]);
    }

    #[test]
    fn test_pool_is_reusable() {
        let pool = WorkerPool::new(3).unwrap();
        for round in 0..3 {
            let out = pool
                .run_indexed(5, move |i| i + round, Duration::from_secs(10))
                .unwrap();
            assert_eq!(out, (round..round + 5).collect::<Vec<_>>());
        }
        assert_eq!(pool.workers(), 3);
    }
}
