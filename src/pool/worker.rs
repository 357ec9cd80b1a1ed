//! Fixed-size worker pool
//!
//! Workers share one bounded queue sized at twice the worker count, so a
//! burst of submissions blocks the submitter instead of growing memory.

use super::{panic_message, run_guarded, PoolError, TaskError};
use crossbeam_channel::{bounded, Sender};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

/// Worker count used when none is configured
pub const DEFAULT_WORKERS: usize = 5;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A pool of long-lived worker threads
///
/// Safe to share between callers behind an `Arc`.
pub struct WorkerPool {
    size: usize,
    sender: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Starts `size` workers
    ///
    /// # Arguments
    ///
    /// * `size` - Number of worker threads, at least one
    ///
    /// # Returns
    ///
    /// * `Ok(WorkerPool)` - All workers are running
    /// * `Err(PoolError)` - `size` was zero or a thread could not be spawned
    pub fn new(size: usize) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::NoWorkers);
        }

        let (sender, receiver) = bounded::<Job>(size * 2);
        let mut workers = Vec::with_capacity(size);

        for index in 0..size {
            let jobs = receiver.clone();
            let spawned = thread::Builder::new()
                .name(format!("analysis-worker-{}", index))
                .spawn(move || {
                    for job in jobs.iter() {
                        if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                            tracing::error!(
                                "Job panicked on worker {}: {}",
                                index,
                                panic_message(payload.as_ref())
                            );
                        }
                    }
                    tracing::trace!("Worker {} exiting", index);
                });

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    drop(sender);
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        tracing::debug!("Started worker pool with {} workers", size);

        Ok(Self {
            size,
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
        })
    }

    /// Starts a pool with `DEFAULT_WORKERS` workers
    pub fn with_default_size() -> Result<Self, PoolError> {
        Self::new(DEFAULT_WORKERS)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Queues a job, blocking while the queue is full
    ///
    /// # Returns
    ///
    /// * `Err(PoolError::ShuttingDown)` - The pool no longer accepts work
    pub fn submit<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        // Clone out of the lock so a blocking send does not stall shutdown
        let sender = self.sender.lock().clone().ok_or(PoolError::ShuttingDown)?;
        sender
            .send(Box::new(job))
            .map_err(|_| PoolError::ShuttingDown)
    }

    /// Runs a task on the pool and blocks until it finishes
    pub fn submit_and_wait<T, F>(&self, task: F) -> Result<T, TaskError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, TaskError> + Send + 'static,
    {
        let (done_tx, done_rx) = bounded(1);
        self.submit(move || {
            let _ = done_tx.send(run_guarded(task));
        })
        .map_err(|_| TaskError::Rejected)?;

        done_rx.recv().unwrap_or(Err(TaskError::Lost))
    }

    /// Stops accepting work, lets queued jobs finish, and joins every worker
    ///
    /// Calling this more than once is harmless.
    pub fn shutdown(&self) {
        let sender = self.sender.lock().take();
        if sender.is_none() {
            return;
        }
        drop(sender);

        let workers: Vec<_> = self.workers.lock().drain(..).collect();
        let current = thread::current().id();
        for handle in workers {
            // A worker cannot join itself
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                tracing::error!("Worker thread terminated abnormally");
            }
        }

        tracing::debug!("Worker pool shut down");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}
