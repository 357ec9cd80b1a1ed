//! Task orchestration
//!
//! This module contains:
//! - A fixed-size pool of named worker threads fed by a bounded queue
//! - Named task groups that fan out over the pool and collect every outcome
//! - Panic containment: a panicking task fails alone, its worker survives

mod group;
mod worker;

pub use group::TaskGroup;
pub use worker::{WorkerPool, DEFAULT_WORKERS};

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Errors raised by the pool itself
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool needs at least one worker")]
    NoWorkers,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("worker pool is shutting down")]
    ShuttingDown,

    #[error("task '{0}' is already registered in this group")]
    DuplicateTask(String),
}

/// Outcome of a single task that did not produce a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task failed: {0}")]
    Failed(String),

    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("task was rejected by the pool")]
    Rejected,

    #[error("task result was lost")]
    Lost,
}

/// Runs `task`, turning a panic into `TaskError::Panicked`
pub fn run_guarded<T, F>(task: F) -> Result<T, TaskError>
where
    F: FnOnce() -> Result<T, TaskError>,
{
    match catch_unwind(AssertUnwindSafe(task)) {
        Ok(outcome) => outcome,
        Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
