//! Named task groups
//!
//! A group collects named tasks, runs them all on a shared pool, and keeps
//! one outcome per name. A failing task never hides the others' results.

use super::{run_guarded, PoolError, TaskError, WorkerPool};
use crossbeam_channel::bounded;
use std::sync::Arc;

type Task<T> = Box<dyn FnOnce() -> Result<T, TaskError> + Send + 'static>;

struct Entry<T> {
    name: String,
    task: Option<Task<T>>,
    outcome: Option<Result<T, TaskError>>,
}

/// A set of named tasks executed together
pub struct TaskGroup<T> {
    pool: Arc<WorkerPool>,
    entries: Vec<Entry<T>>,
}

impl<T: Send + 'static> TaskGroup<T> {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self {
            pool,
            entries: Vec::new(),
        }
    }

    /// Adds a named task
    ///
    /// # Returns
    ///
    /// * `Err(PoolError::DuplicateTask)` - The name is already taken
    pub fn add_task<F>(&mut self, name: impl Into<String>, task: F) -> Result<(), PoolError>
    where
        F: FnOnce() -> Result<T, TaskError> + Send + 'static,
    {
        let name = name.into();
        if self.entries.iter().any(|e| e.name == name) {
            return Err(PoolError::DuplicateTask(name));
        }
        self.entries.push(Entry {
            name,
            task: Some(Box::new(task)),
            outcome: None,
        });
        Ok(())
    }

    /// Runs every pending task and blocks until all have finished
    ///
    /// Tasks the pool refuses are recorded as `TaskError::Rejected`. Tasks
    /// whose outcome never arrives are recorded as `TaskError::Lost`.
    pub fn execute_all(&mut self) {
        // Room for every outcome, so workers never block on reporting
        let (done_tx, done_rx) = bounded(self.entries.len().max(1));
        let mut pending = 0usize;

        for (index, entry) in self.entries.iter_mut().enumerate() {
            let Some(task) = entry.task.take() else {
                continue;
            };
            let done_tx = done_tx.clone();
            let submitted = self.pool.submit(move || {
                let _ = done_tx.send((index, run_guarded(task)));
            });
            match submitted {
                Ok(()) => pending += 1,
                Err(e) => {
                    tracing::warn!("Task '{}' not scheduled: {}", entry.name, e);
                    entry.outcome = Some(Err(TaskError::Rejected));
                }
            }
        }
        drop(done_tx);

        while pending > 0 {
            match done_rx.recv() {
                Ok((index, outcome)) => {
                    self.entries[index].outcome = Some(outcome);
                    pending -= 1;
                }
                Err(_) => break,
            }
        }

        for entry in &mut self.entries {
            if entry.outcome.is_none() && entry.task.is_none() {
                entry.outcome = Some(Err(TaskError::Lost));
            }
            if let Some(Err(e)) = &entry.outcome {
                tracing::warn!("Task '{}' failed: {}", entry.name, e);
            }
        }
    }

    /// Outcome of the named task; None for unknown or not yet executed tasks
    pub fn get_result(&self, name: &str) -> Option<&Result<T, TaskError>> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.outcome.as_ref())
    }

    /// Moves the named task's outcome out of the group
    pub fn take_result(&mut self, name: &str) -> Option<Result<T, TaskError>> {
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .and_then(|e| e.outcome.take())
    }

    /// Returns true if any executed task failed
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.outcome, Some(Err(_))))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the group, yielding `(name, outcome)` in registration order
    ///
    /// Tasks that never ran are left out.
    pub fn into_results(self) -> Vec<(String, Result<T, TaskError>)> {
        self.entries
            .into_iter()
            .filter_map(|e| e.outcome.map(|outcome| (e.name, outcome)))
            .collect()
    }
}
