//! Bounded-concurrency work queue.
//!
//! A [`WorkQueue`] admits at most `limit` tasks at a time. Admission is FIFO:
//! tasks that start waiting first are admitted first, so with a limit of one
//! tasks complete in the order they were submitted. A task that fails gives
//! its slot back like any other. [`WorkQueue::run_all`] is fail-fast: the
//! first error drops every other task of the batch, whether still queued or
//! already running.

use futures::future::try_join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::trace;

use crate::errors::{AuditError, Result};

/// A semaphore-gated task runner with a fixed concurrency limit.
#[derive(Debug, Clone)]
pub struct WorkQueue {
    name: String,
    limit: usize,
    permits: Arc<Semaphore>,
}

impl WorkQueue {
    /// Creates a queue admitting at most `limit` concurrent tasks.
    pub fn new(name: impl Into<String>, limit: usize) -> Result<Self> {
        let name = name.into();
        if limit == 0 {
            return Err(AuditError::invalid_config(format!(
                "work queue '{name}' needs a concurrency of at least 1"
            )));
        }
        Ok(Self {
            name,
            limit,
            permits: Arc::new(Semaphore::new(limit)),
        })
    }

    /// Returns the number of tasks currently admitted.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.limit - self.permits.available_permits()
    }

    /// Runs one task once a slot is free.
    pub async fn run<F>(&self, task: F) -> F::Output
    where
        F: Future,
    {
        // The semaphore is never closed, so acquiring only waits.
        let _permit = self.permits.acquire().await.ok();
        trace!(queue = %self.name, in_flight = self.in_flight(), "Task admitted");
        task.await
    }

    /// Runs every task through the queue and collects their outputs in
    /// submission order.
    ///
    /// Resolves with the first error any task returns. The remaining tasks
    /// are dropped at that point, so queued ones never start and running
    /// ones are cancelled at their next await.
    pub async fn run_all<I, F, T, E>(&self, tasks: I) -> std::result::Result<Vec<T>, E>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = std::result::Result<T, E>>,
    {
        try_join_all(tasks.into_iter().map(|task| self.run(task))).await
    }
}
