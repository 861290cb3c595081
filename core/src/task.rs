//! Deferred tasks: futures that are created now and started later.
//!
//! # Design
//! A `Deferred` holds its future unpolled until `start` hands it to
//! `tokio::spawn`. Starting and joining are separate steps, so a caller can
//! start a whole batch before awaiting the first result. Joining an unstarted
//! task starts it first.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tokio::task::JoinHandle;

use crate::error::TaskError;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// A computation that does not run until [`start`](Deferred::start) or
/// [`join`](Deferred::join) is called.
///
/// `start` and `join` must be called from within a tokio runtime.
pub struct Deferred<T> {
    pending: Option<BoxFuture<T>>,
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Wrap `future` without polling or spawning it.
    pub fn lazy<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            pending: Some(Box::pin(future)),
            handle: None,
        }
    }

    /// Wrap `future` and spawn it immediately.
    pub fn eager<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let mut task = Self::lazy(future);
        task.start();
        task
    }

    /// Spawn the task. Returns `false` if it was already running.
    pub fn start(&mut self) -> bool {
        match self.pending.take() {
            Some(future) => {
                self.handle = Some(tokio::spawn(future));
                true
            }
            None => false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.pending.is_none()
    }

    /// Await the task's output, starting it first if needed.
    pub async fn join(mut self) -> Result<T, TaskError> {
        self.start();
        match self.handle.take() {
            Some(handle) => handle.await.map_err(TaskError::from),
            None => Err(TaskError::Cancelled),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("started", &self.pending.is_none())
            .finish()
    }
}
