// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task Queue
//!
//! A single serial background worker. Jobs run in submission order and their
//! results are posted to the UI-affinity dispatcher.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use thiserror::Error;
use tracing::{debug, error, warn};

use super::bridge::WorkerContext;
use super::dispatcher::UiDispatcher;

/// Errors delivered in place of a job's value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The job panicked.
    #[error("task panicked: {0}")]
    Panicked(String),
}

type Job = Box<dyn FnOnce(&WorkerContext) + Send>;

/// Serial background worker with UI-thread result delivery.
///
/// There is no cancellation: a caller that no longer cares about a result
/// should ignore it when it arrives.
///
/// # Example
///
/// ```ignore
/// use chatkit_core::runtime::{InlineDispatcher, TaskQueue};
///
/// let queue = TaskQueue::new(Arc::new(InlineDispatcher))?;
/// queue.submit(
///     |ctx| ctx.await_once(|done| service.fetch(move |v| done.complete(v))),
///     |result| println!("{:?}", result),
/// );
/// ```
pub struct TaskQueue {
    tx: flume::Sender<Job>,
    ui: Arc<dyn UiDispatcher>,
}

impl TaskQueue {
    /// Spawns the worker thread.
    ///
    /// The worker drains queued jobs and exits once the queue is dropped.
    pub fn new(ui: Arc<dyn UiDispatcher>) -> io::Result<Self> {
        let (tx, rx) = flume::unbounded::<Job>();
        thread::Builder::new()
            .name("chatkit-task-queue".into())
            .spawn(move || {
                let ctx = WorkerContext::new();
                while let Ok(job) = rx.recv() {
                    job(&ctx);
                }
                debug!("task queue worker stopped");
            })?;
        Ok(TaskQueue { tx, ui })
    }

    /// Queues `job`; `on_result` receives its value on the UI-affinity thread.
    pub fn submit<T, F, R>(&self, job: F, on_result: R)
    where
        T: Send + 'static,
        F: FnOnce(&WorkerContext) -> T + Send + 'static,
        R: FnOnce(Result<T, TaskError>) + Send + 'static,
    {
        let ui = self.ui.clone();
        let wrapped: Job = Box::new(move |ctx| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| job(ctx))).map_err(|payload| {
                let message = panic_message(payload.as_ref());
                warn!(%message, "task panicked");
                TaskError::Panicked(message)
            });
            ui.post(Box::new(move || on_result(result)));
        });

        if self.tx.send(wrapped).is_err() {
            error!("task queue worker is gone, job dropped");
        }
    }

    /// Returns the UI-affinity dispatcher results are posted to.
    pub fn ui(&self) -> &Arc<dyn UiDispatcher> {
        &self.ui
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
