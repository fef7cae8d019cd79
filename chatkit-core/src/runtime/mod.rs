//! Runtime
//!
//! The scheduling model of ChatKit: one serial background worker
//! ([`TaskQueue`]) plus one UI-affinity dispatcher ([`UiDispatcher`]).
//! Blocking waits on service callbacks ([`WorkerContext::await_once`]) are
//! only possible inside worker jobs.

mod bridge;
mod dispatcher;
mod task_queue;

pub use bridge::{BridgeError, Completion, WorkerContext};
pub use dispatcher::{InlineDispatcher, UiDispatcher, UiTask, UiThread};
pub use task_queue::{TaskError, TaskQueue};
