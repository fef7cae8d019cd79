//! UI-affinity dispatch.

use std::io;
use std::thread::{self, ThreadId};

use tracing::debug;

/// A closure posted to the UI-affinity thread.
pub type UiTask = Box<dyn FnOnce() + Send>;

/// Delivers closures to the thread that owns user-visible state.
///
/// Hosts embedding ChatKit in a platform UI implement this on top of their
/// main-loop post primitive.
pub trait UiDispatcher: Send + Sync {
    /// Schedules `task` on the UI-affinity thread.
    fn post(&self, task: UiTask);
}

/// Runs posted closures immediately on the posting thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatcher;

impl UiDispatcher for InlineDispatcher {
    fn post(&self, task: UiTask) {
        task();
    }
}

/// A dedicated thread draining posted closures in order.
pub struct UiThread {
    tx: flume::Sender<UiTask>,
    thread_id: ThreadId,
}

impl UiThread {
    /// Spawns the UI thread. It exits once the `UiThread` is dropped.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = flume::unbounded::<UiTask>();
        let handle = thread::Builder::new()
            .name("chatkit-ui".into())
            .spawn(move || {
                while let Ok(task) = rx.recv() {
                    task();
                }
                debug!("ui thread stopped");
            })?;
        Ok(UiThread {
            tx,
            thread_id: handle.thread().id(),
        })
    }

    /// Returns true when called from the UI thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }
}

impl UiDispatcher for UiThread {
    fn post(&self, task: UiTask) {
        if self.tx.send(task).is_err() {
            debug!("ui thread gone, dropping task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ui_thread_runs_tasks_in_order_on_itself() {
        let ui = std::sync::Arc::new(UiThread::spawn().unwrap());
        assert!(!ui.is_current());

        let (tx, rx) = flume::unbounded();
        for i in 0..5 {
            let tx = tx.clone();
            let ui_clone = ui.clone();
            ui.post(Box::new(move || {
                tx.send((i, ui_clone.is_current())).unwrap();
            }));
        }

        let got: Vec<(i32, bool)> = (0..5)
            .map(|_| rx.recv_timeout(Duration::from_secs(2)).unwrap())
            .collect();
        assert_eq!(got.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!(got.iter().all(|(_, on_ui)| *on_ui));
    }
}
