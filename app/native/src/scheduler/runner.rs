//! Posting work to the UI thread.

use std::sync::mpsc::{self, Receiver, Sender};

use parking_lot::Mutex;

/// A unit of work to run on the UI thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Hands tasks to the thread that owns window and animation state.
pub trait TaskRunner: Send + Sync {
    /// Queues `task`. Must not run it on the calling thread.
    fn post(&self, task: Task);
}

/// A channel-backed task queue drained explicitly by the UI thread.
#[derive(Debug)]
pub struct QueuedTaskRunner {
    sender: Sender<Task>,
    receiver: Mutex<Receiver<Task>>,
}

impl Default for QueuedTaskRunner {
    fn default() -> Self { Self::new() }
}

impl QueuedTaskRunner {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver: Mutex::new(receiver) }
    }

    /// Runs every task queued so far and returns how many ran.
    ///
    /// Tasks posted while draining wait for the next call.
    pub fn run_pending(&self) -> usize {
        let tasks: Vec<Task> = self.receiver.lock().try_iter().collect();
        let count = tasks.len();
        for task in tasks {
            task();
        }
        count
    }
}

impl TaskRunner for QueuedTaskRunner {
    fn post(&self, task: Task) {
        if self.sender.send(task).is_err() {
            tracing::warn!("task queue closed, dropping task");
        }
    }
}
