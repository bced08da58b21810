//! Named thread spawning.

use std::thread::{self, JoinHandle};

/// Prefix given to every thread the crate spawns.
pub const THREAD_PREFIX: &str = "casement-";

/// Spawns a thread named `casement-<name>`.
///
/// Returns `None` and logs the error when the OS refuses to create the thread.
pub fn spawn_named_thread<F>(name: &str, task: F) -> Option<JoinHandle<()>>
where F: FnOnce() + Send + 'static {
    let thread_name = format!("{THREAD_PREFIX}{name}");

    match thread::Builder::new().name(thread_name.clone()).spawn(task) {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_spawned_thread_carries_prefixed_name() {
        let (tx, rx) = channel();

        let handle = spawn_named_thread("clock", move || {
            let name = thread::current().name().map(str::to_owned);
            tx.send(name).unwrap();
        });

        let name = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(name.as_deref(), Some("casement-clock"));
        handle.unwrap().join().unwrap();
    }

    #[test]
    fn test_returned_handle_joins_after_task_finishes() {
        let (tx, rx) = channel::<u32>();

        let handle = spawn_named_thread("worker", move || {
            tx.send(7).unwrap();
        })
        .unwrap();

        handle.join().unwrap();
        assert_eq!(rx.try_recv(), Ok(7));
    }
}
