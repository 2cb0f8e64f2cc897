use shared::domain::{Reading, ReadingId};
use tokio::{sync::watch, task::JoinHandle};

/// Observable view of one in-flight reading.
///
/// Dropping the handle abandons the reading: the background task is aborted
/// and nothing further is published.
pub struct ReadingHandle {
    id: ReadingId,
    updates: watch::Receiver<Reading>,
    task: Option<JoinHandle<()>>,
}

impl ReadingHandle {
    pub(crate) fn new(id: ReadingId, updates: watch::Receiver<Reading>, task: JoinHandle<()>) -> Self {
        Self {
            id,
            updates,
            task: Some(task),
        }
    }

    pub fn id(&self) -> ReadingId {
        self.id
    }

    pub fn snapshot(&self) -> Reading {
        self.updates.borrow().clone()
    }

    /// Waits for the next published state. `None` once the task has ended and
    /// every update has been seen.
    pub async fn changed(&mut self) -> Option<Reading> {
        self.updates.changed().await.ok()?;
        Some(self.updates.borrow_and_update().clone())
    }

    /// Waits until the loading flag clears and returns the final reading.
    pub async fn wait(mut self) -> Reading {
        loop {
            {
                let current = self.updates.borrow_and_update();
                if !current.loading {
                    return current.clone();
                }
            }
            if self.updates.changed().await.is_err() {
                return self.updates.borrow().clone();
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ReadingHandle {
    fn drop(&mut self) {
        self.abort();
    }
}
