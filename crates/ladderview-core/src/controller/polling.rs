use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owned handle to a recurring refresh.
///
/// Dropping the handle cancels the timer, so polling cannot outlive its owner.
#[derive(Debug)]
pub struct PollingHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollingHandle {
    pub(crate) fn new(cancel: CancellationToken, task: JoinHandle<()>) -> Self {
        Self {
            cancel,
            task: Some(task),
        }
    }

    /// Cancel the recurring refresh. Idempotent.
    ///
    /// A refresh already in flight is allowed to finish.
    pub fn stop(&mut self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            tracing::debug!(event = "core.polling.stop_requested");
        }
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled() && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel and wait for the polling task to exit.
    pub async fn join(mut self) {
        self.stop();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!(
                event = "core.polling.task_failed",
                error = %e
            );
        }
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
