//! Cancellable fixed-interval polling.
//!
//! [`Poller::start`] spawns a task that runs `tick` once immediately and then
//! on every interval until the returned [`PollerHandle`] is stopped or
//! dropped. A failing tick is logged and the next one still fires. Ticks that
//! overrun the interval delay the schedule rather than bursting to catch up.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Smallest interval accepted; `tokio::time::interval` rejects zero.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub struct Poller;

impl Poller {
    /// Spawn the polling loop on the current tokio runtime.
    pub fn start<F, Fut, E>(interval: Duration, mut tick: F) -> PollerHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let interval = interval.max(MIN_INTERVAL);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                // Cancellation also aborts a tick that is still in flight.
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    result = tick() => {
                        if let Err(e) = result {
                            tracing::warn!(error = %e, "Poll failed");
                        }
                    }
                }
            }

            tracing::debug!("Poller stopped");
        });

        PollerHandle {
            cancel,
            task: Some(task),
        }
    }
}

/// Owner of a running poll loop.
///
/// Dropping the handle cancels the loop; [`PollerHandle::stop`] additionally
/// waits for it to exit.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Cancel the loop and wait until it has exited. No tick runs after this
    /// returns.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Poller task ended abnormally");
            }
        }
    }

    /// Token that stops the loop when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// True once the loop has exited.
    pub fn is_stopped(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
