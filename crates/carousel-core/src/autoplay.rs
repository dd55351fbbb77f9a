use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::controller::{Direction, ScrollController};

/// Periodic right-scroll that wraps to the first slide at the end
#[derive(Default)]
pub struct AutoScrollTimer {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl AutoScrollTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `period`. An already running timer is replaced.
    pub fn start(&self, controller: Arc<ScrollController>, period: Duration) {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.abort();
            debug!("Replaced running autoplay timer");
        }

        *slot = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Skip the first tick (fires immediately)
            interval.tick().await;

            loop {
                interval.tick().await;
                controller.advance(Direction::Right, true);
            }
        }));

        info!(period_ms = period.as_millis() as u64, "Autoplay started");
    }

    /// Cancel the timer. Returns `false` if none was running.
    pub fn stop(&self) -> bool {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.take() {
            Some(handle) => {
                handle.abort();
                info!("Autoplay stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for AutoScrollTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
