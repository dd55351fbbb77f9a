//! Cooldown guard for repeated actions
//!
//! A `Debouncer` lets one call through, then drops every call until its
//! cooldown has elapsed. Dropped calls are not queued or replayed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Cooldown applied to every guarded slider action
pub const DEBOUNCE_COOLDOWN: Duration = Duration::from_millis(100);

/// Guard for a single bound action.
///
/// Must be used from inside a tokio runtime; the lock is released by a
/// spawned timer task.
pub struct Debouncer {
    name: &'static str,
    cooldown: Duration,
    locked: Arc<AtomicBool>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(name: &'static str, cooldown: Duration) -> Self {
        Self {
            name,
            cooldown,
            locked: Arc::new(AtomicBool::new(false)),
            timer: Mutex::new(None),
        }
    }

    /// Debouncer with the standard slider cooldown
    pub fn standard(name: &'static str) -> Self {
        Self::new(name, DEBOUNCE_COOLDOWN)
    }

    /// Run `action` unless a previous call is still cooling down.
    ///
    /// Returns `None` when the call was dropped.
    pub fn run<R>(&self, action: impl FnOnce() -> R) -> Option<R> {
        if self.locked.swap(true, Ordering::AcqRel) {
            debug!(action = self.name, "Dropped call inside cooldown window");
            return None;
        }

        let result = action();

        let locked = Arc::clone(&self.locked);
        let cooldown = self.cooldown;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            locked.store(false, Ordering::Release);
        });

        if let Ok(mut timer) = self.timer.lock() {
            *timer = Some(handle);
        }

        Some(result)
    }

    /// Whether a call made now would be dropped
    pub fn is_cooling_down(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}
