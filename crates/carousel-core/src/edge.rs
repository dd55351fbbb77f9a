use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::debounce::Debouncer;
use crate::geometry::EdgeState;
use crate::host::{Control, ControlSet, Viewport};

/// Keeps the left/right controls disabled while the viewport sits on the
/// matching edge
pub struct EdgeStateTracker {
    viewport: Arc<dyn Viewport>,
    left: Option<Arc<dyn Control>>,
    right: Option<Arc<dyn Control>>,
    debouncer: Debouncer,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl EdgeStateTracker {
    pub fn new(viewport: Arc<dyn Viewport>, controls: &ControlSet) -> Self {
        Self {
            viewport,
            left: controls.left.clone(),
            right: controls.right.clone(),
            debouncer: Debouncer::standard("handle_control_on_edge"),
            pending: Mutex::new(None),
        }
    }

    /// Read the edge state and update the controls right away
    pub fn apply_now(&self) -> EdgeState {
        apply_edge_state(self.viewport.as_ref(), self.left.as_deref(), self.right.as_deref())
    }

    /// Debounced: re-evaluate the controls once the viewport reports that the
    /// current scroll has settled.
    ///
    /// A newer check replaces one still waiting. Returns `false` when the
    /// call was dropped by the cooldown.
    pub fn handle_control_on_edge(&self) -> bool {
        self.debouncer
            .run(|| {
                let viewport = Arc::clone(&self.viewport);
                let left = self.left.clone();
                let right = self.right.clone();
                let handle = tokio::spawn(async move {
                    viewport.settled().await;
                    apply_edge_state(viewport.as_ref(), left.as_deref(), right.as_deref());
                });

                let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(previous) = pending.replace(handle) {
                    previous.abort();
                }
            })
            .is_some()
    }

    /// Abort a check still waiting for the viewport to settle.
    ///
    /// Returns `true` if one was pending.
    pub fn cancel(&self) -> bool {
        let handle = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handle {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                debug!("Cancelled pending edge check");
                true
            }
            _ => false,
        }
    }
}

impl Drop for EdgeStateTracker {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn apply_edge_state(
    viewport: &dyn Viewport,
    left: Option<&dyn Control>,
    right: Option<&dyn Control>,
) -> EdgeState {
    let state = EdgeState::read(viewport);
    if let Some(left) = left {
        left.set_disabled(state.at_begin);
    }
    if let Some(right) = right {
        right.set_disabled(state.at_end);
    }
    debug!(at_begin = state.at_begin, at_end = state.at_end, "Updated edge controls");
    state
}
