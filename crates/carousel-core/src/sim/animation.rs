//! Animated horizontal scroll state for the simulated viewport
//!
//! Positions are evaluated lazily against tokio's clock, so paused-time tests
//! see the same motion as a live run.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::{EasingType, ScrollConfig};

/// Progress (0.0 to 1.0) of an animation that started at `start`
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

impl ActiveAnimation {
    fn end(&self) -> Instant {
        self.start + self.duration
    }
}

/// Scroll position with an optional in-flight animation
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    config: ScrollConfig,
    resting: f64,
    animation: Option<ActiveAnimation>,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            resting: 0.0,
            animation: None,
        }
    }

    fn is_smooth(&self) -> bool {
        self.config.smooth_enabled && self.config.animation_duration_ms > 0
    }

    /// Position at `now`. Finished animations are folded into the resting position.
    pub fn position(&mut self, now: Instant) -> f64 {
        if let Some(anim) = &self.animation {
            if now >= anim.end() {
                self.resting = anim.to;
                self.animation = None;
            } else {
                let t = anim.easing.apply(progress(anim.start, now, anim.duration));
                return lerp(anim.from, anim.to, t);
            }
        }
        self.resting
    }

    /// Final position once the current animation completes
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.resting)
    }

    pub fn is_animating(&mut self, now: Instant) -> bool {
        self.position(now);
        self.animation.is_some()
    }

    /// Time left until the current animation completes
    pub fn remaining(&self, now: Instant) -> Duration {
        self.animation
            .as_ref()
            .map(|a| a.end().saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Move to `target`, animated unless `instant` or smooth scrolling is off.
    ///
    /// A new animation starts from the currently visible position.
    pub fn scroll_to(&mut self, target: f64, instant: bool, now: Instant) {
        let from = self.position(now);

        if instant || !self.is_smooth() || from == target {
            self.jump(target);
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from,
            to: target,
            duration: Duration::from_millis(self.config.animation_duration_ms),
            easing: self.config.easing,
        });
    }

    /// Stop any animation and rest at `position`
    pub fn jump(&mut self, position: f64) {
        self.animation = None;
        self.resting = position;
    }
}
