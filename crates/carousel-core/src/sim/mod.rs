//! Simulated host for running the slider without a UI toolkit
//!
//! Used by the `carousel` binary and by the engine tests. Scrolls animate with
//! the configured easing, and `settled()` resolves when the animation ends
//! (or after the fixed settle delay when completion reporting is off).

pub mod animation;
pub mod easing;
pub mod page;

pub use animation::ScrollAnimator;
pub use page::{EventBus, SimControl, SimPage, SimSlide, SimSlider, SimSliderSpec, SimViewport};
