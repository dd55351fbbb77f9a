//! Host collaborator contracts
//!
//! The engine never touches a real UI toolkit. Everything it reads or writes
//! goes through these traits: the scroll region (`Viewport`), the slide cells
//! (`Slide`), the navigation buttons (`Control`), element discovery
//! (`ElementLocator`) and native event delivery (`EventSource`).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Fixed wait after an animated scroll before geometry is trusted again
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Requested motion for a scroll command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Animated motion
    Smooth,
    /// Jump immediately
    Instant,
}

/// The inner scroll region of a slider
#[async_trait]
pub trait Viewport: Send + Sync {
    /// Current horizontal scroll offset
    fn scroll_offset(&self) -> f64;

    /// Total scrollable content width
    fn scroll_extent(&self) -> f64;

    /// Visible width of the region
    fn client_width(&self) -> f64;

    /// Scroll to an absolute offset. Out-of-range offsets are clamped by the host.
    fn scroll_to(&self, offset: f64, behavior: ScrollBehavior);

    /// Scroll by a relative delta. Out-of-range results are clamped by the host.
    fn scroll_by(&self, delta: f64, behavior: ScrollBehavior);

    /// Resolves once the most recent animated scroll has finished.
    ///
    /// Hosts without a completion signal keep the default, which waits
    /// [`SETTLE_DELAY`].
    async fn settled(&self) {
        tokio::time::sleep(SETTLE_DELAY).await;
    }
}

/// Size-affecting style written to every slide by the layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideStyle {
    pub width: f64,
    pub flex_shrink: f64,
}

impl SlideStyle {
    /// A fixed width that never shrinks
    pub fn fixed(width: f64) -> Self {
        Self {
            width,
            flex_shrink: 0.0,
        }
    }
}

/// One slide cell
pub trait Slide: Send + Sync {
    /// Rendered width of the slide
    fn bounding_width(&self) -> f64;

    /// Resolved minimum-width floor from the slide's style (0 when unset)
    fn min_width(&self) -> f64;

    fn set_style(&self, style: SlideStyle);
}

/// Identifier the host uses to report clicks on a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub u32);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control#{}", self.0)
    }
}

/// A navigation button
pub trait Control: Send + Sync {
    fn id(&self) -> ControlId;

    fn set_disabled(&self, disabled: bool);

    fn is_disabled(&self) -> bool;
}

/// A dot button bound to a zero-based slide index
#[derive(Clone)]
pub struct DotControl {
    pub index: usize,
    pub control: Arc<dyn Control>,
}

/// Navigation controls tagged as belonging to one slider
#[derive(Clone, Default)]
pub struct ControlSet {
    pub left: Option<Arc<dyn Control>>,
    pub right: Option<Arc<dyn Control>>,
    pub dots: Vec<DotControl>,
}

impl ControlSet {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.dots.is_empty()
    }
}

/// The scrollable region and the slides inside it
#[derive(Clone)]
pub struct InnerRegion {
    pub viewport: Arc<dyn Viewport>,
    pub slides: Vec<Arc<dyn Slide>>,
}

/// Everything located for one container identifier
#[derive(Clone, Default)]
pub struct ContainerElements {
    /// `None` when the container has no inner scroll region
    pub inner: Option<InnerRegion>,
    pub controls: ControlSet,
}

/// Finds slider elements by container identifier
pub trait ElementLocator {
    /// Returns `None` when no container carries this identifier
    fn locate(&self, container_id: &str) -> Option<ContainerElements>;
}

/// Native events delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// A control was clicked
    Click(ControlId),
    /// The viewport was resized
    Resize,
    /// The scroll position changed
    Scroll,
}

/// Source of native events for one slider
pub trait EventSource {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<HostEvent>;
}
