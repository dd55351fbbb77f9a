//! In-memory host page: slides in a flex row, arrow and dot buttons, and an
//! event bus that plays the role of native callbacks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::animation::ScrollAnimator;
use crate::config::ScrollConfig;
use crate::host::{
    ContainerElements, Control, ControlId, ControlSet, DotControl, ElementLocator, EventSource,
    HostEvent, InnerRegion, ScrollBehavior, Slide, SlideStyle, Viewport, SETTLE_DELAY,
};

/// Fan-out of host events to every subscriber
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<HostEvent>>>>,
}

impl EventBus {
    pub fn emit(&self, event: HostEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event).is_ok());
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<HostEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }
}

#[derive(Debug)]
struct SlideState {
    natural_width: f64,
    min_width: f64,
    style: Option<SlideStyle>,
}

/// A slide whose width is its natural width until a style is applied
#[derive(Debug)]
pub struct SimSlide {
    state: Mutex<SlideState>,
}

impl SimSlide {
    pub fn new(natural_width: f64, min_width: f64) -> Self {
        Self {
            state: Mutex::new(SlideState {
                natural_width,
                min_width,
                style: None,
            }),
        }
    }

    /// Last style written by the layout pass
    pub fn style(&self) -> Option<SlideStyle> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).style
    }
}

impl Slide for SimSlide {
    fn bounding_width(&self) -> f64 {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.style.map(|s| s.width).unwrap_or(state.natural_width)
    }

    fn min_width(&self) -> f64 {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).min_width
    }

    fn set_style(&self, style: SlideStyle) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .style = Some(style);
    }
}

#[derive(Debug)]
pub struct SimControl {
    id: ControlId,
    disabled: AtomicBool,
}

impl SimControl {
    pub fn new(id: ControlId) -> Self {
        Self {
            id,
            disabled: AtomicBool::new(false),
        }
    }
}

impl Control for SimControl {
    fn id(&self) -> ControlId {
        self.id
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Release);
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Acquire)
    }
}

struct ViewportState {
    client_width: f64,
    animator: ScrollAnimator,
}

/// Horizontal scroll region laying out its slides with a fixed gap.
///
/// Emits [`HostEvent::Scroll`] on the page bus whenever a scroll is requested.
pub struct SimViewport {
    state: Mutex<ViewportState>,
    slides: Vec<Arc<SimSlide>>,
    gap: f64,
    report_completion: bool,
    bus: EventBus,
}

impl SimViewport {
    fn new(
        client_width: f64,
        slides: Vec<Arc<SimSlide>>,
        gap: f64,
        scroll: ScrollConfig,
        report_completion: bool,
        bus: EventBus,
    ) -> Self {
        Self {
            state: Mutex::new(ViewportState {
                client_width,
                animator: ScrollAnimator::new(scroll),
            }),
            slides,
            gap,
            report_completion,
            bus,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn content_width(&self) -> f64 {
        let slides: f64 = self.slides.iter().map(|s| s.bounding_width()).sum();
        let gaps = self.gap * self.slides.len().saturating_sub(1) as f64;
        slides + gaps
    }

    fn max_offset(&self, client_width: f64) -> f64 {
        (self.content_width().max(client_width) - client_width).max(0.0)
    }

    fn request(&self, target: impl FnOnce(f64) -> f64, behavior: ScrollBehavior) {
        {
            let mut state = self.lock();
            let now = Instant::now();
            let max = self.max_offset(state.client_width);
            let current = state.animator.position(now).clamp(0.0, max);
            let target = target(current).clamp(0.0, max);
            state
                .animator
                .scroll_to(target, behavior == ScrollBehavior::Instant, now);
        }
        self.bus.emit(HostEvent::Scroll);
    }

    pub fn set_client_width(&self, width: f64) {
        self.lock().client_width = width;
    }

    /// Offset the current animation will end at
    pub fn target_offset(&self) -> f64 {
        let state = self.lock();
        state
            .animator
            .target()
            .clamp(0.0, self.max_offset(state.client_width))
    }

    pub fn is_animating(&self) -> bool {
        self.lock().animator.is_animating(Instant::now())
    }
}

#[async_trait]
impl Viewport for SimViewport {
    fn scroll_offset(&self) -> f64 {
        let mut state = self.lock();
        let max = self.max_offset(state.client_width);
        state.animator.position(Instant::now()).clamp(0.0, max)
    }

    fn scroll_extent(&self) -> f64 {
        self.content_width().max(self.lock().client_width)
    }

    fn client_width(&self) -> f64 {
        self.lock().client_width
    }

    fn scroll_to(&self, offset: f64, behavior: ScrollBehavior) {
        self.request(|_| offset, behavior);
    }

    fn scroll_by(&self, delta: f64, behavior: ScrollBehavior) {
        self.request(|current| current + delta, behavior);
    }

    async fn settled(&self) {
        if !self.report_completion {
            tokio::time::sleep(SETTLE_DELAY).await;
            return;
        }
        loop {
            let remaining = self.lock().animator.remaining(Instant::now());
            if remaining.is_zero() {
                break;
            }
            tokio::time::sleep(remaining).await;
        }
    }
}

/// Shape of a simulated slider
#[derive(Debug, Clone)]
pub struct SimSliderSpec {
    pub slides: usize,
    pub slide_width: f64,
    pub min_width: f64,
    pub gap: f64,
    pub viewport_width: f64,
    pub arrows: bool,
    pub dots: bool,
    pub scroll: ScrollConfig,
    /// `settled()` resolves when the animation ends instead of after the fixed delay
    pub report_completion: bool,
}

impl Default for SimSliderSpec {
    fn default() -> Self {
        Self {
            slides: 6,
            slide_width: 200.0,
            min_width: 0.0,
            gap: 20.0,
            viewport_width: 640.0,
            arrows: true,
            dots: true,
            scroll: ScrollConfig::default(),
            report_completion: true,
        }
    }
}

/// Handles to the elements of one simulated slider
#[derive(Clone)]
pub struct SimSlider {
    pub viewport: Arc<SimViewport>,
    pub slides: Vec<Arc<SimSlide>>,
    pub left: Option<Arc<SimControl>>,
    pub right: Option<Arc<SimControl>>,
    pub dots: Vec<Arc<SimControl>>,
}

#[derive(Clone)]
enum SimContainer {
    Slider(SimSlider),
    Empty,
}

/// A page holding any number of simulated sliders
#[derive(Default)]
pub struct SimPage {
    containers: Mutex<HashMap<String, SimContainer>>,
    next_control: AtomicU32,
    bus: EventBus,
}

impl SimPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn control(&self) -> Arc<SimControl> {
        let id = ControlId(self.next_control.fetch_add(1, Ordering::Relaxed));
        Arc::new(SimControl::new(id))
    }

    /// Add a slider container under `id`
    pub fn add_slider(&self, id: &str, spec: SimSliderSpec) -> SimSlider {
        let slides: Vec<Arc<SimSlide>> = (0..spec.slides)
            .map(|_| Arc::new(SimSlide::new(spec.slide_width, spec.min_width)))
            .collect();
        let viewport = Arc::new(SimViewport::new(
            spec.viewport_width,
            slides.clone(),
            spec.gap,
            spec.scroll,
            spec.report_completion,
            self.bus.clone(),
        ));

        let (left, right) = if spec.arrows {
            (Some(self.control()), Some(self.control()))
        } else {
            (None, None)
        };
        let dots = if spec.dots {
            (0..spec.slides).map(|_| self.control()).collect()
        } else {
            Vec::new()
        };

        let slider = SimSlider {
            viewport,
            slides,
            left,
            right,
            dots,
        };
        self.containers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), SimContainer::Slider(slider.clone()));
        slider
    }

    /// Add a container that has no inner scroll region
    pub fn add_empty_container(&self, id: &str) {
        self.containers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), SimContainer::Empty);
    }

    pub fn click(&self, control: &SimControl) {
        self.bus.emit(HostEvent::Click(control.id()));
    }

    /// Resize every slider on the page to `width`
    pub fn resize(&self, width: f64) {
        for container in self
            .containers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            if let SimContainer::Slider(slider) = container {
                slider.viewport.set_client_width(width);
            }
        }
        self.bus.emit(HostEvent::Resize);
    }

    /// Manual scroll by the user: jumps without animation
    pub fn drag_to(&self, slider: &SimSlider, offset: f64) {
        slider.viewport.scroll_to(offset, ScrollBehavior::Instant);
    }
}

impl ElementLocator for SimPage {
    fn locate(&self, container_id: &str) -> Option<ContainerElements> {
        let containers = self.containers.lock().unwrap_or_else(PoisonError::into_inner);
        match containers.get(container_id)? {
            SimContainer::Empty => Some(ContainerElements::default()),
            SimContainer::Slider(slider) => {
                let viewport: Arc<dyn Viewport> = slider.viewport.clone();
                let slides = slider
                    .slides
                    .iter()
                    .map(|s| Arc::clone(s) as Arc<dyn Slide>)
                    .collect();
                let controls = ControlSet {
                    left: slider.left.clone().map(|c| c as Arc<dyn Control>),
                    right: slider.right.clone().map(|c| c as Arc<dyn Control>),
                    dots: slider
                        .dots
                        .iter()
                        .enumerate()
                        .map(|(index, c)| DotControl {
                            index,
                            control: Arc::clone(c) as Arc<dyn Control>,
                        })
                        .collect(),
                };
                Some(ContainerElements {
                    inner: Some(InnerRegion { viewport, slides }),
                    controls,
                })
            }
        }
    }
}

impl EventSource for SimPage {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<HostEvent> {
        self.bus.subscribe()
    }
}
