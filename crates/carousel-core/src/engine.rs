//! Slider orchestrator
//!
//! Owns the configuration and the components for one container, and routes
//! host events to the debounced actions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::autoplay::AutoScrollTimer;
use crate::config::SliderConfig;
use crate::controller::{ScrollCommand, ScrollController};
use crate::edge::EdgeStateTracker;
use crate::geometry::{EdgeState, GeometryCalculator, ScrollGeometry};
use crate::host::{ControlId, ControlSet, ElementLocator, EventSource, HostEvent};
use crate::layout::LayoutEngine;
use crate::{Error, Result};

/// Action a control is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    ScrollLeft,
    ScrollRight,
    ScrollToSlide(usize),
}

/// Routes host events once the engine runs
struct Router {
    layout: Arc<LayoutEngine>,
    edges: Arc<EdgeStateTracker>,
    controller: Arc<ScrollController>,
    bindings: HashMap<ControlId, Binding>,
    track_scroll: bool,
}

impl Router {
    fn route(&self, event: HostEvent) {
        match event {
            HostEvent::Click(id) => match self.bindings.get(&id) {
                Some(Binding::ScrollLeft) => {
                    self.controller.scroll_left();
                }
                Some(Binding::ScrollRight) => {
                    self.controller.scroll_right();
                }
                Some(Binding::ScrollToSlide(index)) => {
                    self.controller.scroll_to_slide(*index);
                }
                None => debug!(%id, "Ignoring click on unbound control"),
            },
            HostEvent::Resize => {
                self.layout.apply_layout();
            }
            HostEvent::Scroll => {
                if self.track_scroll {
                    self.edges.handle_control_on_edge();
                }
            }
        }
    }
}

/// A carousel bound to one container
pub struct SliderEngine {
    container_id: String,
    config: SliderConfig,
    geometry: GeometryCalculator,
    controls: ControlSet,
    layout: Arc<LayoutEngine>,
    edges: Arc<EdgeStateTracker>,
    controller: Arc<ScrollController>,
    autoplay: AutoScrollTimer,
    router: Mutex<Option<Arc<Router>>>,
    dispatch: Mutex<Option<JoinHandle<()>>>,
}

impl SliderEngine {
    /// Locate the container's elements and build the engine.
    ///
    /// Fails if `container_id` is empty, the container is unknown, or it has
    /// no inner scroll region. Nothing is wired until [`run`](Self::run).
    pub fn new(
        container_id: &str,
        locator: &dyn ElementLocator,
        config: SliderConfig,
    ) -> Result<Self> {
        if container_id.trim().is_empty() {
            return Err(Error::MissingIdentifier);
        }

        let elements = locator
            .locate(container_id)
            .ok_or_else(|| Error::ContainerNotFound(container_id.to_string()))?;
        let inner = elements
            .inner
            .ok_or_else(|| Error::InnerRegionNotFound(container_id.to_string()))?;

        if inner.slides.is_empty() {
            warn!(container = container_id, "Slider has no slides");
        }
        if elements.controls.is_empty() {
            debug!(container = container_id, "Slider has no navigation controls");
        }

        let geometry = GeometryCalculator::new(inner.viewport, inner.slides);
        let controls = elements.controls;
        let layout = Arc::new(LayoutEngine::new(geometry.clone(), config.slides_per_view));
        let edges = Arc::new(EdgeStateTracker::new(
            Arc::clone(geometry.viewport()),
            &controls,
        ));
        let controller = Arc::new(ScrollController::new(
            geometry.clone(),
            Arc::clone(&edges),
            config.scroll_number,
            config.infinite_scroll,
        ));

        Ok(Self {
            container_id: container_id.to_string(),
            config,
            geometry,
            controls,
            layout,
            edges,
            controller,
            autoplay: AutoScrollTimer::new(),
            router: Mutex::new(None),
            dispatch: Mutex::new(None),
        })
    }

    /// [`new`](Self::new) with the default configuration
    pub fn with_defaults(container_id: &str, locator: &dyn ElementLocator) -> Result<Self> {
        Self::new(container_id, locator, SliderConfig::default())
    }

    /// Lay out the slides, start autoplay if configured, bind the controls
    /// and start routing events from `events`.
    ///
    /// Must be called from inside a tokio runtime. Calling it again rebinds
    /// everything against the new event source.
    pub fn run(&self, events: &dyn EventSource) {
        info!(
            container = %self.container_id,
            slides = self.geometry.slides().len(),
            infinite = self.config.infinite_scroll,
            "Starting slider"
        );

        self.layout.apply_now();

        if !self.config.infinite_scroll {
            self.edges.apply_now();
        }

        if self.config.auto_scroll {
            self.start_auto_scroll();
        }

        let router = Arc::new(Router {
            layout: Arc::clone(&self.layout),
            edges: Arc::clone(&self.edges),
            controller: Arc::clone(&self.controller),
            bindings: self.bindings(),
            track_scroll: !self.config.infinite_scroll,
        });
        *self.router.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&router));

        let mut rx = events.subscribe();
        let container = self.container_id.clone();
        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                router.route(event);
            }
            debug!(%container, "Event source closed");
        });

        let mut dispatch = self.dispatch.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = dispatch.replace(handle) {
            previous.abort();
        }
    }

    fn bindings(&self) -> HashMap<ControlId, Binding> {
        let mut bindings = HashMap::new();
        for dot in &self.controls.dots {
            bindings.insert(dot.control.id(), Binding::ScrollToSlide(dot.index));
        }
        if let Some(left) = &self.controls.left {
            bindings.insert(left.id(), Binding::ScrollLeft);
        }
        if let Some(right) = &self.controls.right {
            bindings.insert(right.id(), Binding::ScrollRight);
        }
        bindings
    }

    /// Route one host event synchronously. Ignored until the engine runs.
    pub fn handle_event(&self, event: HostEvent) {
        let router = self
            .router
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match router {
            Some(router) => router.route(event),
            None => debug!(?event, "Slider not running, event ignored"),
        }
    }

    /// Start autoplay, replacing a running timer.
    ///
    /// Returns `false` without starting when the configured period is not a
    /// positive number of seconds.
    pub fn start_auto_scroll(&self) -> bool {
        let Some(period) = self.config.scroll_period() else {
            warn!(
                period_secs = self.config.scroll_period_secs,
                "Invalid autoplay period, autoplay not started"
            );
            return false;
        };
        self.autoplay.start(Arc::clone(&self.controller), period);
        true
    }

    /// Stop autoplay. Safe to call when it is not running.
    pub fn stop_auto_scroll(&self) -> bool {
        self.autoplay.stop()
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.autoplay.is_running()
    }

    pub fn scroll_left(&self) -> Option<ScrollCommand> {
        self.controller.scroll_left()
    }

    pub fn scroll_right(&self) -> Option<ScrollCommand> {
        self.controller.scroll_right()
    }

    pub fn scroll_to_slide(&self, index: usize) -> Option<ScrollCommand> {
        self.controller.scroll_to_slide(index)
    }

    /// Debounced layout pass; returns the applied slide width
    pub fn apply_layout(&self) -> Option<f64> {
        self.layout.apply_layout()
    }

    pub fn geometry(&self) -> ScrollGeometry {
        self.geometry.read()
    }

    pub fn edge_state(&self) -> EdgeState {
        self.geometry.edge_state()
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }
}

impl Drop for SliderEngine {
    fn drop(&mut self) {
        self.autoplay.stop();
        self.edges.cancel();
        if let Some(handle) = self
            .dispatch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::config::ScrollConfig;
    use crate::host::{Control, EventSource, Slide, SlideStyle, Viewport};
    use crate::sim::{SimPage, SimSlider, SimSliderSpec};

    fn instant() -> ScrollConfig {
        ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        }
    }

    fn finite() -> SliderConfig {
        SliderConfig {
            infinite_scroll: false,
            ..Default::default()
        }
    }

    fn setup(spec: SimSliderSpec, config: SliderConfig) -> (SimPage, SimSlider, SliderEngine) {
        let page = SimPage::new();
        let slider = page.add_slider("slider", spec);
        let engine = SliderEngine::new("slider", &page, config).unwrap();
        (page, slider, engine)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<HostEvent>) -> usize {
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(600)).await;
    }

    #[test]
    fn test_construction_errors() {
        let page = SimPage::new();
        page.add_empty_container("bare");

        assert!(matches!(
            SliderEngine::with_defaults("", &page),
            Err(Error::MissingIdentifier)
        ));
        assert!(matches!(
            SliderEngine::with_defaults("nope", &page),
            Err(Error::ContainerNotFound(id)) if id == "nope"
        ));
        assert!(matches!(
            SliderEngine::with_defaults("bare", &page),
            Err(Error::InnerRegionNotFound(id)) if id == "bare"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_applies_layout() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let config = SliderConfig {
            slides_per_view: 2,
            ..Default::default()
        };
        let (page, slider, engine) = setup(spec, config);

        engine.run(&page);

        for slide in &slider.slides {
            assert_eq!(slide.style(), Some(SlideStyle::fixed(310.0)));
        }
        assert_eq!(engine.geometry().slide_width, 310.0);
        assert_eq!(engine.geometry().gap(), 20.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_layout_respects_min_width() {
        let spec = SimSliderSpec {
            scroll: instant(),
            min_width: 350.0,
            ..Default::default()
        };
        let config = SliderConfig {
            slides_per_view: 2,
            ..Default::default()
        };
        let (page, slider, engine) = setup(spec, config);

        engine.run(&page);

        assert_eq!(slider.slides[0].bounding_width(), 350.0);
        assert_eq!(slider.slides[5].style().map(|s| s.flex_shrink), Some(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_infinite_left_at_begin_wraps_to_end() {
        let (page, slider, engine) = setup(SimSliderSpec::default(), SliderConfig::default());
        engine.run(&page);
        assert!(engine.edge_state().at_begin);

        let command = engine.scroll_left().unwrap();
        assert_eq!(command, ScrollCommand::To(1300.0));

        settle().await;
        // 6 * 200 + 5 * 20 - 640
        assert_eq!(slider.viewport.scroll_offset(), 660.0);
        assert!(engine.edge_state().at_end);
    }

    #[tokio::test(start_paused = true)]
    async fn test_infinite_right_at_end_wraps_to_start() {
        let (page, slider, engine) = setup(SimSliderSpec::default(), SliderConfig::default());
        engine.run(&page);
        page.drag_to(&slider, 660.0);
        assert!(engine.edge_state().at_end);

        assert_eq!(engine.scroll_right(), Some(ScrollCommand::To(0.0)));

        settle().await;
        assert_eq!(slider.viewport.scroll_offset(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_infinite_moves_by_scroll_distance() {
        let config = SliderConfig {
            scroll_number: 2,
            ..Default::default()
        };
        let (page, slider, engine) = setup(SimSliderSpec::default(), config);
        engine.run(&page);

        assert_eq!(engine.scroll_right(), Some(ScrollCommand::By(440.0)));
        settle().await;
        assert_eq!(slider.viewport.scroll_offset(), 440.0);

        assert_eq!(engine.scroll_left(), Some(ScrollCommand::By(-440.0)));
        settle().await;
        assert_eq!(slider.viewport.scroll_offset(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finite_mode_gates_controls_after_settle_delay() {
        let spec = SimSliderSpec {
            report_completion: false,
            ..Default::default()
        };
        let (page, slider, engine) = setup(spec, finite());
        let left = slider.left.clone().unwrap();
        let right = slider.right.clone().unwrap();

        engine.run(&page);
        assert!(left.is_disabled());
        assert!(!right.is_disabled());

        assert_eq!(engine.scroll_right(), Some(ScrollCommand::By(220.0)));
        tokio::time::sleep(Duration::from_millis(400)).await;
        // Motion finished, but the fixed settle delay has not elapsed yet
        assert!(left.is_disabled());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!left.is_disabled());
        assert!(!right.is_disabled());

        for _ in 0..3 {
            engine.scroll_right();
            settle().await;
        }
        let state = engine.edge_state();
        assert!(state.at_end);
        assert_eq!(left.is_disabled(), state.at_begin);
        assert_eq!(right.is_disabled(), state.at_end);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finite_mode_gates_controls_on_way_back() {
        let (page, slider, engine) = setup(SimSliderSpec::default(), finite());
        let left = slider.left.clone().unwrap();
        let right = slider.right.clone().unwrap();
        engine.run(&page);

        for _ in 0..3 {
            engine.scroll_right();
            settle().await;
        }
        assert_eq!(slider.viewport.scroll_offset(), 660.0);
        assert!(!left.is_disabled());
        assert!(right.is_disabled());

        for _ in 0..3 {
            assert_eq!(engine.scroll_left(), Some(ScrollCommand::By(-220.0)));
            settle().await;
        }
        assert_eq!(slider.viewport.scroll_offset(), 0.0);
        assert!(left.is_disabled());
        assert!(!right.is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_edge_check() {
        let spec = SimSliderSpec {
            report_completion: false,
            scroll: instant(),
            ..Default::default()
        };
        let (page, slider, engine) = setup(spec, finite());
        let left = slider.left.clone().unwrap();
        engine.run(&page);
        assert!(left.is_disabled());

        engine.scroll_right();
        drop(engine);
        settle().await;

        assert_eq!(slider.viewport.scroll_offset(), 220.0);
        assert!(left.is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finite_mode_never_wraps() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let (page, slider, engine) = setup(spec, finite());
        engine.run(&page);

        assert_eq!(engine.scroll_left(), Some(ScrollCommand::By(-220.0)));
        assert_eq!(slider.viewport.scroll_offset(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_scroll_updates_controls_in_finite_mode() {
        let (page, slider, engine) = setup(SimSliderSpec::default(), finite());
        let right = slider.right.clone().unwrap();
        engine.run(&page);

        page.drag_to(&slider, 660.0);
        settle().await;

        assert!(right.is_disabled());
        assert!(!slider.left.as_ref().unwrap().is_disabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_to_slide() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let (page, slider, engine) = setup(spec, SliderConfig::default());
        engine.run(&page);

        assert_eq!(engine.scroll_to_slide(3), Some(ScrollCommand::To(660.0)));
        assert_eq!(slider.viewport.scroll_offset(), 660.0);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(engine.scroll_to_slide(0), Some(ScrollCommand::To(0.0)));

        // Out of range: requested as-is, clamped by the viewport
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(engine.scroll_to_slide(40), Some(ScrollCommand::To(8800.0)));
        assert_eq!(slider.viewport.scroll_offset(), 660.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_clicks_are_debounced() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let (page, slider, engine) = setup(spec, SliderConfig::default());
        engine.run(&page);

        assert!(engine.scroll_right().is_some());
        assert!(engine.scroll_right().is_none());
        assert!(engine.scroll_right().is_none());
        assert_eq!(slider.viewport.scroll_offset(), 220.0);

        tokio::time::sleep(Duration::from_millis(110)).await;
        assert!(engine.scroll_right().is_some());
        assert_eq!(slider.viewport.scroll_offset(), 440.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clicks_are_routed_to_bound_actions() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let (page, slider, engine) = setup(spec, SliderConfig::default());
        engine.run(&page);

        page.click(slider.right.as_ref().unwrap());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(slider.viewport.scroll_offset(), 220.0);

        page.click(&slider.dots[2]);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(slider.viewport.scroll_offset(), 440.0);

        page.click(slider.left.as_ref().unwrap());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(slider.viewport.scroll_offset(), 220.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_ignored_before_run() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let (_page, slider, engine) = setup(spec, SliderConfig::default());

        engine.handle_event(HostEvent::Click(slider.right.as_ref().unwrap().id()));
        assert_eq!(slider.viewport.scroll_offset(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_recomputes_layout() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let (page, slider, engine) = setup(spec, SliderConfig::default());
        engine.run(&page);
        assert_eq!(slider.slides[0].bounding_width(), 200.0);

        tokio::time::sleep(Duration::from_millis(110)).await;
        page.resize(860.0);
        tokio::time::sleep(Duration::from_millis(10)).await;

        // (860 - 2 * 20) / 3
        let width = slider.slides[0].bounding_width();
        assert!((width - 820.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_slide_has_zero_gap() {
        let spec = SimSliderSpec {
            slides: 1,
            scroll: instant(),
            ..Default::default()
        };
        let (page, _slider, engine) = setup(spec, finite());
        engine.run(&page);

        let geometry = engine.geometry();
        assert_eq!(geometry.slides_count, 1);
        assert_eq!(geometry.gap(), 0.0);
        assert_eq!(engine.scroll_to_slide(1), Some(ScrollCommand::To(geometry.slide_width)));
        let state = engine.edge_state();
        assert!(state.at_begin && state.at_end);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_slides_or_controls() {
        let spec = SimSliderSpec {
            slides: 0,
            arrows: false,
            dots: false,
            scroll: instant(),
            ..Default::default()
        };
        let (page, _slider, engine) = setup(spec, finite());
        engine.run(&page);

        assert_eq!(engine.geometry().slides_count, 1);
        assert_eq!(engine.scroll_right(), Some(ScrollCommand::By(0.0)));
        settle().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_ticks_once_per_period() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let (page, _slider, engine) = setup(spec, SliderConfig::default());
        let mut rx = page.subscribe();

        assert!(engine.start_auto_scroll());
        assert!(engine.is_auto_scrolling());

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(drain(&mut rx), 0);

        tokio::time::sleep(Duration::from_millis(6600)).await;
        assert_eq!(drain(&mut rx), 3);

        assert!(engine.stop_auto_scroll());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(drain(&mut rx), 0);
        assert!(!engine.is_auto_scrolling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_wraps_at_end() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let config = SliderConfig {
            infinite_scroll: false,
            auto_scroll: true,
            scroll_period_secs: 1.0,
            ..Default::default()
        };
        let (page, slider, engine) = setup(spec, config);
        engine.run(&page);
        assert!(engine.is_auto_scrolling());

        // Sample halfway between ticks: 0 -> 220 -> 440 -> 660 (end) -> 0
        tokio::time::sleep(Duration::from_millis(500)).await;
        let mut offsets = Vec::new();
        for _ in 0..4 {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            offsets.push(slider.viewport.scroll_offset());
        }
        assert_eq!(offsets, vec![220.0, 440.0, 660.0, 0.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarting_autoplay_replaces_timer() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let (page, _slider, engine) = setup(spec, SliderConfig::default());
        let mut rx = page.subscribe();

        engine.start_auto_scroll();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        engine.start_auto_scroll();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(drain(&mut rx), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let (_page, _slider, engine) = setup(SimSliderSpec::default(), SliderConfig::default());

        assert!(!engine.stop_auto_scroll());
        engine.start_auto_scroll();
        assert!(engine.stop_auto_scroll());
        assert!(!engine.stop_auto_scroll());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_period_does_not_start() {
        let config = SliderConfig {
            scroll_period_secs: 0.0,
            ..Default::default()
        };
        let (_page, _slider, engine) = setup(SimSliderSpec::default(), config);

        assert!(!engine.start_auto_scroll());
        assert!(!engine.is_auto_scrolling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_autoplay() {
        let spec = SimSliderSpec {
            scroll: instant(),
            ..Default::default()
        };
        let (page, _slider, engine) = setup(spec, SliderConfig::default());
        let mut rx = page.subscribe();

        engine.start_auto_scroll();
        drop(engine);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(drain(&mut rx), 0);
    }
}
