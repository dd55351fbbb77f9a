use tracing::debug;

use crate::debounce::Debouncer;
use crate::geometry::GeometryCalculator;
use crate::host::SlideStyle;

/// Width that fits `slides_per_view` slides and their gaps into the viewport,
/// never below `min_width`.
pub fn slide_width(inner_width: f64, gap: f64, slides_per_view: u32, min_width: f64) -> f64 {
    let per_view = slides_per_view as f64;
    let candidate = (inner_width - gap * (per_view - 1.0)) / per_view;
    candidate.max(min_width)
}

/// Sizes every slide from the current viewport width
pub struct LayoutEngine {
    geometry: GeometryCalculator,
    slides_per_view: u32,
    debouncer: Debouncer,
}

impl LayoutEngine {
    pub fn new(geometry: GeometryCalculator, slides_per_view: u32) -> Self {
        Self {
            geometry,
            slides_per_view,
            debouncer: Debouncer::standard("apply_layout"),
        }
    }

    /// Recompute and apply the slide width immediately.
    ///
    /// The minimum-width floor is read from the first slide. Returns the
    /// width written to every slide.
    pub fn apply_now(&self) -> f64 {
        let readings = self.geometry.read();
        let min_width = self
            .geometry
            .slides()
            .first()
            .map(|slide| slide.min_width())
            .unwrap_or(0.0);
        let width = slide_width(
            readings.inner_width,
            readings.gap(),
            self.slides_per_view,
            min_width,
        );

        let style = SlideStyle::fixed(width);
        for slide in self.geometry.slides() {
            slide.set_style(style);
        }

        debug!(
            inner_width = readings.inner_width,
            gap = readings.gap(),
            width,
            slides = self.geometry.slides().len(),
            "Applied slide layout"
        );
        width
    }

    /// Debounced [`apply_now`](Self::apply_now); `None` when dropped
    pub fn apply_layout(&self) -> Option<f64> {
        self.debouncer.run(|| self.apply_now())
    }
}
