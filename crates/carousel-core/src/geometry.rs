//! Scroll geometry derived from live viewport readings
//!
//! Nothing here is cached: every value is recomputed from the host on demand.

use std::sync::Arc;

use crate::host::{Slide, Viewport};

/// Scroll offsets closer than this to an edge count as being on it
pub const EDGE_TOLERANCE: f64 = 0.5;

/// Inferred spacing between adjacent slides.
///
/// Zero when there is at most one slide.
pub fn gap(inner_scroll_width: f64, slides_count: usize, slide_width: f64) -> f64 {
    if slides_count <= 1 {
        return 0.0;
    }
    let count = slides_count as f64;
    (inner_scroll_width - count * slide_width) / (count - 1.0)
}

/// Distance moved by one left/right command
pub fn scroll_distance(slide_width: f64, gap: f64, scroll_number: u32) -> f64 {
    (slide_width + gap) * scroll_number as f64
}

/// Absolute offset of the slide at `index`. Not bounds-checked.
pub fn slide_offset(slide_width: f64, gap: f64, index: usize) -> f64 {
    if index == 0 {
        return 0.0;
    }
    (slide_width + gap) * index as f64
}

/// Whether the viewport sits at its leftmost or rightmost extreme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeState {
    pub at_begin: bool,
    pub at_end: bool,
}

impl EdgeState {
    pub fn from_readings(scroll_offset: f64, scroll_extent: f64, client_width: f64) -> Self {
        let no_overflow = near(scroll_extent, client_width);
        Self {
            at_begin: near(scroll_offset, 0.0) || no_overflow,
            at_end: near(scroll_extent, client_width + scroll_offset) || no_overflow,
        }
    }

    pub fn read(viewport: &dyn Viewport) -> Self {
        Self::from_readings(
            viewport.scroll_offset(),
            viewport.scroll_extent(),
            viewport.client_width(),
        )
    }
}

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < EDGE_TOLERANCE
}

/// One snapshot of the readings the geometry formulas need
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGeometry {
    pub inner_width: f64,
    pub slide_width: f64,
    pub inner_scroll_width: f64,
    pub slides_count: usize,
}

impl ScrollGeometry {
    pub fn gap(&self) -> f64 {
        gap(self.inner_scroll_width, self.slides_count, self.slide_width)
    }

    pub fn scroll_distance(&self, scroll_number: u32) -> f64 {
        scroll_distance(self.slide_width, self.gap(), scroll_number)
    }

    pub fn slide_offset(&self, index: usize) -> f64 {
        slide_offset(self.slide_width, self.gap(), index)
    }
}

/// Reads geometry from the host for one slider
#[derive(Clone)]
pub struct GeometryCalculator {
    viewport: Arc<dyn Viewport>,
    slides: Vec<Arc<dyn Slide>>,
}

impl GeometryCalculator {
    pub fn new(viewport: Arc<dyn Viewport>, slides: Vec<Arc<dyn Slide>>) -> Self {
        Self { viewport, slides }
    }

    pub fn viewport(&self) -> &Arc<dyn Viewport> {
        &self.viewport
    }

    pub fn slides(&self) -> &[Arc<dyn Slide>] {
        &self.slides
    }

    /// Current readings. A slider without slides reads as one zero-width slide.
    pub fn read(&self) -> ScrollGeometry {
        ScrollGeometry {
            inner_width: self.viewport.client_width(),
            slide_width: self
                .slides
                .first()
                .map(|slide| slide.bounding_width())
                .unwrap_or(0.0),
            inner_scroll_width: self.viewport.scroll_extent(),
            slides_count: self.slides.len().max(1),
        }
    }

    pub fn edge_state(&self) -> EdgeState {
        EdgeState::read(self.viewport.as_ref())
    }
}
