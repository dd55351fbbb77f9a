use std::sync::Arc;

use tracing::debug;

use crate::debounce::Debouncer;
use crate::edge::EdgeStateTracker;
use crate::geometry::GeometryCalculator;
use crate::host::ScrollBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// A scroll request handed to the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCommand {
    /// Absolute offset
    To(f64),
    /// Relative delta
    By(f64),
}

/// Issues left/right/indexed scroll commands
pub struct ScrollController {
    geometry: GeometryCalculator,
    edges: Arc<EdgeStateTracker>,
    scroll_number: u32,
    infinite: bool,
    left_guard: Debouncer,
    right_guard: Debouncer,
    slide_guard: Debouncer,
}

impl ScrollController {
    pub fn new(
        geometry: GeometryCalculator,
        edges: Arc<EdgeStateTracker>,
        scroll_number: u32,
        infinite: bool,
    ) -> Self {
        Self {
            geometry,
            edges,
            scroll_number,
            infinite,
            left_guard: Debouncer::standard("scroll_left"),
            right_guard: Debouncer::standard("scroll_right"),
            slide_guard: Debouncer::standard("scroll_to_slide"),
        }
    }

    /// Move one unit in `direction`.
    ///
    /// With `wrap`, a move past the first slide jumps to the end and a move
    /// past the last slide jumps back to the start. Not debounced.
    pub fn advance(&self, direction: Direction, wrap: bool) -> ScrollCommand {
        let edges = self.geometry.edge_state();
        let distance = self.geometry.read().scroll_distance(self.scroll_number);

        let command = match direction {
            Direction::Left if wrap && edges.at_begin => {
                ScrollCommand::To(self.geometry.viewport().scroll_extent())
            }
            Direction::Right if wrap && edges.at_end => ScrollCommand::To(0.0),
            Direction::Left => ScrollCommand::By(-distance),
            Direction::Right => ScrollCommand::By(distance),
        };

        debug!(?direction, wrap, ?command, "Advancing slider");
        self.issue(command);
        command
    }

    /// Debounced left move; `None` when dropped
    pub fn scroll_left(&self) -> Option<ScrollCommand> {
        self.left_guard.run(|| self.navigate(Direction::Left))
    }

    /// Debounced right move; `None` when dropped
    pub fn scroll_right(&self) -> Option<ScrollCommand> {
        self.right_guard.run(|| self.navigate(Direction::Right))
    }

    /// Debounced jump to the slide at `index`.
    ///
    /// The index is not checked against the slide count; the viewport clamps
    /// out-of-range offsets.
    pub fn scroll_to_slide(&self, index: usize) -> Option<ScrollCommand> {
        self.slide_guard.run(|| {
            let offset = self.geometry.read().slide_offset(index);
            let command = ScrollCommand::To(offset);
            debug!(index, offset, "Scrolling to slide");
            self.issue(command);
            command
        })
    }

    pub fn is_infinite(&self) -> bool {
        self.infinite
    }

    fn navigate(&self, direction: Direction) -> ScrollCommand {
        if self.infinite {
            return self.advance(direction, true);
        }
        let command = self.advance(direction, false);
        self.edges.handle_control_on_edge();
        command
    }

    fn issue(&self, command: ScrollCommand) {
        let viewport = self.geometry.viewport();
        match command {
            ScrollCommand::To(offset) => viewport.scroll_to(offset, ScrollBehavior::Smooth),
            ScrollCommand::By(delta) => viewport.scroll_by(delta, ScrollBehavior::Smooth),
        }
    }
}
