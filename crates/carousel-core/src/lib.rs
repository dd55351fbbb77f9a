pub mod autoplay;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod edge;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod sim;

pub use config::{AppConfig, EasingType, ScrollConfig, SliderConfig};
pub use controller::{Direction, ScrollCommand};
pub use engine::{Binding, SliderEngine};
pub use error::{Error, Result};
pub use geometry::{EdgeState, ScrollGeometry};
pub use host::{
    ContainerElements, Control, ControlId, ControlSet, DotControl, ElementLocator, EventSource,
    HostEvent, InnerRegion, ScrollBehavior, Slide, SlideStyle, Viewport,
};
