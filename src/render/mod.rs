//! Pure transformation from a [`TripItinerary`](crate::types::TripItinerary) to a
//! [`VisualTree`], plus its HTML serialization.

pub mod chart;
pub mod html;
pub mod renderer;
pub mod tree;

pub use chart::{budget_segments, format_cny, segment_color, ChartSegment, PALETTE};
pub use renderer::{activity_image_url, render, RenderOptions, RenderedDocument};
pub use tree::{Element, Node, VisualTree};
