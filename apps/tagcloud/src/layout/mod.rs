// Word-cloud layout engine: weight normalization, spiral placement with
// collision avoidance, and post-placement auto-fit.
// A pass is synchronous and CPU-bound; async callers run it inside
// tokio::task::spawn_blocking.

pub mod autofit;
pub mod cloud;
pub mod collision;
pub mod font_metrics;
pub mod geometry;
pub mod host;
pub mod spiral;
pub mod weights;

// Re-export the public API consumed by the HTTP front end and embedders.
pub use cloud::{CloudOptions, OmittedTopic, PlacedTopic, RenderReport, RenderStatus, TagCloud};
pub use font_metrics::{MetricMeasurer, Typeface};
pub use geometry::{Point, Rect, Size};
pub use host::{CloudHost, ElementSpec, HeadlessHost, MeasuredBox, TextMeasurer};
