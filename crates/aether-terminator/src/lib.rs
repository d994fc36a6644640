//! Day/night terminator for map overlays.
//!
//! Builds the night-side polygon for an instant, in two output shapes: a
//! `[lat, lng]` vertex list for polygon overlay primitives and a GeoJSON
//! `Feature`. A [`TerminatorRefresher`] keeps the polygon current on a fixed
//! interval.
//!
//! ```
//! use aether_astro::UtcInstant;
//! use aether_terminator::{TerminatorOptions, build_terminator_polygon};
//!
//! let instant = UtcInstant::parse("2024-06-21T00:00:00Z").unwrap();
//! let polygon = build_terminator_polygon(instant, &TerminatorOptions::default()).unwrap();
//! assert_eq!(polygon.samples.len(), 721);
//! ```

mod error;
pub mod geojson;
pub mod polygon;
pub mod refresh;

pub use error::TerminatorError;
pub use geojson::{Feature, FeatureOptions, Geometry};
pub use polygon::{
    ClosingPole, DEFAULT_RESOLUTION, TerminatorOptions, TerminatorPolygon, TerminatorSample,
    build_terminator_polygon, latitude_of_terminator, sample_terminator,
};
pub use refresh::{
    Clock, DEFAULT_REFRESH_INTERVAL, FixedClock, RefreshOutcome, RefreshSchedule, SystemClock,
    TerminatorRefresher, run_blocking,
};
