//! # Quakescope Analytics
//!
//! The statistical building blocks of a regional seismicity assessment.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of how
//!   events were fetched. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** Every detector is a free function of the
//!   filtered events and its parameter section. Sparse inputs produce explicit
//!   "insufficient data" results rather than errors.
//!
//! ## Public API
//!
//! - `RegionFilter`: selects events inside the request envelope.
//! - `DescriptiveStatistics`, `TemporalPattern`, `SpatialClustering`: per-aspect summaries.
//! - `GutenbergRichterFit`: frequency-magnitude regression.
//! - `Forecast` and `magnitude_exceedance_probability`: Poisson exceedance forecast.

// Declare the modules that constitute this crate.
pub mod descriptive;
pub mod error;
pub mod filter;
pub mod forecast;
pub mod gutenberg_richter;
pub mod spatial;
pub mod temporal;

// Re-export the key components to create a clean, public-facing API.
pub use descriptive::{DepthStatistics, DescriptiveStatistics, NotableEvent, notable_events};
pub use error::AnalyticsError;
pub use filter::{RegionFilter, RegionSelection};
pub use forecast::{ExceedanceBucket, Forecast, magnitude_exceedance_probability};
pub use gutenberg_richter::GutenbergRichterFit;
pub use spatial::SpatialClustering;
pub use temporal::TemporalPattern;
