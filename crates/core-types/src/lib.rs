pub mod catalog;
pub mod enums;
pub mod error;
pub mod geo;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ClusteringClass, DepthBand, RiskLevel, TemporalTrend};
pub use error::CoreError;
pub use geo::{EARTH_RADIUS_KM, haversine_distance_km};
pub use structs::{AnalysisRequest, EarthquakeEvent, GeoPoint, MAGNITUDE_RANGE};
