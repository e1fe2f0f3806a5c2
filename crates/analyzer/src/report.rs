use analytics::{
    DepthStatistics, Forecast, GutenbergRichterFit, NotableEvent, SpatialClustering,
    TemporalPattern,
};
use chrono::{DateTime, Utc};
use core_types::{ClusteringClass, RiskLevel, TemporalTrend};
use risk::RiskFactor;
use serde::{Deserialize, Serialize};

/// The complete assessment of one region and time window.
///
/// Created once per `analyze` call and never mutated afterwards. Sparse
/// catalogs are represented, not rejected: zero events yield zeroed
/// statistics, "insufficient-data" pattern labels, a zero-confidence fit and
/// a `low` risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    // I. Envelope
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,

    // II. Counts and descriptive statistics
    pub total_events: usize,
    /// Input records skipped as malformed.
    pub dropped_events: usize,
    pub average_magnitude: f64,
    pub largest_magnitude: f64,
    pub daily_rate: f64,
    pub depth_stats: DepthStatistics,

    // III. Patterns
    pub temporal_pattern: TemporalPattern,
    pub spatial_clustering: SpatialClustering,
    pub gutenberg_richter: GutenbergRichterFit,

    // IV. Risk
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub risk_factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,

    // V. Supporting detail
    pub notable_events: Vec<NotableEvent>,
    /// `None` when forecasting is disabled in the configuration.
    pub forecast: Option<Forecast>,
}

impl AnalysisResult {
    /// True when any component had to fall back to an "insufficient data" verdict.
    pub fn has_insufficient_data(&self) -> bool {
        self.temporal_pattern.trend == TemporalTrend::InsufficientData
            || self.spatial_clustering.class == ClusteringClass::InsufficientData
            || !self.gutenberg_richter.is_available()
            || matches!(self.forecast, Some(Forecast::InsufficientData { .. }))
    }
}
