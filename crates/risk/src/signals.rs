use configuration::{RiskParams, RiskWeights};
use core_types::{ClusteringClass, TemporalTrend};
use serde::{Deserialize, Serialize};

/// Raw measurements the scorer derives its signals from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskObservations {
    /// `None` when no events were observed.
    pub largest_magnitude: Option<f64>,
    pub daily_rate: f64,
    pub temporal_trend: TemporalTrend,
    pub clustering: ClusteringClass,
    pub shallow_fraction: Option<f64>,
    /// Only set when a frequency-magnitude fit succeeded.
    pub b_value: Option<f64>,
    pub fit_confidence: f64,
}

impl Default for RiskObservations {
    fn default() -> Self {
        Self {
            largest_magnitude: None,
            daily_rate: 0.0,
            temporal_trend: TemporalTrend::InsufficientData,
            clustering: ClusteringClass::InsufficientData,
            shallow_fraction: None,
            b_value: None,
            fit_confidence: 0.0,
        }
    }
}

/// The individual contributors to the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskFactor {
    MajorEvent,
    HighActivity,
    Accelerating,
    HighlyClustered,
    ShallowDominance,
    LowBValue,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 6] = [
        RiskFactor::MajorEvent,
        RiskFactor::HighActivity,
        RiskFactor::Accelerating,
        RiskFactor::HighlyClustered,
        RiskFactor::ShallowDominance,
        RiskFactor::LowBValue,
    ];

    pub fn weight(&self, weights: &RiskWeights) -> f64 {
        match self {
            RiskFactor::MajorEvent => weights.major_event,
            RiskFactor::HighActivity => weights.high_activity,
            RiskFactor::Accelerating => weights.accelerating,
            RiskFactor::HighlyClustered => weights.highly_clustered,
            RiskFactor::ShallowDominance => weights.shallow_dominance,
            RiskFactor::LowBValue => weights.low_b_value,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskFactor::MajorEvent => "a major earthquake occurred in the window",
            RiskFactor::HighActivity => "daily event rate exceeds the high-activity threshold",
            RiskFactor::Accelerating => "event rate is accelerating",
            RiskFactor::HighlyClustered => "events are highly clustered",
            RiskFactor::ShallowDominance => "shallow events dominate",
            RiskFactor::LowBValue => "low b-value suggests stress concentration",
        }
    }
}

/// Binary risk signals. Turning any signal on never lowers the resulting level
/// because all weights are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskSignals {
    pub major_event: bool,
    pub high_activity: bool,
    pub accelerating: bool,
    pub highly_clustered: bool,
    pub shallow_dominance: bool,
    pub low_b_value: bool,
}

impl RiskSignals {
    pub fn from_observations(obs: &RiskObservations, params: &RiskParams) -> Self {
        Self {
            major_event: obs
                .largest_magnitude
                .is_some_and(|m| m >= params.major_event_magnitude),
            high_activity: obs.daily_rate > params.high_activity_daily_rate,
            accelerating: obs.temporal_trend == TemporalTrend::Accelerating,
            highly_clustered: obs.clustering == ClusteringClass::HighlyClustered,
            shallow_dominance: obs
                .shallow_fraction
                .is_some_and(|f| f >= params.shallow_dominance_fraction),
            low_b_value: obs.fit_confidence >= params.min_fit_confidence
                && obs.b_value.is_some_and(|b| b < params.low_b_value),
        }
    }

    pub fn is_active(&self, factor: RiskFactor) -> bool {
        match factor {
            RiskFactor::MajorEvent => self.major_event,
            RiskFactor::HighActivity => self.high_activity,
            RiskFactor::Accelerating => self.accelerating,
            RiskFactor::HighlyClustered => self.highly_clustered,
            RiskFactor::ShallowDominance => self.shallow_dominance,
            RiskFactor::LowBValue => self.low_b_value,
        }
    }

    pub fn set(&mut self, factor: RiskFactor, active: bool) {
        match factor {
            RiskFactor::MajorEvent => self.major_event = active,
            RiskFactor::HighActivity => self.high_activity = active,
            RiskFactor::Accelerating => self.accelerating = active,
            RiskFactor::HighlyClustered => self.highly_clustered = active,
            RiskFactor::ShallowDominance => self.shallow_dominance = active,
            RiskFactor::LowBValue => self.low_b_value = active,
        }
    }

    /// Active factors in a fixed order.
    pub fn active_factors(&self) -> Vec<RiskFactor> {
        RiskFactor::ALL
            .into_iter()
            .filter(|f| self.is_active(*f))
            .collect()
    }
}
