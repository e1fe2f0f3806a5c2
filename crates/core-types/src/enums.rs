use serde::{Deserialize, Serialize};
use std::fmt;

/// The four-level risk category produced by the risk scorer.
///
/// Variants are declared in increasing order of severity so that the derived
/// `Ord` can be used to compare levels directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of how the event rate changed across the analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemporalTrend {
    Accelerating,
    Steady,
    Decreasing,
    InsufficientData,
}

impl TemporalTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalTrend::Accelerating => "accelerating",
            TemporalTrend::Steady => "steady",
            TemporalTrend::Decreasing => "decreasing",
            TemporalTrend::InsufficientData => "insufficient-data",
        }
    }
}

impl fmt::Display for TemporalTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of how tightly events gather around their centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusteringClass {
    HighlyClustered,
    ModeratelyClustered,
    Dispersed,
    InsufficientData,
}

impl ClusteringClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusteringClass::HighlyClustered => "highly-clustered",
            ClusteringClass::ModeratelyClustered => "moderately-clustered",
            ClusteringClass::Dispersed => "dispersed",
            ClusteringClass::InsufficientData => "insufficient-data",
        }
    }
}

impl fmt::Display for ClusteringClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hypocentral depth band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthBand {
    Shallow,
    Intermediate,
    Deep,
}

impl DepthBand {
    /// Assigns a depth to its band. Upper bounds are inclusive, so a 35 km
    /// event with a 35 km shallow limit is shallow.
    pub fn classify(depth_km: f64, shallow_max_km: f64, intermediate_max_km: f64) -> Self {
        if depth_km <= shallow_max_km {
            DepthBand::Shallow
        } else if depth_km <= intermediate_max_km {
            DepthBand::Intermediate
        } else {
            DepthBand::Deep
        }
    }
}
