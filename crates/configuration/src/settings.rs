use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// The root configuration for one analysis call.
///
/// Every tunable heuristic lives here rather than in module-level constants,
/// so an analysis is a pure function of `(request, events, config)`.
/// All sections fall back to their defaults when omitted from the TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub depth: DepthBands,
    pub temporal: TemporalParams,
    pub spatial: SpatialParams,
    pub gutenberg_richter: GutenbergRichterParams,
    pub risk: RiskParams,
    pub forecast: ForecastParams,
    /// How many of the largest events to list in the result.
    pub notable_event_limit: usize,
}

/// Upper bounds of the depth bands, inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthBands {
    pub shallow_max_km: f64,
    pub intermediate_max_km: f64,
}

/// Parameters for the half-window rate comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalParams {
    /// The newer half must exceed the older half's rate by this factor to be
    /// "accelerating" (or fall below it by the same factor to be "decreasing").
    pub acceleration_factor: f64,
    pub min_events: usize,
}

/// Parameters for centroid-based cluster detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialParams {
    pub clustering_radius_km: f64,
    /// Fraction of events within the radius at or above which a set is highly clustered.
    pub highly_clustered_fraction: f64,
    /// Fraction at or above which a set is moderately clustered.
    pub moderately_clustered_fraction: f64,
    pub min_events: usize,
}

/// Parameters for the frequency-magnitude fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GutenbergRichterParams {
    pub bin_width: f64,
    /// Added to the maximum-curvature estimate of Mc. Literature values of
    /// +0.2 are common for catalogs with a gradual roll-off.
    pub mc_correction: f64,
    /// Minimum number of events at or above Mc before a line is fitted.
    pub min_events: usize,
    /// Minimum number of distinct cumulative points in the regression.
    pub min_bins: usize,
    pub low_confidence_events: usize,
    pub high_confidence_events: usize,
}

/// Parameters for the weighted risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    pub major_event_magnitude: f64,
    /// Events per day above which the region counts as highly active.
    pub high_activity_daily_rate: f64,
    /// Fraction of shallow events at or above which shallow depths dominate.
    pub shallow_dominance_fraction: f64,
    /// b-values strictly below this are treated as a stress-concentration signal.
    pub low_b_value: f64,
    /// The b-value signal is ignored when the fit confidence is below this.
    pub min_fit_confidence: f64,
    pub weights: RiskWeights,
    pub thresholds: RiskThresholds,
}

/// Contribution of each signal to the risk score. All weights must be non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub major_event: f64,
    pub high_activity: f64,
    pub accelerating: f64,
    pub highly_clustered: f64,
    pub shallow_dominance: f64,
    pub low_b_value: f64,
}

/// Score cut-offs. A score at or above a threshold reaches that level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub moderate: f64,
    pub high: f64,
    pub critical: f64,
}

/// Parameters for the Poisson exceedance forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastParams {
    pub enabled: bool,
    pub horizon_days: f64,
    pub magnitudes: Vec<f64>,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            depth: DepthBands::default(),
            temporal: TemporalParams::default(),
            spatial: SpatialParams::default(),
            gutenberg_richter: GutenbergRichterParams::default(),
            risk: RiskParams::default(),
            forecast: ForecastParams::default(),
            notable_event_limit: 5,
        }
    }
}

impl Default for DepthBands {
    fn default() -> Self {
        Self {
            shallow_max_km: 35.0,
            intermediate_max_km: 300.0,
        }
    }
}

impl Default for TemporalParams {
    fn default() -> Self {
        Self {
            acceleration_factor: 1.5,
            min_events: 2,
        }
    }
}

impl Default for SpatialParams {
    fn default() -> Self {
        Self {
            clustering_radius_km: 25.0,
            highly_clustered_fraction: 0.7,
            moderately_clustered_fraction: 0.4,
            min_events: 2,
        }
    }
}

impl Default for GutenbergRichterParams {
    fn default() -> Self {
        Self {
            bin_width: 0.1,
            mc_correction: 0.0,
            min_events: 3,
            min_bins: 3,
            low_confidence_events: 20,
            high_confidence_events: 50,
        }
    }
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            major_event_magnitude: 6.0,
            high_activity_daily_rate: 5.0,
            shallow_dominance_fraction: 0.7,
            low_b_value: 0.8,
            min_fit_confidence: 0.3,
            weights: RiskWeights::default(),
            thresholds: RiskThresholds::default(),
        }
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            major_event: 0.5,
            high_activity: 0.2,
            accelerating: 0.15,
            highly_clustered: 0.1,
            shallow_dominance: 0.05,
            low_b_value: 0.1,
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            moderate: 0.15,
            high: 0.4,
            critical: 0.7,
        }
    }
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            enabled: true,
            horizon_days: 30.0,
            magnitudes: vec![4.0, 5.0, 6.0, 7.0],
        }
    }
}

// --- Validation ---

impl AnalysisConfig {
    /// Checks that every parameter is usable. Invalid values are reported, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.depth;
        ensure_finite("depth.shallow_max_km", d.shallow_max_km)?;
        ensure_finite("depth.intermediate_max_km", d.intermediate_max_km)?;
        if d.shallow_max_km < 0.0 || d.intermediate_max_km <= d.shallow_max_km {
            return Err(invalid(
                "depth bands must satisfy 0 <= shallow_max_km < intermediate_max_km",
            ));
        }

        ensure_finite("temporal.acceleration_factor", self.temporal.acceleration_factor)?;
        if self.temporal.acceleration_factor <= 1.0 {
            return Err(invalid("temporal.acceleration_factor must be greater than 1"));
        }
        if self.temporal.min_events < 2 {
            return Err(invalid("temporal.min_events must be at least 2"));
        }

        let s = &self.spatial;
        ensure_positive("spatial.clustering_radius_km", s.clustering_radius_km)?;
        let fractions_ordered = s.moderately_clustered_fraction > 0.0
            && s.moderately_clustered_fraction < s.highly_clustered_fraction
            && s.highly_clustered_fraction <= 1.0;
        if !fractions_ordered {
            return Err(invalid(
                "spatial fractions must satisfy 0 < moderately_clustered_fraction < highly_clustered_fraction <= 1",
            ));
        }
        if s.min_events < 2 {
            return Err(invalid("spatial.min_events must be at least 2"));
        }

        let g = &self.gutenberg_richter;
        ensure_positive("gutenberg_richter.bin_width", g.bin_width)?;
        ensure_finite("gutenberg_richter.mc_correction", g.mc_correction)?;
        if g.min_events < 3 || g.min_bins < 3 {
            return Err(invalid(
                "gutenberg_richter.min_events and min_bins must both be at least 3",
            ));
        }
        if g.low_confidence_events == 0 || g.high_confidence_events <= g.low_confidence_events {
            return Err(invalid(
                "gutenberg_richter confidence sizes must satisfy 0 < low_confidence_events < high_confidence_events",
            ));
        }

        let r = &self.risk;
        ensure_finite("risk.major_event_magnitude", r.major_event_magnitude)?;
        ensure_finite("risk.high_activity_daily_rate", r.high_activity_daily_rate)?;
        ensure_finite("risk.shallow_dominance_fraction", r.shallow_dominance_fraction)?;
        ensure_finite("risk.low_b_value", r.low_b_value)?;
        if !(0.0..=1.0).contains(&r.min_fit_confidence) {
            return Err(invalid("risk.min_fit_confidence must lie in [0, 1]"));
        }
        let w = &r.weights;
        for (name, weight) in [
            ("risk.weights.major_event", w.major_event),
            ("risk.weights.high_activity", w.high_activity),
            ("risk.weights.accelerating", w.accelerating),
            ("risk.weights.highly_clustered", w.highly_clustered),
            ("risk.weights.shallow_dominance", w.shallow_dominance),
            ("risk.weights.low_b_value", w.low_b_value),
        ] {
            ensure_finite(name, weight)?;
            if weight < 0.0 {
                return Err(invalid(&format!("{name} must not be negative")));
            }
        }
        let t = &r.thresholds;
        ensure_finite("risk.thresholds.moderate", t.moderate)?;
        ensure_finite("risk.thresholds.high", t.high)?;
        ensure_finite("risk.thresholds.critical", t.critical)?;
        if !(t.moderate > 0.0 && t.moderate < t.high && t.high < t.critical) {
            return Err(invalid(
                "risk thresholds must satisfy 0 < moderate < high < critical",
            ));
        }

        ensure_positive("forecast.horizon_days", self.forecast.horizon_days)?;
        if let Some(m) = self.forecast.magnitudes.iter().find(|m| !m.is_finite()) {
            return Err(invalid(&format!("forecast.magnitudes contains non-finite value {m}")));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

fn ensure_finite(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be finite, got {value}")))
    }
}

fn ensure_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be positive, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn acceleration_factor_must_exceed_one() {
        let mut config = AnalysisConfig::default();
        config.temporal.acceleration_factor = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn thresholds_must_increase() {
        let mut config = AnalysisConfig::default();
        config.risk.thresholds.high = config.risk.thresholds.critical;
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.risk.weights.accelerating = -0.1;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("risk.weights.accelerating"), "{err}");
    }

    #[test]
    fn cluster_fractions_must_be_ordered() {
        let mut config = AnalysisConfig::default();
        config.spatial.moderately_clustered_fraction = 0.8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn forecast_magnitudes_must_be_finite() {
        let mut config = AnalysisConfig::default();
        config.forecast.magnitudes.push(f64::INFINITY);
        assert!(config.validate().is_err());
    }
}
