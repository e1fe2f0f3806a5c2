use crate::error::RiskError;
use crate::recommendations::recommendations_for;
use crate::signals::{RiskFactor, RiskSignals};
use configuration::{RiskParams, RiskThresholds};
use core_types::RiskLevel;
use serde::{Deserialize, Serialize};

/// The scorer's terminal output for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: f64,
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
}

/// Weighted, threshold-based risk scorer.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    params: RiskParams,
}

impl RiskScorer {
    /// Creates a new `RiskScorer` with the given configuration parameters.
    pub fn new(params: RiskParams) -> Result<Self, RiskError> {
        // Validate that risk parameters are logical.
        let w = &params.weights;
        let weights = [
            w.major_event,
            w.high_activity,
            w.accelerating,
            w.highly_clustered,
            w.shallow_dominance,
            w.low_b_value,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RiskError::InvalidParameters(
                "risk weights must be finite and non-negative".to_string(),
            ));
        }
        let t = &params.thresholds;
        if !(t.moderate > 0.0 && t.moderate < t.high && t.high < t.critical) {
            return Err(RiskError::InvalidParameters(
                "thresholds must satisfy 0 < moderate < high < critical".to_string(),
            ));
        }
        Ok(Self { params })
    }

    /// Sum of the weights of every active signal.
    pub fn score(&self, signals: &RiskSignals) -> f64 {
        signals
            .active_factors()
            .iter()
            .map(|f| f.weight(&self.params.weights))
            .sum()
    }

    pub fn assess(&self, signals: &RiskSignals) -> RiskAssessment {
        let score = self.score(signals);
        let level = level_for_score(score, &self.params.thresholds);
        let factors = signals.active_factors();

        tracing::debug!(score, level = %level, ?factors, "Risk assessed.");

        RiskAssessment {
            level,
            score,
            factors,
            recommendations: recommendations_for(level)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Maps a score onto a level. Reaching a threshold is enough to enter its level.
pub fn level_for_score(score: f64, thresholds: &RiskThresholds) -> RiskLevel {
    if score >= thresholds.critical {
        RiskLevel::Critical
    } else if score >= thresholds.high {
        RiskLevel::High
    } else if score >= thresholds.moderate {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Scores the signals and returns only the level.
pub fn classify_risk_level(
    signals: &RiskSignals,
    params: &RiskParams,
) -> Result<RiskLevel, RiskError> {
    Ok(RiskScorer::new(params.clone())?.assess(signals).level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scorer() -> RiskScorer {
        RiskScorer::new(RiskParams::default()).unwrap()
    }

    #[test]
    fn no_signals_is_low() {
        let assessment = scorer().assess(&RiskSignals::default());
        assert_eq!(assessment.level, RiskLevel::Low);
        assert_eq!(assessment.score, 0.0);
        assert!(assessment.factors.is_empty());
        assert_eq!(assessment.recommendations.len(), 2);
    }

    #[test]
    fn a_major_event_alone_is_high() {
        let signals = RiskSignals {
            major_event: true,
            ..RiskSignals::default()
        };
        assert_eq!(scorer().assess(&signals).level, RiskLevel::High);
    }

    #[test]
    fn major_event_with_high_activity_is_critical() {
        let signals = RiskSignals {
            major_event: true,
            high_activity: true,
            ..RiskSignals::default()
        };
        let assessment = scorer().assess(&signals);
        assert_eq!(assessment.level, RiskLevel::Critical);
        assert_eq!(assessment.factors, vec![RiskFactor::MajorEvent, RiskFactor::HighActivity]);
    }

    #[test]
    fn accelerating_swarm_is_moderate() {
        let signals = RiskSignals {
            accelerating: true,
            highly_clustered: true,
            ..RiskSignals::default()
        };
        assert_eq!(scorer().assess(&signals).level, RiskLevel::Moderate);
    }

    #[test]
    fn threshold_boundaries_are_inclusive() {
        let t = RiskThresholds::default();
        assert_eq!(level_for_score(t.moderate - 1e-9, &t), RiskLevel::Low);
        assert_eq!(level_for_score(t.moderate, &t), RiskLevel::Moderate);
        assert_eq!(level_for_score(t.high, &t), RiskLevel::High);
        assert_eq!(level_for_score(t.critical, &t), RiskLevel::Critical);
    }

    #[test]
    fn rejects_negative_weights_and_unordered_thresholds() {
        let mut params = RiskParams::default();
        params.weights.low_b_value = -1.0;
        assert!(RiskScorer::new(params).is_err());

        let mut params = RiskParams::default();
        params.thresholds.moderate = 0.5;
        assert!(matches!(
            classify_risk_level(&RiskSignals::default(), &params),
            Err(RiskError::InvalidParameters(_))
        ));
    }

    fn signals_strategy() -> impl Strategy<Value = RiskSignals> {
        prop::array::uniform6(any::<bool>()).prop_map(|b| RiskSignals {
            major_event: b[0],
            high_activity: b[1],
            accelerating: b[2],
            highly_clustered: b[3],
            shallow_dominance: b[4],
            low_b_value: b[5],
        })
    }

    proptest! {
        /// Raising any single signal never lowers the level.
        #[test]
        fn level_is_monotonic_in_each_signal(signals in signals_strategy(), index in 0usize..6) {
            let params = RiskParams::default();
            let factor = RiskFactor::ALL[index];

            let mut lowered = signals;
            lowered.set(factor, false);
            let mut raised = signals;
            raised.set(factor, true);

            let before = classify_risk_level(&lowered, &params).unwrap();
            let after = classify_risk_level(&raised, &params).unwrap();
            prop_assert!(after >= before, "{factor:?}: {before} -> {after}");
        }

        /// Any valid weighting keeps the monotonicity.
        #[test]
        fn monotonic_under_random_weights(
            signals in signals_strategy(),
            index in 0usize..6,
            weights in prop::array::uniform6(0.0f64..1.0),
        ) {
            let mut params = RiskParams::default();
            params.weights.major_event = weights[0];
            params.weights.high_activity = weights[1];
            params.weights.accelerating = weights[2];
            params.weights.highly_clustered = weights[3];
            params.weights.shallow_dominance = weights[4];
            params.weights.low_b_value = weights[5];
            let scorer = RiskScorer::new(params).unwrap();
            let factor = RiskFactor::ALL[index];

            let mut lowered = signals;
            lowered.set(factor, false);
            let mut raised = signals;
            raised.set(factor, true);

            prop_assert!(scorer.assess(&raised).level >= scorer.assess(&lowered).level);
        }
    }
}
