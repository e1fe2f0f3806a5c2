use chrono::{DateTime, Utc};
use configuration::TemporalParams;
use core_types::{EarthquakeEvent, TemporalTrend};
use serde::{Deserialize, Serialize};

/// Rate comparison between the older and newer halves of the analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalPattern {
    pub trend: TemporalTrend,
    pub older_count: usize,
    pub newer_count: usize,
    /// Events per day in the older half.
    pub older_rate: f64,
    /// Events per day in the newer half.
    pub newer_rate: f64,
    /// `newer_rate / older_rate`; `None` when the older half is empty.
    pub rate_ratio: Option<f64>,
}

impl TemporalPattern {
    fn insufficient(older_count: usize, newer_count: usize) -> Self {
        Self {
            trend: TemporalTrend::InsufficientData,
            older_count,
            newer_count,
            older_rate: 0.0,
            newer_rate: 0.0,
            rate_ratio: None,
        }
    }

    /// Splits `[window_start, window_end]` at its midpoint and classifies the change in rate.
    ///
    /// An event exactly on the midpoint belongs to the newer half.
    pub fn detect(
        events: &[&EarthquakeEvent],
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        params: &TemporalParams,
    ) -> Self {
        let half = (window_end - window_start) / 2;
        let midpoint = window_start + half;

        let newer_count = events.iter().filter(|e| e.timestamp >= midpoint).count();
        let older_count = events.len() - newer_count;

        let half_days = half.num_milliseconds() as f64 / 86_400_000.0;
        if events.len() < params.min_events || half_days <= 0.0 {
            return Self::insufficient(older_count, newer_count);
        }

        let older_rate = older_count as f64 / half_days;
        let newer_rate = newer_count as f64 / half_days;
        let factor = params.acceleration_factor;

        let trend = if newer_rate > older_rate * factor {
            TemporalTrend::Accelerating
        } else if newer_rate < older_rate / factor {
            TemporalTrend::Decreasing
        } else {
            TemporalTrend::Steady
        };

        let rate_ratio = (older_count > 0).then(|| newer_rate / older_rate);

        tracing::debug!(
            older_rate,
            newer_rate,
            ?rate_ratio,
            trend = %trend,
            "Temporal pattern classified."
        );

        Self {
            trend,
            older_count,
            newer_count,
            older_rate,
            newer_rate,
            rate_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn end() -> DateTime<Utc> {
        start() + Duration::days(10)
    }

    fn events_on_days(days: &[i64]) -> Vec<EarthquakeEvent> {
        days.iter()
            .enumerate()
            .map(|(i, d)| {
                let at = start() + Duration::days(*d);
                EarthquakeEvent::new(format!("e{i}"), at, 0.0, 0.0, 5.0, 3.0)
            })
            .collect()
    }

    fn detect(days: &[i64]) -> TemporalPattern {
        let events = events_on_days(days);
        let refs: Vec<&EarthquakeEvent> = events.iter().collect();
        TemporalPattern::detect(&refs, start(), end(), &TemporalParams::default())
    }

    #[test]
    fn fewer_than_two_events_is_insufficient() {
        assert_eq!(detect(&[]).trend, TemporalTrend::InsufficientData);
        let one = detect(&[7]);
        assert_eq!(one.trend, TemporalTrend::InsufficientData);
        assert_eq!(one.newer_count, 1);
    }

    #[test]
    fn more_recent_activity_is_accelerating() {
        let pattern = detect(&[1, 6, 7, 8, 9]);
        assert_eq!(pattern.trend, TemporalTrend::Accelerating);
        assert_eq!(pattern.older_count, 1);
        assert_eq!(pattern.newer_count, 4);
        assert!((pattern.older_rate - 0.2).abs() < 1e-12);
        assert!((pattern.newer_rate - 0.8).abs() < 1e-12);
        assert_eq!(pattern.rate_ratio, Some(4.0));
    }

    #[test]
    fn waning_activity_is_decreasing() {
        assert_eq!(detect(&[0, 1, 2, 3, 8]).trend, TemporalTrend::Decreasing);
    }

    #[test]
    fn even_activity_is_steady() {
        let pattern = detect(&[1, 2, 6, 7]);
        assert_eq!(pattern.trend, TemporalTrend::Steady);
        assert_eq!(pattern.rate_ratio, Some(1.0));
    }

    #[test]
    fn empty_older_half_accelerates_without_ratio() {
        let pattern = detect(&[5, 9]);
        assert_eq!(pattern.trend, TemporalTrend::Accelerating);
        assert_eq!(pattern.rate_ratio, None);
    }

    #[test]
    fn factor_is_a_tunable_parameter() {
        let events = events_on_days(&[1, 2, 6, 7, 8]);
        let refs: Vec<&EarthquakeEvent> = events.iter().collect();
        let strict = TemporalParams { acceleration_factor: 1.5, min_events: 2 };
        let loose = TemporalParams { acceleration_factor: 1.2, min_events: 2 };
        // Ratio 1.5 is not strictly above 1.5 but is above 1.2.
        assert_eq!(
            TemporalPattern::detect(&refs, start(), end(), &strict).trend,
            TemporalTrend::Steady
        );
        assert_eq!(
            TemporalPattern::detect(&refs, start(), end(), &loose).trend,
            TemporalTrend::Accelerating
        );
    }
}
