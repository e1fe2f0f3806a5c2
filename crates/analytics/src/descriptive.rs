use chrono::{DateTime, Utc};
use configuration::DepthBands;
use core_types::{DepthBand, EarthquakeEvent, GeoPoint};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Magnitude and depth aggregates over the filtered events.
///
/// With zero events every field is zero. `total_events` tells the caller
/// whether the averages carry any meaning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DescriptiveStatistics {
    pub total_events: usize,
    pub average_magnitude: f64,
    pub largest_magnitude: f64,
    /// Events per day over the whole window.
    pub daily_rate: f64,
    pub depth: DepthStatistics,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DepthStatistics {
    pub shallow: usize,
    pub intermediate: usize,
    pub deep: usize,
    pub mean_depth_km: f64,
}

impl DepthStatistics {
    /// Share of events in the shallow band, or `None` when there are no events.
    pub fn shallow_fraction(&self) -> Option<f64> {
        let total = self.shallow + self.intermediate + self.deep;
        if total == 0 {
            None
        } else {
            Some(self.shallow as f64 / total as f64)
        }
    }
}

impl DescriptiveStatistics {
    pub fn compute(events: &[&EarthquakeEvent], window_days: f64, bands: &DepthBands) -> Self {
        let mut stats = Self::default();
        if events.is_empty() {
            return stats;
        }

        let n = events.len() as f64;
        stats.total_events = events.len();
        stats.average_magnitude = events.iter().map(|e| e.magnitude).sum::<f64>() / n;
        stats.largest_magnitude = events
            .iter()
            .map(|e| e.magnitude)
            .fold(f64::NEG_INFINITY, f64::max);
        if window_days > 0.0 {
            stats.daily_rate = n / window_days;
        }

        for event in events {
            let band = DepthBand::classify(
                event.depth_km,
                bands.shallow_max_km,
                bands.intermediate_max_km,
            );
            match band {
                DepthBand::Shallow => stats.depth.shallow += 1,
                DepthBand::Intermediate => stats.depth.intermediate += 1,
                DepthBand::Deep => stats.depth.deep += 1,
            }
        }
        stats.depth.mean_depth_km = events.iter().map(|e| e.depth_km).sum::<f64>() / n;

        stats
    }
}

/// One of the largest events in the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotableEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub magnitude: f64,
    pub magnitude_type: String,
    pub depth_km: f64,
    pub distance_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

/// The `limit` largest events, by magnitude then most recent first.
pub fn notable_events(
    events: &[&EarthquakeEvent],
    center: &GeoPoint,
    limit: usize,
) -> Vec<NotableEvent> {
    let mut ranked: Vec<&EarthquakeEvent> = events.to_vec();
    ranked.sort_by(|a, b| {
        b.magnitude
            .partial_cmp(&a.magnitude)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|e| NotableEvent {
            id: e.id.clone(),
            timestamp: e.timestamp,
            magnitude: e.magnitude,
            magnitude_type: e.magnitude_type.clone(),
            depth_km: e.depth_km,
            distance_km: center.distance_km(&e.location()),
            place: e.place.clone(),
        })
        .collect()
}
