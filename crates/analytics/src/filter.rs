use crate::error::AnalyticsError;
use chrono::{DateTime, Utc};
use core_types::{AnalysisRequest, EarthquakeEvent, GeoPoint};

/// Selects the events that fall inside a request's envelope.
#[derive(Debug, Clone)]
pub struct RegionFilter {
    center: GeoPoint,
    radius_km: f64,
    min_magnitude: f64,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
}

/// The events kept by a [`RegionFilter`], borrowed from the caller's catalog.
#[derive(Debug, Clone, Default)]
pub struct RegionSelection<'a> {
    pub events: Vec<&'a EarthquakeEvent>,
    /// Input records skipped because they were malformed.
    pub dropped: usize,
}

impl RegionFilter {
    /// Builds a filter from a validated request.
    pub fn from_request(request: &AnalysisRequest) -> Result<Self, AnalyticsError> {
        request.validate()?;
        Ok(Self {
            center: request.center,
            radius_km: request.radius_km,
            min_magnitude: request.min_magnitude,
            window_start: request.window_start()?,
            window_end: request.as_of,
        })
    }

    pub fn window_start(&self) -> DateTime<Utc> {
        self.window_start
    }

    pub fn window_end(&self) -> DateTime<Utc> {
        self.window_end
    }

    /// True when a well-formed event lies inside the radius, magnitude floor and time window.
    /// Both ends of the window and the radius are inclusive.
    pub fn matches(&self, event: &EarthquakeEvent) -> bool {
        event.magnitude >= self.min_magnitude
            && event.timestamp >= self.window_start
            && event.timestamp <= self.window_end
            && self.center.distance_km(&event.location()) <= self.radius_km
    }

    /// Applies the filter, skipping malformed records instead of failing the batch.
    pub fn apply<'a>(&self, events: &'a [EarthquakeEvent]) -> RegionSelection<'a> {
        let mut selection = RegionSelection::default();

        for event in events {
            if !event.is_well_formed() {
                tracing::warn!(id = %event.id, "Skipping malformed earthquake record.");
                selection.dropped += 1;
                continue;
            }
            if self.matches(event) {
                selection.events.push(event);
            }
        }

        tracing::debug!(
            input = events.len(),
            kept = selection.events.len(),
            dropped = selection.dropped,
            "Region filter applied."
        );
        selection
    }
}
