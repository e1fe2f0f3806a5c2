use crate::error::CoreError;
use crate::geo::haversine_distance_km;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Magnitudes outside this range are treated as corrupt records.
pub const MAGNITUDE_RANGE: std::ops::RangeInclusive<f64> = -5.0..=12.0;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both coordinates are finite and inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// A single catalog entry. Owned by the caller and never mutated by the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    pub magnitude: f64,
    /// Free-form magnitude scale label as reported by the catalog ("ml", "mww", ...).
    pub magnitude_type: String,
    /// Human readable location, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

impl EarthquakeEvent {
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        depth_km: f64,
        magnitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            latitude,
            longitude,
            depth_km,
            magnitude,
            magnitude_type: String::from("ml"),
            place: None,
        }
    }

    pub fn with_magnitude_type(mut self, magnitude_type: impl Into<String>) -> Self {
        self.magnitude_type = magnitude_type.into();
        self
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// True when the record can safely take part in an analysis.
    ///
    /// Records with a magnitude outside [`MAGNITUDE_RANGE`], a non-finite or
    /// negative depth, or coordinates outside their valid ranges are rejected.
    pub fn is_well_formed(&self) -> bool {
        MAGNITUDE_RANGE.contains(&self.magnitude)
            && self.depth_km.is_finite()
            && self.depth_km >= 0.0
            && self.location().is_valid()
    }
}

/// The filtering envelope for one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub center: GeoPoint,
    pub radius_km: f64,
    pub time_window_days: f64,
    pub min_magnitude: f64,
    /// The instant treated as "now". The window covers `[as_of - time_window_days, as_of]`.
    pub as_of: DateTime<Utc>,
}

impl AnalysisRequest {
    /// Creates a request anchored at the current wall-clock time.
    pub fn new(
        center: GeoPoint,
        radius_km: f64,
        time_window_days: f64,
        min_magnitude: f64,
    ) -> Self {
        Self {
            center,
            radius_km,
            time_window_days,
            min_magnitude,
            as_of: Utc::now(),
        }
    }

    /// Pins the reference time, making the analysis reproducible.
    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = as_of;
        self
    }

    /// Rejects structurally invalid requests. Nothing is clamped.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.center.is_valid() {
            return Err(CoreError::InvalidRequest(format!(
                "center ({}, {}) is outside the valid coordinate range",
                self.center.latitude, self.center.longitude
            )));
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(CoreError::InvalidRequest(format!(
                "radius_km must be a positive number, got {}",
                self.radius_km
            )));
        }
        if !self.time_window_days.is_finite() || self.time_window_days <= 0.0 {
            return Err(CoreError::InvalidRequest(format!(
                "time_window_days must be a positive number, got {}",
                self.time_window_days
            )));
        }
        if !self.min_magnitude.is_finite() {
            return Err(CoreError::InvalidRequest(format!(
                "min_magnitude must be finite, got {}",
                self.min_magnitude
            )));
        }
        self.window_start()?;
        Ok(())
    }

    /// The length of the time window as a `TimeDelta`.
    pub fn window(&self) -> Result<TimeDelta, CoreError> {
        TimeDelta::try_milliseconds((self.time_window_days * MILLIS_PER_DAY).round() as i64)
            .ok_or_else(|| {
                CoreError::InvalidRequest(format!(
                    "time_window_days {} is out of range",
                    self.time_window_days
                ))
            })
    }

    /// The oldest instant included in the window.
    pub fn window_start(&self) -> Result<DateTime<Utc>, CoreError> {
        let window = self.window()?;
        self.as_of.checked_sub_signed(window).ok_or_else(|| {
            CoreError::InvalidRequest(format!(
                "time window of {} days reaches before the representable range",
                self.time_window_days
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> AnalysisRequest {
        AnalysisRequest::new(GeoPoint::new(37.0, -122.0), 100.0, 30.0, 2.5)
            .with_as_of(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_radius() {
        let mut req = request();
        req.radius_km = 0.0;
        assert!(matches!(req.validate(), Err(CoreError::InvalidRequest(_))));
        req.radius_km = f64::NAN;
        assert!(matches!(req.validate(), Err(CoreError::InvalidRequest(_))));
    }

    #[test]
    fn rejects_non_positive_window() {
        let mut req = request();
        req.time_window_days = -1.0;
        assert!(matches!(req.validate(), Err(CoreError::InvalidRequest(_))));
    }

    #[test]
    fn rejects_malformed_center() {
        let mut req = request();
        req.center = GeoPoint::new(91.0, 0.0);
        assert!(matches!(req.validate(), Err(CoreError::InvalidRequest(_))));
        req.center = GeoPoint::new(0.0, -180.5);
        assert!(matches!(req.validate(), Err(CoreError::InvalidRequest(_))));
    }

    #[test]
    fn window_start_is_as_of_minus_days() {
        let req = request();
        let start = req.window_start().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn malformed_events_are_detected() {
        let t = Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();
        assert!(EarthquakeEvent::new("ok", t, 10.0, 20.0, 5.0, 3.0).is_well_formed());
        assert!(!EarthquakeEvent::new("nan", t, 10.0, 20.0, 5.0, f64::NAN).is_well_formed());
        assert!(!EarthquakeEvent::new("lat", t, 95.0, 20.0, 5.0, 3.0).is_well_formed());
        assert!(!EarthquakeEvent::new("depth", t, 10.0, 20.0, -1.0, 3.0).is_well_formed());
        assert!(!EarthquakeEvent::new("huge", t, 10.0, 20.0, 5.0, 1e9).is_well_formed());
        assert!(!EarthquakeEvent::new("tiny", t, 10.0, 20.0, 5.0, -6.0).is_well_formed());
        assert!(EarthquakeEvent::new("micro", t, 10.0, 20.0, 5.0, -1.5).is_well_formed());
    }
}
