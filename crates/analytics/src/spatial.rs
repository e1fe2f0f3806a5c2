use configuration::SpatialParams;
use core_types::{ClusteringClass, EarthquakeEvent, GeoPoint};
use serde::{Deserialize, Serialize};

/// How tightly the filtered events gather around their centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialClustering {
    pub class: ClusteringClass,
    pub clustering_radius_km: f64,
    /// Share of events within `clustering_radius_km` of the centroid, 0-100.
    pub percentage_within_radius: f64,
    pub centroid: Option<GeoPoint>,
    /// Mean great-circle distance over all event pairs. Only computed for dispersed sets.
    pub mean_pairwise_distance_km: Option<f64>,
}

impl SpatialClustering {
    pub fn detect(events: &[&EarthquakeEvent], params: &SpatialParams) -> Self {
        let centroid = centroid(events);

        let (Some(center), true) = (centroid, events.len() >= params.min_events) else {
            return Self {
                class: ClusteringClass::InsufficientData,
                clustering_radius_km: params.clustering_radius_km,
                percentage_within_radius: 0.0,
                centroid,
                mean_pairwise_distance_km: None,
            };
        };

        let within = events
            .iter()
            .filter(|e| center.distance_km(&e.location()) <= params.clustering_radius_km)
            .count();
        let fraction = within as f64 / events.len() as f64;

        let class = if fraction >= params.highly_clustered_fraction {
            ClusteringClass::HighlyClustered
        } else if fraction >= params.moderately_clustered_fraction {
            ClusteringClass::ModeratelyClustered
        } else {
            ClusteringClass::Dispersed
        };

        let mean_pairwise_distance_km =
            (class == ClusteringClass::Dispersed).then(|| mean_pairwise_distance(events));

        tracing::debug!(
            within,
            total = events.len(),
            class = %class,
            "Spatial clustering classified."
        );

        Self {
            class,
            clustering_radius_km: params.clustering_radius_km,
            percentage_within_radius: fraction * 100.0,
            centroid: Some(center),
            mean_pairwise_distance_km,
        }
    }
}

/// Geographic centroid computed on the unit sphere so sets straddling the
/// antimeridian do not average to the wrong side of the globe.
pub fn centroid(events: &[&EarthquakeEvent]) -> Option<GeoPoint> {
    if events.is_empty() {
        return None;
    }

    let (mut x, mut y, mut z) = (0.0_f64, 0.0_f64, 0.0_f64);
    for event in events {
        let lat = event.latitude.to_radians();
        let lon = event.longitude.to_radians();
        x += lat.cos() * lon.cos();
        y += lat.cos() * lon.sin();
        z += lat.sin();
    }
    let n = events.len() as f64;
    let (x, y, z) = (x / n, y / n, z / n);

    let norm = (x * x + y * y + z * z).sqrt();
    if norm < 1e-12 {
        // Points cancel out (e.g. antipodal pairs); fall back to the plain mean.
        let lat = events.iter().map(|e| e.latitude).sum::<f64>() / n;
        let lon = events.iter().map(|e| e.longitude).sum::<f64>() / n;
        return Some(GeoPoint::new(lat, lon));
    }

    let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let lon = y.atan2(x).to_degrees();
    Some(GeoPoint::new(lat, lon))
}

/// Mean distance over all unordered pairs. Zero for fewer than two events.
pub fn mean_pairwise_distance(events: &[&EarthquakeEvent]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0_usize;
    for (i, a) in events.iter().enumerate() {
        for b in &events[i + 1..] {
            total += a.location().distance_km(&b.location());
            pairs += 1;
        }
    }
    if pairs == 0 { 0.0 } else { total / pairs as f64 }
}
