use crate::gutenberg_richter::GutenbergRichterFit;
use configuration::ForecastParams;
use serde::{Deserialize, Serialize};

const DAYS_PER_YEAR: f64 = 365.25;

/// Probability of at least one event of magnitude `>= magnitude` within `horizon_days`.
///
/// `a_value` is the annual Gutenberg-Richter intercept, so the annual
/// exceedance rate is `10^(a - b*M)`. The rate is scaled to the horizon and
/// turned into a Poisson probability `1 - exp(-rate)`. Negative b-values are
/// treated as zero so the result never grows with magnitude. Non-finite
/// inputs or a non-positive horizon yield 0.
pub fn magnitude_exceedance_probability(
    a_value: f64,
    b_value: f64,
    magnitude: f64,
    horizon_days: f64,
) -> f64 {
    let rate = expected_events(a_value, b_value, magnitude, horizon_days);
    // exp_m1 keeps precision for tiny rates, where 1 - exp(-x) would round to 0.
    (-(-rate).exp_m1()).clamp(0.0, 1.0)
}

fn expected_events(a_value: f64, b_value: f64, magnitude: f64, horizon_days: f64) -> f64 {
    let inputs = [a_value, b_value, magnitude, horizon_days];
    if !inputs.iter().all(|v| v.is_finite()) {
        return 0.0;
    }
    if horizon_days <= 0.0 {
        return 0.0;
    }
    let annual_rate = 10f64.powf(a_value - b_value.max(0.0) * magnitude);
    annual_rate * horizon_days / DAYS_PER_YEAR
}

/// Exceedance estimate for one magnitude threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceedanceBucket {
    pub magnitude: f64,
    /// Expected number of events at or above `magnitude` within the horizon.
    pub expected_events: f64,
    pub probability: f64,
}

/// Short-horizon exceedance forecast derived from a frequency-magnitude fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Forecast {
    Available {
        horizon_days: f64,
        annual_a_value: f64,
        b_value: f64,
        buckets: Vec<ExceedanceBucket>,
    },
    InsufficientData {
        reason: String,
    },
}

impl Forecast {
    /// Builds the forecast, or reports why it was skipped.
    ///
    /// `window_days` is the span the fit was measured over and is used to
    /// annualise the intercept. Buckets are sorted by increasing magnitude.
    pub fn from_fit(fit: &GutenbergRichterFit, window_days: f64, params: &ForecastParams) -> Self {
        if !fit.is_available() {
            return Forecast::InsufficientData {
                reason: String::from("insufficient data for forecast"),
            };
        }
        let (Some(annual_a_value), Some(b_value)) = (fit.annual_a_value(window_days), fit.b_value)
        else {
            return Forecast::InsufficientData {
                reason: String::from("insufficient data for forecast"),
            };
        };

        let mut magnitudes = params.magnitudes.clone();
        magnitudes.sort_by(f64::total_cmp);
        magnitudes.dedup();

        let buckets = magnitudes
            .into_iter()
            .map(|magnitude| ExceedanceBucket {
                magnitude,
                expected_events: expected_events(
                    annual_a_value,
                    b_value,
                    magnitude,
                    params.horizon_days,
                ),
                probability: magnitude_exceedance_probability(
                    annual_a_value,
                    b_value,
                    magnitude,
                    params.horizon_days,
                ),
            })
            .collect();

        Forecast::Available {
            horizon_days: params.horizon_days,
            annual_a_value,
            b_value,
            buckets,
        }
    }

    pub fn buckets(&self) -> &[ExceedanceBucket] {
        match self {
            Forecast::Available { buckets, .. } => buckets,
            Forecast::InsufficientData { .. } => &[],
        }
    }
}
