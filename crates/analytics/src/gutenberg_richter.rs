//! Gutenberg-Richter frequency-magnitude fitting.
//!
//! Magnitudes are binned at `bin_width`, the completeness magnitude `Mc` is
//! estimated by maximum curvature (the most populated bin), and
//! `log10 N(>=M) = a - b*M` is fitted by ordinary least squares over the
//! cumulative counts from `Mc` upwards. The Aki-Utsu maximum-likelihood
//! b-value is reported next to the regression estimate.

use configuration::GutenbergRichterParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::LOG10_E;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GutenbergRichterFit {
    /// Negated slope of the least-squares fit. `None` when no fit was attempted.
    pub b_value: Option<f64>,
    /// Intercept of the least-squares fit, in events over the analysis window.
    pub a_value: Option<f64>,
    pub completeness_magnitude: Option<f64>,
    /// In `[0, 1]`. Zero means the fit was skipped.
    pub fit_confidence: f64,
    /// Events at or above the completeness magnitude.
    pub events_above_mc: usize,
    /// Number of cumulative points the regression used.
    pub regression_points: usize,
    pub r_squared: Option<f64>,
    pub b_value_max_likelihood: Option<f64>,
    /// Aki's standard error of the maximum-likelihood b-value, `b / sqrt(n)`.
    pub b_value_uncertainty: Option<f64>,
}

impl GutenbergRichterFit {
    pub fn is_available(&self) -> bool {
        self.fit_confidence > 0.0 && self.a_value.is_some() && self.b_value.is_some()
    }

    /// The intercept rescaled to events per year, given the window it was measured over.
    pub fn annual_a_value(&self, window_days: f64) -> Option<f64> {
        if window_days <= 0.0 {
            return None;
        }
        self.a_value.map(|a| a + (365.25 / window_days).log10())
    }

    pub fn fit(magnitudes: &[f64], params: &GutenbergRichterParams) -> Self {
        let width = params.bin_width;
        let bins = bin_counts(magnitudes, width);

        let Some(mc_index) = completeness_index(&bins, params) else {
            return Self::default();
        };
        let completeness_magnitude = bin_magnitude(mc_index, width);

        let complete: Vec<f64> = magnitudes
            .iter()
            .copied()
            .filter(|m| m.is_finite() && bin_index(*m, width) >= mc_index)
            .collect();
        let points = cumulative_points(&bins, mc_index, width);

        let mut result = Self {
            completeness_magnitude: Some(completeness_magnitude),
            events_above_mc: complete.len(),
            regression_points: points.len(),
            ..Self::default()
        };

        if complete.len() < params.min_events || points.len() < params.min_bins {
            tracing::debug!(
                events_above_mc = complete.len(),
                points = points.len(),
                "Too few events above Mc for a frequency-magnitude fit."
            );
            return result;
        }

        let Some(line) = least_squares(&points) else {
            return result;
        };
        let b_value = -line.slope;
        if !b_value.is_finite() || !line.intercept.is_finite() {
            return result;
        }

        result.b_value = Some(b_value);
        result.a_value = Some(line.intercept);
        result.r_squared = Some(line.r_squared);
        result.fit_confidence =
            sample_factor(complete.len(), params) * line.r_squared.clamp(0.0, 1.0);

        let mean = complete.iter().sum::<f64>() / complete.len() as f64;
        let denominator = mean - (completeness_magnitude - width / 2.0);
        if denominator > 0.0 {
            let b_ml = LOG10_E / denominator;
            result.b_value_max_likelihood = Some(b_ml);
            result.b_value_uncertainty = Some(b_ml / (complete.len() as f64).sqrt());
        }

        tracing::debug!(
            b_value,
            a_value = line.intercept,
            completeness_magnitude,
            confidence = result.fit_confidence,
            "Gutenberg-Richter fit complete."
        );
        result
    }
}

fn bin_index(magnitude: f64, width: f64) -> i64 {
    (magnitude / width).round() as i64
}

/// Magnitude a bin stands for, rounded to the precision of the bin width.
fn bin_magnitude(index: i64, width: f64) -> f64 {
    let scale = (0..=9)
        .map(|d| 10f64.powi(d))
        .find(|scale| ((width * scale).round() - width * scale).abs() < 1e-9)
        .unwrap_or(1e9);
    (index as f64 * width * scale).round() / scale
}

/// Non-cumulative event counts per magnitude bin.
fn bin_counts(magnitudes: &[f64], width: f64) -> BTreeMap<i64, usize> {
    let mut bins = BTreeMap::new();
    for m in magnitudes.iter().filter(|m| m.is_finite()) {
        *bins.entry(bin_index(*m, width)).or_insert(0) += 1;
    }
    bins
}

/// Maximum curvature: the most populated bin, lowest magnitude on ties, plus the correction.
fn completeness_index(
    bins: &BTreeMap<i64, usize>,
    params: &GutenbergRichterParams,
) -> Option<i64> {
    let mut best: Option<(i64, usize)> = None;
    for (&index, &count) in bins {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((index, count)),
        }
    }
    let correction = (params.mc_correction / params.bin_width).round() as i64;
    best.map(|(index, _)| index.saturating_add(correction))
}

/// `(M, log10 N(>=M))` for every populated bin from Mc upwards.
///
/// Empty bins are skipped, so the number of points is bounded by the number
/// of distinct magnitudes, not by the magnitude range.
fn cumulative_points(bins: &BTreeMap<i64, usize>, mc_index: i64, width: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    let mut cumulative = 0_usize;
    for (&index, &count) in bins.range(mc_index..).rev() {
        cumulative += count;
        points.push((bin_magnitude(index, width), (cumulative as f64).log10()));
    }
    points.reverse();
    points
}

struct Line {
    slope: f64,
    intercept: f64,
    r_squared: f64,
}

fn least_squares(points: &[(f64, f64)]) -> Option<Line> {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    let sxy: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();
    let syy: f64 = points.iter().map(|p| (p.1 - mean_y).powi(2)).sum();
    if sxx <= f64::EPSILON || syy <= f64::EPSILON {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let ss_res: f64 = points
        .iter()
        .map(|p| (p.1 - (intercept + slope * p.0)).powi(2))
        .sum();

    Some(Line {
        slope,
        intercept,
        r_squared: 1.0 - ss_res / syy,
    })
}

/// Grows with the number of complete events: ~0.3 at the low-confidence size,
/// 0.7 at the high-confidence size, approaching 1 beyond it.
fn sample_factor(n: usize, params: &GutenbergRichterParams) -> f64 {
    let low = params.low_confidence_events as f64;
    let high = params.high_confidence_events as f64;
    let n = n as f64;
    if n < low {
        0.3 * n / low
    } else if n < high {
        0.3 + 0.4 * (n - low) / (high - low)
    } else {
        0.7 + 0.3 * (1.0 - high / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Magnitudes whose cumulative counts follow `N(>=M) = 10^(a - b*M)` on a 0.1 grid.
    pub(crate) fn synthetic_catalog(a: f64, b: f64, min_mag: f64, max_mag: f64) -> Vec<f64> {
        let steps = ((max_mag - min_mag) / 0.1).round() as i64;
        let cumulative = |m: f64| (10f64.powf(a - b * m)).round() as usize;
        let mut magnitudes = Vec::new();
        for step in 0..=steps {
            let m = min_mag + step as f64 * 0.1;
            let count = if step == steps {
                cumulative(m)
            } else {
                cumulative(m) - cumulative(m + 0.1)
            };
            magnitudes.extend(std::iter::repeat_n(m, count));
        }
        magnitudes
    }

    #[test]
    fn recovers_a_and_b_from_an_ideal_catalog() {
        let magnitudes = synthetic_catalog(4.0, 1.0, 1.0, 3.0);
        let fit = GutenbergRichterFit::fit(&magnitudes, &GutenbergRichterParams::default());

        let b = fit.b_value.unwrap();
        let a = fit.a_value.unwrap();
        assert!((b - 1.0).abs() < 0.1, "b = {b}");
        assert!((a - 4.0).abs() < 0.1, "a = {a}");
        assert!((fit.completeness_magnitude.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(fit.events_above_mc, magnitudes.len());
        assert!(fit.fit_confidence > 0.9, "confidence = {}", fit.fit_confidence);
        assert!(fit.r_squared.unwrap() > 0.99);
    }

    #[test]
    fn maximum_likelihood_estimate_is_reported() {
        let magnitudes = synthetic_catalog(4.0, 1.0, 1.0, 3.0);
        let fit = GutenbergRichterFit::fit(&magnitudes, &GutenbergRichterParams::default());
        let b_ml = fit.b_value_max_likelihood.unwrap();
        assert!((b_ml - 1.0).abs() < 0.15, "b_ml = {b_ml}");
        assert!(fit.b_value_uncertainty.unwrap() < 0.05);
    }

    #[test]
    fn incomplete_low_end_is_excluded() {
        // Under-reported small events below the true Mc of 1.5.
        let mut magnitudes = synthetic_catalog(4.0, 1.0, 1.5, 3.0);
        magnitudes.extend(std::iter::repeat_n(1.0, 5));
        magnitudes.extend(std::iter::repeat_n(1.2, 20));
        let fit = GutenbergRichterFit::fit(&magnitudes, &GutenbergRichterParams::default());
        assert!((fit.completeness_magnitude.unwrap() - 1.5).abs() < 1e-9);
        assert!((fit.b_value.unwrap() - 1.0).abs() < 0.1);
    }

    #[test]
    fn never_fits_fewer_than_three_events() {
        for magnitudes in [vec![], vec![3.0], vec![3.0, 4.0]] {
            let fit = GutenbergRichterFit::fit(&magnitudes, &GutenbergRichterParams::default());
            assert_eq!(fit.fit_confidence, 0.0);
            assert!(fit.b_value.is_none());
            assert!(fit.a_value.is_none());
            assert!(!fit.is_available());
        }
    }

    #[test]
    fn identical_magnitudes_cannot_be_fitted() {
        let fit = GutenbergRichterFit::fit(&[2.5; 10], &GutenbergRichterParams::default());
        assert_eq!(fit.fit_confidence, 0.0);
        assert!(fit.b_value.is_none());
        assert_eq!(fit.completeness_magnitude, Some(2.5));
        assert_eq!(fit.regression_points, 1);
    }

    #[test]
    fn completeness_magnitude_is_rounded_to_the_bin() {
        let mut magnitudes = synthetic_catalog(4.0, 1.0, 1.5, 3.0);
        magnitudes.extend(std::iter::repeat_n(1.2, 20));
        let fit = GutenbergRichterFit::fit(&magnitudes, &GutenbergRichterParams::default());
        assert_eq!(fit.completeness_magnitude, Some(1.5));
        assert_eq!(bin_magnitude(3, 0.1), 0.3);
        assert_eq!(bin_magnitude(7, 0.25), 1.75);
    }

    #[test]
    fn huge_magnitude_does_not_inflate_the_regression() {
        let mut magnitudes = synthetic_catalog(3.0, 1.0, 1.0, 2.0);
        let populated = bin_counts(&magnitudes, 0.1).len();
        magnitudes.push(1e9);
        let fit = GutenbergRichterFit::fit(&magnitudes, &GutenbergRichterParams::default());
        assert_eq!(fit.regression_points, populated + 1);
        assert_eq!(fit.events_above_mc, magnitudes.len());
    }

    #[test]
    fn confidence_grows_with_sample_size() {
        let params = GutenbergRichterParams::default();
        let sizes = [3, 10, 19, 20, 35, 50, 100, 1000];
        let factors: Vec<f64> = sizes.iter().map(|n| sample_factor(*n, &params)).collect();
        assert!(factors.windows(2).all(|w| w[0] < w[1]), "{factors:?}");
        assert!(factors[2] < 0.3);
        assert!(factors[5] >= 0.7);
        assert!(factors[7] <= 1.0);
    }

    #[test]
    fn annual_a_value_rescales_the_window() {
        let fit = GutenbergRichterFit {
            a_value: Some(3.0),
            ..GutenbergRichterFit::default()
        };
        let annual = fit.annual_a_value(365.25).unwrap();
        assert!((annual - 3.0).abs() < 1e-12);
        let annual = fit.annual_a_value(36.525).unwrap();
        assert!((annual - 4.0).abs() < 1e-12);
        assert!(fit.annual_a_value(0.0).is_none());
    }
}
