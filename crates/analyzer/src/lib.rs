use analytics::{
    DescriptiveStatistics, Forecast, GutenbergRichterFit, RegionFilter, SpatialClustering,
    TemporalPattern, notable_events,
};
use configuration::AnalysisConfig;
use core_types::{AnalysisRequest, EarthquakeEvent};
use risk::{RiskObservations, RiskScorer, RiskSignals};

pub mod error;
pub mod report;

pub use error::AnalyzerError;
pub use report::AnalysisResult;

/// The regional seismicity analysis engine.
///
/// Holds only an immutable, pre-validated configuration, so one instance can
/// serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct SeismicAnalyzer {
    config: AnalysisConfig,
    scorer: RiskScorer,
}

impl SeismicAnalyzer {
    /// Validates the configuration once up front.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalyzerError> {
        config.validate()?;
        let scorer = RiskScorer::new(config.risk.clone())?;
        Ok(Self { config, scorer })
    }

    /// Filters the catalog to the request envelope and runs every detector on the result.
    ///
    /// Only a structurally invalid request is an error. Malformed events are
    /// skipped and counted; sparse selections produce "insufficient data" verdicts.
    #[tracing::instrument(
        name = "analyze_region",
        skip(self, events),
        fields(input_events = events.len())
    )]
    pub fn analyze(
        &self,
        request: &AnalysisRequest,
        events: &[EarthquakeEvent],
    ) -> Result<AnalysisResult, AnalyzerError> {
        request.validate()?;
        let config = &self.config;

        // 1. Filter
        let filter = RegionFilter::from_request(request)?;
        let selection = filter.apply(events);
        if selection.dropped > 0 {
            tracing::warn!(dropped = selection.dropped, "Malformed events were skipped.");
        }
        let selected = &selection.events;

        // 2. Independent detectors
        let stats =
            DescriptiveStatistics::compute(selected, request.time_window_days, &config.depth);
        let temporal = TemporalPattern::detect(
            selected,
            filter.window_start(),
            filter.window_end(),
            &config.temporal,
        );
        let spatial = SpatialClustering::detect(selected, &config.spatial);
        let magnitudes: Vec<f64> = selected.iter().map(|e| e.magnitude).collect();
        let fit = GutenbergRichterFit::fit(&magnitudes, &config.gutenberg_richter);

        // 3. Risk
        let observations = RiskObservations {
            largest_magnitude: (stats.total_events > 0).then_some(stats.largest_magnitude),
            daily_rate: stats.daily_rate,
            temporal_trend: temporal.trend,
            clustering: spatial.class,
            shallow_fraction: stats.depth.shallow_fraction(),
            b_value: fit.is_available().then_some(fit.b_value).flatten(),
            fit_confidence: fit.fit_confidence,
        };
        let signals = RiskSignals::from_observations(&observations, &config.risk);
        let assessment = self.scorer.assess(&signals);

        // 4. Forecast
        let forecast = config
            .forecast
            .enabled
            .then(|| Forecast::from_fit(&fit, request.time_window_days, &config.forecast));
        if let Some(Forecast::InsufficientData { reason }) = &forecast {
            tracing::debug!(%reason, "Forecast skipped.");
        }

        let notable = notable_events(selected, &request.center, config.notable_event_limit);

        tracing::info!(
            total_events = stats.total_events,
            risk_level = %assessment.level,
            risk_score = assessment.score,
            trend = %temporal.trend,
            clustering = %spatial.class,
            b_value = ?fit.b_value,
            "Regional analysis complete."
        );

        Ok(AnalysisResult {
            window_start: filter.window_start(),
            window_end: filter.window_end(),
            total_events: stats.total_events,
            dropped_events: selection.dropped,
            average_magnitude: stats.average_magnitude,
            largest_magnitude: stats.largest_magnitude,
            daily_rate: stats.daily_rate,
            depth_stats: stats.depth,
            temporal_pattern: temporal,
            spatial_clustering: spatial,
            gutenberg_richter: fit,
            risk_level: assessment.level,
            risk_score: assessment.score,
            risk_factors: assessment.factors,
            recommendations: assessment.recommendations,
            notable_events: notable,
            forecast,
        })
    }
}

/// One-shot entry point: validates `config`, then analyzes `events` against `request`.
pub fn analyze_region(
    request: &AnalysisRequest,
    events: &[EarthquakeEvent],
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalyzerError> {
    SeismicAnalyzer::new(config.clone())?.analyze(request, events)
}
