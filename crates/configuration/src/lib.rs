use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisConfig, DepthBands, ForecastParams, GutenbergRichterParams, RiskParams,
    RiskThresholds, RiskWeights, SpatialParams, TemporalParams,
};
pub use telemetry::init_tracing;

/// Name of the configuration file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_NAME: &str = "quakescope";

/// Prefix for environment variable overrides, e.g. `QUAKESCOPE__RISK__LOW_B_VALUE=0.7`.
pub const ENV_PREFIX: &str = "QUAKESCOPE";

/// Loads the analysis configuration.
///
/// Sources are layered as: built-in defaults, then the TOML file (the given
/// path, which must exist, or an optional `quakescope.toml` in the working
/// directory), then `QUAKESCOPE__*` environment variables. The merged result
/// is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, ConfigError> {
    let mut builder = config::Config::builder();

    builder = match path {
        Some(path) => builder.add_source(config::File::from(path)),
        None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
    };

    let builder = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the merged sources into our `AnalysisConfig` struct.
    // Missing sections fall back to their `Default` impls.
    let config = builder.try_deserialize::<AnalysisConfig>()?;
    config.validate()?;

    tracing::debug!(?config, "Loaded analysis configuration.");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "notable_event_limit = 3\n\n[risk]\nlow_b_value = 0.7\n\n[forecast]\nhorizon_days = 7.0\nmagnitudes = [5.0, 6.0]"
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.notable_event_limit, 3);
        assert_eq!(config.risk.low_b_value, 0.7);
        assert_eq!(config.forecast.horizon_days, 7.0);
        assert_eq!(config.forecast.magnitudes, vec![5.0, 6.0]);
        // Untouched sections keep their defaults.
        assert_eq!(config.spatial, SpatialParams::default());
        assert_eq!(config.risk.weights, RiskWeights::default());
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[temporal]\nacceleration_factor = 0.5\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)), "{err}");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::LoadError(_))));
    }
}
