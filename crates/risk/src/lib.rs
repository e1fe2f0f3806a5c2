//! # Quakescope Risk
//!
//! Turns the independent seismicity signals into a single weighted score,
//! maps it onto a four-level category, and looks up the matching advice.
//! Nothing persists between calls.

pub mod error;
pub mod recommendations;
pub mod scorer;
pub mod signals;

pub use error::RiskError;
pub use recommendations::recommendations_for;
pub use scorer::{RiskAssessment, RiskScorer, classify_risk_level, level_for_score};
pub use signals::{RiskFactor, RiskObservations, RiskSignals};
