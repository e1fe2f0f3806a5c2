use core_types::RiskLevel;

const LOW: &[&str] = &[
    "Maintain standard earthquake preparedness",
    "Continue routine monitoring and data collection",
];

const MODERATE: &[&str] = &[
    "Review personal and household emergency plans",
    "Monitor official seismic bulletins for changes in activity",
];

const HIGH: &[&str] = &[
    "Increase monitoring and public awareness",
    "Review building codes and emergency procedures",
];

const CRITICAL: &[&str] = &[
    "Implement heightened earthquake preparedness measures",
    "Consider temporary restrictions in high-risk areas",
];

/// The fixed advice for a risk level. Same level, same list, same order.
pub fn recommendations_for(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Low => LOW,
        RiskLevel::Moderate => MODERATE,
        RiskLevel::High => HIGH,
        RiskLevel::Critical => CRITICAL,
    }
}
