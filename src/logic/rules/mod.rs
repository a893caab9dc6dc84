pub mod engine;
pub mod fertilizer;
pub mod irrigation;
pub mod pest_risk;
pub mod yield_forecast;

pub use engine::RecommendationEngine;
pub use fertilizer::FertilizerRule;
pub use irrigation::IrrigationRule;
pub use pest_risk::PestRiskRule;
pub use yield_forecast::YieldForecastRule;

use crate::models::{ForecastDay, SensorReading, YieldRecord};

/// Inputs shared by every rule for one field at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct FieldConditions<'a> {
    /// Most recent reading
    pub current: &'a SensorReading,
    /// Recent readings, newest first (includes `current` at index 0)
    pub recent: &'a [SensorReading],
    pub forecast: &'a [ForecastDay],
    /// Yield history, newest first
    pub yields: &'a [YieldRecord],
}

/// Trait for agronomic rules
pub trait Rule {
    type Output;

    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    fn evaluate(&self, conditions: &FieldConditions<'_>) -> Self::Output;
}

/// Number of leading forecast days the weather-sensitive rules look at.
pub const NEAR_TERM_FORECAST_DAYS: usize = 3;
