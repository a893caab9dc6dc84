use super::{FieldConditions, Rule, NEAR_TERM_FORECAST_DAYS};
use crate::models::{avg_humidity, avg_temperature, PestRisk};

/// Pest risk rule - warm and humid conditions favour pest pressure
///
/// Risk factors (current reading OR 3-day forecast average):
/// - Temperature > 25°C
/// - Humidity > 70%
///
/// Levels:
/// - High: both factors present
/// - Moderate: exactly one factor
/// - Low: neither
pub struct PestRiskRule;

impl PestRiskRule {
    pub const TEMP_THRESHOLD_C: f64 = 25.0;
    pub const HUMIDITY_THRESHOLD: f64 = 70.0;

    pub fn classify(temp_risk: bool, humidity_risk: bool) -> PestRisk {
        match (temp_risk, humidity_risk) {
            (true, true) => PestRisk::High,
            (true, false) | (false, true) => PestRisk::Moderate,
            (false, false) => PestRisk::Low,
        }
    }
}

impl Rule for PestRiskRule {
    type Output = PestRisk;

    fn id(&self) -> &'static str {
        "pest_risk"
    }

    fn name(&self) -> &'static str {
        "Pest Risk"
    }

    fn evaluate(&self, conditions: &FieldConditions<'_>) -> PestRisk {
        let current = conditions.current;
        let forecast_temp = avg_temperature(conditions.forecast, NEAR_TERM_FORECAST_DAYS);
        let forecast_humidity = avg_humidity(conditions.forecast, NEAR_TERM_FORECAST_DAYS);

        let temp_risk = current.temperature > Self::TEMP_THRESHOLD_C
            || forecast_temp.map_or(false, |t| t > Self::TEMP_THRESHOLD_C);
        let humidity_risk = current.humidity > Self::HUMIDITY_THRESHOLD
            || forecast_humidity.map_or(false, |h| h > Self::HUMIDITY_THRESHOLD);

        let risk = Self::classify(temp_risk, humidity_risk);
        tracing::debug!(temp_risk, humidity_risk, %risk, "pest risk evaluated");
        risk
    }
}
