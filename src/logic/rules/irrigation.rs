use super::{FieldConditions, Rule, NEAR_TERM_FORECAST_DAYS};
use crate::models::{avg_temperature, IrrigationLevel};

/// Irrigation rule - recommends an irrigation level from soil moisture and
/// the near-term forecast
///
/// Conditions:
/// - Hot weather: average forecast temperature over the next 3 days > 30°C
///
/// Levels:
/// - High: moisture < 30% and hot
/// - Medium: moisture < 30%, or moisture 30-50% and hot
/// - Low: moisture 30-50% and not hot, or moisture >= 50%
pub struct IrrigationRule;

impl IrrigationRule {
    pub const MOISTURE_LOW: f64 = 30.0;
    pub const MOISTURE_MEDIUM: f64 = 50.0;
    pub const HOT_TEMP_C: f64 = 30.0;

    pub fn classify(soil_moisture: f64, hot_weather: bool) -> IrrigationLevel {
        if soil_moisture < Self::MOISTURE_LOW {
            if hot_weather {
                IrrigationLevel::High
            } else {
                IrrigationLevel::Medium
            }
        } else if soil_moisture < Self::MOISTURE_MEDIUM {
            if hot_weather {
                IrrigationLevel::Medium
            } else {
                IrrigationLevel::Low
            }
        } else {
            IrrigationLevel::Low
        }
    }
}

impl Rule for IrrigationRule {
    type Output = IrrigationLevel;

    fn id(&self) -> &'static str {
        "irrigation"
    }

    fn name(&self) -> &'static str {
        "Irrigation Need"
    }

    fn evaluate(&self, conditions: &FieldConditions<'_>) -> IrrigationLevel {
        // An empty forecast never counts as hot
        let hot_weather = avg_temperature(conditions.forecast, NEAR_TERM_FORECAST_DAYS)
            .map_or(false, |t| t > Self::HOT_TEMP_C);

        let level = Self::classify(conditions.current.soil_moisture, hot_weather);
        tracing::debug!(
            moisture = conditions.current.soil_moisture,
            hot_weather,
            %level,
            "irrigation evaluated"
        );
        level
    }
}
