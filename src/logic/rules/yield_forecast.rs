use super::{FieldConditions, Rule};
use crate::error::{AgrocastError, Result};
use crate::logic::calculations::{round_to, weighted_average};

/// Yield forecast rule - weighted moving average of past harvests with a
/// damped linear trend and a fixed seasonal adjustment
///
/// - Up to 5 harvests, newest first, weighted 0.4 / 0.3 / 0.2 / 0.08 / 0.02
///   (truncated to the available history and renormalized)
/// - With 2+ harvests: trend = (newest - oldest) / count, applied as a
///   factor of 1 + 0.1 * trend
/// - Seasonal multiplier 1.05
/// - No history: 8.5 t/ha
pub struct YieldForecastRule;

impl YieldForecastRule {
    pub const HISTORY_LIMIT: usize = 5;
    pub const WEIGHTS: [f64; Self::HISTORY_LIMIT] = [0.4, 0.3, 0.2, 0.08, 0.02];
    pub const DEFAULT_FORECAST: f64 = 8.5;
    pub const TREND_DAMPING: f64 = 0.1;
    pub const SEASONAL_MULTIPLIER: f64 = 1.05;

    /// Forecast from newest-first yield amounts
    pub fn forecast(amounts: &[f64]) -> Result<f64> {
        if amounts.is_empty() {
            return Ok(Self::DEFAULT_FORECAST);
        }

        let amounts = &amounts[..amounts.len().min(Self::HISTORY_LIMIT)];
        let count = amounts.len();

        let base = weighted_average(amounts, &Self::WEIGHTS[..count]).ok_or_else(|| {
            AgrocastError::InvalidData("yield weights sum to zero".to_string())
        })?;

        let trended = if count >= 2 {
            let trend = (amounts[0] - amounts[count - 1]) / count as f64;
            base * (1.0 + trend * Self::TREND_DAMPING)
        } else {
            base
        };

        let forecast = trended * Self::SEASONAL_MULTIPLIER;
        if !forecast.is_finite() {
            return Err(AgrocastError::InvalidData(format!(
                "yield forecast is not finite (history: {:?})",
                amounts
            )));
        }

        // A steep enough decline drives the trend factor below zero
        Ok(round_to(forecast.max(0.0), 2))
    }
}

impl Rule for YieldForecastRule {
    type Output = Result<f64>;

    fn id(&self) -> &'static str {
        "yield_forecast"
    }

    fn name(&self) -> &'static str {
        "Yield Forecast"
    }

    fn evaluate(&self, conditions: &FieldConditions<'_>) -> Result<f64> {
        let amounts: Vec<f64> = conditions
            .yields
            .iter()
            .take(Self::HISTORY_LIMIT)
            .map(|y| y.yield_amount)
            .collect();

        Self::forecast(&amounts)
    }
}
