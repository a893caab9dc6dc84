use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One day of the synthetic weather forecast.
///
/// Values are sampled independently per day; they are not derived from any
/// real forecast provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: DateTime<Utc>,
    pub temperature: f64, // °C
    pub humidity: f64,    // percent
    pub rainfall: f64,    // mm
}

/// Average temperature over the first `days` entries.
pub fn avg_temperature(forecast: &[ForecastDay], days: usize) -> Option<f64> {
    crate::logic::calculations::mean(forecast.iter().take(days).map(|d| d.temperature))
}

/// Average humidity over the first `days` entries.
pub fn avg_humidity(forecast: &[ForecastDay], days: usize) -> Option<f64> {
    crate::logic::calculations::mean(forecast.iter().take(days).map(|d| d.humidity))
}

/// Total rainfall expected over the whole forecast.
pub fn total_rainfall(forecast: &[ForecastDay]) -> f64 {
    forecast.iter().map(|d| d.rainfall).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(temperature: f64, humidity: f64, rainfall: f64) -> ForecastDay {
        ForecastDay {
            date: Utc::now(),
            temperature,
            humidity,
            rainfall,
        }
    }

    #[test]
    fn averages_only_look_at_leading_days() {
        let forecast = vec![
            day(20.0, 50.0, 0.0),
            day(22.0, 60.0, 1.0),
            day(24.0, 70.0, 0.0),
            day(40.0, 99.0, 2.5),
        ];

        assert!((avg_temperature(&forecast, 3).unwrap() - 22.0).abs() < 1e-9);
        assert!((avg_humidity(&forecast, 3).unwrap() - 60.0).abs() < 1e-9);
        assert!((total_rainfall(&forecast) - 3.5).abs() < 1e-9);
    }

    #[test]
    fn averages_of_empty_forecast_are_none() {
        assert!(avg_temperature(&[], 3).is_none());
        assert!(avg_humidity(&[], 3).is_none());
    }
}
