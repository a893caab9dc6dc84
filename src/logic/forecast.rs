use super::calculations::round_to;
use crate::models::ForecastDay;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub const FORECAST_DAYS: usize = 7;

const BASE_TEMP_C: f64 = 22.0;
const TEMP_SPREAD: (f64, f64) = (-5.0, 8.0);
const BASE_HUMIDITY: f64 = 60.0;
const HUMIDITY_SPREAD: (f64, f64) = (-15.0, 20.0);
const DRY_DAY_PROBABILITY: f64 = 0.7;
const MAX_RAINFALL_MM: f64 = 5.0;

/// Synthetic 7-day forecast generator
///
/// Produces one entry per day starting at `now`. Every value is sampled
/// independently from `rng`; nothing is fetched from a weather provider.
/// Supplying a seeded rng makes the output reproducible.
pub fn simulate_forecast<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Vec<ForecastDay> {
    (0..FORECAST_DAYS)
        .map(|i| {
            let temperature = BASE_TEMP_C + rng.gen_range(TEMP_SPREAD.0..=TEMP_SPREAD.1);
            let humidity = BASE_HUMIDITY + rng.gen_range(HUMIDITY_SPREAD.0..=HUMIDITY_SPREAD.1);
            let rainfall = if rng.gen::<f64>() > DRY_DAY_PROBABILITY {
                rng.gen_range(0.0..=MAX_RAINFALL_MM)
            } else {
                0.0
            };

            ForecastDay {
                date: now + Duration::days(i as i64),
                temperature: round_to(temperature, 1),
                humidity: round_to(humidity, 1),
                rainfall: round_to(rainfall, 1),
            }
        })
        .collect()
}
