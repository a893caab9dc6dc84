use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FIELD_ID: &str = "field_001";

/// A single timestamped sensor snapshot for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub soil_moisture: f64,   // percent
    pub soil_nitrogen: f64,   // ppm
    pub soil_phosphorus: f64, // ppm
    pub soil_potassium: f64,  // ppm
    pub temperature: f64,     // °C
    pub humidity: f64,        // percent
    pub rainfall: f64,        // mm
    pub field_id: String,
}

impl SensorReading {
    pub fn new(field_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            timestamp,
            soil_moisture: 0.0,
            soil_nitrogen: 0.0,
            soil_phosphorus: 0.0,
            soil_potassium: 0.0,
            temperature: 0.0,
            humidity: 0.0,
            rainfall: 0.0,
            field_id: field_id.to_string(),
        }
    }

    pub fn with_soil_moisture(mut self, percent: f64) -> Self {
        self.soil_moisture = percent;
        self
    }

    pub fn with_nutrients(mut self, nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        self.soil_nitrogen = nitrogen;
        self.soil_phosphorus = phosphorus;
        self.soil_potassium = potassium;
        self
    }

    pub fn with_weather(mut self, temperature: f64, humidity: f64, rainfall: f64) -> Self {
        self.temperature = temperature;
        self.humidity = humidity;
        self.rainfall = rainfall;
        self
    }

    pub fn nutrients(&self) -> Nutrients {
        Nutrients {
            nitrogen: self.soil_nitrogen,
            phosphorus: self.soil_phosphorus,
            potassium: self.soil_potassium,
        }
    }

    pub fn weather(&self) -> CurrentWeather {
        CurrentWeather {
            temperature: self.temperature,
            humidity: self.humidity,
            rainfall: self.rainfall,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
}
