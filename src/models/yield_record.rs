use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Historical harvest figure for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub season: String,
    pub crop_type: String,
    pub yield_amount: f64, // tons/hectare
    pub harvest_date: DateTime<Utc>,
    pub field_id: String,
}

impl YieldRecord {
    pub fn new(field_id: &str, season: &str, yield_amount: f64, harvest_date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            season: season.to_string(),
            crop_type: "Corn".to_string(),
            yield_amount,
            harvest_date,
            field_id: field_id.to_string(),
        }
    }

    pub fn with_crop(mut self, crop_type: &str) -> Self {
        self.crop_type = crop_type.to_string();
        self
    }
}
