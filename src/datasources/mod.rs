use crate::db::{Database, SortOrder};
use crate::error::Result;
use crate::models::{SensorReading, YieldRecord};

/// Read-only access to the per-field history the recommendation engine needs.
pub trait FieldDataSource {
    /// Readings for `field_id` from the last `days` days, newest first
    fn fetch_recent_readings(&self, field_id: &str, days: u32) -> Result<Vec<SensorReading>>;

    /// At most `limit` yield records for `field_id`, newest harvest first
    fn fetch_recent_yields(&self, field_id: &str, limit: usize) -> Result<Vec<YieldRecord>>;
}

impl FieldDataSource for Database {
    fn fetch_recent_readings(&self, field_id: &str, days: u32) -> Result<Vec<SensorReading>> {
        let since = chrono::Utc::now() - chrono::Duration::days(days as i64);
        self.get_readings_since(field_id, since, SortOrder::NewestFirst)
    }

    fn fetch_recent_yields(&self, field_id: &str, limit: usize) -> Result<Vec<YieldRecord>> {
        self.get_yields(field_id, SortOrder::NewestFirst, Some(limit))
    }
}
