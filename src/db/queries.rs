use crate::db::Database;
use crate::error::Result;
use crate::models::{SensorReading, YieldRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::NewestFirst => "DESC",
            SortOrder::OldestFirst => "ASC",
        }
    }
}

/// Fixed-width UTC timestamps so that text ordering matches time ordering
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            tracing::warn!(column, value = %raw, "Unparsable timestamp in database");
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
        })
}

// Sensor Reading Queries

impl Database {
    pub fn insert_reading(&self, reading: &SensorReading) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO sensor_data
                    (timestamp, soil_moisture, soil_nitrogen, soil_phosphorus, soil_potassium,
                     temperature, humidity, rainfall, field_id)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    format_timestamp(&reading.timestamp),
                    reading.soil_moisture,
                    reading.soil_nitrogen,
                    reading.soil_phosphorus,
                    reading.soil_potassium,
                    reading.temperature,
                    reading.humidity,
                    reading.rainfall,
                    reading.field_id,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Insert many readings and yield records in one transaction
    pub fn insert_batch(&self, readings: &[SensorReading], yields: &[YieldRecord]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut reading_stmt = tx.prepare(
                    r#"
                    INSERT INTO sensor_data
                        (timestamp, soil_moisture, soil_nitrogen, soil_phosphorus, soil_potassium,
                         temperature, humidity, rainfall, field_id)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                )?;
                for r in readings {
                    reading_stmt.execute(params![
                        format_timestamp(&r.timestamp),
                        r.soil_moisture,
                        r.soil_nitrogen,
                        r.soil_phosphorus,
                        r.soil_potassium,
                        r.temperature,
                        r.humidity,
                        r.rainfall,
                        r.field_id,
                    ])?;
                }

                let mut yield_stmt = tx.prepare(
                    r#"
                    INSERT INTO yield_history (season, crop_type, yield_amount, field_id, harvest_date)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )?;
                for y in yields {
                    yield_stmt.execute(params![
                        y.season,
                        y.crop_type,
                        y.yield_amount,
                        y.field_id,
                        format_timestamp(&y.harvest_date),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn count_readings(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM sensor_data", [], |row| row.get(0))?)
        })
    }

    pub fn count_yields(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM yield_history", [], |row| row.get(0))?)
        })
    }

    pub fn get_latest_reading(&self, field_id: &str) -> Result<Option<SensorReading>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM sensor_data WHERE field_id = ?1 ORDER BY timestamp DESC LIMIT 1",
                [field_id],
                row_to_reading,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn get_readings_since(
        &self,
        field_id: &str,
        since: DateTime<Utc>,
        order: SortOrder,
    ) -> Result<Vec<SensorReading>> {
        let sql = format!(
            "SELECT * FROM sensor_data WHERE field_id = ?1 AND timestamp >= ?2 ORDER BY timestamp {}",
            order.as_sql()
        );
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let readings = stmt
                .query_map(params![field_id, format_timestamp(&since)], row_to_reading)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(readings)
        })
    }
}

fn row_to_reading(row: &Row) -> rusqlite::Result<SensorReading> {
    Ok(SensorReading {
        id: Some(row.get("id")?),
        timestamp: parse_timestamp(row, "timestamp")?,
        soil_moisture: row.get("soil_moisture")?,
        soil_nitrogen: row.get("soil_nitrogen")?,
        soil_phosphorus: row.get("soil_phosphorus")?,
        soil_potassium: row.get("soil_potassium")?,
        temperature: row.get("temperature")?,
        humidity: row.get("humidity")?,
        rainfall: row.get("rainfall")?,
        field_id: row.get("field_id")?,
    })
}

// Yield History Queries

impl Database {
    /// Yield records for a field ordered by harvest date; `None` returns all
    pub fn get_yields(
        &self,
        field_id: &str,
        order: SortOrder,
        limit: Option<usize>,
    ) -> Result<Vec<YieldRecord>> {
        let sql = format!(
            "SELECT * FROM yield_history WHERE field_id = ?1 ORDER BY harvest_date {} LIMIT ?2",
            order.as_sql()
        );
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map_or(-1, |l| l as i64);

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let records = stmt
                .query_map(params![field_id, limit], row_to_yield)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }
}

fn row_to_yield(row: &Row) -> rusqlite::Result<YieldRecord> {
    Ok(YieldRecord {
        id: Some(row.get("id")?),
        season: row.get("season")?,
        crop_type: row.get("crop_type")?,
        yield_amount: row.get("yield_amount")?,
        harvest_date: parse_timestamp(row, "harvest_date")?,
        field_id: row.get("field_id")?,
    })
}
