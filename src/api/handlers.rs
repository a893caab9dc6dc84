//! HTTP handlers for the `/api/v1` endpoints

use super::validation::{validate_days, validate_field_id};
use super::AppState;
use crate::db::SortOrder;
use crate::error::{AgrocastError, Result};
use crate::logic::{simulate_forecast, RecommendationEngine};
use crate::models::{
    CurrentWeather, ForecastDay, Nutrients, RecommendationResult, SensorReading, YieldRecord,
};
use axum::{
    extract::{Query, State},
    http::Uri,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const HISTORY_DEFAULT_DAYS: i64 = 30;
const SENSOR_DATA_DEFAULT_DAYS: i64 = 7;

#[derive(Debug, Default, Deserialize)]
pub struct FieldQuery {
    pub field_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub days: Option<i64>,
    pub field_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub current_soil_moisture: f64,
    pub current_nutrients: Nutrients,
    pub current_weather: CurrentWeather,
    pub yield_forecast: f64,
    pub recommendations: RecommendationResult,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct YieldHistoryEntry {
    pub season: String,
    pub crop_type: String,
    pub yield_amount: f64,
    pub harvest_date: DateTime<Utc>,
}

impl From<YieldRecord> for YieldHistoryEntry {
    fn from(record: YieldRecord) -> Self {
        Self {
            season: record.season,
            crop_type: record.crop_type,
            yield_amount: record.yield_amount,
            harvest_date: record.harvest_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoricalResponse {
    pub sensor_data: Vec<SensorReading>,
    pub yield_history: Vec<YieldHistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

fn resolve_field_id<'a>(state: &'a AppState, field_id: &'a Option<String>) -> Result<&'a str> {
    let field_id = field_id
        .as_deref()
        .unwrap_or(&state.config.defaults.field_id);
    validate_field_id(field_id.trim())
}

fn readings_since(state: &AppState, field_id: &str, days: u32) -> Result<Vec<SensorReading>> {
    let since = Utc::now() - Duration::days(days as i64);
    state
        .db
        .get_readings_since(field_id, since, SortOrder::OldestFirst)
}

/// Current readings for a field together with its recommendations
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<FieldQuery>,
) -> Result<Json<DashboardResponse>> {
    let field_id = resolve_field_id(&state, &query.field_id)?;

    let latest = state
        .db
        .get_latest_reading(field_id)?
        .ok_or_else(|| AgrocastError::NoData {
            field_id: field_id.to_string(),
        })?;

    let recommendations = RecommendationEngine::new(&state.db).generate_recommendations(field_id)?;

    Ok(Json(DashboardResponse {
        current_soil_moisture: latest.soil_moisture,
        current_nutrients: latest.nutrients(),
        current_weather: latest.weather(),
        yield_forecast: recommendations.yield_forecast,
        recommendations,
        last_updated: latest.timestamp,
    }))
}

pub async fn recommendations(
    State(state): State<AppState>,
    Query(query): Query<FieldQuery>,
) -> Result<Json<RecommendationResult>> {
    let field_id = resolve_field_id(&state, &query.field_id)?;
    let result = RecommendationEngine::new(&state.db).generate_recommendations(field_id)?;
    Ok(Json(result))
}

/// Sensor readings (oldest first) plus the full yield history for a field
pub async fn historical(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<HistoricalResponse>> {
    let field_id = resolve_field_id(&state, &query.field_id)?;
    let days = validate_days(query.days.unwrap_or(HISTORY_DEFAULT_DAYS))?;

    let sensor_data = readings_since(&state, field_id, days)?;
    let yield_history = state
        .db
        .get_yields(field_id, SortOrder::OldestFirst, None)?
        .into_iter()
        .map(YieldHistoryEntry::from)
        .collect();

    Ok(Json(HistoricalResponse {
        sensor_data,
        yield_history,
    }))
}

pub async fn sensor_data(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<SensorReading>>> {
    let field_id = resolve_field_id(&state, &query.field_id)?;
    let days = validate_days(query.days.unwrap_or(SENSOR_DATA_DEFAULT_DAYS))?;
    Ok(Json(readings_since(&state, field_id, days)?))
}

pub async fn weather_forecast() -> Json<ForecastResponse> {
    let forecast = simulate_forecast(Utc::now(), &mut rand::thread_rng());
    Json(ForecastResponse { forecast })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.db.count_readings() {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not query the database");
            "disconnected"
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}

pub async fn not_found(uri: Uri) -> AgrocastError {
    AgrocastError::NotFound(format!("Route {}", uri.path()))
}
