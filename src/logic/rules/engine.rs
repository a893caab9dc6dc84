use super::{
    FertilizerRule, FieldConditions, IrrigationRule, PestRiskRule, Rule, YieldForecastRule,
};
use crate::datasources::FieldDataSource;
use crate::error::{AgrocastError, Result};
use crate::logic::forecast::simulate_forecast;
use crate::models::{
    FertilizerAction, IrrigationLevel, PestRisk, RecommendationResult,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Days of sensor history the engine reads for a field
pub const READING_WINDOW_DAYS: u32 = 7;

/// Static placeholder, not derived from the inputs
pub const CONFIDENCE: f64 = 0.85;

pub const IRRIGATION_ALERT: &str = "Critical irrigation needed - soil moisture is low";
pub const PEST_ALERT: &str = "High pest risk detected - consider preventive measures";
pub const FERTILIZER_ALERT: &str = "Fertilizer application recommended";

/// Per-request recommendation engine.
///
/// Borrows a read-only data source and keeps no state between calls, so one
/// can be built for every request.
pub struct RecommendationEngine<'a, S> {
    source: &'a S,
}

impl<'a, S: FieldDataSource> RecommendationEngine<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub fn generate_recommendations(&self, field_id: &str) -> Result<RecommendationResult> {
        self.generate_recommendations_with(field_id, Utc::now(), &mut rand::thread_rng())
    }

    /// Same as [`generate_recommendations`](Self::generate_recommendations)
    /// with an explicit clock and random source for the forecast.
    pub fn generate_recommendations_with<R: Rng>(
        &self,
        field_id: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<RecommendationResult> {
        let recent = self
            .source
            .fetch_recent_readings(field_id, READING_WINDOW_DAYS)?;
        let current = recent.first().ok_or_else(|| AgrocastError::NoData {
            field_id: field_id.to_string(),
        })?;

        let forecast = simulate_forecast(now, rng);
        let yields = self
            .source
            .fetch_recent_yields(field_id, YieldForecastRule::HISTORY_LIMIT)?;

        let conditions = FieldConditions {
            current,
            recent: &recent,
            forecast: &forecast,
            yields: &yields,
        };

        let result = evaluate(&conditions, now)?;
        tracing::info!(
            field_id,
            readings = recent.len(),
            irrigation = %result.irrigation,
            fertilizer = %result.fertilizer,
            pest_risk = %result.pest_risk,
            yield_forecast = result.yield_forecast,
            "recommendations generated"
        );
        Ok(result)
    }

    pub fn list_rules() -> Vec<(&'static str, &'static str)> {
        vec![
            (IrrigationRule.id(), IrrigationRule.name()),
            (FertilizerRule.id(), FertilizerRule.name()),
            (PestRiskRule.id(), PestRiskRule.name()),
            (YieldForecastRule.id(), YieldForecastRule.name()),
        ]
    }
}

/// Run every rule against one set of conditions. All-or-nothing: a yield
/// forecast error fails the whole result.
pub fn evaluate(conditions: &FieldConditions<'_>, now: DateTime<Utc>) -> Result<RecommendationResult> {
    let irrigation = IrrigationRule.evaluate(conditions);
    let fertilizer = FertilizerRule.evaluate(conditions);
    let pest_risk = PestRiskRule.evaluate(conditions);
    let yield_forecast = YieldForecastRule.evaluate(conditions)?;

    Ok(RecommendationResult {
        irrigation,
        fertilizer,
        pest_risk,
        yield_forecast,
        confidence: CONFIDENCE,
        timestamp: now,
        alerts: build_alerts(irrigation, pest_risk, fertilizer),
    })
}

pub fn build_alerts(
    irrigation: IrrigationLevel,
    pest_risk: PestRisk,
    fertilizer: FertilizerAction,
) -> Vec<String> {
    let mut alerts = Vec::new();
    if irrigation == IrrigationLevel::High {
        alerts.push(IRRIGATION_ALERT.to_string());
    }
    if pest_risk == PestRisk::High {
        alerts.push(PEST_ALERT.to_string());
    }
    if fertilizer == FertilizerAction::Apply {
        alerts.push(FERTILIZER_ALERT.to_string());
    }
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastDay, SensorReading, YieldRecord};
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;

    #[derive(Default)]
    struct StubSource {
        readings: Vec<SensorReading>,
        yields: Vec<YieldRecord>,
        yield_limit_seen: Cell<Option<usize>>,
    }

    impl FieldDataSource for StubSource {
        fn fetch_recent_readings(&self, field_id: &str, _days: u32) -> Result<Vec<SensorReading>> {
            Ok(self
                .readings
                .iter()
                .filter(|r| r.field_id == field_id)
                .cloned()
                .collect())
        }

        fn fetch_recent_yields(&self, field_id: &str, limit: usize) -> Result<Vec<YieldRecord>> {
            self.yield_limit_seen.set(Some(limit));
            Ok(self
                .yields
                .iter()
                .filter(|y| y.field_id == field_id)
                .take(limit)
                .cloned()
                .collect())
        }
    }

    fn reading(hours_ago: i64) -> SensorReading {
        SensorReading::new("field_001", Utc::now() - Duration::hours(hours_ago))
            .with_soil_moisture(45.0)
            .with_nutrients(25.0, 18.0, 200.0)
            .with_weather(22.0, 60.0, 0.0)
    }

    fn hot_humid_forecast() -> Vec<ForecastDay> {
        (0..7)
            .map(|i| ForecastDay {
                date: Utc::now() + Duration::days(i),
                temperature: 33.0,
                humidity: 85.0,
                rainfall: 0.0,
            })
            .collect()
    }

    #[test]
    fn no_readings_is_no_data() {
        let source = StubSource::default();
        let err = RecommendationEngine::new(&source)
            .generate_recommendations("field_001")
            .unwrap_err();
        assert!(matches!(err, AgrocastError::NoData { ref field_id } if field_id == "field_001"));
    }

    #[test]
    fn readings_for_other_fields_do_not_count() {
        let source = StubSource {
            readings: vec![reading(1)],
            ..Default::default()
        };
        let err = RecommendationEngine::new(&source)
            .generate_recommendations("field_002")
            .unwrap_err();
        assert!(matches!(err, AgrocastError::NoData { .. }));
    }

    #[test]
    fn healthy_field_without_history() {
        let source = StubSource {
            readings: vec![reading(0), reading(6), reading(12)],
            ..Default::default()
        };
        let now = Utc::now();
        let result = RecommendationEngine::new(&source)
            .generate_recommendations_with("field_001", now, &mut StdRng::seed_from_u64(1))
            .unwrap();

        // Simulated temperatures never average above 30°C
        assert_eq!(result.irrigation, IrrigationLevel::Low);
        assert_eq!(result.fertilizer, FertilizerAction::Delay);
        assert_eq!(result.yield_forecast, 8.5);
        assert_eq!(result.confidence, CONFIDENCE);
        assert_eq!(result.timestamp, now);
        assert!(!result.alerts.contains(&IRRIGATION_ALERT.to_string()));
        assert!(!result.alerts.contains(&FERTILIZER_ALERT.to_string()));
    }

    #[test]
    fn yield_history_is_requested_with_limit_five() {
        let now = Utc::now();
        let source = StubSource {
            readings: vec![reading(0)],
            yields: (0..8)
                .map(|i| {
                    YieldRecord::new(
                        "field_001",
                        &format!("season {}", i),
                        8.0,
                        now - Duration::days(365 * i),
                    )
                })
                .collect(),
            ..Default::default()
        };

        let result = RecommendationEngine::new(&source)
            .generate_recommendations_with("field_001", now, &mut StdRng::seed_from_u64(5))
            .unwrap();

        assert_eq!(source.yield_limit_seen.get(), Some(5));
        assert_eq!(result.yield_forecast, 8.4);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let source = StubSource {
            readings: vec![reading(0), reading(6), reading(12), reading(18)],
            ..Default::default()
        };
        let engine = RecommendationEngine::new(&source);
        let now = Utc::now();

        let a = engine
            .generate_recommendations_with("field_001", now, &mut StdRng::seed_from_u64(77))
            .unwrap();
        let b = engine
            .generate_recommendations_with("field_001", now, &mut StdRng::seed_from_u64(77))
            .unwrap();

        assert_eq!(a.pest_risk, b.pest_risk);
        assert_eq!(a.alerts, b.alerts);
    }

    #[test]
    fn all_alerts_in_fixed_order() {
        let current = SensorReading::new("field_001", Utc::now())
            .with_soil_moisture(12.0)
            .with_nutrients(10.0, 8.0, 150.0)
            .with_weather(31.0, 88.0, 0.0);
        let recent = vec![current.clone(), current.clone(), current.clone()];
        let forecast = hot_humid_forecast();

        let result = evaluate(
            &FieldConditions {
                current: &current,
                recent: &recent,
                forecast: &forecast,
                yields: &[],
            },
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.irrigation, IrrigationLevel::High);
        assert_eq!(result.pest_risk, PestRisk::High);
        assert_eq!(result.fertilizer, FertilizerAction::Apply);
        assert_eq!(
            result.alerts,
            vec![IRRIGATION_ALERT, PEST_ALERT, FERTILIZER_ALERT]
        );
    }

    #[test]
    fn alerts_included_only_when_triggered() {
        assert!(build_alerts(IrrigationLevel::Medium, PestRisk::Moderate, FertilizerAction::Delay)
            .is_empty());
        assert_eq!(
            build_alerts(IrrigationLevel::Low, PestRisk::High, FertilizerAction::Apply),
            vec![PEST_ALERT, FERTILIZER_ALERT]
        );
        assert_eq!(
            build_alerts(IrrigationLevel::High, PestRisk::Low, FertilizerAction::Delay),
            vec![IRRIGATION_ALERT]
        );
    }

    #[test]
    fn yield_error_fails_whole_result() {
        let current = reading(0);
        let recent = vec![current.clone()];
        let yields = vec![YieldRecord::new("field_001", "bad", f64::NAN, Utc::now())];

        let err = evaluate(
            &FieldConditions {
                current: &current,
                recent: &recent,
                forecast: &[],
                yields: &yields,
            },
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, AgrocastError::InvalidData(_)));
    }

    #[test]
    fn yield_forecast_uses_history() {
        let now = Utc::now();
        let source = StubSource {
            readings: vec![reading(1)],
            yields: [10.0, 9.0, 8.0, 7.0, 6.0]
                .iter()
                .enumerate()
                .map(|(i, amount)| {
                    YieldRecord::new("field_001", "s", *amount, now - Duration::days(365 * i as i64))
                })
                .collect(),
            ..Default::default()
        };
        let result = RecommendationEngine::new(&source)
            .generate_recommendations_with("field_001", now, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(result.yield_forecast, 10.18);
    }

    #[test]
    fn rules_are_listed() {
        let rules = RecommendationEngine::<StubSource>::list_rules();
        let ids: Vec<&str> = rules.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["irrigation", "fertilizer", "pest_risk", "yield_forecast"]);
    }
}
