use super::{FieldConditions, Rule};
use crate::logic::calculations::linear_trend;
use crate::models::FertilizerAction;

/// Fertilizer rule - decides whether to apply fertilizer from nutrient levels
/// and their short-term trend
///
/// Uses up to the 7 most recent readings, newest first. The trend is the
/// least-squares slope against index position with index 0 = newest, so a
/// series that was higher in the past has a positive slope.
///
/// Apply when any of:
/// - Current nitrogen < 20 ppm
/// - Current phosphorus < 15 ppm
/// - Nitrogen slope < -0.5
/// - Phosphorus slope < -0.3
///
/// Fewer than 3 readings always delays (not enough signal).
pub struct FertilizerRule;

impl FertilizerRule {
    pub const MIN_READINGS: usize = 3;
    pub const TREND_WINDOW: usize = 7;
    pub const NITROGEN_LOW: f64 = 20.0;
    pub const PHOSPHORUS_LOW: f64 = 15.0;
    pub const NITROGEN_DECLINE: f64 = -0.5;
    pub const PHOSPHORUS_DECLINE: f64 = -0.3;
}

impl Rule for FertilizerRule {
    type Output = FertilizerAction;

    fn id(&self) -> &'static str {
        "fertilizer"
    }

    fn name(&self) -> &'static str {
        "Fertilizer Need"
    }

    fn evaluate(&self, conditions: &FieldConditions<'_>) -> FertilizerAction {
        let recent = conditions.recent;
        if recent.len() < Self::MIN_READINGS {
            return FertilizerAction::Delay;
        }

        let window = &recent[..recent.len().min(Self::TREND_WINDOW)];
        let nitrogen: Vec<f64> = window.iter().map(|r| r.soil_nitrogen).collect();
        let phosphorus: Vec<f64> = window.iter().map(|r| r.soil_phosphorus).collect();

        let nitrogen_trend = linear_trend(&nitrogen);
        let phosphorus_trend = linear_trend(&phosphorus);

        let low_nutrients =
            nitrogen[0] < Self::NITROGEN_LOW || phosphorus[0] < Self::PHOSPHORUS_LOW;
        let declining = nitrogen_trend < Self::NITROGEN_DECLINE
            || phosphorus_trend < Self::PHOSPHORUS_DECLINE;

        tracing::debug!(
            nitrogen = nitrogen[0],
            phosphorus = phosphorus[0],
            nitrogen_trend,
            phosphorus_trend,
            "fertilizer evaluated"
        );

        if low_nutrients || declining {
            FertilizerAction::Apply
        } else {
            FertilizerAction::Delay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SensorReading;
    use chrono::{Duration, Utc};

    /// Build newest-first readings from (nitrogen, phosphorus) pairs
    fn readings(levels: &[(f64, f64)]) -> Vec<SensorReading> {
        let now = Utc::now();
        levels
            .iter()
            .enumerate()
            .map(|(i, (n, p))| {
                SensorReading::new("field_001", now - Duration::hours(6 * i as i64))
                    .with_nutrients(*n, *p, 200.0)
            })
            .collect()
    }

    fn evaluate(recent: &[SensorReading]) -> FertilizerAction {
        FertilizerRule.evaluate(&FieldConditions {
            current: &recent[0],
            recent,
            forecast: &[],
            yields: &[],
        })
    }

    #[test]
    fn too_few_readings_always_delay() {
        // Depleted soil, but only two readings
        assert_eq!(
            evaluate(&readings(&[(1.0, 1.0), (2.0, 2.0)])),
            FertilizerAction::Delay
        );
        assert_eq!(evaluate(&readings(&[(1.0, 1.0)])), FertilizerAction::Delay);
    }

    #[test]
    fn healthy_stable_levels_delay() {
        let recent = readings(&[(25.0, 18.0), (25.0, 18.0), (25.0, 18.0), (25.0, 18.0)]);
        assert_eq!(evaluate(&recent), FertilizerAction::Delay);
    }

    #[test]
    fn low_current_nitrogen_applies() {
        let recent = readings(&[(19.9, 18.0), (25.0, 18.0), (25.0, 18.0)]);
        assert_eq!(evaluate(&recent), FertilizerAction::Apply);
    }

    #[test]
    fn low_current_phosphorus_applies() {
        let recent = readings(&[(25.0, 14.5), (25.0, 18.0), (25.0, 18.0)]);
        assert_eq!(evaluate(&recent), FertilizerAction::Apply);
    }

    #[test]
    fn thresholds_are_strict() {
        let recent = readings(&[(20.0, 15.0), (20.0, 15.0), (20.0, 15.0)]);
        assert_eq!(evaluate(&recent), FertilizerAction::Delay);
    }

    #[test]
    fn negative_slope_over_newest_first_series_applies() {
        // Values shrink as the index moves toward older data: slope -1.0
        let recent = readings(&[(30.0, 18.0), (29.0, 18.0), (28.0, 18.0), (27.0, 18.0)]);
        assert_eq!(evaluate(&recent), FertilizerAction::Apply);
    }

    #[test]
    fn positive_slope_over_newest_first_series_delays() {
        // Nutrients were higher in the past: slope +1.0 in index order
        let recent = readings(&[(27.0, 18.0), (28.0, 18.0), (29.0, 18.0), (30.0, 18.0)]);
        assert_eq!(evaluate(&recent), FertilizerAction::Delay);
    }

    #[test]
    fn phosphorus_slope_threshold() {
        // Phosphorus slope -0.4 < -0.3
        let recent = readings(&[(25.0, 20.0), (25.0, 19.6), (25.0, 19.2)]);
        assert_eq!(evaluate(&recent), FertilizerAction::Apply);

        // Phosphorus slope -0.2 is not steep enough
        let recent = readings(&[(25.0, 20.0), (25.0, 19.8), (25.0, 19.6)]);
        assert_eq!(evaluate(&recent), FertilizerAction::Delay);
    }

    #[test]
    fn only_seven_newest_readings_count() {
        // First 7 flat and healthy; the older tail would drag both slopes
        // well below the thresholds if it were included
        let mut levels = vec![(25.0, 18.0); 7];
        levels.extend([(5.0, 2.0), (0.0, 0.0)]);
        assert_eq!(evaluate(&readings(&levels)), FertilizerAction::Delay);
    }
}
