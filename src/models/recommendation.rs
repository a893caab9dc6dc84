use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrrigationLevel {
    Low,
    Medium,
    High,
}

impl IrrigationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationLevel::Low => "Low",
            IrrigationLevel::Medium => "Medium",
            IrrigationLevel::High => "High",
        }
    }
}

impl std::fmt::Display for IrrigationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FertilizerAction {
    Apply,
    Delay,
}

impl FertilizerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FertilizerAction::Apply => "Apply",
            FertilizerAction::Delay => "Delay",
        }
    }
}

impl std::fmt::Display for FertilizerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PestRisk {
    Low,
    Moderate,
    High,
}

impl PestRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            PestRisk::Low => "Low",
            PestRisk::Moderate => "Moderate",
            PestRisk::High => "High",
        }
    }
}

impl std::fmt::Display for PestRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of one engine run. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub irrigation: IrrigationLevel,
    pub fertilizer: FertilizerAction,
    pub pest_risk: PestRisk,
    pub yield_forecast: f64, // tons/hectare
    pub confidence: f64,     // 0.0-1.0
    pub timestamp: DateTime<Utc>,
    pub alerts: Vec<String>,
}

impl RecommendationResult {
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }
}
