use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse bucketing of churn probability, as returned by the risk model.
/// Consistency with `probability` is not enforced anywhere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RiskCategory {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Low" => Ok(RiskCategory::Low),
            "Medium" => Ok(RiskCategory::Medium),
            "High" => Ok(RiskCategory::High),
            other => Err(format!("unsupported risk category: {other}")),
        }
    }
}

impl FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// One input attribute the model claims pushed the prediction up or down.
/// Positive impact increases churn risk; the requested magnitude domain is
/// [-0.5, 0.5].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChurnDriver {
    pub feature: String,
    pub impact: f64,
    pub description: String,
}

/// Typed result of one risk assessment. Produced by a successful provider
/// call, discarded when the session profile changes, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChurnPrediction {
    pub probability: f64,
    pub risk_category: RiskCategory,
    pub drivers: Vec<ChurnDriver>,
    pub explanation: String,
}
