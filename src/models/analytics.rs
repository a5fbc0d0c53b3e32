use serde::{Deserialize, Serialize};

use crate::models::customer::Contract;

/// Churned vs. active customer counts for one contract type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContractChurnSlice {
    pub contract: Contract,
    pub churned: u64,
    pub active: u64,
}

/// Churn rate for one 12-month tenure band (e.g. "0-12").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenureBandChurn {
    pub band: String,
    pub churn_rate: f64,
}

/// Pairwise correlation between two numeric dataset features.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCorrelation {
    pub x: String,
    pub y: String,
    pub value: f64,
}

/// One reference evaluation figure with its industry benchmark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationMetric {
    pub name: String,
    pub value: f64,
    pub benchmark: f64,
    pub description: String,
}
