use std::sync::Arc;

use crate::error::AppResult;
use crate::models::analytics::{
    ContractChurnSlice, EvaluationMetric, FeatureCorrelation, TenureBandChurn,
};
use crate::models::customer::Contract;
use crate::services::feedback_log::FeedbackLog;

/// Curated aggregate figures behind the dashboard views. These are
/// illustrative reference datasets from the Telco churn study, not live
/// aggregates; only the feedback count is read from storage.
pub struct AnalyticsService {
    feedback_log: Arc<FeedbackLog>,
}

impl AnalyticsService {
    pub fn new(feedback_log: Arc<FeedbackLog>) -> Self {
        Self { feedback_log }
    }

    pub fn contract_churn(&self) -> Vec<ContractChurnSlice> {
        vec![
            ContractChurnSlice {
                contract: Contract::MonthToMonth,
                churned: 1655,
                active: 2220,
            },
            ContractChurnSlice {
                contract: Contract::OneYear,
                churned: 166,
                active: 1307,
            },
            ContractChurnSlice {
                contract: Contract::TwoYear,
                churned: 48,
                active: 1647,
            },
        ]
    }

    pub fn tenure_churn_rates(&self) -> Vec<TenureBandChurn> {
        [
            ("0-12", 0.45),
            ("13-24", 0.28),
            ("25-36", 0.19),
            ("37-48", 0.15),
            ("49-60", 0.11),
            ("61-72", 0.05),
        ]
        .into_iter()
        .map(|(band, churn_rate)| TenureBandChurn {
            band: band.to_string(),
            churn_rate,
        })
        .collect()
    }

    pub fn feature_correlations(&self) -> Vec<FeatureCorrelation> {
        [
            ("Tenure", "MonthlyCharges", 0.25),
            ("Tenure", "TotalCharges", 0.83),
            ("Tenure", "Churn", -0.35),
            ("MonthlyCharges", "TotalCharges", 0.65),
            ("MonthlyCharges", "Churn", 0.19),
            ("TotalCharges", "Churn", -0.20),
        ]
        .into_iter()
        .map(|(x, y, value)| FeatureCorrelation {
            x: x.to_string(),
            y: y.to_string(),
            value,
        })
        .collect()
    }

    pub fn evaluation_metrics(&self) -> Vec<EvaluationMetric> {
        [
            ("Recall (Target)", 0.84, 0.72, "Ability to catch churners"),
            ("Precision", 0.52, 0.48, "Reliability of alerts"),
            ("F1 Score", 0.64, 0.58, "Harmonic mean of both"),
            ("ROC-AUC", 0.87, 0.81, "Model discrimination power"),
        ]
        .into_iter()
        .map(|(name, value, benchmark, description)| EvaluationMetric {
            name: name.to_string(),
            value,
            benchmark,
            description: description.to_string(),
        })
        .collect()
    }

    /// Feedback rows collected so far, shown alongside the evaluation
    /// figures.
    pub fn feedback_count(&self) -> AppResult<usize> {
        self.feedback_log.row_count()
    }
}
