use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::customer::{Contract, CustomerProfile, InternetService};
use crate::models::prediction::{ChurnPrediction, RiskCategory};

/// First line of the feedback blob, written once when the slot is empty.
pub const FEEDBACK_CSV_HEADER: &str = "Timestamp,Rating,Feedback,Tenure,Contract,InternetService,MonthlyCharges,TotalCharges,RiskCategory,Probability";

/// One operator accuracy rating, snapshotting the profile fields and the
/// prediction it was logged against. Rows are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub timestamp: DateTime<Utc>,
    pub rating: u8,
    pub comment: String,
    pub tenure: i64,
    pub contract: Contract,
    pub internet_service: InternetService,
    pub monthly_charges: f64,
    pub total_charges: f64,
    pub risk_category: RiskCategory,
    pub probability: f64,
}

impl FeedbackRecord {
    /// Snapshot the given profile and prediction at `timestamp`. Ratings
    /// outside 1-5 are rejected.
    pub fn capture(
        profile: &CustomerProfile,
        prediction: &ChurnPrediction,
        rating: u8,
        comment: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Self> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::validation(format!(
                "star rating must be between 1 and 5, got {rating}"
            )));
        }

        Ok(Self {
            timestamp,
            rating,
            comment: comment.into(),
            tenure: profile.tenure,
            contract: profile.contract,
            internet_service: profile.internet_service,
            monthly_charges: profile.monthly_charges,
            total_charges: profile.total_charges,
            risk_category: prediction.risk_category,
            probability: prediction.probability,
        })
    }

    /// Render the record as one CSV row (no trailing newline). The comment is
    /// the only quoted field; embedded quotes are doubled.
    pub fn csv_row(&self) -> String {
        let escaped_comment = self.comment.replace('"', "\"\"");

        [
            self.timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            self.rating.to_string(),
            format!("\"{escaped_comment}\""),
            self.tenure.to_string(),
            self.contract.to_string(),
            self.internet_service.to_string(),
            self.monthly_charges.to_string(),
            self.total_charges.to_string(),
            self.risk_category.to_string(),
            self.probability.to_string(),
        ]
        .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prediction::ChurnDriver;
    use chrono::TimeZone;

    fn sample_prediction() -> ChurnPrediction {
        ChurnPrediction {
            probability: 0.73,
            risk_category: RiskCategory::High,
            drivers: vec![ChurnDriver {
                feature: "Contract".to_string(),
                impact: 0.3,
                description: "Month-to-month".to_string(),
            }],
            explanation: "High risk.".to_string(),
        }
    }

    #[test]
    fn capture_snapshots_profile_and_prediction() {
        let profile = CustomerProfile::default();
        let prediction = sample_prediction();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let record = FeedbackRecord::capture(&profile, &prediction, 4, "close call", at)
            .expect("valid rating captures");

        assert_eq!(record.tenure, 12);
        assert_eq!(record.contract, Contract::MonthToMonth);
        assert_eq!(record.risk_category, RiskCategory::High);
        assert_eq!(record.probability, 0.73);
    }

    #[test]
    fn capture_rejects_out_of_range_rating() {
        let profile = CustomerProfile::default();
        let prediction = sample_prediction();

        for rating in [0u8, 6] {
            let error = FeedbackRecord::capture(&profile, &prediction, rating, "", Utc::now())
                .expect_err("rating outside 1-5 must fail");
            assert!(matches!(error, AppError::Validation { .. }));
        }
    }

    #[test]
    fn csv_row_doubles_embedded_quotes() {
        let profile = CustomerProfile::default();
        let prediction = sample_prediction();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let record =
            FeedbackRecord::capture(&profile, &prediction, 5, "said \"will stay\" twice", at)
                .expect("capture");
        let row = record.csv_row();

        assert!(row.contains("\"said \"\"will stay\"\" twice\""));
        assert_eq!(row.split(',').count(), 10);
        assert!(row.starts_with("2025-06-01T12:00:00.000Z,5,"));
    }
}
