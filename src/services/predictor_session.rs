use chrono::Utc;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::customer::{CustomerProfile, ProfileField};
use crate::models::feedback::FeedbackRecord;
use crate::models::prediction::ChurnPrediction;
use crate::services::customer_directory::CustomerRecord;

/// Holds the operator's working state: the current profile and the prediction
/// made against it. All mutation happens from a single logical thread of UI
/// event handlers.
#[derive(Debug, Default)]
pub struct PredictorSession {
    profile: CustomerProfile,
    prediction: Option<ChurnPrediction>,
}

impl PredictorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> &CustomerProfile {
        &self.profile
    }

    pub fn prediction(&self) -> Option<&ChurnPrediction> {
        self.prediction.as_ref()
    }

    /// Field-level edit with boundary validation. An existing prediction is
    /// kept on screen until the operator re-submits.
    pub fn edit_field(&mut self, field: ProfileField, raw: &str) -> AppResult<()> {
        self.profile.set_field(field, raw)
    }

    /// Wholesale profile replacement from a directory record. Risk
    /// assessments are never carried across profile changes.
    pub fn select_record(&mut self, record: &CustomerRecord) {
        debug!(target: "app::session", customer_id = %record.id, "selected directory record");
        self.profile = record.profile.clone();
        self.prediction = None;
    }

    pub fn set_prediction(&mut self, prediction: ChurnPrediction) {
        self.prediction = Some(prediction);
    }

    pub fn clear_prediction(&mut self) {
        self.prediction = None;
    }

    /// Snapshot the current profile and prediction into a feedback record.
    /// Fails when no prediction exists or the rating is outside 1-5.
    pub fn feedback_record(&self, rating: u8, comment: &str) -> AppResult<FeedbackRecord> {
        let prediction = self
            .prediction
            .as_ref()
            .ok_or_else(|| AppError::validation("no prediction available to rate"))?;

        FeedbackRecord::capture(&self.profile, prediction, rating, comment, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prediction::RiskCategory;
    use crate::services::customer_directory::CustomerDirectory;

    fn sample_prediction() -> ChurnPrediction {
        ChurnPrediction {
            probability: 0.66,
            risk_category: RiskCategory::Medium,
            drivers: Vec::new(),
            explanation: "Moderate risk.".to_string(),
        }
    }

    #[test]
    fn selecting_a_record_replaces_profile_and_discards_prediction() {
        let directory = CustomerDirectory::with_sample_records();
        let record = &directory.lookup("alex")[0];

        let mut session = PredictorSession::new();
        session.set_prediction(sample_prediction());
        session.select_record(record);

        assert_eq!(session.profile(), &record.profile);
        assert!(session.prediction().is_none());
    }

    #[test]
    fn field_edit_keeps_existing_prediction() {
        let mut session = PredictorSession::new();
        session.set_prediction(sample_prediction());

        session
            .edit_field(ProfileField::Tenure, "30")
            .expect("tenure edit applies");

        assert_eq!(session.profile().tenure, 30);
        assert!(session.prediction().is_some());
    }

    #[test]
    fn feedback_requires_a_prediction() {
        let session = PredictorSession::new();
        let error = session
            .feedback_record(5, "great")
            .expect_err("feedback without a prediction must fail");
        assert!(matches!(error, AppError::Validation { .. }));
    }

    #[test]
    fn feedback_snapshots_current_state() {
        let mut session = PredictorSession::new();
        session.set_prediction(sample_prediction());

        let record = session
            .feedback_record(4, "about right")
            .expect("feedback captures");
        assert_eq!(record.rating, 4);
        assert_eq!(record.probability, 0.66);
        assert_eq!(record.tenure, session.profile().tenure);
    }
}
