use std::path::PathBuf;
use std::sync::Arc;

use crate::error::AppResult;
use crate::services::analytics_service::AnalyticsService;
use crate::services::customer_directory::CustomerDirectory;
use crate::services::feedback_log::FeedbackLog;
use crate::services::prediction_service::PredictionService;
use crate::services::predictor_session::PredictorSession;
use crate::storage::{KeyValueStore, SqliteStore};

/// Wires the services behind the dashboard shell. Sessions are handed out
/// per view; everything else is shared.
#[derive(Clone)]
pub struct AppState {
    prediction_service: Arc<PredictionService>,
    feedback_log: Arc<FeedbackLog>,
    directory: Arc<CustomerDirectory>,
    analytics_service: Arc<AnalyticsService>,
}

impl AppState {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> AppResult<Self> {
        let data_dir = data_dir.into();
        crate::utils::logger::init_logging(&data_dir.join("logs"))?;

        let store = Arc::new(SqliteStore::new(data_dir.join("churnguard.sqlite"))?);
        Self::with_store(store)
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let prediction_service = Arc::new(PredictionService::from_env()?);
        let feedback_log = Arc::new(FeedbackLog::new(store));
        let analytics_service = Arc::new(AnalyticsService::new(Arc::clone(&feedback_log)));
        let directory = Arc::new(CustomerDirectory::with_sample_records());

        Ok(Self {
            prediction_service,
            feedback_log,
            directory,
            analytics_service,
        })
    }

    pub fn prediction(&self) -> Arc<PredictionService> {
        Arc::clone(&self.prediction_service)
    }

    pub fn feedback(&self) -> Arc<FeedbackLog> {
        Arc::clone(&self.feedback_log)
    }

    pub fn directory(&self) -> Arc<CustomerDirectory> {
        Arc::clone(&self.directory)
    }

    pub fn analytics(&self) -> Arc<AnalyticsService> {
        Arc::clone(&self.analytics_service)
    }

    pub fn new_session(&self) -> PredictorSession {
        PredictorSession::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn state_wires_services_over_one_store() -> AppResult<()> {
        let state = AppState::with_store(Arc::new(MemoryStore::new()))?;

        assert!(!state.directory().records().is_empty());
        assert_eq!(state.analytics().feedback_count()?, 0);
        assert!(state.feedback().export_all()?.is_none());

        let session = state.new_session();
        assert!(session.prediction().is_none());

        Ok(())
    }
}
