pub mod analytics_service;
pub mod customer_directory;
pub mod feedback_log;
pub mod prediction_service;
pub mod predictor_session;
pub mod prompt_templates;
