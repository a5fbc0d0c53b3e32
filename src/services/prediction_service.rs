use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use jsonschema::JSONSchema;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, PredictionErrorCode};
use crate::models::customer::CustomerProfile;
use crate::models::prediction::ChurnPrediction;
use crate::services::prompt_templates::{
    build_prediction_payload, churn_prediction_system_prompt, prediction_response_schema,
};
use crate::utils::redact::redact_sensitive_data;
use reqwest::StatusCode;
use uuid::Uuid;

/// Requests one churn assessment per call from the external model. No retry,
/// no caching, no de-duplication of concurrent calls.
pub struct PredictionService {
    provider: Option<Arc<dyn ChurnModelProvider>>,
}

#[derive(Debug, Clone)]
pub struct PredictionConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub http_timeout: StdDuration,
}

impl PredictionService {
    pub fn from_env() -> AppResult<Self> {
        Self::new(PredictionConfig::from_env())
    }

    pub fn new(config: PredictionConfig) -> AppResult<Self> {
        let provider = config
            .build_provider()?
            .map(|provider| provider as Arc<dyn ChurnModelProvider>);
        Ok(Self { provider })
    }

    /// Swap in an alternate provider implementation (used by tests).
    pub fn with_provider(provider: Arc<dyn ChurnModelProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn has_configured_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// One provider attempt. Any failure surfaces as a typed error; no
    /// partial prediction is ever returned.
    pub async fn predict(&self, profile: &CustomerProfile) -> AppResult<ChurnPrediction> {
        debug!(target: "app::prediction", "requesting churn assessment");

        let provider = self.provider.as_ref().ok_or_else(|| {
            AppError::prediction(
                PredictionErrorCode::MissingApiKey,
                "churn model API key is not configured",
            )
        })?;

        provider.predict_churn(profile).await
    }
}

impl PredictionConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("CHURNGUARD_DEEPSEEK_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let api_base_url = std::env::var("CHURNGUARD_DEEPSEEK_BASE_URL")
            .ok()
            .unwrap_or_else(|| "https://api.deepseek.com".to_string());
        let model = std::env::var("CHURNGUARD_DEEPSEEK_MODEL")
            .ok()
            .unwrap_or_else(|| "deepseek-chat".to_string());
        let http_timeout = std::env::var("CHURNGUARD_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .map(StdDuration::from_secs)
            .unwrap_or_else(|| StdDuration::from_secs(30));

        Self {
            api_key,
            api_base_url,
            model,
            http_timeout,
        }
    }

    fn build_provider(&self) -> AppResult<Option<Arc<DeepSeekProvider>>> {
        match &self.api_key {
            Some(api_key) => {
                let provider = DeepSeekProvider::try_new(self, api_key.clone())?;
                Ok(Some(Arc::new(provider)))
            }
            None => Ok(None),
        }
    }
}

/// Seam between the service and the external model so tests can exercise the
/// service against a mock endpoint or a canned implementation.
#[async_trait::async_trait]
pub trait ChurnModelProvider: Send + Sync {
    async fn predict_churn(&self, profile: &CustomerProfile) -> AppResult<ChurnPrediction>;
}

struct DeepSeekProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    response_schema: JSONSchema,
}

impl DeepSeekProvider {
    fn try_new(config: &PredictionConfig, api_key: String) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Some(StdDuration::from_secs(90)))
            .build()
            .map_err(|err| {
                AppError::other(format!("failed to build churn model HTTP client: {err}"))
            })?;

        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        let endpoint = format!("{}/v1/chat/completions", base_url);

        let schema_value = prediction_response_schema();
        let response_schema = JSONSchema::compile(&schema_value).map_err(|err| {
            AppError::other(format!("failed to compile prediction response schema: {err}"))
        })?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            model: config.model.clone(),
            response_schema,
        })
    }

    fn build_request_body(&self, payload: &JsonValue) -> JsonValue {
        let user_content = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
        json!({
            "model": self.model,
            "temperature": 0.2,
            "top_p": 0.9,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": churn_prediction_system_prompt() },
                { "role": "user", "content": user_content }
            ]
        })
    }

    fn parse_content(content: &str, correlation_id: &str) -> AppResult<JsonValue> {
        let trimmed = content.trim();
        let cleaned = if trimmed.starts_with("```") {
            let without_prefix = trimmed
                .trim_start_matches("```json")
                .trim_start_matches("```JSON")
                .trim_start_matches("```");
            let without_suffix = without_prefix.trim_end_matches("```").trim();
            without_suffix.to_string()
        } else {
            trimmed.to_string()
        };

        serde_json::from_str(&cleaned).map_err(|err| {
            AppError::prediction_with_details(
                PredictionErrorCode::InvalidResponse,
                format!("churn model response content is not JSON: {err}"),
                Some(correlation_id),
                Some(json!({ "reason": "invalid_json" })),
            )
        })
    }

    fn validate_shape(&self, content: &JsonValue, correlation_id: &str) -> AppResult<()> {
        if let Err(errors) = self.response_schema.validate(content) {
            let violations: Vec<String> = errors
                .map(|error| format!("{}: {}", error.instance_path, error))
                .collect();
            return Err(AppError::prediction_with_details(
                PredictionErrorCode::InvalidResponse,
                "churn model response violates the requested schema",
                Some(correlation_id),
                Some(json!({ "violations": violations })),
            ));
        }
        Ok(())
    }

    fn extract_tokens(body: &JsonValue) -> HashMap<String, u64> {
        let mut tokens = HashMap::new();

        if let Some(usage) = body.get("usage") {
            if let Some(value) = usage.get("prompt_tokens").and_then(|v| v.as_u64()) {
                tokens.insert("prompt".to_string(), value);
            }
            if let Some(value) = usage.get("completion_tokens").and_then(|v| v.as_u64()) {
                tokens.insert("completion".to_string(), value);
            }
            if let Some(value) = usage.get("total_tokens").and_then(|v| v.as_u64()) {
                tokens.insert("total".to_string(), value);
            }
        }

        tokens
    }

    fn map_http_error(status: StatusCode, correlation_id: &str) -> AppError {
        match status {
            StatusCode::UNAUTHORIZED => AppError::prediction_with_details(
                PredictionErrorCode::MissingApiKey,
                "churn model API key is invalid or unauthorized",
                Some(correlation_id),
                None,
            ),
            StatusCode::FORBIDDEN => AppError::prediction_with_details(
                PredictionErrorCode::Forbidden,
                "churn model API access is forbidden",
                Some(correlation_id),
                None,
            ),
            StatusCode::TOO_MANY_REQUESTS => AppError::prediction_with_details(
                PredictionErrorCode::RateLimited,
                "churn model rate limit exceeded, submit again later",
                Some(correlation_id),
                None,
            ),
            status if status.is_server_error() => AppError::prediction_with_details(
                PredictionErrorCode::ProviderUnavailable,
                format!(
                    "churn model service is unavailable (status {})",
                    status.as_u16()
                ),
                Some(correlation_id),
                None,
            ),
            StatusCode::BAD_REQUEST => AppError::prediction_with_details(
                PredictionErrorCode::InvalidRequest,
                "churn model rejected the request format",
                Some(correlation_id),
                None,
            ),
            StatusCode::NOT_FOUND => AppError::prediction_with_details(
                PredictionErrorCode::InvalidRequest,
                "churn model endpoint path is invalid",
                Some(correlation_id),
                None,
            ),
            status => AppError::prediction_with_details(
                PredictionErrorCode::Unknown,
                format!("churn model returned error status {}", status.as_u16()),
                Some(correlation_id),
                None,
            ),
        }
    }

    fn error_from_reqwest(err: reqwest::Error, correlation_id: &str) -> AppError {
        if err.is_timeout() {
            AppError::prediction_with_details(
                PredictionErrorCode::HttpTimeout,
                "churn model request timed out",
                Some(correlation_id),
                None,
            )
        } else if err.is_connect() {
            AppError::prediction_with_details(
                PredictionErrorCode::ProviderUnavailable,
                "churn model connection failed",
                Some(correlation_id),
                None,
            )
        } else if let Some(status) = err.status() {
            Self::map_http_error(status, correlation_id)
        } else {
            AppError::prediction_with_details(
                PredictionErrorCode::Unknown,
                format!("churn model request failed: {err}"),
                Some(correlation_id),
                None,
            )
        }
    }
}

#[async_trait::async_trait]
impl ChurnModelProvider for DeepSeekProvider {
    async fn predict_churn(&self, profile: &CustomerProfile) -> AppResult<ChurnPrediction> {
        let correlation_id = Uuid::new_v4().to_string();
        let payload = build_prediction_payload(profile);
        let sanitized_payload = redact_sensitive_data(&payload)
            .unwrap_or_else(|_| JsonValue::String("<redacted>".to_string()));
        let sanitized_payload_str = serde_json::to_string(&sanitized_payload)
            .unwrap_or_else(|_| "\"<redacted>\"".to_string());

        debug!(
            target: "app::prediction::deepseek",
            correlation_id = %correlation_id,
            payload = %sanitized_payload_str,
            "invoking churn model"
        );

        let request_body = self.build_request_body(&payload);
        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await;

        let resp = match response {
            Ok(resp) => resp,
            Err(err) => {
                warn!(
                    target: "app::prediction::deepseek",
                    correlation_id = %correlation_id,
                    "churn model request errored"
                );
                return Err(Self::error_from_reqwest(err, &correlation_id));
            }
        };

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis();

        if !status.is_success() {
            warn!(
                target: "app::prediction::deepseek",
                correlation_id = %correlation_id,
                status = status.as_u16(),
                latency_ms,
                "churn model returned non-success status"
            );
            return Err(Self::map_http_error(status, &correlation_id));
        }

        let body: JsonValue = resp.json().await.map_err(|err| {
            AppError::prediction_with_details(
                PredictionErrorCode::InvalidResponse,
                "failed to read churn model response body",
                Some(correlation_id.as_str()),
                Some(json!({ "reason": err.to_string() })),
            )
        })?;

        let content = body
            .pointer("/choices/0/message/content")
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                AppError::prediction_with_details(
                    PredictionErrorCode::InvalidResponse,
                    "churn model response is missing message.content",
                    Some(correlation_id.as_str()),
                    Some(json!({ "reason": "missing_message_content" })),
                )
            })?;

        let content_value = Self::parse_content(content, &correlation_id)?;
        self.validate_shape(&content_value, &correlation_id)?;

        let prediction: ChurnPrediction = serde_json::from_value(content_value).map_err(|err| {
            AppError::prediction_with_details(
                PredictionErrorCode::InvalidResponse,
                format!("failed to decode churn prediction: {err}"),
                Some(correlation_id.as_str()),
                None,
            )
        })?;

        if prediction.drivers.len() != 3 {
            warn!(
                target: "app::prediction::deepseek",
                correlation_id = %correlation_id,
                driver_count = prediction.drivers.len(),
                "churn model returned a driver count other than the requested 3"
            );
        }

        let tokens_used = Self::extract_tokens(&body);
        debug!(
            target: "app::prediction::deepseek",
            correlation_id = %correlation_id,
            latency_ms,
            tokens_used = ?tokens_used,
            risk_category = %prediction.risk_category,
            "churn model responded"
        );

        Ok(prediction)
    }
}

pub mod testing {
    use super::*;

    /// Expose HTTP error mapping for integration tests without widening the
    /// public API surface.
    pub fn map_http_error(status: StatusCode) -> AppError {
        DeepSeekProvider::map_http_error(status, "test-correlation-id")
    }

    pub async fn predict_via_http(
        base_url: &str,
        timeout: StdDuration,
        profile: &CustomerProfile,
    ) -> AppResult<ChurnPrediction> {
        let config = PredictionConfig {
            api_key: Some("test-key".to_string()),
            api_base_url: base_url.trim_end_matches('/').to_string(),
            model: "deepseek-chat".to_string(),
            http_timeout: timeout,
        };
        let provider = DeepSeekProvider::try_new(&config, "test-key".to_string())?;
        provider.predict_churn(profile).await
    }
}
