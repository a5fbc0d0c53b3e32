use std::sync::Arc;
use std::time::Duration as StdDuration;

use churnguard::error::PredictionErrorCode;
use churnguard::models::customer::CustomerProfile;
use churnguard::models::prediction::RiskCategory;
use churnguard::services::feedback_log::FeedbackLog;
use churnguard::services::prediction_service::testing::{map_http_error, predict_via_http};
use churnguard::services::prediction_service::{PredictionConfig, PredictionService};
use churnguard::services::prompt_templates::build_prediction_payload;
use churnguard::storage::MemoryStore;
use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::json;

fn provider_body(content: &serde_json::Value) -> serde_json::Value {
    let content_string = serde_json::to_string(content).expect("valid JSON string");
    json!({
        "choices": [{
            "message": {"content": content_string}
        }],
        "usage": {
            "prompt_tokens": 64,
            "completion_tokens": 32,
            "total_tokens": 96
        }
    })
}

fn well_formed_prediction() -> serde_json::Value {
    json!({
        "probability": 0.73,
        "riskCategory": "High",
        "drivers": [
            {"feature": "Contract", "impact": 0.34, "description": "Month-to-month contracts have no switching cost"},
            {"feature": "InternetService", "impact": 0.21, "description": "Fiber optic customers churn at elevated rates"},
            {"feature": "tenure", "impact": -0.08, "description": "Twelve months of tenure anchors the relationship"}
        ],
        "explanation": "text"
    })
}

#[test]
fn prediction_payload_embeds_profile_and_expectations() {
    let profile = CustomerProfile::default();
    let payload = build_prediction_payload(&profile);
    let obj = payload.as_object().expect("payload should be an object");

    assert_eq!(
        obj.get("operation").and_then(|v| v.as_str()),
        Some("predictChurn")
    );

    let customer = obj
        .get("customer")
        .and_then(|value| value.as_object())
        .expect("customer should be serialized");
    assert_eq!(customer.len(), 19);
    assert_eq!(
        customer.get("Contract").and_then(|v| v.as_str()),
        Some("Month-to-month")
    );

    let expectations = obj
        .get("expectations")
        .and_then(|value| value.as_object())
        .expect("expectations should exist");
    assert_eq!(
        expectations.get("driverCount").and_then(|v| v.as_u64()),
        Some(3)
    );
    assert_eq!(
        expectations.get("optimizeFor").and_then(|v| v.as_str()),
        Some("recall")
    );
}

#[test]
fn http_error_mapping_covers_the_status_taxonomy() {
    let error = map_http_error(StatusCode::UNAUTHORIZED);
    assert_eq!(error.prediction_code(), Some(PredictionErrorCode::MissingApiKey));
    assert_eq!(error.prediction_correlation_id(), Some("test-correlation-id"));

    let error = map_http_error(StatusCode::FORBIDDEN);
    assert_eq!(error.prediction_code(), Some(PredictionErrorCode::Forbidden));

    let error = map_http_error(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(error.prediction_code(), Some(PredictionErrorCode::RateLimited));

    let error = map_http_error(StatusCode::from_u16(503).unwrap());
    assert_eq!(
        error.prediction_code(),
        Some(PredictionErrorCode::ProviderUnavailable)
    );
    assert!(error.to_string().contains("status 503"));

    let error = map_http_error(StatusCode::BAD_REQUEST);
    assert_eq!(error.prediction_code(), Some(PredictionErrorCode::InvalidRequest));

    let error = map_http_error(StatusCode::NOT_FOUND);
    assert_eq!(error.prediction_code(), Some(PredictionErrorCode::InvalidRequest));
}

#[tokio::test]
async fn well_formed_response_passes_through_unmodified() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(provider_body(&well_formed_prediction()));
        })
        .await;

    let profile = CustomerProfile::default();
    let prediction = predict_via_http(&server.base_url(), StdDuration::from_secs(2), &profile)
        .await
        .expect("prediction succeeds");

    assert_eq!(prediction.probability, 0.73);
    assert_eq!(prediction.risk_category, RiskCategory::High);
    assert_eq!(prediction.drivers.len(), 3);
    assert_eq!(prediction.drivers[0].feature, "Contract");
    assert_eq!(prediction.drivers[0].impact, 0.34);
    assert_eq!(prediction.drivers[2].impact, -0.08);
    assert_eq!(prediction.explanation, "text");
}

#[tokio::test]
async fn markdown_fenced_content_is_accepted() {
    let server = MockServer::start_async().await;

    let fenced = format!(
        "```json\n{}\n```",
        serde_json::to_string(&well_formed_prediction()).unwrap()
    );
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "choices": [{"message": {"content": fenced}}],
                    "usage": {}
                }));
        })
        .await;

    let profile = CustomerProfile::default();
    let prediction = predict_via_http(&server.base_url(), StdDuration::from_secs(2), &profile)
        .await
        .expect("fenced content parses");

    assert_eq!(prediction.risk_category, RiskCategory::High);
}

#[tokio::test]
async fn non_json_content_is_an_invalid_response() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "choices": [{"message": {"content": "not-json"}}],
                    "usage": {}
                }));
        })
        .await;

    let profile = CustomerProfile::default();
    let error = predict_via_http(&server.base_url(), StdDuration::from_secs(2), &profile)
        .await
        .expect_err("should fail due to invalid JSON");

    assert_eq!(error.prediction_code(), Some(PredictionErrorCode::InvalidResponse));
    assert!(error.prediction_correlation_id().is_some());
}

#[tokio::test]
async fn empty_object_reply_is_a_schema_violation_not_a_blank_prediction() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "choices": [{"message": {"content": "{}"}}],
                    "usage": {}
                }));
        })
        .await;

    let profile = CustomerProfile::default();
    let error = predict_via_http(&server.base_url(), StdDuration::from_secs(2), &profile)
        .await
        .expect_err("empty object must be rejected");

    assert_eq!(error.prediction_code(), Some(PredictionErrorCode::InvalidResponse));
    let details = error.prediction_details().expect("violation details");
    assert!(details.get("violations").is_some());
}

#[tokio::test]
async fn out_of_range_probability_is_rejected() {
    let server = MockServer::start_async().await;

    let mut content = well_formed_prediction();
    content["probability"] = json!(1.7);
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(provider_body(&content));
        })
        .await;

    let profile = CustomerProfile::default();
    let error = predict_via_http(&server.base_url(), StdDuration::from_secs(2), &profile)
        .await
        .expect_err("probability above 1 must be rejected");

    assert_eq!(error.prediction_code(), Some(PredictionErrorCode::InvalidResponse));
}

#[tokio::test]
async fn timeouts_map_to_http_timeout() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .delay(StdDuration::from_millis(250))
                .header("content-type", "application/json")
                .json_body(provider_body(&well_formed_prediction()));
        })
        .await;

    let profile = CustomerProfile::default();
    let error = predict_via_http(&server.base_url(), StdDuration::from_millis(100), &profile)
        .await
        .expect_err("should timeout");

    assert_eq!(error.prediction_code(), Some(PredictionErrorCode::HttpTimeout));
    assert!(error.prediction_correlation_id().is_some());
}

#[tokio::test]
async fn provider_failure_leaves_the_feedback_log_untouched() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500);
        })
        .await;

    let feedback_log = FeedbackLog::new(Arc::new(MemoryStore::new()));
    let profile = CustomerProfile::default();

    let error = predict_via_http(&server.base_url(), StdDuration::from_secs(2), &profile)
        .await
        .expect_err("provider failure propagates");

    assert_eq!(
        error.prediction_code(),
        Some(PredictionErrorCode::ProviderUnavailable)
    );
    assert_eq!(feedback_log.row_count().expect("count reads"), 0);
    assert!(feedback_log.export_all().expect("export reads").is_none());
}

#[tokio::test]
async fn predict_without_an_api_key_fails_before_any_request() {
    let config = PredictionConfig {
        api_key: None,
        api_base_url: "https://api.deepseek.com".to_string(),
        model: "deepseek-chat".to_string(),
        http_timeout: StdDuration::from_secs(2),
    };
    let service = PredictionService::new(config).expect("service builds without a key");
    assert!(!service.has_configured_provider());

    let error = service
        .predict(&CustomerProfile::default())
        .await
        .expect_err("missing key must fail");
    assert_eq!(error.prediction_code(), Some(PredictionErrorCode::MissingApiKey));
}
