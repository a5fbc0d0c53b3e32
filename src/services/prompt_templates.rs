use serde_json::{json, Value as JsonValue};

use crate::models::customer::CustomerProfile;

/// System prompt guiding the model when assessing churn risk.
pub fn churn_prediction_system_prompt() -> &'static str {
    r#"You are ChurnGuard's churn risk analyst. You receive one telco customer record as JSON,
using the Telco Churn dataset column conventions, and must assess that customer's churn risk.
Always respond with valid UTF-8 JSON. Do not wrap the response in markdown code blocks.
The schema is:
{
  "probability": number (0-1),
  "riskCategory": "Low" | "Medium" | "High",
  "drivers": [
    {
      "feature": string,
      "impact": number,
      "description": string
    }
  ],
  "explanation": string summary
}

Guidelines for 'drivers' (SHAP-style explanations):
- Return exactly the top 3 most influential features.
- 'impact' is a value between -0.5 and 0.5 representing the feature's contribution to the
  prediction deviation from the baseline.
- Positive impact means the feature increases churn risk (e.g. Fiber optic service,
  Month-to-month contract).
- Negative impact means the feature decreases churn risk (e.g. long tenure, online security,
  tech support).
- Optimize for the 'recall' metric (identifying potential churners).

Example response:
{
    "probability": 0.78,
    "riskCategory": "High",
    "drivers": [
        {
            "feature": "Contract",
            "impact": 0.34,
            "description": "Month-to-month contracts have no switching cost."
        },
        {
            "feature": "InternetService",
            "impact": 0.21,
            "description": "Fiber optic customers churn at elevated rates."
        },
        {
            "feature": "tenure",
            "impact": -0.08,
            "description": "Twelve months of tenure slightly anchors the relationship."
        }
    ],
    "explanation": "Flexible contract and fiber service outweigh the moderate tenure; treat as a retention priority."
}
"#
}

/// Build the user payload for a churn prediction request.
pub fn build_prediction_payload(profile: &CustomerProfile) -> JsonValue {
    json!({
        "operation": "predictChurn",
        "customer": profile,
        "expectations": {
            "driverCount": 3,
            "impactRange": [-0.5, 0.5],
            "optimizeFor": "recall"
        }
    })
}

/// JSON Schema the provider reply must satisfy before it is accepted.
pub fn prediction_response_schema() -> JsonValue {
    json!({
        "type": "object",
        "required": ["probability", "riskCategory", "drivers", "explanation"],
        "properties": {
            "probability": {"type": "number", "minimum": 0.0, "maximum": 1.0},
            "riskCategory": {"type": "string", "enum": ["Low", "Medium", "High"]},
            "drivers": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["feature", "impact", "description"],
                    "properties": {
                        "feature": {"type": "string"},
                        "impact": {"type": "number"},
                        "description": {"type": "string"}
                    }
                }
            },
            "explanation": {"type": "string"}
        }
    })
}
