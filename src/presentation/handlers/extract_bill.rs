use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::services::ExtractionOutcome;
use crate::domain::{BillData, TokenUsage, redacted_url};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ExtractBillRequest {
    pub document: String,
}

#[derive(Serialize)]
pub struct ExtractBillResponse {
    pub is_success: bool,
    pub token_usage: TokenUsage,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractBillResponse {
    pub fn failure(error: impl Into<String>, token_usage: TokenUsage) -> Self {
        Self {
            is_success: false,
            token_usage,
            data: BillData::empty_value(),
            error: Some(error.into()),
        }
    }
}

impl From<ExtractionOutcome> for ExtractBillResponse {
    fn from(outcome: ExtractionOutcome) -> Self {
        match outcome.parse_error {
            None => Self {
                is_success: true,
                token_usage: outcome.usage,
                data: outcome.data,
                error: None,
            },
            Some(parse_error) => Self::failure(parse_error, outcome.usage),
        }
    }
}

/// Every pipeline failure is reported in the body; the status is always 200.
#[tracing::instrument(
    skip(state, request),
    fields(document = %redacted_url(&request.document))
)]
pub async fn extract_bill_handler(
    State(state): State<AppState>,
    Json(request): Json<ExtractBillRequest>,
) -> impl IntoResponse {
    let response = match state.extraction_service.extract(&request.document).await {
        Ok(outcome) => {
            let model = outcome.model.clone();
            let response = ExtractBillResponse::from(outcome);
            if response.is_success {
                tracing::info!(model = %model, "Bill extraction succeeded");
            } else {
                tracing::warn!(model = %model, "Bill extraction returned unparseable output");
            }
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "Bill extraction failed");
            ExtractBillResponse::failure(e.to_string(), TokenUsage::default())
        }
    };

    (StatusCode::OK, Json(response))
}
