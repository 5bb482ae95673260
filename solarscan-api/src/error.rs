//! Error types for solarscan-api
//!
//! Validation errors surface synchronously as 4xx. Everything that lands on
//! the 500 path is logged with a fresh error id; the client only sees a
//! generic message and that id.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use solarscan_common::events::PipelineStage;
use thiserror::Error;
use uuid::Uuid;

/// Lower and upper bounds on compared addresses
pub const MIN_COMPARE_ADDRESSES: usize = 2;
pub const MAX_COMPARE_ADDRESSES: usize = 5;

const GENERIC_INTERNAL_MESSAGE: &str =
    "An internal server error occurred. Please try again later.";

/// Service error type
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Address empty or not resolvable (400)
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Resolved region outside the service area (400)
    #[error("Region is outside the supported service area: {0}")]
    UnsupportedRegion(String),

    /// Compare called with too few or too many addresses (400)
    #[error(
        "Between {min} and {max} addresses are required, got {0}",
        min = MIN_COMPARE_ADDRESSES,
        max = MAX_COMPARE_ADDRESSES
    )]
    InvalidCompareCount(usize),

    /// Notification address is malformed (400)
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Unknown heatmap metric (400)
    #[error("Unsupported heatmap metric: {0}")]
    InvalidMetric(String),

    /// Malformed body, path or query (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Unknown request id (404)
    #[error("Analysis request not found: {0}")]
    NotFound(Uuid),

    /// Job queue at capacity (503)
    #[error("Analysis queue is full, please retry shortly")]
    QueueFull,

    /// A pipeline stage faulted; recorded on the request, never sent to the submitter
    #[error("Pipeline failed during {stage:?}: {message}")]
    Pipeline {
        stage: PipelineStage,
        message: String,
    },

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AnalysisError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::InvalidAddress(_)
            | AnalysisError::UnsupportedRegion(_)
            | AnalysisError::InvalidCompareCount(_)
            | AnalysisError::InvalidEmail(_)
            | AnalysisError::InvalidMetric(_)
            | AnalysisError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AnalysisError::NotFound(_) => StatusCode::NOT_FOUND,
            AnalysisError::QueueFull => StatusCode::SERVICE_UNAVAILABLE,
            AnalysisError::Pipeline { .. } | AnalysisError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidAddress(_) => "INVALID_ADDRESS",
            AnalysisError::UnsupportedRegion(_) => "UNSUPPORTED_REGION",
            AnalysisError::InvalidCompareCount(_) => "INVALID_COMPARE_COUNT",
            AnalysisError::InvalidEmail(_) => "INVALID_EMAIL",
            AnalysisError::InvalidMetric(_) => "INVALID_METRIC",
            AnalysisError::BadRequest(_) => "BAD_REQUEST",
            AnalysisError::NotFound(_) => "NOT_FOUND",
            AnalysisError::QueueFull => "QUEUE_FULL",
            AnalysisError::Pipeline { .. } | AnalysisError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<JsonRejection> for AnalysisError {
    fn from(rejection: JsonRejection) -> Self {
        AnalysisError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AnalysisError {
    fn from(rejection: QueryRejection) -> Self {
        AnalysisError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        let body = if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            let error_id = Uuid::new_v4();
            tracing::error!(error_id = %error_id, error = %self, "Request failed with internal error");
            json!({
                "error": {
                    "code": error_code,
                    "message": GENERIC_INTERNAL_MESSAGE,
                    "errorId": error_id,
                }
            })
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
            json!({
                "error": {
                    "code": error_code,
                    "message": self.to_string(),
                }
            })
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AnalysisError::UnsupportedRegion("서울특별시".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalysisError::InvalidCompareCount(6).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalysisError::NotFound(Uuid::new_v4()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AnalysisError::QueueFull.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            AnalysisError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response =
            AnalysisError::Internal("connection string postgres://secret".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        let message = json["error"]["message"].as_str().unwrap();
        assert!(!message.contains("secret"));
        let error_id = json["error"]["errorId"].as_str().unwrap();
        assert!(Uuid::parse_str(error_id).is_ok());
    }

    #[tokio::test]
    async fn test_client_error_carries_message() {
        let response = AnalysisError::InvalidCompareCount(1).into_response();
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_COMPARE_COUNT");
        assert!(json["error"]["message"].as_str().unwrap().contains("got 1"));
        assert!(json["error"].get("errorId").is_none());
    }
}
