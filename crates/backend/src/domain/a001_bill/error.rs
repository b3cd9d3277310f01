use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unsupported receipt format: {0}")]
    UnsupportedReceipt(String),

    #[error("Bill not found")]
    NotFound,

    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BillError {
    pub fn status(&self) -> StatusCode {
        match self {
            BillError::Validation(_) | BillError::UnsupportedReceipt(_) => StatusCode::BAD_REQUEST,
            BillError::NotFound => StatusCode::NOT_FOUND,
            BillError::Forbidden(_) => StatusCode::FORBIDDEN,
            BillError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BillError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            BillError::Internal(e) => {
                tracing::error!("Bill request failed: {:#}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(BillError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            BillError::UnsupportedReceipt("pdf".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BillError::Forbidden("not the owner").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            BillError::Internal(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
