use locations_core::contract::ValidationError;
use thiserror::Error;

use super::response::{error_response, ApiGatewayResponse};
use crate::adapters::location_store::StoreError;

pub const NOT_FOUND_MESSAGE: &str = "Location not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("location '{id}' not found")]
    NotFound { id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LocationError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Store(_) => 500,
        }
    }

    /// Store details stay in the logs; callers only see a generic message.
    pub fn into_response(self) -> ApiGatewayResponse {
        let status_code = self.status_code();
        match &self {
            Self::Validation(error) => {
                tracing::info!(status_code, reason = %error, "Rejected request");
                error_response(status_code, error.message())
            }
            Self::NotFound { id } => {
                tracing::info!(status_code, location_id = %id, "Location not found");
                error_response(status_code, NOT_FOUND_MESSAGE)
            }
            Self::Store(error) => {
                tracing::error!(status_code, error = %error, "Location store request failed");
                error_response(status_code, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_kind_to_its_status_and_body() {
        let cases = [
            (
                LocationError::from(ValidationError::new("Missing required fields")),
                400,
                r#"{"error":"Missing required fields"}"#,
            ),
            (
                LocationError::not_found("abc"),
                404,
                r#"{"error":"Location not found"}"#,
            ),
            (
                LocationError::from(StoreError::request("Scan", "AccessDeniedException: arn:...")),
                500,
                r#"{"error":"Internal server error"}"#,
            ),
        ];

        for (error, status_code, body) in cases {
            let response = error.into_response();
            assert_eq!(response.status_code, status_code);
            assert_eq!(response.body, body);
        }
    }
}
