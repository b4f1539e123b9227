//! HTTP response handling for errors

use super::types::KeyforgeError;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for KeyforgeError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            KeyforgeError::Validation(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
            KeyforgeError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            KeyforgeError::Conflict(_) => (
                actix_web::http::StatusCode::CONFLICT,
                "CONFLICT",
                self.to_string(),
            ),
            KeyforgeError::NotAMember(_) => (
                actix_web::http::StatusCode::FORBIDDEN,
                "NOT_A_MEMBER",
                self.to_string(),
            ),
            KeyforgeError::Publish(_) => (
                actix_web::http::StatusCode::BAD_GATEWAY,
                "POLICY_PUBLISH_FAILED",
                self.to_string(),
            ),
            KeyforgeError::Unauthorized(_) => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.to_string(),
            ),
            // Store internals (version tokens, raw responses) stay out of
            // the error body.
            KeyforgeError::Store(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                "Entity store operation failed".to_string(),
            ),
            KeyforgeError::Crypto(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CREDENTIAL_ERROR",
                "Credential generation failed".to_string(),
            ),
            KeyforgeError::Config(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            _ => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
