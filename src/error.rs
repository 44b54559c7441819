// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error types returned by the SDK.

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

use crate::signing::SigningError;

/// Top-level SDK error.
///
/// Every failure propagates to the caller unchanged; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
}

impl SdkError {
    /// The API error, if the server rejected the request.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            SdkError::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Classification of a non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    TooManyRequests,
    InternalServerError,
    ServiceUnavailable,
    Other,
}

/// A non-2xx response from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Server-provided error code, when the body carried one.
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Build an error from a response status and its raw body.
    ///
    /// JSON bodies contribute their `message` and `code` fields; anything else
    /// is kept verbatim as the message.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(body).ok();
        let Some(Value::Object(fields)) = parsed else {
            return Self::new(status, body);
        };

        let message = fields
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());
        let code = match fields.get("code") {
            Some(Value::String(code)) => Some(code.clone()),
            Some(Value::Number(code)) => Some(code.to_string()),
            _ => None,
        };

        Self {
            status,
            message,
            code,
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self.status {
            StatusCode::BAD_REQUEST => ApiErrorKind::BadRequest,
            StatusCode::UNAUTHORIZED => ApiErrorKind::Unauthorized,
            StatusCode::FORBIDDEN => ApiErrorKind::Forbidden,
            StatusCode::NOT_FOUND => ApiErrorKind::NotFound,
            StatusCode::TOO_MANY_REQUESTS => ApiErrorKind::TooManyRequests,
            StatusCode::INTERNAL_SERVER_ERROR => ApiErrorKind::InternalServerError,
            StatusCode::SERVICE_UNAVAILABLE => ApiErrorKind::ServiceUnavailable,
            _ => ApiErrorKind::Other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ApiErrorKind::NotFound
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)?;
        if let Some(code) = &self.code {
            write!(f, " (code {code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_response_reads_message_and_code() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Invalid source id","code":"INVALID_SOURCE"}"#,
        );
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid source id");
        assert_eq!(err.code.as_deref(), Some("INVALID_SOURCE"));
        assert_eq!(err.kind(), ApiErrorKind::BadRequest);
    }

    #[test]
    fn from_response_accepts_numeric_code() {
        let err = ApiError::from_response(StatusCode::FORBIDDEN, r#"{"message":"no","code":4031}"#);
        assert_eq!(err.code.as_deref(), Some("4031"));
        assert_eq!(err.kind(), ApiErrorKind::Forbidden);
    }

    #[test]
    fn from_response_falls_back_to_raw_body() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.message, "upstream down");
        assert_eq!(err.code, None);
        assert_eq!(err.kind(), ApiErrorKind::Other);

        let body = r#"{"detail":"missing"}"#;
        let err = ApiError::from_response(StatusCode::NOT_FOUND, body);
        assert_eq!(err.message, body);
        assert!(err.is_not_found());
    }

    #[test]
    fn display_includes_status_line() {
        let err = ApiError::new(StatusCode::BAD_REQUEST, "bad data").with_code("E1");
        assert_eq!(err.to_string(), "400 Bad Request: bad data (code E1)");

        let wrapped = SdkError::from(ApiError::new(StatusCode::UNAUTHORIZED, "expired"));
        assert_eq!(wrapped.to_string(), "401 Unauthorized: expired");
        assert_eq!(
            wrapped.as_api_error().map(ApiError::kind),
            Some(ApiErrorKind::Unauthorized)
        );
    }

    #[test]
    fn status_kinds_cover_documented_codes() {
        let kind = |code: u16| ApiError::new(StatusCode::from_u16(code).unwrap(), "").kind();
        assert_eq!(kind(429), ApiErrorKind::TooManyRequests);
        assert_eq!(kind(500), ApiErrorKind::InternalServerError);
        assert_eq!(kind(503), ApiErrorKind::ServiceUnavailable);
    }
}
