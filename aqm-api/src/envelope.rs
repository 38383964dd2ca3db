//! Uniform response envelope returned by every facade method.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    InvalidArgument,
}

/// Why a facade call could not produce data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    #[error("station {0} does not exist")]
    StationNotFound(String),
    #[error("no realtime data for station {0}")]
    NoRealtimeData(String),
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

impl ApiFailure {
    pub fn invalid(field: &'static str, err: impl std::fmt::Display) -> Self {
        ApiFailure::InvalidArgument {
            field,
            reason: err.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiFailure::StationNotFound(_) | ApiFailure::NoRealtimeData(_) => ErrorCode::NotFound,
            ApiFailure::InvalidArgument { .. } => ErrorCode::InvalidArgument,
        }
    }
}

/// Error body of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&ApiFailure> for ApiError {
    fn from(failure: &ApiFailure) -> Self {
        ApiError {
            code: failure.code(),
            message: failure.to_string(),
        }
    }
}

/// Why an envelope could not be turned back into its payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error(transparent)]
    Failed(#[from] ApiError),
    /// Only reachable for envelopes deserialized from elsewhere; `from_result`
    /// always sets one of the two fields.
    #[error("response carried neither data nor error")]
    Malformed,
}

/// `success` is true exactly when `data` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, timestamp: DateTime<Utc>) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            timestamp,
        }
    }

    pub fn failure(failure: &ApiFailure, timestamp: DateTime<Utc>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError::from(failure)),
            timestamp,
        }
    }

    pub fn from_result(result: Result<T, ApiFailure>, timestamp: DateTime<Utc>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data, timestamp),
            Err(failure) => ApiResponse::failure(&failure, timestamp),
        }
    }

    /// Unwrap the envelope into its payload or its error body.
    pub fn into_result(self) -> Result<T, EnvelopeError> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(EnvelopeError::Failed(error)),
            (None, None) => Err(EnvelopeError::Malformed),
        }
    }
}
