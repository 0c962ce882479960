// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::prices::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    MetalNotFound(String),
    SourceUnavailable(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ApiError::MetalNotFound(_) => ErrorResponse {
                error: "Metal not found".to_string(),
                detail: None,
            },
            ApiError::SourceUnavailable(reason) => ErrorResponse {
                error: "Price source unavailable".to_string(),
                detail: Some(reason.clone()),
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MetalNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound { metal } => ApiError::MetalNotFound(metal),
            ServiceError::SourceUnavailable { reason } => ApiError::SourceUnavailable(reason),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MetalNotFound(metal) => write!(f, "Metal '{}' not found", metal),
            ApiError::SourceUnavailable(reason) => write!(f, "Price source unavailable: {}", reason),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
