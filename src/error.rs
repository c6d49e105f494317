// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dex::DexError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

/// Map the engine taxonomy onto HTTP statuses: caller mistakes are 4xx,
/// chain-level rejections are 422, infrastructure trouble is 503.
impl From<DexError> for ApiError {
    fn from(err: DexError) -> Self {
        let message = err.to_string();
        match err {
            DexError::InvalidPrivateKey(_)
            | DexError::InvalidAddress(_)
            | DexError::InvalidAmount(_)
            | DexError::InvalidRpcUrl(_) => Self::bad_request(message),
            DexError::PoolNotFound => Self::not_found(message),
            DexError::ChainReverted { .. }
            | DexError::PoolUninitialized
            | DexError::GasEstimationFailed(_)
            | DexError::InsufficientAllowance(_) => Self::unprocessable(message),
            DexError::Transport(_) | DexError::SubmissionFailed(_) => {
                Self::service_unavailable(message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let unp = ApiError::unprocessable("oops");
        assert_eq!(unp.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(unp.message, "oops");
    }

    #[test]
    fn dex_errors_map_to_expected_statuses() {
        let cases = [
            (
                ApiError::from(DexError::InvalidPrivateKey("short".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(DexError::PoolNotFound),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(DexError::ChainReverted {
                    tx_hash: "0xabc".into(),
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::from(DexError::PoolUninitialized),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::from(DexError::Transport("refused".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::from(DexError::SubmissionFailed("timeout".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status, expected, "{}", err.message);
        }
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }
}
