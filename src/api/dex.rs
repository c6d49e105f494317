// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DEX workflow endpoints.
//!
//! Each endpoint drives exactly one engine workflow. The private key
//! arrives in the request body, is used to derive the account for that
//! single call, and is never stored.

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    dex::{BalanceSummary, TxOutcome},
    error::ApiError,
    state::AppState,
};

// =============================================================================
// Request Types
// =============================================================================

/// Request carrying the account key for a workflow.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OperationRequest {
    /// Hex-encoded private key (64 hex chars, 0x prefix optional)
    pub private_key: String,
}

/// Swap request with an optional output floor.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SwapRequest {
    /// Hex-encoded private key (64 hex chars, 0x prefix optional)
    pub private_key: String,
    /// Minimum acceptable USDC output in display units (e.g., "1.95").
    /// Omitted means no slippage floor.
    #[serde(default)]
    pub min_out: Option<String>,
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate a hex private key before it reaches the signer.
fn validate_private_key(key: &str) -> Result<(), ApiError> {
    let hex = key.strip_prefix("0x").unwrap_or(key);
    if hex.len() != 64 {
        return Err(ApiError::bad_request(
            "Private key must be 64 hex characters",
        ));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ApiError::bad_request(
            "Private key must contain only hex characters",
        ));
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Query all balances for the account derived from the supplied key.
///
/// Returns native SFI, wSFI, USDC, and pool-token balances.
#[utoipa::path(
    post,
    path = "/v1/dex/balance",
    tag = "DEX",
    request_body = OperationRequest,
    responses(
        (status = 200, description = "Balances retrieved", body = BalanceSummary),
        (status = 400, description = "Invalid private key"),
        (status = 503, description = "Blockchain network unavailable")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Json(request): Json<OperationRequest>,
) -> Result<Json<BalanceSummary>, ApiError> {
    validate_private_key(&request.private_key)?;
    let summary = state.engine.get_balance(&request.private_key).await?;
    Ok(Json(summary))
}

/// Wrap the configured amount of native SFI into wSFI.
#[utoipa::path(
    post,
    path = "/v1/dex/wrap",
    tag = "DEX",
    request_body = OperationRequest,
    responses(
        (status = 200, description = "Wrap confirmed", body = TxOutcome),
        (status = 400, description = "Invalid private key"),
        (status = 422, description = "Transaction reverted on-chain"),
        (status = 503, description = "Blockchain network unavailable")
    )
)]
pub async fn wrap_native(
    State(state): State<AppState>,
    Json(request): Json<OperationRequest>,
) -> Result<Json<TxOutcome>, ApiError> {
    validate_private_key(&request.private_key)?;
    let outcome = state.engine.wrap_native(&request.private_key).await?;
    Ok(Json(outcome))
}

/// Swap the configured amount of wSFI for USDC.
#[utoipa::path(
    post,
    path = "/v1/dex/swap",
    tag = "DEX",
    request_body = SwapRequest,
    responses(
        (status = 200, description = "Swap confirmed", body = TxOutcome),
        (status = 400, description = "Invalid private key or amount"),
        (status = 422, description = "Transaction reverted on-chain"),
        (status = 503, description = "Blockchain network unavailable")
    )
)]
pub async fn swap(
    State(state): State<AppState>,
    Json(request): Json<SwapRequest>,
) -> Result<Json<TxOutcome>, ApiError> {
    validate_private_key(&request.private_key)?;
    let outcome = state
        .engine
        .swap(&request.private_key, request.min_out.as_deref())
        .await?;
    Ok(Json(outcome))
}

/// Add wSFI/USDC liquidity at the current pool price.
#[utoipa::path(
    post,
    path = "/v1/dex/liquidity/add",
    tag = "DEX",
    request_body = OperationRequest,
    responses(
        (status = 200, description = "Liquidity added", body = TxOutcome),
        (status = 400, description = "Invalid private key"),
        (status = 404, description = "Pool does not exist"),
        (status = 422, description = "Transaction reverted on-chain"),
        (status = 503, description = "Blockchain network unavailable")
    )
)]
pub async fn add_liquidity(
    State(state): State<AppState>,
    Json(request): Json<OperationRequest>,
) -> Result<Json<TxOutcome>, ApiError> {
    validate_private_key(&request.private_key)?;
    let outcome = state.engine.add_liquidity(&request.private_key).await?;
    Ok(Json(outcome))
}

/// Withdraw 25% of the held pool-token balance.
#[utoipa::path(
    post,
    path = "/v1/dex/liquidity/remove",
    tag = "DEX",
    request_body = OperationRequest,
    responses(
        (status = 200, description = "Liquidity removed", body = TxOutcome),
        (status = 400, description = "Invalid private key"),
        (status = 404, description = "Pool does not exist"),
        (status = 422, description = "Transaction reverted or pool uninitialized"),
        (status = 503, description = "Blockchain network unavailable")
    )
)]
pub async fn remove_liquidity(
    State(state): State<AppState>,
    Json(request): Json<OperationRequest>,
) -> Result<Json<TxOutcome>, ApiError> {
    validate_private_key(&request.private_key)?;
    let outcome = state.engine.remove_liquidity(&request.private_key).await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn valid_keys_pass_validation() {
        assert!(validate_private_key(TEST_KEY).is_ok());
        assert!(validate_private_key(&format!("0x{TEST_KEY}")).is_ok());
    }

    #[test]
    fn invalid_keys_fail_validation() {
        assert!(validate_private_key("").is_err());
        assert!(validate_private_key("abc123").is_err());
        // right length, bad characters
        let bad: String = "g".repeat(64);
        assert!(validate_private_key(&bad).is_err());
    }

    #[test]
    fn swap_request_min_out_defaults_to_none() {
        let request: SwapRequest =
            serde_json::from_str(&format!(r#"{{"private_key":"{TEST_KEY}"}}"#)).unwrap();
        assert!(request.min_out.is_none());

        let request: SwapRequest = serde_json::from_str(&format!(
            r#"{{"private_key":"{TEST_KEY}","min_out":"1.95"}}"#
        ))
        .unwrap();
        assert_eq!(request.min_out.as_deref(), Some("1.95"));
    }
}
