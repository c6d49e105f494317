// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conditional ERC-20 approvals.
//!
//! Swaps and liquidity calls revert unless the router's allowance covers the
//! amount being pulled, so every such workflow runs through
//! [`ensure_allowance`] first. The gate approves exactly the required
//! amount, never unlimited, and only submits when the current allowance
//! falls short - a re-run after a downstream failure is a no-op here.

use alloy::{
    primitives::{Address, U256},
    sol_types::SolCall,
};

use super::contracts::IERC20;
use super::error::DexError;
use super::provider::ReadProvider;
use super::tx::TxSender;

/// Whether an approval must be submitted before spending `required`.
pub fn needs_approval(current: U256, required: U256) -> bool {
    current < required
}

/// Ensure `spender` may transfer `required` of `token` from `owner`.
///
/// Reads the current allowance; when it is insufficient, submits an
/// `approve(spender, required)` and waits for it to confirm before
/// returning. Returns the approval's transaction hash when one was
/// submitted. A reverted approval surfaces as
/// [`DexError::InsufficientAllowance`] since the spend that follows
/// would be doomed.
pub async fn ensure_allowance(
    provider: &ReadProvider,
    sender: &TxSender,
    token: Address,
    owner: Address,
    spender: Address,
    required: U256,
) -> Result<Option<String>, DexError> {
    let erc20 = IERC20::new(token, provider.clone());
    let current = erc20
        .allowance(owner, spender)
        .call()
        .await
        .map_err(|e| DexError::Transport(format!("allowance read failed: {e}")))?;

    if !needs_approval(current, required) {
        tracing::debug!(
            token = %token,
            spender = %spender,
            "allowance already sufficient, skipping approval"
        );
        return Ok(None);
    }

    tracing::info!(
        token = %token,
        spender = %spender,
        current = %current,
        required = %required,
        "submitting approval"
    );

    let calldata = IERC20::approveCall {
        spender,
        amount: required,
    }
    .abi_encode();

    let receipt = sender
        .send_call(owner, token, calldata, None)
        .await
        .map_err(|e| match e {
            DexError::ChainReverted { tx_hash } => {
                DexError::InsufficientAllowance(format!("approval {tx_hash} reverted"))
            }
            other => other,
        })?;

    Ok(Some(receipt.tx_hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_approval_when_allowance_covers_required() {
        let required = U256::from(1_000_000u64);
        assert!(!needs_approval(required, required));
        assert!(!needs_approval(required + U256::from(1u64), required));
        assert!(!needs_approval(U256::MAX, required));
    }

    #[test]
    fn approval_needed_when_allowance_short() {
        let required = U256::from(1_000_000u64);
        assert!(needs_approval(U256::ZERO, required));
        assert!(needs_approval(required - U256::from(1u64), required));
    }

    #[test]
    fn zero_required_never_needs_approval() {
        assert!(!needs_approval(U256::ZERO, U256::ZERO));
    }
}
