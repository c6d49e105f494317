// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy for the DEX orchestration engine.
//!
//! The kinds are deliberately distinct so callers can tell a retryable
//! transport failure from a terminal on-chain revert without parsing
//! message strings.

/// Errors that can occur while orchestrating DEX operations.
#[derive(Debug, thiserror::Error)]
pub enum DexError {
    /// RPC or network-level failure on a read, estimate, or broadcast.
    #[error("transport error: {0}")]
    Transport(String),

    /// The simulated call would revert; nothing was submitted.
    #[error("gas estimation failed: {0}")]
    GasEstimationFailed(String),

    /// The transaction was broadcast but no receipt arrived in time, or
    /// the broadcast itself was rejected by the node.
    #[error("transaction submission failed: {0}")]
    SubmissionFailed(String),

    /// The transaction was mined and reverted (receipt status false).
    #[error("transaction {tx_hash} reverted on-chain")]
    ChainReverted { tx_hash: String },

    /// The factory returned the zero address for the requested pair.
    #[error("pool does not exist for the given token pair")]
    PoolNotFound,

    /// The pool has zero reserves or zero total supply, so proportional
    /// withdrawal amounts are undefined.
    #[error("pool has no reserves or supply")]
    PoolUninitialized,

    /// An approval transaction failed, leaving the spender allowance
    /// below the required amount.
    #[error("approval failed, allowance still insufficient: {0}")]
    InsufficientAllowance(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(String),
}

impl DexError {
    /// Whether retrying the same workflow could plausibly succeed without
    /// operator intervention. Reverts and invalid inputs are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DexError::Transport(_) | DexError::SubmissionFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable() {
        assert!(DexError::Transport("connection reset".into()).is_retryable());
        assert!(DexError::SubmissionFailed("timeout".into()).is_retryable());
    }

    #[test]
    fn reverts_are_terminal() {
        let err = DexError::ChainReverted {
            tx_hash: "0xabc".into(),
        };
        assert!(!err.is_retryable());
        assert!(!DexError::PoolNotFound.is_retryable());
        assert!(!DexError::PoolUninitialized.is_retryable());
    }

    #[test]
    fn display_includes_tx_hash() {
        let err = DexError::ChainReverted {
            tx_hash: "0xdeadbeef".into(),
        };
        assert!(err.to_string().contains("0xdeadbeef"));
    }
}
