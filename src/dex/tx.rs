// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction building and submission.
//!
//! Every state-changing call goes through the same two steps: [`TxSender::build`]
//! simulates the call for a gas limit and pins price and nonce, then
//! [`TxSender::submit`] signs locally, broadcasts, and blocks until the
//! receipt arrives or the wait times out. A reverted receipt and a failed
//! broadcast are distinct error kinds; callers rely on that distinction.

use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, U256},
    providers::Provider,
    rpc::types::TransactionRequest,
};

use super::error::DexError;
use super::provider::SignerProvider;

/// Outcome of a confirmed (non-reverted) transaction.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    /// Transaction hash
    pub tx_hash: String,
    /// Block number where the transaction was included
    pub block_number: u64,
    /// Gas actually used
    pub gas_used: u64,
}

/// Builds and submits transactions through a per-request signing provider.
pub struct TxSender {
    provider: SignerProvider,
    rpc_timeout: Duration,
    receipt_timeout: Duration,
}

impl TxSender {
    pub fn new(provider: SignerProvider, rpc_timeout: Duration, receipt_timeout: Duration) -> Self {
        Self {
            provider,
            rpc_timeout,
            receipt_timeout,
        }
    }

    /// Assemble a fully-specified transaction for a contract call.
    ///
    /// Simulates the call to size the gas limit (a simulation failure means
    /// the call would revert, and nothing is submitted), then pins the
    /// current gas price and the account's pending nonce so concurrent
    /// submissions from other accounts cannot shift them underneath us.
    pub async fn build(
        &self,
        from: Address,
        to: Address,
        calldata: Vec<u8>,
        value: Option<U256>,
    ) -> Result<TransactionRequest, DexError> {
        let mut tx = TransactionRequest::default()
            .from(from)
            .to(to)
            .input(calldata.into());

        if let Some(value) = value {
            tx = tx.value(value);
        }

        let gas_limit = tokio::time::timeout(self.rpc_timeout, self.provider.estimate_gas(tx.clone()))
            .await
            .map_err(|_| DexError::Transport("gas estimation timed out".into()))?
            .map_err(|e| DexError::GasEstimationFailed(e.to_string()))?;

        let gas_price = tokio::time::timeout(self.rpc_timeout, self.provider.get_gas_price())
            .await
            .map_err(|_| DexError::Transport("gas price fetch timed out".into()))?
            .map_err(|e| DexError::Transport(format!("failed to fetch gas price: {e}")))?;

        let nonce = tokio::time::timeout(
            self.rpc_timeout,
            self.provider.get_transaction_count(from).pending(),
        )
        .await
        .map_err(|_| DexError::Transport("nonce fetch timed out".into()))?
        .map_err(|e| DexError::Transport(format!("failed to fetch pending nonce: {e}")))?;

        Ok(tx
            .with_gas_limit(gas_limit)
            .with_gas_price(gas_price)
            .with_nonce(nonce))
    }

    /// Sign, broadcast, and wait for the receipt.
    ///
    /// The key never leaves this process: signing happens in the provider's
    /// wallet layer before the raw transaction goes out.
    pub async fn submit(&self, tx: TransactionRequest) -> Result<SubmitReceipt, DexError> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| DexError::SubmissionFailed(format!("broadcast failed: {e}")))?;

        let tx_hash = format!("{:?}", pending.tx_hash());
        tracing::debug!(tx_hash = %tx_hash, "transaction broadcast, awaiting receipt");

        let receipt = pending
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(|e| {
                DexError::SubmissionFailed(format!("no receipt for {tx_hash}: {e}"))
            })?;

        if !receipt.status() {
            return Err(DexError::ChainReverted { tx_hash });
        }

        Ok(SubmitReceipt {
            tx_hash,
            block_number: receipt.block_number.unwrap_or(0),
            gas_used: receipt.gas_used as u64,
        })
    }

    /// Build and submit in one step; the common path for every workflow.
    pub async fn send_call(
        &self,
        from: Address,
        to: Address,
        calldata: Vec<u8>,
        value: Option<U256>,
    ) -> Result<SubmitReceipt, DexError> {
        let tx = self.build(from, to, calldata, value).await?;
        self.submit(tx).await
    }
}
