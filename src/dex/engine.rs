// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Workflow orchestration for the Citea exchange.
//!
//! Each public method is one linear workflow: reads happen first, derived
//! amounts are computed locally, approvals are gated, and exactly one
//! state-changing transaction is submitted at the end (plus any approvals
//! the gate had to confirm along the way). A failed step aborts the whole
//! workflow; nothing is retried automatically.
//!
//! Confirmed approvals left behind by a failed workflow are valid on-chain
//! state, not damage: re-invoking the workflow finds the allowance already
//! sufficient and the gate skips straight to the main call.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::config::DexConfig;

use super::allowance::ensure_allowance;
use super::amounts::{
    format_amount, min_with_slippage, parse_amount, partial_withdrawal, proportional_share,
};
use super::contracts::{ICiteaFactory, ICiteaPair, ICiteaRouter, IERC20, IWrappedNative};
use super::error::DexError;
use super::provider::{connect_read, connect_signer, signer_from_hex, ReadProvider};
use super::tx::TxSender;

/// Decimal precision of the native coin (SFI).
const NATIVE_DECIMALS: u8 = 18;

/// Swap transactions expire five minutes after construction.
const SWAP_DEADLINE_SECS: u64 = 300;

/// Formatted balances for one account across the token suite.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BalanceSummary {
    /// Account address the balances belong to
    pub address: String,
    /// Native SFI balance
    pub native: String,
    /// Wrapped token (wSFI) balance
    pub wrapped: String,
    /// Stable token (USDC) balance
    pub stable: String,
    /// Pool token balance
    pub pool: String,
}

/// Result of a workflow that submitted a transaction.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TxOutcome {
    /// Always true: a reverted or failed transaction surfaces as an error
    pub success: bool,
    /// Hash of the confirmed transaction
    pub tx_hash: String,
}

impl TxOutcome {
    fn confirmed(tx_hash: String) -> Self {
        Self {
            success: true,
            tx_hash,
        }
    }
}

/// The transaction orchestration engine.
///
/// Holds the shared read provider and the per-account submission locks.
/// Accounts are derived per call from the supplied private key; the engine
/// itself keeps no key material.
pub struct DexEngine {
    config: DexConfig,
    provider: ReadProvider,
    // Serializes nonce acquisition and submission per account. Two
    // concurrent workflows for the same key would otherwise race the
    // pending-nonce read and one of them would be rejected or stuck.
    submission_locks: Mutex<HashMap<Address, Arc<Mutex<()>>>>,
}

impl DexEngine {
    pub fn new(config: DexConfig) -> Result<Self, DexError> {
        let provider = connect_read(&config.rpc_url)?;
        Ok(Self {
            config,
            provider,
            submission_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &DexConfig {
        &self.config
    }

    /// Query native, wrapped, stable, and pool-token balances.
    ///
    /// The four reads are independent and run concurrently.
    pub async fn get_balance(&self, private_key: &str) -> Result<BalanceSummary, DexError> {
        let signer = signer_from_hex(private_key)?;
        let address = signer.address();

        let wrapped = IERC20::new(self.config.wrapped.address, self.provider.clone());
        let stable = IERC20::new(self.config.stable.address, self.provider.clone());
        let pool = IERC20::new(self.config.pool.address, self.provider.clone());

        let (native_bal, wrapped_bal, stable_bal, pool_bal) = tokio::try_join!(
            async {
                self.provider
                    .get_balance(address)
                    .await
                    .map_err(|e| DexError::Transport(format!("native balance read failed: {e}")))
            },
            async {
                wrapped
                    .balanceOf(address)
                    .call()
                    .await
                    .map_err(|e| DexError::Transport(format!("wrapped balance read failed: {e}")))
            },
            async {
                stable
                    .balanceOf(address)
                    .call()
                    .await
                    .map_err(|e| DexError::Transport(format!("stable balance read failed: {e}")))
            },
            async {
                pool.balanceOf(address)
                    .call()
                    .await
                    .map_err(|e| DexError::Transport(format!("pool balance read failed: {e}")))
            },
        )?;

        Ok(BalanceSummary {
            address: address.to_string(),
            native: format_amount(native_bal, NATIVE_DECIMALS),
            wrapped: format_amount(wrapped_bal, self.config.wrapped.decimals),
            stable: format_amount(stable_bal, self.config.stable.decimals),
            pool: format_amount(pool_bal, self.config.pool.decimals),
        })
    }

    /// Wrap the configured amount of native SFI into wSFI.
    ///
    /// A value-bearing `deposit()` on the wrapped token; no allowance is
    /// involved since nothing is transferred from an ERC-20 balance.
    pub async fn wrap_native(&self, private_key: &str) -> Result<TxOutcome, DexError> {
        let signer = signer_from_hex(private_key)?;
        let address = signer.address();
        let amount = parse_amount(&self.config.trade_amount, self.config.wrapped.decimals)?;

        let lock = self.submission_lock(address).await;
        let _guard = lock.lock().await;

        let sender = self.sender_for(signer)?;
        let calldata = IWrappedNative::depositCall {}.abi_encode();
        let receipt = sender
            .send_call(address, self.config.wrapped.address, calldata, Some(amount))
            .await?;

        tracing::info!(
            account = %address,
            amount = %self.config.trade_amount,
            tx_hash = %receipt.tx_hash,
            "wrapped native SFI"
        );
        Ok(TxOutcome::confirmed(receipt.tx_hash))
    }

    /// Swap the configured amount of wSFI for USDC.
    ///
    /// `min_out` is an optional floor in USDC display units; when absent the
    /// swap runs unprotected (minimum out of zero).
    pub async fn swap(
        &self,
        private_key: &str,
        min_out: Option<&str>,
    ) -> Result<TxOutcome, DexError> {
        let signer = signer_from_hex(private_key)?;
        let address = signer.address();
        let amount_in = parse_amount(&self.config.trade_amount, self.config.wrapped.decimals)?;
        let min_out = match min_out {
            Some(raw) => parse_amount(raw, self.config.stable.decimals)?,
            None => U256::ZERO,
        };

        let lock = self.submission_lock(address).await;
        let _guard = lock.lock().await;

        let sender = self.sender_for(signer)?;
        ensure_allowance(
            &self.provider,
            &sender,
            self.config.wrapped.address,
            address,
            self.config.router,
            amount_in,
        )
        .await?;

        let deadline = U256::from(Utc::now().timestamp() as u64 + SWAP_DEADLINE_SECS);
        let calldata = ICiteaRouter::swapExactTokensForTokensSupportingFeeOnTransferTokensCall {
            amountIn: amount_in,
            amountOutMin: min_out,
            path: vec![self.config.wrapped.address, self.config.stable.address],
            to: address,
            deadline,
        }
        .abi_encode();

        let receipt = sender
            .send_call(address, self.config.router, calldata, None)
            .await?;

        tracing::info!(
            account = %address,
            amount_in = %self.config.trade_amount,
            min_out = %min_out,
            tx_hash = %receipt.tx_hash,
            "swapped wSFI for USDC"
        );
        Ok(TxOutcome::confirmed(receipt.tx_hash))
    }

    /// Deposit the configured amount of wSFI plus the quoted USDC
    /// counterpart into the pool.
    pub async fn add_liquidity(&self, private_key: &str) -> Result<TxOutcome, DexError> {
        let signer = signer_from_hex(private_key)?;
        let address = signer.address();
        let wrapped_amount = parse_amount(&self.config.trade_amount, self.config.wrapped.decimals)?;

        // Fail before any approval if the pool does not exist; the quote
        // below would otherwise surface it as an opaque revert.
        self.resolve_pair().await?;

        // Quote the stable side at the current pool price.
        let router = ICiteaRouter::new(self.config.router, self.provider.clone());
        let amounts = router
            .getAmountsOut(
                wrapped_amount,
                vec![self.config.wrapped.address, self.config.stable.address],
            )
            .call()
            .await
            .map_err(|e| DexError::Transport(format!("liquidity quote failed: {e}")))?;
        let stable_amount = *amounts
            .last()
            .ok_or_else(|| DexError::Transport("empty quote from getAmountsOut".into()))?;

        let lock = self.submission_lock(address).await;
        let _guard = lock.lock().await;

        let sender = self.sender_for(signer)?;

        // Two gates, each confirming its own approval before the next step.
        ensure_allowance(
            &self.provider,
            &sender,
            self.config.wrapped.address,
            address,
            self.config.router,
            wrapped_amount,
        )
        .await?;
        ensure_allowance(
            &self.provider,
            &sender,
            self.config.stable.address,
            address,
            self.config.router,
            stable_amount,
        )
        .await?;

        // Each minimum derives from its own side's desired amount.
        let min_wrapped = min_with_slippage(wrapped_amount, self.config.slippage_bps);
        let min_stable = min_with_slippage(stable_amount, self.config.slippage_bps);

        let calldata = ICiteaRouter::addLiquidityCall {
            tokenA: self.config.wrapped.address,
            tokenB: self.config.stable.address,
            amountADesired: wrapped_amount,
            amountBDesired: stable_amount,
            amountAMin: min_wrapped,
            amountBMin: min_stable,
            to: address,
            deadline: U256::MAX,
        }
        .abi_encode();

        let receipt = sender
            .send_call(address, self.config.router, calldata, None)
            .await?;

        tracing::info!(
            account = %address,
            wrapped_amount = %wrapped_amount,
            stable_amount = %stable_amount,
            tx_hash = %receipt.tx_hash,
            "added liquidity"
        );
        Ok(TxOutcome::confirmed(receipt.tx_hash))
    }

    /// Withdraw 25% of the held pool-token balance from the pool.
    pub async fn remove_liquidity(&self, private_key: &str) -> Result<TxOutcome, DexError> {
        let signer = signer_from_hex(private_key)?;
        let address = signer.address();

        let pool_token = IERC20::new(self.config.pool.address, self.provider.clone());
        let balance = pool_token
            .balanceOf(address)
            .call()
            .await
            .map_err(|e| DexError::Transport(format!("pool balance read failed: {e}")))?;

        let liquidity = partial_withdrawal(balance);
        if liquidity.is_zero() {
            return Err(DexError::InvalidAmount(
                "account holds no pool tokens to withdraw".into(),
            ));
        }

        let pair_address = self.resolve_pair().await?;
        let pair = ICiteaPair::new(pair_address, self.provider.clone());

        let reserves = pair
            .getReserves()
            .call()
            .await
            .map_err(|e| DexError::Transport(format!("reserve read failed: {e}")))?;
        let token0 = pair
            .token0()
            .call()
            .await
            .map_err(|e| DexError::Transport(format!("token0 read failed: {e}")))?;
        let total_supply = pool_token
            .totalSupply()
            .call()
            .await
            .map_err(|e| DexError::Transport(format!("total supply read failed: {e}")))?;

        if total_supply.is_zero() || reserves.reserve0.is_zero() || reserves.reserve1.is_zero() {
            return Err(DexError::PoolUninitialized);
        }

        let (reserve_wrapped, reserve_stable) = orient_reserves(
            token0,
            self.config.wrapped.address,
            reserves.reserve0,
            reserves.reserve1,
        );

        let expected_wrapped = proportional_share(liquidity, reserve_wrapped, total_supply)?;
        let expected_stable = proportional_share(liquidity, reserve_stable, total_supply)?;
        let min_wrapped = min_with_slippage(expected_wrapped, self.config.slippage_bps);
        let min_stable = min_with_slippage(expected_stable, self.config.slippage_bps);

        let lock = self.submission_lock(address).await;
        let _guard = lock.lock().await;

        let sender = self.sender_for(signer)?;
        ensure_allowance(
            &self.provider,
            &sender,
            self.config.pool.address,
            address,
            self.config.router,
            liquidity,
        )
        .await?;

        let calldata = ICiteaRouter::removeLiquidityCall {
            tokenA: self.config.wrapped.address,
            tokenB: self.config.stable.address,
            liquidity,
            amountAMin: min_wrapped,
            amountBMin: min_stable,
            to: address,
            deadline: U256::MAX,
        }
        .abi_encode();

        let receipt = sender
            .send_call(address, self.config.router, calldata, None)
            .await?;

        tracing::info!(
            account = %address,
            liquidity = %liquidity,
            tx_hash = %receipt.tx_hash,
            "removed liquidity"
        );
        Ok(TxOutcome::confirmed(receipt.tx_hash))
    }

    /// Current chain head, used by the readiness probe.
    pub async fn block_number(&self) -> Result<u64, DexError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| DexError::Transport(e.to_string()))
    }

    /// Resolve the wSFI/USDC pair through the factory.
    async fn resolve_pair(&self) -> Result<Address, DexError> {
        let factory_address = match self.config.factory {
            Some(address) => address,
            None => {
                let router = ICiteaRouter::new(self.config.router, self.provider.clone());
                router
                    .factory()
                    .call()
                    .await
                    .map_err(|e| DexError::Transport(format!("factory lookup failed: {e}")))?
            }
        };

        let factory = ICiteaFactory::new(factory_address, self.provider.clone());
        let pair = factory
            .getPair(self.config.wrapped.address, self.config.stable.address)
            .call()
            .await
            .map_err(|e| DexError::Transport(format!("pair lookup failed: {e}")))?;

        ensure_pair_exists(pair)
    }

    fn sender_for(&self, signer: PrivateKeySigner) -> Result<TxSender, DexError> {
        let provider = connect_signer(&self.config.rpc_url, signer)?;
        Ok(TxSender::new(
            provider,
            self.config.rpc_timeout,
            self.config.receipt_timeout,
        ))
    }

    async fn submission_lock(&self, account: Address) -> Arc<Mutex<()>> {
        let mut locks = self.submission_locks.lock().await;
        locks
            .entry(account)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// A zero pair address means the factory has no pool for the tokens.
fn ensure_pair_exists(pair: Address) -> Result<Address, DexError> {
    if pair == Address::ZERO {
        Err(DexError::PoolNotFound)
    } else {
        Ok(pair)
    }
}

/// Order a pair's reserves as (wrapped, stable). Pairs store reserves in
/// token0/token1 order, which is sorted by address, not by our roles.
fn orient_reserves(
    token0: Address,
    wrapped: Address,
    reserve0: U256,
    reserve1: U256,
) -> (U256, U256) {
    if token0 == wrapped {
        (reserve0, reserve1)
    } else {
        (reserve1, reserve0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn zero_pair_address_is_pool_not_found() {
        assert!(matches!(
            ensure_pair_exists(Address::ZERO),
            Err(DexError::PoolNotFound)
        ));

        let real = Address::from_str("0xB54284F014DaB8dBdFC77097caa6af35e8233fF6").unwrap();
        assert_eq!(ensure_pair_exists(real).unwrap(), real);
    }

    #[test]
    fn reserves_follow_token0_ordering() {
        let wrapped = Address::from_str("0x6dC404EFd04B880B0Ab5a26eF461b63A12E3888D").unwrap();
        let stable = Address::from_str("0xD2ED81BE83B33218737Ca188EB9AC28b79C6A0F3").unwrap();
        let r_wrapped = U256::from(5_000u64);
        let r_stable = U256::from(9_000u64);

        assert_eq!(
            orient_reserves(wrapped, wrapped, r_wrapped, r_stable),
            (r_wrapped, r_stable)
        );
        // token0 is the stable token: reserves arrive flipped
        assert_eq!(
            orient_reserves(stable, wrapped, r_stable, r_wrapped),
            (r_wrapped, r_stable)
        );
    }

    #[test]
    fn tx_outcome_reports_success() {
        let outcome = TxOutcome::confirmed("0xabc".into());
        assert!(outcome.success);
        assert_eq!(outcome.tx_hash, "0xabc");
    }
}
