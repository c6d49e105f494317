// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! configuration structures loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RPC_URL` | EVM JSON-RPC endpoint | SingularityFinance testnet RPC |
//! | `ROUTER_ADDRESS` | Citea router contract | testnet deployment |
//! | `FACTORY_ADDRESS` | Citea pool factory contract | resolved from the router when unset |
//! | `WRAPPED_TOKEN_ADDRESS` | Wrapped native token (wSFI, 18 decimals) | testnet deployment |
//! | `STABLE_TOKEN_ADDRESS` | Stable token (USDC, 6 decimals) | testnet deployment |
//! | `POOL_TOKEN_ADDRESS` | wSFI/USDC pair token (18 decimals) | testnet deployment |
//! | `TRADE_AMOUNT` | Default trade size in display units | `0.1` |
//! | `SLIPPAGE_BPS` | Slippage tolerance in basis points | `500` (5%) |
//! | `RPC_TIMEOUT_SECS` | Timeout for individual RPC calls | `30` |
//! | `RECEIPT_TIMEOUT_SECS` | Timeout for receipt waits | `120` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;

pub const RPC_URL_ENV: &str = "RPC_URL";
pub const ROUTER_ADDRESS_ENV: &str = "ROUTER_ADDRESS";
pub const FACTORY_ADDRESS_ENV: &str = "FACTORY_ADDRESS";
pub const WRAPPED_TOKEN_ADDRESS_ENV: &str = "WRAPPED_TOKEN_ADDRESS";
pub const STABLE_TOKEN_ADDRESS_ENV: &str = "STABLE_TOKEN_ADDRESS";
pub const POOL_TOKEN_ADDRESS_ENV: &str = "POOL_TOKEN_ADDRESS";
pub const TRADE_AMOUNT_ENV: &str = "TRADE_AMOUNT";
pub const SLIPPAGE_BPS_ENV: &str = "SLIPPAGE_BPS";
pub const RPC_TIMEOUT_ENV: &str = "RPC_TIMEOUT_SECS";
pub const RECEIPT_TIMEOUT_ENV: &str = "RECEIPT_TIMEOUT_SECS";

/// SingularityFinance testnet defaults. Every value can be overridden
/// through the environment for other deployments of the same contract
/// suite.
pub const DEFAULT_RPC_URL: &str = "https://rpc-testnet.singularityfinance.ai";
pub const DEFAULT_ROUTER_ADDRESS: &str = "0xFEccff0ecf1cAa1669A71C5E00b51B48E4CBc6A1";
pub const DEFAULT_WRAPPED_TOKEN_ADDRESS: &str = "0x6dC404EFd04B880B0Ab5a26eF461b63A12E3888D";
pub const DEFAULT_STABLE_TOKEN_ADDRESS: &str = "0xD2ED81BE83B33218737Ca188EB9AC28b79C6A0F3";
pub const DEFAULT_POOL_TOKEN_ADDRESS: &str = "0xB54284F014DaB8dBdFC77097caa6af35e8233fF6";
pub const DEFAULT_TRADE_AMOUNT: &str = "0.1";
pub const DEFAULT_SLIPPAGE_BPS: u16 = 500;
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

/// A fungible token the engine interacts with.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Display symbol (e.g., "wSFI", "USDC")
    pub symbol: &'static str,
    /// Contract address
    pub address: Address,
    /// Decimal precision for display/base-unit conversion
    pub decimals: u8,
}

/// Full engine configuration, assembled once at startup and injected into
/// the engine. Nothing in the orchestration logic reads the environment.
#[derive(Debug, Clone)]
pub struct DexConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Citea router contract
    pub router: Address,
    /// Citea factory contract; resolved via `router.factory()` when absent
    pub factory: Option<Address>,
    /// Wrapped native token (18 decimals)
    pub wrapped: TokenConfig,
    /// Stable token (6 decimals)
    pub stable: TokenConfig,
    /// wSFI/USDC pair token (18 decimals)
    pub pool: TokenConfig,
    /// Default trade size, display units
    pub trade_amount: String,
    /// Slippage tolerance in basis points
    pub slippage_bps: u16,
    /// Timeout for individual RPC calls (reads, estimates, broadcasts)
    pub rpc_timeout: Duration,
    /// Timeout for waiting on a transaction receipt
    pub receipt_timeout: Duration,
}

impl DexConfig {
    /// Load the configuration from the environment, falling back to the
    /// SingularityFinance testnet defaults.
    pub fn from_env() -> Result<Self, String> {
        let rpc_url = env::var(RPC_URL_ENV).unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());

        let router = parse_address(ROUTER_ADDRESS_ENV, DEFAULT_ROUTER_ADDRESS)?;
        let factory = match env::var(FACTORY_ADDRESS_ENV) {
            Ok(raw) => Some(
                Address::from_str(raw.trim())
                    .map_err(|e| format!("{FACTORY_ADDRESS_ENV}: {e}"))?,
            ),
            Err(_) => None,
        };

        let wrapped = TokenConfig {
            symbol: "wSFI",
            address: parse_address(WRAPPED_TOKEN_ADDRESS_ENV, DEFAULT_WRAPPED_TOKEN_ADDRESS)?,
            decimals: 18,
        };
        let stable = TokenConfig {
            symbol: "USDC",
            address: parse_address(STABLE_TOKEN_ADDRESS_ENV, DEFAULT_STABLE_TOKEN_ADDRESS)?,
            decimals: 6,
        };
        let pool = TokenConfig {
            symbol: "CLP",
            address: parse_address(POOL_TOKEN_ADDRESS_ENV, DEFAULT_POOL_TOKEN_ADDRESS)?,
            decimals: 18,
        };

        let trade_amount =
            env::var(TRADE_AMOUNT_ENV).unwrap_or_else(|_| DEFAULT_TRADE_AMOUNT.to_string());

        let slippage_bps = parse_number(SLIPPAGE_BPS_ENV, DEFAULT_SLIPPAGE_BPS)?;
        if slippage_bps > 10_000 {
            return Err(format!("{SLIPPAGE_BPS_ENV} must be at most 10000"));
        }

        let rpc_timeout =
            Duration::from_secs(parse_number(RPC_TIMEOUT_ENV, DEFAULT_RPC_TIMEOUT_SECS)?);
        let receipt_timeout =
            Duration::from_secs(parse_number(RECEIPT_TIMEOUT_ENV, DEFAULT_RECEIPT_TIMEOUT_SECS)?);

        Ok(Self {
            rpc_url,
            router,
            factory,
            wrapped,
            stable,
            pool,
            trade_amount,
            slippage_bps,
            rpc_timeout,
            receipt_timeout,
        })
    }
}

fn parse_address(env_name: &str, default: &str) -> Result<Address, String> {
    let raw = env::var(env_name).unwrap_or_else(|_| default.to_string());
    Address::from_str(raw.trim()).map_err(|e| format!("{env_name}: {e}"))
}

fn parse_number<T: FromStr>(env_name: &str, default: T) -> Result<T, String> {
    match env::var(env_name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{env_name}: `{raw}` is not a valid number")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        // Addresses shipped as defaults must themselves be valid.
        assert!(Address::from_str(DEFAULT_ROUTER_ADDRESS).is_ok());
        assert!(Address::from_str(DEFAULT_WRAPPED_TOKEN_ADDRESS).is_ok());
        assert!(Address::from_str(DEFAULT_STABLE_TOKEN_ADDRESS).is_ok());
        assert!(Address::from_str(DEFAULT_POOL_TOKEN_ADDRESS).is_ok());
    }

    #[test]
    fn token_decimals_match_deployments() {
        let config = DexConfig::from_env().expect("defaults load");
        assert_eq!(config.wrapped.decimals, 18);
        assert_eq!(config.stable.decimals, 6);
        assert_eq!(config.pool.decimals, 18);
    }

    #[test]
    fn timeouts_have_sane_defaults() {
        let config = DexConfig::from_env().expect("defaults load");
        assert_eq!(config.rpc_timeout, Duration::from_secs(30));
        assert_eq!(config.receipt_timeout, Duration::from_secs(120));
        assert_eq!(config.slippage_bps, DEFAULT_SLIPPAGE_BPS);
    }
}
