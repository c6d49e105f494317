// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DEX orchestration engine for the Citea exchange.
//!
//! This module provides functionality for:
//! - Querying native and token balances
//! - Wrapping native SFI into wSFI
//! - Swapping wSFI for USDC
//! - Adding and removing pool liquidity

pub mod allowance;
pub mod amounts;
pub mod contracts;
pub mod engine;
pub mod error;
pub mod provider;
pub mod tx;

pub use engine::{BalanceSummary, DexEngine, TxOutcome};
pub use error::DexError;
