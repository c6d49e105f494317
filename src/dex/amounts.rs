// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token amount arithmetic.
//!
//! Everything in this module is exact integer math. Display amounts are
//! parsed digit-by-digit into base units (never through a float), and the
//! derived-amount helpers truncate the same way the on-chain contracts do,
//! so a minimum computed here is always satisfiable by the contract's own
//! arithmetic.

use alloy::primitives::U256;

use super::error::DexError;

/// Divisor for basis-point slippage math (100% = 10_000 bps).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Numerator/denominator of the fixed partial-withdrawal policy: remove
/// liquidity always redeems 25% of the held pool-token balance.
pub const WITHDRAWAL_NUMERATOR: u64 = 25;
pub const WITHDRAWAL_DENOMINATOR: u64 = 100;

/// Parse a human-readable decimal amount into base units.
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "1.5")
/// * `decimals` - Number of decimals (18 for wSFI, 6 for USDC)
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, DexError> {
    let parts: Vec<&str> = amount.split('.').collect();

    if parts.len() > 2 || parts[0].is_empty() {
        return Err(DexError::InvalidAmount(format!(
            "malformed amount `{amount}`"
        )));
    }

    let whole = parts[0]
        .parse::<u128>()
        .map_err(|_| DexError::InvalidAmount(format!("invalid whole part in `{amount}`")))?;

    let decimal_part = if parts.len() == 2 {
        let dec_str = parts[1];
        if dec_str.len() > decimals as usize {
            return Err(DexError::InvalidAmount(format!(
                "too many decimal places (max {decimals})"
            )));
        }
        // Pad with zeros to match decimals
        let padded = format!("{:0<width$}", dec_str, width = decimals as usize);
        padded
            .parse::<u128>()
            .map_err(|_| DexError::InvalidAmount(format!("invalid decimal part in `{amount}`")))?
    } else {
        0u128
    };

    let multiplier = 10u128.pow(decimals as u32);
    let total = whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(decimal_part))
        .ok_or_else(|| DexError::InvalidAmount(format!("amount `{amount}` overflows")))?;

    Ok(U256::from(total))
}

/// Format base units back into a human-readable decimal amount.
///
/// Full precision, trailing zeros trimmed. Inverse of [`parse_amount`].
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }
}

/// Minimum acceptable amount after applying a slippage tolerance.
///
/// `floor(expected * (10000 - tolerance_bps) / 10000)`, so a tolerance of
/// zero returns `expected` unchanged.
pub fn min_with_slippage(expected: U256, tolerance_bps: u16) -> U256 {
    let multiplier = BPS_DENOMINATOR - u128::from(tolerance_bps.min(10_000));
    expected
        .saturating_mul(U256::from(multiplier))
        .checked_div(U256::from(BPS_DENOMINATOR))
        .unwrap_or(U256::ZERO)
}

/// Proportional share of `total`: `floor(total * numerator / denominator)`.
///
/// Used for the per-token withdrawal amounts (pool-token share of each
/// reserve). A zero denominator means the pool was never initialized.
pub fn proportional_share(
    total: U256,
    numerator: U256,
    denominator: U256,
) -> Result<U256, DexError> {
    if denominator.is_zero() {
        return Err(DexError::PoolUninitialized);
    }

    total
        .checked_mul(numerator)
        .map(|product| product / denominator)
        .ok_or_else(|| DexError::InvalidAmount("proportional share overflows 256 bits".into()))
}

/// Pool-token amount to redeem: exactly 25% (floor) of the held balance.
pub fn partial_withdrawal(balance: U256) -> U256 {
    balance * U256::from(WITHDRAWAL_NUMERATOR) / U256::from(WITHDRAWAL_DENOMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_whole() {
        let result = parse_amount("1", 18).unwrap();
        assert_eq!(result, U256::from(1_000_000_000_000_000_000u64));
    }

    #[test]
    fn test_parse_amount_decimal() {
        let result = parse_amount("1.5", 18).unwrap();
        assert_eq!(result, U256::from(1_500_000_000_000_000_000u64));
    }

    #[test]
    fn test_parse_amount_usdc() {
        // 1.5 USDC = 1_500_000 (6 decimals)
        let result = parse_amount("1.5", 6).unwrap();
        assert_eq!(result, U256::from(1_500_000u64));
    }

    #[test]
    fn test_parse_amount_small() {
        let result = parse_amount("0.001", 18).unwrap();
        assert_eq!(result, U256::from(1_000_000_000_000_000u64));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("1.2.3", 18).is_err());
        assert!(parse_amount("abc", 18).is_err());
        assert!(parse_amount(".5", 18).is_err());
        // 7 decimal places into a 6-decimal token
        assert!(parse_amount("1.0000001", 6).is_err());
    }

    #[test]
    fn test_format_amount() {
        let one = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(format_amount(one, 18), "1");

        let one_and_half = U256::from(1_500_000_000_000_000_000u64);
        assert_eq!(format_amount(one_and_half, 18), "1.5");

        assert_eq!(format_amount(U256::ZERO, 18), "0");
    }

    #[test]
    fn test_format_amount_usdc() {
        let one_usdc = U256::from(1_000_000u64);
        assert_eq!(format_amount(one_usdc, 6), "1");

        let hundred = U256::from(100_000_000u64);
        assert_eq!(format_amount(hundred, 6), "100");
    }

    #[test]
    fn parse_format_round_trip() {
        for (amount, decimals) in [
            ("2.5", 18u8),
            ("10", 18),
            ("100", 6),
            ("0.000001", 6),
            ("123456.789", 18),
        ] {
            let base = parse_amount(amount, decimals).unwrap();
            assert_eq!(format_amount(base, decimals), amount);
        }
    }

    #[test]
    fn test_min_with_slippage() {
        let expected = U256::from(100_000u64);

        // Zero tolerance is the identity
        assert_eq!(min_with_slippage(expected, 0), expected);

        // 5% (500 bps): 100,000 * 9500 / 10000 = 95,000
        assert_eq!(min_with_slippage(expected, 500), U256::from(95_000u64));

        // Monotonically non-increasing in the tolerance
        let mut last = expected;
        for bps in [0u16, 50, 100, 500, 2_500, 10_000] {
            let min = min_with_slippage(expected, bps);
            assert!(min <= last);
            last = min;
        }
    }

    #[test]
    fn test_proportional_share_bounds() {
        let total = U256::from(1_000_000_000_000_000_000u128);
        let den = U256::from(4_000_000u64);

        for num in [0u64, 1, 1_000, 4_000_000] {
            let share = proportional_share(total, U256::from(num), den).unwrap();
            assert!(share <= total);
        }

        // Truncation, not rounding: 10 * 1 / 3 = 3
        let share = proportional_share(U256::from(10u64), U256::from(1u64), U256::from(3u64))
            .unwrap();
        assert_eq!(share, U256::from(3u64));
    }

    #[test]
    fn test_proportional_share_zero_denominator() {
        let err = proportional_share(U256::from(1u64), U256::from(1u64), U256::ZERO).unwrap_err();
        assert!(matches!(err, DexError::PoolUninitialized));
    }

    #[test]
    fn test_proportional_share_large_values() {
        // Reserve and liquidity both near uint112 max must not overflow
        let reserve = (U256::from(1u64) << 112) - U256::from(1u64);
        let liquidity = (U256::from(1u64) << 112) - U256::from(1u64);
        let supply = (U256::from(1u64) << 112) - U256::from(1u64);

        let share = proportional_share(liquidity, reserve, supply).unwrap();
        assert_eq!(share, reserve);
    }

    #[test]
    fn test_partial_withdrawal_is_quarter() {
        assert_eq!(
            partial_withdrawal(U256::from(100u64)),
            U256::from(25u64)
        );
        // Floors, never rounds up
        assert_eq!(partial_withdrawal(U256::from(3u64)), U256::ZERO);
        assert_eq!(partial_withdrawal(U256::from(7u64)), U256::from(1u64));
        assert_eq!(partial_withdrawal(U256::ZERO), U256::ZERO);
    }

    #[test]
    fn balance_scenario_formats_per_token_decimals() {
        // 2.5 native, 10 wrapped, 100 stable (6 decimals), 0 pool tokens
        assert_eq!(
            format_amount(U256::from(2_500_000_000_000_000_000u128), 18),
            "2.5"
        );
        assert_eq!(
            format_amount(U256::from(10_000_000_000_000_000_000u128), 18),
            "10"
        );
        assert_eq!(format_amount(U256::from(100_000_000u64), 6), "100");
        assert_eq!(format_amount(U256::ZERO, 18), "0");
    }

    #[test]
    fn quote_scenario_formats_stable_leg() {
        // getAmountsOut quoting 1 wSFI as [1e18, 2_000000] reads as "2" USDC
        let amounts = [
            U256::from(1_000_000_000_000_000_000u128),
            U256::from(2_000_000u64),
        ];
        assert_eq!(format_amount(amounts[1], 6), "2");
    }
}
