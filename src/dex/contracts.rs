// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract interface definitions for the Citea exchange suite.
//!
//! All interfaces are declared with alloy's `sol!` macro. Read-only calls go
//! through the generated RPC instances; state-changing calls are encoded via
//! the generated call structs and routed through the transaction builder so
//! gas, price, and nonce are always set explicitly.

use alloy::sol;

sol! {
    /// Minimal ERC-20 surface shared by the stable token and the pool token.
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function totalSupply() external view returns (uint256);
    }

    /// Wrapped native token (wSFI): ERC-20 plus the value-bearing deposit.
    #[sol(rpc)]
    interface IWrappedNative {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function deposit() external payable;
    }

    /// Citea router (UniswapV2Router02 fork).
    #[sol(rpc)]
    interface ICiteaRouter {
        function factory() external view returns (address);
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
        function swapExactTokensForTokensSupportingFeeOnTransferTokens(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external;
        function addLiquidity(
            address tokenA,
            address tokenB,
            uint256 amountADesired,
            uint256 amountBDesired,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline
        ) external returns (uint256 amountA, uint256 amountB, uint256 liquidity);
        function removeLiquidity(
            address tokenA,
            address tokenB,
            uint256 liquidity,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline
        ) external returns (uint256 amountA, uint256 amountB);
    }

    /// Citea pool factory, used to resolve pair contracts.
    #[sol(rpc)]
    interface ICiteaFactory {
        function getPair(address tokenA, address tokenB) external view returns (address pair);
    }

    /// Citea liquidity pair. Reserves are uint112 on-chain; they decode
    /// losslessly into uint256 words here.
    #[sol(rpc)]
    interface ICiteaPair {
        function getReserves() external view returns (uint256 reserve0, uint256 reserve1, uint32 blockTimestampLast);
        function token0() external view returns (address);
        function token1() external view returns (address);
    }
}
