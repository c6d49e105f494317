// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Provider construction and signer derivation.
//!
//! The engine keeps one shared read provider for the whole process; a
//! signing provider is built per request from the caller-supplied key and
//! dropped when the request completes, so no key material outlives a call.

use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
        Identity, ProviderBuilder, RootProvider,
    },
    signers::local::PrivateKeySigner,
};

use super::error::DexError;

/// HTTP provider type for read-only calls (with all fillers).
pub type ReadProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// HTTP provider type that also signs outgoing transactions locally.
pub type SignerProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Ethereum>,
>;

/// Build the shared read-only provider for an RPC endpoint.
pub fn connect_read(rpc_url: &str) -> Result<ReadProvider, DexError> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e: url::ParseError| DexError::InvalidRpcUrl(e.to_string()))?;

    Ok(ProviderBuilder::new().connect_http(url))
}

/// Build a signing provider for a single request.
pub fn connect_signer(rpc_url: &str, signer: PrivateKeySigner) -> Result<SignerProvider, DexError> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e: url::ParseError| DexError::InvalidRpcUrl(e.to_string()))?;

    let wallet = EthereumWallet::from(signer);
    Ok(ProviderBuilder::new().wallet(wallet).connect_http(url))
}

/// Derive a signer from a hex private key (with or without 0x prefix).
///
/// The key is used for the duration of one call and never persisted.
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, DexError> {
    let trimmed = private_key_hex
        .strip_prefix("0x")
        .unwrap_or(private_key_hex);

    let key_bytes = alloy::hex::decode(trimmed)
        .map_err(|e| DexError::InvalidPrivateKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| DexError::InvalidPrivateKey(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test vector key (hardhat account #0); address is derived
    // deterministically so signer construction is verifiable offline.
    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_signer_from_hex() {
        let signer = signer_from_hex(TEST_KEY).expect("valid key parses");
        assert_eq!(signer.address().to_string(), TEST_ADDRESS);
    }

    #[test]
    fn test_signer_from_hex_with_prefix() {
        let with_prefix = format!("0x{TEST_KEY}");
        let signer = signer_from_hex(&with_prefix).expect("0x-prefixed key parses");
        assert_eq!(signer.address().to_string(), TEST_ADDRESS);
    }

    #[test]
    fn test_signer_from_hex_rejects_garbage() {
        assert!(matches!(
            signer_from_hex("not-a-key"),
            Err(DexError::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            signer_from_hex("abcd"),
            Err(DexError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_connect_read_rejects_bad_url() {
        assert!(matches!(
            connect_read("not a url"),
            Err(DexError::InvalidRpcUrl(_))
        ));
    }
}
