// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Chain-level value types shared by the RPC transport and the decoders.

pub mod hash;

pub use hash::BlockHash;
use serde::Deserialize;

/// The part of a block header this crate needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub number: u32,
}

/// Subset of `state_getRuntimeVersion`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
    pub spec_name: String,
    pub spec_version: u32,
    #[serde(default)]
    pub transaction_version: u32,
}

/// Balances are rendered as decimal strings; JSON numbers cannot hold a u128.
pub fn serialize_u128_as_string<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_string())
}

/// Parse a block number from a JSON value.
///
/// Handles both formats returned by different RPC implementations:
/// - Hex string: `"0x1a2b3c"` (standard Substrate nodes)
/// - Numeric: `12345` (Smoldot light client)
pub fn parse_block_number_from_json(value: &serde_json::Value) -> Result<u64, String> {
    if let Some(hex_str) = value.as_str() {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        return u64::from_str_radix(hex_str, 16)
            .map_err(|e| format!("invalid hex '{}': {}", hex_str, e));
    }

    if let Some(num) = value.as_u64() {
        return Ok(num);
    }

    Err(format!("expected hex string or number, got: {}", value))
}
