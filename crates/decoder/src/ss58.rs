// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! SS58 address codec.
//!
//! ```text
//! base58( prefix ++ account_id ++ checksum )
//!         1 or 2   32 bytes      blake2b_512("SS58PRE" ++ prefix ++ account_id)[0..2]
//! ```
//!
//! Identity is the 32-byte [`AccountId`]; the SS58 string is only a rendering
//! of it under one network prefix. Two strings with different prefixes can
//! name the same account, so comparisons always go through the raw bytes.

use crate::codec::to_hex;
use crate::hashing::blake2_512;
use ss58_registry::Ss58AddressFormat;
use std::fmt;
use thiserror::Error;

const CHECKSUM_PREAMBLE: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;
const ACCOUNT_ID_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ss58Error {
    #[error("Invalid base58 string: {0}")]
    InvalidBase58(String),

    #[error("Invalid SS58 length: {0} bytes")]
    InvalidLength(usize),

    #[error("Invalid SS58 prefix byte 0x{0:02x}")]
    InvalidPrefix(u8),

    #[error("SS58 prefix {0} is reserved")]
    ReservedPrefix(u16),

    #[error("SS58 checksum mismatch")]
    ChecksumMismatch,
}

/// A raw 32-byte account identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render with the given network prefix.
    pub fn to_ss58(&self, prefix: u16) -> String {
        encode(self, prefix)
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}

/// Encode the SS58 prefix into its one- or two-byte form.
fn prefix_bytes(prefix: u16) -> Vec<u8> {
    let ident = prefix & 0b0011_1111_1111_1111;
    match ident {
        0..=63 => vec![ident as u8],
        _ => {
            let first = ((ident & 0b0000_0000_1111_1100) as u8) >> 2;
            let second = ((ident >> 8) as u8) | (((ident & 0b0000_0000_0000_0011) as u8) << 6);
            vec![first | 0b0100_0000, second]
        }
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut input = Vec::with_capacity(CHECKSUM_PREAMBLE.len() + payload.len());
    input.extend_from_slice(CHECKSUM_PREAMBLE);
    input.extend_from_slice(payload);
    let hash = blake2_512(&input);
    [hash[0], hash[1]]
}

/// Encode an account id under `prefix`.
pub fn encode(account: &AccountId, prefix: u16) -> String {
    let mut payload = prefix_bytes(prefix);
    payload.extend_from_slice(account.as_bytes());
    let sum = checksum(&payload);
    payload.extend_from_slice(&sum);
    bs58::encode(payload).into_string()
}

/// Decode an SS58 string into its account id and network prefix.
pub fn decode(address: &str) -> Result<(AccountId, u16), Ss58Error> {
    let data = bs58::decode(address)
        .into_vec()
        .map_err(|e| Ss58Error::InvalidBase58(e.to_string()))?;

    let first = *data.first().ok_or(Ss58Error::InvalidLength(0))?;
    let (prefix_len, prefix) = match first {
        0..=63 => (1, first as u16),
        64..=127 => {
            let second = *data.get(1).ok_or(Ss58Error::InvalidLength(data.len()))?;
            let lower = (first << 2) | (second >> 6);
            let upper = second & 0b0011_1111;
            (2, (lower as u16) | ((upper as u16) << 8))
        }
        _ => return Err(Ss58Error::InvalidPrefix(first)),
    };

    if data.len() != prefix_len + ACCOUNT_ID_LEN + CHECKSUM_LEN {
        return Err(Ss58Error::InvalidLength(data.len()));
    }

    if Ss58AddressFormat::custom(prefix).is_reserved() {
        return Err(Ss58Error::ReservedPrefix(prefix));
    }

    let body_len = prefix_len + ACCOUNT_ID_LEN;
    if checksum(&data[..body_len]) != data[body_len..] {
        return Err(Ss58Error::ChecksumMismatch);
    }

    let mut account = [0u8; ACCOUNT_ID_LEN];
    account.copy_from_slice(&data[prefix_len..body_len]);
    Ok((AccountId(account), prefix))
}
