// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hash functions used for storage keys and SS58 checksums.

pub use sp_crypto_hashing::{blake2_128, blake2_256, blake2_512, twox_64, twox_128};

/// Hashing strategy a storage map applies to its key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageHasher {
    /// `blake2_128(key) ++ key`
    Blake2_128Concat,
    /// `twox64(key) ++ key`
    Twox64Concat,
    /// `key` unchanged
    Identity,
}

impl StorageHasher {
    /// Apply the hasher to `key`, including the appended key for the concat forms.
    pub fn hash(&self, key: &[u8]) -> Vec<u8> {
        match self {
            StorageHasher::Blake2_128Concat => concat(&blake2_128(key), key),
            StorageHasher::Twox64Concat => concat(&twox_64(key), key),
            StorageHasher::Identity => key.to_vec(),
        }
    }

    /// Number of hash bytes placed before the original key material.
    pub fn hash_len(&self) -> usize {
        match self {
            StorageHasher::Blake2_128Concat => 16,
            StorageHasher::Twox64Concat => 8,
            StorageHasher::Identity => 0,
        }
    }
}

fn concat(hash: &[u8], key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(hash.len() + key.len());
    out.extend_from_slice(hash);
    out.extend_from_slice(key);
    out
}
