// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Storage key derivation.
//!
//! ```text
//! twox128(pallet) ++ twox128(item) [++ hasher(key) ++ key]
//!   16 bytes          16 bytes        depends on the map's hasher
//! ```

use crate::codec::to_hex;
use crate::consts::pallets;
use crate::hashing::{StorageHasher, twox_128};
use parity_scale_codec::Encode;
use std::fmt;

/// A fully derived storage key. Only its bytes matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(Vec<u8>);

impl StorageKey {
    /// Key of a plain storage value (or the prefix of a map).
    pub fn plain(pallet: &str, item: &str) -> Self {
        let mut bytes = Vec::with_capacity(32);
        bytes.extend_from_slice(&twox_128(pallet.as_bytes()));
        bytes.extend_from_slice(&twox_128(item.as_bytes()));
        Self(bytes)
    }

    /// Key of a map entry, hashing `key` with the map's declared hasher.
    pub fn map(pallet: &str, item: &str, key: &[u8], hasher: StorageHasher) -> Self {
        let mut storage_key = Self::plain(pallet, item);
        storage_key.0.extend_from_slice(&hasher.hash(key));
        storage_key
    }

    /// Generic map-entry helper. Defaults to `Twox64Concat`; maps declared with
    /// another hasher must use [`StorageKey::map`].
    pub fn with_param(pallet: &str, item: &str, key: &[u8]) -> Self {
        Self::map(pallet, item, key, StorageHasher::Twox64Concat)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Vec<u8>> for StorageKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// `Referenda::ReferendumInfoFor(ref_id)`, hashed with `Blake2_128Concat`.
pub fn referendum_info_key(ref_id: u32) -> StorageKey {
    StorageKey::map(
        pallets::REFERENDA,
        "ReferendumInfoFor",
        &ref_id.encode(),
        StorageHasher::Blake2_128Concat,
    )
}

/// Prefix shared by every entry of `pallet::item`, for key enumeration.
pub fn prefix_key(pallet: &str, item: &str) -> StorageKey {
    StorageKey::plain(pallet, item)
}

/// `Preimage::PreimageFor((hash, len))`
pub fn preimage_for_key(hash: &[u8; 32], len: u32, hasher: StorageHasher) -> StorageKey {
    StorageKey::map(
        pallets::PREIMAGE,
        "PreimageFor",
        &(hash, len).encode(),
        hasher,
    )
}

/// `Democracy::Preimages(hash)`
pub fn democracy_preimage_key(hash: &[u8; 32], hasher: StorageHasher) -> StorageKey {
    StorageKey::map(pallets::DEMOCRACY, "Preimages", hash, hasher)
}
