// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Preimage lookup and participant address recovery.

pub mod call;

pub use call::{BatchKind, Call, CallError, MultiAddress, RewardDestination, decode_call};

use crate::codec::{ScaleReader, from_hex};
use crate::hashing::StorageHasher;
use crate::heuristics::scan_account_ids;
use crate::referenda::Confidence;
use crate::rpc::{RpcTransport, TransportError};
use crate::ss58::AccountId;
use crate::storage_key::{democracy_preimage_key, preimage_for_key};
use crate::types::BlockHash;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreimageError {
    #[error("Preimage {hash} not found")]
    PreimageNotFound { hash: String },

    #[error("Invalid proposal hash: {0}")]
    InvalidHash(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveredAddress {
    #[serde(skip)]
    pub account: AccountId,
    pub address: String,
    pub confidence: Confidence,
}

/// Addresses found in a call tree, unique by account bytes, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveredAddressSet {
    addresses: Vec<RecoveredAddress>,
    pub diagnostics: Vec<String>,
}

impl RecoveredAddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `account`. A structured sighting upgrades an earlier heuristic one.
    pub fn insert(&mut self, account: AccountId, confidence: Confidence, ss58_prefix: u16) {
        if let Some(existing) = self.addresses.iter_mut().find(|a| a.account == account) {
            if confidence == Confidence::Structured {
                existing.confidence = Confidence::Structured;
            }
            return;
        }
        self.addresses.push(RecoveredAddress {
            account,
            address: account.to_ss58(ss58_prefix),
            confidence,
        });
    }

    pub fn contains(&self, account: &AccountId) -> bool {
        self.addresses.iter().any(|a| a.account == *account)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecoveredAddress> {
        self.addresses.iter()
    }

    pub fn accounts(&self) -> Vec<AccountId> {
        self.addresses.iter().map(|a| a.account).collect()
    }

    pub fn addresses(&self) -> Vec<String> {
        self.addresses.iter().map(|a| a.address.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

fn collect(call: &Call, set: &mut RecoveredAddressSet, ss58_prefix: u16) {
    let structured = |address: &MultiAddress, set: &mut RecoveredAddressSet| {
        if let Some(account) = address.account() {
            set.insert(account, Confidence::Structured, ss58_prefix);
        }
    };

    match call {
        Call::Transfer { dest, .. } => structured(dest, set),
        Call::Bond {
            controller, payee, ..
        } => {
            structured(controller, set);
            if let RewardDestination::Account(account) = payee {
                set.insert(*account, Confidence::Structured, ss58_prefix);
            }
        }
        Call::Nominate { targets } => {
            for target in targets {
                structured(target, set);
            }
        }
        Call::Spend { beneficiary, .. } => structured(beneficiary, set),
        Call::Proxy { real, call, .. } => {
            structured(real, set);
            collect(call, set, ss58_prefix);
        }
        Call::Batch {
            calls, error, rest, ..
        } => {
            for call in calls {
                collect(call, set, ss58_prefix);
            }
            if let Some(error) = error {
                set.diagnostics
                    .push(format!("batch decoded {} calls before failing: {}", calls.len(), error));
                let found = scan_account_ids(rest, ss58_prefix);
                if !found.is_empty() {
                    tracing::warn!(
                        found = found.len(),
                        len = rest.len(),
                        "Scanned undecoded batch tail"
                    );
                }
                for account in found {
                    set.insert(account, Confidence::Heuristic, ss58_prefix);
                }
            }
        }
        Call::AsDerivative { call, .. } => collect(call, set, ss58_prefix),
        Call::Unknown { pallet, call, args } => {
            let found = scan_account_ids(args, ss58_prefix);
            if !found.is_empty() {
                tracing::warn!(pallet, call, found = found.len(), "Scanned unknown call arguments");
            }
            for account in found {
                set.insert(account, Confidence::Heuristic, ss58_prefix);
            }
        }
    }
}

/// Walk encoded call bytes and collect every account they name.
///
/// Never fails: undecodable input is scanned heuristically and the reason is
/// kept in `diagnostics`.
pub fn decode_call_addresses(bytes: &[u8], ss58_prefix: u16) -> RecoveredAddressSet {
    let mut set = RecoveredAddressSet::new();

    match decode_call(bytes) {
        Ok((call, used)) => {
            collect(&call, &mut set, ss58_prefix);
            if used < bytes.len() {
                set.diagnostics
                    .push(format!("{} bytes after the call were ignored", bytes.len() - used));
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, len = bytes.len(), "Call did not decode, scanning bytes");
            set.diagnostics.push(format!("call did not decode: {}", e));
            for account in scan_account_ids(bytes, ss58_prefix) {
                set.insert(account, Confidence::Heuristic, ss58_prefix);
            }
        }
    }

    set
}

/// `Preimage.PreimageFor` values are `Option<Vec<u8>>` on some runtimes and
/// a bare `Vec<u8>` on others; accept whichever consumes the value exactly.
fn unwrap_preimage_for(value: &[u8]) -> Option<Vec<u8>> {
    let mut optional = ScaleReader::new(value);
    if let Ok(Some(bytes)) = optional.read_option(|r| r.read_vec())
        && optional.is_empty()
    {
        return Some(bytes.to_vec());
    }

    let mut bare = ScaleReader::new(value);
    if let Ok(bytes) = bare.read_vec()
        && bare.is_empty()
    {
        return Some(bytes.to_vec());
    }

    tracing::warn!(len = value.len(), "Unrecognized PreimageFor value layout");
    None
}

/// `Democracy.Preimages` values: a status tag followed by the call bytes
/// when available.
fn unwrap_democracy_preimage(value: &[u8]) -> Option<Vec<u8>> {
    let mut reader = ScaleReader::new(value);
    match reader.read_u8().ok()? {
        0 => None,
        _ => reader.read_vec().ok().map(<[u8]>::to_vec),
    }
}

const HASHERS: [StorageHasher; 2] = [StorageHasher::Blake2_128Concat, StorageHasher::Identity];

/// Look up a preimage at `at`, trying `Preimage.PreimageFor` before
/// `Democracy.Preimages`.
pub async fn fetch_preimage(
    transport: &RpcTransport,
    hash: &[u8; 32],
    len: u32,
    at: Option<&BlockHash>,
) -> Result<Option<Vec<u8>>, TransportError> {
    for hasher in HASHERS {
        let key = preimage_for_key(hash, len, hasher);
        if let Some(value) = transport.get_storage(&key, at).await?
            && let Some(call) = unwrap_preimage_for(&value)
        {
            tracing::debug!(?hasher, len = call.len(), "Found preimage in Preimage.PreimageFor");
            return Ok(Some(call));
        }
    }

    for hasher in HASHERS {
        let key = democracy_preimage_key(hash, hasher);
        if let Some(value) = transport.get_storage(&key, at).await?
            && let Some(call) = unwrap_democracy_preimage(&value)
        {
            tracing::debug!(?hasher, len = call.len(), "Found preimage in Democracy.Preimages");
            return Ok(Some(call));
        }
    }

    Ok(None)
}

fn parse_hash(proposal_hash: &str) -> Result<[u8; 32], PreimageError> {
    let bytes = from_hex(proposal_hash).map_err(|e| PreimageError::InvalidHash(e.to_string()))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| PreimageError::InvalidHash(format!("expected 32 bytes, got {}", bytes.len())))
}

/// Fetch the preimage of a proposal and collect the addresses in it. Falls
/// back to the state at `submitted_block` when it has since been unnoted.
pub async fn fetch_preimage_addresses(
    transport: &RpcTransport,
    ss58_prefix: u16,
    proposal_hash: &str,
    proposal_len: u32,
    submitted_block: u32,
) -> Result<RecoveredAddressSet, PreimageError> {
    let hash = parse_hash(proposal_hash)?;

    let mut preimage = fetch_preimage(transport, &hash, proposal_len, None).await?;
    if preimage.is_none() {
        tracing::debug!(proposal_hash, submitted_block, "Preimage not at head, retrying at submission");
        if let Some(at) = transport.get_block_hash(Some(submitted_block)).await? {
            preimage = fetch_preimage(transport, &hash, proposal_len, Some(&at)).await?;
        }
    }

    let preimage = preimage.ok_or_else(|| PreimageError::PreimageNotFound {
        hash: proposal_hash.to_string(),
    })?;
    Ok(decode_call_addresses(&preimage, ss58_prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_vec;
    use crate::consts::calls;
    use crate::test_fixtures::{
        ALICE, BOB, KEY_LIKE, StorageMock, batch_call, mock_transport, transfer_call,
    };

    #[test]
    fn test_batch_of_two_transfers_yields_both() {
        let bytes = batch_call(&[transfer_call(&ALICE, 1), transfer_call(&BOB, 2)]);
        let set = decode_call_addresses(&bytes, 42);

        assert_eq!(set.accounts(), vec![AccountId(ALICE), AccountId(BOB)]);
        assert!(set.iter().all(|a| a.confidence == Confidence::Structured));
        assert!(set.diagnostics.is_empty());
    }

    #[test]
    fn test_addresses_are_deduplicated() {
        let bytes = batch_call(&[
            transfer_call(&ALICE, 1),
            transfer_call(&ALICE, 2),
            transfer_call(&BOB, 3),
        ]);
        let set = decode_call_addresses(&bytes, 0);
        assert_eq!(set.len(), 2);
        assert_eq!(set.addresses()[0], AccountId(ALICE).to_ss58(0));
    }

    #[test]
    fn test_structured_upgrades_heuristic() {
        let mut set = RecoveredAddressSet::new();
        set.insert(AccountId(ALICE), Confidence::Heuristic, 42);
        set.insert(AccountId(ALICE), Confidence::Structured, 42);
        set.insert(AccountId(ALICE), Confidence::Heuristic, 42);
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(|a| a.confidence), Some(Confidence::Structured));
    }

    #[test]
    fn test_unknown_call_is_scanned() {
        let mut bytes = vec![0x63, 0x00];
        bytes.extend_from_slice(&KEY_LIKE);
        let set = decode_call_addresses(&bytes, 42);

        assert!(set.contains(&AccountId(KEY_LIKE)));
        assert!(set.iter().all(|a| a.confidence == Confidence::Heuristic));
    }

    #[test]
    fn test_partial_batch_keeps_found_addresses() {
        let mut bytes = batch_call(&[transfer_call(&ALICE, 1)]);
        bytes[2] = 2 << 2;
        bytes.extend_from_slice(&[calls::BALANCES, 0x00, 0x00]);

        let set = decode_call_addresses(&bytes, 42);
        assert_eq!(set.accounts(), vec![AccountId(ALICE)]);
        assert_eq!(set.diagnostics.len(), 1);
    }

    #[test]
    fn test_failed_batch_element_is_scanned_like_top_level() {
        // 0x09 is not a MultiAddress variant.
        let mut bad = vec![calls::BALANCES, 0x00, 0x09];
        bad.extend_from_slice(&KEY_LIKE);
        bad.push(0x04);

        let top_level = decode_call_addresses(&bad, 42);
        let in_batch = decode_call_addresses(&batch_call(&[transfer_call(&BOB, 1), bad]), 42);

        assert_eq!(top_level.len(), 1);
        assert!(in_batch.contains(&AccountId(BOB)));
        for recovered in top_level.iter() {
            let nested = in_batch
                .iter()
                .find(|a| a.account == recovered.account)
                .unwrap();
            assert_eq!(nested.confidence, Confidence::Heuristic);
        }
        assert_eq!(in_batch.len(), 2);
        assert!(in_batch.diagnostics[0].starts_with("batch decoded 1 calls before failing"));
    }

    #[test]
    fn test_untagged_account_arguments_are_not_structured() {
        // Account written as a bare 32-byte AccountId, without the
        // MultiAddress tag the runtime's lookup expects.
        let untagged = |account: &[u8; 32], value: u8| {
            let mut call = vec![calls::BALANCES, 0x00];
            call.extend_from_slice(account);
            call.push(value << 2);
            call
        };
        let bytes = batch_call(&[untagged(&ALICE, 1), untagged(&BOB, 2)]);

        let (call, used) = decode_call(&bytes).unwrap();
        assert_eq!(used, bytes.len());
        assert!(matches!(
            call,
            Call::Batch { ref calls, error: Some(_), ref rest, .. }
                if calls.is_empty() && rest.len() == bytes.len() - 3
        ));

        let set = decode_call_addresses(&bytes, 42);
        assert!(set.iter().all(|a| a.confidence == Confidence::Heuristic));
        assert!(!set.contains(&AccountId(ALICE)));
        assert_eq!(set.diagnostics.len(), 1);
        assert!(set.diagnostics[0].contains("multi address byte 0xd4"));
    }

    #[test]
    fn test_short_inputs_never_fail() {
        for bytes in [&[][..], &[0x05], &[0x05, 0x00], &[0x05, 0x00, 0x00]] {
            let set = decode_call_addresses(bytes, 42);
            assert!(set.is_empty());
            assert_eq!(set.diagnostics.len(), 1);
        }
    }

    #[test]
    fn test_preimage_value_layouts() {
        let call = transfer_call(&ALICE, 1);

        let mut optional = vec![0x01];
        optional.extend(encode_vec(&call));
        assert_eq!(unwrap_preimage_for(&optional), Some(call.clone()));

        assert_eq!(unwrap_preimage_for(&encode_vec(&call)), Some(call.clone()));
        assert_eq!(unwrap_preimage_for(&[0x00]), None);

        let mut democracy = vec![0x01];
        democracy.extend(encode_vec(&call));
        democracy.extend_from_slice(&[0xff; 8]);
        assert_eq!(unwrap_democracy_preimage(&democracy), Some(call));
        assert_eq!(unwrap_democracy_preimage(&[0x00]), None);
    }

    #[test]
    fn test_parse_hash() {
        assert!(parse_hash(&format!("0x{}", "ab".repeat(32))).is_ok());
        assert!(matches!(parse_hash("0x1234"), Err(PreimageError::InvalidHash(_))));
        assert!(matches!(parse_hash("nothex"), Err(PreimageError::InvalidHash(_))));
    }

    #[tokio::test]
    async fn test_fetch_from_preimage_pallet_identity_key() {
        let hash = [0x42u8; 32];
        let call = batch_call(&[transfer_call(&ALICE, 1), transfer_call(&BOB, 2)]);
        let mut value = vec![0x01];
        value.extend(encode_vec(&call));

        let transport = mock_transport(StorageMock::new().with_storage(
            preimage_for_key(&hash, call.len() as u32, StorageHasher::Identity),
            None,
            &value,
        ));

        let set = fetch_preimage_addresses(
            &transport,
            42,
            &crate::codec::to_hex(&hash),
            call.len() as u32,
            10,
        )
        .await
        .unwrap();
        assert_eq!(set.accounts(), vec![AccountId(ALICE), AccountId(BOB)]);
    }

    #[tokio::test]
    async fn test_fetch_from_democracy_at_submission_block() {
        let hash = [0x24u8; 32];
        let block = [0x77u8; 32];
        let call = transfer_call(&BOB, 9);
        let mut value = vec![0x01];
        value.extend(encode_vec(&call));

        let transport = mock_transport(
            StorageMock::new()
                .with_block_hash(10, block)
                .with_storage(
                    democracy_preimage_key(&hash, StorageHasher::Blake2_128Concat),
                    Some(block),
                    &value,
                ),
        );

        let set = fetch_preimage_addresses(&transport, 0, &crate::codec::to_hex(&hash), 0, 10)
            .await
            .unwrap();
        assert_eq!(set.accounts(), vec![AccountId(BOB)]);
    }

    #[tokio::test]
    async fn test_missing_preimage_is_an_error() {
        let transport = mock_transport(StorageMock::new());
        let err = fetch_preimage_addresses(&transport, 42, &format!("0x{}", "00".repeat(32)), 4, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, PreimageError::PreimageNotFound { .. }));
    }
}
