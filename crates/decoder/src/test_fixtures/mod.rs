// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared record builders and RPC mocks for unit tests.

use crate::codec::{encode_compact, encode_u16, encode_u32, encode_u128, encode_vec};
use crate::rpc::RpcTransport;
use crate::storage_key::StorageKey;
use serde_json::Value;
use serde_json::value::RawValue;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use subxt_rpcs::client::mock_rpc_client::Json as MockJson;
use subxt_rpcs::client::{MockRpcClient, RpcClient};

/// Alice's well-known dev account.
pub const ALICE: [u8; 32] = [
    0xd4, 0x35, 0x93, 0xc7, 0x15, 0xfd, 0xd3, 0x1c, 0x61, 0x14, 0x1a, 0xbd, 0x04, 0xa9, 0x9f, 0xd6,
    0x82, 0x2c, 0x85, 0x58, 0x85, 0x4c, 0xcd, 0xe3, 0x9a, 0x56, 0x84, 0xe7, 0xa5, 0x6d, 0xa2, 0x7d,
];

/// Bob's well-known dev account.
pub const BOB: [u8; 32] = [
    0x8e, 0xaf, 0x04, 0x15, 0x16, 0x87, 0x73, 0x63, 0x26, 0xc9, 0xfe, 0xa1, 0x7e, 0x25, 0xfc, 0x52,
    0x87, 0x61, 0x36, 0x93, 0xc9, 0x12, 0x90, 0x9c, 0xb2, 0x26, 0xaa, 0x47, 0x94, 0xf2, 0x6a, 0x48,
];

/// 24 non-zero bytes then zeros: passes the account heuristic and is not a
/// valid option tag.
pub const KEY_LIKE: [u8; 32] = [
    0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xf1, 0x12,
    0x23, 0x34, 0x45, 0x56, 0x67, 0x78, 0x89, 0x9a, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Field-by-field builder for an `Ongoing` referendum record.
#[derive(Debug, Clone)]
pub struct OngoingRecord {
    pub track: u16,
    pub origin: Vec<u8>,
    pub proposal: Vec<u8>,
    /// `(tag, block)`: 0 is `At`, 1 is `After`.
    pub enactment: (u8, u32),
    pub submitted: u32,
    pub submission: ([u8; 32], u128),
    pub decision_deposit: Option<([u8; 32], u128)>,
    pub deciding: Option<(u32, Option<u32>)>,
    pub tally: (u128, u128, u128),
    pub in_queue: bool,
    pub alarm: Option<(u32, Vec<u8>)>,
}

fn encode_deposit(out: &mut Vec<u8>, (who, amount): &([u8; 32], u128)) {
    out.extend_from_slice(who);
    out.extend(encode_u128(*amount));
}

impl OngoingRecord {
    /// Root track, system origin, a 64-byte lookup proposal, 2 ayes to 1 nay.
    pub fn golden() -> Self {
        let mut proposal = vec![0u8];
        proposal.extend_from_slice(&[0xab; 32]);
        proposal.extend(encode_u32(64));

        Self {
            track: 0,
            origin: vec![0, 0],
            proposal,
            enactment: (0, 100),
            submitted: 50,
            submission: (ALICE, 10_000_000_000),
            decision_deposit: None,
            deciding: None,
            tally: (2, 1, 3),
            in_queue: false,
            alarm: None,
        }
    }

    /// An `Inline` bounded call.
    pub fn inline_proposal(call: &[u8]) -> Vec<u8> {
        let mut out = vec![2u8];
        out.extend(encode_vec(call));
        out
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8];
        out.extend(encode_u16(self.track));
        out.extend_from_slice(&self.origin);
        out.extend_from_slice(&self.proposal);
        out.push(self.enactment.0);
        out.extend(encode_u32(self.enactment.1));
        out.extend(encode_u32(self.submitted));
        encode_deposit(&mut out, &self.submission);

        match &self.decision_deposit {
            Some(deposit) => {
                out.push(1);
                encode_deposit(&mut out, deposit);
            }
            None => out.push(0),
        }

        match self.deciding {
            Some((since, confirming)) => {
                out.push(1);
                out.extend(encode_u32(since));
                match confirming {
                    Some(block) => {
                        out.push(1);
                        out.extend(encode_u32(block));
                    }
                    None => out.push(0),
                }
            }
            None => out.push(0),
        }

        let (ayes, nays, support) = self.tally;
        for v in [ayes, nays, support] {
            out.extend(encode_u128(v));
        }
        out.push(self.in_queue as u8);

        match &self.alarm {
            Some((block, address)) => {
                out.push(1);
                out.extend(encode_u32(*block));
                out.extend_from_slice(address);
            }
            None => out.push(0),
        }
        out
    }
}

/// A terminal record. `decision` of `None` leaves the field out entirely.
pub fn encode_terminal(
    variant: u8,
    since: u32,
    submission: Option<([u8; 32], u128)>,
    decision: Option<Option<([u8; 32], u128)>>,
) -> Vec<u8> {
    let mut out = vec![variant];
    out.extend(encode_u32(since));
    match &submission {
        Some(deposit) => {
            out.push(1);
            encode_deposit(&mut out, deposit);
        }
        None => out.push(0),
    }
    match &decision {
        Some(Some(deposit)) => {
            out.push(1);
            encode_deposit(&mut out, deposit);
        }
        Some(None) => out.push(0),
        None => {}
    }
    out
}

/// `Balances.transfer_allow_death(Id(dest), value)`
pub fn transfer_call(dest: &[u8; 32], value: u128) -> Vec<u8> {
    let mut out = vec![0x05, 0x00, 0x00];
    out.extend_from_slice(dest);
    out.extend(encode_compact(value));
    out
}

/// `Utility.batch(calls)`
pub fn batch_call(calls: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0x18, 0x00];
    out.extend(encode_compact(calls.len() as u128));
    for call in calls {
        out.extend_from_slice(call);
    }
    out
}

/// Canned chain state served by [`mock_transport`]. Anything not registered
/// reads as `null`.
#[derive(Debug, Clone, Default)]
pub struct StorageMock {
    storage: HashMap<(String, Option<String>), String>,
    block_hashes: HashMap<u32, String>,
    metadata: Option<String>,
}

impl StorageMock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage(mut self, key: StorageKey, at: Option<[u8; 32]>, value: &[u8]) -> Self {
        let at = at.map(|hash| crate::codec::to_hex(&hash));
        self.storage
            .insert((key.to_hex(), at), crate::codec::to_hex(value));
        self
    }

    pub fn with_block_hash(mut self, height: u32, hash: [u8; 32]) -> Self {
        self.block_hashes
            .insert(height, crate::codec::to_hex(&hash));
        self
    }

    pub fn with_metadata(mut self, metadata: &[u8]) -> Self {
        self.metadata = Some(crate::codec::to_hex(metadata));
        self
    }
}

fn params_of(params: Option<Box<RawValue>>) -> Vec<Value> {
    params
        .and_then(|p| serde_json::from_str(p.get()).ok())
        .unwrap_or_default()
}

pub fn mock_transport(state: StorageMock) -> RpcTransport {
    let state = Arc::new(state);
    let storage = state.clone();
    let hashes = state.clone();
    let metadata = state.metadata.clone();

    let mock = MockRpcClient::builder()
        .method_handler("state_getStorage", move |params: Option<Box<RawValue>>| {
            let params = params_of(params);
            let key = params.first().and_then(Value::as_str).map(str::to_lowercase);
            let at = params.get(1).and_then(Value::as_str).map(str::to_lowercase);
            let value = key.and_then(|key| storage.storage.get(&(key, at)).cloned());
            async move { MockJson(value) }
        })
        .method_handler("chain_getBlockHash", move |params: Option<Box<RawValue>>| {
            let params = params_of(params);
            let height = params.first().and_then(Value::as_u64);
            let hash = height.and_then(|h| hashes.block_hashes.get(&(h as u32)).cloned());
            async move { MockJson(hash) }
        })
        .method_handler("state_getMetadata", move |_params: Option<Box<RawValue>>| {
            let metadata = metadata.clone();
            async move { MockJson(metadata) }
        })
        .build();

    RpcTransport::from_client(RpcClient::new(mock), Duration::from_secs(5))
}

/// A `RuntimeMetadataPrefixed` V14 blob with an empty type registry and the
/// given pallet constants.
pub fn encode_metadata_v14(pallets: &[(&str, Vec<(&str, Vec<u8>)>)]) -> Vec<u8> {
    let mut out = b"meta".to_vec();
    out.push(14);
    // types
    out.extend(encode_compact(0));

    out.extend(encode_compact(pallets.len() as u128));
    for (index, (name, constants)) in pallets.iter().enumerate() {
        out.extend(encode_vec(name.as_bytes()));
        // storage, calls, event
        out.extend_from_slice(&[0, 0, 0]);
        out.extend(encode_compact(constants.len() as u128));
        for (constant, value) in constants {
            out.extend(encode_vec(constant.as_bytes()));
            out.extend(encode_compact(0));
            out.extend(encode_vec(value));
            // docs
            out.extend(encode_compact(0));
        }
        // error
        out.push(0);
        out.push(index as u8);
    }

    // extrinsic: ty, version, signed extensions
    out.extend(encode_compact(0));
    out.push(4);
    out.extend(encode_compact(0));
    // runtime type
    out.extend(encode_compact(0));
    out
}

/// Two fixed-name tracks, `root` (0) and `small_tipper` (30).
pub fn encode_tracks_fixture() -> Vec<u8> {
    use crate::tracks::tests::{encode_tracks, sample};
    encode_tracks(&sample(), true)
}
