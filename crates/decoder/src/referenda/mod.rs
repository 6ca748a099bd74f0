// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! `Referenda.ReferendumInfoFor` decoding.
//!
//! Records are decoded by hand against the known layouts. When a record has
//! been pruned to a bare "cleared" marker the full record is replayed from
//! the block before it was cleared, and when nothing parses a byte scan
//! recovers what it can.

mod decode;
mod legacy;
pub mod origin;

pub use decode::{DecodeContext, Decoded, decode_referendum};
pub use legacy::{legacy_scan, unknown_submitter};

use crate::codec::{CodecError, to_hex};
use crate::constants::ChainConstants;
use crate::rpc::{RpcTransport, TransportError};
use crate::ss58::AccountId;
use crate::storage_key::referendum_info_key;
use crate::types::serialize_u128_as_string;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferendumStatus {
    Ongoing,
    Approved,
    Rejected,
    Cancelled,
    TimedOut,
    Killed,
}

impl ReferendumStatus {
    /// Status for a `ReferendumInfo` variant index.
    pub fn from_variant(variant: u8) -> Option<Self> {
        match variant {
            0 => Some(Self::Ongoing),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            3 => Some(Self::Cancelled),
            4 => Some(Self::TimedOut),
            5 => Some(Self::Killed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// How much a decoded record can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    /// Every field came from a known layout.
    Structured,
    /// At least one field was guessed.
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Enactment {
    At(u32),
    After(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProposalKind {
    Lookup,
    Legacy,
    Inline,
    /// A bounded-call tag this decoder does not know; the payload was skipped.
    Unrecognized(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    #[serde(skip)]
    pub account: Option<AccountId>,
    pub who: String,
    #[serde(serialize_with = "serialize_u128_as_string")]
    pub amount: u128,
}

impl Deposit {
    pub fn new(account: AccountId, amount: u128, ss58_prefix: u16) -> Self {
        Self {
            who: account.to_ss58(ss58_prefix),
            account: Some(account),
            amount,
        }
    }

    /// Placeholder for a deposit the record does not carry.
    pub fn unknown() -> Self {
        Self {
            account: None,
            who: "Unknown".to_string(),
            amount: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionStatus {
    pub since: u32,
    pub confirming: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    #[serde(serialize_with = "serialize_u128_as_string")]
    pub ayes: u128,
    #[serde(serialize_with = "serialize_u128_as_string")]
    pub nays: u128,
    #[serde(serialize_with = "serialize_u128_as_string")]
    pub support: u128,
    /// `ayes / (ayes + nays)` as `NN.NN%`.
    pub approval: String,
}

impl Tally {
    pub fn new(ayes: u128, nays: u128, support: u128) -> Self {
        Self {
            ayes,
            nays,
            support,
            approval: approval_percent(ayes, nays),
        }
    }

    pub fn empty() -> Self {
        Self::new(0, 0, 0)
    }
}

/// `ayes * 10000 / (ayes + nays)` rendered with two decimals.
pub fn approval_percent(ayes: u128, nays: u128) -> String {
    let total = ayes.saturating_add(nays);
    if total == 0 {
        return "0.00%".to_string();
    }
    let basis_points = match ayes.checked_mul(10_000) {
        Some(scaled) => scaled / total,
        None => ayes / (total / 10_000).max(1),
    };
    format!("{}.{:02}%", basis_points / 100, basis_points % 100)
}

/// A referendum as seen by the governance tooling. Rebuilt on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferendumInfo {
    pub id: u32,
    pub status: ReferendumStatus,
    pub track: u16,
    pub track_name: Option<String>,
    pub origin: String,
    pub proposal_hash: String,
    pub proposal_len: u32,
    pub proposal_kind: ProposalKind,
    /// Call bytes of an inline proposal, so they can be walked without a fetch.
    #[serde(skip)]
    pub inline_proposal: Option<Vec<u8>>,
    pub enactment: Option<Enactment>,
    pub submitted_block: u32,
    pub submission: Deposit,
    pub decision_deposit: Option<Deposit>,
    pub decision: Option<DecisionStatus>,
    pub tally: Tally,
    pub in_queue: bool,
    pub approved_at: u32,
    pub rejected_at: u32,
    pub cancelled_at: u32,
    pub timed_out_at: u32,
    pub killed_at: u32,
    pub confidence: Confidence,
    /// Block the record was actually read at when it had been cleared.
    pub historical_block: Option<u32>,
}

impl ReferendumInfo {
    /// An otherwise empty record in `status`, ended at `terminal_block`.
    pub fn bare(id: u32, status: ReferendumStatus, terminal_block: u32) -> Self {
        let mut info = Self {
            id,
            status,
            track: 0,
            track_name: None,
            origin: "unknown".to_string(),
            proposal_hash: to_hex(&[]),
            proposal_len: 0,
            proposal_kind: ProposalKind::Lookup,
            inline_proposal: None,
            enactment: None,
            submitted_block: 0,
            submission: Deposit::unknown(),
            decision_deposit: None,
            decision: None,
            tally: Tally::empty(),
            in_queue: false,
            approved_at: 0,
            rejected_at: 0,
            cancelled_at: 0,
            timed_out_at: 0,
            killed_at: 0,
            confidence: Confidence::Structured,
            historical_block: None,
        };
        info.set_terminal(status, terminal_block);
        info
    }

    /// Set `status` and the matching terminal block; all others are cleared.
    pub fn set_terminal(&mut self, status: ReferendumStatus, block: u32) {
        self.status = status;
        self.approved_at = 0;
        self.rejected_at = 0;
        self.cancelled_at = 0;
        self.timed_out_at = 0;
        self.killed_at = 0;
        match status {
            ReferendumStatus::Ongoing => {}
            ReferendumStatus::Approved => self.approved_at = block,
            ReferendumStatus::Rejected => self.rejected_at = block,
            ReferendumStatus::Cancelled => self.cancelled_at = block,
            ReferendumStatus::TimedOut => self.timed_out_at = block,
            ReferendumStatus::Killed => self.killed_at = block,
        }
    }

    /// Block the referendum ended at, or 0 while ongoing.
    pub fn terminal_block(&self) -> u32 {
        match self.status {
            ReferendumStatus::Ongoing => 0,
            ReferendumStatus::Approved => self.approved_at,
            ReferendumStatus::Rejected => self.rejected_at,
            ReferendumStatus::Cancelled => self.cancelled_at,
            ReferendumStatus::TimedOut => self.timed_out_at,
            ReferendumStatus::Killed => self.killed_at,
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to decode referendum record (variant {variant:?}, {raw_len} bytes)")]
pub struct DecodeError {
    pub variant: Option<u8>,
    pub raw_len: usize,
    #[source]
    pub source: CodecError,
}

#[derive(Debug, Error)]
pub enum ReferendumError {
    #[error("Referendum {0} not found")]
    NotFound(u32),

    #[error("Referendum {ref_id} could not be decoded")]
    Decode {
        ref_id: u32,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Fetch and decode referendum `ref_id` at the best block, replaying the
/// record from history when the chain only keeps a cleared marker.
pub async fn fetch_referendum(
    transport: &RpcTransport,
    constants: &ChainConstants,
    origins_pallet_index: Option<u8>,
    ref_id: u32,
) -> Result<ReferendumInfo, ReferendumError> {
    let ctx = DecodeContext {
        ss58_prefix: constants.ss58_prefix,
        tracks: &constants.tracks,
        origins_pallet_index,
    };
    let key = referendum_info_key(ref_id);

    let bytes = match transport.get_storage(&key, None).await? {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Err(ReferendumError::NotFound(ref_id)),
    };
    tracing::debug!(ref_id, len = bytes.len(), "Fetched referendum record");

    match decode_referendum(ref_id, &bytes, &ctx) {
        Ok(Decoded::Full(info)) => Ok(info),
        Ok(Decoded::Cleared {
            status,
            terminal_block,
        }) => {
            resolve_cleared(transport, constants, &ctx, ref_id, &bytes, status, terminal_block)
                .await
        }
        Err(source) => {
            tracing::warn!(ref_id, error = %source, "Referendum record did not decode, scanning bytes");
            legacy_scan(ref_id, &bytes, None, &ctx, constants.submission_deposit)
                .ok_or(ReferendumError::Decode { ref_id, source })
        }
    }
}

async fn resolve_cleared(
    transport: &RpcTransport,
    constants: &ChainConstants,
    ctx: &DecodeContext<'_>,
    ref_id: u32,
    marker: &[u8],
    status: ReferendumStatus,
    terminal_block: u32,
) -> Result<ReferendumInfo, ReferendumError> {
    let marker_status = Some((status, terminal_block));
    let mut historical = None;

    if let Some(height) = terminal_block.checked_sub(1) {
        if let Some(hash) = transport.get_block_hash(Some(height)).await? {
            let key = referendum_info_key(ref_id);
            historical = transport.get_storage(&key, Some(&hash)).await?;

            if let Some(bytes) = historical.as_deref() {
                match decode_referendum(ref_id, bytes, ctx) {
                    Ok(Decoded::Full(mut info)) => {
                        tracing::debug!(ref_id, height, "Decoded cleared referendum from history");
                        info.set_terminal(status, terminal_block);
                        info.in_queue = false;
                        info.historical_block = Some(height);
                        return Ok(info);
                    }
                    Ok(Decoded::Cleared { .. }) => {
                        tracing::warn!(ref_id, height, "Referendum was already cleared at historical block");
                    }
                    Err(e) => {
                        tracing::warn!(ref_id, height, error = %e, "Historical referendum record did not decode");
                    }
                }
            }
        } else {
            tracing::warn!(ref_id, height, "No block hash for historical replay");
        }
    }

    let scanned = historical
        .as_deref()
        .and_then(|bytes| legacy_scan(ref_id, bytes, marker_status, ctx, constants.submission_deposit))
        .or_else(|| legacy_scan(ref_id, marker, marker_status, ctx, constants.submission_deposit));

    Ok(scanned.unwrap_or_else(|| unknown_submitter(ref_id, status, terminal_block)))
}
