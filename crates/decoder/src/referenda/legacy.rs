// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Best-effort recovery of records whose layout is not understood.

use super::decode::DecodeContext;
use super::{Confidence, Deposit, ReferendumInfo, ReferendumStatus};
use crate::codec::ScaleReader;
use crate::heuristics::first_account_id;

/// Scan `bytes` for the submitter of referendum `ref_id`.
///
/// The status and end block come from `marker` when the caller already knows
/// them, otherwise from the record's own variant byte and leading block
/// number. The deposit amount is a placeholder: `submission_deposit` when the
/// chain reported it, else 0.
pub fn legacy_scan(
    ref_id: u32,
    bytes: &[u8],
    marker: Option<(ReferendumStatus, u32)>,
    ctx: &DecodeContext<'_>,
    submission_deposit: Option<u128>,
) -> Option<ReferendumInfo> {
    let mut reader = ScaleReader::new(bytes);
    let own_status = reader.read_u8().ok().and_then(ReferendumStatus::from_variant);

    let (status, terminal_block) = match (marker, own_status) {
        (Some(marker), _) => marker,
        (None, Some(status)) if status.is_terminal() => {
            let block = reader.read_u32().unwrap_or_default();
            (status, block)
        }
        (None, Some(status)) => (status, 0),
        (None, None) => return None,
    };

    // Terminal records lead with their end block; skip it so the scan does
    // not straddle the header.
    let header = if own_status.is_some_and(|s| s.is_terminal()) { 5 } else { 1 };
    let body = bytes.get(header..).unwrap_or_default();

    let account = first_account_id(body, ctx.ss58_prefix)?;
    tracing::warn!(
        ref_id,
        ?status,
        submitter = %account.to_ss58(ctx.ss58_prefix),
        "Recovered referendum submitter by byte scan"
    );

    let mut info = ReferendumInfo::bare(ref_id, status, terminal_block);
    info.submission = Deposit::new(account, submission_deposit.unwrap_or(0), ctx.ss58_prefix);
    info.confidence = Confidence::Heuristic;
    Some(info)
}

/// Last resort for a cleared record nothing else could explain.
pub fn unknown_submitter(ref_id: u32, status: ReferendumStatus, terminal_block: u32) -> ReferendumInfo {
    tracing::warn!(ref_id, ?status, terminal_block, "Referendum submitter unknown");
    let mut info = ReferendumInfo::bare(ref_id, status, terminal_block);
    info.confidence = Confidence::Heuristic;
    info
}
