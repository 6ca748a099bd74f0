// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! The `ReferendumInfo` state machine.
//!
//! ```text
//! 0 Ongoing   track:u16 origin proposal enactment submitted:u32
//!             submission:Deposit decision_deposit:Option<Deposit>
//!             deciding:Option<{since:u32, confirming:Option<u32>}>
//!             tally:{ayes,nays,support:u128} in_queue:bool
//!             alarm:Option<(u32, ScheduleAddress)>
//! 1..=4       since:u32 Option<Deposit> [Option<Deposit>]
//! 5 Killed    since:u32
//! ```

use super::origin::{decode_origin, track_name};
use super::{
    Confidence, DecisionStatus, DecodeError, Deposit, Enactment, ProposalKind, ReferendumInfo,
    ReferendumStatus, Tally,
};
use crate::codec::{CodecError, ScaleReader, to_hex};
use crate::consts::CLEARED_MARKER_MAX_LEN;
use crate::hashing::blake2_256;
use crate::ss58::AccountId;
use crate::tracks::TrackInfo;

/// Chain facts the decoder needs to render a record.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    pub ss58_prefix: u16,
    pub tracks: &'a [TrackInfo],
    /// Origins pallet index beyond the built-in ones.
    pub origins_pallet_index: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Full(ReferendumInfo),
    /// A pruned terminal record carrying only its status and end block.
    Cleared {
        status: ReferendumStatus,
        terminal_block: u32,
    },
}

/// Decode a raw `ReferendumInfoFor` value. Pure; the same bytes always give
/// the same result.
pub fn decode_referendum(
    ref_id: u32,
    bytes: &[u8],
    ctx: &DecodeContext<'_>,
) -> Result<Decoded, DecodeError> {
    let variant = bytes.first().copied();
    let error = |source| DecodeError {
        variant,
        raw_len: bytes.len(),
        source,
    };

    let mut reader = ScaleReader::new(bytes);
    let full = match reader.read_u8().map_err(error)? {
        0 => decode_ongoing(ref_id, &mut reader, ctx),
        v @ 1..=4 => decode_terminal(ref_id, v, &mut reader, ctx),
        5 => decode_killed(ref_id, &mut reader),
        byte => Err(CodecError::InvalidVariant {
            what: "referendum info",
            byte,
            offset: 0,
        }),
    };

    match full {
        Ok(info) => Ok(Decoded::Full(info)),
        Err(source) => match cleared_marker(bytes) {
            Some((status, terminal_block)) => {
                tracing::debug!(ref_id, ?status, terminal_block, "Referendum record is a cleared marker");
                Ok(Decoded::Cleared {
                    status,
                    terminal_block,
                })
            }
            None => Err(error(source)),
        },
    }
}

/// `[variant 1..=5][block:u32]`, possibly with a few stray bytes, in at most
/// [`CLEARED_MARKER_MAX_LEN`] bytes.
fn cleared_marker(bytes: &[u8]) -> Option<(ReferendumStatus, u32)> {
    if bytes.len() > CLEARED_MARKER_MAX_LEN {
        return None;
    }
    let mut reader = ScaleReader::new(bytes);
    let status = ReferendumStatus::from_variant(reader.read_u8().ok()?)?;
    if !status.is_terminal() {
        return None;
    }
    let block = reader.read_u32().ok()?;
    Some((status, block))
}

fn read_account(reader: &mut ScaleReader<'_>) -> Result<AccountId, CodecError> {
    reader.read_array::<32>().map(AccountId)
}

fn read_deposit(reader: &mut ScaleReader<'_>, ss58_prefix: u16) -> Result<Deposit, CodecError> {
    let account = read_account(reader)?;
    let amount = reader.read_u128()?;
    Ok(Deposit::new(account, amount, ss58_prefix))
}

struct Proposal {
    hash: String,
    len: u32,
    kind: ProposalKind,
    inline: Option<Vec<u8>>,
}

/// Bytes to skip for a bounded-call tag this decoder does not know.
fn unrecognized_proposal_len(tag: u8) -> usize {
    if (3..=15).contains(&tag) { 32 } else { 0 }
}

fn decode_proposal(reader: &mut ScaleReader<'_>) -> Result<Proposal, CodecError> {
    match reader.read_u8()? {
        0 => {
            let hash = reader.read_array::<32>()?;
            let len = reader.read_u32()?;
            Ok(Proposal {
                hash: to_hex(&hash),
                len,
                kind: ProposalKind::Lookup,
                inline: None,
            })
        }
        1 => {
            let hash = reader.read_array::<32>()?;
            Ok(Proposal {
                hash: to_hex(&hash),
                len: 0,
                kind: ProposalKind::Legacy,
                inline: None,
            })
        }
        2 => {
            let call = reader.read_vec()?;
            Ok(Proposal {
                hash: to_hex(&blake2_256(call)),
                len: call.len() as u32,
                kind: ProposalKind::Inline,
                inline: Some(call.to_vec()),
            })
        }
        tag => {
            let skipped = reader.read_bytes(unrecognized_proposal_len(tag))?;
            tracing::warn!(tag, skipped = skipped.len(), "Unrecognized proposal encoding");
            Ok(Proposal {
                hash: to_hex(skipped),
                len: 0,
                kind: ProposalKind::Unrecognized(tag),
                inline: None,
            })
        }
    }
}

fn decode_enactment(reader: &mut ScaleReader<'_>) -> Result<Enactment, CodecError> {
    let offset = reader.offset();
    match reader.read_u8()? {
        0 => Ok(Enactment::At(reader.read_u32()?)),
        1 => Ok(Enactment::After(reader.read_u32()?)),
        byte => Err(CodecError::InvalidVariant {
            what: "enactment",
            byte,
            offset,
        }),
    }
}

/// Skip the scheduler alarm. Its address is `(u32, u32)` on current
/// runtimes and a 32-byte name plus index on older ones; anything after it
/// is ignored.
fn skip_alarm(reader: &mut ScaleReader<'_>) -> Result<(), CodecError> {
    if reader.is_empty() || !reader.read_option_tag()? {
        return Ok(());
    }
    reader.read_u32()?;
    let address_len = if reader.remaining() == 36 { 36 } else { 8 };
    reader.skip(address_len)
}

fn decode_ongoing(
    ref_id: u32,
    reader: &mut ScaleReader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<ReferendumInfo, CodecError> {
    let track = reader.read_u16()?;
    let origin = decode_origin(reader, ctx)?;
    let proposal = decode_proposal(reader)?;
    let enactment = decode_enactment(reader)?;
    let submitted_block = reader.read_u32()?;
    let submission = read_deposit(reader, ctx.ss58_prefix)?;
    let decision_deposit = reader.read_option(|r| read_deposit(r, ctx.ss58_prefix))?;
    let decision = reader.read_option(|r| {
        Ok(DecisionStatus {
            since: r.read_u32()?,
            confirming: r.read_option(|r| r.read_u32())?,
        })
    })?;
    let tally = Tally::new(reader.read_u128()?, reader.read_u128()?, reader.read_u128()?);
    let in_queue = reader.read_bool()?;
    skip_alarm(reader)?;

    let confidence = match proposal.kind {
        ProposalKind::Unrecognized(_) => Confidence::Heuristic,
        _ => Confidence::Structured,
    };

    let mut info = ReferendumInfo::bare(ref_id, ReferendumStatus::Ongoing, 0);
    info.track = track;
    info.track_name = track_name(track, ctx);
    info.origin = origin;
    info.proposal_hash = proposal.hash;
    info.proposal_len = proposal.len;
    info.proposal_kind = proposal.kind;
    info.inline_proposal = proposal.inline;
    info.enactment = Some(enactment);
    info.submitted_block = submitted_block;
    info.submission = submission;
    info.decision_deposit = decision_deposit;
    info.decision = decision;
    info.tally = tally;
    info.in_queue = in_queue;
    info.confidence = confidence;
    Ok(info)
}

fn decode_terminal(
    ref_id: u32,
    variant: u8,
    reader: &mut ScaleReader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<ReferendumInfo, CodecError> {
    let since = reader.read_u32()?;
    let submission = reader.read_option(|r| read_deposit(r, ctx.ss58_prefix))?;
    let decision_deposit = if reader.is_empty() {
        None
    } else {
        reader.read_option(|r| read_deposit(r, ctx.ss58_prefix))?
    };
    reader.finish()?;

    let status = ReferendumStatus::from_variant(variant).unwrap_or(ReferendumStatus::Approved);
    let mut info = ReferendumInfo::bare(ref_id, status, since);
    info.submission = submission.unwrap_or_else(Deposit::unknown);
    info.decision_deposit = decision_deposit;
    Ok(info)
}

fn decode_killed(ref_id: u32, reader: &mut ScaleReader<'_>) -> Result<ReferendumInfo, CodecError> {
    let since = reader.read_u32()?;
    reader.finish()?;
    Ok(ReferendumInfo::bare(ref_id, ReferendumStatus::Killed, since))
}
