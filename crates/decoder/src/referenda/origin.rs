// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proposal origins and their mapping onto tracks.
//!
//! ```text
//! OriginCaller
//!   0            system  ++ RawOrigin (0 Root | 1 Signed ++ [u8; 32] | 2 None)
//!   1 | 22 | 43  Origins ++ variant byte
//!   2            Void
//!   other        the byte itself is an Origins variant
//! ```

use super::decode::DecodeContext;
use crate::codec::{CodecError, ScaleReader};
use crate::consts::ORIGINS_PALLET_INDICES;
use crate::tracks::{find_by_id, polkadot_tracks};

const SYSTEM: u8 = 0;
const VOID: u8 = 2;

/// `(origins variant, track id)` for the OpenGov custom origins.
const ORIGIN_TRACKS: &[(u8, u16)] = &[
    (0, 10),  // StakingAdmin
    (1, 11),  // Treasurer
    (2, 13),  // FellowshipAdmin
    (3, 14),  // GeneralAdmin
    (4, 15),  // AuctionAdmin
    (5, 12),  // LeaseAdmin
    (6, 20),  // ReferendumCanceller
    (7, 21),  // ReferendumKiller
    (8, 30),  // SmallTipper
    (9, 31),  // BigTipper
    (10, 32), // SmallSpender
    (11, 33), // MediumSpender
    (12, 34), // BigSpender
    (13, 1),  // WhitelistedCaller
    (14, 2),  // WishForChange
];

/// Track an Origins variant submits on.
pub fn origin_track_id(variant: u8) -> Option<u16> {
    ORIGIN_TRACKS
        .iter()
        .find(|(v, _)| *v == variant)
        .map(|(_, track)| *track)
}

/// Name of track `id`, from the chain's table first, then the static one.
pub fn track_name(id: u16, ctx: &DecodeContext<'_>) -> Option<String> {
    find_by_id(ctx.tracks, id)
        .map(|t| t.name.clone())
        .or_else(|| find_by_id(&polkadot_tracks(), id).map(|t| t.name.clone()))
}

fn origins_name(variant: u8, ctx: &DecodeContext<'_>) -> String {
    origin_track_id(variant)
        .and_then(|id| track_name(id, ctx))
        .unwrap_or_else(|| format!("origins({})", variant))
}

fn is_origins_pallet(tag: u8, ctx: &DecodeContext<'_>) -> bool {
    ORIGINS_PALLET_INDICES.contains(&tag) || ctx.origins_pallet_index == Some(tag)
}

/// Decode a proposal origin into its display tag.
pub fn decode_origin(
    reader: &mut ScaleReader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<String, CodecError> {
    let tag = reader.read_u8()?;

    if tag == SYSTEM {
        let offset = reader.offset();
        match reader.read_u8()? {
            0 | 2 => {}
            1 => reader.skip(32)?,
            byte => {
                return Err(CodecError::InvalidVariant {
                    what: "system origin",
                    byte,
                    offset,
                });
            }
        }
        return Ok("system".to_string());
    }

    if is_origins_pallet(tag, ctx) {
        let variant = reader.read_u8()?;
        return Ok(origins_name(variant, ctx));
    }

    if tag == VOID {
        return Ok("void".to_string());
    }

    Ok(origins_name(tag, ctx))
}
