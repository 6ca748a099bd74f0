// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Referenda track table.
//!
//! The `Referenda.Tracks` constant is a `Vec<(u16, TrackInfo)>`. Older
//! runtimes encode the track name as a SCALE string, newer ones as a
//! zero-padded `[u8; 25]`; [`decode_tracks`] accepts both.

mod fallback;

pub use fallback::polkadot_tracks;

use crate::codec::{CodecError, ScaleReader};
use crate::types::serialize_u128_as_string;
use serde::Serialize;

/// Width of the fixed track-name field on current runtimes.
pub const TRACK_NAME_LEN: usize = 25;

/// Threshold curve over the decision period. Perbill values are parts per
/// billion; `Reciprocal` parameters are `FixedI64` with 10^9 precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Curve {
    #[serde(rename_all = "camelCase")]
    LinearDecreasing { length: u32, floor: u32, ceil: u32 },
    #[serde(rename_all = "camelCase")]
    SteppedDecreasing {
        begin: u32,
        end: u32,
        step: u32,
        period: u32,
    },
    #[serde(rename_all = "camelCase")]
    Reciprocal {
        factor: i64,
        x_offset: i64,
        y_offset: i64,
    },
}

impl Curve {
    fn decode(reader: &mut ScaleReader<'_>) -> Result<Self, CodecError> {
        let offset = reader.offset();
        match reader.read_u8()? {
            0 => Ok(Curve::LinearDecreasing {
                length: reader.read_u32()?,
                floor: reader.read_u32()?,
                ceil: reader.read_u32()?,
            }),
            1 => Ok(Curve::SteppedDecreasing {
                begin: reader.read_u32()?,
                end: reader.read_u32()?,
                step: reader.read_u32()?,
                period: reader.read_u32()?,
            }),
            2 => Ok(Curve::Reciprocal {
                factor: reader.read_i64()?,
                x_offset: reader.read_i64()?,
                y_offset: reader.read_i64()?,
            }),
            byte => Err(CodecError::InvalidVariant {
                what: "curve",
                byte,
                offset,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    pub id: u16,
    pub name: String,
    pub max_deciding: u32,
    #[serde(serialize_with = "serialize_u128_as_string")]
    pub decision_deposit: u128,
    pub prepare_period: u32,
    pub decision_period: u32,
    pub confirm_period: u32,
    pub min_enactment_period: u32,
    pub min_approval: Curve,
    pub min_support: Curve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameEncoding {
    Str,
    Fixed,
}

/// Decode the `Referenda.Tracks` constant value.
pub fn decode_tracks(bytes: &[u8]) -> Result<Vec<TrackInfo>, CodecError> {
    match decode_tracks_with(bytes, NameEncoding::Fixed) {
        Ok(tracks) => Ok(tracks),
        Err(fixed_err) => {
            tracing::debug!(error = %fixed_err, "Tracks are not fixed-name encoded, trying string names");
            decode_tracks_with(bytes, NameEncoding::Str)
        }
    }
}

fn decode_tracks_with(bytes: &[u8], names: NameEncoding) -> Result<Vec<TrackInfo>, CodecError> {
    let mut reader = ScaleReader::new(bytes);
    let count = reader.read_compact_len()?;
    let mut tracks = Vec::with_capacity(count.min(64));

    for _ in 0..count {
        let id = reader.read_u16()?;
        let name = match names {
            NameEncoding::Str => String::from_utf8_lossy(reader.read_vec()?).into_owned(),
            NameEncoding::Fixed => {
                let raw = reader.read_array::<TRACK_NAME_LEN>()?;
                let end = raw.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
                String::from_utf8_lossy(&raw[..end]).into_owned()
            }
        };
        tracks.push(TrackInfo {
            id,
            name,
            max_deciding: reader.read_u32()?,
            decision_deposit: reader.read_u128()?,
            prepare_period: reader.read_u32()?,
            decision_period: reader.read_u32()?,
            confirm_period: reader.read_u32()?,
            min_enactment_period: reader.read_u32()?,
            min_approval: Curve::decode(&mut reader)?,
            min_support: Curve::decode(&mut reader)?,
        });
    }

    // A wrong name guess can still parse a prefix; only an exact fit counts.
    reader.finish()?;
    Ok(tracks)
}

pub fn find_by_id(tracks: &[TrackInfo], id: u16) -> Option<&TrackInfo> {
    tracks.iter().find(|t| t.id == id)
}
