// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! SCALE codec primitives.
//!
//! Decoding is done by hand through [`ScaleReader`], a cursor that remembers
//! its absolute offset so every failure can say exactly where the bytes ran
//! out. Every decode reports how many bytes it consumed; callers never have to
//! guess where a value ends. Encoding goes through `parity-scale-codec`.
//!
//! ```text
//! compact mode (low 2 bits of the first byte)
//!   0b00  single byte   value = byte >> 2              (0..=63)
//!   0b01  two bytes     value = u16_le >> 2            (64..=16383)
//!   0b10  four bytes    value = u32_le >> 2            (16384..=2^30-1)
//!   0b11  big integer   (byte >> 2) + 4 payload bytes, little-endian
//! ```

use parity_scale_codec::{Compact, Encode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Insufficient data at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    InsufficientData {
        needed: usize,
        remaining: usize,
        offset: usize,
    },

    #[error("Compact integer at offset {offset} has {bytes} payload bytes, more than fit in u128")]
    CompactOverflow { bytes: usize, offset: usize },

    #[error("Compact value {value} at offset {offset} does not fit in {target}")]
    ValueOutOfRange {
        value: u128,
        target: &'static str,
        offset: usize,
    },

    #[error("Invalid {what} byte 0x{byte:02x} at offset {offset}")]
    InvalidVariant {
        what: &'static str,
        byte: u8,
        offset: usize,
    },

    #[error("{remaining} trailing bytes at offset {offset}")]
    TrailingBytes { remaining: usize, offset: usize },

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

/// Forward-only cursor over SCALE encoded bytes.
#[derive(Debug, Clone)]
pub struct ScaleReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ScaleReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Absolute position, which is also the number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The bytes that have not been read yet.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    pub fn peek_u8(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    /// Take the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < len {
            return Err(CodecError::InsufficientData {
                needed: len,
                remaining: self.remaining(),
                offset: self.offset,
            });
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..self.offset])
    }

    pub fn skip(&mut self, len: usize) -> Result<(), CodecError> {
        self.read_bytes(len).map(|_| ())
    }

    /// Consume everything that is left.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = self.rest();
        self.offset = self.bytes.len();
        rest
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        self.read_array().map(u64::from_le_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        self.read_array().map(i64::from_le_bytes)
    }

    pub fn read_u128(&mut self) -> Result<u128, CodecError> {
        self.read_array().map(u128::from_le_bytes)
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(CodecError::InvalidVariant {
                what: "bool",
                byte,
                offset,
            }),
        }
    }

    /// Read an `Option` presence byte (0 = None, 1 = Some).
    pub fn read_option_tag(&mut self) -> Result<bool, CodecError> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(CodecError::InvalidVariant {
                what: "option",
                byte,
                offset,
            }),
        }
    }

    /// Read an `Option<T>` using `f` for the payload.
    pub fn read_option<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CodecError>,
    ) -> Result<Option<T>, CodecError> {
        if self.read_option_tag()? {
            f(self).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn read_compact(&mut self) -> Result<u128, CodecError> {
        let offset = self.offset;
        let (value, consumed) = decode_compact(self.rest()).map_err(|e| e.shifted(offset))?;
        self.offset += consumed;
        Ok(value)
    }

    /// Read a compact integer that is used as a length or count.
    pub fn read_compact_len(&mut self) -> Result<usize, CodecError> {
        let offset = self.offset;
        let value = self.read_compact()?;
        usize::try_from(value).map_err(|_| CodecError::ValueOutOfRange {
            value,
            target: "usize",
            offset,
        })
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(&self) -> Result<(), CodecError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes {
                remaining: self.remaining(),
                offset: self.offset,
            })
        }
    }

    /// Read `compact_len ++ bytes`.
    pub fn read_vec(&mut self) -> Result<&'a [u8], CodecError> {
        let len = self.read_compact_len()?;
        self.read_bytes(len)
    }
}

impl CodecError {
    /// Re-base an error produced on a sub-slice onto the parent's offsets.
    fn shifted(self, by: usize) -> Self {
        match self {
            CodecError::InsufficientData {
                needed,
                remaining,
                offset,
            } => CodecError::InsufficientData {
                needed,
                remaining,
                offset: offset + by,
            },
            CodecError::CompactOverflow { bytes, offset } => CodecError::CompactOverflow {
                bytes,
                offset: offset + by,
            },
            CodecError::ValueOutOfRange {
                value,
                target,
                offset,
            } => CodecError::ValueOutOfRange {
                value,
                target,
                offset: offset + by,
            },
            CodecError::InvalidVariant { what, byte, offset } => CodecError::InvalidVariant {
                what,
                byte,
                offset: offset + by,
            },
            other => other,
        }
    }
}

/// Decode a compact integer from the start of `bytes`.
///
/// Returns `(value, bytes_consumed)`.
pub fn decode_compact(bytes: &[u8]) -> Result<(u128, usize), CodecError> {
    let need = |needed: usize| CodecError::InsufficientData {
        needed,
        remaining: bytes.len(),
        offset: 0,
    };

    let first = *bytes.first().ok_or_else(|| need(1))?;
    match first & 0b11 {
        0b00 => Ok(((first >> 2) as u128, 1)),
        0b01 => {
            let raw: [u8; 2] = bytes.get(..2).ok_or_else(|| need(2))?.try_into().map_err(|_| need(2))?;
            Ok(((u16::from_le_bytes(raw) >> 2) as u128, 2))
        }
        0b10 => {
            let raw: [u8; 4] = bytes.get(..4).ok_or_else(|| need(4))?.try_into().map_err(|_| need(4))?;
            Ok(((u32::from_le_bytes(raw) >> 2) as u128, 4))
        }
        _ => {
            let payload_len = (first >> 2) as usize + 4;
            if payload_len > 16 {
                return Err(CodecError::CompactOverflow {
                    bytes: payload_len,
                    offset: 0,
                });
            }
            let payload = bytes.get(1..1 + payload_len).ok_or_else(|| need(1 + payload_len))?;
            let mut le = [0u8; 16];
            le[..payload_len].copy_from_slice(payload);
            Ok((u128::from_le_bytes(le), 1 + payload_len))
        }
    }
}

/// Decode `compact_len ++ bytes`, returning the payload and total consumption.
pub fn decode_vec(bytes: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
    let mut reader = ScaleReader::new(bytes);
    let payload = reader.read_vec()?.to_vec();
    Ok((payload, reader.offset()))
}

macro_rules! decode_fixed {
    ($name:ident, $ty:ty, $read:ident) => {
        #[doc = concat!("Decode a little-endian `", stringify!($ty), "`, returning `(value, bytes_consumed)`.")]
        pub fn $name(bytes: &[u8]) -> Result<($ty, usize), CodecError> {
            let mut reader = ScaleReader::new(bytes);
            let value = reader.$read()?;
            Ok((value, reader.offset()))
        }
    };
}

decode_fixed!(decode_u16, u16, read_u16);
decode_fixed!(decode_u32, u32, read_u32);
decode_fixed!(decode_u64, u64, read_u64);
decode_fixed!(decode_u128, u128, read_u128);

pub fn encode_compact(value: u128) -> Vec<u8> {
    Compact(value).encode()
}

/// Encode `compact_len ++ bytes`.
pub fn encode_vec(bytes: &[u8]) -> Vec<u8> {
    bytes.to_vec().encode()
}

pub fn encode_u16(value: u16) -> Vec<u8> {
    value.encode()
}

pub fn encode_u32(value: u32) -> Vec<u8> {
    value.encode()
}

pub fn encode_u64(value: u64) -> Vec<u8> {
    value.encode()
}

pub fn encode_u128(value: u128) -> Vec<u8> {
    value.encode()
}

/// Render bytes as a `0x`-prefixed lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a hex string, with or without the `0x` prefix.
pub fn from_hex(value: &str) -> Result<Vec<u8>, CodecError> {
    let trimmed = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(trimmed).map_err(|e| CodecError::InvalidHex(format!("{}: {}", value, e)))
}
