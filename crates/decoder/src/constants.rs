// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Chain constants read from runtime metadata, with static fallbacks.

use crate::codec::{CodecError, ScaleReader};
use crate::consts::{DEFAULT_SS58_PREFIX, pallets};
use crate::rpc::{RpcTransport, TransportError};
use crate::tracks::{TrackInfo, decode_tracks, polkadot_tracks};
use crate::types::BlockHash;
use frame_metadata::{RuntimeMetadata, RuntimeMetadataPrefixed};
use parity_scale_codec::Decode;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConstantsError {
    #[error("Failed to decode runtime metadata")]
    MetadataDecodeFailed(#[source] parity_scale_codec::Error),

    #[error("Unsupported metadata version {0}")]
    UnsupportedVersion(u32),

    #[error("Failed to decode constant {pallet}.{name}")]
    ConstantDecodeFailed {
        pallet: &'static str,
        name: &'static str,
        #[source]
        source: CodecError,
    },
}

/// Where a [`ChainConstants`] value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstantsSource {
    Metadata,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConstants {
    pub ss58_prefix: u16,
    pub tracks: Vec<TrackInfo>,
    /// `Referenda.SubmissionDeposit`; `None` when the runtime did not say.
    pub submission_deposit: Option<u128>,
    pub undeciding_timeout: Option<u32>,
    pub max_queued: Option<u32>,
    pub source: ConstantsSource,
}

impl ChainConstants {
    /// Static Polkadot tables. `ss58_prefix_override` wins over the default.
    pub fn fallback(ss58_prefix_override: Option<u16>) -> Self {
        Self {
            ss58_prefix: ss58_prefix_override.unwrap_or(DEFAULT_SS58_PREFIX),
            tracks: polkadot_tracks(),
            submission_deposit: None,
            undeciding_timeout: None,
            max_queued: None,
            source: ConstantsSource::Fallback,
        }
    }

    /// Read the governance constants out of SCALE encoded runtime metadata.
    ///
    /// Only the metadata envelope is fatal; an individual constant that is
    /// missing or malformed falls back on its own.
    pub fn from_metadata(
        metadata: &[u8],
        ss58_prefix_override: Option<u16>,
    ) -> Result<Self, ConstantsError> {
        let prefixed = RuntimeMetadataPrefixed::decode(&mut &metadata[..])
            .map_err(ConstantsError::MetadataDecodeFailed)?;
        let lookup = ConstantLookup::new(&prefixed.1)?;

        let tracks = match lookup.decode(pallets::REFERENDA, "Tracks", decode_tracks) {
            Some(Ok(tracks)) if !tracks.is_empty() => tracks,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Referenda.Tracks did not decode, using static tracks");
                polkadot_tracks()
            }
            _ => {
                tracing::warn!("Referenda.Tracks unavailable, using static tracks");
                polkadot_tracks()
            }
        };

        let ss58_prefix = ss58_prefix_override
            .or_else(|| lookup.decode_ok(pallets::SYSTEM, "SS58Prefix", |b| read_all(b, |r| r.read_u16())))
            .unwrap_or(DEFAULT_SS58_PREFIX);

        Ok(Self {
            ss58_prefix,
            tracks,
            submission_deposit: lookup.decode_ok(pallets::REFERENDA, "SubmissionDeposit", |b| {
                read_all(b, |r| r.read_u128())
            }),
            undeciding_timeout: lookup.decode_ok(pallets::REFERENDA, "UndecidingTimeout", |b| {
                read_all(b, |r| r.read_u32())
            }),
            max_queued: lookup.decode_ok(pallets::REFERENDA, "MaxQueued", |b| {
                read_all(b, |r| r.read_u32())
            }),
            source: ConstantsSource::Metadata,
        })
    }

    /// Fetch metadata at `at` and read the constants from it. Anything short
    /// of a cancelled request degrades to [`ChainConstants::fallback`].
    pub async fn load(
        transport: &RpcTransport,
        at: Option<&BlockHash>,
        ss58_prefix_override: Option<u16>,
    ) -> Result<Self, TransportError> {
        let metadata = match transport.get_metadata(at).await {
            Ok(metadata) => metadata,
            Err(e @ TransportError::Cancelled { .. }) => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "Metadata fetch failed, using static constants");
                return Ok(Self::fallback(ss58_prefix_override));
            }
        };

        match Self::from_metadata(&metadata, ss58_prefix_override) {
            Ok(constants) => {
                tracing::debug!(
                    tracks = constants.tracks.len(),
                    ss58_prefix = constants.ss58_prefix,
                    "Loaded chain constants from metadata"
                );
                Ok(constants)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Metadata unusable, using static constants");
                Ok(Self::fallback(ss58_prefix_override))
            }
        }
    }

    pub fn track(&self, id: u16) -> Option<&TrackInfo> {
        crate::tracks::find_by_id(&self.tracks, id)
    }
}

/// Decode `bytes` with `f` and require that it consumed all of them.
fn read_all<T>(
    bytes: &[u8],
    f: impl FnOnce(&mut ScaleReader<'_>) -> Result<T, CodecError>,
) -> Result<T, CodecError> {
    let mut reader = ScaleReader::new(bytes);
    let value = f(&mut reader)?;
    reader.finish()?;
    Ok(value)
}

/// Pallet constants of a V14 or V15 runtime, flattened to raw values.
struct ConstantLookup<'a> {
    constants: Vec<(&'a str, &'a str, &'a [u8])>,
}

impl<'a> ConstantLookup<'a> {
    fn new(metadata: &'a RuntimeMetadata) -> Result<Self, ConstantsError> {
        let constants = match metadata {
            RuntimeMetadata::V14(m) => m
                .pallets
                .iter()
                .flat_map(|p| {
                    p.constants
                        .iter()
                        .map(move |c| (p.name.as_str(), c.name.as_str(), &c.value[..]))
                })
                .collect(),
            RuntimeMetadata::V15(m) => m
                .pallets
                .iter()
                .flat_map(|p| {
                    p.constants
                        .iter()
                        .map(move |c| (p.name.as_str(), c.name.as_str(), &c.value[..]))
                })
                .collect(),
            other => return Err(ConstantsError::UnsupportedVersion(other.version())),
        };
        Ok(Self { constants })
    }

    fn raw(&self, pallet: &str, name: &str) -> Option<&'a [u8]> {
        self.constants
            .iter()
            .find(|(p, n, _)| *p == pallet && *n == name)
            .map(|(_, _, value)| *value)
    }

    fn decode<T>(
        &self,
        pallet: &'static str,
        name: &'static str,
        f: impl FnOnce(&[u8]) -> Result<T, CodecError>,
    ) -> Option<Result<T, ConstantsError>> {
        self.raw(pallet, name).map(|bytes| {
            f(bytes).map_err(|source| ConstantsError::ConstantDecodeFailed {
                pallet,
                name,
                source,
            })
        })
    }

    fn decode_ok<T>(
        &self,
        pallet: &'static str,
        name: &'static str,
        f: impl FnOnce(&[u8]) -> Result<T, CodecError>,
    ) -> Option<T> {
        match self.decode(pallet, name, f)? {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed constant");
                None
            }
        }
    }
}

/// Constants shared by every clone of a client. Populated on first use and
/// kept until invalidated (e.g. after a runtime upgrade).
#[derive(Debug, Clone, Default)]
pub struct ConstantsCache {
    inner: Arc<RwLock<Option<Arc<ChainConstants>>>>,
}

impl ConstantsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<ChainConstants>> {
        self.inner.read().ok()?.clone()
    }

    pub fn populate(&self, constants: ChainConstants) -> Arc<ChainConstants> {
        let constants = Arc::new(constants);
        if let Ok(mut slot) = self.inner.write() {
            *slot = Some(constants.clone());
        }
        constants
    }

    pub fn invalidate(&self) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = None;
        }
    }
}
