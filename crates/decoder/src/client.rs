// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! One connection plus the constants it decodes against.

use crate::constants::{ChainConstants, ConstantsCache};
use crate::preimage::{self, PreimageError, RecoveredAddressSet, decode_call_addresses};
use crate::referenda::{self, ReferendumError, ReferendumInfo};
use crate::rpc::{RpcTransport, TransportError};
use polkadot_governance_decoder_config::{ChainConfig, DecoderConfig};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Deadline of one operation when the client is built without a config.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Entry point for decoding governance state from a node.
///
/// Clones share the transport and the constants cache. Every operation runs
/// under its own deadline and observes only the token passed to it.
#[derive(Clone)]
pub struct GovernanceClient {
    transport: RpcTransport,
    cache: ConstantsCache,
    chain: ChainConfig,
    operation_timeout: Duration,
}

impl GovernanceClient {
    pub async fn connect(config: &DecoderConfig) -> Result<Self, TransportError> {
        let transport =
            RpcTransport::connect(&config.substrate.url, config.substrate.request_timeout()).await?;
        Ok(Self::from_transport(transport, config.chain.clone())
            .with_operation_timeout(config.substrate.operation_timeout()))
    }

    pub fn from_transport(transport: RpcTransport, chain: ChainConfig) -> Self {
        Self {
            transport,
            cache: ConstantsCache::new(),
            chain,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Share an existing cache, e.g. with a client on a second connection to
    /// the same chain.
    pub fn with_cache(mut self, cache: ConstantsCache) -> Self {
        self.cache = cache;
        self
    }

    /// Bound each operation, all of its requests included.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn transport(&self) -> &RpcTransport {
        &self.transport
    }

    pub fn cache(&self) -> &ConstantsCache {
        &self.cache
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    /// Chain constants, loaded from the runtime on first use.
    pub async fn constants(&self) -> Result<Arc<ChainConstants>, TransportError> {
        if let Some(constants) = self.cache.get() {
            return Ok(constants);
        }
        let constants = ChainConstants::load(&self.transport, None, self.chain.ss58_prefix).await?;
        Ok(self.cache.populate(constants))
    }

    /// Forget cached constants, e.g. after a runtime upgrade.
    pub fn invalidate_constants(&self) {
        tracing::debug!("Invalidating cached chain constants");
        self.cache.invalidate();
    }

    /// Drive `operation` until it finishes, `cancel` fires or the operation
    /// deadline passes. The in-flight request is dropped on the latter two.
    async fn run<T, E>(
        &self,
        name: &'static str,
        cancel: &CancellationToken,
        operation: impl Future<Output = Result<T, E>>,
    ) -> Result<T, E>
    where
        E: From<TransportError>,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled { method: name }.into()),
            result = tokio::time::timeout(self.operation_timeout, operation) => match result {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout {
                    method: name,
                    timeout: self.operation_timeout,
                }
                .into()),
            },
        }
    }

    pub async fn get_referendum_info(
        &self,
        ref_id: u32,
        cancel: &CancellationToken,
    ) -> Result<ReferendumInfo, ReferendumError> {
        self.run("get_referendum_info", cancel, async {
            let constants = self.constants().await?;
            referenda::fetch_referendum(
                &self.transport,
                &constants,
                self.chain.origins_pallet_index,
                ref_id,
            )
            .await
        })
        .await
    }

    pub async fn get_preimage_addresses(
        &self,
        proposal_hash: &str,
        proposal_len: u32,
        submitted_block: u32,
        cancel: &CancellationToken,
    ) -> Result<RecoveredAddressSet, PreimageError> {
        self.run("get_preimage_addresses", cancel, async {
            let constants = self.constants().await?;
            preimage::fetch_preimage_addresses(
                &self.transport,
                constants.ss58_prefix,
                proposal_hash,
                proposal_len,
                submitted_block,
            )
            .await
        })
        .await
    }

    /// Addresses named by a referendum's proposal. Inline proposals are
    /// decoded directly; others are looked up as preimages.
    pub async fn addresses_for(
        &self,
        info: &ReferendumInfo,
        cancel: &CancellationToken,
    ) -> Result<RecoveredAddressSet, PreimageError> {
        if let Some(call) = &info.inline_proposal {
            let constants = self.run("addresses_for", cancel, self.constants()).await?;
            return Ok(decode_call_addresses(call, constants.ss58_prefix));
        }
        self.get_preimage_addresses(
            &info.proposal_hash,
            info.proposal_len,
            info.submitted_block,
            cancel,
        )
        .await
    }
}

/// [`GovernanceClient::get_referendum_info`] bounded only by the operation deadline.
pub async fn get_referendum_info(
    client: &GovernanceClient,
    ref_id: u32,
) -> Result<ReferendumInfo, ReferendumError> {
    client
        .get_referendum_info(ref_id, &CancellationToken::new())
        .await
}

pub async fn get_preimage_addresses(
    client: &GovernanceClient,
    proposal_hash: &str,
    proposal_len: u32,
    submitted_block: u32,
) -> Result<RecoveredAddressSet, PreimageError> {
    client
        .get_preimage_addresses(
            proposal_hash,
            proposal_len,
            submitted_block,
            &CancellationToken::new(),
        )
        .await
}
