// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! JSON-RPC transport over a single persistent connection.
//!
//! Request ids and response correlation are handled by the underlying
//! `subxt-rpcs` client. This layer adds a per-request timeout, cooperative
//! cancellation and the hex plumbing for the handful of `state_*` and
//! `chain_*` methods the decoders need.

use crate::codec::from_hex;
use crate::storage_key::StorageKey;
use crate::types::{BlockHash, Header, RuntimeVersion, parse_block_number_from_json};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use subxt_rpcs::client::{RpcClient, RpcParams};
use subxt_rpcs::rpc_params;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: subxt_rpcs::Error,
    },

    #[error("RPC call {method} failed")]
    Rpc {
        method: &'static str,
        #[source]
        source: subxt_rpcs::Error,
    },

    #[error("RPC call {method} timed out after {timeout:?}")]
    Timeout {
        method: &'static str,
        timeout: Duration,
    },

    #[error("RPC call {method} was cancelled")]
    Cancelled { method: &'static str },

    #[error("Invalid response from {method}: {reason}")]
    InvalidResponse { method: &'static str, reason: String },

    #[error("Transport was built from an existing client and has no URL to reconnect to")]
    NotReconnectable,
}

/// One RPC connection plus the limits applied to every request made on it.
#[derive(Clone)]
pub struct RpcTransport {
    client: RpcClient,
    url: Option<String>,
    timeout: Duration,
    cancel: CancellationToken,
}

impl RpcTransport {
    /// Open a connection to `url`. Plain `ws://` and `http://` endpoints are
    /// allowed, matching local development nodes.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = open(url).await?;
        tracing::debug!(url, ?timeout, "Connected to substrate node");
        Ok(Self {
            client,
            url: Some(url.to_string()),
            timeout,
            cancel: CancellationToken::new(),
        })
    }

    /// Wrap an already-built client. Such a transport cannot [`reconnect`](Self::reconnect).
    pub fn from_client(client: RpcClient, timeout: Duration) -> Self {
        Self {
            client,
            url: None,
            timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the cancellation token; in-flight and future requests observe the new one.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Drop the current connection and open a new one to the same URL.
    pub async fn reconnect(&mut self) -> Result<(), TransportError> {
        let url = self.url.as_deref().ok_or(TransportError::NotReconnectable)?;
        tracing::warn!(url, "Reconnecting to substrate node");
        self.client = open(url).await?;
        Ok(())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: RpcParams,
    ) -> Result<T, TransportError> {
        tracing::trace!(method, "RPC request");
        let call = self.client.request::<T>(method, params);

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TransportError::Cancelled { method }),
            result = tokio::time::timeout(self.timeout, call) => match result {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(source)) => Err(TransportError::Rpc { method, source }),
                Err(_) => Err(TransportError::Timeout {
                    method,
                    timeout: self.timeout,
                }),
            },
        }
    }

    /// `state_getStorage`. Absent storage is `Ok(None)`.
    pub async fn get_storage(
        &self,
        key: &StorageKey,
        at: Option<&BlockHash>,
    ) -> Result<Option<Vec<u8>>, TransportError> {
        const METHOD: &str = "state_getStorage";
        let value: Option<String> = self
            .request(METHOD, rpc_params![key.to_hex(), at.map(|h| h.to_string())])
            .await?;
        value.map(|hex| decode_hex(METHOD, &hex)).transpose()
    }

    /// `state_getKeys` under `prefix`.
    pub async fn get_keys(
        &self,
        prefix: &StorageKey,
        at: Option<&BlockHash>,
    ) -> Result<Vec<Vec<u8>>, TransportError> {
        const METHOD: &str = "state_getKeys";
        let keys: Vec<String> = self
            .request(METHOD, rpc_params![prefix.to_hex(), at.map(|h| h.to_string())])
            .await?;
        keys.iter().map(|hex| decode_hex(METHOD, hex)).collect()
    }

    /// `state_getStorageSize`. Absent storage is `Ok(None)`.
    pub async fn get_storage_size(
        &self,
        key: &StorageKey,
        at: Option<&BlockHash>,
    ) -> Result<Option<u64>, TransportError> {
        self.request(
            "state_getStorageSize",
            rpc_params![key.to_hex(), at.map(|h| h.to_string())],
        )
        .await
    }

    /// `chain_getBlockHash`; `None` height means the best block.
    pub async fn get_block_hash(
        &self,
        height: Option<u32>,
    ) -> Result<Option<BlockHash>, TransportError> {
        const METHOD: &str = "chain_getBlockHash";
        let hash: Option<String> = self.request(METHOD, rpc_params![height]).await?;
        hash.map(|h| {
            h.parse::<BlockHash>()
                .map_err(|reason| TransportError::InvalidResponse { method: METHOD, reason })
        })
        .transpose()
    }

    /// `chain_getHeader`; `None` hash means the best block.
    pub async fn get_header(
        &self,
        hash: Option<&BlockHash>,
    ) -> Result<Option<Header>, TransportError> {
        const METHOD: &str = "chain_getHeader";
        let header: Option<Value> = self
            .request(METHOD, rpc_params![hash.map(|h| h.to_string())])
            .await?;
        let Some(header) = header else {
            return Ok(None);
        };

        let number = header
            .get("number")
            .ok_or_else(|| TransportError::InvalidResponse {
                method: METHOD,
                reason: "header has no number".to_string(),
            })
            .and_then(|n| {
                parse_block_number_from_json(n)
                    .map_err(|reason| TransportError::InvalidResponse { method: METHOD, reason })
            })?;
        let number = u32::try_from(number).map_err(|_| TransportError::InvalidResponse {
            method: METHOD,
            reason: format!("block number {} does not fit in u32", number),
        })?;

        Ok(Some(Header { number }))
    }

    /// `state_getMetadata`: the SCALE encoded, `meta`-prefixed runtime metadata.
    pub async fn get_metadata(&self, at: Option<&BlockHash>) -> Result<Vec<u8>, TransportError> {
        const METHOD: &str = "state_getMetadata";
        let metadata: String = self
            .request(METHOD, rpc_params![at.map(|h| h.to_string())])
            .await?;
        decode_hex(METHOD, &metadata)
    }

    pub async fn get_runtime_version(
        &self,
        at: Option<&BlockHash>,
    ) -> Result<RuntimeVersion, TransportError> {
        self.request(
            "state_getRuntimeVersion",
            rpc_params![at.map(|h| h.to_string())],
        )
        .await
    }
}

async fn open(url: &str) -> Result<RpcClient, TransportError> {
    let secure = url.starts_with("wss://") || url.starts_with("https://");
    let result = if secure {
        RpcClient::from_url(url).await
    } else {
        RpcClient::from_insecure_url(url).await
    };
    result.map_err(|source| TransportError::Connect {
        url: url.to_string(),
        source,
    })
}

fn decode_hex(method: &'static str, value: &str) -> Result<Vec<u8>, TransportError> {
    from_hex(value).map_err(|e| TransportError::InvalidResponse {
        method,
        reason: e.to_string(),
    })
}
