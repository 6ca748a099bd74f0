// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::ConfigError;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SubstrateConfig {
    /// Substrate node WebSocket or HTTP URL
    ///
    /// Env: GOV_SUBSTRATE_URL
    /// Valid schemes: ws://, wss://, http://, https://
    /// Default: ws://127.0.0.1:9944
    pub url: String,

    /// Upper bound for a single RPC request, in milliseconds
    ///
    /// Env: GOV_SUBSTRATE_REQUEST_TIMEOUT_MS
    /// Default: 30000
    pub request_timeout_ms: u64,

    /// Upper bound for one decoder operation (all of its RPC requests
    /// together), in milliseconds
    ///
    /// Env: GOV_SUBSTRATE_OPERATION_TIMEOUT_MS
    /// Default: 120000
    pub operation_timeout_ms: u64,
}

impl SubstrateConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Whether the URL uses a TLS scheme.
    pub fn is_secure(&self) -> bool {
        self.url.starts_with("wss://") || self.url.starts_with("https://")
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::ValidateError(
                "Substrate URL cannot be empty".to_string(),
            ));
        }

        let parsed = url::Url::parse(&self.url).map_err(|e| {
            ConfigError::ValidateError(format!("Invalid URL '{}': {}", self.url, e))
        })?;

        match parsed.scheme() {
            "ws" | "wss" | "http" | "https" => {}
            scheme => {
                return Err(ConfigError::ValidateError(format!(
                    "Invalid URL scheme '{}'. Must be ws://, wss://, http://, or https://",
                    scheme
                )));
            }
        }

        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ValidateError(
                "Request timeout cannot be 0".to_string(),
            ));
        }

        if self.operation_timeout_ms < self.request_timeout_ms {
            return Err(ConfigError::ValidateError(format!(
                "Operation timeout ({}ms) cannot be shorter than the request timeout ({}ms)",
                self.operation_timeout_ms, self.request_timeout_ms
            )));
        }

        Ok(())
    }
}

impl Default for SubstrateConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:9944".to_string(),
            request_timeout_ms: 30_000,
            operation_timeout_ms: 120_000,
        }
    }
}
