// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::ConfigError;

/// Largest prefix representable in the two-byte SS58 form.
const MAX_SS58_PREFIX: u16 = 16_383;

/// Chain-specific overrides for values otherwise read from the runtime.
#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    /// SS58 prefix used to render addresses, overriding `System.SS58Prefix`
    ///
    /// Env: GOV_CHAIN_SS58_PREFIX
    /// Default: unset (read from chain, 42 if unavailable)
    pub ss58_prefix: Option<u16>,

    /// Extra `OriginCaller` index that identifies the Origins pallet
    ///
    /// Env: GOV_CHAIN_ORIGINS_PALLET_INDEX
    /// Default: unset (Polkadot and Kusama indices are built in)
    pub origins_pallet_index: Option<u8>,
}

impl ChainConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = self.ss58_prefix {
            if prefix > MAX_SS58_PREFIX {
                return Err(ConfigError::ValidateError(format!(
                    "SS58 prefix {} is out of range (max {})",
                    prefix, MAX_SS58_PREFIX
                )));
            }
        }
        Ok(())
    }
}
