// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

mod args;
mod chain;
mod error;
mod log;
mod substrate;

pub use args::Args;
pub use chain::ChainConfig;
pub use error::ConfigError;
pub use log::LogConfig;
pub use substrate::SubstrateConfig;

use serde::Deserialize;
use std::path::Path;

/// Environment variable prefix shared by every setting.
pub const ENV_PREFIX: &str = "GOV_";

/// Flat view of the environment, as `envy` sees it.
///
/// `envy` cannot populate nested structs, so every variable lands here first
/// and is then split into the typed sections of [`DecoderConfig`].
#[derive(Debug, Default, Deserialize)]
struct EnvConfig {
    substrate_url: Option<String>,
    substrate_request_timeout_ms: Option<u64>,
    substrate_operation_timeout_ms: Option<u64>,

    log_level: Option<String>,
    log_json: Option<bool>,
    log_strip_ansi: Option<bool>,
    log_write: Option<bool>,
    log_write_path: Option<String>,
    log_write_max_file_size: Option<u64>,
    log_write_max_files: Option<usize>,

    chain_ss58_prefix: Option<u16>,
    chain_origins_pallet_index: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    pub substrate: SubstrateConfig,
    pub log: LogConfig,
    pub chain: ChainConfig,
}

impl DecoderConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Load a `.env` file (if it exists) into the process environment, then
    /// read the configuration from it.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            dotenv::from_path(path).map_err(|source| ConfigError::EnvFileError {
                path: path.display().to_string(),
                source,
            })?;
        }
        Self::from_env()
    }

    /// Build a configuration from an explicit set of `(name, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: EnvConfig = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        let config = Self::from(env);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.substrate.validate()?;
        self.log.validate()?;
        self.chain.validate()?;
        Ok(())
    }
}

impl From<EnvConfig> for DecoderConfig {
    fn from(env: EnvConfig) -> Self {
        let substrate_defaults = SubstrateConfig::default();
        let log_defaults = LogConfig::default();

        Self {
            substrate: SubstrateConfig {
                url: env.substrate_url.unwrap_or(substrate_defaults.url),
                request_timeout_ms: env
                    .substrate_request_timeout_ms
                    .unwrap_or(substrate_defaults.request_timeout_ms),
                operation_timeout_ms: env
                    .substrate_operation_timeout_ms
                    .unwrap_or(substrate_defaults.operation_timeout_ms),
            },
            log: LogConfig {
                level: env.log_level.unwrap_or(log_defaults.level),
                json: env.log_json.unwrap_or(log_defaults.json),
                strip_ansi: env.log_strip_ansi.unwrap_or(log_defaults.strip_ansi),
                write: env.log_write.unwrap_or(log_defaults.write),
                write_path: env.log_write_path.unwrap_or(log_defaults.write_path),
                write_max_file_size: env
                    .log_write_max_file_size
                    .unwrap_or(log_defaults.write_max_file_size),
                write_max_files: env
                    .log_write_max_files
                    .unwrap_or(log_defaults.write_max_files),
            },
            chain: ChainConfig {
                ss58_prefix: env.chain_ss58_prefix,
                origins_pallet_index: env.chain_origins_pallet_index,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = DecoderConfig::default();
        assert_eq!(config.substrate.url, "ws://127.0.0.1:9944");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.chain.ss58_prefix, None);
    }

    #[test]
    fn test_from_vars_empty_uses_defaults() {
        let config = DecoderConfig::from_vars(Vec::new()).unwrap();
        assert_eq!(config.substrate.url, "ws://127.0.0.1:9944");
        assert_eq!(config.substrate.request_timeout_ms, 30_000);
        assert!(!config.log.json);
    }

    #[test]
    fn test_from_vars_reads_prefixed_values() {
        let config = DecoderConfig::from_vars(vars(&[
            ("GOV_SUBSTRATE_URL", "wss://rpc.polkadot.io"),
            ("GOV_SUBSTRATE_REQUEST_TIMEOUT_MS", "5000"),
            ("GOV_SUBSTRATE_OPERATION_TIMEOUT_MS", "20000"),
            ("GOV_LOG_LEVEL", "debug"),
            ("GOV_LOG_JSON", "true"),
            ("GOV_CHAIN_SS58_PREFIX", "2"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.substrate.url, "wss://rpc.polkadot.io");
        assert_eq!(config.substrate.request_timeout_ms, 5000);
        assert_eq!(config.substrate.operation_timeout_ms, 20_000);
        assert_eq!(config.log.level, "debug");
        assert!(config.log.json);
        assert_eq!(config.chain.ss58_prefix, Some(2));
    }

    #[test]
    fn test_from_vars_rejects_invalid_level() {
        let result = DecoderConfig::from_vars(vars(&[("GOV_LOG_LEVEL", "loud")]));
        assert!(matches!(result, Err(ConfigError::ValidateError(_))));
    }

    #[test]
    fn test_from_vars_rejects_unparsable_number() {
        let result = DecoderConfig::from_vars(vars(&[("GOV_CHAIN_SS58_PREFIX", "polkadot")]));
        assert!(matches!(result, Err(ConfigError::EnvError(_))));
    }

    /// Removes the listed variables when dropped, so a failed assertion
    /// does not leak them into later tests.
    struct EnvVarsGuard(&'static [&'static str]);

    impl Drop for EnvVarsGuard {
        fn drop(&mut self) {
            for name in self.0 {
                // SAFETY: callers are `#[serial]`, no other thread reads the environment.
                unsafe { std::env::remove_var(name) };
            }
        }
    }

    #[test]
    #[serial]
    fn test_from_env_file() {
        let _guard = EnvVarsGuard(&["GOV_SUBSTRATE_URL", "GOV_CHAIN_SS58_PREFIX"]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GOV_SUBSTRATE_URL=ws://kusama:9944").unwrap();
        writeln!(file, "GOV_CHAIN_SS58_PREFIX=2").unwrap();

        let config = DecoderConfig::from_env_file(file.path()).unwrap();
        assert_eq!(config.substrate.url, "ws://kusama:9944");
        assert_eq!(config.chain.ss58_prefix, Some(2));
    }

    #[test]
    #[serial]
    fn test_from_env_file_missing_file_is_ignored() {
        let config = DecoderConfig::from_env_file("/nonexistent/.env.governance").unwrap();
        assert_eq!(config.chain.origins_pallet_index, None);
    }
}
