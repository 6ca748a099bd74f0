// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use governance_decoder::GovernanceClient;
use governance_decoder::logging::{self, LoggingConfig};
use polkadot_governance_decoder_config::{Args, DecoderConfig};
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_args();
    let config = DecoderConfig::from_env_file(&args.env_file)?;
    let _log_guard = logging::init_with_config(LoggingConfig::from(&config.log))?;

    tracing::info!("Substrate URL: {}", config.substrate.url);
    let client = GovernanceClient::connect(&config).await?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    let info = client.get_referendum_info(args.ref_id, &cancel).await?;
    let output = if args.preimage {
        let addresses = match client.addresses_for(&info, &cancel).await {
            Ok(addresses) => Some(addresses),
            Err(e) => {
                tracing::warn!(ref_id = args.ref_id, error = %e, "Preimage addresses unavailable");
                None
            }
        };
        json!({ "referendum": info, "preimageAddresses": addresses })
    } else {
        serde_json::to_value(&info)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
