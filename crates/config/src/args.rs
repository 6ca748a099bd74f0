// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to .env file (e.g., .env.polkadot)
    #[arg(short, long, default_value = ".env")]
    pub env_file: String,

    /// Referendum index to decode
    pub ref_id: u32,

    /// Also decode the proposal preimage and list the addresses it touches
    #[arg(short, long)]
    pub preimage: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
