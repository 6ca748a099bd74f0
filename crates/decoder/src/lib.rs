// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod client;
pub mod codec;
pub mod constants;
pub mod consts;
pub mod hashing;
pub mod heuristics;
pub mod logging;
pub mod preimage;
pub mod referenda;
pub mod rpc;
pub mod ss58;
pub mod storage_key;
pub mod tracks;
pub mod types;

pub use client::{GovernanceClient, get_preimage_addresses, get_referendum_info};

#[cfg(test)]
pub mod test_fixtures;
