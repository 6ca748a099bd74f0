// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

/// Pallet names as they appear in storage keys and metadata.
pub mod pallets {
    pub const REFERENDA: &str = "Referenda";
    pub const PREIMAGE: &str = "Preimage";
    pub const DEMOCRACY: &str = "Democracy";
    pub const SYSTEM: &str = "System";
}

/// Call indices for the pallets the call decoder understands.
///
/// The dispatch table is closed over these `(pallet, call)` pairs; anything
/// else decodes as [`crate::preimage::Call::Unknown`].
pub mod calls {
    pub const BALANCES: u8 = 0x05;
    pub const BALANCES_TRANSFER: u8 = 0x00;
    pub const BALANCES_TRANSFER_KEEP_ALIVE_CURRENT: u8 = 0x03;
    pub const BALANCES_TRANSFER_KEEP_ALIVE: u8 = 0x07;

    pub const STAKING: u8 = 0x06;
    pub const STAKING_BOND: u8 = 0x00;
    pub const STAKING_NOMINATE: u8 = 0x04;

    pub const TREASURY: u8 = 0x13;
    pub const TREASURY_SPEND: u8 = 0x03;

    pub const UTILITY: u8 = 0x18;
    pub const UTILITY_BATCH: u8 = 0x00;
    pub const UTILITY_AS_DERIVATIVE: u8 = 0x01;
    pub const UTILITY_BATCH_ALL: u8 = 0x02;
    pub const UTILITY_FORCE_BATCH: u8 = 0x04;

    pub const PROXY: u8 = 0x20;
    pub const PROXY_PROXY: u8 = 0x00;
}

/// `OriginCaller` indices of the Origins pallet on known relay chains.
/// Index 1 is what older snapshots used and is always accepted.
pub const ORIGINS_PALLET_INDICES: &[u8] = &[1, 22, 43];

/// SS58 prefix used when the chain does not report one.
pub const DEFAULT_SS58_PREFIX: u16 = 42;

/// Records at most this long, with a terminal variant byte, are treated as
/// pruned "cleared" markers when the full decode fails.
pub const CLEARED_MARKER_MAX_LEN: usize = 8;

/// Nesting limit for the call decoder (batches of proxies of batches...).
pub const MAX_CALL_DEPTH: usize = 16;

/// Bounds of the "looks like an account id" byte-scan heuristic.
pub mod heuristic {
    pub const WINDOW: usize = 32;
    pub const MIN_NON_ZERO: usize = 10;
    pub const MAX_NON_ZERO: usize = 30;
    pub const MIN_ADDRESS_LEN: usize = 41;
    pub const MAX_ADDRESS_LEN: usize = 49;
}
