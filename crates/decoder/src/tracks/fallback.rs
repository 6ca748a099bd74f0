// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Static Polkadot OpenGov track table, used when runtime metadata is
//! unavailable or cannot be decoded.
//!
//! Periods are in 6-second blocks. Curves are linear approximations of the
//! runtime curves' end points.

use super::{Curve, TrackInfo};

const DOT: u128 = 10_000_000_000;
const PERBILL: u32 = 1_000_000_000;

const MINUTES: u32 = 10;
const HOURS: u32 = 60 * MINUTES;
const DAYS: u32 = 24 * HOURS;

fn percent(p: u32) -> u32 {
    p * (PERBILL / 100)
}

fn linear(floor_percent: u32, ceil_percent: u32) -> Curve {
    Curve::LinearDecreasing {
        length: PERBILL,
        floor: percent(floor_percent),
        ceil: percent(ceil_percent),
    }
}

#[allow(clippy::too_many_arguments)]
fn track(
    id: u16,
    name: &str,
    max_deciding: u32,
    decision_deposit: u128,
    prepare_period: u32,
    decision_period: u32,
    confirm_period: u32,
    min_enactment_period: u32,
    min_approval: Curve,
    min_support: Curve,
) -> TrackInfo {
    TrackInfo {
        id,
        name: name.to_string(),
        max_deciding,
        decision_deposit,
        prepare_period,
        decision_period,
        confirm_period,
        min_enactment_period,
        min_approval,
        min_support,
    }
}

/// The Polkadot relay chain track table.
#[rustfmt::skip]
pub fn polkadot_tracks() -> Vec<TrackInfo> {
    vec![
        track(0, "root", 1, 100_000 * DOT, 2 * HOURS, 28 * DAYS, DAYS, DAYS, linear(50, 100), linear(0, 50)),
        track(1, "whitelisted_caller", 100, 10_000 * DOT, 30 * MINUTES, 28 * DAYS, 10 * MINUTES, 10 * MINUTES, linear(50, 100), linear(0, 1)),
        track(2, "wish_for_change", 10, 20_000 * DOT, 2 * HOURS, 28 * DAYS, DAYS, 10 * MINUTES, linear(50, 100), linear(0, 50)),
        track(10, "staking_admin", 10, 5_000 * DOT, 2 * HOURS, 28 * DAYS, 3 * HOURS, 10 * MINUTES, linear(50, 100), linear(0, 50)),
        track(11, "treasurer", 10, 1_000 * DOT, 2 * HOURS, 28 * DAYS, 7 * DAYS, DAYS, linear(50, 100), linear(0, 50)),
        track(12, "lease_admin", 10, 5_000 * DOT, 2 * HOURS, 28 * DAYS, 3 * HOURS, 10 * MINUTES, linear(50, 100), linear(0, 50)),
        track(13, "fellowship_admin", 10, 5_000 * DOT, 2 * HOURS, 28 * DAYS, 3 * HOURS, 10 * MINUTES, linear(50, 100), linear(0, 50)),
        track(14, "general_admin", 10, 5_000 * DOT, 2 * HOURS, 28 * DAYS, 3 * HOURS, 10 * MINUTES, linear(50, 100), linear(0, 50)),
        track(15, "auction_admin", 10, 5_000 * DOT, 2 * HOURS, 28 * DAYS, 3 * HOURS, 10 * MINUTES, linear(50, 100), linear(0, 50)),
        track(20, "referendum_canceller", 1_000, 10_000 * DOT, 2 * HOURS, 7 * DAYS, 3 * HOURS, 10 * MINUTES, linear(50, 100), linear(0, 50)),
        track(21, "referendum_killer", 1_000, 50_000 * DOT, 2 * HOURS, 28 * DAYS, 3 * HOURS, 10 * MINUTES, linear(50, 100), linear(0, 50)),
        track(30, "small_tipper", 200, DOT, MINUTES, 7 * DAYS, 10 * MINUTES, MINUTES, linear(50, 100), linear(0, 50)),
        track(31, "big_tipper", 100, 10 * DOT, 10 * MINUTES, 7 * DAYS, HOURS, 10 * MINUTES, linear(50, 100), linear(0, 50)),
        track(32, "small_spender", 50, 100 * DOT, 4 * HOURS, 28 * DAYS, 12 * HOURS, DAYS, linear(50, 100), linear(0, 50)),
        track(33, "medium_spender", 50, 200 * DOT, 4 * HOURS, 28 * DAYS, DAYS, DAYS, linear(50, 100), linear(0, 50)),
        track(34, "big_spender", 50, 400 * DOT, 4 * HOURS, 28 * DAYS, 2 * DAYS, DAYS, linear(50, 100), linear(0, 50)),
    ]
}
