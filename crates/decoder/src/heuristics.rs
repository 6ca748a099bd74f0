// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Last-resort account id scanner.
//!
//! Used when a layout is not understood: any 32-byte run that "looks like" a
//! public key is reported. Results are never authoritative.

use crate::consts::heuristic::{
    MAX_ADDRESS_LEN, MAX_NON_ZERO, MIN_ADDRESS_LEN, MIN_NON_ZERO, WINDOW,
};
use crate::ss58::AccountId;

/// Whether `window` is plausibly an account id.
///
/// Zero-padded integers have too few non-zero bytes, and hashes or
/// signatures rarely have more than 30 in a 32-byte window of real keys.
pub fn looks_like_account(window: &[u8; 32], ss58_prefix: u16) -> bool {
    let non_zero = window.iter().filter(|b| **b != 0).count();
    if !(MIN_NON_ZERO..=MAX_NON_ZERO).contains(&non_zero) {
        return false;
    }
    let rendered = AccountId(*window).to_ss58(ss58_prefix).len();
    (MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&rendered)
}

/// Slide over `bytes` and collect every window accepted by
/// [`looks_like_account`]. After a match the scan resumes past it.
pub fn scan_account_ids(bytes: &[u8], ss58_prefix: u16) -> Vec<AccountId> {
    let mut found = Vec::new();
    let mut pos = 0;

    while pos + WINDOW <= bytes.len() {
        let mut window = [0u8; WINDOW];
        window.copy_from_slice(&bytes[pos..pos + WINDOW]);

        if looks_like_account(&window, ss58_prefix) {
            found.push(AccountId(window));
            pos += WINDOW;
        } else {
            pos += 1;
        }
    }

    if !found.is_empty() {
        tracing::warn!(
            count = found.len(),
            scanned = bytes.len(),
            "Recovered account ids by byte scan"
        );
    }

    found
}

/// First plausible account id in `bytes`, if any.
pub fn first_account_id(bytes: &[u8], ss58_prefix: u16) -> Option<AccountId> {
    scan_account_ids(bytes, ss58_prefix).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_like(seed: u8) -> [u8; 32] {
        // 20 non-zero bytes, 12 zero bytes.
        let mut key = [0u8; 32];
        for (i, byte) in key.iter_mut().enumerate().take(20) {
            *byte = seed.wrapping_add(i as u8) | 1;
        }
        key
    }

    #[test]
    fn test_finds_leading_key() {
        let key = key_like(0x40);
        let mut bytes = key.to_vec();
        bytes.extend_from_slice(&[0u8; 5]);

        assert_eq!(scan_account_ids(&bytes, 42), vec![AccountId(key)]);
    }

    #[test]
    fn test_skips_past_match() {
        let first = key_like(0x10);
        let second = key_like(0x90);
        let mut bytes = first.to_vec();
        bytes.extend_from_slice(&second);

        assert_eq!(
            scan_account_ids(&bytes, 0),
            vec![AccountId(first), AccountId(second)]
        );
    }

    #[test]
    fn test_rejects_sparse_and_dense_windows() {
        let mut sparse = [0u8; 32];
        sparse[..5].copy_from_slice(&[1, 2, 3, 4, 5]);
        assert!(!looks_like_account(&sparse, 42));

        let dense = [0xffu8; 32];
        assert!(!looks_like_account(&dense, 42));

        assert!(scan_account_ids(&[0u8; 64], 42).is_empty());
    }

    #[test]
    fn test_short_input_yields_nothing() {
        assert!(scan_account_ids(&[0xaa; 31], 42).is_empty());
        assert_eq!(first_account_id(&[], 42), None);
    }
}
