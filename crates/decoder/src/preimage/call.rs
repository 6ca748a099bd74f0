// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Call decoding over a closed `(pallet, call)` table.
//!
//! Every decode returns the call together with the number of bytes it used;
//! containers advance their cursor by exactly that count. Calls outside the
//! table become [`Call::Unknown`] and swallow the rest of their input.

use crate::codec::{CodecError, ScaleReader};
use crate::consts::{MAX_CALL_DEPTH, calls};
use crate::ss58::AccountId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Call nesting exceeds {0} levels")]
    TooDeep(usize),
}

/// `sp_runtime::MultiAddress`, the runtime's account lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiAddress {
    Id(AccountId),
    Index(u128),
    Raw(Vec<u8>),
    Address32([u8; 32]),
    Address20([u8; 20]),
}

impl MultiAddress {
    fn decode(reader: &mut ScaleReader<'_>) -> Result<Self, CodecError> {
        let offset = reader.offset();
        match reader.read_u8()? {
            0 => Ok(Self::Id(AccountId(reader.read_array()?))),
            1 => Ok(Self::Index(reader.read_compact()?)),
            2 => Ok(Self::Raw(reader.read_vec()?.to_vec())),
            3 => Ok(Self::Address32(reader.read_array()?)),
            4 => Ok(Self::Address20(reader.read_array()?)),
            byte => Err(CodecError::InvalidVariant {
                what: "multi address",
                byte,
                offset,
            }),
        }
    }

    /// The 32-byte account this lookup names directly, if any.
    pub fn account(&self) -> Option<AccountId> {
        match self {
            Self::Id(account) => Some(*account),
            Self::Address32(bytes) => Some(AccountId(*bytes)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardDestination {
    Staked,
    Stash,
    Controller,
    Account(AccountId),
    None,
}

impl RewardDestination {
    fn decode(reader: &mut ScaleReader<'_>) -> Result<Self, CodecError> {
        let offset = reader.offset();
        match reader.read_u8()? {
            0 => Ok(Self::Staked),
            1 => Ok(Self::Stash),
            2 => Ok(Self::Controller),
            3 => Ok(Self::Account(AccountId(reader.read_array()?))),
            4 => Ok(Self::None),
            byte => Err(CodecError::InvalidVariant {
                what: "reward destination",
                byte,
                offset,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Batch,
    BatchAll,
    ForceBatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `Balances.transfer*`
    Transfer { dest: MultiAddress, value: u128 },
    /// `Staking.bond`
    Bond {
        controller: MultiAddress,
        value: u128,
        payee: RewardDestination,
    },
    /// `Staking.nominate`
    Nominate { targets: Vec<MultiAddress> },
    /// `Treasury.spend`
    Spend {
        amount: u128,
        beneficiary: MultiAddress,
    },
    /// `Proxy.proxy`
    Proxy {
        real: MultiAddress,
        force_proxy_type: Option<u8>,
        call: Box<Call>,
    },
    /// `Utility.batch`, `batch_all` and `force_batch`. `error` is set when a
    /// nested call failed to decode; the calls before it are kept and `rest`
    /// holds the undecoded bytes from the failed call onwards.
    Batch {
        kind: BatchKind,
        calls: Vec<Call>,
        error: Option<CallError>,
        rest: Vec<u8>,
    },
    /// `Utility.as_derivative`
    AsDerivative { index: u16, call: Box<Call> },
    Unknown { pallet: u8, call: u8, args: Vec<u8> },
}

/// Decode one call from the front of `bytes`, returning it and the bytes used.
pub fn decode_call(bytes: &[u8]) -> Result<(Call, usize), CallError> {
    decode_call_at(bytes, 0)
}

fn decode_call_at(bytes: &[u8], depth: usize) -> Result<(Call, usize), CallError> {
    if depth >= MAX_CALL_DEPTH {
        return Err(CallError::TooDeep(MAX_CALL_DEPTH));
    }

    let mut reader = ScaleReader::new(bytes);
    let pallet = reader.read_u8()?;
    let call_index = reader.read_u8()?;

    let call = match (pallet, call_index) {
        (
            calls::BALANCES,
            calls::BALANCES_TRANSFER
            | calls::BALANCES_TRANSFER_KEEP_ALIVE_CURRENT
            | calls::BALANCES_TRANSFER_KEEP_ALIVE,
        ) => Call::Transfer {
            dest: MultiAddress::decode(&mut reader)?,
            value: reader.read_compact()?,
        },
        (calls::STAKING, calls::STAKING_BOND) => Call::Bond {
            controller: MultiAddress::decode(&mut reader)?,
            value: reader.read_compact()?,
            payee: RewardDestination::decode(&mut reader)?,
        },
        (calls::STAKING, calls::STAKING_NOMINATE) => {
            let count = reader.read_compact_len()?;
            let mut targets = Vec::with_capacity(count.min(reader.remaining()));
            for _ in 0..count {
                targets.push(MultiAddress::decode(&mut reader)?);
            }
            Call::Nominate { targets }
        }
        (calls::TREASURY, calls::TREASURY_SPEND) => Call::Spend {
            amount: reader.read_compact()?,
            beneficiary: MultiAddress::decode(&mut reader)?,
        },
        (calls::PROXY, calls::PROXY_PROXY) => {
            let real = MultiAddress::decode(&mut reader)?;
            let force_proxy_type = reader.read_option(|r| r.read_u8())?;
            let call = nested(&mut reader, depth)?;
            Call::Proxy {
                real,
                force_proxy_type,
                call: Box::new(call),
            }
        }
        (calls::UTILITY, calls::UTILITY_AS_DERIVATIVE) => {
            let index = reader.read_u16()?;
            let call = nested(&mut reader, depth)?;
            Call::AsDerivative {
                index,
                call: Box::new(call),
            }
        }
        (calls::UTILITY, calls::UTILITY_BATCH) => batch(&mut reader, BatchKind::Batch, depth)?,
        (calls::UTILITY, calls::UTILITY_BATCH_ALL) => {
            batch(&mut reader, BatchKind::BatchAll, depth)?
        }
        (calls::UTILITY, calls::UTILITY_FORCE_BATCH) => {
            batch(&mut reader, BatchKind::ForceBatch, depth)?
        }
        (pallet, call) => Call::Unknown {
            pallet,
            call,
            args: reader.read_rest().to_vec(),
        },
    };

    Ok((call, reader.offset()))
}

fn nested(reader: &mut ScaleReader<'_>, depth: usize) -> Result<Call, CallError> {
    let (call, used) = decode_call_at(reader.rest(), depth + 1)?;
    reader.skip(used)?;
    Ok(call)
}

fn batch(reader: &mut ScaleReader<'_>, kind: BatchKind, depth: usize) -> Result<Call, CallError> {
    let count = reader.read_compact_len()?;
    let mut calls = Vec::with_capacity(count.min(reader.remaining()));
    let mut error = None;
    let mut rest = Vec::new();

    for i in 0..count {
        match nested(reader, depth) {
            Ok(call) => calls.push(call),
            Err(e) => {
                tracing::debug!(index = i, count, error = %e, "Batched call did not decode");
                // Boundaries past this point are unknown.
                rest = reader.read_rest().to_vec();
                error = Some(e);
                break;
            }
        }
    }

    Ok(Call::Batch {
        kind,
        calls,
        error,
        rest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{ALICE, BOB, batch_call, transfer_call};

    #[test]
    fn test_transfer_variants() {
        for index in [0x00u8, 0x03, 0x07] {
            let mut bytes = vec![calls::BALANCES, index, 0x00];
            bytes.extend_from_slice(&ALICE);
            bytes.push(0x04); // compact 1

            let (call, used) = decode_call(&bytes).unwrap();
            assert_eq!(used, bytes.len());
            assert_eq!(
                call,
                Call::Transfer {
                    dest: MultiAddress::Id(AccountId(ALICE)),
                    value: 1
                }
            );
        }
    }

    #[test]
    fn test_batch_advances_by_consumed_bytes() {
        let bytes = batch_call(&[transfer_call(&ALICE, 10), transfer_call(&BOB, 20)]);
        let (call, used) = decode_call(&bytes).unwrap();
        assert_eq!(used, bytes.len());

        let Call::Batch {
            kind,
            calls,
            error,
            rest,
        } = call
        else {
            panic!("expected a batch");
        };
        assert_eq!(kind, BatchKind::Batch);
        assert!(error.is_none());
        assert!(rest.is_empty());
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            Call::Transfer {
                dest: MultiAddress::Id(AccountId(BOB)),
                value: 20
            }
        );
    }

    #[test]
    fn test_batch_keeps_calls_before_a_failure() {
        let mut bytes = batch_call(&[transfer_call(&ALICE, 10)]);
        // Claim three calls, provide one valid call and a truncated one.
        bytes[2] = 3 << 2;
        bytes.extend_from_slice(&[calls::BALANCES, 0x00, 0x00, 0x01]);

        let (call, used) = decode_call(&bytes).unwrap();
        assert_eq!(used, bytes.len());
        let Call::Batch {
            calls, error, rest, ..
        } = call
        else {
            panic!("expected a batch");
        };
        assert_eq!(calls.len(), 1);
        assert!(matches!(error, Some(CallError::Codec(_))));
        assert_eq!(rest, [0x05, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_staking_calls() {
        let mut bond = vec![calls::STAKING, calls::STAKING_BOND, 0x00];
        bond.extend_from_slice(&ALICE);
        bond.push(0x08); // compact 2
        bond.push(0x03);
        bond.extend_from_slice(&BOB);
        let (call, used) = decode_call(&bond).unwrap();
        assert_eq!(used, bond.len());
        assert_eq!(
            call,
            Call::Bond {
                controller: MultiAddress::Id(AccountId(ALICE)),
                value: 2,
                payee: RewardDestination::Account(AccountId(BOB)),
            }
        );

        let mut nominate = vec![calls::STAKING, calls::STAKING_NOMINATE, 0x0c];
        nominate.push(0x00);
        nominate.extend_from_slice(&ALICE);
        nominate.push(0x03);
        nominate.extend_from_slice(&BOB);
        nominate.extend_from_slice(&[0x01, 0x04]);
        let (call, _) = decode_call(&nominate).unwrap();
        assert_eq!(
            call,
            Call::Nominate {
                targets: vec![
                    MultiAddress::Id(AccountId(ALICE)),
                    MultiAddress::Address32(BOB),
                    MultiAddress::Index(1),
                ]
            }
        );
    }

    #[test]
    fn test_treasury_spend() {
        let mut bytes = vec![calls::TREASURY, calls::TREASURY_SPEND, 0x28, 0x00];
        bytes.extend_from_slice(&BOB);
        let (call, used) = decode_call(&bytes).unwrap();
        assert_eq!(used, bytes.len());
        assert_eq!(
            call,
            Call::Spend {
                amount: 10,
                beneficiary: MultiAddress::Id(AccountId(BOB))
            }
        );
    }

    #[test]
    fn test_proxy_and_derivative_nesting() {
        let mut proxy = vec![calls::PROXY, calls::PROXY_PROXY, 0x00];
        proxy.extend_from_slice(&ALICE);
        proxy.extend_from_slice(&[0x01, 0x02]);
        proxy.extend(transfer_call(&BOB, 5));

        let mut derivative = vec![calls::UTILITY, calls::UTILITY_AS_DERIVATIVE, 0x01, 0x00];
        derivative.extend(proxy);

        let (call, used) = decode_call(&derivative).unwrap();
        assert_eq!(used, derivative.len());
        let Call::AsDerivative { index, call } = call else {
            panic!("expected as_derivative");
        };
        assert_eq!(index, 1);
        let Call::Proxy {
            real,
            force_proxy_type,
            call,
        } = *call
        else {
            panic!("expected proxy");
        };
        assert_eq!(real.account(), Some(AccountId(ALICE)));
        assert_eq!(force_proxy_type, Some(2));
        assert!(matches!(*call, Call::Transfer { value: 5, .. }));
    }

    #[test]
    fn test_proxy_type_is_an_option() {
        let proxy = |type_bytes: &[u8]| {
            let mut bytes = vec![calls::PROXY, calls::PROXY_PROXY, 0x00];
            bytes.extend_from_slice(&ALICE);
            bytes.extend_from_slice(type_bytes);
            bytes.extend(transfer_call(&BOB, 5));
            bytes
        };

        // A zero byte reads the same either way.
        let (call, _) = decode_call(&proxy(&[0x00])).unwrap();
        assert!(matches!(call, Call::Proxy { force_proxy_type: None, .. }));

        // A bare proxy type byte is not a valid `Option` tag.
        assert_eq!(
            decode_call(&proxy(&[0x03])),
            Err(CallError::Codec(CodecError::InvalidVariant {
                what: "option",
                byte: 0x03,
                offset: 35,
            }))
        );
    }

    #[test]
    fn test_unknown_call_consumes_rest() {
        let bytes = [0x63, 0x01, 0xaa, 0xbb];
        let (call, used) = decode_call(&bytes).unwrap();
        assert_eq!(used, 4);
        assert_eq!(
            call,
            Call::Unknown {
                pallet: 0x63,
                call: 0x01,
                args: vec![0xaa, 0xbb]
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut bytes = transfer_call(&ALICE, 1);
        for _ in 0..MAX_CALL_DEPTH {
            let mut wrapper = vec![calls::UTILITY, calls::UTILITY_AS_DERIVATIVE, 0x00, 0x00];
            wrapper.extend(bytes);
            bytes = wrapper;
        }
        assert_eq!(decode_call(&bytes), Err(CallError::TooDeep(MAX_CALL_DEPTH)));
    }

    #[test]
    fn test_short_inputs() {
        assert!(decode_call(&[]).is_err());
        assert!(decode_call(&[calls::BALANCES]).is_err());
        assert!(decode_call(&[calls::BALANCES, 0x00, 0x09]).is_err());
        assert!(matches!(
            decode_call(&[calls::BALANCES, 0x00, 0x00]),
            Err(CallError::Codec(CodecError::InsufficientData { offset: 3, .. }))
        ));
    }

    #[test]
    fn test_multi_address_accounts() {
        assert_eq!(MultiAddress::Index(3).account(), None);
        assert_eq!(MultiAddress::Raw(vec![1]).account(), None);
        assert_eq!(MultiAddress::Address20([1; 20]).account(), None);
        assert_eq!(
            MultiAddress::Address32(ALICE).account(),
            Some(AccountId(ALICE))
        );
    }
}
