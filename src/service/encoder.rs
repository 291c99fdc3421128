use alloy::primitives::{Address, Bytes, U256};
use tracing::instrument;

use crate::service::trade::{QuotedLeg, Trade};
use crate::service::types::{EncodedSwap, SwapOptions, TradeDirection, VenueKind};
use crate::service::{ServiceError, ServiceResult};

const FEE_TIER_BITS: u32 = 24;

/// Serializes quoted trades into the router's byte payload.
///
/// Layout, big-endian throughout:
/// direction tag (1B), leg count (1B); then per leg: venue tag (1B), path
/// length (1B), the token path (20B each), per-hop fee tiers (3B each,
/// concentrated legs only), amount (32B), slippage bound (32B), recipient
/// (20B).
#[derive(Debug, Clone, Copy)]
pub struct SwapEncoder {
    wrapped_native: Address,
}

impl SwapEncoder {
    pub fn new(wrapped_native: Address) -> Self {
        Self { wrapped_native }
    }

    #[instrument(skip(self, trade, options), fields(legs = trade.legs().len()))]
    pub fn encode(&self, trade: &Trade, options: &SwapOptions) -> ServiceResult<EncodedSwap> {
        let leg_count = u8::try_from(trade.legs().len())
            .map_err(|_| ServiceError::EncodingOverflow("leg count".to_string()))?;

        let mut payload = Vec::new();
        payload.push(trade.direction().tag());
        payload.push(leg_count);
        for leg in trade.legs() {
            self.encode_leg(&mut payload, leg, options)?;
        }

        // Native value rides along only when the user is spending the
        // wrapped-native asset; every leg carries the full amount, so the
        // value is the largest leg input.
        let value = if trade.input_token().address == self.wrapped_native {
            trade.notional_input()
        } else {
            U256::ZERO
        };

        Ok(EncodedSwap {
            calldata: Bytes::from(payload),
            value,
        })
    }

    fn encode_leg(
        &self,
        payload: &mut Vec<u8>,
        leg: &QuotedLeg,
        options: &SwapOptions,
    ) -> ServiceResult<()> {
        let path = leg.route().path();
        let path_len = u8::try_from(path.len())
            .map_err(|_| ServiceError::EncodingOverflow("path length".to_string()))?;

        payload.push(leg.venue().tag());
        payload.push(path_len);
        for token in path {
            payload.extend_from_slice(token.address.as_slice());
        }

        if leg.venue() == VenueKind::ConcentratedLiquidity {
            for pool in leg.route().pools() {
                let fee = pool.fee_pips().unwrap_or_default();
                if fee >= 1 << FEE_TIER_BITS {
                    return Err(ServiceError::EncodingOverflow(format!(
                        "fee tier {fee}"
                    )));
                }
                payload.extend_from_slice(&fee.to_be_bytes()[1..]);
            }
        }

        let (amount, bound) = match leg.direction() {
            TradeDirection::ExactInput => (
                leg.input().raw,
                options.slippage_tolerance.minimum_out(leg.output().raw)?,
            ),
            TradeDirection::ExactOutput => (
                leg.output().raw,
                options.slippage_tolerance.maximum_in(leg.input().raw)?,
            ),
        };
        payload.extend_from_slice(&amount.to_be_bytes::<32>());
        payload.extend_from_slice(&bound.to_be_bytes::<32>());
        payload.extend_from_slice(options.recipient.as_slice());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::pool::{Pool, PoolState};
    use crate::service::route::Route;
    use crate::service::types::{SlippageTolerance, Token, TokenPair};
    use alloy::primitives::address;
    use std::str::FromStr;

    const DAI: Address = address!("0x6B175474E89094C44Da98b954EedeAC495271d0F");
    const WETH: Address = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
    const RECIPIENT: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

    fn token(addr: Address) -> Token {
        Token::new(1, addr, 18)
    }

    fn e18(units: u64) -> U256 {
        U256::from(units) * U256::from(10u64).pow(U256::from(18u8))
    }

    fn options() -> SwapOptions {
        SwapOptions {
            slippage_tolerance: SlippageTolerance::new(50, 10_000).unwrap(),
            recipient: RECIPIENT,
        }
    }

    fn v2_route() -> Route {
        let pair = TokenPair::new(token(DAI), token(WETH)).unwrap();
        let pool = Pool::new(
            pair,
            PoolState::ConstantProduct {
                reserve0: e18(1000),
                reserve1: e18(2000),
            },
        );
        Route::new(vec![pool], token(DAI), token(WETH)).unwrap()
    }

    fn v3_route() -> Route {
        let pair = TokenPair::new(token(DAI), token(WETH)).unwrap();
        let pool = Pool::new(
            pair,
            PoolState::ConcentratedLiquidity {
                fee_pips: 3000,
                liquidity: 10u128.pow(21),
                sqrt_price_x96: U256::from_str("79347087983666005045280518415").unwrap(),
                tick: 30,
            },
        );
        Route::new(vec![pool], token(DAI), token(WETH)).unwrap()
    }

    /// Test-only decoder view of one leg.
    #[derive(Debug, PartialEq)]
    struct DecodedLeg {
        venue_tag: u8,
        path: Vec<Address>,
        fee_tiers: Vec<u32>,
        amount: U256,
        bound: U256,
        recipient: Address,
    }

    fn decode(bytes: &[u8]) -> (u8, Vec<DecodedLeg>) {
        let direction = bytes[0];
        let leg_count = bytes[1] as usize;
        let mut cursor = 2;
        let mut legs = Vec::with_capacity(leg_count);
        for _ in 0..leg_count {
            let venue_tag = bytes[cursor];
            let path_len = bytes[cursor + 1] as usize;
            cursor += 2;
            let mut path = Vec::with_capacity(path_len);
            for _ in 0..path_len {
                path.push(Address::from_slice(&bytes[cursor..cursor + 20]));
                cursor += 20;
            }
            let mut fee_tiers = Vec::new();
            if venue_tag == 0x01 {
                for _ in 0..path_len - 1 {
                    let raw = [0, bytes[cursor], bytes[cursor + 1], bytes[cursor + 2]];
                    fee_tiers.push(u32::from_be_bytes(raw));
                    cursor += 3;
                }
            }
            let amount = U256::from_be_slice(&bytes[cursor..cursor + 32]);
            cursor += 32;
            let bound = U256::from_be_slice(&bytes[cursor..cursor + 32]);
            cursor += 32;
            let recipient = Address::from_slice(&bytes[cursor..cursor + 20]);
            cursor += 20;
            legs.push(DecodedLeg {
                venue_tag,
                path,
                fee_tiers,
                amount,
                bound,
                recipient,
            });
        }
        assert_eq!(cursor, bytes.len(), "trailing bytes after last leg");
        (direction, legs)
    }

    #[test]
    fn exact_input_payload_round_trips() {
        let encoder = SwapEncoder::new(WETH);
        let leg = QuotedLeg::exact_input(v2_route(), e18(10)).unwrap();
        let trade = Trade::aggregate(vec![leg]).unwrap();
        let encoded = encoder.encode(&trade, &options()).unwrap();

        let (direction, decoded) = decode(&encoded.calldata);
        assert_eq!(direction, 0x00);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].venue_tag, 0x00);
        assert_eq!(decoded[0].path, vec![DAI, WETH]);
        assert!(decoded[0].fee_tiers.is_empty());
        assert_eq!(decoded[0].amount, e18(10));
        assert_eq!(
            decoded[0].bound,
            U256::from_str("19644444884501519847").unwrap()
        );
        assert_eq!(decoded[0].recipient, RECIPIENT);
    }

    #[test]
    fn concentrated_leg_carries_per_hop_fee_tiers() {
        let encoder = SwapEncoder::new(WETH);
        let amount = U256::from(10u64).pow(U256::from(17u8));
        let leg = QuotedLeg::exact_input(v3_route(), amount).unwrap();
        let trade = Trade::aggregate(vec![leg]).unwrap();
        let encoded = encoder.encode(&trade, &options()).unwrap();

        let (_, decoded) = decode(&encoded.calldata);
        assert_eq!(decoded[0].venue_tag, 0x01);
        assert_eq!(decoded[0].fee_tiers, vec![3000]);
    }

    #[test]
    fn exact_output_bound_is_maximum_in() {
        let encoder = SwapEncoder::new(WETH);
        let leg = QuotedLeg::exact_output(v2_route(), e18(19)).unwrap();
        let quoted_in = leg.input().raw;
        let trade = Trade::aggregate(vec![leg]).unwrap();
        let encoded = encoder.encode(&trade, &options()).unwrap();

        let (direction, decoded) = decode(&encoded.calldata);
        assert_eq!(direction, 0x01);
        assert_eq!(decoded[0].amount, e18(19));
        assert_eq!(
            decoded[0].bound,
            options()
                .slippage_tolerance
                .maximum_in(quoted_in)
                .unwrap()
        );
        assert!(decoded[0].bound >= quoted_in);
    }

    #[test]
    fn leg_count_beyond_a_byte_is_encoding_overflow() {
        let encoder = SwapEncoder::new(WETH);
        let leg = QuotedLeg::exact_input(v2_route(), e18(1)).unwrap();
        let legs = vec![leg; 256];
        let trade = Trade::aggregate(legs).unwrap();

        let err = encoder.encode(&trade, &options()).unwrap_err();
        let ServiceError::EncodingOverflow(field) = err else {
            panic!("expected EncodingOverflow, got {err:?}");
        };
        assert_eq!(field, "leg count");
    }

    #[test]
    fn value_attaches_only_for_wrapped_native_input() {
        let encoder = SwapEncoder::new(WETH);
        let dai_in = Trade::aggregate(vec![
            QuotedLeg::exact_input(v2_route(), e18(10)).unwrap(),
        ])
        .unwrap();
        assert_eq!(encoder.encode(&dai_in, &options()).unwrap().value, U256::ZERO);

        let weth_route = {
            let pair = TokenPair::new(token(DAI), token(WETH)).unwrap();
            let pool = Pool::new(
                pair,
                PoolState::ConstantProduct {
                    reserve0: e18(1000),
                    reserve1: e18(2000),
                },
            );
            Route::new(vec![pool], token(WETH), token(DAI)).unwrap()
        };
        let weth_in =
            Trade::aggregate(vec![QuotedLeg::exact_input(weth_route, e18(2)).unwrap()]).unwrap();
        assert_eq!(encoder.encode(&weth_in, &options()).unwrap().value, e18(2));
    }
}
