use alloy::primitives::U256;

use crate::service::route::Route;
use crate::service::types::{Token, TokenAmount, TradeDirection, VenueKind};
use crate::service::{ServiceError, ServiceResult};

/// One route quoted in one direction: a fixed side (the user's amount) and
/// a quoted side (what the pools return for it).
#[derive(Debug, Clone)]
pub struct QuotedLeg {
    route: Route,
    direction: TradeDirection,
    input: TokenAmount,
    output: TokenAmount,
}

impl QuotedLeg {
    /// Quotes the route forward: `amount_in` is fixed, the output is quoted.
    pub fn exact_input(route: Route, amount_in: U256) -> ServiceResult<Self> {
        let amount_out = route.quote_exact_input(amount_in)?;
        let input = TokenAmount::new(*route.input(), amount_in);
        let output = TokenAmount::new(*route.output(), amount_out);
        Ok(Self {
            route,
            direction: TradeDirection::ExactInput,
            input,
            output,
        })
    }

    /// Quotes the route backward: `amount_out` is fixed, the input is quoted.
    pub fn exact_output(route: Route, amount_out: U256) -> ServiceResult<Self> {
        let amount_in = route.quote_exact_output(amount_out)?;
        let input = TokenAmount::new(*route.input(), amount_in);
        let output = TokenAmount::new(*route.output(), amount_out);
        Ok(Self {
            route,
            direction: TradeDirection::ExactOutput,
            input,
            output,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn direction(&self) -> TradeDirection {
        self.direction
    }

    pub fn input(&self) -> &TokenAmount {
        &self.input
    }

    pub fn output(&self) -> &TokenAmount {
        &self.output
    }

    pub fn venue(&self) -> VenueKind {
        self.route.venue()
    }
}

/// A set of quoted legs that agree on direction and endpoints. Legs are
/// alternatives over different venues, not splits of one amount; each leg
/// carries the full requested amount.
#[derive(Debug, Clone)]
pub struct Trade {
    legs: Vec<QuotedLeg>,
    direction: TradeDirection,
}

impl Trade {
    pub fn aggregate(legs: Vec<QuotedLeg>) -> ServiceResult<Self> {
        let first = legs.first().ok_or(ServiceError::EmptyTrade)?;
        let direction = first.direction();
        let input_token = first.input().token;
        let output_token = first.output().token;
        for leg in &legs[1..] {
            if leg.direction() != direction {
                return Err(ServiceError::DirectionMismatch);
            }
            if leg.input().token != input_token || leg.output().token != output_token {
                return Err(ServiceError::EndpointMismatch);
            }
        }
        Ok(Self { legs, direction })
    }

    pub fn legs(&self) -> &[QuotedLeg] {
        &self.legs
    }

    pub fn direction(&self) -> TradeDirection {
        self.direction
    }

    pub fn input_token(&self) -> &Token {
        &self.legs[0].input().token
    }

    pub fn output_token(&self) -> &Token {
        &self.legs[0].output().token
    }

    /// Largest input amount across legs. This is the native value that must
    /// accompany the calldata when the input token is the wrapped native
    /// asset, since every leg carries the full amount.
    pub fn notional_input(&self) -> U256 {
        self.legs
            .iter()
            .map(|leg| leg.input().raw)
            .max()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::pool::{Pool, PoolState};
    use crate::service::types::TokenPair;
    use alloy::primitives::{Address, address};

    const A: Address = address!("0x1111111111111111111111111111111111111111");
    const B: Address = address!("0x2222222222222222222222222222222222222222");
    const C: Address = address!("0x3333333333333333333333333333333333333333");

    fn token(addr: Address) -> Token {
        Token::new(1, addr, 18)
    }

    fn e18(units: u64) -> U256 {
        U256::from(units) * U256::from(10u64).pow(U256::from(18u8))
    }

    fn route(a: Address, b: Address) -> Route {
        let pair = TokenPair::new(token(a), token(b)).unwrap();
        let pool = Pool::new(
            pair,
            PoolState::ConstantProduct {
                reserve0: e18(1000),
                reserve1: e18(2000),
            },
        );
        Route::new(vec![pool], token(a), token(b)).unwrap()
    }

    #[test]
    fn exact_input_leg_fixes_the_input_side() {
        let leg = QuotedLeg::exact_input(route(A, B), e18(10)).unwrap();
        assert_eq!(leg.direction(), TradeDirection::ExactInput);
        assert_eq!(leg.input().raw, e18(10));
        assert!(leg.output().raw > U256::ZERO);
    }

    #[test]
    fn exact_output_leg_fixes_the_output_side() {
        let leg = QuotedLeg::exact_output(route(A, B), e18(10)).unwrap();
        assert_eq!(leg.direction(), TradeDirection::ExactOutput);
        assert_eq!(leg.output().raw, e18(10));
        assert!(leg.input().raw > U256::ZERO);
    }

    #[test]
    fn empty_trade_is_rejected() {
        assert!(matches!(
            Trade::aggregate(vec![]).unwrap_err(),
            ServiceError::EmptyTrade
        ));
    }

    #[test]
    fn mixed_directions_are_rejected() {
        let legs = vec![
            QuotedLeg::exact_input(route(A, B), e18(1)).unwrap(),
            QuotedLeg::exact_output(route(A, B), e18(1)).unwrap(),
        ];
        assert!(matches!(
            Trade::aggregate(legs).unwrap_err(),
            ServiceError::DirectionMismatch
        ));
    }

    #[test]
    fn mismatched_endpoints_are_rejected() {
        let legs = vec![
            QuotedLeg::exact_input(route(A, B), e18(1)).unwrap(),
            QuotedLeg::exact_input(route(A, C), e18(1)).unwrap(),
        ];
        assert!(matches!(
            Trade::aggregate(legs).unwrap_err(),
            ServiceError::EndpointMismatch
        ));
    }

    #[test]
    fn notional_is_largest_leg_input() {
        let legs = vec![
            QuotedLeg::exact_input(route(A, B), e18(1)).unwrap(),
            QuotedLeg::exact_input(route(A, B), e18(3)).unwrap(),
        ];
        let trade = Trade::aggregate(legs).unwrap();
        assert_eq!(trade.notional_input(), e18(3));
        assert_eq!(*trade.input_token(), token(A));
        assert_eq!(*trade.output_token(), token(B));
    }
}
