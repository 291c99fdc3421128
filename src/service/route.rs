use alloy::primitives::U256;

use crate::service::pool::Pool;
use crate::service::types::{Token, VenueKind};
use crate::service::{ServiceError, ServiceResult};

/// An ordered chain of pools connecting an input token to an output token.
///
/// Construction walks the pools from the declared input: each pool must
/// involve the running token, and the walk must terminate at the declared
/// output. The token path (one entry per hop boundary) is derived during
/// the walk, never supplied.
#[derive(Debug, Clone)]
pub struct Route {
    pools: Vec<Pool>,
    path: Vec<Token>,
    input: Token,
    output: Token,
}

impl Route {
    pub fn new(pools: Vec<Pool>, input: Token, output: Token) -> ServiceResult<Self> {
        if pools.is_empty() {
            return Err(ServiceError::EndpointMismatch);
        }
        let mut path = vec![input];
        let mut current = input;
        for (position, pool) in pools.iter().enumerate() {
            let next = pool
                .pair()
                .other(&current)
                .ok_or(ServiceError::DisconnectedRoute { position })?;
            current = *next;
            path.push(current);
        }
        if current != output {
            return Err(ServiceError::EndpointMismatch);
        }
        Ok(Self {
            pools,
            path,
            input,
            output,
        })
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// Token path from input to output, inclusive; length is pools + 1.
    pub fn path(&self) -> &[Token] {
        &self.path
    }

    pub fn input(&self) -> &Token {
        &self.input
    }

    pub fn output(&self) -> &Token {
        &self.output
    }

    /// Venue of the route, taken from its first pool. Mixed-venue routes
    /// are not constructed by this service.
    pub fn venue(&self) -> VenueKind {
        self.pools[0].venue()
    }

    /// Folds an exact input forward through every hop. Each hop's output
    /// becomes the next hop's input.
    pub fn quote_exact_input(&self, amount_in: U256) -> ServiceResult<U256> {
        let mut amount = amount_in;
        for (hop, pool) in self.pools.iter().enumerate() {
            amount = pool.quote_exact_input(&self.path[hop], amount)?;
        }
        Ok(amount)
    }

    /// Folds an exact output backward through every hop. Each hop's
    /// required input becomes the previous hop's required output.
    pub fn quote_exact_output(&self, amount_out: U256) -> ServiceResult<U256> {
        let mut amount = amount_out;
        for (hop, pool) in self.pools.iter().enumerate().rev() {
            amount = pool.quote_exact_output(&self.path[hop + 1], amount)?;
        }
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::pool::PoolState;
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

    fn v2_pool(a: Address, b: Address, reserve0: U256, reserve1: U256) -> Pool {
        let pair = TokenPair::new(token(a), token(b)).unwrap();
        Pool::new(pair, PoolState::ConstantProduct { reserve0, reserve1 })
    }

    #[test]
    fn single_hop_path_has_both_endpoints() {
        let route = Route::new(
            vec![v2_pool(A, B, e18(1000), e18(2000))],
            token(A),
            token(B),
        )
        .unwrap();
        assert_eq!(route.path(), &[token(A), token(B)]);
        assert_eq!(route.venue(), VenueKind::ConstantProduct);
    }

    #[test]
    fn two_hop_walk_derives_intermediate_token() {
        let pools = vec![
            v2_pool(A, B, e18(1000), e18(1000)),
            v2_pool(B, C, e18(1000), e18(1000)),
        ];
        let route = Route::new(pools, token(A), token(C)).unwrap();
        assert_eq!(route.path(), &[token(A), token(B), token(C)]);
    }

    #[test]
    fn out_of_order_pools_are_disconnected() {
        // [B/C, A/B] walked from A: the first pool does not involve A.
        let pools = vec![
            v2_pool(B, C, e18(1000), e18(1000)),
            v2_pool(A, B, e18(1000), e18(1000)),
        ];
        let err = Route::new(pools, token(A), token(C)).unwrap_err();
        assert!(matches!(err, ServiceError::DisconnectedRoute { position: 0 }));
    }

    #[test]
    fn wrong_terminal_token_is_endpoint_mismatch() {
        let pools = vec![v2_pool(A, B, e18(1000), e18(1000))];
        let err = Route::new(pools, token(A), token(C)).unwrap_err();
        assert!(matches!(err, ServiceError::EndpointMismatch));
    }

    #[test]
    fn empty_route_is_rejected() {
        let err = Route::new(vec![], token(A), token(B)).unwrap_err();
        assert!(matches!(err, ServiceError::EndpointMismatch));
    }

    #[test]
    fn multi_hop_quote_folds_hop_outputs() {
        let pools = vec![
            v2_pool(A, B, e18(1000), e18(2000)),
            v2_pool(B, C, e18(2000), e18(1000)),
        ];
        let route = Route::new(pools.clone(), token(A), token(C)).unwrap();

        let first = pools[0].quote_exact_input(&token(A), e18(10)).unwrap();
        let second = pools[1].quote_exact_input(&token(B), first).unwrap();
        assert_eq!(route.quote_exact_input(e18(10)).unwrap(), second);
    }

    #[test]
    fn exact_output_quote_covers_the_request() {
        let route = Route::new(
            vec![
                v2_pool(A, B, e18(1000), e18(2000)),
                v2_pool(B, C, e18(2000), e18(1000)),
            ],
            token(A),
            token(C),
        )
        .unwrap();
        let want_out = e18(5);
        let need_in = route.quote_exact_output(want_out).unwrap();
        assert!(route.quote_exact_input(need_in).unwrap() >= want_out);
    }
}
