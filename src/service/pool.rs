use alloy::primitives::U256;

use crate::service::math::{
    self, V2_FEE_DENOMINATOR, V2_FEE_NUMERATOR, amount0_delta, amount1_delta, gross_of_fee,
    mul_div_floor, net_of_fee, next_sqrt_price_from_amount0_in, next_sqrt_price_from_amount1_in,
};
use crate::service::types::{Token, TokenPair, VenueKind};
use crate::service::{ServiceError, ServiceResult};

/// Venue-specific raw pricing inputs, snapshotted once per quote. Quotes
/// computed against the same snapshot are bit-identical; staleness is
/// accepted, not hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    ConstantProduct {
        reserve0: U256,
        reserve1: U256,
    },
    ConcentratedLiquidity {
        fee_pips: u32,
        liquidity: u128,
        sqrt_price_x96: U256,
        tick: i32,
    },
}

impl PoolState {
    pub fn venue(&self) -> VenueKind {
        match self {
            PoolState::ConstantProduct { .. } => VenueKind::ConstantProduct,
            PoolState::ConcentratedLiquidity { .. } => VenueKind::ConcentratedLiquidity,
        }
    }
}

/// A liquidity pool: a canonical token pair plus one state snapshot.
/// Pricing dispatches on the state tag.
#[derive(Debug, Clone, Copy)]
pub struct Pool {
    pair: TokenPair,
    state: PoolState,
}

impl Pool {
    pub fn new(pair: TokenPair, state: PoolState) -> Self {
        Self { pair, state }
    }

    pub fn pair(&self) -> &TokenPair {
        &self.pair
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn venue(&self) -> VenueKind {
        self.state.venue()
    }

    pub fn involves(&self, token: &Token) -> bool {
        self.pair.involves(token)
    }

    /// Fee tier of a concentrated-liquidity pool, if that is this pool's
    /// venue.
    pub fn fee_pips(&self) -> Option<u32> {
        match self.state {
            PoolState::ConcentratedLiquidity { fee_pips, .. } => Some(fee_pips),
            PoolState::ConstantProduct { .. } => None,
        }
    }

    /// Output amount for an exact input of `token_in`, truncated in the
    /// pool's favor.
    pub fn quote_exact_input(&self, token_in: &Token, amount_in: U256) -> ServiceResult<U256> {
        let zero_for_one = token_in == self.pair.token0();
        match self.state {
            PoolState::ConstantProduct { reserve0, reserve1 } => {
                let (reserve_in, reserve_out) = if zero_for_one {
                    (reserve0, reserve1)
                } else {
                    (reserve1, reserve0)
                };
                self.constant_product_out(amount_in, reserve_in, reserve_out)
            }
            PoolState::ConcentratedLiquidity {
                fee_pips,
                liquidity,
                sqrt_price_x96,
                tick,
            } => self.concentrated_out(fee_pips, liquidity, sqrt_price_x96, tick, amount_in, zero_for_one),
        }
    }

    /// Input amount required for an exact output of `token_out`, rounded
    /// up in the pool's favor.
    pub fn quote_exact_output(&self, token_out: &Token, amount_out: U256) -> ServiceResult<U256> {
        // Input is token0 exactly when the desired output is token1.
        let zero_for_one = token_out == self.pair.token1();
        match self.state {
            PoolState::ConstantProduct { reserve0, reserve1 } => {
                let (reserve_in, reserve_out) = if zero_for_one {
                    (reserve0, reserve1)
                } else {
                    (reserve1, reserve0)
                };
                self.constant_product_in(amount_out, reserve_in, reserve_out)
            }
            PoolState::ConcentratedLiquidity {
                fee_pips,
                liquidity,
                sqrt_price_x96,
                tick,
            } => self.concentrated_in(fee_pips, liquidity, sqrt_price_x96, tick, amount_out, zero_for_one),
        }
    }

    /// `floor(in·997·reserve_out / (reserve_in·1000 + in·997))`.
    fn constant_product_out(
        &self,
        amount_in: U256,
        reserve_in: U256,
        reserve_out: U256,
    ) -> ServiceResult<U256> {
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(self.insufficient_reserves());
        }
        let overflow = ServiceError::Overflow("constant-product output");
        let amount_in_with_fee = amount_in
            .checked_mul(U256::from(V2_FEE_NUMERATOR))
            .ok_or_else(|| overflow.clone())?;
        let denominator = reserve_in
            .checked_mul(U256::from(V2_FEE_DENOMINATOR))
            .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
            .ok_or_else(|| overflow.clone())?;
        mul_div_floor(amount_in_with_fee, reserve_out, denominator).ok_or(overflow)
    }

    /// Inverse form, rounded against the trader:
    /// `floor(reserve_in·out·1000 / ((reserve_out − out)·997)) + 1`.
    fn constant_product_in(
        &self,
        amount_out: U256,
        reserve_in: U256,
        reserve_out: U256,
    ) -> ServiceResult<U256> {
        if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
            return Err(self.insufficient_reserves());
        }
        let overflow = ServiceError::Overflow("constant-product input");
        let numerator = reserve_in
            .checked_mul(U256::from(V2_FEE_DENOMINATOR))
            .ok_or_else(|| overflow.clone())?;
        let denominator = (reserve_out - amount_out)
            .checked_mul(U256::from(V2_FEE_NUMERATOR))
            .ok_or_else(|| overflow.clone())?;
        mul_div_floor(numerator, amount_out, denominator)
            .and_then(|quotient| quotient.checked_add(U256::ONE))
            .ok_or(overflow)
    }

    fn concentrated_out(
        &self,
        fee_pips: u32,
        liquidity: u128,
        sqrt_price: U256,
        tick: i32,
        amount_in: U256,
        zero_for_one: bool,
    ) -> ServiceResult<U256> {
        if liquidity == 0 {
            return Err(self.insufficient_liquidity(fee_pips));
        }
        let (sqrt_lower, sqrt_upper) = self.active_range(fee_pips, tick)?;
        let overflow = ServiceError::Overflow("concentrated-liquidity output");

        let net = net_of_fee(amount_in, fee_pips).ok_or_else(|| overflow.clone())?;
        if zero_for_one {
            // Price moves down toward the lower bound of the active range.
            let new_sqrt_price = next_sqrt_price_from_amount0_in(sqrt_price, liquidity, net)
                .ok_or_else(|| overflow.clone())?;
            if new_sqrt_price < sqrt_lower {
                return Err(self.range_exceeded(fee_pips, amount_in));
            }
            amount1_delta(new_sqrt_price, sqrt_price, liquidity, false).ok_or(overflow)
        } else {
            let new_sqrt_price = next_sqrt_price_from_amount1_in(sqrt_price, liquidity, net)
                .ok_or_else(|| overflow.clone())?;
            if new_sqrt_price > sqrt_upper {
                return Err(self.range_exceeded(fee_pips, amount_in));
            }
            amount0_delta(sqrt_price, new_sqrt_price, liquidity, false).ok_or(overflow)
        }
    }

    fn concentrated_in(
        &self,
        fee_pips: u32,
        liquidity: u128,
        sqrt_price: U256,
        tick: i32,
        amount_out: U256,
        zero_for_one: bool,
    ) -> ServiceResult<U256> {
        if liquidity == 0 {
            return Err(self.insufficient_liquidity(fee_pips));
        }
        let (sqrt_lower, sqrt_upper) = self.active_range(fee_pips, tick)?;
        let overflow = ServiceError::Overflow("concentrated-liquidity input");

        let net_in = if zero_for_one {
            // Pulling token1 out moves the price down; round the move up so
            // the trader pays for every unit withdrawn.
            let delta = math::mul_div_ceil(amount_out, math::Q96, U256::from(liquidity))
                .ok_or_else(|| overflow.clone())?;
            let new_sqrt_price = sqrt_price
                .checked_sub(delta)
                .filter(|price| *price >= sqrt_lower)
                .ok_or_else(|| self.range_exceeded(fee_pips, amount_out))?;
            amount0_delta(new_sqrt_price, sqrt_price, liquidity, true)
        } else {
            let new_sqrt_price =
                next_sqrt_price_for_amount0_out(sqrt_price, liquidity, amount_out)
                    .filter(|price| *price <= sqrt_upper)
                    .ok_or_else(|| self.range_exceeded(fee_pips, amount_out))?;
            amount1_delta(sqrt_price, new_sqrt_price, liquidity, true)
        }
        .ok_or_else(|| overflow.clone())?;

        gross_of_fee(net_in, fee_pips).ok_or(overflow)
    }

    /// Sqrt-price bounds of the tick-spacing-aligned range containing the
    /// current tick. Crossing out of it is `RangeExceeded`, never a silent
    /// misprice.
    fn active_range(&self, fee_pips: u32, tick: i32) -> ServiceResult<(U256, U256)> {
        let spacing = math::tick_spacing_for_fee(fee_pips);
        let lower_tick = tick.div_euclid(spacing) * spacing;
        let upper_tick = lower_tick + spacing;
        let lower = math::sqrt_ratio_at_tick(lower_tick)
            .ok_or(ServiceError::Overflow("tick below supported range"))?;
        let upper = math::sqrt_ratio_at_tick(upper_tick)
            .ok_or(ServiceError::Overflow("tick above supported range"))?;
        Ok((lower, upper))
    }

    fn insufficient_reserves(&self) -> ServiceError {
        ServiceError::InsufficientReserves {
            token0: self.pair.token0().address,
            token1: self.pair.token1().address,
        }
    }

    fn insufficient_liquidity(&self, fee_pips: u32) -> ServiceError {
        ServiceError::InsufficientLiquidity {
            token0: self.pair.token0().address,
            token1: self.pair.token1().address,
            fee_pips,
        }
    }

    fn range_exceeded(&self, fee_pips: u32, amount: U256) -> ServiceError {
        ServiceError::RangeExceeded {
            token0: self.pair.token0().address,
            token1: self.pair.token1().address,
            fee_pips,
            amount,
        }
    }
}

/// New sqrt price when pulling an exact token0 output:
/// `ceil(L·Q96·sp / (L·Q96 − out·sp))`. `None` when the range cannot hold
/// the requested output.
fn next_sqrt_price_for_amount0_out(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_out: U256,
) -> Option<U256> {
    use alloy::primitives::U512;

    let l96 = U512::from(liquidity) * U512::from(math::Q96);
    let product = U512::from(amount_out) * U512::from(sqrt_price_x96);
    if product >= l96 {
        return None;
    }
    let denominator = l96 - product;
    let numerator = l96.checked_mul(U512::from(sqrt_price_x96))?;
    let (quotient, remainder) = numerator.div_rem(denominator);
    let rounded = if remainder.is_zero() {
        quotient
    } else {
        quotient + U512::ONE
    };
    let limbs = rounded.as_limbs();
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return None;
    }
    Some(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}
