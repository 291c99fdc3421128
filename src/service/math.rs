//! Integer helpers for the pricing path.
//!
//! Everything here is exact arbitrary-precision arithmetic: products are
//! widened to `U512` before dividing, and every rounding direction is
//! explicit so callers can bias in the pool's favor.

use alloy::primitives::{U256, U512, uint};

/// 2^96, the fixed-point scale of concentrated-liquidity sqrt prices.
pub(crate) const Q96: U256 = uint!(0x1000000000000000000000000_U256);

/// Fee denominator for concentrated-liquidity fee tiers (pips).
pub(crate) const PIPS: u32 = 1_000_000;

/// Constant-product fee: 0.3% taken from the input, expressed as 997/1000.
pub(crate) const V2_FEE_NUMERATOR: u64 = 997;
pub(crate) const V2_FEE_DENOMINATOR: u64 = 1000;

pub(crate) const MIN_TICK: i32 = -887272;
pub(crate) const MAX_TICK: i32 = 887272;

/// Tick multipliers for `sqrt_ratio_at_tick`, Q128.128 fixed point.
const TICK_MULTIPLIERS: [U256; 19] = [
    uint!(0xfff97272373d413259a46990580e213a_U256),
    uint!(0xfff2e50f5f656932ef12357cf3c7fdcc_U256),
    uint!(0xffe5caca7e10e4e61c3624eaa0941cd0_U256),
    uint!(0xffcb9843d60f6159c9db58835c926644_U256),
    uint!(0xff973b41fa98c081472e6896dfb254c0_U256),
    uint!(0xff2ea16466c96a3843ec78b326b52861_U256),
    uint!(0xfe5dee046a99a2a811c461f1969c3053_U256),
    uint!(0xfcbe86c7900a88aedcffc83b479aa3a4_U256),
    uint!(0xf987a7253ac413176f2b074cf7815e54_U256),
    uint!(0xf3392b0822b70005940c7a398e4b70f3_U256),
    uint!(0xe7159475a2c29b7443b29c7fa6e889d9_U256),
    uint!(0xd097f3bdfd2022b8845ad8f792aa5825_U256),
    uint!(0xa9f746462d870fdf8a65dc1f90e061e5_U256),
    uint!(0x70d869a156d2a1b890bb3df62baf32f7_U256),
    uint!(0x31be135f97d08fd981231505542fcfa6_U256),
    uint!(0x9aa508b5b7a84e1c677de54f3e99bc9_U256),
    uint!(0x5d6af8dedb81196699c329225ee604_U256),
    uint!(0x2216e584f5fa1ea926041bedfe98_U256),
    uint!(0x48a170391f7dc42444e8fa2_U256),
];

fn u512_to_u256(value: U512) -> Option<U256> {
    let limbs = value.as_limbs();
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return None;
    }
    Some(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// `floor(a * b / denominator)` with a 512-bit intermediate product.
/// `None` on division by zero or a result wider than 256 bits.
pub(crate) fn mul_div_floor(a: U256, b: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let wide = U512::from(a) * U512::from(b);
    u512_to_u256(wide / U512::from(denominator))
}

/// `ceil(a * b / denominator)` with a 512-bit intermediate product.
pub(crate) fn mul_div_ceil(a: U256, b: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let wide = U512::from(a) * U512::from(b);
    let (quotient, remainder) = wide.div_rem(U512::from(denominator));
    let rounded = if remainder.is_zero() {
        quotient
    } else {
        quotient + U512::ONE
    };
    u512_to_u256(rounded)
}

/// Strips the proportional fee from an input amount, truncating.
pub(crate) fn net_of_fee(amount: U256, fee_pips: u32) -> Option<U256> {
    if fee_pips >= PIPS {
        return None;
    }
    mul_div_floor(amount, U256::from(PIPS - fee_pips), U256::from(PIPS))
}

/// Grosses a net input back up by the fee, rounding against the trader.
pub(crate) fn gross_of_fee(amount: U256, fee_pips: u32) -> Option<U256> {
    if fee_pips >= PIPS {
        return None;
    }
    mul_div_ceil(amount, U256::from(PIPS), U256::from(PIPS - fee_pips))
}

/// Tick spacing implied by a fee tier. Unknown tiers get the narrowest
/// spacing, which can only make the in-range check stricter.
pub(crate) fn tick_spacing_for_fee(fee_pips: u32) -> i32 {
    match fee_pips {
        100 => 1,
        500 => 10,
        3000 => 60,
        10000 => 200,
        _ => 1,
    }
}

/// sqrt(1.0001^tick) as a Q64.96, the exact bit-for-bit tick math of the
/// concentrated-liquidity venue. `None` outside [MIN_TICK, MAX_TICK].
pub(crate) fn sqrt_ratio_at_tick(tick: i32) -> Option<U256> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return None;
    }
    let abs_tick = tick.unsigned_abs();
    let mut ratio = if abs_tick & 1 != 0 {
        uint!(0xfffcb933bd6fad37aa2d162d1a594001_U256)
    } else {
        uint!(0x100000000000000000000000000000000_U256)
    };
    for (i, multiplier) in TICK_MULTIPLIERS.iter().enumerate() {
        if abs_tick & (1 << (i + 1)) != 0 {
            ratio = (ratio * multiplier) >> 128;
        }
    }
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }
    // Q128.128 -> Q64.96, rounding up.
    let shifted = ratio >> 32;
    if (ratio & uint!(0xffffffff_U256)).is_zero() {
        Some(shifted)
    } else {
        Some(shifted + U256::ONE)
    }
}

/// New sqrt price after an exact token0 input, rounding up so the pool
/// never undercharges: `ceil(L·Q96·sp / (L·Q96 + amount·sp))`.
pub(crate) fn next_sqrt_price_from_amount0_in(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
) -> Option<U256> {
    let l96 = U512::from(liquidity) * U512::from(Q96);
    let denominator = l96.checked_add(U512::from(amount) * U512::from(sqrt_price_x96))?;
    let numerator = l96.checked_mul(U512::from(sqrt_price_x96))?;
    let (quotient, remainder) = numerator.div_rem(denominator);
    let rounded = if remainder.is_zero() {
        quotient
    } else {
        quotient + U512::ONE
    };
    u512_to_u256(rounded)
}

/// New sqrt price after an exact token1 input: `sp + floor(amount·Q96 / L)`.
pub(crate) fn next_sqrt_price_from_amount1_in(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
) -> Option<U256> {
    let delta = mul_div_floor(amount, Q96, U256::from(liquidity))?;
    sqrt_price_x96.checked_add(delta)
}

/// Token0 moved between two sqrt prices: `L·Q96·(hi − lo) / (hi·lo)`.
pub(crate) fn amount0_delta(
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Option<U256> {
    let (lo, hi) = if sqrt_a <= sqrt_b {
        (sqrt_a, sqrt_b)
    } else {
        (sqrt_b, sqrt_a)
    };
    if lo.is_zero() {
        return None;
    }
    let numerator = U512::from(liquidity) * U512::from(Q96) * U512::from(hi - lo);
    let denominator = U512::from(hi) * U512::from(lo);
    let (quotient, remainder) = numerator.div_rem(denominator);
    let rounded = if round_up && !remainder.is_zero() {
        quotient + U512::ONE
    } else {
        quotient
    };
    u512_to_u256(rounded)
}

/// Token1 moved between two sqrt prices: `L·(hi − lo) / Q96`.
pub(crate) fn amount1_delta(
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Option<U256> {
    let (lo, hi) = if sqrt_a <= sqrt_b {
        (sqrt_a, sqrt_b)
    } else {
        (sqrt_b, sqrt_a)
    };
    if round_up {
        mul_div_ceil(U256::from(liquidity), hi - lo, Q96)
    } else {
        mul_div_floor(U256::from(liquidity), hi - lo, Q96)
    }
}
