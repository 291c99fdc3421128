use std::fmt;
use std::hash::{Hash, Hasher};

use alloy::primitives::{Address, Bytes, U256};

use crate::service::math::{mul_div_ceil, mul_div_floor};
use crate::service::{ServiceError, ServiceResult};

/// An ERC20 token identity on a specific chain.
///
/// Equality and hashing consider only the chain id and contract address;
/// the decimal precision is carried for display purposes and never
/// distinguishes two tokens.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
}

impl Token {
    pub fn new(chain_id: u64, address: Address, decimals: u8) -> Self {
        Self {
            chain_id,
            address,
            decimals,
        }
    }

    /// Total order over token addresses. Reserves and ticks are always
    /// expressed token0 -> token1 under this order.
    pub fn sorts_before(&self, other: &Token) -> bool {
        self.address < other.address
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// A canonically ordered token pair: `token0.sorts_before(token1)` always
/// holds after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPair {
    token0: Token,
    token1: Token,
}

impl TokenPair {
    pub fn new(a: Token, b: Token) -> ServiceResult<Self> {
        if a.chain_id != b.chain_id {
            return Err(ServiceError::InvalidPair(format!(
                "tokens on different chains: {} and {}",
                a.chain_id, b.chain_id
            )));
        }
        if a.address == b.address {
            return Err(ServiceError::InvalidPair(format!(
                "identical token addresses: {}",
                a.address
            )));
        }
        let (token0, token1) = if a.sorts_before(&b) { (a, b) } else { (b, a) };
        Ok(Self { token0, token1 })
    }

    pub fn token0(&self) -> &Token {
        &self.token0
    }

    pub fn token1(&self) -> &Token {
        &self.token1
    }

    pub fn involves(&self, token: &Token) -> bool {
        self.token0 == *token || self.token1 == *token
    }

    /// The counterpart of `token` in this pair, if `token` is a member.
    pub fn other(&self, token: &Token) -> Option<&Token> {
        if *token == self.token0 {
            Some(&self.token1)
        } else if *token == self.token1 {
            Some(&self.token0)
        } else {
            None
        }
    }
}

/// A token plus a raw quantity in the token's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    pub token: Token,
    pub raw: U256,
}

impl TokenAmount {
    pub fn new(token: Token, raw: U256) -> Self {
        Self { token, raw }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    ExactInput,
    ExactOutput,
}

impl TradeDirection {
    pub(crate) fn tag(&self) -> u8 {
        match self {
            TradeDirection::ExactInput => 0x00,
            TradeDirection::ExactOutput => 0x01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueKind {
    ConstantProduct,
    ConcentratedLiquidity,
}

impl VenueKind {
    pub(crate) fn tag(&self) -> u8 {
        match self {
            VenueKind::ConstantProduct => 0x00,
            VenueKind::ConcentratedLiquidity => 0x01,
        }
    }
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VenueKind::ConstantProduct => write!(f, "constant-product"),
            VenueKind::ConcentratedLiquidity => write!(f, "concentrated-liquidity"),
        }
    }
}

/// A rational slippage tolerance, e.g. 50/10_000 = 0.5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlippageTolerance {
    numerator: u32,
    denominator: u32,
}

impl SlippageTolerance {
    pub fn new(numerator: u32, denominator: u32) -> ServiceResult<Self> {
        if denominator == 0 || numerator >= denominator {
            return Err(ServiceError::InvalidSlippage {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// `floor(amount_out * (1 - tolerance))`: the least output the trader
    /// will accept. Rounds down so the bound never exceeds the quote.
    pub fn minimum_out(&self, amount_out: U256) -> ServiceResult<U256> {
        let keep = U256::from(self.denominator - self.numerator);
        mul_div_floor(amount_out, keep, U256::from(self.denominator))
            .ok_or(ServiceError::Overflow("slippage minimum-out"))
    }

    /// `ceil(amount_in * (1 + tolerance))`: the most input the trader will
    /// pay. Rounds up so the bound always covers the quote.
    pub fn maximum_in(&self, amount_in: U256) -> ServiceResult<U256> {
        let pay = U256::from(self.denominator) + U256::from(self.numerator);
        mul_div_ceil(amount_in, pay, U256::from(self.denominator))
            .ok_or(ServiceError::Overflow("slippage maximum-in"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SwapOptions {
    pub slippage_tolerance: SlippageTolerance,
    pub recipient: Address,
}

/// The terminal artifact of the pipeline: router calldata plus the native
/// value to attach. Either submitted by an execution adapter or discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSwap {
    pub calldata: Bytes,
    pub value: U256,
}
