use std::time::Duration;

use alloy::primitives::{Address, U256};
use thiserror::Error;

use crate::repository::RepositoryError;
use crate::service::types::VenueKind;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    // Data acquisition. Surfaced to the caller as-is; there is no fallback
    // price source to recover from.
    /// No pool exists on-chain for the requested venue and pair.
    #[error("no {venue} pool for {token0}/{token1}")]
    StateUnavailable {
        venue: VenueKind,
        token0: Address,
        token1: Address,
    },

    /// The chain state provider failed at the transport level.
    #[error("chain read failed: {0}")]
    ReadFailure(String),

    /// A read did not complete within the configured deadline.
    #[error("chain read timed out after {0:?}")]
    Timeout(Duration),

    // Pricing. The chosen venue cannot fill the request; the caller must
    // pick a different route.
    /// A constant-product reserve is zero or too small for the request.
    #[error("insufficient reserves in {token0}/{token1} pair")]
    InsufficientReserves { token0: Address, token1: Address },

    /// The concentrated-liquidity pool has no active liquidity.
    #[error("no active liquidity in {token0}/{token1} pool (fee tier {fee_pips})")]
    InsufficientLiquidity {
        token0: Address,
        token1: Address,
        fee_pips: u32,
    },

    /// The swap would move the price past the active tick range.
    #[error(
        "amount {amount} would leave the active range of {token0}/{token1} (fee tier {fee_pips})"
    )]
    RangeExceeded {
        token0: Address,
        token1: Address,
        fee_pips: u32,
        amount: U256,
    },

    // Construction. Programmer or input errors, always fatal.
    /// The pool at this position does not connect to the running token path.
    #[error("pool at position {position} does not connect to the route path")]
    DisconnectedRoute { position: usize },

    /// The route's path ends do not match its declared input/output tokens.
    #[error("route endpoints do not match declared input/output tokens")]
    EndpointMismatch,

    /// A trade was aggregated from zero legs.
    #[error("trade has no legs")]
    EmptyTrade,

    /// Trade legs disagree on exact-input vs exact-output.
    #[error("trade legs disagree on direction")]
    DirectionMismatch,

    /// The two tokens cannot form a pair.
    #[error("invalid token pair: {0}")]
    InvalidPair(String),

    /// The slippage tolerance is not in [0, 1).
    #[error("slippage tolerance {numerator}/{denominator} is not in [0, 1)")]
    InvalidSlippage { numerator: u32, denominator: u32 },

    /// An amount string could not be parsed or scaled.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    // Serialization. Fatal; indicates a logic bug or out-of-range input.
    /// A serialized field exceeds its fixed-width slot.
    #[error("encoded field out of range: {0}")]
    EncodingOverflow(String),

    /// An intermediate product exceeded the supported integer width.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::StateUnavailable {
                venue,
                token0,
                token1,
            } => ServiceError::StateUnavailable {
                venue,
                token0,
                token1,
            },
            RepositoryError::ReadFailure(msg) => ServiceError::ReadFailure(msg),
            RepositoryError::Timeout(elapsed) => ServiceError::Timeout(elapsed),
            RepositoryError::SubmitFailure(msg) => ServiceError::ReadFailure(msg),
        }
    }
}
