use std::time::Duration;

use alloy::primitives::Address;
use thiserror::Error;

use crate::service::VenueKind;

#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The factory reports no pool for this venue and pair.
    #[error("no {venue} pool deployed for {token0}/{token1}")]
    StateUnavailable {
        venue: VenueKind,
        token0: Address,
        token1: Address,
    },

    /// RPC transport or contract call failure.
    #[error("chain read failed: {0}")]
    ReadFailure(String),

    /// The read did not complete within the configured deadline.
    #[error("chain read timed out after {0:?}")]
    Timeout(Duration),

    /// Transaction submission failed or the receipt never arrived.
    #[error("transaction submission failed: {0}")]
    SubmitFailure(String),
}
