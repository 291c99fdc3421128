pub mod alloy;
pub mod contract;
pub mod error;

use ::alloy::primitives::Address;
use ::alloy::rpc::types::TransactionReceipt;
pub use alloy::{AlloyExecutionAdapter, AlloyPoolStateReader, TokenMetadata};
use async_trait::async_trait;
pub use error::RepositoryError;

use crate::service::pool::PoolState;
use crate::service::types::{EncodedSwap, TokenPair, VenueKind};

pub(crate) type RepoResult<T> = std::result::Result<T, RepositoryError>;

/// Trait for reading AMM pool state from the chain.
///
/// This is the seam between pricing and data acquisition: the service
/// quotes against whatever snapshot an implementation returns, so a test
/// double can stand in for a live RPC endpoint. Reads are idempotent and
/// side-effect free; callers may retry them.
#[async_trait]
pub trait PoolStateReader: Send + Sync {
    /// Retrieves a pricing snapshot for one pool.
    ///
    /// # Arguments
    ///
    /// * `venue` - Which AMM kind to read
    /// * `pair` - The canonical token pair
    /// * `fee_tier` - Fee tier in pips; required for concentrated
    ///   liquidity, ignored for constant product
    ///
    /// # Returns
    ///
    /// * `Ok(PoolState)` - A self-consistent snapshot taken at one block
    /// * `Err(RepositoryError)` - `StateUnavailable` if no pool exists,
    ///   `Timeout` past the deadline, `ReadFailure` otherwise
    async fn get_pool_state(
        &self,
        venue: VenueKind,
        pair: &TokenPair,
        fee_tier: Option<u32>,
    ) -> RepoResult<PoolState>;

    /// Retrieves decimals and symbol for an ERC20 token contract.
    async fn get_token_metadata(&self, token: Address) -> RepoResult<TokenMetadata>;
}

/// Trait for submitting an encoded swap to the chain.
///
/// Separate from [`PoolStateReader`] because submission is the one
/// non-idempotent operation in the pipeline; the core never retries it.
#[async_trait]
pub trait ExecutionAdapter: Send + Sync {
    /// Sends the payload to the router and waits for the receipt.
    ///
    /// # Arguments
    ///
    /// * `swap` - Calldata and native value produced by the encoder
    /// * `from` - The account the transaction is sent from
    async fn submit(&self, swap: &EncodedSwap, from: Address) -> RepoResult<TransactionReceipt>;
}
