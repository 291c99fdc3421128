use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256, address, aliases::U24};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use tracing::instrument;

use super::error::RepositoryError;
use crate::repository::contract::{
    IERC20, IUniswapV2Factory, IUniswapV2Pair, IUniswapV3Factory, IUniswapV3Pool,
};
use crate::repository::{ExecutionAdapter, PoolStateReader, RepoResult};
use crate::service::pool::PoolState;
use crate::service::types::{EncodedSwap, TokenPair, VenueKind};

/// Uniswap V2 Factory contract address on Ethereum mainnet
const UNISWAP_V2_FACTORY: Address = address!("0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f");

/// Uniswap V3 Factory contract address on Ethereum mainnet
const UNISWAP_V3_FACTORY: Address = address!("0x1F98431c8aD98523631AE4a59f267346ea31F984");

#[derive(Debug, Clone)]
pub struct TokenMetadata {
    pub decimals: u8,
    pub symbol: String,
}

/// Pool state reader backed by an alloy provider.
///
/// Factory lookups and state reads run against mainnet factory addresses;
/// every read is wrapped in the configured deadline.
pub struct AlloyPoolStateReader<P> {
    provider: Arc<P>,
    v2_factory: Address,
    v3_factory: Address,
    deadline: Duration,
}

impl<P: Provider + Clone + 'static> AlloyPoolStateReader<P> {
    pub fn new(provider: Arc<P>, deadline: Duration) -> Self {
        Self {
            provider,
            v2_factory: UNISWAP_V2_FACTORY,
            v3_factory: UNISWAP_V3_FACTORY,
            deadline,
        }
    }

    /// Overrides the factory addresses, e.g. for a fork or another chain.
    pub fn with_factories(mut self, v2_factory: Address, v3_factory: Address) -> Self {
        self.v2_factory = v2_factory;
        self.v3_factory = v3_factory;
        self
    }

    async fn read_constant_product(&self, pair: &TokenPair) -> RepoResult<PoolState> {
        let token0 = pair.token0().address;
        let token1 = pair.token1().address;

        let factory = IUniswapV2Factory::new(self.v2_factory, self.provider.clone());
        let pool_address = factory
            .getPair(token0, token1)
            .call()
            .await
            .map_err(|e| RepositoryError::ReadFailure(e.to_string()))?;
        if pool_address == Address::ZERO {
            return Err(RepositoryError::StateUnavailable {
                venue: VenueKind::ConstantProduct,
                token0,
                token1,
            });
        }

        let pool = IUniswapV2Pair::new(pool_address, self.provider.clone());
        let reserves = pool
            .getReserves()
            .call()
            .await
            .map_err(|e| RepositoryError::ReadFailure(e.to_string()))?;

        // The pair contract orders reserves by its own token0/token1, which
        // matches the canonical address order of TokenPair.
        Ok(PoolState::ConstantProduct {
            reserve0: U256::from(reserves.reserve0),
            reserve1: U256::from(reserves.reserve1),
        })
    }

    async fn read_concentrated(&self, pair: &TokenPair, fee_tier: u32) -> RepoResult<PoolState> {
        let token0 = pair.token0().address;
        let token1 = pair.token1().address;

        // The factory takes a uint24; reject wider tiers instead of panicking
        // in the conversion.
        let fee = U24::try_from(fee_tier).map_err(|_| {
            RepositoryError::ReadFailure(format!("fee tier {fee_tier} exceeds 24 bits"))
        })?;

        let factory = IUniswapV3Factory::new(self.v3_factory, self.provider.clone());
        let pool_address = factory
            .getPool(token0, token1, fee)
            .call()
            .await
            .map_err(|e| RepositoryError::ReadFailure(e.to_string()))?;
        if pool_address == Address::ZERO {
            return Err(RepositoryError::StateUnavailable {
                venue: VenueKind::ConcentratedLiquidity,
                token0,
                token1,
            });
        }

        let pool = IUniswapV3Pool::new(pool_address, self.provider.clone());
        let slot0 = pool
            .slot0()
            .call()
            .await
            .map_err(|e| RepositoryError::ReadFailure(e.to_string()))?;
        let liquidity = pool
            .liquidity()
            .call()
            .await
            .map_err(|e| RepositoryError::ReadFailure(e.to_string()))?;

        Ok(PoolState::ConcentratedLiquidity {
            fee_pips: fee_tier,
            liquidity,
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick: slot0.tick.as_i32(),
        })
    }
}

#[async_trait]
impl<P: Provider + Clone + Send + Sync + 'static> PoolStateReader for AlloyPoolStateReader<P> {
    #[instrument(skip(self, pair), fields(token0 = %pair.token0(), token1 = %pair.token1()), err)]
    async fn get_pool_state(
        &self,
        venue: VenueKind,
        pair: &TokenPair,
        fee_tier: Option<u32>,
    ) -> RepoResult<PoolState> {
        let read = async {
            match venue {
                VenueKind::ConstantProduct => self.read_constant_product(pair).await,
                VenueKind::ConcentratedLiquidity => {
                    let fee_tier = fee_tier.ok_or_else(|| {
                        RepositoryError::ReadFailure(
                            "concentrated-liquidity read requires a fee tier".to_string(),
                        )
                    })?;
                    self.read_concentrated(pair, fee_tier).await
                }
            }
        };
        tokio::time::timeout(self.deadline, read)
            .await
            .map_err(|_| RepositoryError::Timeout(self.deadline))?
    }

    #[instrument(skip(self), err)]
    async fn get_token_metadata(&self, token: Address) -> RepoResult<TokenMetadata> {
        let contract = IERC20::new(token, self.provider.clone());
        let metadata = async {
            let decimals = contract
                .decimals()
                .call()
                .await
                .map_err(|e| RepositoryError::ReadFailure(e.to_string()))?;
            let symbol = contract
                .symbol()
                .call()
                .await
                .map_err(|e| RepositoryError::ReadFailure(e.to_string()))?;
            Ok(TokenMetadata { decimals, symbol })
        };
        tokio::time::timeout(self.deadline, metadata)
            .await
            .map_err(|_| RepositoryError::Timeout(self.deadline))?
    }
}

/// Execution adapter backed by an alloy provider.
///
/// The provider decides how the transaction is signed: a wallet-filled
/// provider signs locally, while a dev-node provider (anvil with an
/// impersonated account) signs on the node side.
pub struct AlloyExecutionAdapter<P> {
    provider: Arc<P>,
    router: Address,
}

impl<P: Provider + Clone + 'static> AlloyExecutionAdapter<P> {
    pub fn new(provider: Arc<P>, router: Address) -> Self {
        Self { provider, router }
    }
}

#[async_trait]
impl<P: Provider + Clone + Send + Sync + 'static> ExecutionAdapter for AlloyExecutionAdapter<P> {
    #[instrument(skip(self, swap), fields(value = %swap.value, bytes = swap.calldata.len()), err)]
    async fn submit(&self, swap: &EncodedSwap, from: Address) -> RepoResult<TransactionReceipt> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(self.router)
            .with_value(swap.value)
            .with_input(swap.calldata.clone());

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| RepositoryError::SubmitFailure(e.to_string()))?;

        pending
            .get_receipt()
            .await
            .map_err(|e| RepositoryError::SubmitFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::types::Token;
    use alloy::providers::ProviderBuilder;
    use serial_test::serial;

    const DAI: Address = address!("0x6B175474E89094C44Da98b954EedeAC495271d0F");
    const WETH: Address = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

    fn mainnet_pair() -> TokenPair {
        TokenPair::new(Token::new(1, DAI, 18), Token::new(1, WETH, 18)).unwrap()
    }

    #[tokio::test]
    async fn oversized_fee_tier_is_rejected_before_any_rpc() {
        // Unroutable endpoint: the tier check must fail first.
        let provider = Arc::new(
            ProviderBuilder::new().connect_http("http://127.0.0.1:9".parse().unwrap()),
        );
        let reader = AlloyPoolStateReader::new(provider, Duration::from_secs(1));

        let err = reader
            .get_pool_state(
                VenueKind::ConcentratedLiquidity,
                &mainnet_pair(),
                Some(1 << 24),
            )
            .await
            .unwrap_err();
        let RepositoryError::ReadFailure(msg) = err else {
            panic!("expected ReadFailure, got {err:?}");
        };
        assert!(msg.contains("fee tier"));
    }

    // Live-RPC tests, run manually against a mainnet endpoint:
    //   ETH_RPC_URL=... cargo test -- --ignored

    #[tokio::test]
    #[serial]
    #[ignore]
    async fn reads_live_constant_product_reserves() {
        let url = std::env::var("ETH_RPC_URL").unwrap();
        let provider = Arc::new(ProviderBuilder::new().connect_http(url.parse().unwrap()));
        let reader = AlloyPoolStateReader::new(provider, Duration::from_secs(10));

        let state = reader
            .get_pool_state(VenueKind::ConstantProduct, &mainnet_pair(), None)
            .await
            .unwrap();
        let PoolState::ConstantProduct { reserve0, reserve1 } = state else {
            panic!("expected constant-product state");
        };
        assert!(reserve0 > U256::ZERO);
        assert!(reserve1 > U256::ZERO);
    }

    #[tokio::test]
    #[serial]
    #[ignore]
    async fn reads_live_concentrated_snapshot() {
        let url = std::env::var("ETH_RPC_URL").unwrap();
        let provider = Arc::new(ProviderBuilder::new().connect_http(url.parse().unwrap()));
        let reader = AlloyPoolStateReader::new(provider, Duration::from_secs(10));

        let state = reader
            .get_pool_state(
                VenueKind::ConcentratedLiquidity,
                &mainnet_pair(),
                Some(3000),
            )
            .await
            .unwrap();
        let PoolState::ConcentratedLiquidity {
            fee_pips,
            sqrt_price_x96,
            ..
        } = state
        else {
            panic!("expected concentrated-liquidity state");
        };
        assert_eq!(fee_pips, 3000);
        assert!(sqrt_price_x96 > U256::ZERO);
    }

    #[tokio::test]
    #[serial]
    #[ignore]
    async fn fetches_live_token_metadata() {
        let url = std::env::var("ETH_RPC_URL").unwrap();
        let provider = Arc::new(ProviderBuilder::new().connect_http(url.parse().unwrap()));
        let reader = AlloyPoolStateReader::new(provider, Duration::from_secs(10));

        let metadata = reader.get_token_metadata(DAI).await.unwrap();
        assert_eq!(metadata.decimals, 18);
        assert_eq!(metadata.symbol, "DAI");
    }
}
