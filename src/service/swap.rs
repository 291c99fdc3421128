use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::{info, instrument};

use crate::repository::PoolStateReader;
use crate::service::encoder::SwapEncoder;
use crate::service::pool::Pool;
use crate::service::route::Route;
use crate::service::trade::{QuotedLeg, Trade};
use crate::service::types::{
    EncodedSwap, SwapOptions, Token, TokenPair, TradeDirection, VenueKind,
};
use crate::service::ServiceResult;

/// Fee tier queried on the concentrated-liquidity venue (0.3%).
pub const FEE_TIER_MEDIUM: u32 = 3000;

/// Quote-and-encode pipeline. Reads both venues for the pair, quotes a leg
/// per venue with the full requested amount, and serializes the aggregate.
pub struct SwapService {
    reader: Arc<dyn PoolStateReader>,
    encoder: SwapEncoder,
}

impl SwapService {
    pub fn new(reader: Arc<dyn PoolStateReader>, wrapped_native: Address) -> Self {
        Self {
            reader,
            encoder: SwapEncoder::new(wrapped_native),
        }
    }

    /// Builds the router payload for a swap from `input` to `output`.
    ///
    /// Both venue reads run concurrently against the same pair; either
    /// failing fails the build. Each leg is quoted with the full `amount`,
    /// so the legs are alternatives the router chooses between, not splits.
    #[instrument(skip(self, options), fields(%input, %output, ?direction, %amount))]
    pub async fn build_swap(
        &self,
        input: Token,
        output: Token,
        direction: TradeDirection,
        amount: U256,
        options: &SwapOptions,
    ) -> ServiceResult<EncodedSwap> {
        let pair = TokenPair::new(input, output)?;

        let (cp_state, cl_state) = tokio::try_join!(
            self.reader
                .get_pool_state(VenueKind::ConstantProduct, &pair, None),
            self.reader.get_pool_state(
                VenueKind::ConcentratedLiquidity,
                &pair,
                Some(FEE_TIER_MEDIUM)
            ),
        )?;

        let legs = [cp_state, cl_state]
            .into_iter()
            .map(|state| {
                let route = Route::new(vec![Pool::new(pair, state)], input, output)?;
                match direction {
                    TradeDirection::ExactInput => QuotedLeg::exact_input(route, amount),
                    TradeDirection::ExactOutput => QuotedLeg::exact_output(route, amount),
                }
            })
            .collect::<ServiceResult<Vec<_>>>()?;

        let trade = Trade::aggregate(legs)?;
        for leg in trade.legs() {
            info!(
                venue = %leg.venue(),
                input = %leg.input().raw,
                output = %leg.output().raw,
                "quoted leg"
            );
        }

        self.encoder.encode(&trade, options)
    }
}
