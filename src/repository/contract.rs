use alloy::sol;

// Minimal on-chain interfaces: only the view functions the pool state
// reader needs.
sol! {
    /// ERC20 metadata surface.
    #[sol(rpc)]
    interface IERC20 {
        /// Returns the number of decimals used by the token.
        function decimals() external view returns (uint8);

        /// Returns the token symbol.
        function symbol() external view returns (string memory);
    }

    /// Constant-product factory: pair discovery.
    #[sol(rpc)]
    interface IUniswapV2Factory {
        /// Returns the pair address for two tokens, or the zero address if
        /// no pair has been deployed.
        function getPair(address tokenA, address tokenB) external view returns (address pair);
    }

    /// Constant-product pair: reserve snapshot.
    #[sol(rpc)]
    interface IUniswapV2Pair {
        /// Returns both reserves and the timestamp of the last update.
        /// Reserves are ordered token0 then token1 by the pair's own
        /// canonical address ordering.
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);

        /// Returns the address of token0.
        function token0() external view returns (address);

        /// Returns the address of token1.
        function token1() external view returns (address);
    }

    /// Concentrated-liquidity factory: pool discovery per fee tier.
    #[sol(rpc)]
    interface IUniswapV3Factory {
        /// Returns the pool address for a token pair and fee tier, or the
        /// zero address if no such pool exists.
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
    }

    /// Concentrated-liquidity pool: price and liquidity snapshot.
    #[sol(rpc)]
    interface IUniswapV3Pool {
        /// Returns the current sqrt price, tick, and oracle bookkeeping.
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );

        /// Returns the liquidity currently in range.
        function liquidity() external view returns (uint128);

        /// Returns the pool's fee tier in pips.
        function fee() external view returns (uint24);
    }
}
