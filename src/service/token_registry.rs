use std::collections::HashMap;

use alloy::primitives::{Address, address};

use crate::service::types::Token;

/// Common ERC20 token contract addresses on Ethereum mainnet

// Stablecoins
const USDT: Address = address!("0xdAC17F958D2ee523a2206206994597C13D831ec7");
const USDC: Address = address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
const DAI: Address = address!("0x6B175474E89094C44Da98b954EedeAC495271d0F");

// Wrapped tokens
const WETH: Address = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
const WBTC: Address = address!("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599");

// DeFi tokens
const UNI: Address = address!("0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984");
const AAVE: Address = address!("0x7Fc66500c84A76Ad7e9c93437bFc5Ac33E2DDaE9");
const LINK: Address = address!("0x514910771AF9Ca656af840dff83E8264EcF986CA");

const MAINNET_CHAIN_ID: u64 = 1;

/// Token registry for mapping symbols to token identities on mainnet.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    registry: HashMap<&'static str, Token>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        let entries: [(&'static str, Address, u8); 8] = [
            ("USDT", USDT, 6),
            ("USDC", USDC, 6),
            ("DAI", DAI, 18),
            ("WETH", WETH, 18),
            ("WBTC", WBTC, 8),
            ("UNI", UNI, 18),
            ("AAVE", AAVE, 18),
            ("LINK", LINK, 18),
        ];
        let registry = entries
            .into_iter()
            .map(|(symbol, addr, decimals)| {
                (symbol, Token::new(MAINNET_CHAIN_ID, addr, decimals))
            })
            .collect();
        Self { registry }
    }

    /// Looks up a token by symbol, case-insensitively. "ETH" resolves to
    /// the wrapped token, since the router only moves ERC20s.
    pub fn lookup(&self, symbol: &str) -> Option<Token> {
        let upper = symbol.to_uppercase();
        let key = if upper == "ETH" { "WETH" } else { upper.as_str() };
        self.registry.get(key).copied()
    }

    pub fn wrapped_native(&self) -> Token {
        self.registry["WETH"]
    }

    pub fn supported_symbols(&self) -> Vec<&'static str> {
        let mut symbols: Vec<_> = self.registry.keys().copied().collect();
        symbols.sort_unstable();
        symbols
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}
