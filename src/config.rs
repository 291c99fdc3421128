use std::{fs, path::Path};

use alloy::primitives::Address;
use dotenv::dotenv;
use envsubst::substitute;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rpc: RpcConfig,
    pub router: RouterConfig,
    pub wallet: WalletConfig,
}

impl Config {
    pub async fn from_yaml(path: impl AsRef<Path>) -> Self {
        dotenv().ok();

        let file_content =
            fs::read_to_string(path).expect("failed to read config file from path: {path}");

        let env_vars: std::collections::HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with("RPC_") || key.starts_with("WALLET_"))
            .collect();

        let interpolated = substitute(&file_content, &env_vars)
            .expect("Failed to substitute environment variables in YAML");

        let config: Config =
            serde_yaml::from_str(&interpolated).expect("Failed to parse YAML configuration");

        config
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    pub chain_id: u64,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    pub address: Address,
    pub recipient: Address,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    pub private_key: String,
}
