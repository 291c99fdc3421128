use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, U256};
use alloy::providers::ProviderBuilder;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, bail};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use uniroute::service::utils::format_amount;
use uniroute::{
    AlloyExecutionAdapter, AlloyPoolStateReader, ExecutionAdapter, SlippageTolerance, SwapOptions,
    SwapService, TokenRegistry, TradeDirection, config,
};

/// 0.5% slippage tolerance, expressed in basis points.
const SLIPPAGE_BPS: u32 = 50;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,alloy=warn".into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (symbol, side, raw_amount, recipient_arg) = match args.as_slice() {
        [symbol, side, raw_amount, recipient] => (symbol, side, raw_amount, Some(recipient)),
        [symbol, side, raw_amount] => (symbol, side, raw_amount, None),
        _ => bail!("usage: uniroute <token> <buy|sell> <raw-amount> [recipient]"),
    };

    let config = config::Config::from_yaml("config/default.yaml").await;

    let registry = TokenRegistry::new();
    let token = registry
        .lookup(symbol)
        .with_context(|| format!("unknown token {symbol}, supported: {:?}", registry.supported_symbols()))?;
    let wrapped_native = registry.wrapped_native();

    // buy spends the wrapped native asset for the token; sell is the
    // reverse. Both are exact-input trades.
    let (input, output) = match side.as_str() {
        "buy" => (wrapped_native, token),
        "sell" => (token, wrapped_native),
        other => bail!("unknown side {other}, expected buy or sell"),
    };

    let amount = U256::from_str(raw_amount)
        .with_context(|| format!("invalid raw amount {raw_amount}"))?;
    let recipient = match recipient_arg {
        Some(arg) => Address::from_str(arg)
            .with_context(|| format!("invalid recipient address {arg}"))?,
        None => config.router.recipient,
    };

    let rpc_url = config.rpc.url.parse().context("invalid RPC url")?;
    let provider = Arc::new(ProviderBuilder::new().connect_http(rpc_url));
    let reader = AlloyPoolStateReader::new(
        provider.clone(),
        Duration::from_millis(config.rpc.timeout_ms),
    );

    let service = SwapService::new(Arc::new(reader), wrapped_native.address);
    let options = SwapOptions {
        slippage_tolerance: SlippageTolerance::new(SLIPPAGE_BPS, 10_000)?,
        recipient,
    };

    let swap = service
        .build_swap(input, output, TradeDirection::ExactInput, amount, &options)
        .await?;

    tracing::info!(
        side = %side,
        token = %token,
        amount = %format_amount(amount, input.decimals),
        calldata = %swap.calldata,
        value = %swap.value,
        "swap built"
    );

    if config.wallet.private_key.is_empty() {
        tracing::info!("no private key configured, skipping submission");
        return Ok(());
    }

    let signer = PrivateKeySigner::from_str(&config.wallet.private_key)
        .context("invalid private key")?;
    let from = signer.address();
    let wallet_provider = Arc::new(
        ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(config.rpc.url.parse().context("invalid RPC url")?),
    );
    let adapter = AlloyExecutionAdapter::new(wallet_provider, config.router.address);

    let receipt = adapter.submit(&swap, from).await?;
    tracing::info!(
        tx = %receipt.transaction_hash,
        gas_used = receipt.gas_used,
        "swap submitted"
    );

    Ok(())
}
