use dexscreener_core::DexscreenerClient;
use serde_json::Value;

use crate::cli::{PairArgs, PoolsArgs, TokenPairsArgs, TokensArgs};
use crate::error::CliError;

pub async fn pair(args: &PairArgs, client: &DexscreenerClient) -> Result<Value, CliError> {
    let pair = client
        .get_token_pair_async(&args.chain, &args.pair_address)
        .await?;
    Ok(serde_json::to_value(pair)?)
}

pub fn pair_blocking(args: &PairArgs, client: &DexscreenerClient) -> Result<Value, CliError> {
    let pair = client.get_token_pair(&args.chain, &args.pair_address)?;
    Ok(serde_json::to_value(pair)?)
}

pub async fn tokens(args: &TokensArgs, client: &DexscreenerClient) -> Result<Value, CliError> {
    let pairs = client
        .get_token_pair_list_async(&args.chain, args.addresses.as_slice())
        .await?;
    Ok(serde_json::to_value(pairs)?)
}

pub fn tokens_blocking(args: &TokensArgs, client: &DexscreenerClient) -> Result<Value, CliError> {
    let pairs = client.get_token_pair_list(&args.chain, args.addresses.as_slice())?;
    Ok(serde_json::to_value(pairs)?)
}

pub async fn token_pairs(
    args: &TokenPairsArgs,
    client: &DexscreenerClient,
) -> Result<Value, CliError> {
    let pairs = client.get_token_pairs_async(&args.address).await?;
    Ok(serde_json::to_value(pairs)?)
}

pub fn token_pairs_blocking(
    args: &TokenPairsArgs,
    client: &DexscreenerClient,
) -> Result<Value, CliError> {
    Ok(serde_json::to_value(client.get_token_pairs(&args.address)?)?)
}

pub async fn pools(args: &PoolsArgs, client: &DexscreenerClient) -> Result<Value, CliError> {
    let pools = client
        .get_pools_by_token_address_async(&args.chain, &args.address)
        .await?;
    Ok(serde_json::to_value(pools)?)
}

pub fn pools_blocking(args: &PoolsArgs, client: &DexscreenerClient) -> Result<Value, CliError> {
    let pools = client.get_pools_by_token_address(&args.chain, &args.address)?;
    Ok(serde_json::to_value(pools)?)
}
