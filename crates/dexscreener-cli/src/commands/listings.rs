use dexscreener_core::DexscreenerClient;
use serde_json::Value;

use crate::cli::BoostsArgs;
use crate::error::CliError;

pub async fn profiles(client: &DexscreenerClient) -> Result<Value, CliError> {
    let profiles = client.get_latest_token_profiles_async().await?;
    Ok(serde_json::to_value(profiles)?)
}

pub fn profiles_blocking(client: &DexscreenerClient) -> Result<Value, CliError> {
    Ok(serde_json::to_value(client.get_latest_token_profiles()?)?)
}

pub async fn boosts(args: &BoostsArgs, client: &DexscreenerClient) -> Result<Value, CliError> {
    let tokens = if args.top {
        client.get_top_boosted_tokens_async().await?
    } else {
        client.get_latest_boosted_tokens_async().await?
    };
    Ok(serde_json::to_value(tokens)?)
}

pub fn boosts_blocking(args: &BoostsArgs, client: &DexscreenerClient) -> Result<Value, CliError> {
    let tokens = if args.top {
        client.get_top_boosted_tokens()?
    } else {
        client.get_latest_boosted_tokens()?
    };
    Ok(serde_json::to_value(tokens)?)
}
