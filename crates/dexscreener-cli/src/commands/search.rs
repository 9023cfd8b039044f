use dexscreener_core::{DexscreenerClient, TokenPair};
use serde_json::{json, Value};

use crate::cli::SearchArgs;
use crate::error::CliError;

pub async fn run(args: &SearchArgs, client: &DexscreenerClient) -> Result<Value, CliError> {
    let pairs = client.search_pairs_async(&args.query).await?;
    response(&args.query, pairs)
}

pub fn run_blocking(args: &SearchArgs, client: &DexscreenerClient) -> Result<Value, CliError> {
    let pairs = client.search_pairs(&args.query)?;
    response(&args.query, pairs)
}

fn response(query: &str, pairs: Vec<TokenPair>) -> Result<Value, CliError> {
    Ok(json!({
        "query": query,
        "pairs": serde_json::to_value(pairs)?,
    }))
}
