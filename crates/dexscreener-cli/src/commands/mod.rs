mod listings;
mod pairs;
mod search;

use dexscreener_core::DexscreenerClient;
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Runs the selected command and returns its JSON output.
///
/// With `--blocking` the client is built, used and dropped on a blocking worker
/// thread; otherwise the async path runs on the current runtime.
pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let config = cli.client_config()?;
    debug!(base_url = %config.base_url, timeout = ?config.timeout, blocking = cli.blocking, "client configured");

    if cli.blocking {
        let command = cli.command.clone();
        return tokio::task::spawn_blocking(move || {
            let client = DexscreenerClient::with_config(config)?;
            run_blocking(&command, &client)
        })
        .await?;
    }

    let client = DexscreenerClient::with_config(config)?;
    match &cli.command {
        Command::Profiles => listings::profiles(&client).await,
        Command::Boosts(args) => listings::boosts(args, &client).await,
        Command::Search(args) => search::run(args, &client).await,
        Command::Pair(args) => pairs::pair(args, &client).await,
        Command::Tokens(args) => pairs::tokens(args, &client).await,
        Command::TokenPairs(args) => pairs::token_pairs(args, &client).await,
        Command::Pools(args) => pairs::pools(args, &client).await,
    }
}

fn run_blocking(command: &Command, client: &DexscreenerClient) -> Result<Value, CliError> {
    match command {
        Command::Profiles => listings::profiles_blocking(client),
        Command::Boosts(args) => listings::boosts_blocking(args, client),
        Command::Search(args) => search::run_blocking(args, client),
        Command::Pair(args) => pairs::pair_blocking(args, client),
        Command::Tokens(args) => pairs::tokens_blocking(args, client),
        Command::TokenPairs(args) => pairs::token_pairs_blocking(args, client),
        Command::Pools(args) => pairs::pools_blocking(args, client),
    }
}
