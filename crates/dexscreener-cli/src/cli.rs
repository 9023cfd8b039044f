//! CLI argument definitions for `dexscreener`.
//!
//! # Commands
//!
//! | Command | Endpoint |
//! |---------|----------|
//! | `profiles` | Latest token profiles |
//! | `boosts` | Latest boosted tokens, or the top list with `--top` |
//! | `search` | Pair search by free-text query |
//! | `pair` | One pair by chain and pair address |
//! | `tokens` | Pairs for up to 30 token addresses on one chain |
//! | `token-pairs` | All pairs of a token across chains |
//! | `pools` | Pools containing a token on one chain |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--base-url` | `DEXSCREENER_BASE_URL` or the public API | API root |
//! | `--timeout-ms` | `DEXSCREENER_TIMEOUT_SECS` or 30 s | Per-request timeout |
//! | `--blocking` | `false` | Use the blocking request path |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--verbose` | `false` | Debug logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! dexscreener search WBTC --pretty
//! dexscreener pair ethereum 0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640
//! dexscreener tokens solana So11111111111111111111111111111111111111112 --blocking
//! ```

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use dexscreener_core::{ClientConfig, ValidationError, BASE_URL_ENV, TIMEOUT_SECS_ENV};

/// Query the Dexscreener API from the command line.
#[derive(Debug, Parser)]
#[command(name = "dexscreener", author, version, about = "Dexscreener API command-line client")]
pub struct Cli {
    /// API root, without trailing slash.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Route requests through the blocking path on a dedicated thread.
    #[arg(long, global = true, default_value_t = false)]
    pub blocking: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log request dispatch and responses to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Environment overlay first, then explicit flags.
    pub fn client_config(&self) -> Result<ClientConfig, ValidationError> {
        self.client_config_with(|name| std::env::var(name).ok())
    }

    /// Variables replaced by a flag are never read, so a malformed one cannot fail the run.
    fn client_config_with<F>(&self, env: F) -> Result<ClientConfig, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClientConfig::from_lookup(|name| match name {
            BASE_URL_ENV if self.base_url.is_some() => None,
            TIMEOUT_SECS_ENV if self.timeout_ms.is_some() => None,
            _ => env(name),
        })?;
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.trim_end_matches('/'));
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(timeout_ms))?;
        }
        config.validated()
    }
}

/// Available CLI commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Latest token profiles.
    Profiles,

    /// Boosted tokens.
    ///
    ///   dexscreener boosts
    ///   dexscreener boosts --top
    Boosts(BoostsArgs),

    /// Search pairs matching a query.
    ///
    ///   dexscreener search "SOL/USDC"
    Search(SearchArgs),

    /// One pair by chain and pair address. Prints `null` when unknown.
    Pair(PairArgs),

    /// Pairs for one or more token addresses on a chain (max 30).
    Tokens(TokensArgs),

    /// All pairs of a token across chains.
    TokenPairs(TokenPairsArgs),

    /// Pools containing a token on a chain.
    Pools(PoolsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct BoostsArgs {
    /// Tokens with the most active boosts instead of the latest ones.
    #[arg(long, default_value_t = false)]
    pub top: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    pub query: String,
}

#[derive(Debug, Clone, Args)]
pub struct PairArgs {
    pub chain: String,
    pub pair_address: String,
}

#[derive(Debug, Clone, Args)]
pub struct TokensArgs {
    pub chain: String,
    #[arg(required = true, num_args = 1..)]
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct TokenPairsArgs {
    pub address: String,
}

#[derive(Debug, Clone, Args)]
pub struct PoolsArgs {
    pub chain: String,
    pub address: String,
}
