//! Dexscreener endpoint methods.
//!
//! Every method comes in a blocking form and an `_async` form. Both build the
//! same request and decode the same way; only the pipeline entry point differs.
//!
//! | Method | Path | Budget |
//! |--------|------|--------|
//! | `get_latest_token_profiles` | `token-profiles/latest/v1` | profiles |
//! | `get_latest_boosted_tokens` | `token-boosts/latest/v1` | profiles |
//! | `get_top_boosted_tokens` | `token-boosts/top/v1` | profiles |
//! | `get_token_pair` | `latest/dex/pairs/{chain}/{pair}` | pairs |
//! | `get_token_pair_list` | `tokens/v1/{chain}/{addresses}` | pairs |
//! | `get_token_pairs` | `latest/dex/tokens/{address}` | pairs |
//! | `search_pairs` | `latest/dex/search?q=` | pairs |
//! | `get_pools_by_token_address` | `token-pairs/v1/{chain}/{address}` | pairs |

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, RateLimit};
use crate::domain::{
    BoostedToken, ChainId, PairsEnvelope, TokenAddress, TokenAddresses, TokenPair, TokenProfile,
};
use crate::error::{DexscreenerError, ResponseData, ValidationError};
use crate::http_client::{
    BlockingHttpClient, HttpClient, HttpRequest, ReqwestBlockingHttpClient, ReqwestHttpClient,
};
use crate::pipeline::RequestPipeline;

const TOKEN_PROFILES_PATH: &str = "token-profiles/latest/v1";
const LATEST_BOOSTS_PATH: &str = "token-boosts/latest/v1";
const TOP_BOOSTS_PATH: &str = "token-boosts/top/v1";
const SEARCH_PATH: &str = "latest/dex/search";

/// Separate call budgets for the two endpoint families the API rate-limits independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientBudgets {
    /// Token profiles and boosted tokens.
    pub profiles: RateLimit,
    /// Pair lookups, token lookups and search.
    pub pairs: RateLimit,
}

impl Default for ClientBudgets {
    fn default() -> Self {
        Self {
            profiles: RateLimit::default(),
            pairs: RateLimit::per_minute(300).unwrap_or_default(),
        }
    }
}

/// Client for the Dexscreener REST API.
#[derive(Debug, Clone)]
pub struct DexscreenerClient {
    profiles: RequestPipeline,
    pairs: RequestPipeline,
}

impl DexscreenerClient {
    /// Client against the public API with default timeout and budgets.
    pub fn new() -> Result<Self, ValidationError> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ValidationError> {
        Self::with_budgets(config, ClientBudgets::default())
    }

    pub fn with_budgets(
        config: ClientConfig,
        budgets: ClientBudgets,
    ) -> Result<Self, ValidationError> {
        let config = config.validated()?;
        let blocking = Arc::new(ReqwestBlockingHttpClient::new(&config.user_agent));
        let client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Ok(Self::with_transports(config, budgets, blocking, client))
    }

    /// Both pipelines share `config` and the transports; each gets its own budget.
    pub fn with_transports(
        config: ClientConfig,
        budgets: ClientBudgets,
        blocking: Arc<dyn BlockingHttpClient>,
        client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            profiles: RequestPipeline::with_transports(
                config.clone().with_rate_limit(budgets.profiles),
                Arc::clone(&blocking),
                Arc::clone(&client),
            ),
            pairs: RequestPipeline::with_transports(
                config.with_rate_limit(budgets.pairs),
                blocking,
                client,
            ),
        }
    }

    pub fn profile_pipeline(&self) -> &RequestPipeline {
        &self.profiles
    }

    pub fn pair_pipeline(&self) -> &RequestPipeline {
        &self.pairs
    }

    pub fn get_latest_token_profiles(&self) -> Result<Vec<TokenProfile>, DexscreenerError> {
        decode(self.profiles.execute(HttpRequest::get(TOKEN_PROFILES_PATH))?, TOKEN_PROFILES_PATH)
    }

    pub async fn get_latest_token_profiles_async(
        &self,
    ) -> Result<Vec<TokenProfile>, DexscreenerError> {
        let value = self
            .profiles
            .execute_async(HttpRequest::get(TOKEN_PROFILES_PATH))
            .await?;
        decode(value, TOKEN_PROFILES_PATH)
    }

    pub fn get_latest_boosted_tokens(&self) -> Result<Vec<BoostedToken>, DexscreenerError> {
        decode(self.profiles.execute(HttpRequest::get(LATEST_BOOSTS_PATH))?, LATEST_BOOSTS_PATH)
    }

    pub async fn get_latest_boosted_tokens_async(
        &self,
    ) -> Result<Vec<BoostedToken>, DexscreenerError> {
        let value = self
            .profiles
            .execute_async(HttpRequest::get(LATEST_BOOSTS_PATH))
            .await?;
        decode(value, LATEST_BOOSTS_PATH)
    }

    /// Tokens with the most active boosts.
    pub fn get_top_boosted_tokens(&self) -> Result<Vec<BoostedToken>, DexscreenerError> {
        decode(self.profiles.execute(HttpRequest::get(TOP_BOOSTS_PATH))?, TOP_BOOSTS_PATH)
    }

    pub async fn get_top_boosted_tokens_async(
        &self,
    ) -> Result<Vec<BoostedToken>, DexscreenerError> {
        let value = self
            .profiles
            .execute_async(HttpRequest::get(TOP_BOOSTS_PATH))
            .await?;
        decode(value, TOP_BOOSTS_PATH)
    }

    /// Looks up one pair. `Ok(None)` when the API knows no such pair, including a 404.
    pub fn get_token_pair(
        &self,
        chain_id: &str,
        pair_address: &str,
    ) -> Result<Option<TokenPair>, DexscreenerError> {
        let request = token_pair_request(chain_id, pair_address)?;
        let path = request.path.clone();
        single_pair(self.pairs.execute(request), &path)
    }

    pub async fn get_token_pair_async(
        &self,
        chain_id: &str,
        pair_address: &str,
    ) -> Result<Option<TokenPair>, DexscreenerError> {
        let request = token_pair_request(chain_id, pair_address)?;
        let path = request.path.clone();
        single_pair(self.pairs.execute_async(request).await, &path)
    }

    /// Pairs for up to 30 token addresses on one chain.
    pub fn get_token_pair_list<S: AsRef<str>>(
        &self,
        chain_id: &str,
        addresses: &[S],
    ) -> Result<Vec<TokenPair>, DexscreenerError> {
        let request = token_pair_list_request(chain_id, addresses)?;
        let path = request.path.clone();
        decode(self.pairs.execute(request)?, &path)
    }

    pub async fn get_token_pair_list_async<S: AsRef<str>>(
        &self,
        chain_id: &str,
        addresses: &[S],
    ) -> Result<Vec<TokenPair>, DexscreenerError> {
        let request = token_pair_list_request(chain_id, addresses)?;
        let path = request.path.clone();
        decode(self.pairs.execute_async(request).await?, &path)
    }

    /// All pairs of a token across chains.
    pub fn get_token_pairs(&self, address: &str) -> Result<Vec<TokenPair>, DexscreenerError> {
        let request = token_pairs_request(address)?;
        let path = request.path.clone();
        pairs_envelope(self.pairs.execute(request)?, &path)
    }

    pub async fn get_token_pairs_async(
        &self,
        address: &str,
    ) -> Result<Vec<TokenPair>, DexscreenerError> {
        let request = token_pairs_request(address)?;
        let path = request.path.clone();
        pairs_envelope(self.pairs.execute_async(request).await?, &path)
    }

    /// Free-text pair search. The query is sent as given.
    pub fn search_pairs(&self, query: &str) -> Result<Vec<TokenPair>, DexscreenerError> {
        pairs_envelope(self.pairs.execute(search_request(query))?, SEARCH_PATH)
    }

    pub async fn search_pairs_async(&self, query: &str) -> Result<Vec<TokenPair>, DexscreenerError> {
        let value = self.pairs.execute_async(search_request(query)).await?;
        pairs_envelope(value, SEARCH_PATH)
    }

    /// Liquidity pools that contain the token.
    pub fn get_pools_by_token_address(
        &self,
        chain_id: &str,
        address: &str,
    ) -> Result<Vec<TokenPair>, DexscreenerError> {
        let request = pools_request(chain_id, address)?;
        let path = request.path.clone();
        decode(self.pairs.execute(request)?, &path)
    }

    pub async fn get_pools_by_token_address_async(
        &self,
        chain_id: &str,
        address: &str,
    ) -> Result<Vec<TokenPair>, DexscreenerError> {
        let request = pools_request(chain_id, address)?;
        let path = request.path.clone();
        decode(self.pairs.execute_async(request).await?, &path)
    }
}

fn token_pair_request(chain_id: &str, pair_address: &str) -> Result<HttpRequest, ValidationError> {
    let chain_id = ChainId::parse(chain_id)?;
    let pair_address = TokenAddress::parse(pair_address)?;
    Ok(HttpRequest::get(format!(
        "latest/dex/pairs/{chain_id}/{pair_address}"
    )))
}

fn token_pair_list_request<S: AsRef<str>>(
    chain_id: &str,
    addresses: &[S],
) -> Result<HttpRequest, ValidationError> {
    let chain_id = ChainId::parse(chain_id)?;
    let addresses = TokenAddresses::parse(addresses)?;
    Ok(HttpRequest::get(format!(
        "tokens/v1/{chain_id}/{}",
        addresses.joined()
    )))
}

fn token_pairs_request(address: &str) -> Result<HttpRequest, ValidationError> {
    let address = TokenAddress::parse(address)?;
    Ok(HttpRequest::get(format!("latest/dex/tokens/{address}")))
}

fn pools_request(chain_id: &str, address: &str) -> Result<HttpRequest, ValidationError> {
    let chain_id = ChainId::parse(chain_id)?;
    let address = TokenAddress::parse(address)?;
    Ok(HttpRequest::get(format!("token-pairs/v1/{chain_id}/{address}")))
}

fn search_request(query: &str) -> HttpRequest {
    HttpRequest::get(SEARCH_PATH).with_query("q", query)
}

fn single_pair(
    outcome: Result<Value, DexscreenerError>,
    path: &str,
) -> Result<Option<TokenPair>, DexscreenerError> {
    match outcome {
        Ok(value) => decode::<PairsEnvelope>(value, path).map(PairsEnvelope::into_first),
        Err(error) if error.is_not_found() => Ok(None),
        Err(error) => Err(error),
    }
}

fn pairs_envelope(value: Value, path: &str) -> Result<Vec<TokenPair>, DexscreenerError> {
    decode::<PairsEnvelope>(value, path).map(|envelope| envelope.pairs)
}

/// Status reported for a decoded body of the wrong shape.
///
/// Classification has already accepted the response, and its status is not kept
/// past that point, so every non-error status is reported as 200 here.
pub const SHAPE_ERROR_STATUS: u16 = 200;

/// A well-formed JSON body of the wrong shape is still a protocol failure.
fn decode<T: DeserializeOwned>(value: Value, path: &str) -> Result<T, DexscreenerError> {
    T::deserialize(&value).map_err(|error| DexscreenerError::Protocol {
        status: SHAPE_ERROR_STATUS,
        message: format!("Unexpected response shape from {path}: {error}"),
        response_data: ResponseData::Json(value),
    })
}
