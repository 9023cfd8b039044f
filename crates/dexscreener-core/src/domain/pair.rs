use serde::{Deserialize, Deserializer, Serialize};

/// Base or quote side of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairToken {
    pub address: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuySellCounts {
    #[serde(default)]
    pub buys: u64,
    #[serde(default)]
    pub sells: u64,
}

/// Transaction counts per rolling window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCounts {
    #[serde(default)]
    pub m5: BuySellCounts,
    #[serde(default)]
    pub h1: BuySellCounts,
    #[serde(default)]
    pub h6: BuySellCounts,
    #[serde(default)]
    pub h24: BuySellCounts,
}

/// USD volume per rolling window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowedVolume {
    #[serde(default)]
    pub m5: f64,
    #[serde(default)]
    pub h1: f64,
    #[serde(default)]
    pub h6: f64,
    #[serde(default)]
    pub h24: f64,
}

/// Percent price change per rolling window. Windows without trades are absent upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    #[serde(default)]
    pub m5: Option<f64>,
    #[serde(default)]
    pub h1: Option<f64>,
    #[serde(default)]
    pub h6: Option<f64>,
    #[serde(default)]
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Liquidity {
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde(default)]
    pub base: f64,
    #[serde(default)]
    pub quote: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairWebsite {
    #[serde(default)]
    pub label: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSocial {
    #[serde(rename = "type")]
    pub platform: String,
    #[serde(alias = "handle")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub websites: Vec<PairWebsite>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub socials: Vec<PairSocial>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairBoosts {
    #[serde(default)]
    pub active: u64,
}

/// DEX trading pair.
///
/// Prices arrive as decimal strings and are kept that way so no precision is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub chain_id: String,
    pub dex_id: String,
    pub url: String,
    pub pair_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    pub base_token: PairToken,
    pub quote_token: PairToken,
    pub price_native: String,
    #[serde(default)]
    pub price_usd: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub txns: TransactionCounts,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume: WindowedVolume,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price_change: PriceChange,
    #[serde(default)]
    pub liquidity: Option<Liquidity>,
    #[serde(default)]
    pub fdv: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub pair_created_at: Option<u64>,
    #[serde(default)]
    pub info: Option<PairInfo>,
    #[serde(default)]
    pub boosts: Option<PairBoosts>,
}

impl TokenPair {
    pub fn price_usd_f64(&self) -> Option<f64> {
        self.price_usd.as_deref().and_then(|price| price.parse().ok())
    }

    pub fn price_native_f64(&self) -> Option<f64> {
        self.price_native.parse().ok()
    }
}

/// `{"schemaVersion": ..., "pairs": [...]}` wrapper used by the `latest/dex` endpoints.
///
/// Single-pair lookups have also been seen answering with a `pair` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairsEnvelope {
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pairs: Vec<TokenPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<TokenPair>,
}

impl PairsEnvelope {
    pub fn into_first(self) -> Option<TokenPair> {
        self.pair.or_else(|| self.pairs.into_iter().next())
    }
}

/// Explicit `null` decodes like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
