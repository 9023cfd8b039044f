//! # Domain Models
//!
//! Typed shapes of the Dexscreener API responses, plus the validated
//! identifiers used to build endpoint paths.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TokenProfile`] | Token profile listing entry |
//! | [`BoostedToken`] | Boosted token listing entry |
//! | [`TokenPair`] | DEX trading pair with price, volume and liquidity |
//! | [`ChainId`] | Validated chain identifier (`ethereum`, `solana`, ...) |
//! | [`TokenAddress`] | Validated token or pair address |
//! | [`TokenAddresses`] | 1 to 30 addresses for batched lookups |
//!
//! Wire names are camelCase; optional upstream fields are `Option`.

mod identifiers;
mod pair;
mod token;

pub use identifiers::{ChainId, TokenAddress, TokenAddresses, MAX_TOKEN_ADDRESSES};
pub use pair::{
    BuySellCounts, Liquidity, PairBoosts, PairInfo, PairSocial, PairToken, PairWebsite,
    PairsEnvelope, PriceChange, TokenPair, TransactionCounts, WindowedVolume,
};
pub use token::{BoostedToken, TokenLink, TokenProfile};
