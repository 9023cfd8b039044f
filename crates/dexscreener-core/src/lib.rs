//! Rate-limited client for the Dexscreener REST API.
//!
//! This crate contains:
//! - A request pipeline with blocking and async entry points sharing one call budget
//! - Response classification into a small error taxonomy
//! - Typed models for token profiles, boosts and trading pairs
//! - [`DexscreenerClient`] with one method per endpoint
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Base URL, timeout, rate limit, user agent |
//! | [`throttling`] | Blocking/async rate limiter and permits |
//! | [`http_client`] | Transport traits and reqwest implementations |
//! | [`classify`] | Status/body classification |
//! | [`pipeline`] | Resolve, acquire, dispatch, classify |
//! | [`client`] | Endpoint methods |
//! | [`domain`] | Identifiers and response models |
//! | [`error`] | Error taxonomy |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use dexscreener_core::DexscreenerClient;
//!
//! let client = DexscreenerClient::new()?;
//! let pairs = client.search_pairs("WBTC")?;
//! let pair = client
//!     .get_token_pair_async("ethereum", "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640")
//!     .await?;
//! ```
//!
//! # Request flow
//!
//! ```text
//! HttpRequest ──resolve──► ResolvedRequest ──acquire──► Permit
//!                                │
//!                     transport (blocking | async)
//!                                │
//!              HttpResponse / TransportError ──classify──► Value | DexscreenerError
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod pipeline;
pub mod throttling;

pub use classify::classify_response;
pub use client::{ClientBudgets, DexscreenerClient, SHAPE_ERROR_STATUS};
pub use config::{
    ClientConfig, RateLimit, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, MAX_RATE_LIMIT_PERIOD,
    TIMEOUT_SECS_ENV,
};
pub use domain::{
    BoostedToken, BuySellCounts, ChainId, Liquidity, PairBoosts, PairInfo, PairSocial, PairToken,
    PairWebsite, PairsEnvelope, PriceChange, TokenAddress, TokenAddresses, TokenLink, TokenPair,
    TokenProfile, TransactionCounts, WindowedVolume, MAX_TOKEN_ADDRESSES,
};
pub use error::{DexscreenerError, ErrorKind, ResponseData, ValidationError};
pub use http_client::{
    BlockingHttpClient, HttpClient, HttpMethod, HttpRequest, HttpResponse, ReqwestBlockingHttpClient,
    ReqwestHttpClient, ResolvedRequest, TransportError, TransportErrorKind,
};
pub use pipeline::RequestPipeline;
pub use throttling::{Permit, RateLimiter};
