//! Client configuration.
//!
//! A [`ClientConfig`] is fixed when a pipeline or client is built and shared,
//! read-only, by every request issued through it.

use std::num::NonZeroU32;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ValidationError;

pub const DEFAULT_BASE_URL: &str = "https://api.dexscreener.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Longest accepted rate limit period (365 days).
pub const MAX_RATE_LIMIT_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub const BASE_URL_ENV: &str = "DEXSCREENER_BASE_URL";
pub const TIMEOUT_SECS_ENV: &str = "DEXSCREENER_TIMEOUT_SECS";

/// Call budget: at most `calls` requests per `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRateLimit")]
pub struct RateLimit {
    calls: NonZeroU32,
    period: Duration,
}

impl RateLimit {
    pub fn new(calls: u32, period: Duration) -> Result<Self, ValidationError> {
        let calls = NonZeroU32::new(calls).ok_or(ValidationError::ZeroRateLimitCalls)?;
        if period.is_zero() {
            return Err(ValidationError::ZeroRateLimitPeriod);
        }
        if period > MAX_RATE_LIMIT_PERIOD {
            return Err(ValidationError::RateLimitPeriodTooLong {
                max_secs: MAX_RATE_LIMIT_PERIOD.as_secs(),
            });
        }
        Ok(Self { calls, period })
    }

    pub fn per_minute(calls: u32) -> Result<Self, ValidationError> {
        Self::new(calls, Duration::from_secs(60))
    }

    pub const fn calls(&self) -> NonZeroU32 {
        self.calls
    }

    pub const fn period(&self) -> Duration {
        self.period
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            calls: NonZeroU32::MIN.saturating_add(59),
            period: Duration::from_secs(60),
        }
    }
}

#[derive(Deserialize)]
struct RawRateLimit {
    calls: u32,
    period: Duration,
}

impl TryFrom<RawRateLimit> for RateLimit {
    type Error = ValidationError;

    fn try_from(raw: RawRateLimit) -> Result<Self, Self::Error> {
        Self::new(raw.calls, raw.period)
    }
}

/// Immutable settings shared by all requests of one client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Applied to every request that does not carry its own timeout.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    #[serde(default)]
    pub rate_limit: RateLimit,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            rate_limit: RateLimit::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        rate_limit: RateLimit,
    ) -> Result<Self, ValidationError> {
        Self::default()
            .with_base_url(base_url)
            .with_timeout(timeout)
            .map(|config| config.with_rate_limit(rate_limit))
            .and_then(Self::validated)
    }

    /// Defaults overlaid with `DEXSCREENER_BASE_URL` and `DEXSCREENER_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same overlay as [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }

        if let Some(raw) = lookup(TIMEOUT_SECS_ENV) {
            let seconds = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ValidationError::InvalidEnvValue {
                    name: TIMEOUT_SECS_ENV,
                    value: raw.clone(),
                })?;
            config = config.with_timeout(Duration::from_secs(seconds))?;
        }

        config.validated()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ValidationError> {
        if timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn validated(self) -> Result<Self, ValidationError> {
        if self.base_url.trim().is_empty() {
            return Err(ValidationError::EmptyBaseUrl);
        }
        if self.timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout);
        }
        Ok(self)
    }
}

fn default_base_url() -> String {
    String::from(DEFAULT_BASE_URL)
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_user_agent() -> String {
    format!("dexscreener-rs/{}", env!("CARGO_PKG_VERSION"))
}
