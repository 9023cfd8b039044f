use std::fmt::{Display, Formatter};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::http_client::TransportError;

/// Argument and configuration errors detected before any request is dispatched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("base url cannot be empty")]
    EmptyBaseUrl,
    #[error("rate limit calls must be greater than zero")]
    ZeroRateLimitCalls,
    #[error("rate limit period must be greater than zero")]
    ZeroRateLimitPeriod,
    #[error("rate limit period cannot exceed {max_secs} seconds")]
    RateLimitPeriodTooLong { max_secs: u64 },
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidEnvValue { name: &'static str, value: String },

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },
    #[error("at least one token address is required")]
    NoAddresses,
    #[error("{count} token addresses exceeds the maximum of {max}")]
    TooManyAddresses { count: usize, max: usize },
}

/// Payload attached to a protocol error: decoded JSON when the body parsed, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Json(Value),
    Text(String),
}

impl ResponseData {
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body.to_owned()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

impl Display for ResponseData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Discriminant of [`DexscreenerError`], convenient for matching without fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimitExceeded,
    Protocol,
    Network,
    Timeout,
    Validation,
}

/// Every failure a Dexscreener request can produce.
#[derive(Debug, Error)]
pub enum DexscreenerError {
    /// The API answered 429.
    #[error("API Error 429: Rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimitExceeded { retry_after: Option<u64> },

    /// The API answered with an error status, or with a body that is not valid JSON.
    #[error("API Error {status}: {message}")]
    Protocol {
        status: u16,
        message: String,
        response_data: ResponseData,
    },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(#[source] TransportError),

    #[error("Request to {url} timed out after {}s", .timeout.as_secs_f64())]
    Timeout { url: String, timeout: Duration },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(seconds) if *seconds > 0 => format!(". Retry after {seconds} seconds"),
        _ => String::new(),
    }
}

impl DexscreenerError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimitExceeded { .. } => ErrorKind::RateLimitExceeded,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::Network(_) => ErrorKind::Network,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::RateLimitExceeded => "dexscreener.rate_limited",
            ErrorKind::Protocol => "dexscreener.protocol",
            ErrorKind::Network => "dexscreener.network",
            ErrorKind::Timeout => "dexscreener.timeout",
            ErrorKind::Validation => "dexscreener.validation",
        }
    }

    /// HTTP status associated with the error, when the server answered at all.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimitExceeded { .. } => Some(429),
            Self::Protocol { status, .. } => Some(*status),
            Self::Network(_) | Self::Timeout { .. } | Self::Validation(_) => None,
        }
    }

    pub const fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimitExceeded { retry_after } => *retry_after,
            _ => None,
        }
    }

    pub fn response_data(&self) -> Option<&ResponseData> {
        match self {
            Self::Protocol { response_data, .. } => Some(response_data),
            _ => None,
        }
    }

    /// Whether repeating the same call later could succeed. Nothing in this crate retries.
    pub const fn retryable(&self) -> bool {
        match self {
            Self::RateLimitExceeded { .. } | Self::Network(_) | Self::Timeout { .. } => true,
            Self::Protocol { status, .. } => *status >= 500,
            Self::Validation(_) => false,
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Protocol { status: 404, .. })
    }
}
