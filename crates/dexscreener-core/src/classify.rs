//! Response classification.
//!
//! Turns a raw [`HttpResponse`] into decoded JSON or exactly one
//! [`DexscreenerError`]. Transport failures never reach this module; the
//! pipeline classifies those itself.

use serde_json::Value;

use crate::error::{DexscreenerError, ResponseData};
use crate::http_client::HttpResponse;

const TOO_MANY_REQUESTS: u16 = 429;

/// Classifies a response received for `url`.
///
/// Rules, first match wins:
///
/// | Status | Outcome |
/// |--------|---------|
/// | 429 | [`DexscreenerError::RateLimitExceeded`], with `Retry-After` seconds if it parses |
/// | >= 400 | [`DexscreenerError::Protocol`], payload is JSON when the body parses, text otherwise |
/// | other | decoded JSON, or [`DexscreenerError::Protocol`] with the original status and raw text |
pub fn classify_response(response: &HttpResponse, url: &str) -> Result<Value, DexscreenerError> {
    if response.status == TOO_MANY_REQUESTS {
        return Err(DexscreenerError::RateLimitExceeded {
            retry_after: parse_retry_after(response),
        });
    }

    if response.status >= 400 {
        return Err(DexscreenerError::Protocol {
            status: response.status,
            message: format!("Request to {url} failed"),
            response_data: ResponseData::from_body(&response.body),
        });
    }

    serde_json::from_str(&response.body).map_err(|_| DexscreenerError::Protocol {
        status: response.status,
        message: format!("Invalid JSON response from {url}"),
        response_data: ResponseData::Text(response.body.clone()),
    })
}

fn parse_retry_after(response: &HttpResponse) -> Option<u64> {
    response
        .header("retry-after")
        .and_then(|value| value.trim().parse::<u64>().ok())
}
