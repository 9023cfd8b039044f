//! Rate-limited request pipeline.
//!
//! Both entry points run the same sequence:
//!
//! ```text
//! resolve URL + timeout ─▶ acquire permit ─▶ dispatch ─▶ classify ─▶ release permit
//! ```
//!
//! [`RequestPipeline::execute`] blocks the calling thread at acquisition and
//! dispatch; [`RequestPipeline::execute_async`] suspends the calling task at
//! the same two points. Everything else lives in `resolve` and `complete` and
//! is shared.
//!
//! One unit of the call budget is charged per invocation, whatever the outcome.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::classify::classify_response;
use crate::config::ClientConfig;
use crate::error::{DexscreenerError, ValidationError};
use crate::http_client::{
    BlockingHttpClient, HttpClient, HttpRequest, HttpResponse, ReqwestBlockingHttpClient,
    ReqwestHttpClient, ResolvedRequest, TransportError,
};
use crate::throttling::RateLimiter;

/// Dual-mode request pipeline sharing one configuration and one call budget.
#[derive(Clone)]
pub struct RequestPipeline {
    config: Arc<ClientConfig>,
    limiter: RateLimiter,
    blocking: Arc<dyn BlockingHttpClient>,
    client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("config", &self.config)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl RequestPipeline {
    /// Builds a pipeline over the reqwest transports.
    pub fn new(config: ClientConfig) -> Result<Self, ValidationError> {
        let config = config.validated()?;
        let blocking = Arc::new(ReqwestBlockingHttpClient::new(&config.user_agent));
        let client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Ok(Self::with_transports(config, blocking, client))
    }

    pub fn with_transports(
        config: ClientConfig,
        blocking: Arc<dyn BlockingHttpClient>,
        client: Arc<dyn HttpClient>,
    ) -> Self {
        let limiter = RateLimiter::new(config.rate_limit);
        Self {
            config: Arc::new(config),
            limiter,
            blocking,
            client,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Issues `request`, blocking the calling thread until the outcome is known.
    pub fn execute(&self, request: HttpRequest) -> Result<Value, DexscreenerError> {
        let request = self.resolve(request);
        let _permit = self.limiter.acquire_blocking();

        debug!(method = %request.method, url = %request.url, "dispatching blocking request");
        let outcome = self.blocking.execute(&request);
        self.complete(&request, outcome)
    }

    /// Issues `request`, suspending the calling task until the outcome is known.
    ///
    /// The dispatch is cut off once the resolved timeout elapses, whatever the
    /// transport does; the in-flight I/O is dropped and the permit released.
    pub async fn execute_async(&self, request: HttpRequest) -> Result<Value, DexscreenerError> {
        let request = self.resolve(request);
        let _permit = self.limiter.acquire().await;

        debug!(method = %request.method, url = %request.url, "dispatching async request");
        let outcome = tokio::time::timeout(request.timeout, self.client.execute(&request))
            .await
            .unwrap_or_else(|_| {
                Err(TransportError::timeout(format!(
                    "no response within {:?}",
                    request.timeout
                )))
            });
        self.complete(&request, outcome)
    }

    fn resolve(&self, request: HttpRequest) -> ResolvedRequest {
        let HttpRequest {
            method,
            path,
            query,
            headers,
            body,
            timeout,
        } = request;

        ResolvedRequest {
            method,
            url: absolute_url(&self.config.base_url, &path, &query),
            headers,
            body,
            timeout: timeout.unwrap_or(self.config.timeout),
        }
    }

    fn complete(
        &self,
        request: &ResolvedRequest,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<Value, DexscreenerError> {
        match outcome {
            Ok(response) => {
                debug!(url = %request.url, status = response.status, "response received");
                let classified = classify_response(&response, &request.url);
                if let Err(DexscreenerError::RateLimitExceeded { retry_after }) = &classified {
                    warn!(url = %request.url, ?retry_after, "upstream rate limit hit");
                }
                classified
            }
            Err(error) if error.is_timeout() => {
                warn!(url = %request.url, timeout = ?request.timeout, "request timed out");
                Err(DexscreenerError::Timeout {
                    url: request.url.clone(),
                    timeout: request.timeout,
                })
            }
            Err(error) => {
                warn!(url = %request.url, %error, "transport failure");
                Err(DexscreenerError::Network(error))
            }
        }
    }
}

/// `{base}/{path}` plus the percent-encoded query string. No other normalization.
fn absolute_url(base_url: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = format!("{base_url}/{path}");

    for (index, (name, value)) in query.iter().enumerate() {
        url.push(if index == 0 { '?' } else { '&' });
        url.push_str(&urlencoding::encode(name));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }

    url
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use serde_json::json;

    use super::*;
    use crate::config::RateLimit;
    use crate::error::{ErrorKind, ResponseData};

    /// Scripted transport usable from both entry points; records every request it sees.
    struct ScriptedTransport {
        outcome: Result<HttpResponse, TransportError>,
        requests: Mutex<Vec<ResolvedRequest>>,
    }

    impl ScriptedTransport {
        fn new(outcome: Result<HttpResponse, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn record(&self, request: &ResolvedRequest) {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request.clone());
        }

        fn recorded(&self) -> Vec<ResolvedRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl BlockingHttpClient for ScriptedTransport {
        fn execute(&self, request: &ResolvedRequest) -> Result<HttpResponse, TransportError> {
            self.record(request);
            self.outcome.clone()
        }
    }

    impl HttpClient for ScriptedTransport {
        fn execute<'a>(
            &'a self,
            request: &'a ResolvedRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'a>>
        {
            self.record(request);
            let outcome = self.outcome.clone();
            Box::pin(async move { outcome })
        }
    }

    /// Async transport that never answers.
    struct StalledTransport;

    impl HttpClient for StalledTransport {
        fn execute<'a>(
            &'a self,
            _request: &'a ResolvedRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'a>>
        {
            Box::pin(std::future::pending())
        }
    }

    fn config(calls: u32, period: Duration) -> ClientConfig {
        ClientConfig::default()
            .with_base_url("https://api.example.test")
            .with_rate_limit(RateLimit::new(calls, period).expect("valid rate limit"))
    }

    fn pipeline(
        config: ClientConfig,
        transport: &Arc<ScriptedTransport>,
    ) -> RequestPipeline {
        RequestPipeline::with_transports(config, transport.clone(), transport.clone())
    }

    #[test]
    fn absolute_url_joins_with_single_separator_and_encodes_query() {
        assert_eq!(
            absolute_url("https://api.example.test", "latest/dex/search", &[]),
            "https://api.example.test/latest/dex/search"
        );
        assert_eq!(
            absolute_url(
                "https://api.example.test",
                "latest/dex/search",
                &[(String::from("q"), String::from("Bitcoin 🚀&more"))]
            ),
            "https://api.example.test/latest/dex/search?q=Bitcoin%20%F0%9F%9A%80%26more"
        );
    }

    #[test]
    fn blocking_execute_resolves_path_and_applies_default_timeout() {
        let transport = ScriptedTransport::new(Ok(HttpResponse::ok_json(r#"{"pairs":[]}"#)));
        let pipeline = pipeline(config(10, Duration::from_secs(1)), &transport);

        let value = pipeline
            .execute(HttpRequest::get("latest/dex/tokens/0xabc"))
            .expect("request should succeed");

        assert_eq!(value, json!({"pairs": []}));
        let requests = transport.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://api.example.test/latest/dex/tokens/0xabc");
        assert_eq!(requests[0].timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn async_execute_honours_explicit_timeout() {
        let transport = ScriptedTransport::new(Ok(HttpResponse::ok_json("[]")));
        let pipeline = pipeline(config(10, Duration::from_secs(1)), &transport);

        pipeline
            .execute_async(
                HttpRequest::get("token-profiles/latest/v1").with_timeout(Duration::from_secs(3)),
            )
            .await
            .expect("request should succeed");

        let requests = transport.recorded();
        assert_eq!(requests[0].timeout, Duration::from_secs(3));
        assert_eq!(requests[0].url, "https://api.example.test/token-profiles/latest/v1");
    }

    #[test]
    fn transport_timeout_becomes_request_timeout() {
        let transport =
            ScriptedTransport::new(Err(TransportError::timeout("operation timed out")));
        let pipeline = pipeline(config(10, Duration::from_secs(1)), &transport);

        let error = pipeline
            .execute(HttpRequest::get("latest/dex/search").with_timeout(Duration::from_secs(2)))
            .expect_err("timeout must fail");

        match error {
            DexscreenerError::Timeout { url, timeout } => {
                assert_eq!(url, "https://api.example.test/latest/dex/search");
                assert_eq!(timeout, Duration::from_secs(2));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(pipeline.limiter().in_flight(), 0);
    }

    #[tokio::test]
    async fn stalled_async_transport_is_cut_off_at_timeout() {
        let blocking = ScriptedTransport::new(Ok(HttpResponse::ok_json("{}")));
        let pipeline = RequestPipeline::with_transports(
            config(10, Duration::from_secs(1)),
            blocking,
            Arc::new(StalledTransport),
        );
        let started = Instant::now();

        let error = pipeline
            .execute_async(
                HttpRequest::get("latest/dex/search").with_timeout(Duration::from_millis(50)),
            )
            .await
            .expect_err("stalled transport must time out");

        assert_eq!(error.kind(), ErrorKind::Timeout);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(pipeline.limiter().in_flight(), 0);
    }

    #[tokio::test]
    async fn connection_failure_becomes_network_error_on_both_paths() {
        let transport = ScriptedTransport::new(Err(TransportError::connect("connection refused")));
        let pipeline = pipeline(config(10, Duration::from_secs(1)), &transport);

        let blocking = pipeline
            .execute(HttpRequest::get("latest/dex/search"))
            .expect_err("refused connection must fail");
        let suspended = pipeline
            .execute_async(HttpRequest::get("latest/dex/search"))
            .await
            .expect_err("refused connection must fail");

        for error in [blocking, suspended] {
            match error {
                DexscreenerError::Network(source) => {
                    assert_eq!(source.message(), "connection refused");
                }
                other => panic!("expected network error, got {other:?}"),
            }
        }
        assert_eq!(pipeline.limiter().in_flight(), 0);
    }

    #[test]
    fn classified_errors_release_the_permit() {
        let transport = ScriptedTransport::new(Ok(HttpResponse::new(
            404,
            r#"{"error":"not found"}"#,
        )));
        let pipeline = pipeline(config(10, Duration::from_secs(1)), &transport);

        let error = pipeline
            .execute(HttpRequest::get("latest/dex/pairs/ethereum/0x0"))
            .expect_err("404 must fail");

        assert_eq!(error.status(), Some(404));
        assert_eq!(
            error.response_data(),
            Some(&ResponseData::Json(json!({"error": "not found"})))
        );
        assert_eq!(pipeline.limiter().in_flight(), 0);
    }

    #[tokio::test]
    async fn budget_is_shared_between_blocking_and_async_callers() {
        let transport = ScriptedTransport::new(Ok(HttpResponse::new(500, "boom")));
        let pipeline = pipeline(config(3, Duration::from_millis(300)), &transport);
        let started = Instant::now();

        // Failed calls still consume budget.
        let _ = pipeline.execute(HttpRequest::get("a"));
        assert!(started.elapsed() < Duration::from_millis(80));

        let _ = pipeline.execute_async(HttpRequest::get("b")).await;
        let _ = pipeline.execute(HttpRequest::get("c"));
        assert!(
            started.elapsed() >= Duration::from_millis(180),
            "later calls should have been spaced out, elapsed {:?}",
            started.elapsed()
        );
        assert_eq!(transport.recorded().len(), 3);
    }

    #[tokio::test]
    async fn mixed_callers_never_exceed_budget_within_one_period() {
        let transport = ScriptedTransport::new(Ok(HttpResponse::ok_json("{}")));
        let pipeline = pipeline(config(4, Duration::from_millis(800)), &transport);
        let window = Duration::from_millis(750);
        let started = Instant::now();
        let mut admitted = 0;

        for call in 0.. {
            if started.elapsed() >= window {
                break;
            }
            let request = HttpRequest::get("latest/dex/search");
            let outcome = if call % 2 == 0 {
                pipeline.execute(request)
            } else {
                pipeline.execute_async(request).await
            };
            outcome.expect("scripted call should succeed");
            if started.elapsed() < window {
                admitted += 1;
            }
        }

        assert!(
            (3..=4).contains(&admitted),
            "admitted {admitted} calls in {window:?} with budget 4/800ms"
        );
    }
}
