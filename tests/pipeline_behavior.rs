//! Behavior tests for the request pipeline against a real HTTP server.
//!
//! Each scenario runs the reqwest transports against a `wiremock` server and
//! checks how the outcome is classified on the blocking and async paths.

use std::net::TcpListener;
use std::time::{Duration, Instant};

use dexscreener_core::{
    ClientConfig, DexscreenerError, ErrorKind, HttpRequest, RateLimit, RequestPipeline,
    ResponseData,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5))
        .expect("timeout is non-zero")
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Runs one blocking call on a blocking thread; the pipeline never touches the async runtime.
async fn execute_blocking(
    config: ClientConfig,
    request: HttpRequest,
) -> Result<serde_json::Value, DexscreenerError> {
    tokio::task::spawn_blocking(move || {
        let pipeline = RequestPipeline::new(config).expect("config should be valid");
        pipeline.execute(request)
    })
    .await
    .expect("blocking task should not panic")
}

fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

// =============================================================================
// Successful responses
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn when_server_returns_json_both_paths_decode_it() {
    // Given: An endpoint returning a JSON array
    let server = MockServer::start().await;
    mount(
        &server,
        "/token-profiles/latest/v1",
        ResponseTemplate::new(200).set_body_json(json!([{"chainId": "solana"}])),
    )
    .await;
    let config = config_for(&server.uri());

    // When: The same request is issued on both paths
    let async_value = RequestPipeline::new(config.clone())
        .expect("config should be valid")
        .execute_async(HttpRequest::get("token-profiles/latest/v1"))
        .await
        .expect("async call should succeed");
    let blocking_value = execute_blocking(config, HttpRequest::get("token-profiles/latest/v1"))
        .await
        .expect("blocking call should succeed");

    // Then: Both decode to the same value
    assert_eq!(async_value, json!([{"chainId": "solana"}]));
    assert_eq!(async_value, blocking_value);
}

#[tokio::test]
async fn query_parameters_and_user_agent_reach_the_server() {
    // Given: A search endpoint that requires the encoded query and the default agent
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest/dex/search"))
        .and(query_param("q", "SOL/USDC"))
        .and(header(
            "user-agent",
            format!("dexscreener-rs/{}", env!("CARGO_PKG_VERSION")).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pairs": []})))
        .expect(1)
        .mount(&server)
        .await;
    let pipeline = RequestPipeline::new(config_for(&server.uri())).expect("valid config");

    // When: A request with a query parameter is issued
    let value = pipeline
        .execute_async(HttpRequest::get("latest/dex/search").with_query("q", "SOL/USDC"))
        .await
        .expect("search should succeed");

    // Then: The server matched the request
    assert_eq!(value, json!({"pairs": []}));
}

// =============================================================================
// Classified failures
// =============================================================================

#[tokio::test]
async fn when_server_returns_429_retry_after_is_reported() {
    // Given: An endpoint over its upstream budget
    let server = MockServer::start().await;
    mount(
        &server,
        "/limited",
        ResponseTemplate::new(429).insert_header("Retry-After", "5"),
    )
    .await;
    mount(&server, "/limited-no-hint", ResponseTemplate::new(429)).await;
    let pipeline = RequestPipeline::new(config_for(&server.uri())).expect("valid config");

    // When: Both endpoints are called
    let with_hint = pipeline
        .execute_async(HttpRequest::get("limited"))
        .await
        .expect_err("429 is an error");
    let without_hint = pipeline
        .execute_async(HttpRequest::get("limited-no-hint"))
        .await
        .expect_err("429 is an error");

    // Then: Retry-After is parsed when present
    assert!(matches!(
        with_hint,
        DexscreenerError::RateLimitExceeded {
            retry_after: Some(5)
        }
    ));
    assert_eq!(
        with_hint.to_string(),
        "API Error 429: Rate limit exceeded. Retry after 5 seconds"
    );
    assert!(matches!(
        without_hint,
        DexscreenerError::RateLimitExceeded { retry_after: None }
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn when_server_returns_404_json_payload_is_kept() {
    // Given: A missing resource with a JSON error body
    let server = MockServer::start().await;
    mount(
        &server,
        "/missing",
        ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})),
    )
    .await;
    let config = config_for(&server.uri());

    // When: It is requested through the blocking path
    let error = execute_blocking(config, HttpRequest::get("missing"))
        .await
        .expect_err("404 is an error");

    // Then: A protocol error carries the status and decoded payload
    assert_eq!(error.kind(), ErrorKind::Protocol);
    assert_eq!(error.status(), Some(404));
    assert!(error.is_not_found());
    assert_eq!(
        error.response_data(),
        Some(&ResponseData::Json(json!({"error": "not found"})))
    );
    assert_eq!(
        error.to_string(),
        format!("API Error 404: Request to {}/missing failed", server.uri())
    );
}

#[tokio::test]
async fn when_success_body_is_not_json_it_is_a_protocol_error() {
    // Given: A 200 response with a plain-text body
    let server = MockServer::start().await;
    mount(
        &server,
        "/plain",
        ResponseTemplate::new(200).set_body_string("not json"),
    )
    .await;
    let pipeline = RequestPipeline::new(config_for(&server.uri())).expect("valid config");

    // When: It is requested
    let error = pipeline
        .execute_async(HttpRequest::get("plain"))
        .await
        .expect_err("undecodable body is an error");

    // Then: The original status and raw text are kept
    match error {
        DexscreenerError::Protocol {
            status,
            message,
            response_data,
        } => {
            assert_eq!(status, 200);
            assert_eq!(message, format!("Invalid JSON response from {}/plain", server.uri()));
            assert_eq!(response_data, ResponseData::Text(String::from("not json")));
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

// =============================================================================
// Transport failures
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn when_server_stalls_both_paths_time_out() {
    // Given: A server slower than the request timeout
    let server = MockServer::start().await;
    mount(
        &server,
        "/slow",
        ResponseTemplate::new(200)
            .set_body_json(json!({}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    let timeout = Duration::from_millis(200);
    let config = config_for(&server.uri())
        .with_timeout(timeout)
        .expect("timeout is non-zero");

    // When: The endpoint is called on both paths
    let pipeline = RequestPipeline::new(config.clone()).expect("valid config");
    let started = Instant::now();
    let async_error = pipeline
        .execute_async(HttpRequest::get("slow"))
        .await
        .expect_err("async call should time out");
    let async_elapsed = started.elapsed();
    let blocking_error = execute_blocking(config, HttpRequest::get("slow"))
        .await
        .expect_err("blocking call should time out");

    // Then: Both report a timeout with the url, well before the server answers
    for error in [&async_error, &blocking_error] {
        match error {
            DexscreenerError::Timeout { url, timeout: t } => {
                assert_eq!(url, &format!("{}/slow", server.uri()));
                assert_eq!(*t, timeout);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
    assert!(async_elapsed < Duration::from_secs(2));
    assert_eq!(pipeline.limiter().in_flight(), 0);
}

#[tokio::test]
async fn per_request_timeout_overrides_the_default() {
    // Given: A generous default and a slow endpoint
    let server = MockServer::start().await;
    mount(
        &server,
        "/slow",
        ResponseTemplate::new(200)
            .set_body_json(json!({}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    let pipeline = RequestPipeline::new(config_for(&server.uri())).expect("valid config");

    // When: The request carries a short timeout of its own
    let error = pipeline
        .execute_async(HttpRequest::get("slow").with_timeout(Duration::from_millis(100)))
        .await
        .expect_err("call should time out");

    // Then: The request timeout wins
    assert!(matches!(
        error,
        DexscreenerError::Timeout { timeout, .. } if timeout == Duration::from_millis(100)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn when_connection_is_refused_it_is_a_network_error() {
    // Given: A base URL nothing listens on
    let config = config_for(&unused_local_url());

    // When: Both paths try to reach it
    let async_error = RequestPipeline::new(config.clone())
        .expect("valid config")
        .execute_async(HttpRequest::get("anything"))
        .await
        .expect_err("nothing is listening");
    let blocking_error = execute_blocking(config, HttpRequest::get("anything"))
        .await
        .expect_err("nothing is listening");

    // Then: Both are network failures, retryable and without status
    for error in [async_error, blocking_error] {
        assert_eq!(error.kind(), ErrorKind::Network);
        assert_eq!(error.status(), None);
        assert!(error.retryable());
        assert!(error.to_string().starts_with("Network error: "));
    }
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn calls_over_budget_are_delayed_not_refused() {
    // Given: A budget of two calls per second
    let server = MockServer::start().await;
    mount(
        &server,
        "/ok",
        ResponseTemplate::new(200).set_body_json(json!({"ok": true})),
    )
    .await;
    let config = config_for(&server.uri()).with_rate_limit(
        RateLimit::new(2, Duration::from_secs(1)).expect("valid rate limit"),
    );
    let pipeline = RequestPipeline::new(config).expect("valid config");

    // When: Three calls are made back to back
    let started = Instant::now();
    for _ in 0..3 {
        pipeline
            .execute_async(HttpRequest::get("ok"))
            .await
            .expect("every call should succeed");
    }

    // Then: Each call after the first waited for its own slot
    assert!(started.elapsed() >= Duration::from_millis(900));
    assert_eq!(pipeline.limiter().in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn admissions_inside_one_period_stay_within_budget_on_both_paths() {
    // Given: A budget of three calls per 600ms
    let server = MockServer::start().await;
    mount(
        &server,
        "/ok",
        ResponseTemplate::new(200).set_body_json(json!({"ok": true})),
    )
    .await;
    let config = config_for(&server.uri()).with_rate_limit(
        RateLimit::new(3, Duration::from_millis(600)).expect("valid rate limit"),
    );
    let window = Duration::from_millis(550);

    // When: Each path calls as fast as it is allowed for just under one period
    let pipeline = RequestPipeline::new(config.clone()).expect("valid config");
    let started = Instant::now();
    let mut async_admitted = 0;
    while started.elapsed() < window {
        pipeline
            .execute_async(HttpRequest::get("ok"))
            .await
            .expect("every call should succeed");
        if started.elapsed() < window {
            async_admitted += 1;
        }
    }
    let blocking_admitted = tokio::task::spawn_blocking(move || {
        let pipeline = RequestPipeline::new(config).expect("valid config");
        let started = Instant::now();
        let mut admitted = 0;
        while started.elapsed() < window {
            pipeline
                .execute(HttpRequest::get("ok"))
                .expect("every call should succeed");
            if started.elapsed() < window {
                admitted += 1;
            }
        }
        admitted
    })
    .await
    .expect("blocking task should not panic");

    // Then: Neither path exceeded the budget
    assert!(async_admitted <= 3, "async path admitted {async_admitted}");
    assert!(blocking_admitted <= 3, "blocking path admitted {blocking_admitted}");
    assert!(async_admitted >= 2 && blocking_admitted >= 2);
}

#[tokio::test]
async fn errors_consume_budget_like_successes() {
    // Given: A budget of one call per minute
    let server = MockServer::start().await;
    mount(&server, "/broken", ResponseTemplate::new(500)).await;
    let config = config_for(&server.uri())
        .with_rate_limit(RateLimit::per_minute(1).expect("valid rate limit"));
    let pipeline = RequestPipeline::new(config).expect("valid config");

    // When: The only call fails with a server error
    let error = pipeline
        .execute_async(HttpRequest::get("broken"))
        .await
        .expect_err("500 is an error");

    // Then: The slot is spent anyway and the failure is retryable
    assert!(error.retryable());
    assert!(pipeline.limiter().try_acquire().is_none());
}
