//! Integration tests for the API client and fetch/cache layer against a
//! stubbed backend.

use serde_json::json;
use time::macros::datetime;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use glucodash_core::client::ApiClient;
use glucodash_core::error::Error;
use glucodash_core::feed::GlucoseFeed;
use glucodash_core::stats::DashboardStats;
use glucodash_core::zones::Zones;
use glucodash_types::{DataSource, Range};

fn glucose_payload() -> serde_json::Value {
    json!({
        "source": "real_csv",
        "data": [
            {"ts": "2025-03-01T08:00:00+00:00", "mgdl": 120, "trend": "stable"},
            {"ts": "2025-03-01T08:05:00+00:00", "mgdl": 150}
        ],
        "range": "24h"
    })
}

#[tokio::test]
async fn fetch_decodes_and_caches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/glucose"))
        .and(query_param("range", "24h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(glucose_payload()))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let feed = GlucoseFeed::new(client);

    assert!(feed.cached(Range::H24).is_none());

    let entry = feed.fetch(Range::H24).await.unwrap();
    assert_eq!(entry.source, DataSource::Historical);
    assert_eq!(entry.readings.len(), 2);
    assert_eq!(entry.readings[1].mgdl, 150);

    let cached = feed.cached(Range::H24).unwrap();
    assert_eq!(cached.readings.len(), 2);
    assert!(feed.is_fresh(Range::H24));
}

#[tokio::test]
async fn refetching_unchanged_payload_leaves_stats_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/glucose"))
        .respond_with(ResponseTemplate::new(200).set_body_json(glucose_payload()))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let feed = GlucoseFeed::new(client);
    let zones = Zones::default();
    let now = datetime!(2025-03-01 08:06 UTC);

    let first = feed.fetch(Range::H24).await.unwrap();
    let stats_first = DashboardStats::derive(&first.readings, &first.readings, now, &zones);

    let second = feed.fetch(Range::H24).await.unwrap();
    let stats_second = DashboardStats::derive(&second.readings, &second.readings, now, &zones);

    assert_eq!(stats_first, stats_second);
    assert_eq!(stats_first.current, Some(150));
    assert_eq!(stats_first.average_24h, Some(135));
}

#[tokio::test]
async fn fetch_error_leaves_previous_cache_for_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/glucose"))
        .respond_with(ResponseTemplate::new(200).set_body_json(glucose_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let feed = GlucoseFeed::new(client);
    feed.fetch(Range::H24).await.unwrap();

    // Backend starts failing; the cached entry must survive untouched.
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/glucose"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&server)
        .await;

    let err = feed.fetch(Range::H24).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert_eq!(feed.cached(Range::H24).unwrap().readings.len(), 2);
}

#[tokio::test]
async fn fetch_unreachable_backend() {
    // Nothing is listening on this port.
    let client = ApiClient::new("http://127.0.0.1:1").unwrap();
    let feed = GlucoseFeed::new(client);

    let err = feed.fetch(Range::H3).await.unwrap_err();
    assert!(err.is_unreachable());
    assert!(feed.cached(Range::H3).is_none());
}

#[tokio::test]
async fn chat_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "how am I doing?", "user_id": "default_user"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "response": "Your levels look steady today."
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let reply = client.chat("how am I doing?", "default_user").await.unwrap();
    assert!(reply.success);
    assert_eq!(reply.response, "Your levels look steady today.");
}

#[tokio::test]
async fn authorization_url_happy_path_and_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dexcom/connect"))
        .and(query_param("user_id", "default_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authorization_url": "https://provider.example/oauth?state=s"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let url = client.authorization_url("default_user").await.unwrap();
    assert!(url.starts_with("https://provider.example/oauth"));

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/dexcom/connect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client.authorization_url("default_user").await.unwrap_err();
    assert!(matches!(err, Error::NoAuthorizationUrl));
}

#[tokio::test]
async fn status_and_exchange_and_disconnect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dexcom/status/default_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connected": true,
            "token_valid": true,
            "expires_at": "2025-07-01T00:00:00+00:00"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dexcom/exchange-token"))
        .and(body_json(json!({"code": "c1", "state": "s1", "user_id": "default_user"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": "cgm-jane"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dexcom/disconnect/default_user"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();

    let status = client.status("default_user").await.unwrap();
    assert!(status.connected);
    assert!(status.token_valid);
    assert!(status.expires_at.is_some());

    let outcome = client.exchange_token("c1", "s1", "default_user").await.unwrap();
    assert_eq!(outcome.user_id.as_deref(), Some("cgm-jane"));

    client.disconnect("default_user").await.unwrap();
}

#[tokio::test]
async fn error_body_detail_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/glucose"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Invalid range. Must be one of: ['3h', '6h', '12h', '24h']"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let err = client.readings(Range::H3).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("Invalid range"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
