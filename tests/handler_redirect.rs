mod common;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use common::{InMemoryCache, InMemoryStore, create_test_state, test_router};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_redirect_success() {
    let store = InMemoryStore::new();
    let cache = InMemoryCache::new();
    store.insert("redir1", "https://example.com/target", true, None);

    let (state, _rx) = create_test_state(store.clone(), cache.clone());
    let server = TestServer::new(test_router(state)).unwrap();

    let response = server.get("/redir1").await;

    assert_eq!(response.status_code(), 307);
    let location = response.header("location");
    assert_eq!(location, "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_populates_cache_then_skips_store() {
    let store = InMemoryStore::new();
    let cache = InMemoryCache::new();
    store.insert("warm01", "https://example.com/", true, None);

    let (state, _rx) = create_test_state(store.clone(), cache.clone());
    let server = TestServer::new(test_router(state)).unwrap();

    assert_eq!(server.get("/warm01").await.status_code(), 307);
    assert_eq!(store.find_calls(), 1);
    assert_eq!(cache.cached("warm01").as_deref(), Some("https://example.com/"));

    for _ in 0..3 {
        assert_eq!(server.get("/warm01").await.status_code(), 307);
    }
    assert_eq!(store.find_calls(), 1);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (state, _rx) = create_test_state(InMemoryStore::new(), InMemoryCache::new());
    let server = TestServer::new(test_router(state)).unwrap();

    let response = server.get("/nothere").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_inactive_link_looks_like_missing_link() {
    let store = InMemoryStore::new();
    store.insert("off001", "https://example.com/", false, None);

    let (state, _rx) = create_test_state(store, InMemoryCache::new());
    let server = TestServer::new(test_router(state)).unwrap();

    let inactive = server.get("/off001").await;
    let missing = server.get("/none01").await;

    assert_eq!(inactive.status_code(), 404);
    assert_eq!(missing.status_code(), 404);
    assert_eq!(
        inactive.json::<serde_json::Value>()["error"]["message"],
        missing.json::<serde_json::Value>()["error"]["message"]
    );
}

#[tokio::test]
async fn test_expired_link_is_gone() {
    let store = InMemoryStore::new();
    let cache = InMemoryCache::new();
    store.insert(
        "old001",
        "https://example.com/",
        true,
        Some(Utc::now() - Duration::hours(1)),
    );

    let (state, mut rx) = create_test_state(store, cache.clone());
    let server = TestServer::new(test_router(state)).unwrap();

    let response = server.get("/old001").await;

    assert_eq!(response.status_code(), 410);
    assert_eq!(response.json::<serde_json::Value>()["error"]["code"], "gone");
    assert_eq!(cache.cached("old001"), None);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_queues_visit() {
    let store = InMemoryStore::new();
    store.insert("track1", "https://example.com/", true, None);

    let (state, mut rx) = create_test_state(store, InMemoryCache::new());
    let server = TestServer::new(test_router(state)).unwrap();

    let response = server
        .get("/track1")
        .add_header("User-Agent", "TestBot/1.0")
        .await;

    assert_eq!(response.status_code(), 307);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.key, "track1");
    assert_eq!(event.user_agent.as_deref(), Some("TestBot/1.0"));
    assert_eq!(event.ip.map(|ip| ip.to_string()).as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_redirect_survives_cache_outage() {
    let store = InMemoryStore::new();
    let cache = InMemoryCache::new();
    store.insert("down01", "https://example.com/", true, None);
    cache.down.store(true, Ordering::SeqCst);

    let (state, _rx) = create_test_state(store.clone(), cache);
    let server = TestServer::new(test_router(state)).unwrap();

    for _ in 0..3 {
        assert_eq!(server.get("/down01").await.status_code(), 307);
    }
    assert_eq!(store.find_calls(), 3);
}

#[tokio::test]
async fn test_redirect_store_failure_is_internal_error() {
    let store = InMemoryStore::new();
    store.insert("dbfail", "https://example.com/", true, None);
    store.offline.store(true, Ordering::SeqCst);

    let (state, _rx) = create_test_state(store, InMemoryCache::new());
    let server = TestServer::new(test_router(state)).unwrap();

    assert_eq!(server.get("/dbfail").await.status_code(), 500);
}

#[tokio::test]
async fn test_cache_hit_counts_click_in_cache() {
    let store = InMemoryStore::new();
    let cache = InMemoryCache::new();
    store.insert("hits01", "https://example.com/", true, None);

    let (state, _rx) = create_test_state(store, cache.clone());
    let server = TestServer::new(test_router(state)).unwrap();

    server.get("/hits01").await;
    server.get("/hits01").await;

    for _ in 0..100 {
        if cache.clicks("hits01") == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(cache.clicks("hits01"), 1);
}
