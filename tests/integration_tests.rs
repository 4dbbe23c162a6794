//! Integration tests using mock HTTP server
//!
//! Tests the public surface end to end: config → client → retries → pages

use futures::StreamExt;
use gettr_client::http::RecordingSleeper;
use gettr_client::{ApiClient, ClientConfig, Error, PaginationConfig, RequestSpec};
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn posts_page(ids: &[&str]) -> serde_json::Value {
    json!({
        "_t": "xresp",
        "rc": "OK",
        "results": {
            "data": {"_t": "alist", "list": ids},
            "aux": {}
        }
    })
}

// ============================================================================
// Request Integration Tests
// ============================================================================

#[tokio::test]
async fn test_config_file_drives_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s/uinf/jack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": {"data": {"username": "jack"}}
        })))
        .mount(&mock_server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "base_url: \"{}\"", mock_server.uri()).unwrap();
    writeln!(file, "backoff:\n  unit_ms: 1").unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();
    let client = ApiClient::with_config(config).unwrap();

    let value = client
        .execute(&RequestSpec::new("/s/uinf/jack"))
        .await
        .unwrap();
    assert_eq!(value["data"]["username"], "jack");
}

#[tokio::test]
async fn test_real_sleeper_with_small_unit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": true})))
        .mount(&mock_server)
        .await;

    // 1ms unit: waits 4ms then 16ms on the tokio timer
    let config = ClientConfig::builder()
        .base_url(mock_server.uri())
        .backoff(4, Duration::from_millis(1))
        .build();
    let client = ApiClient::with_config(config).unwrap();

    let start = std::time::Instant::now();
    let value = client.execute(&RequestSpec::new("/flaky")).await.unwrap();

    assert_eq!(value, json!(true));
    assert!(start.elapsed() >= Duration::from_millis(20));
}

// ============================================================================
// Pagination Integration Tests
// ============================================================================

#[tokio::test]
async fn test_paginate_posts_until_empty() {
    let mock_server = MockServer::start().await;

    for (offset, ids) in [("0", vec!["p1", "p2"]), ("2", vec!["p3"]), ("4", vec![])] {
        Mock::given(method("GET"))
            .and(path("/u/user/jack/posts"))
            .and(query_param("offset", offset))
            .and(query_param("max", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(posts_page(&ids)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = ApiClient::with_base_url(mock_server.uri()).unwrap();
    let request = RequestSpec::new("/u/user/jack/posts").param("max", 2);
    let pagination = PaginationConfig::new().offset_step(2);

    let mut pages = client.paginate(request, pagination).unwrap();
    let mut posts = Vec::new();

    while let Some(page) = pages.next().await {
        let page = page.unwrap();
        let list = page["data"]["list"].as_array().cloned().unwrap_or_default();
        if list.is_empty() {
            break;
        }
        posts.extend(list);
    }

    assert_eq!(posts, vec![json!("p1"), json!("p2"), json!("p3")]);
    // The empty page at 4 was consumed, so the next page would be 6
    assert_eq!(pages.cursor(), 6);

    let offsets: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "offset")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(offsets, vec!["0", "2", "4"]);
}

#[tokio::test]
async fn test_paginate_failure_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/u/user/jack/followers"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_page(&["a"])))
        .mount(&mock_server)
        .await;

    // Success status but no "results": treated like an outage
    Mock::given(method("GET"))
        .and(path("/u/user/jack/followers"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rc": "ERR"})))
        .mount(&mock_server)
        .await;

    let sleeper = RecordingSleeper::new();
    let client = ApiClient::with_base_url(mock_server.uri())
        .unwrap()
        .with_sleeper(sleeper.clone());

    let results: Vec<_> = client
        .paginate(
            RequestSpec::new("/u/user/jack/followers"),
            PaginationConfig::default(),
        )
        .unwrap()
        .collect()
        .await;

    // The stream ends itself after the error, so collect terminates
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    match &results[1] {
        Err(Error::RequestExhausted {
            attempts,
            last_status,
            ..
        }) => {
            assert_eq!(*attempts, 3);
            assert_eq!(*last_status, Some(200));
        }
        other => panic!("Expected RequestExhausted, got {other:?}"),
    }
    assert_eq!(
        sleeper.delays(),
        vec![Duration::from_secs(4), Duration::from_secs(16)]
    );
}

#[tokio::test]
async fn test_independent_streams_do_not_share_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&mock_server)
        .await;

    let client = ApiClient::with_base_url(mock_server.uri()).unwrap();
    let mut a = client
        .paginate(RequestSpec::new("/feed"), PaginationConfig::default())
        .unwrap();
    let mut b = client
        .paginate(RequestSpec::new("/feed"), PaginationConfig::default())
        .unwrap();

    a.next().await.unwrap().unwrap();
    a.next().await.unwrap().unwrap();
    b.next().await.unwrap().unwrap();

    assert_eq!(a.cursor(), 40);
    assert_eq!(b.cursor(), 20);
}
