use std::sync::Arc;

use reqwest::StatusCode;

use crate::broker::SubscriptionService;
use crate::transport::http::{HttpServer, PUBLISHED_AT_HEADER};

async fn start_server() -> (String, Arc<SubscriptionService>) {
    let service = Arc::new(SubscriptionService::new());
    let server = HttpServer::bind("127.0.0.1:0", service.clone())
        .await
        .expect("Failed to bind");
    let addr = server.local_addr().expect("No local address");

    tokio::spawn(server.run());

    (format!("http://{addr}"), service)
}

#[tokio::test]
async fn test_http_status_codes() {
    let (base, _service) = start_server().await;
    let http = reqwest::Client::new();

    let res = http.get(format!("{base}/news/alice")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = http.post(format!("{base}/news/alice")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = http.get(format!("{base}/news/alice")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = http.delete(format!("{base}/news/alice")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = http.delete(format!("{base}/news/alice")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = http.get(format!("{base}/news/alice")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_http_publish_and_poll_raw_bytes() {
    let (base, _service) = start_server().await;
    let http = reqwest::Client::new();
    let bytes = vec![0xff, 0x00, 0xfe];

    http.post(format!("{base}/bin/alice")).send().await.unwrap();

    let res = http
        .post(format!("{base}/bin"))
        .body(bytes.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    http.post(format!("{base}/bin"))
        .body("second")
        .send()
        .await
        .unwrap();

    let res = http.get(format!("{base}/bin/alice")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["content-type"],
        "application/octet-stream"
    );
    let published_at: i64 = res.headers()[PUBLISHED_AT_HEADER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(published_at > 0);
    assert_eq!(res.bytes().await.unwrap().to_vec(), bytes);

    let res = http.get(format!("{base}/bin/alice")).send().await.unwrap();
    assert_eq!(res.bytes().await.unwrap().to_vec(), b"second");

    let res = http.get(format!("{base}/bin/alice")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_http_publish_without_subscribers_is_dropped() {
    let (base, service) = start_server().await;
    let http = reqwest::Client::new();

    let res = http
        .post(format!("{base}/empty"))
        .body("lost")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    service.subscribe("empty", "late");
    assert_eq!(service.poll_next("empty", "late"), crate::broker::Poll::Empty);
}

#[tokio::test]
async fn test_http_shares_service_with_other_callers() {
    let (base, service) = start_server().await;
    let http = reqwest::Client::new();

    http.post(format!("{base}/alerts/ops")).send().await.unwrap();
    service.publish("alerts", "disk full");

    let res = http.get(format!("{base}/alerts/ops")).send().await.unwrap();
    assert_eq!(res.bytes().await.unwrap().to_vec(), b"disk full");
}
