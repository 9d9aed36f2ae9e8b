use std::time::Duration;
use telemetry_client::{build_http_client, Fetch, FetchError, JsonEndpoint};
use telemetry_config::ServiceConfig;
use telemetry_history::{Activity, HistoryBatch};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Answer a single request with `status` and `body`, return the URL.
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 2048];
        let _ = stream.read(&mut request).await.unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
    });
    format!("http://{addr}/history")
}

fn client(timeout_ms: u64) -> reqwest::Client {
    build_http_client(&ServiceConfig {
        request_timeout_ms: timeout_ms,
        ..ServiceConfig::default()
    })
    .unwrap()
}

const HISTORY_BODY: &str = r#"{
    "acc": [[0.1, 0.2], [0.3, 0.4], [0.5, 0.6], [1, 2], [3, 4], [5, 6]],
    "dev": [[0, 0], [0, 0], [0, 0], [0, 0], [0, 0], [0, 0]],
    "current_step": 42,
    "activity": 1
}"#;

#[tokio::test]
async fn decodes_history_batch() {
    let url = serve_once("200 OK", HISTORY_BODY).await;
    let mut endpoint = JsonEndpoint::<HistoryBatch>::new(client(2000), url);

    let batch = endpoint.fetch().await.unwrap();
    assert_eq!(batch.current_step, 42);
    assert_eq!(batch.activity, Activity::Walking);
    assert_eq!(batch.acc[3], vec![1.0, 2.0]);
    assert_eq!(batch.validate().unwrap(), 2);
}

#[tokio::test]
async fn error_status_is_reported() {
    let url = serve_once("503 Service Unavailable", "{}").await;
    let mut endpoint = JsonEndpoint::<HistoryBatch>::new(client(2000), url);

    match endpoint.fetch().await {
        Err(FetchError::Status(status)) => assert_eq!(status.as_u16(), 503),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn bad_payload_is_a_decode_error() {
    let url = serve_once("200 OK", r#"{"acc": [], "activity": 7}"#).await;
    let mut endpoint = JsonEndpoint::<HistoryBatch>::new(client(2000), url);

    assert!(matches!(endpoint.fetch().await, Err(FetchError::Decode(_))));
}

#[tokio::test]
async fn hung_request_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/data", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });
    let mut endpoint = JsonEndpoint::<HistoryBatch>::new(client(50), url);

    match endpoint.fetch().await {
        Err(FetchError::Transport(e)) => assert!(e.is_timeout(), "{e}"),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/data", listener.local_addr().unwrap());
    drop(listener);
    let mut endpoint = JsonEndpoint::<HistoryBatch>::new(client(2000), url);

    assert!(matches!(endpoint.fetch().await, Err(FetchError::Transport(_))));
}
