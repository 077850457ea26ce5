//! Coinglass client tests against a canned local HTTP upstream
//!
//! Exercises the real client's degradation branches: non-200 status,
//! unparseable body, and network error all yield Unavailable.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use mcc_context::coinglass::{CoinglassClient, HeatmapFetch, HeatmapSource};
use mcc_context::config::CoinglassConfig;
use mcc_context::types::ClusterSide;

/// Serve one connection with a canned HTTP response; resolves to the
/// raw request the client sent
async fn spawn_upstream(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base, handle)
}

fn client_for(api_base: &str) -> CoinglassClient {
    CoinglassClient::new(&CoinglassConfig {
        api_base: api_base.to_string(),
        secret: "DEMO".to_string(),
        timeout_secs: 2,
    })
    .unwrap()
}

#[tokio::test]
async fn upstream_500_degrades_to_unavailable() {
    let (base, upstream) = spawn_upstream("500 Internal Server Error", "").await;
    let result = client_for(&base).fetch_clusters("BTC/USDT").await;

    assert_eq!(result, HeatmapFetch::Unavailable);
    upstream.await.unwrap();
}

#[tokio::test]
async fn unparseable_body_degrades_to_unavailable() {
    let (base, upstream) = spawn_upstream("200 OK", "not json at all").await;
    let result = client_for(&base).fetch_clusters("BTC/USDT").await;

    assert_eq!(result, HeatmapFetch::Unavailable);
    upstream.await.unwrap();
}

#[tokio::test]
async fn connection_refused_degrades_to_unavailable() {
    // Bind then drop so the port is known-dead
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = client_for(&base).fetch_clusters("BTC/USDT").await;
    assert_eq!(result, HeatmapFetch::Unavailable);
}

#[tokio::test]
async fn valid_body_yields_clusters_with_normalized_request() {
    let body = r#"{"code":"0","data":[
        {"side":"short","price":"65000.5","size":120000},
        {"side":"long","price":64000.0,"size":"90000"}
    ]}"#;
    let (base, upstream) = spawn_upstream("200 OK", body).await;
    let result = client_for(&base).fetch_clusters("BTC/USDT").await;

    let data = match result {
        HeatmapFetch::Data(data) => data,
        HeatmapFetch::Unavailable => panic!("expected heatmap data"),
    };
    assert_eq!(data.heatmap.n3.len(), 2);
    assert_eq!(data.heatmap.n3[0].side, ClusterSide::Short);
    assert_eq!(data.heatmap.n3[0].price, 65000.5);
    assert_eq!(data.heatmap.n3[1].size_usd, 90000.0);
    assert!(data.liquidations.n3.is_empty());

    // Symbol separator stripped and credential header attached
    let request = upstream.await.unwrap();
    assert!(request.starts_with("GET /futures/liquidation_heatmap?symbol=BTCUSDT "));
    assert!(request.to_lowercase().contains("coinglasssecret: demo"));
}
