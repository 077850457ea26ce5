//! Coinglass liquidation-heatmap fetcher
//!
//! Soft dependency: every failure mode (network error, non-200 status,
//! unparseable body) degrades to `HeatmapFetch::Unavailable` so the
//! primary market-context request never fails because of Coinglass.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;

use crate::config::CoinglassConfig;
use crate::exchange::normalize_symbol;
use crate::types::{ClusterSide, CoinglassCluster, CoinglassData};

/// Maximum heatmap entries mapped into clusters
const MAX_CLUSTERS: usize = 3;

/// Outcome of a heatmap fetch; unavailability is an expected state, not
/// an error
#[derive(Debug, Clone, PartialEq)]
pub enum HeatmapFetch {
    Data(CoinglassData),
    Unavailable,
}

impl HeatmapFetch {
    /// Flatten to wire shape: unavailable becomes an empty cluster set
    pub fn into_data(self) -> CoinglassData {
        match self {
            HeatmapFetch::Data(data) => data,
            HeatmapFetch::Unavailable => CoinglassData::default(),
        }
    }
}

/// Source of liquidation-heatmap clusters, injectable for tests
#[async_trait]
pub trait HeatmapSource: Send + Sync {
    async fn fetch_clusters(&self, symbol: &str) -> HeatmapFetch;
}

/// Coinglass REST client
#[derive(Debug, Clone)]
pub struct CoinglassClient {
    http: reqwest::Client,
    api_base: String,
    secret: String,
}

impl CoinglassClient {
    pub fn new(config: &CoinglassConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            secret: config.secret.clone(),
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(secret) = HeaderValue::from_str(&self.secret) {
            headers.insert("coinglassSecret", secret);
        }
        headers
    }
}

#[async_trait]
impl HeatmapSource for CoinglassClient {
    async fn fetch_clusters(&self, symbol: &str) -> HeatmapFetch {
        let url = format!(
            "{}/futures/liquidation_heatmap?symbol={}",
            self.api_base,
            normalize_symbol(symbol)
        );

        let response = match self.http.get(&url).headers(self.headers()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Coinglass request failed, degrading");
                return HeatmapFetch::Unavailable;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                symbol = %symbol,
                status = %response.status(),
                "Coinglass returned non-200, degrading"
            );
            return HeatmapFetch::Unavailable;
        }

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Coinglass body unparseable, degrading");
                return HeatmapFetch::Unavailable;
            }
        };

        let clusters = parse_heatmap_body(&body);
        HeatmapFetch::Data(CoinglassData::from_heatmap_clusters(clusters))
    }
}

/// Extract at most [`MAX_CLUSTERS`] clusters from a heatmap response
/// body, skipping entries with unusable fields
pub fn parse_heatmap_body(body: &serde_json::Value) -> Vec<CoinglassCluster> {
    let Some(entries) = body.get("data").and_then(|d| d.as_array()) else {
        return Vec::new();
    };

    entries
        .iter()
        .take(MAX_CLUSTERS)
        .filter_map(parse_cluster)
        .collect()
}

fn parse_cluster(entry: &serde_json::Value) -> Option<CoinglassCluster> {
    let side = match entry.get("side").and_then(|s| s.as_str()) {
        Some("short") => ClusterSide::Short,
        _ => ClusterSide::Long,
    };

    Some(CoinglassCluster {
        side,
        price: numeric_field(entry.get("price"))?,
        size_usd: numeric_field(entry.get("size"))?,
    })
}

/// Coinglass reports numbers both as JSON numbers and as strings; a
/// missing field counts as zero, anything else poisons the entry
fn numeric_field(value: Option<&serde_json::Value>) -> Option<f64> {
    match value {
        None | Some(serde_json::Value::Null) => Some(0.0),
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.parse().ok(),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_heatmap_body_caps_at_three() {
        let body = json!({
            "data": [
                {"side": "long", "price": 64000.0, "size": 1_000_000.0},
                {"side": "short", "price": 66000.0, "size": 2_000_000.0},
                {"side": "long", "price": 63000.0, "size": 500_000.0},
                {"side": "short", "price": 67000.0, "size": 900_000.0},
                {"side": "long", "price": 62000.0, "size": 400_000.0},
            ]
        });
        let clusters = parse_heatmap_body(&body);
        assert_eq!(clusters.len(), 3);
        // Input order preserved
        assert_eq!(clusters[0].price, 64000.0);
        assert_eq!(clusters[1].side, ClusterSide::Short);
        assert_eq!(clusters[2].price, 63000.0);
    }

    #[test]
    fn test_parse_heatmap_body_skips_bad_entries() {
        let body = json!({
            "data": [
                {"side": "short", "price": "not a number", "size": 1.0},
                {"side": "short", "price": "65000.5", "size": "120000"},
                {"side": "up", "price": 64000.0},
            ]
        });
        let clusters = parse_heatmap_body(&body);
        assert_eq!(clusters.len(), 2);
        // String-typed numerics coerced
        assert_eq!(clusters[0].price, 65000.5);
        assert_eq!(clusters[0].size_usd, 120000.0);
        // Unknown side falls back to long, missing size counts as zero
        assert_eq!(clusters[1].side, ClusterSide::Long);
        assert_eq!(clusters[1].size_usd, 0.0);
    }

    #[test]
    fn test_parse_heatmap_body_without_data() {
        assert!(parse_heatmap_body(&json!({})).is_empty());
        assert!(parse_heatmap_body(&json!({"data": null})).is_empty());
        assert!(parse_heatmap_body(&json!({"code": "40001"})).is_empty());
    }

    #[test]
    fn test_unavailable_flattens_to_empty() {
        let data = HeatmapFetch::Unavailable.into_data();
        assert!(data.heatmap.n3.is_empty());
        assert!(data.liquidations.n3.is_empty());
    }
}
