//! Exchange candle fetcher
//!
//! Pulls historical klines from the Binance REST API for a symbol,
//! timeframe, and bar count. This is the hard dependency: any failure
//! here fails the whole request.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::ExchangeConfig;
use crate::types::{Candle, Timeframe};

/// Source of historical OHLCV data, injectable for tests
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback_bars: u32,
    ) -> Result<Vec<Candle>>;
}

/// Normalize an exchange pair like "BTC/USDT" to API form "BTCUSDT"
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.replace('/', "").to_uppercase()
}

/// Binance klines REST client
#[derive(Debug, Clone)]
pub struct BinanceClient {
    http: reqwest::Client,
    rest_url: String,
}

impl BinanceClient {
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            rest_url: config.rest_url.clone(),
        })
    }
}

#[async_trait]
impl MarketDataSource for BinanceClient {
    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback_bars: u32,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}?symbol={}&interval={}&limit={}",
            self.rest_url,
            normalize_symbol(symbol),
            timeframe.interval(),
            lookback_bars
        );

        tracing::info!(
            symbol = %symbol,
            timeframe = %timeframe,
            limit = lookback_bars,
            "📥 Fetching candles from Binance..."
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to fetch candles from Binance")?;

        if !response.status().is_success() {
            bail!("Binance API returned error: {}", response.status());
        }

        // Response is an array of arrays:
        // [[open_time, open, high, low, close, volume, close_time, ...], ...]
        let klines: Vec<Vec<serde_json::Value>> = response
            .json()
            .await
            .context("Failed to parse Binance klines response")?;

        let candles = parse_klines(klines);

        tracing::info!(
            symbol = %symbol,
            timeframe = %timeframe,
            count = candles.len(),
            "✅ Candles fetched"
        );

        Ok(candles)
    }
}

/// Parse raw kline rows, skipping malformed ones
fn parse_klines(klines: Vec<Vec<serde_json::Value>>) -> Vec<Candle> {
    klines
        .into_iter()
        .filter_map(|kline| {
            if kline.len() < 6 {
                return None;
            }

            let open_time = kline[0].as_i64()?;
            let open: f64 = kline[1].as_str()?.parse().ok()?;
            let high: f64 = kline[2].as_str()?.parse().ok()?;
            let low: f64 = kline[3].as_str()?.parse().ok()?;
            let close: f64 = kline[4].as_str()?.parse().ok()?;
            let volume: f64 = kline[5].as_str()?.parse().ok()?;

            Some(Candle {
                open_time,
                open,
                high,
                low,
                close,
                volume,
            })
        })
        .collect()
}
