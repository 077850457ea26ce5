//! HTTP API surface
//!
//! Single endpoint: GET /mcc/market-context. Candle fetching and the
//! structure detector are hard dependencies (failures become a 500);
//! Coinglass is soft and degrades to an empty cluster set.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::coinglass::HeatmapSource;
use crate::config::ZoneParams;
use crate::exchange::MarketDataSource;
use crate::session::current_session;
use crate::structure::detect_structure_and_liquidity;
use crate::types::{MarketContext, Timeframe};

/// Shared handler state; sources are trait objects so tests can inject
/// fakes
#[derive(Clone)]
pub struct AppState {
    pub market_data: Arc<dyn MarketDataSource>,
    pub heatmap: Arc<dyn HeatmapSource>,
    pub zones: ZoneParams,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/mcc/market-context", get(get_market_context))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

fn default_symbol() -> String {
    "BTC/USDT".to_string()
}

fn default_timeframe() -> String {
    "1h".to_string()
}

fn default_lookback_bars() -> u32 {
    300
}

fn default_include_coinglass() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct MarketContextQuery {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Accepted for API compatibility; the snapshot always covers the
    /// four fixed timeframes
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default = "default_lookback_bars")]
    pub lookback_bars: u32,
    #[serde(default = "default_include_coinglass")]
    pub include_coinglass: bool,
}

/// GET /mcc/market-context - multi-timeframe snapshot for one symbol
async fn get_market_context(
    Query(query): Query<MarketContextQuery>,
    State(state): State<AppState>,
) -> Result<Json<MarketContext>, AppError> {
    tracing::info!(
        symbol = %query.symbol,
        timeframe = %query.timeframe,
        lookback_bars = query.lookback_bars,
        include_coinglass = query.include_coinglass,
        "Building market context"
    );

    let ohlcv_1d = state
        .market_data
        .fetch_ohlcv(&query.symbol, Timeframe::Day1, query.lookback_bars)
        .await?;
    let ohlcv_4h = state
        .market_data
        .fetch_ohlcv(&query.symbol, Timeframe::Hour4, query.lookback_bars)
        .await?;
    let ohlcv_1h = state
        .market_data
        .fetch_ohlcv(&query.symbol, Timeframe::Hour1, query.lookback_bars)
        .await?;
    let ohlcv_15m = state
        .market_data
        .fetch_ohlcv(&query.symbol, Timeframe::Min15, query.lookback_bars)
        .await?;

    let timeframes = detect_structure_and_liquidity(
        &ohlcv_1d,
        &ohlcv_4h,
        &ohlcv_1h,
        &ohlcv_15m,
        &state.zones,
    )?;

    let coinglass = if query.include_coinglass {
        Some(state.heatmap.fetch_clusters(&query.symbol).await.into_data())
    } else {
        None
    };

    Ok(Json(MarketContext {
        symbol: query.symbol,
        session: current_session(),
        timeframes,
        coinglass,
    }))
}

/// Internal failures surface as a plain 500 with the error chain
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %format!("{:#}", self.0), "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", self.0)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
