//! Core types used throughout the MCC context service
//!
//! Defines the candle input type and the market-context response shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four fixed timeframes a snapshot is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    Day1,
    Hour4,
    Hour1,
    Min15,
}

impl Timeframe {
    /// Key used in the response `timeframes` object
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Day1 => "1D",
            Timeframe::Hour4 => "4H",
            Timeframe::Hour1 => "1H",
            Timeframe::Min15 => "15m",
        }
    }

    /// Interval string for the exchange klines API
    pub fn interval(&self) -> &'static str {
        match self {
            Timeframe::Day1 => "1d",
            Timeframe::Hour4 => "4h",
            Timeframe::Hour1 => "1h",
            Timeframe::Min15 => "15m",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// OHLCV candlestick record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// Open time (start of period, ms)
    pub open_time: i64,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume in base currency
    pub volume: f64,
}

/// Directional preference relative to the daily midline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    #[serde(rename = "discount_LONG")]
    DiscountLong,
    #[serde(rename = "premium_SHORT")]
    PremiumShort,
}

/// Trend read off the 4h median close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "bullish_HH_HL")]
    BullishHhHl,
    #[serde(rename = "bearish_LH_LL")]
    BearishLhLl,
}

impl Trend {
    /// Break-of-structure direction implied by the trend
    pub fn bos(&self) -> Bos {
        match self {
            Trend::BullishHhHl => Bos::Up,
            Trend::BearishLhLl => Bos::Down,
        }
    }
}

/// Break-of-structure direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bos {
    Up,
    Down,
}

/// Order-block zone (prior decision area)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObZone {
    #[serde(rename = "type")]
    pub zone_type: String,
    pub from: f64,
    pub to: f64,
    pub state: String,
}

/// Fair-value-gap zone (imbalance area)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FvgZone {
    pub from: f64,
    pub to: f64,
    pub state: String,
}

/// Single liquidity level (equal-high / equal-low)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityLevel {
    #[serde(rename = "type")]
    pub level_type: String,
    pub price: f64,
}

/// Structural summary for one timeframe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeframeContext {
    pub bias: Option<Bias>,
    pub trend: Option<Trend>,
    pub bos: Option<Bos>,
    pub swing_high: Option<f64>,
    pub swing_low: Option<f64>,
    pub midline_50: Option<f64>,
    #[serde(default)]
    pub ob_zones: Vec<ObZone>,
    #[serde(default)]
    pub fvg_zones: Vec<FvgZone>,
    #[serde(default)]
    pub micro_liquidity: Vec<LiquidityLevel>,
    pub current_price: Option<f64>,
}

/// Per-timeframe contexts, keyed by the four fixed labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeframeSet {
    #[serde(rename = "1D")]
    pub d1: TimeframeContext,
    #[serde(rename = "4H")]
    pub h4: TimeframeContext,
    #[serde(rename = "1H")]
    pub h1: TimeframeContext,
    #[serde(rename = "15m")]
    pub m15: TimeframeContext,
}

/// Liquidation-heatmap cluster side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterSide {
    Long,
    Short,
}

/// Single liquidation-heatmap cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinglassCluster {
    pub side: ClusterSide,
    pub price: f64,
    pub size_usd: f64,
}

/// Cluster buckets as reported by Coinglass (only N3 is populated)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinglassLevels {
    #[serde(rename = "N1", default)]
    pub n1: Vec<CoinglassCluster>,
    #[serde(rename = "N2", default)]
    pub n2: Vec<CoinglassCluster>,
    #[serde(rename = "N3", default)]
    pub n3: Vec<CoinglassCluster>,
}

/// Coinglass enrichment block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinglassData {
    pub heatmap: CoinglassLevels,
    pub liquidations: CoinglassLevels,
}

impl CoinglassData {
    /// Build from the top heatmap clusters; liquidations stay empty
    pub fn from_heatmap_clusters(clusters: Vec<CoinglassCluster>) -> Self {
        Self {
            heatmap: CoinglassLevels {
                n3: clusters,
                ..Default::default()
            },
            liquidations: CoinglassLevels::default(),
        }
    }
}

/// Trading-session label by UTC hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Session {
    #[serde(rename = "NY")]
    NewYork,
    #[serde(rename = "LDN")]
    London,
    #[serde(rename = "ASIA")]
    Asia,
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::NewYork => write!(f, "NY"),
            Session::London => write!(f, "LDN"),
            Session::Asia => write!(f, "ASIA"),
        }
    }
}

/// Top-level market-context snapshot returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketContext {
    pub symbol: String,
    pub session: Session,
    pub timeframes: TimeframeSet,
    pub coinglass: Option<CoinglassData>,
}
