//! Multi-timeframe structure and liquidity detection
//!
//! Pure computation over four candle series: daily swing range and
//! midline, 4h median-close trend, and fixed-offset order-block / FVG /
//! liquidity zones around the midline and latest price.

use thiserror::Error;

use crate::config::ZoneParams;
use crate::types::{
    Bias, Candle, FvgZone, LiquidityLevel, ObZone, Timeframe, TimeframeContext, TimeframeSet,
    Trend,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("no {0} candles available for structure detection")]
    NoCandles(Timeframe),
}

/// Derive the per-timeframe structural summary from four candle series.
///
/// Deterministic and side-effect free. The daily, 4h, and 15m series must
/// be non-empty; the 1h series is not consumed numerically and may be
/// empty.
pub fn detect_structure_and_liquidity(
    ohlcv_1d: &[Candle],
    ohlcv_4h: &[Candle],
    _ohlcv_1h: &[Candle],
    ohlcv_15m: &[Candle],
    zones: &ZoneParams,
) -> Result<TimeframeSet, StructureError> {
    let latest_price = ohlcv_15m
        .last()
        .ok_or(StructureError::NoCandles(Timeframe::Min15))?
        .close;

    if ohlcv_1d.is_empty() {
        return Err(StructureError::NoCandles(Timeframe::Day1));
    }
    let swing_high = ohlcv_1d.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let swing_low = ohlcv_1d.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    let midline = (swing_high + swing_low) / 2.0;

    let closes_4h: Vec<f64> = ohlcv_4h.iter().map(|c| c.close).collect();
    let median_4h = median(&closes_4h).ok_or(StructureError::NoCandles(Timeframe::Hour4))?;

    // Ties go bearish / premium (strict inequalities)
    let trend = if latest_price > median_4h {
        Trend::BullishHhHl
    } else {
        Trend::BearishLhLl
    };
    let bias = if latest_price < midline {
        Bias::DiscountLong
    } else {
        Bias::PremiumShort
    };
    let bos = trend.bos();

    let d1 = TimeframeContext {
        bias: Some(bias),
        trend: Some(trend),
        bos: Some(bos),
        swing_high: Some(swing_high),
        swing_low: Some(swing_low),
        midline_50: Some(midline),
        current_price: Some(latest_price),
        ..Default::default()
    };

    let h4 = TimeframeContext {
        bos: Some(bos),
        ob_zones: vec![ObZone {
            zone_type: "bullish".to_string(),
            from: midline * zones.ob_4h_lower,
            to: midline * zones.ob_4h_upper,
            state: "decisional".to_string(),
        }],
        fvg_zones: vec![FvgZone {
            from: midline * zones.fvg_4h_lower,
            to: midline * zones.fvg_4h_upper,
            state: "active".to_string(),
        }],
        ..Default::default()
    };

    let h1 = TimeframeContext {
        bos: Some(bos),
        ob_zones: vec![ObZone {
            zone_type: "bullish".to_string(),
            from: latest_price * zones.ob_1h_lower,
            to: latest_price * zones.ob_1h_upper,
            state: "fresh".to_string(),
        }],
        fvg_zones: vec![FvgZone {
            from: latest_price * zones.fvg_1h_lower,
            to: latest_price * zones.fvg_1h_upper,
            state: "valid".to_string(),
        }],
        ..Default::default()
    };

    let m15 = TimeframeContext {
        bos: Some(bos),
        current_price: Some(latest_price),
        micro_liquidity: vec![
            LiquidityLevel {
                level_type: "EQH".to_string(),
                price: latest_price * zones.eq_high,
            },
            LiquidityLevel {
                level_type: "EQL".to_string(),
                price: latest_price * zones.eq_low,
            },
        ],
        ..Default::default()
    };

    Ok(TimeframeSet { d1, h4, h1, m15 })
}

/// Statistical median; even-length input averages the middle pair
fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
