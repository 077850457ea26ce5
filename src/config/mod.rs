//! Configuration management for the MCC context service
//!
//! Loads from optional YAML files + environment variables via .env

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub exchange: ExchangeConfig,
    pub coinglass: CoinglassConfig,
    pub zones: ZoneParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Klines REST endpoint
    pub rest_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinglassConfig {
    /// Coinglass API base URL
    pub api_base: String,
    /// API secret sent in the coinglassSecret header ("DEMO" placeholder)
    pub secret: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Named zone-offset multipliers for the structure detector
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneParams {
    /// 4H order block around the daily midline
    pub ob_4h_lower: f64,
    pub ob_4h_upper: f64,
    /// 4H fair value gap above the daily midline
    pub fvg_4h_lower: f64,
    pub fvg_4h_upper: f64,
    /// 1H order block around the latest price
    pub ob_1h_lower: f64,
    pub ob_1h_upper: f64,
    /// 1H fair value gap above the latest price
    pub fvg_1h_lower: f64,
    pub fvg_1h_upper: f64,
    /// 15m equal-high / equal-low liquidity offsets
    pub eq_high: f64,
    pub eq_low: f64,
}

impl Default for ZoneParams {
    fn default() -> Self {
        Self {
            ob_4h_lower: 0.98,
            ob_4h_upper: 1.02,
            fvg_4h_lower: 1.01,
            fvg_4h_upper: 1.02,
            ob_1h_lower: 0.995,
            ob_1h_upper: 1.005,
            fvg_1h_lower: 1.002,
            fvg_1h_upper: 1.004,
            eq_high: 1.005,
            eq_low: 0.995,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Server defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            // Exchange defaults
            .set_default("exchange.rest_url", "https://api.binance.com/api/v3/klines")?
            .set_default("exchange.timeout_secs", 30)?
            // Coinglass defaults
            .set_default(
                "coinglass.api_base",
                "https://open-api.coinglass.com/api/pro/v1",
            )?
            .set_default("coinglass.secret", "DEMO")?
            .set_default("coinglass.timeout_secs", 10)?
            // Zone-offset defaults
            .set_default("zones.ob_4h_lower", 0.98)?
            .set_default("zones.ob_4h_upper", 1.02)?
            .set_default("zones.fvg_4h_lower", 1.01)?
            .set_default("zones.fvg_4h_upper", 1.02)?
            .set_default("zones.ob_1h_lower", 0.995)?
            .set_default("zones.ob_1h_upper", 1.005)?
            .set_default("zones.fvg_1h_lower", 1.002)?
            .set_default("zones.fvg_1h_upper", 1.004)?
            .set_default("zones.eq_high", 1.005)?
            .set_default("zones.eq_low", 0.995)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (MCC_*)
            .add_source(Environment::with_prefix("MCC").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Generate a digest of the config (without secrets) for logging
    pub fn digest(&self) -> String {
        format!(
            "bind={}:{} exchange={} coinglass={}",
            self.server.host, self.server.port, self.exchange.rest_url, self.coinglass.api_base
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_params_defaults_match_original_offsets() {
        let zones = ZoneParams::default();
        assert_eq!(zones.ob_4h_lower, 0.98);
        assert_eq!(zones.ob_4h_upper, 1.02);
        assert_eq!(zones.fvg_1h_lower, 1.002);
        assert_eq!(zones.eq_high, 1.005);
        assert_eq!(zones.eq_low, 0.995);
    }
}
