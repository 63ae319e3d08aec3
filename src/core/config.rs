use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Default gas budget used by the refresh loop to classify a coin as "live".
pub const DEFAULT_GAS_BUDGET: u64 = 400_000_000;

/// Environment-driven SDK configuration.
///
/// All fields fall back to sane defaults so the SDK works without any
/// environment at all (tests, offline signing).
#[derive(Debug, Clone, Deserialize)]
pub struct SdkConfig {
    /// Optional Sui fullnode RPC URL (WALLET_SUI_RPC_URL)
    pub rpc_url: Option<String>,
    /// Gas budget threshold for the live-coin selection (WALLET_SUI_GAS_BUDGET)
    pub gas_budget: u64,
    /// Refresh interval after a successful gas update, seconds (WALLET_SUI_GAS_REFRESH_SECS)
    pub gas_refresh_interval: Duration,
    /// Retry interval after a failed gas update, seconds (WALLET_SUI_GAS_RETRY_SECS)
    pub gas_retry_interval: Duration,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            gas_budget: DEFAULT_GAS_BUDGET,
            gas_refresh_interval: Duration::from_secs(120),
            gas_retry_interval: Duration::from_secs(5),
        }
    }
}

impl SdkConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let rpc_url = env::var("WALLET_SUI_RPC_URL").ok();
        let gas_budget = env::var("WALLET_SUI_GAS_BUDGET")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.gas_budget);
        let gas_refresh_interval = env::var("WALLET_SUI_GAS_REFRESH_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.gas_refresh_interval);
        let gas_retry_interval = env::var("WALLET_SUI_GAS_RETRY_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.gas_retry_interval);

        SdkConfig { rpc_url, gas_budget, gas_refresh_interval, gas_retry_interval }
    }
}
