//! Per-identity gas coin cache with a background refresh task.
//!
//! The refresher periodically lists the owner's gas coins and republishes a
//! `live` candidate (the largest balance above the configured budget) plus
//! the full `pending` list. A successful pass reschedules after the long
//! interval, a failed one after the short interval; failures are logged and
//! never propagate. The task is bound to a cancellation token so it dies
//! with the identity that owns it, and the cache sits behind a lock so the
//! builder side can read it safely.

use crate::core::config::SdkConfig;
use crate::core::errors::RpcError;
use crate::rpc::types::parse_numeric;
use crate::rpc::{self, ChainRpc, SUI_GAS_COIN_TYPE};
use crate::types::{ObjectId, SuiAddress};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Latest known gas coins of one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiGasObject {
    /// Preferred payment coin, if any coin clears the configured budget.
    pub live: Option<ObjectId>,
    /// Every gas coin currently owned by the identity.
    pub pending: Vec<ObjectId>,
}

pub type SharedGasCache = Arc<RwLock<SuiGasObject>>;

/// Background refresher for one identity's gas cache.
pub struct GasRefresher {
    rpc: Arc<dyn ChainRpc>,
    owner: SuiAddress,
    config: SdkConfig,
    cache: SharedGasCache,
}

impl GasRefresher {
    pub fn new(rpc: Arc<dyn ChainRpc>, owner: SuiAddress, config: SdkConfig) -> Self {
        Self { rpc, owner, config, cache: Arc::new(RwLock::new(SuiGasObject::default())) }
    }

    pub fn cache(&self) -> SharedGasCache {
        self.cache.clone()
    }

    /// One refresh pass: list coins, pick the live candidate, publish.
    pub async fn refresh_once(&self) -> Result<(), RpcError> {
        let coins = rpc::get_all_coins(self.rpc.as_ref(), self.owner, SUI_GAS_COIN_TYPE).await?;

        let mut live: Option<(u64, ObjectId)> = None;
        let mut pending = Vec::with_capacity(coins.len());
        for coin in &coins {
            let id = SuiAddress::from_hex(&coin.coin_object_id)
                .map_err(|_| RpcError::UnexpectedResponse(format!("bad coin id {}", coin.coin_object_id)))?;
            pending.push(id);

            let balance = parse_numeric(&coin.balance)?;
            if balance > self.config.gas_budget {
                match live {
                    Some((best, _)) if best >= balance => {}
                    _ => live = Some((balance, id)),
                }
            }
        }

        let mut cache = self.cache.write();
        cache.live = live.map(|(_, id)| id);
        cache.pending = pending;
        debug!(owner = %self.owner, coins = cache.pending.len(), live = ?cache.live, "gas cache refreshed");
        Ok(())
    }

    /// Spawn the refresh loop. It runs until the returned token (or a
    /// parent of it) is cancelled; errors only shorten the next sleep.
    pub fn spawn(self, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut delay = std::time::Duration::ZERO;
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(owner = %self.owner, "gas refresher stopped");
                        return;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }

                delay = match self.refresh_once().await {
                    Ok(()) => self.config.gas_refresh_interval,
                    Err(err) => {
                        warn!(owner = %self.owner, error = %err, "gas refresh failed");
                        self.config.gas_retry_interval
                    }
                };
            }
        })
    }
}
