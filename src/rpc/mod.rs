//! Chain RPC collaborator.
//!
//! The transaction builder consumes this trait; transport lives outside the
//! crate. Every call is a single attempt — errors propagate unmodified and
//! retry policy belongs to the implementation or its caller.

pub mod types;

use crate::core::errors::RpcError;
use crate::types::{ObjectId, SuiAddress};
use async_trait::async_trait;

pub use self::types::{
    CoinObject, CoinPage, DryRunTransactionBlockResponse, MoveNormalizedFunction,
    MoveNormalizedType, ObjectOwner, SuiObjectResponse, SuiTransactionBlockResponse,
};

/// The SUI gas coin type tag.
pub const SUI_GAS_COIN_TYPE: &str = "0x2::sui::SUI";

/// Default page size for coin listings.
pub const COIN_PAGE_LIMIT: u32 = 50;

/// Read/simulate/submit surface of a Sui fullnode, as consumed by the
/// builder and the gas refresh task.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Fetch one object with owner metadata.
    async fn get_object(&self, object_id: ObjectId) -> Result<SuiObjectResponse, RpcError>;

    /// Batch-fetch objects with owner metadata.
    async fn multi_get_objects(
        &self,
        object_ids: &[ObjectId],
    ) -> Result<Vec<SuiObjectResponse>, RpcError>;

    /// One page of the owner's coins of the given type.
    async fn get_coins(
        &self,
        owner: SuiAddress,
        coin_type: &str,
        cursor: Option<String>,
        limit: u32,
    ) -> Result<CoinPage, RpcError>;

    /// Normalized parameter/return types of a Move function.
    async fn get_normalized_move_function(
        &self,
        package: ObjectId,
        module: &str,
        function: &str,
    ) -> Result<MoveNormalizedFunction, RpcError>;

    /// Current reference gas price.
    async fn get_reference_gas_price(&self) -> Result<u64, RpcError>;

    /// Simulate a transaction without committing it.
    async fn dry_run_transaction_block(
        &self,
        tx_bytes: &[u8],
    ) -> Result<DryRunTransactionBlockResponse, RpcError>;

    /// Submit canonical transaction bytes plus serialized signatures.
    async fn execute_transaction_block(
        &self,
        tx_bytes: &[u8],
        signatures: Vec<String>,
    ) -> Result<SuiTransactionBlockResponse, RpcError>;
}

/// Drain the paginated coin listing into one vector.
pub async fn get_all_coins(
    rpc: &dyn ChainRpc,
    owner: SuiAddress,
    coin_type: &str,
) -> Result<Vec<CoinObject>, RpcError> {
    let mut out = Vec::new();
    let mut cursor = None;
    loop {
        let page = rpc.get_coins(owner, coin_type, cursor, COIN_PAGE_LIMIT).await?;
        out.extend(page.data);
        if !page.has_next_page {
            return Ok(out);
        }
        cursor = page.next_cursor;
    }
}

/// The owner's largest-balance coin of the given type.
pub async fn get_max_coin_object(
    rpc: &dyn ChainRpc,
    owner: SuiAddress,
    coin_type: &str,
) -> Result<Option<CoinObject>, RpcError> {
    let coins = get_all_coins(rpc, owner, coin_type).await?;
    let mut best: Option<(u64, CoinObject)> = None;
    for coin in coins {
        let balance = types::parse_numeric(&coin.balance)?;
        match &best {
            Some((max, _)) if *max >= balance => {}
            _ => best = Some((balance, coin)),
        }
    }
    Ok(best.map(|(_, coin)| coin))
}
