//! JSON DTOs for the fullnode RPC boundary.
//!
//! Field names follow the fullnode's camelCase JSON (the shared-owner
//! variant keeps its historical snake_case field). Numeric fields arrive as
//! decimal strings and are parsed at the use site.

use crate::core::errors::RpcError;
use serde::{Deserialize, Serialize};

/// Parse the fullnode's decimal-string numerics.
pub fn parse_numeric(value: &str) -> Result<u64, RpcError> {
    value
        .parse::<u64>()
        .map_err(|e| RpcError::UnexpectedResponse(format!("bad numeric '{}': {}", value, e)))
}

/// Current owner of an on-chain object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ObjectOwner {
    AddressOwner(String),
    ObjectOwner(String),
    Shared {
        #[serde(rename = "initial_shared_version")]
        initial_shared_version: u64,
    },
    Immutable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectData {
    pub object_id: String,
    pub version: String,
    pub digest: String,
    #[serde(default)]
    pub owner: Option<ObjectOwner>,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectResponseError {
    pub code: String,
    #[serde(default)]
    pub object_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiObjectResponse {
    #[serde(default)]
    pub data: Option<SuiObjectData>,
    #[serde(default)]
    pub error: Option<ObjectResponseError>,
}

/// One fungible coin owned by an address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinObject {
    pub coin_type: String,
    pub coin_object_id: String,
    pub version: String,
    pub digest: String,
    pub balance: String,
}

/// One page of a paginated coin listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<CoinObject>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// A normalized Move parameter/return type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MoveNormalizedType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    #[serde(rename_all = "camelCase")]
    Struct {
        address: String,
        module: String,
        name: String,
        #[serde(default)]
        type_arguments: Vec<MoveNormalizedType>,
    },
    Vector(Box<MoveNormalizedType>),
    Reference(Box<MoveNormalizedType>),
    MutableReference(Box<MoveNormalizedType>),
    TypeParameter(u16),
}

impl MoveNormalizedType {
    /// Strip one level of (mutable) reference.
    pub fn dereferenced(&self) -> &MoveNormalizedType {
        match self {
            MoveNormalizedType::Reference(inner)
            | MoveNormalizedType::MutableReference(inner) => inner,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNormalizedFunction {
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub is_entry: bool,
    pub parameters: Vec<MoveNormalizedType>,
    #[serde(rename = "return", default)]
    pub return_: Vec<MoveNormalizedType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    pub computation_cost: String,
    pub storage_cost: String,
    pub storage_rebate: String,
    #[serde(default)]
    pub non_refundable_storage_fee: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
    pub gas_used: GasCostSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunTransactionBlockResponse {
    pub effects: TransactionEffects,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiTransactionBlockResponse {
    pub digest: String,
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("42").unwrap(), 42);
        assert!(parse_numeric("").is_err());
        assert!(parse_numeric("12x").is_err());
    }

    #[test]
    fn test_object_owner_json_shapes() {
        let owner: ObjectOwner =
            serde_json::from_str(r#"{"AddressOwner":"0xabc"}"#).unwrap();
        assert_eq!(owner, ObjectOwner::AddressOwner("0xabc".to_string()));

        let owner: ObjectOwner =
            serde_json::from_str(r#"{"Shared":{"initial_shared_version":7}}"#).unwrap();
        assert_eq!(owner, ObjectOwner::Shared { initial_shared_version: 7 });

        let owner: ObjectOwner = serde_json::from_str(r#""Immutable""#).unwrap();
        assert_eq!(owner, ObjectOwner::Immutable);
    }

    #[test]
    fn test_normalized_type_json_shapes() {
        let t: MoveNormalizedType = serde_json::from_str(r#""U64""#).unwrap();
        assert_eq!(t, MoveNormalizedType::U64);

        let t: MoveNormalizedType = serde_json::from_str(
            r#"{"MutableReference":{"Struct":{"address":"0x2","module":"coin","name":"Coin","typeArguments":[]}}}"#,
        )
        .unwrap();
        match t.dereferenced() {
            MoveNormalizedType::Struct { module, name, .. } => {
                assert_eq!(module, "coin");
                assert_eq!(name, "Coin");
            }
            other => panic!("expected struct, got {other:?}"),
        }

        let t: MoveNormalizedType =
            serde_json::from_str(r#"{"Vector":"U8"}"#).unwrap();
        assert_eq!(t, MoveNormalizedType::Vector(Box::new(MoveNormalizedType::U8)));
    }

    #[test]
    fn test_dry_run_response_parses() {
        let json = r#"{
            "effects": {
                "status": {"status": "success"},
                "gasUsed": {
                    "computationCost": "100",
                    "storageCost": "50",
                    "storageRebate": "20",
                    "nonRefundableStorageFee": "0"
                }
            }
        }"#;
        let parsed: DryRunTransactionBlockResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.effects.status.is_success());
        assert_eq!(parse_numeric(&parsed.effects.gas_used.storage_rebate).unwrap(), 20);
    }
}
