//! End-to-end flows through the public API: derive an identity, build a
//! transaction against a fake fullnode, sign it, verify the signature, and
//! combine a multisig.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use sui_wallet_sdk::codec;
use sui_wallet_sdk::crypto::verify::verify_transaction_message;
use sui_wallet_sdk::rpc::types::{
    CoinObject, CoinPage, DryRunTransactionBlockResponse, ExecutionStatus, GasCostSummary,
    MoveNormalizedFunction, MoveNormalizedType, ObjectOwner, SuiObjectData, SuiObjectResponse,
    SuiTransactionBlockResponse, TransactionEffects,
};
use sui_wallet_sdk::transaction::{
    CallInput, CoinInput, Command, TransactionData, TransactionKind,
};
use sui_wallet_sdk::{
    ChainRpc, MultiSigPublicKey, ObjectId, RpcError, SignatureScheme, SuiAddress, SuiKeyPair,
    SuiSigner, TransactionBuilder,
};

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Minimal fullnode double for public-API tests.
#[derive(Default)]
struct FakeFullnode {
    objects: Mutex<HashMap<ObjectId, SuiObjectResponse>>,
    coins: Mutex<Vec<CoinObject>>,
    functions: Mutex<HashMap<String, MoveNormalizedFunction>>,
    executed: Mutex<Vec<Vec<String>>>,
}

impl FakeFullnode {
    fn add_owned_object(&self, id: ObjectId, version: u64) {
        self.objects.lock().insert(
            id,
            SuiObjectResponse {
                data: Some(SuiObjectData {
                    object_id: id.to_hex(),
                    version: version.to_string(),
                    digest: bs58::encode([7u8; 32]).into_string(),
                    owner: Some(ObjectOwner::AddressOwner("0xaa".to_string())),
                    type_: None,
                }),
                error: None,
            },
        );
    }

    fn add_coin(&self, id: ObjectId, balance: u64) {
        self.coins.lock().push(CoinObject {
            coin_type: "0x2::sui::SUI".to_string(),
            coin_object_id: id.to_hex(),
            version: "1".to_string(),
            digest: bs58::encode([8u8; 32]).into_string(),
            balance: balance.to_string(),
        });
    }
}

#[async_trait]
impl ChainRpc for FakeFullnode {
    async fn get_object(&self, object_id: ObjectId) -> Result<SuiObjectResponse, RpcError> {
        self.objects
            .lock()
            .get(&object_id)
            .cloned()
            .ok_or_else(|| RpcError::Transport("missing object".to_string()))
    }

    async fn multi_get_objects(
        &self,
        object_ids: &[ObjectId],
    ) -> Result<Vec<SuiObjectResponse>, RpcError> {
        let objects = self.objects.lock();
        Ok(object_ids.iter().filter_map(|id| objects.get(id).cloned()).collect())
    }

    async fn get_coins(
        &self,
        _owner: SuiAddress,
        coin_type: &str,
        _cursor: Option<String>,
        _limit: u32,
    ) -> Result<CoinPage, RpcError> {
        Ok(CoinPage {
            data: self
                .coins
                .lock()
                .iter()
                .filter(|coin| coin.coin_type == coin_type)
                .cloned()
                .collect(),
            next_cursor: None,
            has_next_page: false,
        })
    }

    async fn get_normalized_move_function(
        &self,
        package: ObjectId,
        module: &str,
        function: &str,
    ) -> Result<MoveNormalizedFunction, RpcError> {
        let key = format!("{}::{}::{}", package.to_hex(), module, function);
        self.functions
            .lock()
            .get(&key)
            .cloned()
            .ok_or_else(|| RpcError::Transport(format!("missing function {}", key)))
    }

    async fn get_reference_gas_price(&self) -> Result<u64, RpcError> {
        Ok(999)
    }

    async fn dry_run_transaction_block(
        &self,
        _tx_bytes: &[u8],
    ) -> Result<DryRunTransactionBlockResponse, RpcError> {
        Ok(DryRunTransactionBlockResponse {
            effects: TransactionEffects {
                status: ExecutionStatus { status: "success".to_string(), error: None },
                gas_used: GasCostSummary {
                    computation_cost: "750000".to_string(),
                    storage_cost: "2000".to_string(),
                    storage_rebate: "500".to_string(),
                    non_refundable_storage_fee: None,
                },
            },
        })
    }

    async fn execute_transaction_block(
        &self,
        _tx_bytes: &[u8],
        signatures: Vec<String>,
    ) -> Result<SuiTransactionBlockResponse, RpcError> {
        self.executed.lock().push(signatures);
        Ok(SuiTransactionBlockResponse {
            digest: "11111111111111111111111111111111".to_string(),
            effects: None,
        })
    }
}

fn addr(n: u8) -> SuiAddress {
    SuiAddress([n; 32])
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[tokio::test]
async fn test_build_sign_and_submit_flow() {
    init_tracing();
    let node = Arc::new(FakeFullnode::default());
    node.add_coin(addr(0x10), 5_000_000_000);
    node.add_coin(addr(0x11), 1_000_000_000);

    let signer = SuiSigner::from_mnemonic(MNEMONIC, SignatureScheme::Ed25519, None).unwrap();

    let mut builder = TransactionBuilder::new(node.clone() as Arc<dyn ChainRpc>);
    builder.set_sender(signer.address());
    let split = builder
        .split_coins(CoinInput::Gas, vec![CallInput::u64(1_000)])
        .await
        .unwrap();
    builder
        .transfer_objects(vec![CoinInput::Result(split[0])], addr(0xbb))
        .await
        .unwrap();

    let (tx, tx_bytes) = builder.build().await.unwrap();

    // gas was prepared from chain state: reference price + 1, simulated budget
    assert_eq!(tx.gas_data().price, 1000);
    let expected_budget = 750_000 + 1000 * 1000 + 2000 - 500;
    assert_eq!(tx.gas_data().budget, expected_budget);
    assert_eq!(tx.gas_data().payment.len(), 2);

    // canonical bytes round-trip through the codec
    assert_eq!(codec::from_bytes::<TransactionData>(&tx_bytes).unwrap(), tx);

    // sign, verify, submit
    let signed = signer.sign_transaction(&B64.encode(&tx_bytes)).unwrap();
    let (recovered, pass) = verify_transaction_message(&signed.bytes, &signed.signature).unwrap();
    assert!(pass);
    assert_eq!(recovered, signer.address());

    node.execute_transaction_block(&tx_bytes, vec![signed.signature])
        .await
        .unwrap();
    assert_eq!(node.executed.lock().len(), 1);
}

#[tokio::test]
async fn test_move_call_with_object_resolution() {
    let node = Arc::new(FakeFullnode::default());
    node.add_owned_object(addr(0x20), 33);
    node.add_coin(addr(0x10), 5_000_000_000);
    node.functions.lock().insert(
        format!("{}::vault::deposit", SuiAddress::from_hex("0x7").unwrap().to_hex()),
        MoveNormalizedFunction {
            visibility: Some("Public".to_string()),
            is_entry: true,
            parameters: vec![
                MoveNormalizedType::MutableReference(Box::new(MoveNormalizedType::Struct {
                    address: "0x7".to_string(),
                    module: "vault".to_string(),
                    name: "Vault".to_string(),
                    type_arguments: vec![],
                })),
                MoveNormalizedType::U64,
                MoveNormalizedType::MutableReference(Box::new(MoveNormalizedType::Struct {
                    address: "0x2".to_string(),
                    module: "tx_context".to_string(),
                    name: "TxContext".to_string(),
                    type_arguments: vec![],
                })),
            ],
            return_: vec![],
        },
    );

    let mut builder = TransactionBuilder::new(node as Arc<dyn ChainRpc>);
    builder.set_sender(addr(0xaa));
    builder.set_gas_price(1000);
    builder.set_gas_budget(10_000_000);
    builder
        .move_call(
            "0x7::vault::deposit",
            vec![CallInput::Object(addr(0x20)), CallInput::u64(777)],
            &[],
        )
        .await
        .unwrap();

    let (tx, _) = builder.build().await.unwrap();
    let TransactionData::V1(v1) = tx;
    let TransactionKind::ProgrammableTransaction(pt) = v1.kind;
    assert_eq!(pt.inputs.len(), 2);
    match &pt.commands[0] {
        Command::MoveCall(call) => {
            assert_eq!(call.function.as_str(), "deposit");
            assert_eq!(call.arguments.len(), 2);
        }
        other => panic!("expected move call, got {other:?}"),
    }
}

#[test]
fn test_multisig_exchange_flow() {
    let ed25519 = SuiKeyPair::derive(SignatureScheme::Ed25519, MNEMONIC, None).unwrap();
    let secp256k1 = SuiKeyPair::derive(SignatureScheme::Secp256k1, MNEMONIC, None).unwrap();

    let multisig = MultiSigPublicKey::new(
        vec![(ed25519.public_key(), 2), (secp256k1.public_key(), 1)],
        2,
    )
    .unwrap();

    // description travels to co-signers as JSON and pins the same address
    let info_json = serde_json::to_string(&multisig.info()).unwrap();
    assert!(info_json.contains(&multisig.to_address().to_hex()));

    let message = b"multisig exchange";
    let heavy = ed25519.sign_personal_message(message).signature;
    let combined = multisig.combine_partial_signatures(&[heavy]).unwrap();
    assert_eq!(B64.decode(combined).unwrap()[0], 0x03);

    // the lighter key alone stays below the threshold
    let light = secp256k1.sign_personal_message(message).signature;
    assert!(multisig.combine_partial_signatures(&[light]).is_err());
}
